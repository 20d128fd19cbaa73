use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use userdesk::config::DEFAULT_BASE_URL;
use userdesk::net::auth::AuthApi;
use userdesk::{Client, ClientConfig, ClientError, FileStore, RegisterRequest, StoreError, UserUpdate};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Store(#[from] StoreError),
    #[error("{}", describe_client_error(.0))]
    Client(#[from] ClientError),
    #[error("nothing to update; pass at least one of --username, --email, --role-id, --role")]
    EmptyUpdate,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

fn describe_client_error(error: &ClientError) -> String {
    match error.server_message() {
        Some(message) => format!("{error}: {message}"),
        None => error.to_string(),
    }
}

#[derive(Parser, Debug)]
#[command(name = "userdesk", about = "User management API client")]
struct Cli {
    #[arg(long, env = "USERDESK_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Where the session token and user are kept between runs.
    #[arg(long, env = "USERDESK_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Ping,
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "USERDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "USERDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    Status,
    Users(UsersCommand),
}

#[derive(Args, Debug)]
struct UsersCommand {
    #[command(subcommand)]
    command: UsersSubcommand,
}

#[derive(Subcommand, Debug)]
enum UsersSubcommand {
    List,
    Get {
        id: i64,
    },
    Update {
        id: i64,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        role_id: Option<i64>,
        #[arg(long)]
        role: Option<String>,
    },
    Delete {
        id: i64,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let session_file = cli.session_file.unwrap_or_else(default_session_file);
    let store = Arc::new(FileStore::open(&session_file)?);
    let config = ClientConfig::default().with_base_url(cli.base_url);
    let client = Client::new(config, store)?;

    client.on_unauthorized(|_| {
        eprintln!("session expired or revoked; run `userdesk login` again");
    });
    client.session().check_auth();

    match cli.command {
        Command::Ping => run_ping(&client).await,
        Command::Login { username, password } => {
            let response = client.session().login(&username, &password).await?;
            print_json(&response.user)
        }
        Command::Register {
            username,
            email,
            password,
        } => {
            let request = RegisterRequest { username, email, password };
            let response = client.session().register(&request).await?;
            print_json(&response.user)
        }
        Command::Logout => {
            client.session().logout();
            print_json(&json!({ "authenticated": false }))
        }
        Command::Status => {
            let session = client.session().session();
            print_json(&json!({
                "authenticated": session.authenticated,
                "stored_token": client.auth().is_authenticated(),
                "user": session.user,
            }))
        }
        Command::Users(users) => run_users(&client, users).await,
    }
}

async fn run_ping(client: &Client) -> Result<(), CliError> {
    let body: serde_json::Value = client.http().get("/health").await?;
    print_json(&body)
}

async fn run_users(client: &Client, users: UsersCommand) -> Result<(), CliError> {
    match users.command {
        UsersSubcommand::List => {
            let list = client.users().list_users().await?;
            print_json(&list)
        }
        UsersSubcommand::Get { id } => {
            let user = client.users().get_user(id).await?;
            print_json(&user)
        }
        UsersSubcommand::Update {
            id,
            username,
            email,
            role_id,
            role,
        } => {
            let update = UserUpdate { username, email, role_id, role };
            if update.is_empty() {
                return Err(CliError::EmptyUpdate);
            }
            let user = client.users().update_user(id, &update).await?;
            print_json(&user)
        }
        UsersSubcommand::Delete { id } => {
            client.users().delete_user(id).await?;
            print_json(&json!({ "deleted": id }))
        }
    }
}

fn default_session_file() -> PathBuf {
    let home = std::env::var_os("HOME").map_or_else(PathBuf::new, PathBuf::from);
    home.join(".userdesk").join("session.json")
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
