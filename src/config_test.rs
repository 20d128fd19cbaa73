use super::*;

fn lookup_from(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
    move |key| {
        pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| (*v).to_owned())
    }
}

#[test]
fn default_points_at_localhost_with_ten_second_timeout() {
    let cfg = ClientConfig::default();
    assert_eq!(cfg.base_url, "http://localhost:8080");
    assert_eq!(cfg.timeout, Duration::from_millis(10_000));
}

#[test]
fn from_lookup_without_override_uses_default() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[]));
    assert_eq!(cfg, ClientConfig::default());
}

#[test]
fn from_lookup_reads_base_url_override() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[(BASE_URL_ENV, "https://api.example.test")]));
    assert_eq!(cfg.base_url, "https://api.example.test");
    assert_eq!(cfg.timeout, Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS));
}

#[test]
fn from_lookup_trims_trailing_slash_and_whitespace() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[(BASE_URL_ENV, "  https://api.example.test//  ")]));
    assert_eq!(cfg.base_url, "https://api.example.test");
}

#[test]
fn from_lookup_empty_override_falls_back() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[(BASE_URL_ENV, "   ")]));
    assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
}

#[test]
fn url_joins_path() {
    let cfg = ClientConfig::default().with_base_url("http://127.0.0.1:9000/");
    assert_eq!(cfg.url("/users/42"), "http://127.0.0.1:9000/users/42");
}
