use super::*;

fn lookup_from(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
    move |key: &str| {
        pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| (*v).to_owned())
    }
}

#[test]
fn from_lookup_uses_defaults_when_unset() {
    let config = ClientConfig::from_lookup(|_| None);
    assert_eq!(config, ClientConfig::default());
    assert_eq!(config.api_base, "/api/v1");
    assert_eq!(config.storage_key, "auth-storage");
    assert_eq!(config.request_timeout_ms, 15_000);
}

#[test]
fn from_lookup_trims_trailing_slash_from_api_base() {
    let config = ClientConfig::from_lookup(lookup_from(&[("MYCELIUM_API_BASE", "https://kb.example.com/api/v1/")]));
    assert_eq!(config.api_base, "https://kb.example.com/api/v1");
}

#[test]
fn from_lookup_empty_storage_key_falls_back() {
    let config = ClientConfig::from_lookup(lookup_from(&[("MYCELIUM_STORAGE_KEY", "   ")]));
    assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
}

#[test]
fn from_lookup_invalid_timeout_falls_back() {
    let config = ClientConfig::from_lookup(lookup_from(&[("MYCELIUM_REQUEST_TIMEOUT_MS", "soon")]));
    assert_eq!(config.request_timeout_ms, DEFAULT_REQUEST_TIMEOUT_MS);

    let config = ClientConfig::from_lookup(lookup_from(&[("MYCELIUM_REQUEST_TIMEOUT_MS", "0")]));
    assert_eq!(config.request_timeout_ms, DEFAULT_REQUEST_TIMEOUT_MS);
}

#[test]
fn from_lookup_parses_overrides() {
    let config = ClientConfig::from_lookup(lookup_from(&[
        ("MYCELIUM_STORAGE_KEY", "kb-session"),
        ("MYCELIUM_REQUEST_TIMEOUT_MS", "2500"),
    ]));
    assert_eq!(config.storage_key, "kb-session");
    assert_eq!(config.request_timeout_ms, 2500);
}

#[test]
fn from_lookup_blank_or_slash_api_base_falls_back() {
    let config = ClientConfig::from_lookup(lookup_from(&[("MYCELIUM_API_BASE", "  ")]));
    assert_eq!(config.api_base, DEFAULT_API_BASE);

    let config = ClientConfig::from_lookup(lookup_from(&[("MYCELIUM_API_BASE", "/")]));
    assert_eq!(config.api_base, DEFAULT_API_BASE);
}
