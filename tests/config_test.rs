use std::{collections::HashMap, time::Duration};

use tastegraph::{config::*, error::AppError};

fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
    let map: HashMap<&str, &str> = vars.iter().copied().collect();
    move |key| map.get(key).map(|v| v.to_string())
}

#[test]
fn test_config_defaults() {
    let vars = [(CLIENT_ID_VAR, "id"), (CLIENT_SECRET_VAR, "secret")];
    let config = Config::from_lookup(lookup(&vars)).unwrap();

    assert_eq!(config.client_id, "id");
    assert_eq!(config.client_secret, "secret");
    assert_eq!(config.redirect_uri, "http://127.0.0.1:8080/");
    assert_eq!(config.server_addr, "127.0.0.1:8080");
    assert_eq!(config.auth_url, "https://accounts.spotify.com/authorize");
    assert_eq!(config.token_url, "https://accounts.spotify.com/api/token");
    assert_eq!(config.api_url, "https://api.spotify.com/v1");
    assert_eq!(config.http_timeout, Duration::from_secs(10));
}

#[test]
fn test_config_overrides() {
    let vars = [
        (CLIENT_ID_VAR, "id"),
        (CLIENT_SECRET_VAR, "secret"),
        (REDIRECT_URI_VAR, "http://localhost:3000/"),
        (SERVER_ADDRESS_VAR, "0.0.0.0:3000"),
        (AUTH_URL_VAR, "http://127.0.0.1:9000/authorize"),
        (TOKEN_URL_VAR, "http://127.0.0.1:9000/api/token"),
        (API_URL_VAR, "http://127.0.0.1:9000/v1/"),
        (HTTP_TIMEOUT_VAR, "3"),
    ];
    let config = Config::from_lookup(lookup(&vars)).unwrap();

    assert_eq!(config.redirect_uri, "http://localhost:3000/");
    assert_eq!(config.server_addr, "0.0.0.0:3000");
    assert_eq!(config.auth_url, "http://127.0.0.1:9000/authorize");
    assert_eq!(config.token_url, "http://127.0.0.1:9000/api/token");
    // Trailing slash is dropped
    assert_eq!(config.api_url, "http://127.0.0.1:9000/v1");
    assert_eq!(config.http_timeout, Duration::from_secs(3));
}

#[test]
fn test_config_missing_credentials() {
    let err = Config::from_lookup(lookup(&[(CLIENT_SECRET_VAR, "secret")])).unwrap_err();
    match err {
        AppError::Config(msg) => assert!(msg.contains(CLIENT_ID_VAR)),
        other => panic!("unexpected error: {other:?}"),
    }

    // Empty counts as missing
    let vars = [(CLIENT_ID_VAR, "id"), (CLIENT_SECRET_VAR, "  ")];
    let err = Config::from_lookup(lookup(&vars)).unwrap_err();
    match err {
        AppError::Config(msg) => assert!(msg.contains(CLIENT_SECRET_VAR)),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_config_invalid_timeout() {
    let vars = [
        (CLIENT_ID_VAR, "id"),
        (CLIENT_SECRET_VAR, "secret"),
        (HTTP_TIMEOUT_VAR, "soon"),
    ];
    let err = Config::from_lookup(lookup(&vars)).unwrap_err();
    assert!(matches!(err, AppError::Config(_)));
    assert_eq!(err.status().as_u16(), 500);
}

#[test]
fn test_config_zero_timeout() {
    let vars = [
        (CLIENT_ID_VAR, "id"),
        (CLIENT_SECRET_VAR, "secret"),
        (HTTP_TIMEOUT_VAR, "0"),
    ];
    let err = Config::from_lookup(lookup(&vars)).unwrap_err();
    match err {
        AppError::Config(msg) => assert!(msg.contains(HTTP_TIMEOUT_VAR)),
        other => panic!("unexpected error: {other:?}"),
    }
}
