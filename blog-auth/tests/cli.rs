//! Command-line behavior of blog-auth that needs no authorization server

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// blog-auth isolated from the developer's config, .env and environment
fn blog_auth(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("blog-auth").unwrap();
    cmd.current_dir(dir.path())
        .env("BLOGCAST_CONFIG", dir.path().join("config.toml"))
        .env_remove("WP_CLIENT_ID")
        .env_remove("WP_CLIENT_SECRET")
        .env_remove("WP_REDIRECT_URI")
        .env_remove("WP_TOKEN_FILE")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help() {
    Command::cargo_bin("blog-auth")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("EXIT CODES"))
        .stdout(predicate::str::contains("[default: 300]"));
}

#[test]
fn test_missing_client_id() {
    let dir = TempDir::new().unwrap();

    blog_auth(&dir)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("WP_CLIENT_ID"));
}

#[test]
fn test_missing_client_secret() {
    let dir = TempDir::new().unwrap();

    blog_auth(&dir)
        .env("WP_CLIENT_ID", "12345")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("WP_CLIENT_SECRET"));
}

#[test]
fn test_timeout_exits_with_auth_code_and_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let token_file = dir.path().join("wp_token.json");
    blog_auth(&dir)
        .env("WP_CLIENT_ID", "12345")
        .env("WP_CLIENT_SECRET", "shh")
        .env("WP_TOKEN_FILE", &token_file)
        .env("WP_REDIRECT_URI", "http://127.0.0.1:0/callback")
        .args(["--timeout", "1"])
        .assert()
        .failure()
        .code(2)
        .stdout(predicate::str::contains("client_id=12345"))
        .stderr(predicate::str::contains("No authorization code received"));

    assert!(!token_file.exists());
}

#[test]
fn test_non_http_redirect_uri_is_rejected() {
    let dir = TempDir::new().unwrap();

    blog_auth(&dir)
        .env("WP_CLIENT_ID", "12345")
        .env("WP_CLIENT_SECRET", "shh")
        .env("WP_REDIRECT_URI", "urn:ietf:wg:oauth:2.0:oob")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("wordpress.redirect_uri"));
}

#[test]
fn test_invalid_log_format() {
    Command::cargo_bin("blog-auth")
        .unwrap()
        .args(["--log-format", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid log format"));
}
