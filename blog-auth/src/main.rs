//! blog-auth - Authorize Blogcast against WordPress.com once

use clap::Parser;
use libblogcast::logging::{LogFormat, LoggingConfig};
use libblogcast::oauth::DEFAULT_CALLBACK_TIMEOUT;
use libblogcast::{AuthorizationFlow, Config, Result, TokenStore};

#[derive(Parser, Debug)]
#[command(name = "blog-auth")]
#[command(version, about = "Authorize Blogcast to publish on your WordPress.com site")]
#[command(long_about = r#"Run the OAuth2 authorization-code flow once and store the access token.

The authorization URL is printed to stdout. Open it in a browser and approve
access; the redirect is captured on a local listener and the token is written
to the configured token file with owner-only permissions.

CONFIGURATION:
    WP_CLIENT_ID, WP_CLIENT_SECRET   OAuth application credentials (required)
    WP_REDIRECT_URI                  Must match the application's redirect URI
                                     (default: http://localhost:8765/callback)
    WP_TOKEN_FILE                    Where the token is stored
    BLOGCAST_CONFIG                  Path to config.toml

EXIT CODES:
    0 - Token stored
    1 - Configuration or I/O error
    2 - Authorization failed (timeout, denied, rejected exchange)
"#)]
struct Cli {
    /// Seconds to wait for the browser redirect
    #[arg(long, default_value_t = DEFAULT_CALLBACK_TIMEOUT.as_secs(), value_name = "SECS")]
    timeout: u64,

    /// Log format: text, json or pretty
    #[arg(long, value_name = "FORMAT")]
    log_format: Option<LogFormat>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    LoggingConfig::from_env(cli.log_format, cli.verbose).init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let flow = AuthorizationFlow::from_config(&config.wordpress)?
        .with_callback_timeout(std::time::Duration::from_secs(cli.timeout));
    let store = TokenStore::new(config.token_path());

    flow.run(&store, |url| {
        println!("Open this URL in your browser and approve access:");
        println!("{}", url);
        eprintln!(
            "Waiting up to {}s for the redirect to {}",
            cli.timeout, config.wordpress.redirect_uri
        );
    })
    .await?;

    tracing::info!("Authorization complete");
    println!("Token saved to {}", store.path().display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_defaults_to_callback_timeout() {
        let cli = Cli::try_parse_from(["blog-auth"]).unwrap();
        assert_eq!(cli.timeout, DEFAULT_CALLBACK_TIMEOUT.as_secs());
    }

    #[test]
    fn test_timeout_override() {
        let cli = Cli::try_parse_from(["blog-auth", "--timeout", "5"]).unwrap();
        assert_eq!(cli.timeout, 5);
    }
}
