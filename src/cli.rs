//! Command-line interface definitions for the news feed digest.
//!
//! Nothing is required: with no flags and no environment the binary runs
//! the built-in configuration against the HTML search pages and prints the
//! digest to the console. Every secret can come from the environment.

use crate::config::Credentials;
use clap::Parser;

/// Command-line arguments for one digest run.
///
/// # Examples
///
/// ```sh
/// # Built-in configuration, console only
/// news_feed_digest
///
/// # Custom configuration, API search, Telegram delivery
/// NAVER_CLIENT_ID=... NAVER_CLIENT_SECRET=... \
/// TELEGRAM_BOT_TOKEN=... TELEGRAM_CHAT_ID=... \
/// news_feed_digest -c ./digest.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML configuration file (replaces the built-in one)
    #[arg(short, long, env = "NEWS_DIGEST_CONFIG")]
    pub config: Option<String>,

    /// Naver Search API client id
    #[arg(long, env = "NAVER_CLIENT_ID", hide_env_values = true)]
    pub naver_client_id: Option<String>,

    /// Naver Search API client secret
    #[arg(long, env = "NAVER_CLIENT_SECRET", hide_env_values = true)]
    pub naver_client_secret: Option<String>,

    /// Telegram bot token used to send the digest
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    pub telegram_bot_token: Option<String>,

    /// Telegram chat the digest is sent to
    #[arg(long, env = "TELEGRAM_CHAT_ID")]
    pub telegram_chat_id: Option<String>,
}

impl Cli {
    /// Collect the secret-bearing arguments into [`Credentials`].
    pub fn credentials(&self) -> Credentials {
        Credentials::from_parts(
            self.naver_client_id.clone(),
            self.naver_client_secret.clone(),
            self.telegram_bot_token.clone(),
            self.telegram_chat_id.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "news_feed_digest",
            "--config",
            "./digest.yaml",
            "--naver-client-id",
            "id",
            "--naver-client-secret",
            "secret",
        ]);

        assert_eq!(cli.config.as_deref(), Some("./digest.yaml"));
        let creds = cli.credentials();
        assert_eq!(creds.naver.unwrap().client_id, "id");
        assert!(creds.telegram.is_none());
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["news_feed_digest", "-c", "/tmp/digest.yaml"]);
        assert_eq!(cli.config.as_deref(), Some("/tmp/digest.yaml"));
    }

    #[test]
    fn test_half_configured_telegram_is_ignored() {
        let cli = Cli::parse_from(["news_feed_digest", "--telegram-bot-token", "123:abc"]);
        // Only meaningful if TELEGRAM_CHAT_ID is absent from the test environment.
        if std::env::var_os("TELEGRAM_CHAT_ID").is_none() {
            assert!(cli.credentials().telegram.is_none());
        }
    }
}
