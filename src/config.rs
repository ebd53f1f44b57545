//! Run configuration: query groups, thresholds, sections and endpoints.
//!
//! A default configuration is compiled into the binary from
//! `config/default.yaml`. A file passed on the command line replaces it
//! wholesale. Credentials are kept apart in [`Credentials`] and are only
//! ever read from the environment / CLI.

use crate::error::{DigestError, Result};
use crate::models::{Category, QueryGroup};
use chrono::NaiveDate;
use chrono::format::{Item, StrftimeItems};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tracing::{info, instrument};

const BUILTIN_CONFIG: &str = include_str!("../config/default.yaml");

/// Smallest `notify.max_chars` that still leaves room for a truncation marker.
const MIN_MESSAGE_CHARS: usize = 64;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceKind,
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
    #[serde(default)]
    pub endpoints: Endpoints,
    pub groups: Vec<QueryGroup>,
    #[serde(default)]
    pub freshness_hours: HashMap<Category, u64>,
    #[serde(default)]
    pub dedup: DedupConfig,
    pub sections: Vec<SectionConfig>,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

/// Which fetch strategy to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Naver Search JSON API (needs client id/secret).
    #[default]
    Api,
    /// Desktop HTML search results page.
    Html,
    /// Mobile HTML search results page.
    MobileHtml,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Endpoints {
    #[serde(default = "default_naver_api")]
    pub naver_api: String,
    #[serde(default = "default_naver_search")]
    pub naver_search: String,
    #[serde(default = "default_naver_mobile_search")]
    pub naver_mobile_search: String,
    #[serde(default = "default_telegram_api")]
    pub telegram_api: String,
}

fn default_page_delay_ms() -> u64 { 300 }
fn default_http_timeout_secs() -> u64 { 10 }
fn default_naver_api() -> String { "https://openapi.naver.com/v1/search/news.json".to_string() }
fn default_naver_search() -> String { "https://search.naver.com/search.naver".to_string() }
fn default_naver_mobile_search() -> String { "https://m.search.naver.com/search.naver".to_string() }
fn default_telegram_api() -> String { "https://api.telegram.org".to_string() }

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            naver_api: default_naver_api(),
            naver_search: default_naver_search(),
            naver_mobile_search: default_naver_mobile_search(),
            telegram_api: default_telegram_api(),
        }
    }
}

/// Category → minimum shared-substring length that marks a near-duplicate.
#[derive(Debug, Clone, Deserialize)]
pub struct DedupConfig {
    #[serde(default = "default_threshold")]
    pub default_threshold: usize,
    #[serde(default)]
    pub thresholds: HashMap<Category, usize>,
}

fn default_threshold() -> usize { 20 }

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            default_threshold: default_threshold(),
            thresholds: HashMap::new(),
        }
    }
}

impl DedupConfig {
    pub fn threshold_for(&self, category: Category) -> usize {
        self.thresholds
            .get(&category)
            .copied()
            .unwrap_or(self.default_threshold)
    }
}

/// One named bucket of the rendered digest.
#[derive(Debug, Clone, Deserialize)]
pub struct SectionConfig {
    /// Header line rendered verbatim, e.g. `<투자손익/금융시장>`.
    pub header: String,
    /// Title keywords that route a record here (empty for the default section).
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Keep only the first N records routed here.
    #[serde(default)]
    pub cap: Option<usize>,
    /// Receives every record no other section claims.
    #[serde(default)]
    pub default: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_report_title")]
    pub title: String,
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_report_title() -> String { "■ News feed".to_string() }
fn default_placeholder() -> String { "(기사 없음)".to_string() }
fn default_date_format() -> String { "%Y-%m-%d".to_string() }

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_report_title(),
            placeholder: default_placeholder(),
            date_format: default_date_format(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotifyConfig {
    /// Telegram rejects messages over 4096 characters.
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
    #[serde(default = "default_true")]
    pub disable_web_page_preview: bool,
    /// `HTML` or `MarkdownV2`; plain text when unset.
    #[serde(default)]
    pub parse_mode: Option<String>,
}

fn default_max_chars() -> usize { 4096 }
fn default_true() -> bool { true }

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
            disable_web_page_preview: true,
            parse_mode: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default)]
    pub skip_weekends: bool,
    #[serde(default)]
    pub holidays: Vec<NaiveDate>,
    #[serde(default = "default_skip_exit_code")]
    pub skip_exit_code: u8,
}

fn default_skip_exit_code() -> u8 { 1 }

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            skip_weekends: false,
            holidays: Vec::new(),
            skip_exit_code: default_skip_exit_code(),
        }
    }
}

impl Config {
    /// Load the configuration from `path`, or the built-in default when `None`.
    #[instrument(level = "info")]
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                info!(path, "Loaded configuration file");
                Self::from_yaml(&text)?
            }
            None => {
                info!("Using built-in configuration");
                Self::builtin()?
            }
        };
        Ok(config)
    }

    pub fn builtin() -> Result<Self> {
        Self::from_yaml(BUILTIN_CONFIG)
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    pub fn freshness_window(&self, category: Category) -> Option<chrono::Duration> {
        self.freshness_hours
            .get(&category)
            .map(|hours| chrono::Duration::hours(*hours as i64))
    }

    fn validate(&self) -> Result<()> {
        if self.groups.is_empty() {
            return Err(DigestError::Config("at least one query group is required".into()));
        }
        for group in &self.groups {
            if group.result_cap == 0 {
                return Err(DigestError::Config(format!(
                    "group `{}`: result_cap must be positive",
                    group.name
                )));
            }
            if group.keywords.is_empty() {
                return Err(DigestError::Config(format!(
                    "group `{}`: at least one keyword is required",
                    group.name
                )));
            }
            if group.keywords.iter().chain(&group.excludes).any(|k| k.is_empty()) {
                return Err(DigestError::Config(format!(
                    "group `{}`: keywords must not be empty strings",
                    group.name
                )));
            }
            if group.keep_first == Some(0) {
                return Err(DigestError::Config(format!(
                    "group `{}`: keep_first must be positive when set",
                    group.name
                )));
            }
        }

        if self.dedup.default_threshold == 0 || self.dedup.thresholds.values().any(|t| *t == 0) {
            return Err(DigestError::Config("dedup thresholds must be at least 1".into()));
        }

        let defaults = self.sections.iter().filter(|s| s.default).count();
        if defaults != 1 {
            return Err(DigestError::Config(format!(
                "exactly one default section is required, found {defaults}"
            )));
        }
        for section in &self.sections {
            if section.default && !section.keywords.is_empty() {
                return Err(DigestError::Config(format!(
                    "default section `{}` must not list keywords",
                    section.header
                )));
            }
            if !section.default && section.keywords.is_empty() {
                return Err(DigestError::Config(format!(
                    "section `{}` needs keywords or `default: true`",
                    section.header
                )));
            }
            if section.keywords.iter().any(|k| k.is_empty()) {
                return Err(DigestError::Config(format!(
                    "section `{}`: keywords must not be empty strings",
                    section.header
                )));
            }
        }

        if StrftimeItems::new(&self.report.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(DigestError::Config(format!(
                "report.date_format `{}` is not a valid strftime pattern",
                self.report.date_format
            )));
        }

        if self.notify.max_chars < MIN_MESSAGE_CHARS {
            return Err(DigestError::Config(format!(
                "notify.max_chars must be at least {MIN_MESSAGE_CHARS}"
            )));
        }
        Ok(())
    }
}

/// Naver Open API application credentials.
#[derive(Clone)]
pub struct NaverCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for NaverCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NaverCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Telegram bot token plus the chat the digest goes to.
#[derive(Clone)]
pub struct TelegramTarget {
    pub bot_token: String,
    pub chat_id: String,
}

impl fmt::Debug for TelegramTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramTarget")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

/// Secrets gathered once at startup and passed down by reference.
///
/// Either half missing is a valid state: no Naver credentials means the
/// HTML strategy is used, no Telegram target means a console-only run.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub naver: Option<NaverCredentials>,
    pub telegram: Option<TelegramTarget>,
}

impl Credentials {
    /// Build from optional raw values; blank strings count as absent.
    pub fn from_parts(
        naver_client_id: Option<String>,
        naver_client_secret: Option<String>,
        telegram_bot_token: Option<String>,
        telegram_chat_id: Option<String>,
    ) -> Self {
        let present = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

        let naver = match (present(naver_client_id), present(naver_client_secret)) {
            (Some(client_id), Some(client_secret)) => Some(NaverCredentials {
                client_id,
                client_secret,
            }),
            _ => None,
        };
        let telegram = match (present(telegram_bot_token), present(telegram_chat_id)) {
            (Some(bot_token), Some(chat_id)) => Some(TelegramTarget { bot_token, chat_id }),
            _ => None,
        };
        Self { naver, telegram }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
groups:
  - name: g
    category: industry
    keywords: ["A사"]
    result_cap: 5
sections:
  - header: "<기타>"
    default: true
"#;

    #[test]
    fn test_builtin_config_parses_and_validates() {
        let config = Config::builtin().unwrap();
        assert_eq!(config.source, SourceKind::Api);
        assert_eq!(config.groups.len(), 2);
        assert_eq!(config.groups[1].keep_first, Some(3));
        assert_eq!(config.dedup.threshold_for(Category::Industry), 20);
        assert_eq!(config.dedup.threshold_for(Category::Market), 30);
        assert_eq!(config.sections.iter().filter(|s| s.default).count(), 1);
        assert_eq!(config.notify.max_chars, 4096);
        assert!(!config.schedule.skip_weekends);
    }

    #[test]
    fn test_minimal_config_fills_defaults() {
        let config = Config::from_yaml(MINIMAL).unwrap();
        assert_eq!(config.page_delay(), Duration::from_millis(300));
        assert_eq!(config.endpoints.telegram_api, "https://api.telegram.org");
        assert_eq!(config.report.placeholder, "(기사 없음)");
        assert_eq!(config.dedup.threshold_for(Category::Market), 20);
        assert!(config.freshness_window(Category::Industry).is_none());
        assert_eq!(config.schedule.skip_exit_code, 1);
    }

    #[test]
    fn test_freshness_window_in_hours() {
        let config = Config::builtin().unwrap();
        assert_eq!(
            config.freshness_window(Category::Market),
            Some(chrono::Duration::hours(24))
        );
    }

    #[test]
    fn test_rejects_zero_result_cap() {
        let yaml = MINIMAL.replace("result_cap: 5", "result_cap: 0");
        let err = Config::from_yaml(&yaml).unwrap_err();
        assert!(matches!(err, DigestError::Config(_)));
    }

    #[test]
    fn test_rejects_missing_default_section() {
        let yaml = MINIMAL.replace("default: true", "keywords: [\"x\"]");
        assert!(matches!(Config::from_yaml(&yaml), Err(DigestError::Config(_))));
    }

    #[test]
    fn test_rejects_zero_threshold() {
        let yaml = format!("{MINIMAL}dedup:\n  default_threshold: 0\n");
        assert!(matches!(Config::from_yaml(&yaml), Err(DigestError::Config(_))));
    }

    #[test]
    fn test_rejects_bad_date_format() {
        let yaml = format!("{MINIMAL}report:\n  date_format: \"%Q\"\n");
        assert!(matches!(Config::from_yaml(&yaml), Err(DigestError::Config(_))));
    }

    #[test]
    fn test_rejects_invalid_yaml() {
        assert!(matches!(Config::from_yaml("groups: ["), Err(DigestError::Yaml(_))));
    }

    #[test]
    fn test_holidays_parse_as_dates() {
        let yaml = format!("{MINIMAL}schedule:\n  holidays: [\"2026-12-25\"]\n");
        let config = Config::from_yaml(&yaml).unwrap();
        assert_eq!(
            config.schedule.holidays,
            vec![NaiveDate::from_ymd_opt(2026, 12, 25).unwrap()]
        );
    }

    #[test]
    fn test_credentials_require_both_halves() {
        let creds = Credentials::from_parts(
            Some("id".into()),
            None,
            Some("token".into()),
            Some("  ".into()),
        );
        assert!(creds.naver.is_none());
        assert!(creds.telegram.is_none());

        let creds = Credentials::from_parts(
            Some("id".into()),
            Some("secret".into()),
            Some("token".into()),
            Some("-100123".into()),
        );
        assert_eq!(creds.naver.unwrap().client_id, "id");
        assert_eq!(creds.telegram.unwrap().chat_id, "-100123");
    }

    #[test]
    fn test_credentials_debug_redacts_secrets() {
        let creds = Credentials::from_parts(
            Some("id".into()),
            Some("s3cret".into()),
            Some("bot-token".into()),
            Some("42".into()),
        );
        let dbg = format!("{creds:?}");
        assert!(!dbg.contains("s3cret"));
        assert!(!dbg.contains("bot-token"));
        assert!(dbg.contains("<redacted>"));
    }
}
