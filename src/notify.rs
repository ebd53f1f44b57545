//! Telegram delivery of the rendered digest.
//!
//! Delivery is best effort. A missing bot configuration means a
//! console-only run, and a failed POST is logged and otherwise ignored:
//! the digest has already been printed by the time we get here.

use crate::config::{NotifyConfig, TelegramTarget};
use crate::utils::{char_boundary, truncate_for_log};
use reqwest::Client;
use serde::Serialize;
use std::time::Instant;
use tracing::{error, info, instrument, warn};

const TRUNCATION_MARKER: &str = "\n…(truncated)";

/// What happened to the digest on the notification side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// No target configured; nothing was sent.
    Skipped,
    Delivered,
    /// The endpoint refused the message or could not be reached.
    Failed,
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    disable_web_page_preview: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'a str>,
}

/// Fit `text` into `max_chars` characters.
///
/// Oversized text is cut at the last line break that leaves room for the
/// truncation marker (or hard-cut when there is none) and the marker is
/// appended. The result never exceeds `max_chars` characters.
pub fn fit_message(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let marker_chars = TRUNCATION_MARKER.chars().count();
    let budget = max_chars.saturating_sub(marker_chars);
    let head = &text[..char_boundary(text, budget)];
    let cut = match head.rfind('\n') {
        Some(newline) if newline > 0 => &head[..newline],
        _ => head,
    };
    format!("{cut}{TRUNCATION_MARKER}")
}

/// Send `text` to the configured chat, if any.
#[instrument(level = "info", skip_all, fields(chars = text.chars().count()))]
pub async fn send_digest(
    client: &Client,
    api_base: &str,
    target: Option<&TelegramTarget>,
    options: &NotifyConfig,
    text: &str,
) -> NotifyOutcome {
    let Some(target) = target else {
        info!("Telegram not configured; digest was printed to the console only");
        return NotifyOutcome::Skipped;
    };

    let body = fit_message(text, options.max_chars);
    if body.len() != text.len() {
        warn!(max_chars = options.max_chars, "Digest exceeds the message limit; truncated");
    }

    let payload = SendMessage {
        chat_id: &target.chat_id,
        text: &body,
        disable_web_page_preview: options.disable_web_page_preview,
        parse_mode: options.parse_mode.as_deref(),
    };
    let url = format!("{}/bot{}/sendMessage", api_base.trim_end_matches('/'), target.bot_token);

    let t0 = Instant::now();
    match client.post(&url).json(&payload).send().await {
        Ok(response) if response.status().is_success() => {
            info!(elapsed_ms = t0.elapsed().as_millis() as u64, "Telegram message delivered");
            NotifyOutcome::Delivered
        }
        Ok(response) => {
            let status = response.status().as_u16();
            let detail = response.text().await.unwrap_or_default();
            error!(status, response = %truncate_for_log(&detail, 300), "Telegram rejected the message");
            NotifyOutcome::Failed
        }
        Err(e) => {
            // reqwest errors can embed the URL, which carries the bot token.
            error!(error = %e.without_url(), "Telegram request failed");
            NotifyOutcome::Failed
        }
    }
}
