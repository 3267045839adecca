use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::models::Channel;

/// Name used when neither the EXTINF title nor `tvg-name` provide one
pub const UNKNOWN_CHANNEL: &str = "Unknown Channel";

const EXTM3U: &str = "#EXTM3U";
const EXTINF: &str = "#EXTINF:";

// Only double-quoted values with letter/hyphen keys are recognised.
static ATTRIBUTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([a-zA-Z-]+)="([^"]+)""#).expect("attribute pattern is valid"));

/// EXTINF line waiting for its URL line
struct PendingEntry<'a> {
    line: &'a str,
    attributes: HashMap<String, String>,
}

/// Parse raw M3U text into channels, in the order their URL lines appear.
///
/// Never fails: URL lines without a preceding `#EXTINF:` are dropped, and
/// comments or unknown directives are skipped without touching pending state.
/// Duplicate stream URLs are kept as separate entries.
pub fn parse(content: &str) -> Vec<Channel> {
    let mut channels = Vec::new();
    let mut pending: Option<PendingEntry> = None;
    let mut orphans = 0usize;

    for line in content.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with(EXTM3U) {
            continue;
        }

        if line.starts_with(EXTINF) {
            pending = Some(PendingEntry {
                line,
                attributes: parse_attributes(line),
            });
        } else if !line.starts_with('#') {
            match pending.take() {
                Some(entry) => channels.push(build_channel(entry, line)),
                None => orphans += 1,
            }
        }
    }

    debug!(
        channels = channels.len(),
        orphan_urls = orphans,
        "parsed m3u playlist"
    );
    channels
}

/// Collect every `key="value"` pair on an EXTINF line. A repeated key keeps its last value.
pub fn parse_attributes(line: &str) -> HashMap<String, String> {
    ATTRIBUTE_RE
        .captures_iter(line)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect()
}

/// Display name: text after the last comma, else `tvg-name`, else [`UNKNOWN_CHANNEL`]
pub fn channel_name(line: &str, attributes: &HashMap<String, String>) -> String {
    line.rfind(',')
        .map(|pos| line[pos + 1..].trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .or_else(|| attributes.get("tvg-name").cloned())
        .unwrap_or_else(|| UNKNOWN_CHANNEL.to_string())
}

fn build_channel(entry: PendingEntry, stream_url: &str) -> Channel {
    let PendingEntry {
        line,
        mut attributes,
    } = entry;
    let name = channel_name(line, &attributes);
    let tvg_name = attributes
        .remove("tvg-name")
        .unwrap_or_else(|| name.clone());

    Channel {
        name,
        stream_url: stream_url.to_string(),
        logo_url: attributes.remove("tvg-logo"),
        group_title: attributes.remove("group-title"),
        country: attributes.remove("tvg-country"),
        language: attributes.remove("tvg-language"),
        tvg_id: attributes.remove("tvg-id"),
        tvg_name: Some(tvg_name),
    }
}
