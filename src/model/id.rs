//! Notion id normalization.

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::OnceLock;

fn id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)(?:^|[^0-9a-f])([0-9a-f]{32}|[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12})/?$",
        )
        .expect("valid id regex")
    })
}

/// Normalize a page or block id to the dashed, lowercase UUID form.
///
/// Accepts a dashed UUID, a bare 32-hex id, or a Notion page URL such as
/// `https://www.notion.so/ws/My-Post-0123456789abcdef0123456789abcdef?pvs=4`.
/// The id must end the path, so slug words that look like hex are skipped.
pub fn normalize_id(input: &str) -> Result<String> {
    let trimmed = input.trim();
    let path = trimmed.split(['?', '#']).next().unwrap_or(trimmed);

    let hex: String = id_pattern()
        .captures(path)
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| Error::InvalidId(trimmed.to_string()))?
        .as_str()
        .chars()
        .filter(|c| *c != '-')
        .collect::<String>()
        .to_lowercase();

    Ok(format!(
        "{}-{}-{}-{}-{}",
        &hex[..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..]
    ))
}
