//! Cleans model output into text that is safe to splice into an image prompt.
//!
//! Every step is a pure function; [`sanitize`] folds them in order and stops
//! at the first one that rejects the text.

use std::sync::LazyLock;

use regex::Regex;

/// Phrase every composed prompt starts with.
pub const QUALITY_PREFIX: &str = "masterpiece, best quality, 4k";

/// Phrases the model uses to say it could not answer.
pub const FAILURE_MARKERS: [&str; 3] = ["추출 불가", "요약 불가", "컨셉 없음"];

static PARENTHESIZED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(.*?\)").expect("valid regex"));
static BRACKETED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.*?\]").expect("valid regex"));
static LABEL_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z\x{AC00}-\x{D7AF} ]+:").expect("valid regex"));
static LET_ME_KNOW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Let me know [^,]+").expect("valid regex"));
static HERE_ARE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Here are [^,]+").expect("valid regex"));
static OTHER_SYMBOL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{So}").expect("valid regex"));

type Step = fn(String) -> Option<String>;

const STEPS: [Step; 10] = [
    reject_blank,
    reject_failure_markers,
    strip_bracketed,
    strip_bold,
    flatten_newlines,
    swap_double_quotes,
    strip_label_prefixes,
    strip_chatter,
    strip_symbols,
    trim_commas,
];

/// Runs the full cleaning pipeline. `None` means nothing usable remains.
#[must_use]
pub fn sanitize(raw: &str) -> Option<String> {
    STEPS
        .iter()
        .try_fold(raw.to_string(), |text, step| step(text))
}

/// Joins the quality prefix with the sanitized concept and title.
///
/// Returns `None` when neither part survives sanitizing, in which case no
/// image should be generated.
#[must_use]
pub fn compose_prompt(title: Option<&str>, concept: Option<&str>) -> Option<String> {
    let parts: Vec<String> = [concept, title]
        .into_iter()
        .flatten()
        .filter_map(sanitize)
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(format!("{QUALITY_PREFIX}, {}", parts.join(", ")))
}

pub fn reject_blank(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

pub fn reject_failure_markers(text: String) -> Option<String> {
    if FAILURE_MARKERS.iter().any(|m| text.contains(m)) {
        None
    } else {
        Some(text)
    }
}

/// Removes `(...)` and `[...]` spans, shortest match first.
#[allow(clippy::unnecessary_wraps)]
pub fn strip_bracketed(text: String) -> Option<String> {
    let text = PARENTHESIZED_RE.replace_all(&text, "");
    Some(BRACKETED_RE.replace_all(&text, "").into_owned())
}

#[allow(clippy::unnecessary_wraps)]
pub fn strip_bold(text: String) -> Option<String> {
    Some(text.replace("**", ""))
}

#[allow(clippy::unnecessary_wraps)]
pub fn flatten_newlines(text: String) -> Option<String> {
    Some(text.replace(['\n', '\r'], " "))
}

#[allow(clippy::unnecessary_wraps)]
pub fn swap_double_quotes(text: String) -> Option<String> {
    Some(text.replace('"', "'"))
}

/// Deletes `Label:` runs such as `Title:` or `설명:`.
#[allow(clippy::unnecessary_wraps)]
pub fn strip_label_prefixes(text: String) -> Option<String> {
    Some(LABEL_PREFIX_RE.replace_all(&text, "").into_owned())
}

/// Deletes conversational filler up to, not including, the next comma.
#[allow(clippy::unnecessary_wraps)]
pub fn strip_chatter(text: String) -> Option<String> {
    let text = LET_ME_KNOW_RE.replace_all(&text, "");
    Some(HERE_ARE_RE.replace_all(&text, "").into_owned())
}

/// Deletes emoji and other `So` category symbols.
#[allow(clippy::unnecessary_wraps)]
pub fn strip_symbols(text: String) -> Option<String> {
    Some(OTHER_SYMBOL_RE.replace_all(&text, "").into_owned())
}

pub fn trim_commas(text: String) -> Option<String> {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_prefix(',').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix(',').unwrap_or(trimmed).trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
#[path = "sanitize_test.rs"]
mod tests;
