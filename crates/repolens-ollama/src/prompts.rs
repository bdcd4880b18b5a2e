//! Prompt construction and response cleanup for README analysis.

use std::sync::LazyLock;

use regex::Regex;

/// READMEs longer than this many characters are cut and suffixed with `...`.
pub const MAX_README_CHARS: usize = 8192;

/// Concept used when the model gives no usable scene description.
pub const DEFAULT_IMAGE_CONCEPT: &str = "A futuristic computer terminal with glowing code";

/// Han ideographs, kana and fullwidth forms. Hangul is outside these ranges.
static NON_KOREAN_CJK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\x{4E00}-\x{9FFF}\x{3040}-\x{30FF}\x{FF00}-\x{FFEF}]").expect("valid regex")
});

/// Cuts `content` to [`MAX_README_CHARS`] characters.
#[must_use]
pub fn truncate_readme(content: &str) -> String {
    match content.char_indices().nth(MAX_README_CHARS) {
        Some((byte_idx, _)) => format!("{}...", &content[..byte_idx]),
        None => content.to_string(),
    }
}

#[must_use]
pub fn title_prompt(readme: &str) -> String {
    format!(
        "Extract the official H1(#) title from this GitHub README text. \
         Respond with ONLY the title text. No markdown, no explanations.\n\n{readme}"
    )
}

#[must_use]
pub fn summary_prompt(readme: &str) -> String {
    format!(
        "You are a strict summarizer. Read the GitHub README below and summarize \
         'what this project is' in ONE Korean sentence (around 70 characters).\n\
         Rules:\n\
         1. MUST respond in KOREAN only.\n\
         2. Do NOT start with 'This project is...' or 'Based on...'.\n\
         3. Just output the summary directly.\n\
         \n\
         --- README ---\n\
         {readme}"
    )
}

#[must_use]
pub fn scene_prompt(readme: &str) -> String {
    format!(
        "Based on this GitHub README, describe a concrete 'Visual Scene' to generate a cover image.\n\
         Instructions:\n\
         1. If it's a GAME: Describe the main character, enemy, or gameplay action \
         (e.g., 'A cute pixel knight fighting a dragon', 'A spaceship flying in stars').\n\
         2. If it's a WEB/APP: Describe the UI or screen \
         (e.g., 'A mobile phone showing a chat app', 'A clean dashboard monitor with charts').\n\
         3. If it's a LIBRARY/TOOL: Describe a physical object or mascot representing it \
         (e.g., 'A robot arm coding', 'A glowing database server').\n\
         \n\
         IMPORTANT: Respond with ONLY the English description (max 15 words). \
         Do NOT use abstract words like 'future, abstract, connection'. Be specific!\n\n\
         --- README Start ---\n\
         {readme}"
    )
}

/// Trimmed title, or `None` when the model answered with nothing.
#[must_use]
pub fn clean_title(response: &str) -> Option<String> {
    non_blank(response.trim())
}

/// Drops double quotes and non-Korean CJK characters from a summary.
#[must_use]
pub fn clean_summary(response: &str) -> Option<String> {
    let unquoted = response.replace('"', "");
    let stripped = NON_KOREAN_CJK_RE.replace_all(&unquoted, "");
    non_blank(stripped.trim())
}

/// Trimmed, unquoted scene description, or [`DEFAULT_IMAGE_CONCEPT`].
#[must_use]
pub fn clean_concept(response: &str) -> String {
    let cleaned = response.trim().replace('"', "");
    if cleaned.trim().is_empty() {
        DEFAULT_IMAGE_CONCEPT.to_string()
    } else {
        cleaned
    }
}

fn non_blank(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
