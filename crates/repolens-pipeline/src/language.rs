//! Heuristic rejection of READMEs written mostly in Chinese or Japanese.

/// Only the first this-many characters of a README are sampled.
const SAMPLE_CHARS: usize = 1000;

/// Share of Han/kana characters above which a sample is rejected.
const CJK_RATIO_LIMIT: f64 = 0.1;

const REJECTED_LANGUAGES: [&str; 2] = ["Chinese", "Japanese"];

/// Returns `true` when a repository should be skipped for language reasons.
///
/// A declared language of Chinese or Japanese rejects outright. Otherwise the
/// first 1000 characters of `sample` are scanned and the repository is
/// rejected when more than 10% of them are CJK ideographs or kana. Hangul
/// does not count.
#[must_use]
pub fn should_reject(sample: &str, declared_language: Option<&str>) -> bool {
    if declared_language.is_some_and(|lang| {
        REJECTED_LANGUAGES
            .iter()
            .any(|rejected| lang.eq_ignore_ascii_case(rejected))
    }) {
        return true;
    }

    let mut total = 0usize;
    let mut cjk = 0usize;
    for c in sample.chars().take(SAMPLE_CHARS) {
        total += 1;
        if is_han_or_kana(c) {
            cjk += 1;
        }
    }
    if total == 0 {
        return false;
    }

    #[allow(clippy::cast_precision_loss)]
    let ratio = cjk as f64 / total as f64;
    ratio > CJK_RATIO_LIMIT
}

fn is_han_or_kana(c: char) -> bool {
    matches!(c, '\u{4E00}'..='\u{9FFF}' | '\u{3040}'..='\u{30FF}')
}
