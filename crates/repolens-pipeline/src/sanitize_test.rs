use super::*;

fn s(text: &str) -> String {
    text.to_string()
}

// ---------------------------------------------------------------------------
// Individual steps
// ---------------------------------------------------------------------------

#[test]
fn reject_blank_drops_whitespace_only() {
    assert!(reject_blank(s(" \n\t")).is_none());
    assert_eq!(reject_blank(s(" x ")).as_deref(), Some(" x "));
}

#[test]
fn reject_failure_markers_matches_anywhere() {
    for marker in FAILURE_MARKERS {
        assert!(reject_failure_markers(format!("제목: {marker}입니다")).is_none());
    }
    assert!(reject_failure_markers(s("정상 요약")).is_some());
}

#[test]
fn strip_bracketed_is_non_greedy() {
    assert_eq!(
        strip_bracketed(s("a (b) c (d) e [f] g")).as_deref(),
        Some("a  c  e  g")
    );
}

#[test]
fn strip_bracketed_does_not_span_lines() {
    assert_eq!(strip_bracketed(s("(open\nclose)")).as_deref(), Some("(open\nclose)"));
}

#[test]
fn flatten_newlines_replaces_each_break() {
    assert_eq!(flatten_newlines(s("a\r\nb")).as_deref(), Some("a  b"));
}

#[test]
fn swap_double_quotes_uses_single_quotes() {
    assert_eq!(swap_double_quotes(s("say \"hi\"")).as_deref(), Some("say 'hi'"));
}

#[test]
fn strip_label_prefixes_handles_latin_and_hangul() {
    assert_eq!(strip_label_prefixes(s("Title: Widget")).as_deref(), Some(" Widget"));
    assert_eq!(strip_label_prefixes(s("장면 설명: 빛나는 기어")).as_deref(), Some(" 빛나는 기어"));
}

#[test]
fn strip_chatter_stops_at_comma() {
    assert_eq!(
        strip_chatter(s("a gear, let me know if you need more, blue")).as_deref(),
        Some("a gear, , blue")
    );
    assert_eq!(
        strip_chatter(s("Here are some ideas, a gear")).as_deref(),
        Some(", a gear")
    );
}

#[test]
fn strip_symbols_removes_emoji() {
    assert_eq!(strip_symbols(s("gear ⚙ rocket 🚀")).as_deref(), Some("gear  rocket "));
}

#[test]
fn trim_commas_strips_one_leading_and_trailing_comma() {
    assert_eq!(trim_commas(s(" , a gear, ")).as_deref(), Some("a gear"));
    assert!(trim_commas(s(" , ")).is_none());
}

// ---------------------------------------------------------------------------
// Full pipeline
// ---------------------------------------------------------------------------

#[test]
fn sanitize_strips_note_and_bold() {
    assert_eq!(sanitize("(note) **Title**").as_deref(), Some("Title"));
}

#[test]
fn sanitize_failure_marker_is_none() {
    assert!(sanitize("추출 불가").is_none());
}

#[test]
fn sanitize_blank_is_none() {
    assert!(sanitize("   ").is_none());
}

#[test]
fn sanitize_label_only_is_none() {
    assert!(sanitize("Scene:").is_none());
}

#[test]
fn sanitize_chatty_answer() {
    assert_eq!(
        sanitize("Here are the details, **A glowing gear** [v2]\nspinning ✨").as_deref(),
        Some("A glowing gear  spinning")
    );
}

#[test]
fn sanitize_is_idempotent_on_clean_text() {
    let once = sanitize("a glowing gear").expect("clean");
    assert_eq!(sanitize(&once).as_deref(), Some(once.as_str()));
}

// ---------------------------------------------------------------------------
// compose_prompt
// ---------------------------------------------------------------------------

#[test]
fn compose_prompt_nothing_usable_is_none() {
    assert!(compose_prompt(None, None).is_none());
    assert!(compose_prompt(Some("요약 불가"), Some("  ")).is_none());
}

#[test]
fn compose_prompt_title_only() {
    assert_eq!(
        compose_prompt(Some("App"), None).as_deref(),
        Some("masterpiece, best quality, 4k, App")
    );
}

#[test]
fn compose_prompt_concept_precedes_title() {
    assert_eq!(
        compose_prompt(Some("Widget"), Some("a glowing gear")).as_deref(),
        Some("masterpiece, best quality, 4k, a glowing gear, Widget")
    );
}
