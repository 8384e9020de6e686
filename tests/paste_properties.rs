use pastewise::{
    handle_paste, normalize_paste, process_paste_content, tidy_markdown, ClipboardPayload,
    CursorRegion, PasteContext, PasteSettings,
};

const ARTICLE: &str = r#"<html><body><!--StartFragment-->
<h1>Release notes</h1>
<p>Highlights of <strong>this</strong> release:</p>
<ul>
  <li><p>Faster startup</p></li>
  <li>
    <div></div>
    <p>Smaller binaries</p>
    <ul><li>stripped debug info</li></ul>
  </li>
</ul>
<pre><code class="language-sh">cargo install pastewise
</code></pre>
<!--EndFragment--></body></html>"#;

#[test]
fn output_is_deterministic() {
    for in_code in [false, true] {
        let first = process_paste_content("fallback", Some(ARTICLE), in_code);
        let second = process_paste_content("fallback", Some(ARTICLE), in_code);
        assert_eq!(first, second);
    }
}

#[test]
fn code_region_keeps_indentation() {
    let out = process_paste_content("", Some("<pre>  line1\n\n\n  line2</pre>"), true);
    assert_eq!(out, "  line1\n  line2");
}

#[test]
fn code_region_without_html_trims_newlines() {
    assert_eq!(process_paste_content("\n\nhello\n\n", None, true), "hello");
}

#[test]
fn list_converts_to_compact_bullets() {
    assert_eq!(process_paste_content("A\nB", Some("<ul><li>A</li><li>B</li></ul>"), false), "- A\n- B");
}

#[test]
fn failed_conversion_returns_text_unmodified() {
    let text = "  original\n\n\n\ntext\n";
    let html = "<div>".repeat(2000);
    assert_eq!(process_paste_content(text, Some(&html), false), text);
}

#[test]
fn plain_text_collapses_blank_runs() {
    assert_eq!(process_paste_content("a\n\n\n\nb", None, false), "a\n\nb");
}

#[test]
fn tidy_is_idempotent_on_converted_markdown() {
    let converted = process_paste_content("", Some(ARTICLE), false);
    assert_eq!(tidy_markdown(&converted), converted);
}

#[test]
fn article_converts_to_markdown() {
    let converted = process_paste_content("", Some(ARTICLE), false);
    let lines: Vec<&str> = converted.lines().collect();
    assert_eq!(
        &lines[..5],
        &[
            "# Release notes",
            "",
            "Highlights of **this** release:",
            "- Faster startup",
            "- Smaller binaries",
        ],
        "{}",
        converted
    );
    assert!(lines[5].starts_with(' '), "{}", converted);
    assert_eq!(lines[5].trim_start(), "- stripped debug info");
    assert!(converted.contains("```"), "{}", converted);
    assert!(converted.contains("\ncargo install pastewise\n"), "{}", converted);
    assert!(converted.ends_with("```"), "{}", converted);
}

#[test]
fn comment_only_html_keeps_the_text() {
    let out = process_paste_content("kept\n\n\n\nline", Some("<!--StartFragment--><!--EndFragment-->"), false);
    assert_eq!(out, "kept\n\nline");
}

#[test]
fn article_in_code_block_uses_pre_content() {
    let payload = ClipboardPayload::new("fallback").with_html(ARTICLE);
    let out = normalize_paste(&payload, PasteContext::from(CursorRegion::CodeBlock));
    assert_eq!(out, "cargo install pastewise");
}

#[test]
fn host_flow_respects_settings() {
    let payload = ClipboardPayload::new("one\n\n\n\ntwo\n");
    let on = PasteSettings::default();
    let off = PasteSettings { enabled: false };
    assert_eq!(handle_paste(&on, &payload, CursorRegion::Normal), Some("one\n\ntwo".to_string()));
    assert_eq!(handle_paste(&off, &payload, CursorRegion::Normal), None);
}
