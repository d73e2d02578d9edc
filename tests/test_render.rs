use lj::render::{FIELD_LINE_WIDTH, MESSAGE_INDENT, format_timestamp};
use lj::{FilterList, Highlights, RenderConfig, decode_line, render, render_line};

fn plain(lines: &[lj::Line]) -> Vec<String> {
    lines.iter().map(|line| line.paint(false)).collect()
}

#[test]
fn test_decode_then_render_warn_record() {
    let record = decode_line(r#"{"msg":"hello","level":"warn","ts":1700000000.123456,"x":1}"#);
    let lines = render(&record, &RenderConfig::default()).expect("record should render");
    let text = plain(&lines);

    let (date, millis) = format_timestamp(1700000000.123456);
    assert!(text[0].contains(" WARN "));
    assert!(text[0].contains(&format!("[ {date}.{millis} ]")));
    assert!(text[0].ends_with("hello"));
    assert_eq!(text[1].trim_start_matches('▎').trim(), "x:1");
}

#[test]
fn test_record_without_message_is_not_rendered() {
    assert!(render_line(r#"{"level":"info","x":1}"#, &RenderConfig::default()).is_none());
}

#[test]
fn test_wide_field_block_wraps() {
    let mut object = serde_json::Map::new();
    object.insert("msg".into(), "many fields".into());
    for i in 0..20 {
        object.insert(format!("key_{i}"), format!("value number {i}").into());
    }
    let line = serde_json::Value::Object(object).to_string();

    let lines = render_line(&line, &RenderConfig::default()).expect("record should render");
    let field_lines = &lines[1..];
    assert!(field_lines.len() > 1);

    for field_line in field_lines {
        let content = field_line.plain();
        let content = &content["▎".len()..];
        assert!(content.starts_with(&" ".repeat(MESSAGE_INDENT)));
        assert!(content.trim_start().chars().count() <= FIELD_LINE_WIDTH);
    }

    let joined: String = field_lines.iter().map(|l| l.plain()).collect();
    for i in 0..20 {
        assert!(joined.contains(&format!("key_{i}:\"value number {i}\"")));
    }
}

#[test]
fn test_highlight_and_filters_together() {
    let config = RenderConfig::new(
        FilterList::parse(["level:!debug"]),
        Highlights::new(["fail"]),
        false,
    );

    let lines = render_line(r#"{"msg":"task fail: fail again","level":"error"}"#, &config)
        .expect("record should render");
    assert!(lines[0].plain().ends_with("task fail: fail again"));

    assert!(render_line(r#"{"msg":"task fail","level":"debug"}"#, &config).is_none());
}

#[test]
fn test_plain_text_strict_and_lenient() {
    let lenient = RenderConfig::default();
    let strict = RenderConfig::new(FilterList::new(), Highlights::default(), true);

    let lines = render_line("plain text", &lenient).expect("passthrough should render");
    assert_eq!(plain(&lines), vec!["▎plain text".to_string()]);
    assert!(render_line("plain text", &strict).is_none());
}
