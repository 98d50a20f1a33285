use super::*;

#[test]
fn test_source_name() {
    assert_eq!(Source::new("1").with_name("b").name(), "b");
    assert_eq!(Source::new("1").name(), "");
}

#[test]
fn test_detached_id() {
    assert!(SourceId::DETACHED.is_detached());
    assert!(!SourceId::new(0).is_detached());
}

#[test]
fn test_source_line() {
    let source = Source::new("first\nsecond\n");
    assert_eq!(source.line(1), Some("first"));
    assert_eq!(source.line(2), Some("second"));
    assert_eq!(source.line(0), None);
    assert_eq!(source.line(3), None);
}

#[test]
fn test_snippet_single_line() {
    let source = Source::new("8 + 12");
    let span = Span::from_coords(1, 4, 1, 6, SourceId::new(0));
    assert_eq!(source.snippet(span), Some("12"));
}

#[test]
fn test_snippet_rejects_multi_line() {
    let source = Source::new("a\nb");
    let span = Span::from_coords(1, 0, 2, 1, SourceId::new(0));
    assert_eq!(source.snippet(span), None);
}

#[test]
fn test_end_position() {
    assert_eq!(Source::new("8 + 12").end_position(), Position::new(1, 6));
    assert_eq!(Source::new("a\nbc").end_position(), Position::new(2, 2));
    assert_eq!(Source::new("").end_position(), Position::new(1, 0));
}

#[test]
fn test_source_path() {
    let source = Source::new("").with_path("calc/main.calc");
    assert_eq!(
        source.path().and_then(|p| p.to_str()),
        Some("calc/main.calc")
    );
}
