use crate::Error;
use crate::tracing_config::{LogFormat, filter_directives, init_tracing};
use tracing_subscriber::EnvFilter;
use unravel_common::TransformOptions;
use unravel_parser::ProgramTree;

#[test]
fn test_log_format_names() {
    assert_eq!(LogFormat::parse("tree"), LogFormat::Tree);
    assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
    assert_eq!(LogFormat::parse("text"), LogFormat::Text);
    assert_eq!(LogFormat::parse(""), LogFormat::Text);
    assert_eq!(LogFormat::parse("yaml"), LogFormat::Text);
}

#[test]
fn test_presets_expand_to_rewrite_targets() {
    assert_eq!(filter_directives("rewrites"), "unravel::rewrite=debug");
    assert_eq!(filter_directives(" temps "), "unravel::rewrite=debug,unravel::temps=trace");
    for preset in ["rewrites", "temps"] {
        let directives = filter_directives(preset);
        assert!(EnvFilter::try_new(directives.as_ref()).is_ok(), "{preset}: {directives}");
    }
}

#[test]
fn test_other_filters_pass_through() {
    assert_eq!(filter_directives("unravel_emitter=trace"), "unravel_emitter=trace");
    assert_eq!(filter_directives("debug"), "debug");
}

#[test]
fn test_init_tracing_twice_is_harmless() {
    init_tracing();
    init_tracing();
    let tree = crate::transform(ProgramTree::empty(), &TransformOptions::default())
        .unwrap_or_else(|err| panic!("empty program failed: {err}"));
    assert!(tree.body().is_empty());
}

#[test]
fn test_errors_convert_into_facade_error() {
    let err = crate::transform(ProgramTree::empty(), &TransformOptions::with_prefix("9"))
        .expect_err("prefix starting with a digit");
    assert!(matches!(err, Error::Transform(_)));
    assert!(err.to_string().contains("namePrefix"));
}
