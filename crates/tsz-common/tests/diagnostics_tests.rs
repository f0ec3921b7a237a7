use tsz_common::diagnostics::{diagnostic_messages, get_message_template};
use tsz_common::{DiagnosticCategory, format_message};

#[test]
fn test_lookup_by_code() {
    assert_eq!(
        get_message_template(7056),
        Some(diagnostic_messages::THE_INFERRED_TYPE_OF_THIS_NODE_EXCEEDS_THE_MAXIMUM_LENGTH.message)
    );
    assert_eq!(get_message_template(1), None);
}

#[test]
fn test_format_message_substitutes_positional_args() {
    let msg = diagnostic_messages::THE_INFERRED_TYPE_OF_0_CANNOT_BE_NAMED_WITHOUT_A_REFERENCE_TO_1;
    let text = format_message(msg.message, &["x", "./node_modules/foo"]);
    assert!(text.starts_with("The inferred type of 'x' cannot be named"));
    assert!(text.contains("'./node_modules/foo'"));
    assert_eq!(msg.category, DiagnosticCategory::Error);
}
