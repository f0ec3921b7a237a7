//! Diagnostic catalog for declaration-synthesis events.
//!
//! The node builder never produces diagnostics itself. It raises categorized
//! events through its symbol tracker; a consumer such as a declaration emitter
//! turns those events into diagnostics using the messages below.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Suggestion,
    Message,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

impl DiagnosticMessage {
    const fn error(code: u32, message: &'static str) -> Self {
        Self {
            code,
            category: DiagnosticCategory::Error,
            message,
        }
    }
}

pub mod diagnostic_messages {
    use super::DiagnosticMessage;

    pub const THE_INFERRED_TYPE_OF_0_REFERENCES_A_TYPE_WITH_A_CYCLIC_STRUCTURE: DiagnosticMessage =
        DiagnosticMessage::error(
            5088,
            "The inferred type of '{0}' references a type with a cyclic structure which cannot be trivially serialized. A type annotation is necessary.",
        );
    pub const THE_INFERRED_TYPE_OF_0_REFERENCES_AN_INACCESSIBLE_1_TYPE: DiagnosticMessage =
        DiagnosticMessage::error(
            2527,
            "The inferred type of '{0}' references an inaccessible '{1}' type. A type annotation is necessary.",
        );
    pub const THE_INFERRED_TYPE_OF_THIS_NODE_EXCEEDS_THE_MAXIMUM_LENGTH: DiagnosticMessage =
        DiagnosticMessage::error(
            7056,
            "The inferred type of this node exceeds the maximum length the compiler will serialize. An explicit type annotation is needed.",
        );
    pub const THE_INFERRED_TYPE_OF_0_CANNOT_BE_NAMED_WITHOUT_A_REFERENCE_TO_1: DiagnosticMessage =
        DiagnosticMessage::error(
            2742,
            "The inferred type of '{0}' cannot be named without a reference to '{1}'. This is likely not portable. A type annotation is necessary.",
        );
    pub const PROPERTY_0_OF_EXPORTED_ANONYMOUS_CLASS_TYPE_MAY_NOT_BE_PRIVATE_OR_PROTECTED: DiagnosticMessage =
        DiagnosticMessage::error(
            4094,
            "Property '{0}' of exported anonymous class type may not be private or protected.",
        );
    pub const THE_TYPE_OF_THIS_NODE_CANNOT_BE_SERIALIZED_BECAUSE_ITS_PROPERTY_0: DiagnosticMessage =
        DiagnosticMessage::error(
            4118,
            "The type of this node cannot be serialized because its property '{0}' cannot be serialized.",
        );
    pub const DECLARATION_AUGMENTS_DECLARATION_IN_ANOTHER_FILE: DiagnosticMessage =
        DiagnosticMessage::error(
            6232,
            "Declaration augments declaration in another file. This cannot be serialized.",
        );
    pub const DECLARATION_REQUIRES_AN_EXPLICIT_TYPE_ANNOTATION: DiagnosticMessage =
        DiagnosticMessage::error(
            9010,
            "Declaration must have an explicit type annotation with --isolatedDeclarations.",
        );
}

/// Every message in the catalog, for lookup by code.
pub const SYNTHESIS_MESSAGES: &[DiagnosticMessage] = &[
    diagnostic_messages::THE_INFERRED_TYPE_OF_0_REFERENCES_A_TYPE_WITH_A_CYCLIC_STRUCTURE,
    diagnostic_messages::THE_INFERRED_TYPE_OF_0_REFERENCES_AN_INACCESSIBLE_1_TYPE,
    diagnostic_messages::THE_INFERRED_TYPE_OF_THIS_NODE_EXCEEDS_THE_MAXIMUM_LENGTH,
    diagnostic_messages::THE_INFERRED_TYPE_OF_0_CANNOT_BE_NAMED_WITHOUT_A_REFERENCE_TO_1,
    diagnostic_messages::PROPERTY_0_OF_EXPORTED_ANONYMOUS_CLASS_TYPE_MAY_NOT_BE_PRIVATE_OR_PROTECTED,
    diagnostic_messages::THE_TYPE_OF_THIS_NODE_CANNOT_BE_SERIALIZED_BECAUSE_ITS_PROPERTY_0,
    diagnostic_messages::DECLARATION_AUGMENTS_DECLARATION_IN_ANOTHER_FILE,
    diagnostic_messages::DECLARATION_REQUIRES_AN_EXPLICIT_TYPE_ANNOTATION,
];

pub fn get_message_template(code: u32) -> Option<&'static str> {
    SYNTHESIS_MESSAGES
        .iter()
        .find(|m| m.code == code)
        .map(|m| m.message)
}

pub fn format_message(message: &str, args: &[&str]) -> String {
    let mut result = message.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}
