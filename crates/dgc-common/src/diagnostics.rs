//! Diagnostic records and message lookup.
//!
//! The resolver never formats user-facing text itself: it records typed
//! errors, and callers turn those into `Diagnostic`s through the message
//! table below. Templates use `{0}`, `{1}`, ... placeholders that are filled
//! by [`format_message`].

use serde::Serialize;

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Suggestion = 2,
    Message = 3,
}

/// Related information for a diagnostic (e.g. a candidate binding).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiagnosticRelatedInformation {
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
}

/// A resolution diagnostic with optional related information.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
    /// Related information spans (e.g. where a conflicting binding was declared)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related_information: Vec<DiagnosticRelatedInformation>,
}

impl Diagnostic {
    /// Create a diagnostic whose category comes from the message table.
    ///
    /// Unknown codes are treated as errors.
    #[must_use]
    pub fn new(file: String, start: u32, length: u32, message: String, code: u32) -> Self {
        Self {
            file,
            start,
            length,
            message_text: message,
            category: get_diagnostic_category(code).unwrap_or(DiagnosticCategory::Error),
            code,
            related_information: Vec::new(),
        }
    }

    /// Create a new error diagnostic.
    #[must_use]
    pub const fn error(file: String, start: u32, length: u32, message: String, code: u32) -> Self {
        Self {
            file,
            start,
            length,
            message_text: message,
            category: DiagnosticCategory::Error,
            code,
            related_information: Vec::new(),
        }
    }

    /// Add related information to this diagnostic.
    #[must_use]
    pub fn with_related(mut self, file: String, start: u32, length: u32, message: String) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            file,
            start,
            length,
            message_text: message,
            category: DiagnosticCategory::Message,
            code: 0,
        });
        self
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

/// A diagnostic message definition with code, category, and message template.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

pub mod diagnostic_codes {
    pub const NO_BINDING_FOUND: u32 = 1001;
    pub const AMBIGUOUS_BINDINGS: u32 = 1002;
    pub const SCOPE_MISMATCH: u32 = 1003;
    pub const MULTIPLE_INJECTABLE_CONSTRUCTORS: u32 = 1004;
    pub const RESOLUTION_TOO_DEEP: u32 = 1005;
    pub const INVALID_BINDS_FUNCTION: u32 = 1006;
    pub const MISSING_MODULE_MARKER: u32 = 2001;
    pub const UNIT_PROVISION: u32 = 2002;
    pub const CANDIDATE_BINDING: u32 = 3001;
}

use diagnostic_codes as codes;

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage {
        code: codes::NO_BINDING_FOUND,
        category: DiagnosticCategory::Error,
        message: "No binding found for '{0}'.",
    },
    DiagnosticMessage {
        code: codes::AMBIGUOUS_BINDINGS,
        category: DiagnosticCategory::Error,
        message: "'{0}' is bound multiple times: {1}.",
    },
    DiagnosticMessage {
        code: codes::SCOPE_MISMATCH,
        category: DiagnosticCategory::Error,
        message: "Binding for '{0}' is scoped with {1}, but the component only declares {2}.",
    },
    DiagnosticMessage {
        code: codes::MULTIPLE_INJECTABLE_CONSTRUCTORS,
        category: DiagnosticCategory::Error,
        message: "Type '{0}' declares more than one injectable constructor.",
    },
    DiagnosticMessage {
        code: codes::RESOLUTION_TOO_DEEP,
        category: DiagnosticCategory::Error,
        message: "Resolving '{0}' exceeded the maximum dependency depth of {1}.",
    },
    DiagnosticMessage {
        code: codes::INVALID_BINDS_FUNCTION,
        category: DiagnosticCategory::Error,
        message: "Binds function '{0}' must declare exactly one parameter, found {1}.",
    },
    DiagnosticMessage {
        code: codes::MISSING_MODULE_MARKER,
        category: DiagnosticCategory::Warning,
        message: "'{0}' is listed as a module but is not marked as one.",
    },
    DiagnosticMessage {
        code: codes::UNIT_PROVISION,
        category: DiagnosticCategory::Warning,
        message: "Provider function '{0}' returns Unit and contributes no binding.",
    },
    DiagnosticMessage {
        code: codes::CANDIDATE_BINDING,
        category: DiagnosticCategory::Message,
        message: "Candidate binding '{0}' declared here.",
    },
];

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

/// Look up a diagnostic message definition by code.
#[must_use]
pub fn get_diagnostic_message(code: u32) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code)
}

/// Get the message template for a diagnostic code.
#[must_use]
pub fn get_message_template(code: u32) -> Option<&'static str> {
    get_diagnostic_message(code).map(|m| m.message)
}

/// Get the category for a diagnostic code.
#[must_use]
pub fn get_diagnostic_category(code: u32) -> Option<DiagnosticCategory> {
    get_diagnostic_message(code).map(|m| m.category)
}
