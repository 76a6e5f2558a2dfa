//! Message table for every issue the analyzer can raise.
//!
//! Codes are stable; templates use `{0}`, `{1}` placeholders filled in by
//! [`super::format_message`].

use super::{DiagnosticCategory, DiagnosticMessage};

pub mod diagnostic_codes {
    pub const INVALID_SCOPE: u32 = 1001;
    pub const NULL_REFERENCE: u32 = 1002;
    pub const POSSIBLY_NULL_REFERENCE: u32 = 1003;
    pub const POSSIBLY_FALSE_REFERENCE: u32 = 1004;
    pub const POSSIBLY_INVALID_METHOD_CALL: u32 = 1005;
    pub const INVALID_METHOD_CALL: u32 = 1006;
    pub const UNDEFINED_MAGIC_METHOD: u32 = 1007;
    pub const POSSIBLY_UNDEFINED_METHOD: u32 = 1008;
    pub const UNDEFINED_METHOD: u32 = 1009;
    pub const UNDEFINED_INTERFACE_METHOD: u32 = 1010;
    pub const UNDEFINED_CLASS: u32 = 1011;
    pub const INACCESSIBLE_METHOD: u32 = 1012;
    pub const MIXED_METHOD_CALL: u32 = 1013;
    pub const TOO_FEW_ARGUMENTS: u32 = 1014;
    pub const TOO_MANY_ARGUMENTS: u32 = 1015;
}

pub mod diagnostic_messages {
    pub const USE_OF_THIS_IN_NON_CLASS_CONTEXT: &str = "Use of $this in non-class context";
    pub const CANNOT_CALL_METHOD_ON_NULL_VALUE: &str = "Cannot call method {0} on null value";
    pub const CANNOT_CALL_METHOD_ON_POSSIBLY_NULL_VALUE: &str =
        "Cannot call method {0} on possibly null value";
    pub const CANNOT_CALL_METHOD_ON_POSSIBLY_FALSE_VALUE: &str =
        "Cannot call method {0} on possibly false value";
    pub const CANNOT_CALL_METHOD_ON_POSSIBLE_VARIABLE: &str =
        "Cannot call method on possible {0} variable {1}";
    pub const CANNOT_CALL_METHOD_ON_VARIABLE: &str = "Cannot call method on {0} variable {1}";
    pub const MAGIC_METHOD_DOES_NOT_EXIST: &str = "Magic method {0} does not exist";
    pub const METHOD_DOES_NOT_EXIST: &str = "Method {0} does not exist";
    pub const CLASS_OR_INTERFACE_DOES_NOT_EXIST: &str = "Class or interface {0} does not exist";
    pub const CANNOT_ACCESS_METHOD_FROM_CONTEXT: &str =
        "Cannot access {0} method {1} from context {2}";
    pub const CANNOT_DETERMINE_TYPE_OF_RECEIVER: &str =
        "Cannot determine the type of the object on the left hand side of {0}";
    pub const TOO_FEW_ARGUMENTS_FOR_METHOD: &str =
        "Too few arguments for method {0} - expecting {1} but saw {2}";
    pub const TOO_MANY_ARGUMENTS_FOR_METHOD: &str =
        "Too many arguments for method {0} - expecting {1} but saw {2}";
}

use diagnostic_codes as c;
use diagnostic_messages as m;

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage {
        code: c::INVALID_SCOPE,
        category: DiagnosticCategory::Error,
        message: m::USE_OF_THIS_IN_NON_CLASS_CONTEXT,
    },
    DiagnosticMessage {
        code: c::NULL_REFERENCE,
        category: DiagnosticCategory::Error,
        message: m::CANNOT_CALL_METHOD_ON_NULL_VALUE,
    },
    DiagnosticMessage {
        code: c::POSSIBLY_NULL_REFERENCE,
        category: DiagnosticCategory::Warning,
        message: m::CANNOT_CALL_METHOD_ON_POSSIBLY_NULL_VALUE,
    },
    DiagnosticMessage {
        code: c::POSSIBLY_FALSE_REFERENCE,
        category: DiagnosticCategory::Warning,
        message: m::CANNOT_CALL_METHOD_ON_POSSIBLY_FALSE_VALUE,
    },
    DiagnosticMessage {
        code: c::POSSIBLY_INVALID_METHOD_CALL,
        category: DiagnosticCategory::Warning,
        message: m::CANNOT_CALL_METHOD_ON_POSSIBLE_VARIABLE,
    },
    DiagnosticMessage {
        code: c::INVALID_METHOD_CALL,
        category: DiagnosticCategory::Error,
        message: m::CANNOT_CALL_METHOD_ON_VARIABLE,
    },
    DiagnosticMessage {
        code: c::UNDEFINED_MAGIC_METHOD,
        category: DiagnosticCategory::Error,
        message: m::MAGIC_METHOD_DOES_NOT_EXIST,
    },
    DiagnosticMessage {
        code: c::POSSIBLY_UNDEFINED_METHOD,
        category: DiagnosticCategory::Warning,
        message: m::METHOD_DOES_NOT_EXIST,
    },
    DiagnosticMessage {
        code: c::UNDEFINED_METHOD,
        category: DiagnosticCategory::Error,
        message: m::METHOD_DOES_NOT_EXIST,
    },
    DiagnosticMessage {
        code: c::UNDEFINED_INTERFACE_METHOD,
        category: DiagnosticCategory::Error,
        message: m::METHOD_DOES_NOT_EXIST,
    },
    DiagnosticMessage {
        code: c::UNDEFINED_CLASS,
        category: DiagnosticCategory::Error,
        message: m::CLASS_OR_INTERFACE_DOES_NOT_EXIST,
    },
    DiagnosticMessage {
        code: c::INACCESSIBLE_METHOD,
        category: DiagnosticCategory::Error,
        message: m::CANNOT_ACCESS_METHOD_FROM_CONTEXT,
    },
    DiagnosticMessage {
        code: c::MIXED_METHOD_CALL,
        category: DiagnosticCategory::Warning,
        message: m::CANNOT_DETERMINE_TYPE_OF_RECEIVER,
    },
    DiagnosticMessage {
        code: c::TOO_FEW_ARGUMENTS,
        category: DiagnosticCategory::Error,
        message: m::TOO_FEW_ARGUMENTS_FOR_METHOD,
    },
    DiagnosticMessage {
        code: c::TOO_MANY_ARGUMENTS,
        category: DiagnosticCategory::Error,
        message: m::TOO_MANY_ARGUMENTS_FOR_METHOD,
    },
];
