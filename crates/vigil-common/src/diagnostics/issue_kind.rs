use serde::{Deserialize, Serialize};

use super::data::diagnostic_codes as codes;
use super::{DiagnosticCategory, get_diagnostic_category};

/// Every issue the method-call core and its collaborators can raise.
///
/// Serialized by name, which is also the key used in configuration files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueKind {
    InvalidScope,
    NullReference,
    PossiblyNullReference,
    PossiblyFalseReference,
    PossiblyInvalidMethodCall,
    InvalidMethodCall,
    UndefinedMagicMethod,
    PossiblyUndefinedMethod,
    UndefinedMethod,
    UndefinedInterfaceMethod,
    UndefinedClass,
    InaccessibleMethod,
    MixedMethodCall,
    TooFewArguments,
    TooManyArguments,
}

impl IssueKind {
    pub const ALL: [IssueKind; 15] = [
        IssueKind::InvalidScope,
        IssueKind::NullReference,
        IssueKind::PossiblyNullReference,
        IssueKind::PossiblyFalseReference,
        IssueKind::PossiblyInvalidMethodCall,
        IssueKind::InvalidMethodCall,
        IssueKind::UndefinedMagicMethod,
        IssueKind::PossiblyUndefinedMethod,
        IssueKind::UndefinedMethod,
        IssueKind::UndefinedInterfaceMethod,
        IssueKind::UndefinedClass,
        IssueKind::InaccessibleMethod,
        IssueKind::MixedMethodCall,
        IssueKind::TooFewArguments,
        IssueKind::TooManyArguments,
    ];

    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            IssueKind::InvalidScope => codes::INVALID_SCOPE,
            IssueKind::NullReference => codes::NULL_REFERENCE,
            IssueKind::PossiblyNullReference => codes::POSSIBLY_NULL_REFERENCE,
            IssueKind::PossiblyFalseReference => codes::POSSIBLY_FALSE_REFERENCE,
            IssueKind::PossiblyInvalidMethodCall => codes::POSSIBLY_INVALID_METHOD_CALL,
            IssueKind::InvalidMethodCall => codes::INVALID_METHOD_CALL,
            IssueKind::UndefinedMagicMethod => codes::UNDEFINED_MAGIC_METHOD,
            IssueKind::PossiblyUndefinedMethod => codes::POSSIBLY_UNDEFINED_METHOD,
            IssueKind::UndefinedMethod => codes::UNDEFINED_METHOD,
            IssueKind::UndefinedInterfaceMethod => codes::UNDEFINED_INTERFACE_METHOD,
            IssueKind::UndefinedClass => codes::UNDEFINED_CLASS,
            IssueKind::InaccessibleMethod => codes::INACCESSIBLE_METHOD,
            IssueKind::MixedMethodCall => codes::MIXED_METHOD_CALL,
            IssueKind::TooFewArguments => codes::TOO_FEW_ARGUMENTS,
            IssueKind::TooManyArguments => codes::TOO_MANY_ARGUMENTS,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            IssueKind::InvalidScope => "InvalidScope",
            IssueKind::NullReference => "NullReference",
            IssueKind::PossiblyNullReference => "PossiblyNullReference",
            IssueKind::PossiblyFalseReference => "PossiblyFalseReference",
            IssueKind::PossiblyInvalidMethodCall => "PossiblyInvalidMethodCall",
            IssueKind::InvalidMethodCall => "InvalidMethodCall",
            IssueKind::UndefinedMagicMethod => "UndefinedMagicMethod",
            IssueKind::PossiblyUndefinedMethod => "PossiblyUndefinedMethod",
            IssueKind::UndefinedMethod => "UndefinedMethod",
            IssueKind::UndefinedInterfaceMethod => "UndefinedInterfaceMethod",
            IssueKind::UndefinedClass => "UndefinedClass",
            IssueKind::InaccessibleMethod => "InaccessibleMethod",
            IssueKind::MixedMethodCall => "MixedMethodCall",
            IssueKind::TooFewArguments => "TooFewArguments",
            IssueKind::TooManyArguments => "TooManyArguments",
        }
    }

    /// Look up a kind by its issue name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<IssueKind> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Severity the kind is reported with when configuration says nothing.
    ///
    /// "Possibly" kinds are warnings: another union member may make the call legal.
    #[must_use]
    pub fn default_category(self) -> DiagnosticCategory {
        get_diagnostic_category(self.code()).unwrap_or(DiagnosticCategory::Error)
    }

    /// Message template with `{n}` placeholders.
    #[must_use]
    pub fn message_template(self) -> &'static str {
        super::get_message_template(self.code()).unwrap_or("")
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
