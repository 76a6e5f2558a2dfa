//! Atomic type variants.
//!
//! Each variant of a union is an [`Atomic`]: a tagged [`AtomicKind`] plus the
//! provenance bit saying whether it is known only from a docblock annotation.

use crate::union::Union;

/// The concrete kinds of atomic variant the analyzer distinguishes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AtomicKind {
    /// A class or interface reference.
    NamedObject { name: String },
    /// A generic/template parameter bounded by `as_type`.
    TemplateParam {
        param_name: String,
        as_type: Box<Union>,
        defining_class: String,
    },
    /// The unconstrained type.
    Mixed,
    /// Some object of unknown class.
    Object,
    Null,
    Void,
    False,
    True,
    Bool,
    Int,
    Float,
    String,
    Array,
}

/// One member of a union.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Atomic {
    pub kind: AtomicKind,
    /// Known only from a non-enforced annotation.
    pub from_docblock: bool,
}

impl Atomic {
    #[must_use]
    pub const fn new(kind: AtomicKind) -> Self {
        Self {
            kind,
            from_docblock: false,
        }
    }

    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(AtomicKind::NamedObject { name: name.into() })
    }

    #[must_use]
    pub fn template_param(
        param_name: impl Into<String>,
        as_type: Union,
        defining_class: impl Into<String>,
    ) -> Self {
        Self::new(AtomicKind::TemplateParam {
            param_name: param_name.into(),
            as_type: Box::new(as_type),
            defining_class: defining_class.into(),
        })
    }

    #[must_use]
    pub const fn mixed() -> Self {
        Self::new(AtomicKind::Mixed)
    }

    #[must_use]
    pub const fn null() -> Self {
        Self::new(AtomicKind::Null)
    }

    #[must_use]
    pub fn with_docblock(mut self, from_docblock: bool) -> Self {
        self.from_docblock = from_docblock;
        self
    }

    /// Key identifying this variant inside a union.
    ///
    /// Class names are case-insensitive, so object keys are lower-cased.
    #[must_use]
    pub fn key(&self) -> String {
        match &self.kind {
            AtomicKind::NamedObject { name } => name.to_ascii_lowercase(),
            AtomicKind::TemplateParam {
                param_name,
                defining_class,
                ..
            } => format!("{param_name}:{defining_class}"),
            _ => self.keyword().to_string(),
        }
    }

    /// Human-readable id, as used in diagnostics.
    #[must_use]
    pub fn id(&self) -> String {
        match &self.kind {
            AtomicKind::NamedObject { name } => name.clone(),
            AtomicKind::TemplateParam { param_name, .. } => param_name.clone(),
            _ => self.keyword().to_string(),
        }
    }

    fn keyword(&self) -> &'static str {
        match self.kind {
            AtomicKind::NamedObject { .. } => "object",
            AtomicKind::TemplateParam { .. } => "template",
            AtomicKind::Mixed => "mixed",
            AtomicKind::Object => "object",
            AtomicKind::Null => "null",
            AtomicKind::Void => "void",
            AtomicKind::False => "false",
            AtomicKind::True => "true",
            AtomicKind::Bool => "bool",
            AtomicKind::Int => "int",
            AtomicKind::Float => "float",
            AtomicKind::String => "string",
            AtomicKind::Array => "array",
        }
    }

    #[must_use]
    pub const fn is_named_object(&self) -> bool {
        matches!(self.kind, AtomicKind::NamedObject { .. })
    }

    /// Named objects and template parameters carry a class context for the
    /// method resolver; every other kind does not.
    #[must_use]
    pub const fn is_object_context(&self) -> bool {
        matches!(
            self.kind,
            AtomicKind::NamedObject { .. } | AtomicKind::TemplateParam { .. }
        )
    }
}

impl std::fmt::Display for Atomic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id())
    }
}
