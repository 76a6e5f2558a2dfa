use std::fmt;
use std::str::FromStr;

/// `Class::method`, with the method name lower-cased.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodId {
    pub fq_class_name: String,
    pub method_name: String,
}

impl MethodId {
    #[must_use]
    pub fn new(fq_class_name: impl Into<String>, method_name: &str) -> Self {
        Self {
            fq_class_name: fq_class_name.into(),
            method_name: method_name.to_ascii_lowercase(),
        }
    }
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.fq_class_name, self.method_name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseMethodIdError(String);

impl fmt::Display for ParseMethodIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid method id `{}`", self.0)
    }
}

impl std::error::Error for ParseMethodIdError {}

impl FromStr for MethodId {
    type Err = ParseMethodIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once("::") {
            Some((class, method)) if !class.is_empty() && !method.is_empty() => {
                Ok(MethodId::new(class, method))
            }
            _ => Err(ParseMethodIdError(s.to_string())),
        }
    }
}
