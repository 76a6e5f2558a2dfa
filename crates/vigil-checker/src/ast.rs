//! Expression tree consumed by the checker.
//!
//! Parsing is not part of this crate; callers (and tests) build trees with
//! [`ExprBuilder`], which hands out unique [`NodeId`]s so node data can be
//! attached per expression.

use std::cell::Cell;

use vigil_common::Span;

/// Identity of one expression node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub id: NodeId,
    pub span: Span,
    pub kind: ExprKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    /// `$name`, stored without the sigil.
    Variable(String),
    /// `$var->name`
    PropertyFetch { var: Box<Expr>, name: String },
    MethodCall(MethodCallExpr),
    New { class: String },
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Null,
}

/// `receiver->method(args)`
#[derive(Clone, Debug, PartialEq)]
pub struct MethodCallExpr {
    pub var: Box<Expr>,
    pub name: MethodName,
    pub args: Vec<Arg>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum MethodName {
    Identifier(Identifier),
    /// `$obj->$name()`: the method name is computed at runtime.
    Dynamic(Box<Expr>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Arg {
    pub value: Expr,
    /// `...$args`
    pub unpack: bool,
}

impl MethodName {
    /// The statically known identifier, if there is one.
    #[must_use]
    pub fn identifier(&self) -> Option<&Identifier> {
        match self {
            MethodName::Identifier(ident) => Some(ident),
            MethodName::Dynamic(_) => None,
        }
    }

    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            MethodName::Identifier(ident) => ident.span,
            MethodName::Dynamic(expr) => expr.span,
        }
    }

    /// Name for logs and messages; dynamic names render as `{expr}`.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            MethodName::Identifier(ident) => &ident.name,
            MethodName::Dynamic(_) => "{expr}",
        }
    }
}

impl Expr {
    /// `$this`
    #[must_use]
    pub fn is_this(&self) -> bool {
        matches!(&self.kind, ExprKind::Variable(name) if name == "this")
    }

    #[must_use]
    pub fn as_method_call(&self) -> Option<&MethodCallExpr> {
        match &self.kind {
            ExprKind::MethodCall(call) => Some(call),
            _ => None,
        }
    }
}

/// Builds expression trees with unique ids and non-overlapping spans.
///
/// Methods take `&self` so nested construction reads naturally:
/// `b.method_call(b.var("foo"), "bar", vec![])`.
#[derive(Debug, Default)]
pub struct ExprBuilder {
    next_id: Cell<u32>,
    cursor: Cell<u32>,
}

impl ExprBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> NodeId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        NodeId(id)
    }

    fn advance(&self, len: usize) -> Span {
        let start = self.cursor.get();
        let end = start + u32::try_from(len).unwrap_or(u32::MAX - start);
        // One byte of separation between consecutive tokens.
        self.cursor.set(end + 1);
        Span::new(start, end)
    }

    fn node(&self, span: Span, kind: ExprKind) -> Expr {
        Expr {
            id: self.next_id(),
            span,
            kind,
        }
    }

    #[must_use]
    pub fn var(&self, name: &str) -> Expr {
        let span = self.advance(name.len() + 1);
        self.node(span, ExprKind::Variable(name.to_string()))
    }

    #[must_use]
    pub fn this(&self) -> Expr {
        self.var("this")
    }

    #[must_use]
    pub fn property(&self, var: Expr, name: &str) -> Expr {
        let span = var.span.cover(self.advance(name.len() + 2));
        self.node(
            span,
            ExprKind::PropertyFetch {
                var: Box::new(var),
                name: name.to_string(),
            },
        )
    }

    #[must_use]
    pub fn new_object(&self, class: &str) -> Expr {
        let span = self.advance(class.len() + 6);
        self.node(
            span,
            ExprKind::New {
                class: class.to_string(),
            },
        )
    }

    #[must_use]
    pub fn int(&self, value: i64) -> Expr {
        let span = self.advance(value.to_string().len());
        self.node(span, ExprKind::Int(value))
    }

    #[must_use]
    pub fn string(&self, value: &str) -> Expr {
        let span = self.advance(value.len() + 2);
        self.node(span, ExprKind::String(value.to_string()))
    }

    #[must_use]
    pub fn null(&self) -> Expr {
        let span = self.advance(4);
        self.node(span, ExprKind::Null)
    }

    #[must_use]
    pub fn arg(&self, value: Expr) -> Arg {
        Arg {
            value,
            unpack: false,
        }
    }

    /// `var->name(args)` with a static method name.
    #[must_use]
    pub fn method_call(&self, var: Expr, name: &str, args: Vec<Expr>) -> Expr {
        let name_span = self.advance(name.len());
        let name = MethodName::Identifier(Identifier {
            name: name.to_string(),
            span: name_span,
        });
        self.call_with_name(var, name, args)
    }

    /// `var->$name(args)`
    #[must_use]
    pub fn dynamic_method_call(&self, var: Expr, name: Expr, args: Vec<Expr>) -> Expr {
        self.call_with_name(var, MethodName::Dynamic(Box::new(name)), args)
    }

    fn call_with_name(&self, var: Expr, name: MethodName, args: Vec<Expr>) -> Expr {
        let mut span = var.span.cover(name.span());
        for arg in &args {
            span = span.cover(arg.span);
        }
        let args = args.into_iter().map(|value| self.arg(value)).collect();
        self.node(
            span,
            ExprKind::MethodCall(MethodCallExpr {
                var: Box::new(var),
                name,
                args,
            }),
        )
    }
}
