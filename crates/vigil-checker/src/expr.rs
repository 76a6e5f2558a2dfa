//! Expression analysis.
//!
//! This module extends `StatementsAnalyzer` with the recursive walk that
//! assigns a type to every expression node. Method calls are delegated to
//! `call::method_call`.

use tracing::trace;
use vigil_common::limits::{EXPR_STACK_RED_ZONE, EXPR_STACK_SEGMENT_SIZE, MAX_EXPR_CHECK_DEPTH};
use vigil_solver::{Atomic, AtomicKind, Union};

use crate::AnalysisResult;
use crate::ast::{Expr, ExprKind};
use crate::context::AnalysisContext;
use crate::statements::StatementsAnalyzer;

/// Flow-tracking id of an expression: `$foo` or `$foo->bar`.
///
/// Anything else (calls, literals, `new`) has no stable identity.
#[must_use]
pub fn get_var_id(expr: &Expr) -> Option<String> {
    match &expr.kind {
        ExprKind::Variable(name) => Some(format!("${name}")),
        ExprKind::PropertyFetch { var, name } => get_var_id(var).map(|var_id| format!("{var_id}->{name}")),
        _ => None,
    }
}

impl StatementsAnalyzer<'_> {
    /// Analyze `expr`, recording its type in `node_data`.
    ///
    /// Returns `Err(Aborted)` when an accepted issue ended analysis of the
    /// enclosing statement.
    pub fn analyze_expr(&mut self, expr: &Expr, ctx: &mut AnalysisContext) -> AnalysisResult {
        if self.expr_depth >= MAX_EXPR_CHECK_DEPTH {
            trace!(depth = self.expr_depth, "expression too deep, assuming mixed");
            self.node_data.set_type(expr.id, Union::mixed());
            return Ok(());
        }

        self.expr_depth += 1;
        let result = stacker::maybe_grow(EXPR_STACK_RED_ZONE, EXPR_STACK_SEGMENT_SIZE, || {
            self.analyze_expr_inner(expr, ctx)
        });
        self.expr_depth -= 1;
        result
    }

    fn analyze_expr_inner(&mut self, expr: &Expr, ctx: &mut AnalysisContext) -> AnalysisResult {
        match &expr.kind {
            ExprKind::Variable(name) => {
                let var_id = format!("${name}");
                if let Some(ty) = ctx.var_type(&var_id) {
                    self.node_data.set_type(expr.id, ty.clone());
                } else if name == "this"
                    && let Some(class) = self.fqcln()
                {
                    let ty = Union::named(class);
                    self.node_data.set_type(expr.id, ty);
                }
            }
            ExprKind::PropertyFetch { var, .. } => {
                self.analyze_expr(var, ctx)?;
                if let Some(var_id) = get_var_id(expr)
                    && let Some(ty) = ctx.var_type(&var_id)
                {
                    self.node_data.set_type(expr.id, ty.clone());
                }
            }
            ExprKind::MethodCall(call) => {
                self.analyze_method_call(expr, call, ctx, true)?;
            }
            ExprKind::New { class } => {
                self.node_data.set_type(expr.id, Union::named(class.as_str()));
            }
            ExprKind::Int(_) => self.node_data.set_type(expr.id, Union::int()),
            ExprKind::Float(_) => self.node_data.set_type(expr.id, Union::float()),
            ExprKind::String(_) => self.node_data.set_type(expr.id, Union::string()),
            ExprKind::Bool(value) => {
                let kind = if *value { AtomicKind::True } else { AtomicKind::False };
                self.node_data.set_type(expr.id, Union::new(Atomic::new(kind)));
            }
            ExprKind::Null => self.node_data.set_type(expr.id, Union::null()),
        }
        Ok(())
    }
}
