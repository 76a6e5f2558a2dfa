//! Instance method call orchestration.
//!
//! This module extends `StatementsAnalyzer` with the analysis of
//! `$receiver->method(args)`:
//!
//! 1. analyze the receiver (and a dynamic method name) as call operands
//! 2. reject `$this` outside a class
//! 3. look up the receiver type and report null/false receivers
//! 4. resolve the method against every variant of the receiver union
//! 5. report invalid receivers and undefined methods
//! 6. record the call's type and narrow the receiver variable
//! 7. check the arguments against the first method that resolved

use std::ops::ControlFlow;

use tracing::{debug, trace};
use vigil_common::IssueKind;
use vigil_solver::{Union, UnionFlags};

use crate::AnalysisResult;
use crate::ast::{Expr, MethodCallExpr, MethodName};
use crate::call::AtomicMethodCallAnalysisResult;
use crate::context::AnalysisContext;
use crate::expr::get_var_id;
use crate::flow::narrow_receiver_after_call;
use crate::issue_buffer::{Issue, ReportPolicy};
use crate::statements::StatementsAnalyzer;

macro_rules! try_report {
    ($analyzer:expr, $issue:expr, $policy:expr) => {
        if let ControlFlow::Break(result) = $analyzer.report_flow($issue, $policy) {
            return result;
        }
    };
}

impl StatementsAnalyzer<'_> {
    /// Analyze the instance method call `stmt`, whose call node is `call`.
    ///
    /// `real_method_call` is false when the call is synthesized from other
    /// syntax; such calls never narrow the receiver.
    ///
    /// Returns `Err(Aborted)` when an accepted issue ended analysis of the
    /// enclosing statement.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(file = %self.file_path(), start = stmt.span.start)
    )]
    pub fn analyze_method_call(
        &mut self,
        stmt: &Expr,
        call: &MethodCallExpr,
        ctx: &mut AnalysisContext,
        real_method_call: bool,
    ) -> AnalysisResult {
        trace!(method = call.name.display_name(), "analyzing method call");

        self.analyze_call_operand(&call.var, ctx)?;
        if let MethodName::Dynamic(name) = &call.name {
            self.analyze_call_operand(name, ctx)?;
        }

        if call.var.is_this() && self.fqcln().is_none() {
            let issue = Issue::new(IssueKind::InvalidScope, self.location(stmt.span), &[]);
            try_report!(self, issue, ReportPolicy::ABORT_IF_ACCEPTED);
        }

        let lhs_var_id = get_var_id(&call.var);

        let mut class_type = lhs_var_id
            .as_deref()
            .filter(|var_id| ctx.has_variable(var_id))
            .and_then(|var_id| ctx.var_type(var_id))
            .cloned();
        if let Some(stmt_var_type) = self.node_data.get_type(call.var.id) {
            class_type = Some(stmt_var_type.clone());
        } else if class_type.is_none() {
            self.node_data.set_type(stmt.id, Union::mixed());
        }

        if !ctx.check_classes {
            let checker = self.argument_checker();
            return checker.check_function_arguments(self, &call.args, None, ctx);
        }

        if let Some(class_type) = &class_type
            && let Some(method_name) = call.name.identifier()
        {
            let location = self.location(method_name.span);

            if class_type.is_null() || class_type.is_void() {
                let issue = Issue::new(IssueKind::NullReference, location.clone(), &[method_name.name.as_str()]);
                try_report!(self, issue, ReportPolicy::TERMINAL);
            }

            if class_type.is_nullable() && !class_type.ignore_nullable_issues() {
                let issue = Issue::new(
                    IssueKind::PossiblyNullReference,
                    location.clone(),
                    &[method_name.name.as_str()],
                );
                try_report!(self, issue, ReportPolicy::NON_FATAL);
            }

            if class_type.is_falsable() && !class_type.ignore_falsable_issues() {
                let issue = Issue::new(IssueKind::PossiblyFalseReference, location, &[method_name.name.as_str()]);
                try_report!(self, issue, ReportPolicy::NON_FATAL);
            }
        }

        let class_type = class_type.unwrap_or_else(Union::mixed);
        debug!(receiver = %class_type, lhs_var_id = ?lhs_var_id, "resolving receiver variants");

        let mut result = AtomicMethodCallAnalysisResult::new();
        let resolver = self.resolver();
        let codebase = self.codebase;
        for lhs_type_part in class_type.atomic_types() {
            let lhs_type_part_context = lhs_type_part.is_object_context().then_some(lhs_type_part);
            resolver.resolve(
                self,
                stmt,
                call,
                codebase,
                ctx,
                lhs_type_part,
                lhs_type_part_context,
                false,
                lhs_var_id.as_deref(),
                &mut result,
            );
        }

        let name_location = self.location(call.name.span());

        if let Some(invalid_class_type) = result.invalid_method_call_types.first() {
            let kind = if result.has_valid_method_call_type || result.has_mixed_method_call {
                IssueKind::PossiblyInvalidMethodCall
            } else {
                IssueKind::InvalidMethodCall
            };
            let var_display = lhs_var_id.as_deref().unwrap_or("");
            let issue = Issue::new(kind, name_location.clone(), &[invalid_class_type.as_str(), var_display]);
            try_report!(self, issue, ReportPolicy::NON_FATAL);
        }

        if ctx.check_methods
            && let Some(method_id) = result.non_existent_magic_method_ids.first()
        {
            let issue = Issue::new(IssueKind::UndefinedMagicMethod, name_location.clone(), &[method_id.as_str()])
                .with_method_id(method_id.as_str());
            try_report!(self, issue, ReportPolicy::NON_FATAL);
        }

        let partially_valid = !result.existent_method_ids.is_empty() || result.has_mixed_method_call;

        if let Some(method_id) = result.non_existent_class_method_ids.first() {
            if ctx.check_methods {
                let kind = if partially_valid {
                    IssueKind::PossiblyUndefinedMethod
                } else {
                    IssueKind::UndefinedMethod
                };
                let issue = Issue::new(kind, name_location.clone(), &[method_id.as_str()])
                    .with_method_id(method_id.as_str());
                try_report!(self, issue, ReportPolicy::NON_FATAL);
            }
            return Ok(());
        }

        if let Some(method_id) = result.non_existent_interface_method_ids.first() {
            if ctx.check_methods {
                let kind = if partially_valid {
                    IssueKind::PossiblyUndefinedMethod
                } else {
                    IssueKind::UndefinedInterfaceMethod
                };
                let issue = Issue::new(kind, name_location.clone(), &[method_id.as_str()])
                    .with_method_id(method_id.as_str());
                try_report!(self, issue, ReportPolicy::NON_FATAL);
            }
            return Ok(());
        }

        let mut stmt_type = result.return_type.take();
        if result.returns_by_ref {
            stmt_type.get_or_insert_with(Union::mixed).flags |= UnionFlags::BY_REF;
        }

        if let Some(stmt_type) = &stmt_type {
            self.node_data.set_type(stmt.id, stmt_type.clone());

            if codebase.store_node_types && !ctx.is_speculative() {
                codebase.add_node_type(self.file_path(), call.name.span(), stmt_type.id(), stmt.id);
            }
        }

        let call_location = self.location(stmt.span);
        let checker = self.argument_checker();

        let Some(first_method_id) = result.existent_method_ids.first() else {
            return checker.check_method_args(self, None, &call.args, None, ctx, call_location);
        };

        if let Some(lhs_var_id) = &lhs_var_id
            && real_method_call
            && !class_type.is_mixed()
            && result.has_valid_method_call_type
            && !result.has_mixed_method_call
            && result.invalid_method_call_types.is_empty()
            && (class_type.is_from_docblock() || class_type.is_nullable())
        {
            narrow_receiver_after_call(ctx, lhs_var_id, &class_type);
        }

        checker.check_method_args(self, Some(first_method_id), &call.args, None, ctx, call_location)
    }

    /// Analyze a receiver or dynamic method name with `inside_call` set.
    fn analyze_call_operand(&mut self, operand: &Expr, ctx: &mut AnalysisContext) -> AnalysisResult {
        let was_inside_call = ctx.inside_call;
        ctx.inside_call = true;
        let result = self.analyze_expr(operand, ctx);
        ctx.inside_call = was_inside_call;
        result
    }
}
