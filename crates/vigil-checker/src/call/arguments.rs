//! Argument checking for calls.
//!
//! The method-call core only decides *which* method the arguments are
//! checked against; the checking itself goes through [`ArgumentChecker`].

use std::ops::ControlFlow;

use rustc_hash::FxHashMap;
use tracing::trace;
use vigil_common::{CodeLocation, IssueKind, Span};
use vigil_solver::Union;

use crate::AnalysisResult;
use crate::ast::Arg;
use crate::call::MethodId;
use crate::codebase::ParamStorage;
use crate::context::AnalysisContext;
use crate::issue_buffer::{Issue, ReportPolicy};
use crate::statements::StatementsAnalyzer;

pub trait ArgumentChecker {
    /// Check `args` against the method `method_id`, or just analyze them when
    /// no method could be determined.
    fn check_method_args(
        &self,
        analyzer: &mut StatementsAnalyzer<'_>,
        method_id: Option<&MethodId>,
        args: &[Arg],
        class_template_params: Option<&FxHashMap<String, Union>>,
        ctx: &mut AnalysisContext,
        location: CodeLocation,
    ) -> AnalysisResult;

    /// Check `args` against plain parameters, with no class context.
    fn check_function_arguments(
        &self,
        analyzer: &mut StatementsAnalyzer<'_>,
        args: &[Arg],
        params: Option<&[ParamStorage]>,
        ctx: &mut AnalysisContext,
    ) -> AnalysisResult;
}

/// Analyzes every argument expression and checks arity.
#[derive(Clone, Copy, Debug, Default)]
pub struct ArgumentAnalyzer;

impl ArgumentAnalyzer {
    fn analyze_args(
        analyzer: &mut StatementsAnalyzer<'_>,
        args: &[Arg],
        ctx: &mut AnalysisContext,
    ) -> AnalysisResult {
        let was_inside_call = ctx.inside_call;
        ctx.inside_call = true;
        for arg in args {
            if let Err(aborted) = analyzer.analyze_expr(&arg.value, ctx) {
                ctx.inside_call = was_inside_call;
                return Err(aborted);
            }
        }
        ctx.inside_call = was_inside_call;
        Ok(())
    }

    fn check_arity(
        analyzer: &mut StatementsAnalyzer<'_>,
        callee: &str,
        params: &[ParamStorage],
        args: &[Arg],
        location: CodeLocation,
    ) -> AnalysisResult {
        // An unpacked argument can supply any number of values.
        if args.iter().any(|arg| arg.unpack) {
            return Ok(());
        }

        let required = params
            .iter()
            .filter(|param| !param.is_optional && !param.is_variadic)
            .count();
        let max = if params.iter().any(|param| param.is_variadic) {
            None
        } else {
            Some(params.len())
        };

        let (kind, expected) = if args.len() < required {
            (IssueKind::TooFewArguments, required)
        } else if let Some(max) = max
            && args.len() > max
        {
            (IssueKind::TooManyArguments, max)
        } else {
            return Ok(());
        };

        trace!(callee, expected, actual = args.len(), "argument count mismatch");
        let expected = expected.to_string();
        let actual = args.len().to_string();
        let issue = Issue::new(kind, location, &[callee, expected.as_str(), actual.as_str()])
            .with_method_id(callee);
        match analyzer.report_flow(issue, ReportPolicy::ABORT_IF_ACCEPTED) {
            ControlFlow::Break(result) => result,
            ControlFlow::Continue(()) => Ok(()),
        }
    }
}

impl ArgumentChecker for ArgumentAnalyzer {
    fn check_method_args(
        &self,
        analyzer: &mut StatementsAnalyzer<'_>,
        method_id: Option<&MethodId>,
        args: &[Arg],
        _class_template_params: Option<&FxHashMap<String, Union>>,
        ctx: &mut AnalysisContext,
        location: CodeLocation,
    ) -> AnalysisResult {
        Self::analyze_args(analyzer, args, ctx)?;

        let Some(method_id) = method_id else {
            return Ok(());
        };
        let codebase = analyzer.codebase;
        let Some(method) = codebase.get_method(method_id) else {
            // Reachable only through `__call`; any arguments are fine.
            return Ok(());
        };
        Self::check_arity(analyzer, &method_id.to_string(), &method.params, args, location)
    }

    fn check_function_arguments(
        &self,
        analyzer: &mut StatementsAnalyzer<'_>,
        args: &[Arg],
        params: Option<&[ParamStorage]>,
        ctx: &mut AnalysisContext,
    ) -> AnalysisResult {
        Self::analyze_args(analyzer, args, ctx)?;
        let Some(params) = params else {
            return Ok(());
        };
        let span = args
            .iter()
            .map(|arg| arg.value.span)
            .reduce(Span::cover)
            .unwrap_or_default();
        let location = analyzer.location(span);
        Self::check_arity(analyzer, "function", params, args, location)
    }
}
