//! Resolution of a method call against a single receiver variant.
//!
//! The orchestrator calls [`AtomicMethodResolver::resolve`] once per variant
//! of the receiver's union. Each call records its findings in the shared
//! [`AtomicMethodCallAnalysisResult`]; diagnostics that depend on the whole
//! union are left to the orchestrator.

use tracing::trace;
use vigil_common::IssueKind;
use vigil_common::limits::MAX_TEMPLATE_BOUND_DEPTH;
use vigil_solver::{Atomic, AtomicKind, Union};

use crate::ast::{Expr, MethodCallExpr};
use crate::call::{AtomicMethodCallAnalysisResult, MethodId};
use crate::codebase::{Codebase, MAGIC_CALL, Visibility};
use crate::context::AnalysisContext;
use crate::issue_buffer::{Issue, ReportPolicy};
use crate::statements::StatementsAnalyzer;

/// Resolves a method call against one variant of the receiver type.
pub trait AtomicMethodResolver {
    /// Record what calling `call` on `lhs_type_part` means in `result`.
    ///
    /// `lhs_type_part_context` is the variant again when it carries a class
    /// context (named object or template parameter), `None` otherwise.
    fn resolve(
        &self,
        analyzer: &mut StatementsAnalyzer<'_>,
        stmt: &Expr,
        call: &MethodCallExpr,
        codebase: &Codebase,
        ctx: &mut AnalysisContext,
        lhs_type_part: &Atomic,
        lhs_type_part_context: Option<&Atomic>,
        is_static_call: bool,
        lhs_var_id: Option<&str>,
        result: &mut AtomicMethodCallAnalysisResult,
    );
}

/// Default resolver backed by [`Codebase`] storage.
#[derive(Clone, Copy, Debug, Default)]
pub struct CodebaseMethodResolver;

impl AtomicMethodResolver for CodebaseMethodResolver {
    fn resolve(
        &self,
        analyzer: &mut StatementsAnalyzer<'_>,
        _stmt: &Expr,
        call: &MethodCallExpr,
        codebase: &Codebase,
        _ctx: &mut AnalysisContext,
        lhs_type_part: &Atomic,
        _lhs_type_part_context: Option<&Atomic>,
        _is_static_call: bool,
        lhs_var_id: Option<&str>,
        result: &mut AtomicMethodCallAnalysisResult,
    ) {
        self.resolve_atomic(analyzer, call, codebase, lhs_type_part, lhs_var_id, result, 0);
    }
}

impl CodebaseMethodResolver {
    fn resolve_atomic(
        &self,
        analyzer: &mut StatementsAnalyzer<'_>,
        call: &MethodCallExpr,
        codebase: &Codebase,
        lhs_type_part: &Atomic,
        lhs_var_id: Option<&str>,
        result: &mut AtomicMethodCallAnalysisResult,
        depth: u32,
    ) {
        trace!(variant = %lhs_type_part, depth, "resolving method call variant");
        match &lhs_type_part.kind {
            // Null and false receivers are reported against the whole union.
            AtomicKind::Null | AtomicKind::False => {}
            AtomicKind::Mixed | AtomicKind::Object => {
                self.resolve_mixed(analyzer, call, lhs_var_id, result);
            }
            AtomicKind::TemplateParam { as_type, .. } => {
                if depth >= MAX_TEMPLATE_BOUND_DEPTH {
                    trace!(variant = %lhs_type_part, "template bound too deep, assuming mixed");
                    self.resolve_mixed(analyzer, call, lhs_var_id, result);
                    return;
                }
                for bound in as_type.atomic_types() {
                    self.resolve_atomic(analyzer, call, codebase, bound, lhs_var_id, result, depth + 1);
                }
            }
            AtomicKind::NamedObject { name } => {
                self.resolve_named_object(analyzer, call, codebase, name, result);
            }
            AtomicKind::Void
            | AtomicKind::True
            | AtomicKind::Bool
            | AtomicKind::Int
            | AtomicKind::Float
            | AtomicKind::String
            | AtomicKind::Array => {
                result.invalid_method_call_types.push(lhs_type_part.id());
            }
        }
    }

    fn resolve_mixed(
        &self,
        analyzer: &mut StatementsAnalyzer<'_>,
        call: &MethodCallExpr,
        lhs_var_id: Option<&str>,
        result: &mut AtomicMethodCallAnalysisResult,
    ) {
        result.has_mixed_method_call = true;
        result.add_return_type(Union::mixed());

        let receiver = lhs_var_id.unwrap_or("expression");
        let call_text = format!("{receiver}->{}", call.name.display_name());
        let issue = Issue::new(
            IssueKind::MixedMethodCall,
            analyzer.location(call.name.span()),
            &[call_text.as_str()],
        );
        analyzer.report(issue, ReportPolicy::NON_FATAL);
    }

    fn resolve_named_object(
        &self,
        analyzer: &mut StatementsAnalyzer<'_>,
        call: &MethodCallExpr,
        codebase: &Codebase,
        class_name: &str,
        result: &mut AtomicMethodCallAnalysisResult,
    ) {
        if codebase.is_mock(class_name) {
            result.has_mock = true;
            result.has_valid_method_call_type = true;
            result.add_return_type(Union::mixed());
            return;
        }

        let Some(class_storage) = codebase.classlike(class_name) else {
            let issue = Issue::new(
                IssueKind::UndefinedClass,
                analyzer.location(call.var.span),
                &[class_name],
            );
            analyzer.report(issue, ReportPolicy::NON_FATAL);
            return;
        };
        result.has_valid_method_call_type = true;

        let Some(method_name) = call.name.identifier() else {
            // The method is picked at runtime; nothing more to resolve.
            result.add_return_type(Union::mixed());
            return;
        };

        let method_id = MethodId::new(class_storage.name.as_str(), &method_name.name);

        if let Some(declaring) = codebase.get_declaring_method(&class_storage.name, &method_name.name) {
            if result.check_visibility
                && !is_visible(
                    codebase,
                    &declaring.class.name,
                    declaring.method.visibility,
                    analyzer.fqcln(),
                )
            {
                let declaring_id =
                    MethodId::new(declaring.class.name.as_str(), &method_name.name).to_string();
                let issue = Issue::new(
                    IssueKind::InaccessibleMethod,
                    analyzer.location(method_name.span),
                    &[
                        declaring.method.visibility.as_str(),
                        declaring_id.as_str(),
                        analyzer.fqcln().unwrap_or("global scope"),
                    ],
                )
                .with_method_id(declaring_id.clone());
                analyzer.report(issue, ReportPolicy::NON_FATAL);
            }

            result.add_existent_method_id(method_id);
            result.add_return_type(declaring.method.return_type.clone().unwrap_or_else(Union::mixed));
            result.returns_by_ref |= declaring.method.returns_by_ref;
            return;
        }

        if let Some(pseudo) = codebase.get_pseudo_method(&class_storage.name, &method_name.name) {
            result.add_existent_method_id(method_id);
            result.add_return_type(pseudo.return_type.clone().unwrap_or_else(Union::mixed));
            return;
        }

        if codebase
            .get_declaring_method(&class_storage.name, MAGIC_CALL)
            .is_some()
        {
            if class_storage.sealed_methods {
                result.non_existent_magic_method_ids.push(method_id.to_string());
            } else {
                result.add_existent_method_id(method_id);
                result.add_return_type(Union::mixed());
            }
            return;
        }

        if class_storage.is_interface {
            result.non_existent_interface_method_ids.push(method_id.to_string());
        } else {
            result.non_existent_class_method_ids.push(method_id.to_string());
        }
    }
}

/// Whether a method declared on `declaring_class` with `visibility` can be
/// called from inside `calling_class` (or from outside any class).
fn is_visible(
    codebase: &Codebase,
    declaring_class: &str,
    visibility: Visibility,
    calling_class: Option<&str>,
) -> bool {
    match visibility {
        Visibility::Public => true,
        Visibility::Private => calling_class.is_some_and(|class| class.eq_ignore_ascii_case(declaring_class)),
        Visibility::Protected => calling_class.is_some_and(|class| {
            codebase.class_extends_or_is(class, declaring_class)
                || codebase.class_extends_or_is(declaring_class, class)
        }),
    }
}
