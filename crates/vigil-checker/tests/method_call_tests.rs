//! Tests for instance method call analysis.

use std::cell::RefCell;

use super::*;
use crate::clause::{Assertion, Clause};
use crate::codebase::ParamStorage;
use crate::node_data::NodeDataProvider;
use vigil_common::IssueKind;
use vigil_common::limits::MAX_EXPR_CHECK_DEPTH;
use vigil_solver::{Atomic, AtomicKind, Union, UnionFlags};

const FILE: &str = "src/app.php";

struct Outcome {
    result: AnalysisResult,
    issues: IssueBuffer,
    node_data: NodeDataProvider,
}

impl Outcome {
    fn kinds(&self) -> Vec<&'static str> {
        self.issues
            .diagnostics()
            .iter()
            .map(|diagnostic| diagnostic.issue_type)
            .collect()
    }

    fn messages(&self) -> Vec<&str> {
        self.issues
            .diagnostics()
            .iter()
            .map(|diagnostic| diagnostic.message_text.as_str())
            .collect()
    }
}

/// Argument checker double that records what it was asked to check.
#[derive(Default)]
struct RecordingArgs {
    calls: RefCell<Vec<ArgCheck>>,
}

#[derive(Debug, PartialEq, Eq)]
enum ArgCheck {
    Method(Option<String>),
    Function,
}

impl ArgumentChecker for RecordingArgs {
    fn check_method_args(
        &self,
        _analyzer: &mut StatementsAnalyzer<'_>,
        method_id: Option<&MethodId>,
        _args: &[crate::ast::Arg],
        _class_template_params: Option<&rustc_hash::FxHashMap<String, Union>>,
        _ctx: &mut AnalysisContext,
        _location: vigil_common::CodeLocation,
    ) -> AnalysisResult {
        self.calls
            .borrow_mut()
            .push(ArgCheck::Method(method_id.map(ToString::to_string)));
        Ok(())
    }

    fn check_function_arguments(
        &self,
        _analyzer: &mut StatementsAnalyzer<'_>,
        _args: &[crate::ast::Arg],
        params: Option<&[ParamStorage]>,
        _ctx: &mut AnalysisContext,
    ) -> AnalysisResult {
        assert!(params.is_none());
        self.calls.borrow_mut().push(ArgCheck::Function);
        Ok(())
    }
}

fn run(
    codebase: &Codebase,
    ctx: &mut AnalysisContext,
    stmt: &Expr,
    issues: IssueBuffer,
    class: Option<&str>,
    args: Option<&RecordingArgs>,
) -> Outcome {
    let mut issues = issues;
    let (result, node_data) = {
        let mut analyzer = StatementsAnalyzer::new(codebase, FILE, &mut issues);
        if let Some(class) = class {
            analyzer = analyzer.in_class(class);
        }
        if let Some(args) = args {
            analyzer = analyzer.with_argument_checker(args);
        }
        let result = analyzer.analyze_expr(stmt, ctx);
        (result, analyzer.into_node_data())
    };
    Outcome {
        result,
        issues,
        node_data,
    }
}

fn analyze(codebase: &Codebase, ctx: &mut AnalysisContext, stmt: &Expr) -> Outcome {
    run(codebase, ctx, stmt, IssueBuffer::new(), None, None)
}

fn foo_codebase() -> Codebase {
    Codebase::new()
        .with_classlike(
            ClassLikeStorage::class("Foo")
                .with_method(MethodStorage::new("bar").returning(Union::int()))
                .with_method(MethodStorage::new("baz").returning(Union::string()))
                .with_method(
                    MethodStorage::new("secret")
                        .with_visibility(Visibility::Private)
                        .returning(Union::int()),
                )
                .with_method(
                    MethodStorage::new("take")
                        .with_param(ParamStorage::new("a"))
                        .with_param(ParamStorage::new("b").optional()),
                ),
        )
        .with_classlike(ClassLikeStorage::interface("Shape"))
}

fn ctx_with(var: &str, ty: Union) -> AnalysisContext {
    let mut ctx = AnalysisContext::new();
    ctx.set_var_type(var, ty);
    ctx
}

// =============================================================================
// Per-variant classification
// =============================================================================

#[test]
fn test_resolver_classifies_variants_in_order() {
    let codebase = Codebase::new()
        .with_classlike(ClassLikeStorage::class("A").with_method(MethodStorage::new("m")))
        .with_classlike(ClassLikeStorage::class("B"))
        .with_classlike(ClassLikeStorage::class("C").with_method(MethodStorage::new("M")));
    let receiver = Union::from_atomics([Atomic::named("A"), Atomic::named("B"), Atomic::named("C")])
        .expect("non-empty");

    let b = ExprBuilder::new();
    let stmt = b.method_call(b.var("x"), "m", vec![]);
    let call = stmt.as_method_call().expect("method call");
    let mut ctx = AnalysisContext::new();
    let mut issues = IssueBuffer::new();
    let mut analyzer = StatementsAnalyzer::new(&codebase, FILE, &mut issues);
    let mut result = AtomicMethodCallAnalysisResult::new();

    for atomic in receiver.atomic_types() {
        CodebaseMethodResolver.resolve(
            &mut analyzer,
            &stmt,
            call,
            &codebase,
            &mut ctx,
            atomic,
            Some(atomic),
            false,
            Some("$x"),
            &mut result,
        );
    }

    assert_eq!(
        result.existent_method_ids.as_slice(),
        [MethodId::new("A", "m"), MethodId::new("C", "m")]
    );
    assert_eq!(result.non_existent_class_method_ids.as_slice(), ["B::m"]);
    assert!(result.has_valid_method_call_type);
    assert!(!result.has_mixed_method_call);
    // Neither method declares a return type.
    assert_eq!(result.return_type, Some(Union::mixed()));
}

#[test]
fn test_resolver_flags_scalars_as_invalid_and_skips_null() {
    let codebase = Codebase::new();
    let receiver = Union::from_atomics([
        Atomic::new(AtomicKind::Int),
        Atomic::null(),
        Atomic::new(AtomicKind::Array),
    ])
    .expect("non-empty");

    let b = ExprBuilder::new();
    let stmt = b.method_call(b.var("x"), "m", vec![]);
    let call = stmt.as_method_call().expect("method call");
    let mut ctx = AnalysisContext::new();
    let mut issues = IssueBuffer::new();
    let mut analyzer = StatementsAnalyzer::new(&codebase, FILE, &mut issues);
    let mut result = AtomicMethodCallAnalysisResult::new();

    for atomic in receiver.atomic_types() {
        CodebaseMethodResolver.resolve(
            &mut analyzer, &stmt, call, &codebase, &mut ctx, atomic, None, false, Some("$x"),
            &mut result,
        );
    }

    assert_eq!(result.invalid_method_call_types.as_slice(), ["int", "array"]);
    assert!(result.existent_method_ids.is_empty());
    assert!(result.return_type.is_none());
}

#[test]
fn test_partially_undefined_method_reports_first_missing_id() {
    let codebase = Codebase::new()
        .with_classlike(ClassLikeStorage::class("A").with_method(MethodStorage::new("m")))
        .with_classlike(ClassLikeStorage::class("B"))
        .with_classlike(ClassLikeStorage::class("C").with_method(MethodStorage::new("m")));
    let receiver = Union::from_atomics([Atomic::named("A"), Atomic::named("B"), Atomic::named("C")])
        .expect("non-empty");
    let mut ctx = ctx_with("$x", receiver);
    let recorder = RecordingArgs::default();

    let b = ExprBuilder::new();
    let stmt = b.method_call(b.var("x"), "m", vec![]);
    let outcome = run(&codebase, &mut ctx, &stmt, IssueBuffer::new(), None, Some(&recorder));

    assert_eq!(outcome.kinds(), vec!["PossiblyUndefinedMethod"]);
    assert_eq!(outcome.messages(), vec!["Method B::m does not exist"]);
    assert_eq!(
        outcome.issues.diagnostics()[0].method_id.as_deref(),
        Some("B::m")
    );
    // Undefined methods end the call before argument checking.
    assert!(recorder.calls.borrow().is_empty());
}

#[test]
fn test_undefined_method_on_single_class() {
    let codebase = foo_codebase();
    let mut ctx = ctx_with("$foo", Union::named("Foo"));
    let b = ExprBuilder::new();
    let stmt = b.method_call(b.var("foo"), "missing", vec![]);

    let outcome = analyze(&codebase, &mut ctx, &stmt);
    assert_eq!(outcome.kinds(), vec!["UndefinedMethod"]);
    assert_eq!(outcome.messages(), vec!["Method Foo::missing does not exist"]);
    assert_eq!(outcome.result, Ok(()));
}

#[test]
fn test_undefined_interface_method() {
    let codebase = foo_codebase();
    let mut ctx = ctx_with("$shape", Union::named("Shape"));
    let b = ExprBuilder::new();
    let stmt = b.method_call(b.var("shape"), "area", vec![]);

    let outcome = analyze(&codebase, &mut ctx, &stmt);
    assert_eq!(outcome.kinds(), vec!["UndefinedInterfaceMethod"]);
    assert_eq!(outcome.messages(), vec!["Method Shape::area does not exist"]);
}

#[test]
fn test_check_methods_disabled_silences_undefined_method() {
    let codebase = foo_codebase();
    let mut ctx = ctx_with("$foo", Union::named("Foo"));
    ctx.check_methods = false;
    let recorder = RecordingArgs::default();
    let b = ExprBuilder::new();
    let stmt = b.method_call(b.var("foo"), "missing", vec![]);

    let outcome = run(&codebase, &mut ctx, &stmt, IssueBuffer::new(), None, Some(&recorder));
    assert!(outcome.kinds().is_empty());
    assert!(recorder.calls.borrow().is_empty());
}

// =============================================================================
// Null, false and invalid receivers
// =============================================================================

#[test]
fn test_null_receiver_reports_once_and_aborts() {
    let codebase = foo_codebase();
    let mut ctx = ctx_with("$x", Union::null());
    let recorder = RecordingArgs::default();
    let b = ExprBuilder::new();
    let stmt = b.method_call(b.var("x"), "foo", vec![]);

    let outcome = run(&codebase, &mut ctx, &stmt, IssueBuffer::new(), None, Some(&recorder));
    assert_eq!(outcome.kinds(), vec!["NullReference"]);
    assert_eq!(outcome.messages(), vec!["Cannot call method foo on null value"]);
    assert_eq!(outcome.result, Err(Aborted));
    assert!(recorder.calls.borrow().is_empty());
    assert_eq!(ctx.var_type("$x"), Some(&Union::null()));
}

#[test]
fn test_rejected_null_reference_stops_call_without_abort() {
    let codebase = foo_codebase();
    let mut ctx = ctx_with("$x", Union::void());
    let recorder = RecordingArgs::default();
    let issues = IssueBuffer::new().with_level(IssueKind::NullReference, IssueLevel::Info);
    let b = ExprBuilder::new();
    let stmt = b.method_call(b.var("x"), "foo", vec![]);

    let outcome = run(&codebase, &mut ctx, &stmt, issues, None, Some(&recorder));
    assert_eq!(outcome.kinds(), vec!["NullReference"]);
    assert_eq!(outcome.result, Ok(()));
    assert!(recorder.calls.borrow().is_empty());
}

#[test]
fn test_null_receiver_with_dynamic_name_is_not_a_null_reference() {
    let codebase = foo_codebase();
    let mut ctx = ctx_with("$x", Union::null());
    let b = ExprBuilder::new();
    let stmt = b.dynamic_method_call(b.var("x"), b.var("name"), vec![]);

    let outcome = analyze(&codebase, &mut ctx, &stmt);
    assert!(outcome.kinds().is_empty());
    assert_eq!(outcome.result, Ok(()));
}

#[test]
fn test_false_receiver_variant_reports_possibly_false() {
    let codebase = foo_codebase();
    let receiver =
        Union::from_atomics([Atomic::named("Foo"), Atomic::new(AtomicKind::False)]).expect("non-empty");
    let mut ctx = ctx_with("$foo", receiver.clone());
    let b = ExprBuilder::new();
    let stmt = b.method_call(b.var("foo"), "bar", vec![]);

    let outcome = analyze(&codebase, &mut ctx, &stmt);
    assert_eq!(outcome.kinds(), vec!["PossiblyFalseReference"]);
    assert_eq!(outcome.messages(), vec!["Cannot call method bar on possibly false value"]);
    // Neither nullable nor docblock-derived: no narrowing.
    assert_eq!(ctx.var_type("$foo"), Some(&receiver));
}

#[test]
fn test_ignore_nullable_issues_flag_suppresses_possibly_null() {
    let codebase = foo_codebase();
    let receiver = Union::nullable_named("Foo").with_flags(UnionFlags::IGNORE_NULLABLE_ISSUES);
    let mut ctx = ctx_with("$foo", receiver);
    let b = ExprBuilder::new();
    let stmt = b.method_call(b.var("foo"), "bar", vec![]);

    let outcome = analyze(&codebase, &mut ctx, &stmt);
    assert!(outcome.kinds().is_empty());
}

#[test]
fn test_possibly_invalid_receiver_cites_first_invalid_variant() {
    let codebase = foo_codebase();
    let receiver =
        Union::from_atomics([Atomic::named("Foo"), Atomic::new(AtomicKind::Int)]).expect("non-empty");
    let mut ctx = ctx_with("$x", receiver.clone());
    let recorder = RecordingArgs::default();
    let b = ExprBuilder::new();
    let stmt = b.method_call(b.var("x"), "bar", vec![]);

    let outcome = run(&codebase, &mut ctx, &stmt, IssueBuffer::new(), None, Some(&recorder));
    assert_eq!(outcome.kinds(), vec!["PossiblyInvalidMethodCall"]);
    assert_eq!(outcome.messages(), vec!["Cannot call method on possible int variable $x"]);
    assert_eq!(ctx.var_type("$x"), Some(&receiver));
    assert_eq!(
        *recorder.calls.borrow(),
        vec![ArgCheck::Method(Some("Foo::bar".to_string()))]
    );
    assert_eq!(outcome.node_data.get_type(stmt.id), Some(&Union::int()));
}

#[test]
fn test_invalid_receiver_checks_arguments_without_method() {
    let codebase = foo_codebase();
    let mut ctx = ctx_with("$x", Union::int());
    let recorder = RecordingArgs::default();
    let b = ExprBuilder::new();
    let stmt = b.method_call(b.var("x"), "bar", vec![]);

    let outcome = run(&codebase, &mut ctx, &stmt, IssueBuffer::new(), None, Some(&recorder));
    assert_eq!(outcome.kinds(), vec!["InvalidMethodCall"]);
    assert_eq!(outcome.messages(), vec!["Cannot call method on int variable $x"]);
    assert_eq!(*recorder.calls.borrow(), vec![ArgCheck::Method(None)]);
}

#[test]
fn test_check_classes_disabled_only_checks_function_arguments() {
    let codebase = foo_codebase();
    let mut ctx = ctx_with("$x", Union::int());
    ctx.check_classes = false;
    let recorder = RecordingArgs::default();
    let b = ExprBuilder::new();
    let stmt = b.method_call(b.var("x"), "bar", vec![b.int(1)]);

    let outcome = run(&codebase, &mut ctx, &stmt, IssueBuffer::new(), None, Some(&recorder));
    assert!(outcome.kinds().is_empty());
    assert_eq!(*recorder.calls.borrow(), vec![ArgCheck::Function]);
}

// =============================================================================
// Scope
// =============================================================================

#[test]
fn test_this_outside_class_is_invalid_scope() {
    let codebase = foo_codebase();
    let mut ctx = AnalysisContext::new();
    let b = ExprBuilder::new();
    let stmt = b.method_call(b.this(), "bar", vec![]);

    let outcome = analyze(&codebase, &mut ctx, &stmt);
    assert_eq!(outcome.kinds(), vec!["InvalidScope"]);
    assert_eq!(outcome.result, Err(Aborted));

    // Reported at the whole call, not just the receiver.
    let diagnostic = &outcome.issues.diagnostics()[0];
    assert_eq!(diagnostic.start, stmt.span.start);
    assert_eq!(diagnostic.length, stmt.span.len());
    assert!(diagnostic.length > "$this".len() as u32);
}

#[test]
fn test_this_inside_class_resolves_against_class() {
    let codebase = foo_codebase();
    let mut ctx = AnalysisContext::new();
    let b = ExprBuilder::new();
    let stmt = b.method_call(b.this(), "secret", vec![]);

    let outcome = run(&codebase, &mut ctx, &stmt, IssueBuffer::new(), Some("Foo"), None);
    assert!(outcome.kinds().is_empty());
    assert_eq!(outcome.node_data.get_type(stmt.id), Some(&Union::int()));
}

#[test]
fn test_private_method_from_outside_is_inaccessible() {
    let codebase = foo_codebase();
    let mut ctx = ctx_with("$foo", Union::named("Foo"));
    let b = ExprBuilder::new();
    let stmt = b.method_call(b.var("foo"), "secret", vec![]);

    let outcome = analyze(&codebase, &mut ctx, &stmt);
    assert_eq!(outcome.kinds(), vec!["InaccessibleMethod"]);
    assert_eq!(
        outcome.messages(),
        vec!["Cannot access private method Foo::secret from context global scope"]
    );
}

// =============================================================================
// Mixed, magic and mock receivers
// =============================================================================

#[test]
fn test_unknown_receiver_is_mixed() {
    let codebase = foo_codebase();
    let mut ctx = AnalysisContext::new();
    let recorder = RecordingArgs::default();
    let b = ExprBuilder::new();
    let stmt = b.method_call(b.var("unknown"), "bar", vec![]);

    let outcome = run(&codebase, &mut ctx, &stmt, IssueBuffer::new(), None, Some(&recorder));
    assert_eq!(outcome.kinds(), vec!["MixedMethodCall"]);
    assert_eq!(outcome.node_data.get_type(stmt.id), Some(&Union::mixed()));
    assert_eq!(*recorder.calls.borrow(), vec![ArgCheck::Method(None)]);
    assert!(!ctx.has_variable("$unknown"));
}

#[test]
fn test_magic_call_makes_missing_method_callable() {
    let codebase = Codebase::new().with_classlike(
        ClassLikeStorage::class("Proxy").with_method(MethodStorage::new("__call")),
    );
    let mut ctx = ctx_with("$proxy", Union::named("Proxy"));
    let b = ExprBuilder::new();
    let stmt = b.method_call(b.var("proxy"), "anything", vec![b.int(1), b.int(2)]);

    let outcome = analyze(&codebase, &mut ctx, &stmt);
    assert!(outcome.kinds().is_empty());
    assert_eq!(outcome.node_data.get_type(stmt.id), Some(&Union::mixed()));
}

#[test]
fn test_arguments_checked_against_first_resolved_method() {
    let codebase = foo_codebase().with_classlike(
        ClassLikeStorage::class("Proxy").with_method(MethodStorage::new("__call")),
    );
    let receiver = Union::from_atomics([Atomic::named("Proxy"), Atomic::named("Foo")]).expect("non-empty");
    let mut ctx = ctx_with("$target", receiver);
    let recorder = RecordingArgs::default();
    let b = ExprBuilder::new();
    let stmt = b.method_call(b.var("target"), "Bar", vec![b.int(1)]);

    let outcome = run(&codebase, &mut ctx, &stmt, IssueBuffer::new(), None, Some(&recorder));
    assert!(outcome.kinds().is_empty());
    assert_eq!(
        *recorder.calls.borrow(),
        vec![ArgCheck::Method(Some("Proxy::bar".to_string()))]
    );
}

#[test]
fn test_sealed_magic_class_reports_undefined_magic_method() {
    let codebase = Codebase::new().with_classlike(
        ClassLikeStorage::class("Proxy")
            .with_method(MethodStorage::new("__call"))
            .sealed(),
    );
    let mut ctx = ctx_with("$proxy", Union::named("Proxy"));
    let b = ExprBuilder::new();
    let stmt = b.method_call(b.var("proxy"), "anything", vec![]);

    let outcome = analyze(&codebase, &mut ctx, &stmt);
    assert_eq!(outcome.kinds(), vec!["UndefinedMagicMethod"]);
    assert_eq!(outcome.messages(), vec!["Magic method Proxy::anything does not exist"]);
}

#[test]
fn test_pseudo_method_resolves_on_sealed_class() {
    let codebase = Codebase::new().with_classlike(
        ClassLikeStorage::class("Proxy")
            .with_method(MethodStorage::new("__call"))
            .with_pseudo_method(MethodStorage::new("find").returning(Union::string()))
            .sealed(),
    );
    let mut ctx = ctx_with("$proxy", Union::named("Proxy"));
    let b = ExprBuilder::new();
    let stmt = b.method_call(b.var("proxy"), "find", vec![]);

    let outcome = analyze(&codebase, &mut ctx, &stmt);
    assert!(outcome.kinds().is_empty());
    assert_eq!(outcome.node_data.get_type(stmt.id), Some(&Union::string()));
}

#[test]
fn test_mock_class_accepts_any_method() {
    let mut codebase = foo_codebase();
    codebase.add_mock_class("Foo");
    let mut ctx = ctx_with("$foo", Union::named("Foo"));
    let b = ExprBuilder::new();
    let stmt = b.method_call(b.var("foo"), "expects", vec![]);

    let outcome = analyze(&codebase, &mut ctx, &stmt);
    assert!(outcome.kinds().is_empty());
    assert_eq!(outcome.node_data.get_type(stmt.id), Some(&Union::mixed()));
}

#[test]
fn test_template_param_resolves_through_bound() {
    let codebase = foo_codebase();
    let receiver = Union::new(Atomic::template_param("T", Union::named("Foo"), "Box"));
    let mut ctx = ctx_with("$item", receiver);
    let b = ExprBuilder::new();
    let stmt = b.method_call(b.var("item"), "baz", vec![]);

    let outcome = analyze(&codebase, &mut ctx, &stmt);
    assert!(outcome.kinds().is_empty());
    assert_eq!(outcome.node_data.get_type(stmt.id), Some(&Union::string()));
}

#[test]
fn test_nullable_template_receiver_is_narrowed_after_call() {
    let codebase = foo_codebase();
    let receiver = Union::from_atomics([
        Atomic::template_param("T", Union::named("Foo"), "Box"),
        Atomic::null(),
    ])
    .expect("non-empty")
    .mark_from_docblock();
    let mut ctx = ctx_with("$item", receiver);
    let b = ExprBuilder::new();
    let first = b.method_call(b.var("item"), "baz", vec![]);
    let second = b.method_call(b.var("item"), "bar", vec![]);

    let outcome = analyze(&codebase, &mut ctx, &first);
    assert_eq!(outcome.kinds(), vec!["PossiblyNullReference"]);
    assert_eq!(ctx.var_type("$item").map(Union::id).as_deref(), Some("T"));

    let outcome = analyze(&codebase, &mut ctx, &second);
    assert!(outcome.kinds().is_empty());
    assert_eq!(outcome.node_data.get_type(second.id), Some(&Union::int()));
}

#[test]
fn test_inherited_method_resolves_with_own_class_id() {
    let codebase = foo_codebase().with_classlike(ClassLikeStorage::class("Child").extends("Foo"));
    let mut ctx = ctx_with("$child", Union::named("Child"));
    let recorder = RecordingArgs::default();
    let b = ExprBuilder::new();
    let stmt = b.method_call(b.var("child"), "BAR", vec![]);

    let outcome = run(&codebase, &mut ctx, &stmt, IssueBuffer::new(), None, Some(&recorder));
    assert!(outcome.kinds().is_empty());
    assert_eq!(
        *recorder.calls.borrow(),
        vec![ArgCheck::Method(Some("Child::bar".to_string()))]
    );
}

// =============================================================================
// Result type, recording and narrowing
// =============================================================================

#[test]
fn test_docblock_nullable_receiver_is_narrowed_after_call() {
    let codebase = foo_codebase();
    let mut ctx = ctx_with("$foo", Union::nullable_named("Foo").mark_from_docblock());
    ctx.clauses.push(Clause::single("$foo", Assertion::Null));
    ctx.clauses.push(Clause::single("$other", Assertion::NotNull));

    let b = ExprBuilder::new();
    let first = b.method_call(b.var("foo"), "bar", vec![]);
    let outcome = analyze(&codebase, &mut ctx, &first);

    assert_eq!(outcome.kinds(), vec!["PossiblyNullReference"]);
    assert_eq!(outcome.messages(), vec!["Cannot call method bar on possibly null value"]);
    assert_eq!(outcome.result, Ok(()));
    assert_eq!(outcome.node_data.get_type(first.id), Some(&Union::int()));

    let narrowed = ctx.var_type("$foo").expect("still in scope");
    assert_eq!(narrowed, &Union::named("Foo"));
    assert!(!narrowed.is_from_docblock());
    assert!(narrowed.atomic_types().all(|atomic| !atomic.from_docblock));
    assert_eq!(ctx.clauses, vec![Clause::single("$other", Assertion::NotNull)]);
    assert!(ctx.parent_remove_vars.contains("$foo"));

    // The next call on the same variable sees the narrowed type.
    let second = b.method_call(b.var("foo"), "baz", vec![]);
    let outcome = analyze(&codebase, &mut ctx, &second);
    assert!(outcome.kinds().is_empty());
    assert_eq!(outcome.node_data.get_type(second.id), Some(&Union::string()));
}

#[test]
fn test_synthesized_call_does_not_narrow() {
    let codebase = foo_codebase();
    let receiver = Union::nullable_named("Foo");
    let mut ctx = ctx_with("$foo", receiver.clone());
    let b = ExprBuilder::new();
    let stmt = b.method_call(b.var("foo"), "bar", vec![]);

    let mut issues = IssueBuffer::new();
    let result = {
        let mut analyzer = StatementsAnalyzer::new(&codebase, FILE, &mut issues);
        let call = stmt.as_method_call().expect("method call");
        analyzer.analyze_method_call(&stmt, call, &mut ctx, false)
    };
    assert_eq!(result, Ok(()));
    assert!(issues.has_issue(IssueKind::PossiblyNullReference));
    assert_eq!(ctx.var_type("$foo"), Some(&receiver));
}

#[test]
fn test_property_receiver_is_narrowed_by_path() {
    let codebase = foo_codebase();
    let mut ctx = ctx_with("$this->foo", Union::nullable_named("Foo"));
    let b = ExprBuilder::new();
    let stmt = b.method_call(b.property(b.this(), "foo"), "bar", vec![]);

    let outcome = run(&codebase, &mut ctx, &stmt, IssueBuffer::new(), Some("Owner"), None);
    assert_eq!(outcome.kinds(), vec!["PossiblyNullReference"]);
    assert_eq!(ctx.var_type("$this->foo"), Some(&Union::named("Foo")));
}

#[test]
fn test_by_ref_return_marks_result_type() {
    let codebase = Codebase::new().with_classlike(
        ClassLikeStorage::class("Registry")
            .with_method(MethodStorage::new("items").returning(Union::int()).by_ref())
            .with_method(MethodStorage::new("untyped").by_ref()),
    );
    let mut ctx = ctx_with("$r", Union::named("Registry"));
    let b = ExprBuilder::new();
    let typed = b.method_call(b.var("r"), "items", vec![]);
    let untyped = b.method_call(b.var("r"), "untyped", vec![]);

    let outcome = analyze(&codebase, &mut ctx, &typed);
    let ty = outcome.node_data.get_type(typed.id).expect("typed");
    assert!(ty.is_by_ref());
    assert_eq!(ty.id(), "int");

    let outcome = analyze(&codebase, &mut ctx, &untyped);
    let ty = outcome.node_data.get_type(untyped.id).expect("typed");
    assert!(ty.is_by_ref());
    assert!(ty.is_mixed());
}

#[test]
fn test_call_types_are_recorded_when_enabled() {
    let mut codebase = foo_codebase();
    codebase.store_node_types = true;
    let mut ctx = ctx_with("$foo", Union::named("Foo"));
    let b = ExprBuilder::new();
    let stmt = b.method_call(b.var("foo"), "bar", vec![]);
    let name_span = stmt
        .as_method_call()
        .expect("method call")
        .name
        .span();

    analyze(&codebase, &mut ctx, &stmt);
    let records = codebase.node_types().for_file(FILE);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].type_id, "int");
    assert_eq!(records[0].span, name_span);
    assert_eq!(records[0].node, stmt.id);
}

#[test]
fn test_call_types_are_not_recorded_in_speculative_pass() {
    let mut codebase = foo_codebase();
    codebase.store_node_types = true;
    let mut ctx = ctx_with("$foo", Union::named("Foo"));
    ctx.collect_mutations = true;
    let b = ExprBuilder::new();
    let stmt = b.method_call(b.var("foo"), "bar", vec![]);

    analyze(&codebase, &mut ctx, &stmt);
    assert!(codebase.node_types().for_file(FILE).is_empty());
}

#[test]
fn test_chained_call_uses_previous_return_type() {
    let codebase = Codebase::new()
        .with_classlike(
            ClassLikeStorage::class("Builder")
                .with_method(MethodStorage::new("next").returning(Union::nullable_named("Builder"))),
        );
    let mut ctx = ctx_with("$b", Union::named("Builder"));
    let b = ExprBuilder::new();
    let inner = b.method_call(b.var("b"), "next", vec![]);
    let stmt = b.method_call(inner, "next", vec![]);

    let outcome = analyze(&codebase, &mut ctx, &stmt);
    assert_eq!(outcome.kinds(), vec!["PossiblyNullReference"]);
    assert_eq!(
        outcome.node_data.get_type(stmt.id),
        Some(&Union::nullable_named("Builder"))
    );
    assert!(!ctx.inside_call);
}

fn next_chain(b: &ExprBuilder, calls: u32) -> Expr {
    let mut expr = b.var("node");
    for _ in 0..calls {
        expr = b.method_call(expr, "next", vec![]);
    }
    expr
}

fn linked_codebase() -> Codebase {
    Codebase::new().with_classlike(
        ClassLikeStorage::class("Node").with_method(MethodStorage::new("next").returning(Union::named("Node"))),
    )
}

#[test]
fn test_chain_at_depth_limit_resolves_on_default_stack() {
    let codebase = linked_codebase();
    let mut ctx = ctx_with("$node", Union::named("Node"));
    let b = ExprBuilder::new();
    // The innermost receiver sits exactly at the last allowed depth.
    let stmt = next_chain(&b, MAX_EXPR_CHECK_DEPTH - 1);

    let outcome = analyze(&codebase, &mut ctx, &stmt);
    assert_eq!(outcome.result, Ok(()));
    assert!(outcome.kinds().is_empty());
    assert_eq!(outcome.node_data.get_type(stmt.id), Some(&Union::named("Node")));
}

#[test]
fn test_chain_past_depth_limit_falls_back_to_mixed() {
    let codebase = linked_codebase();
    let mut ctx = ctx_with("$node", Union::named("Node"));
    let b = ExprBuilder::new();
    let stmt = next_chain(&b, MAX_EXPR_CHECK_DEPTH + 50);

    let outcome = analyze(&codebase, &mut ctx, &stmt);
    assert_eq!(outcome.result, Ok(()));
    assert!(outcome.kinds().iter().all(|kind| *kind == "MixedMethodCall"));
    assert_eq!(outcome.node_data.get_type(stmt.id), Some(&Union::mixed()));
}

// =============================================================================
// Arguments
// =============================================================================

#[test]
fn test_too_few_arguments_for_resolved_method() {
    let codebase = foo_codebase();
    let mut ctx = ctx_with("$foo", Union::named("Foo"));
    let b = ExprBuilder::new();
    let stmt = b.method_call(b.var("foo"), "take", vec![]);

    let outcome = analyze(&codebase, &mut ctx, &stmt);
    assert_eq!(outcome.kinds(), vec!["TooFewArguments"]);
    assert_eq!(
        outcome.messages(),
        vec!["Too few arguments for method Foo::take - expecting 1 but saw 0"]
    );
    assert_eq!(outcome.result, Err(Aborted));
}

#[test]
fn test_too_many_arguments_for_resolved_method() {
    let codebase = foo_codebase();
    let mut ctx = ctx_with("$foo", Union::named("Foo"));
    let b = ExprBuilder::new();
    let stmt = b.method_call(b.var("foo"), "take", vec![b.int(1), b.int(2), b.int(3)]);

    let outcome = analyze(&codebase, &mut ctx, &stmt);
    assert_eq!(
        outcome.messages(),
        vec!["Too many arguments for method Foo::take - expecting 2 but saw 3"]
    );
}

#[test]
fn test_arguments_are_analyzed_as_call_operands() {
    let codebase = foo_codebase();
    let mut ctx = ctx_with("$foo", Union::named("Foo"));
    ctx.set_var_type("$maybe", Union::null());
    let b = ExprBuilder::new();
    // The argument is itself a call on a null receiver.
    let arg = b.method_call(b.var("maybe"), "bar", vec![]);
    let stmt = b.method_call(b.var("foo"), "take", vec![arg]);

    let outcome = analyze(&codebase, &mut ctx, &stmt);
    assert_eq!(outcome.kinds(), vec!["NullReference"]);
    assert_eq!(outcome.result, Err(Aborted));
}
