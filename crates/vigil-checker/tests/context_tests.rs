use super::*;
use crate::clause::{Assertion, Clause, filter_clauses};
use crate::expr::get_var_id;
use vigil_solver::{Atomic, AtomicKind, Union};

// =============================================================================
// Context defaults
// =============================================================================

#[test]
fn test_default_context_checks_everything() {
    let ctx = AnalysisContext::default();
    assert!(ctx.check_classes);
    assert!(ctx.check_methods);
    assert!(!ctx.inside_call);
    assert!(!ctx.is_speculative());
}

#[test]
fn test_speculative_modes() {
    let mut ctx = AnalysisContext::new();
    ctx.collect_initializations = true;
    assert!(ctx.is_speculative());
}

#[test]
fn test_remove_var_with_compatible_type_keeps_clause() {
    let mut ctx = AnalysisContext::new();
    ctx.clauses.push(Clause::single("$x", Assertion::IsType("Foo".to_string())));
    ctx.clauses.push(Clause::single("$x", Assertion::Null));

    ctx.remove_var_from_conflicting_clauses("$x", Some(&Union::named("Foo")));
    assert_eq!(
        ctx.clauses,
        vec![Clause::single("$x", Assertion::IsType("Foo".to_string()))]
    );
}

// =============================================================================
// Assertions
// =============================================================================

#[test]
fn test_assertions_against_types() {
    let nullable = Union::nullable_named("Foo");
    assert!(Assertion::Null.can_hold_for(&nullable));
    assert!(Assertion::NotNull.can_hold_for(&nullable));
    assert!(!Assertion::Null.can_hold_for(&Union::named("Foo")));
    assert!(!Assertion::NotNull.can_hold_for(&Union::null()));

    assert!(!Assertion::Falsy.can_hold_for(&Union::named("Foo")));
    assert!(Assertion::Falsy.can_hold_for(&Union::int()));
    assert!(!Assertion::Truthy.can_hold_for(&Union::null()));

    assert!(Assertion::IsType("foo".to_string()).can_hold_for(&Union::named("Foo")));
    assert!(!Assertion::IsType("Bar".to_string()).can_hold_for(&Union::named("Foo")));
    assert!(!Assertion::NotType("Foo".to_string()).can_hold_for(&Union::named("Foo")));

    let object = Union::new(Atomic::new(AtomicKind::Object));
    assert!(Assertion::IsType("Bar".to_string()).can_hold_for(&object));
    assert!(Assertion::Null.can_hold_for(&Union::mixed()));
}

#[test]
fn test_filter_clauses_keeps_unrelated() {
    let clauses = vec![
        Clause::single("$a", Assertion::Null),
        Clause::single("$b", Assertion::Null),
    ];
    let kept = filter_clauses("$a", &clauses, None);
    assert_eq!(kept, vec![Clause::single("$b", Assertion::Null)]);
}

#[test]
fn test_clause_display_and_lookup() {
    let clause = Clause::single("$a", Assertion::NotNull).or("$a", Assertion::NotType("Foo".to_string()));
    let rendered: Vec<String> = clause.assertions_for("$a").iter().map(ToString::to_string).collect();
    assert_eq!(rendered, vec!["!null", "!Foo"]);
    assert!(clause.assertions_for("$b").is_empty());
    assert!(clause.mentions("$a"));
}

// =============================================================================
// Variable ids
// =============================================================================

#[test]
fn test_var_ids() {
    let b = ExprBuilder::new();
    assert_eq!(get_var_id(&b.var("foo")).as_deref(), Some("$foo"));
    assert_eq!(
        get_var_id(&b.property(b.property(b.this(), "a"), "b")).as_deref(),
        Some("$this->a->b")
    );
    assert_eq!(get_var_id(&b.method_call(b.var("foo"), "bar", vec![])), None);
    assert_eq!(get_var_id(&b.new_object("Foo")), None);
}

#[test]
fn test_builder_assigns_unique_ids_and_covering_spans() {
    let b = ExprBuilder::new();
    let receiver = b.var("foo");
    let receiver_span = receiver.span;
    let call = b.method_call(receiver, "bar", vec![b.int(1)]);
    let ExprKind::MethodCall(inner) = &call.kind else {
        panic!("expected a method call");
    };
    assert_ne!(call.id, inner.var.id);
    assert_eq!(call.span.start, receiver_span.start);
    assert!(call.span.end >= inner.args[0].value.span.end);
    assert!(inner.name.span().start > receiver_span.end);
}
