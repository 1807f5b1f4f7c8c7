//! Matching semantics: tier precedence, scope shadowing, conjunction
//! inheritance and ambiguity handling.

use std::sync::Arc;

use cornichon::{
    MatchConfig, MatchContext, Matcher, Registry, Returned, Step,
    StepDefinition, StepKind, StepPattern, Tier,
};

fn noop() -> impl Fn(cornichon::StepContext) -> Result<Returned, cornichon::StepFault>
       + Send
       + Sync
       + 'static {
    |_| Ok(Returned::Unit)
}

#[test]
fn local_typeless_definition_shadows_parent_strict_one() {
    let mut parent = Registry::new();
    parent.register(
        StepDefinition::given(StepPattern::exact("I have a wallet"))
            .to_sync(noop()),
    );
    let parent = Arc::new(parent);

    let mut child = Registry::with_parent(Arc::clone(&parent));
    child.register(
        StepDefinition::any(StepPattern::exact("I have a wallet"))
            .to_sync(noop()),
    );

    let matcher = Matcher::new(&child);
    let resolution = matcher
        .resolve(&Step::new("Given", "I have a wallet"), &mut MatchContext::new())
        .unwrap();

    assert_eq!(resolution.scope_depth, 0, "child scope must win");
    assert_eq!(resolution.tier, Tier::Unspecified);
    assert_eq!(resolution.definition.kind(), None);
}

#[test]
fn local_liberal_definition_shadows_parent_strict_one() {
    let mut parent = Registry::new();
    parent.register(
        StepDefinition::given(StepPattern::exact("I have a wallet"))
            .to_sync(noop()),
    );
    let parent = Arc::new(parent);

    let mut child = Registry::with_parent(parent);
    child.register(
        StepDefinition::then(StepPattern::exact("I have a wallet"))
            .liberal(true)
            .to_sync(noop()),
    );

    let matcher = Matcher::new(&child);
    let resolution = matcher
        .resolve(&Step::new("Given", "I have a wallet"), &mut MatchContext::new())
        .unwrap();

    assert_eq!(resolution.scope_depth, 0);
    assert_eq!(resolution.tier, Tier::Liberal);
    assert_eq!(resolution.definition.kind(), Some(StepKind::Outcome));
}

#[test]
fn grandparent_scope_is_reachable() {
    let mut grandparent = Registry::new();
    grandparent.register(
        StepDefinition::when(StepPattern::exact("I blink")).to_sync(noop()),
    );
    let parent = Arc::new(Registry::with_parent(Arc::new(grandparent)));
    let child = Registry::with_parent(parent);

    let matcher = Matcher::new(&child);
    let resolution = matcher
        .resolve(&Step::new("When", "I blink"), &mut MatchContext::new())
        .unwrap();
    assert_eq!(resolution.scope_depth, 2);
}

#[test]
fn conjunction_steps_inherit_the_preceding_kind() {
    let mut registry = Registry::new();
    registry.register(
        StepDefinition::given(StepPattern::exact("A")).to_sync(noop()),
    );
    registry.register(
        StepDefinition::given(StepPattern::exact("B")).to_sync(noop()),
    );
    registry.register(
        StepDefinition::when(StepPattern::exact("C")).to_sync(noop()),
    );

    let matcher = Matcher::new(&registry);
    let mut ctx = MatchContext::new();

    let a = matcher.resolve(&Step::new("Given", "A"), &mut ctx).unwrap();
    assert_eq!(a.tier, Tier::Strict);

    // `And B` must match the context-kind definition of `B`, not fall
    // into the unknown tier.
    let b = matcher.resolve(&Step::new("And", "B"), &mut ctx).unwrap();
    assert_eq!(b.tier, Tier::Strict);
    assert_eq!(b.definition.kind(), Some(StepKind::Context));

    let c = matcher.resolve(&Step::new("When", "C"), &mut ctx).unwrap();
    assert_eq!(c.definition.kind(), Some(StepKind::Action));
    assert_eq!(ctx.current(), Some(StepKind::Action));
}

#[test]
fn but_and_wildcard_also_inherit() {
    let mut registry = Registry::new();
    registry.register(
        StepDefinition::then(StepPattern::exact("it holds")).to_sync(noop()),
    );
    registry.register(
        StepDefinition::then(StepPattern::exact("it still holds"))
            .to_sync(noop()),
    );

    let matcher = Matcher::new(&registry);
    let mut ctx = MatchContext::new();

    matcher
        .resolve(&Step::new("Then", "it holds"), &mut ctx)
        .unwrap();
    let but = matcher
        .resolve(&Step::new("But", "it still holds"), &mut ctx)
        .unwrap();
    assert_eq!(but.tier, Tier::Strict);

    let star = matcher
        .resolve(&Step::new("*", "it holds"), &mut ctx)
        .unwrap();
    assert_eq!(star.tier, Tier::Strict);
}

#[test]
fn ambiguous_match_warns_but_selects_first_registered() {
    let mut registry = Registry::new();
    let first_id = registry
        .register(
            StepDefinition::given(StepPattern::exact("a duplicate"))
                .to_sync(noop()),
        )
        .id();
    registry.register(
        StepDefinition::given(StepPattern::exact("a duplicate"))
            .to_sync(noop()),
    );

    let matcher = Matcher::new(&registry);
    let resolution = matcher
        .resolve(&Step::new("Given", "a duplicate"), &mut MatchContext::new())
        .unwrap();

    assert!(resolution.is_ambiguous());
    assert_eq!(resolution.candidates.len(), 2);
    assert_eq!(resolution.definition.id(), first_id);
}

#[test]
fn liberal_default_applies_only_to_unspecified_flags() {
    let mut registry = Registry::new();
    registry.register(
        StepDefinition::then(StepPattern::exact("flexible")).to_sync(noop()),
    );
    registry.register(
        StepDefinition::then(StepPattern::exact("rigid"))
            .liberal(false)
            .to_sync(noop()),
    );

    let matcher = Matcher::with_config(
        &registry,
        MatchConfig { liberal_by_default: true },
    );

    assert!(matcher
        .resolve(&Step::new("Given", "flexible"), &mut MatchContext::new())
        .is_ok());
    assert!(matcher
        .resolve(&Step::new("Given", "rigid"), &mut MatchContext::new())
        .is_err());
}

#[test]
fn matching_same_step_repeatedly_is_deterministic() {
    let mut registry = Registry::new();
    registry.register(
        StepDefinition::given(StepPattern::template("I have {n} cukes").unwrap())
            .to_sync(noop()),
    );
    registry.register(
        StepDefinition::given(StepPattern::expression("I have {int} cukes").unwrap())
            .to_sync(noop()),
    );

    let matcher = Matcher::new(&registry);
    let chosen = matcher
        .resolve(&Step::new("Given", "I have 5 cukes"), &mut MatchContext::new())
        .unwrap()
        .definition
        .id();
    for _ in 0..20 {
        let again = matcher
            .resolve(&Step::new("Given", "I have 5 cukes"), &mut MatchContext::new())
            .unwrap()
            .definition
            .id();
        assert_eq!(again, chosen);
    }
}
