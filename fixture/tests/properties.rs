//! Properties that must hold for any expression, seed or manipulation list

#![allow(clippy::unwrap_used, clippy::panic, reason = "tests")]

mod support;

use fixture_forge::path::{NodePath, Segment};
use fixture_forge::tree::{NullPolicy, PropertyNode, ValueSource};
use fixture_forge::{Error, FixtureBuilder, GenerateOptions, Manipulate, PathExpression};
use proptest::collection::vec;
use proptest::prelude::*;
use serde_json::{Value, json};

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 64,
        ..ProptestConfig::default()
    }
}

fn seeded(seed: u64) -> fixture_forge::FixtureSession {
    support::session_with(GenerateOptions::default().with_seed(seed).with_null_inject(0.0))
}

// ============================================================================
// Path expressions
// ============================================================================

fn segment() -> impl Strategy<Value = Segment> {
    prop_oneof![
        "[a-z_][a-z0-9_]{0,6}".prop_map(Segment::Name),
        Just(Segment::AnyName),
        (0usize..50).prop_map(Segment::Index),
        Just(Segment::AnyIndex),
    ]
}

/// Render segments with `gaps` spaces cycled between tokens
fn render(segments: &[Segment], rooted: bool, gaps: &[usize]) -> String {
    let mut gaps = gaps.iter().cycle().map(|count| " ".repeat(*count));
    let mut gap = || gaps.next().unwrap_or_default();

    let mut text = gap();
    if rooted {
        text.push('$');
    }
    for (position, segment) in segments.iter().enumerate() {
        match segment {
            Segment::Name(_) | Segment::AnyName => {
                let name = match segment {
                    Segment::Name(name) => name.clone(),
                    _ => "*".to_string(),
                };
                if position > 0 || rooted {
                    text.push_str(&format!("{}.{}", gap(), gap()));
                }
                text.push_str(&name);
            }
            Segment::Index(_) | Segment::AnyIndex => {
                let index = match segment {
                    Segment::Index(index) => index.to_string(),
                    _ => "*".to_string(),
                };
                text.push_str(&format!("{}[{}{}{}]", gap(), gap(), index, gap()));
            }
        }
    }
    text.push_str(&gap());
    text
}

/// A concrete path the expression must select
fn instantiate(segments: &[Segment]) -> NodePath {
    segments
        .iter()
        .fold(NodePath::root(), |path, segment| match segment {
            Segment::Name(name) => path.child(name),
            Segment::AnyName => path.child("any"),
            Segment::Index(index) => path.element(*index),
            Segment::AnyIndex => path.element(7),
        })
}

proptest! {
    #![proptest_config(config())]

    #[test]
    fn test_expressions_ignore_spacing_and_root_marker(
        segments in vec(segment(), 1..6),
        rooted in any::<bool>(),
        gaps in vec(0usize..3, 1..8),
    ) {
        let loose = PathExpression::parse(&render(&segments, rooted, &gaps)).unwrap();
        let tight = PathExpression::parse(&render(&segments, false, &[0])).unwrap();

        prop_assert_eq!(&loose, &tight);
        prop_assert_eq!(&loose, &PathExpression::from_segments(segments.clone()));

        let concrete = instantiate(&segments);
        prop_assert!(loose.matches(&concrete));
        prop_assert!(!loose.matches(&concrete.child("extra")));
    }
}

// ============================================================================
// Container sizes
// ============================================================================

proptest! {
    #![proptest_config(config())]

    #[test]
    fn test_shrinking_keeps_the_first_element(
        seed in any::<u64>(),
        large in 1usize..6,
        small in 0usize..6,
        sku in "[A-Z]{1,8}",
    ) {
        let small = small.min(large);
        let order = seeded(seed)
            .builder("shop::Order")
            .exact_size("lines", large)
            .set("lines[0].sku", sku.as_str())
            .exact_size("lines", small)
            .sample()
            .unwrap();

        let lines = order["lines"].as_array().unwrap();
        prop_assert_eq!(lines.len(), small);
        if let Some(first) = lines.first() {
            prop_assert_eq!(&first["sku"], &json!(sku));
        }
    }

    #[test]
    fn test_inverted_bounds_always_fail(max in 0usize..10, excess in 1usize..10) {
        let min = max + excess;
        for builder in [
            seeded(1).builder("shop::Order").min_size("lines", min).max_size("lines", max),
            seeded(1).builder("shop::Order").size("lines", min, max),
        ] {
            let report = builder.sample().unwrap_err();
            prop_assert!(matches!(report.current_context(), Error::InvalidArgument(_)));
            prop_assert!(report.current_context().to_string().contains("exceeds max"));
        }
    }
}

// ============================================================================
// Null ordering
// ============================================================================

fn customer_sets() -> impl Strategy<Value = Vec<(&'static str, String)>> {
    vec((prop_oneof![Just("name"), Just("email")], "[a-z]{1,6}"), 0..3)
}

fn with_customer_sets(builder: FixtureBuilder, sets: &[(&str, String)]) -> FixtureBuilder {
    sets.iter().fold(builder, |builder, (member, value)| {
        builder.set(&format!("customer.{member}"), value.as_str())
    })
}

proptest! {
    #![proptest_config(config())]

    #[test]
    fn test_last_null_directive_wins_over_descendant_sets(
        seed in any::<u64>(),
        before in customer_sets(),
        between in customer_sets(),
        after in customer_sets(),
    ) {
        let session = seeded(seed);

        let null_then_present = with_customer_sets(session.builder("shop::Order"), &before)
            .set_null("customer");
        let null_then_present = with_customer_sets(null_then_present, &between)
            .set_not_null("customer");
        let null_then_present = with_customer_sets(null_then_present, &after);
        prop_assert!(null_then_present.sample().unwrap()["customer"].is_object());

        let present_then_null = with_customer_sets(session.builder("shop::Order"), &before)
            .set_not_null("customer");
        let present_then_null = with_customer_sets(present_then_null, &between)
            .set_null("customer");
        let present_then_null = with_customer_sets(present_then_null, &after);
        prop_assert_eq!(&present_then_null.sample().unwrap()["customer"], &Value::Null);
    }
}

// ============================================================================
// Conditional rewrites
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    Id(u64),
    CustomerName(String),
    Note(Option<String>),
    Lines(usize),
    Sku(String),
    Quantity(u32),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u64>().prop_map(Op::Id),
        "[a-z]{1,6}".prop_map(Op::CustomerName),
        proptest::option::of("[a-z]{1,6}").prop_map(Op::Note),
        (0usize..4).prop_map(Op::Lines),
        "[A-Z]{1,4}".prop_map(Op::Sku),
        any::<u32>().prop_map(Op::Quantity),
    ]
}

fn apply_ops<M: Manipulate>(manipulations: M, ops: &[Op]) -> M {
    ops.iter().fold(manipulations, |m, op| match op {
        Op::Id(id) => m.set("id", *id),
        Op::CustomerName(name) => m.set("customer.name", name.as_str()),
        Op::Note(Some(note)) => m.set("note", note.as_str()),
        Op::Note(None) => m.set_null("note"),
        Op::Lines(count) => m.exact_size("lines", *count),
        Op::Sku(sku) => m.set("lines[*].sku", sku.as_str()),
        Op::Quantity(quantity) => m.set("lines[0].quantity", *quantity),
    })
}

/// Path, null policy and fixed value of every node, in pre-order
fn directives_of(tree: &PropertyNode) -> Vec<(String, NullPolicy, Option<Value>)> {
    let mut directives = Vec::new();
    tree.walk(&mut |node| {
        let fixed = node
            .directives()
            .value
            .as_ref()
            .and_then(|directive| match &directive.source {
                ValueSource::Fixed(value) => Some(value.clone()),
                ValueSource::Supplier(_) => None,
            });
        directives.push((node.path().to_string(), node.directives().null.policy, fixed));
    });
    directives
}

fn order_builder(seed: u64) -> FixtureBuilder {
    seeded(seed)
        .builder("shop::Order")
        .default_size("lines", 2, 2)
        .unwrap()
        .default_size("tags", 0, 0)
        .unwrap()
        .default_size("stock", 0, 0)
        .unwrap()
}

proptest! {
    #![proptest_config(config())]

    #[test]
    fn test_always_true_accept_if_equals_appending(
        seed in any::<u64>(),
        outer in vec(op(), 0..5),
        inner in vec(op(), 0..5),
    ) {
        let appended = apply_ops(apply_ops(order_builder(seed), &outer), &inner);

        let deferred_inner = inner.clone();
        let conditional = apply_ops(order_builder(seed), &outer)
            .accept_if(|_| true, move |m| apply_ops(m, &deferred_inner));

        prop_assert_eq!(
            directives_of(&conditional.build_tree().unwrap()),
            directives_of(&appended.build_tree().unwrap())
        );
    }
}

// ============================================================================
// Builder assembly
// ============================================================================

proptest! {
    #![proptest_config(config())]

    #[test]
    fn test_builder_members_without_a_step_keep_the_builder_default(
        seed in any::<u64>(),
        owner in "[a-z]{1,10}",
        limit in 0i64..1_000_000,
    ) {
        let account = seeded(seed)
            .builder("shop::Account")
            .set("owner", owner.as_str())
            .set("limit", limit)
            .sample()
            .unwrap();
        prop_assert_eq!(account, json!({"owner": owner, "limit": limit, "state": "open"}));
    }
}
