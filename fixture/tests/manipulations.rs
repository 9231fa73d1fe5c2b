//! Manipulation behavior observed through sampled values

#![allow(clippy::unwrap_used, clippy::panic, reason = "tests")]

mod support;

use fixture_forge::{Error, GenerateOptions, Manipulate, PathExpression};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

#[test]
fn test_root_marker_and_whitespace_do_not_change_expressions() {
    let plain = PathExpression::parse("lines[0].sku").unwrap();
    assert_eq!(PathExpression::parse("$.lines[0].sku").unwrap(), plain);
    assert_eq!(PathExpression::parse(" lines [ 0 ] . sku ").unwrap(), plain);
    assert_ne!(PathExpression::parse("lines[*].sku").unwrap(), plain);
}

#[test]
fn test_set_fixes_scalars() {
    let order = support::session()
        .builder("shop::Order")
        .set("id", 1001)
        .set("customer.name", "Grace")
        .sample()
        .unwrap();
    assert_eq!(order["id"], json!(1001));
    assert_eq!(order["customer"]["name"], json!("Grace"));
}

#[test]
fn test_set_decomposes_structured_values() {
    let order = support::session()
        .builder("shop::Order")
        .set(
            "lines",
            json!([{"sku": "A-1", "quantity": 2, "price": {"cents": 250, "currency": "EUR"}}]),
        )
        .set("tags", json!(["gift", "express"]))
        .set("stock", json!({"A-1": 4, "B-2": 0}))
        .sample()
        .unwrap();

    assert_eq!(
        order["lines"],
        json!([{
            "sku": "A-1",
            "quantity": 2,
            "price": {"cents": 250, "currency": "EUR", "checked": true}
        }])
    );
    assert_eq!(order["tags"], json!(["gift", "express"]));
    assert_eq!(order["stock"], json!({"A-1": 4, "B-2": 0}));
}

#[test]
fn test_later_element_sets_refine_a_decomposed_list() {
    let order = support::session()
        .builder("shop::Order")
        .set("lines", json!([{"sku": "A", "quantity": 1}, {"sku": "B", "quantity": 1}]))
        .set("lines[1].sku", "C")
        .sample()
        .unwrap();
    let skus: Vec<_> = order["lines"]
        .as_array()
        .unwrap()
        .iter()
        .map(|line| line["sku"].clone())
        .collect();
    assert_eq!(skus, [json!("A"), json!("C")]);
}

#[test]
fn test_shrinking_a_list_keeps_earlier_elements() {
    let order = support::session()
        .builder("shop::Order")
        .size("lines", 3, 3)
        .set("lines[0].sku", "keep")
        .size("lines", 1, 1)
        .sample()
        .unwrap();
    let lines = order["lines"].as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["sku"], json!("keep"));
}

#[test]
fn test_conflicting_bounds_report_min_exceeding_max() {
    let report = support::session()
        .builder("shop::Order")
        .min_size("lines", 5)
        .max_size("lines", 1)
        .sample()
        .unwrap_err();
    let Error::InvalidArgument(message) = report.current_context() else {
        panic!("expected InvalidArgument, got {:?}", report.current_context());
    };
    assert!(message.contains("exceeds max"), "{message}");
}

#[test]
fn test_directly_inverted_size_is_rejected() {
    let report = support::session()
        .builder("shop::Order")
        .size("lines", 4, 2)
        .sample()
        .unwrap_err();
    assert!(matches!(report.current_context(), Error::InvalidArgument(_)));
}

#[test]
fn test_most_recent_null_directive_wins() {
    let session = support::session_with(GenerateOptions::default().with_seed(3));
    for _ in 0..10 {
        let not_null = session
            .builder("shop::Order")
            .set_null("note")
            .set_not_null("note")
            .sample()
            .unwrap();
        assert!(not_null["note"].is_string());

        let null = session
            .builder("shop::Order")
            .set_not_null("note")
            .set_null("note")
            .sample()
            .unwrap();
        assert_eq!(null["note"], Value::Null);
    }
}

#[test]
fn test_setting_null_forces_null() {
    let order = support::session()
        .builder("shop::Order")
        .set("customer", Value::Null)
        .sample()
        .unwrap();
    assert_eq!(order["customer"], Value::Null);
}

#[test]
fn test_setting_an_optional_payload_makes_it_present() {
    let session = support::session_with(GenerateOptions::default().with_seed(5).with_null_inject(1.0));
    let order = session.builder("shop::Order").set("coupon[0]", "WELCOME").sample().unwrap();
    assert_eq!(order["coupon"], json!("WELCOME"));
}

#[test]
fn test_set_with_draws_on_every_sample() {
    let counter = std::sync::Arc::new(std::sync::atomic::AtomicU64::new(0));
    let supplier_counter = counter.clone();
    let builder = support::session().builder("shop::Order").set_with("id", move || {
        json!(supplier_counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst))
    });
    assert_eq!(builder.sample().unwrap()["id"], json!(0));
    assert_eq!(builder.sample().unwrap()["id"], json!(1));
    assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 2);
}

#[test]
fn test_supplied_objects_yield_to_later_manipulations() {
    let customer = support::session()
        .builder("shop::Order")
        .set_with("customer", || json!({"name": "Supplied", "email": "s@example.com"}))
        .set("customer.name", "Later")
        .sample()
        .unwrap()["customer"]
        .clone();
    assert_eq!(customer["name"], json!("Later"));
    assert_eq!(customer["contact"], json!("s@example.com"));
}

#[test]
fn test_member_set_after_a_null_supplier_is_kept() {
    let order = support::session()
        .builder("shop::Order")
        .set_with("customer", || Value::Null)
        .set("customer.name", "test")
        .sample()
        .unwrap();
    assert_eq!(order["customer"]["name"], json!("test"));
}

#[test]
fn test_member_set_after_a_null_root_supplier_is_kept() {
    let customer = support::session()
        .builder("shop::Customer")
        .set_with("$", || Value::Null)
        .set("name", "test")
        .sample()
        .unwrap();
    assert_eq!(customer["name"], json!("test"));
}

#[test]
fn test_null_supplier_without_later_sets_is_null() {
    let order = support::session()
        .builder("shop::Order")
        .set("customer.name", "earlier")
        .set_with("customer", || Value::Null)
        .sample()
        .unwrap();
    assert_eq!(order["customer"], Value::Null);
}

#[test]
fn test_limit_applies_to_first_matches() {
    let order = support::session()
        .builder("shop::Order")
        .exact_size("lines", 3)
        .set_limited("lines[*].quantity", 5, 2)
        .sample()
        .unwrap();
    let fives = order["lines"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|line| line["quantity"] == json!(5))
        .count();
    assert!(fives >= 2);
    assert_eq!(order["lines"][0]["quantity"], json!(5));
    assert_eq!(order["lines"][1]["quantity"], json!(5));
}

#[test]
fn test_zero_limit_applies_nowhere() {
    let order = support::session()
        .builder("shop::Order")
        .set_limited("note", "never", 0)
        .sample()
        .unwrap();
    assert_ne!(order["note"], json!("never"));
}

#[test]
fn test_post_conditions_hold_for_every_element() {
    let order = support::session()
        .builder("shop::Order")
        .exact_size("lines", 3)
        .set_post_condition_as::<u32>("lines[*].quantity", "u32", |quantity| quantity % 2 == 0)
        .sample()
        .unwrap();
    for line in order["lines"].as_array().unwrap() {
        assert_eq!(line["quantity"].as_u64().unwrap() % 2, 0);
    }
}

#[test]
fn test_post_condition_with_wrong_type_is_rejected() {
    let report = support::session()
        .builder("shop::Order")
        .set_post_condition("id", "String", |_| true)
        .sample()
        .unwrap_err();
    let Error::InvalidArgument(message) = report.current_context() else {
        panic!("expected InvalidArgument, got {:?}", report.current_context());
    };
    assert!(message.starts_with("Wrong type filter is applied"), "{message}");
}

#[test]
fn test_unsatisfiable_post_condition_exhausts() {
    let session = support::session_with(GenerateOptions {
        max_filter_attempts: 3,
        ..GenerateOptions::default().with_seed(1).with_null_inject(0.0)
    });
    let report = session
        .builder("shop::Order")
        .exact_size("lines", 1)
        .set_post_condition("lines[0].sku", "String", |_| false)
        .sample()
        .unwrap_err();
    assert_eq!(
        report.current_context(),
        &Error::FilterExhausted {
            path:     "lines[0].sku".to_string(),
            attempts: 3,
        }
    );
}

#[test]
fn test_post_conditions_reject_fixed_values() {
    let report = support::session()
        .builder("shop::Order")
        .set("id", 4)
        .set_post_condition_as::<u64>("id", "u64", |id| id % 2 == 1)
        .sample()
        .unwrap_err();
    assert_eq!(
        report.current_context(),
        &Error::FilterExhausted {
            path:     "id".to_string(),
            attempts: 1,
        }
    );
}

#[test]
fn test_post_conditions_redraw_supplied_values() {
    let counter = std::sync::Arc::new(std::sync::atomic::AtomicU64::new(0));
    let supplier_counter = counter.clone();
    let order = support::session()
        .builder("shop::Order")
        .set_with("id", move || {
            json!(supplier_counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst))
        })
        .set_post_condition_as::<u64>("id", "u64", |id| *id == 3)
        .sample()
        .unwrap();
    assert_eq!(order["id"], json!(3));
    assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 4);
}

#[test]
fn test_accept_if_always_true_sets_the_value() {
    let order = support::session()
        .builder("shop::Order")
        .accept_if(|_| true, |m| m.set("note", "accepted"))
        .sample()
        .unwrap();
    assert_eq!(order["note"], json!("accepted"));
}

#[test]
fn test_accept_if_runs_after_the_rest_of_the_list() {
    let order = support::session()
        .builder("shop::Order")
        .accept_if(|_| true, |m| m.set("note", "conditional"))
        .set("note", "direct")
        .sample()
        .unwrap();
    assert_eq!(order["note"], json!("conditional"));
}

#[test]
fn test_apply_sees_values_from_before_it_only() {
    let order = support::session()
        .builder("shop::Order")
        .set("note", "set")
        .apply(|order, m| {
            m.exact_size("lines", 1)
                .set("lines[0].sku", order["note"].clone())
        })
        .set("note", "after apply")
        .sample()
        .unwrap();
    assert_eq!(order["lines"][0]["sku"], json!("set"));
    assert_eq!(order["note"], json!("after apply"));
}

#[test]
fn test_add_entry_grows_containers() {
    let order = support::session()
        .builder("shop::Order")
        .exact_size("stock", 1)
        .add_entry("stock")
        .exact_size("lines", 0)
        .add_entry("lines")
        .sample()
        .unwrap();
    assert_eq!(order["stock"].as_object().unwrap().len(), 2);
    assert_eq!(order["lines"].as_array().unwrap().len(), 1);
}

#[test]
fn test_add_entry_on_a_scalar_is_rejected() {
    let report = support::session()
        .builder("shop::Order")
        .add_entry("id")
        .sample()
        .unwrap_err();
    assert!(matches!(report.current_context(), Error::InvalidArgument(_)));
}

#[test]
fn test_malformed_expressions_surface_on_sample() {
    let report = support::session()
        .builder("shop::Order")
        .set("lines[0", 1)
        .sample()
        .unwrap_err();
    assert!(matches!(
        report.current_context(),
        Error::InvalidExpression { expression, .. } if expression == "lines[0"
    ));
}

#[test]
fn test_map_entries_are_addressable() {
    let order = support::session()
        .builder("shop::Order")
        .exact_size("stock", 1)
        .set("stock[0].key", "only")
        .set("stock[0].value", 12)
        .sample()
        .unwrap();
    assert_eq!(order["stock"], json!({"only": 12}));
}
