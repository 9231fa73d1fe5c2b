//! Shared fixtures for integration tests

#![allow(dead_code, reason = "each test binary uses a different subset")]
#![allow(clippy::unwrap_used, reason = "tests")]

use std::sync::{Arc, Once};

use fixture_forge::introspection::Invoker;
use fixture_forge::{
    AccessorPair, FixtureSession, GenerateOptions, InvocationError, Parameter, TypeDescriptor,
    TypeRegistry,
};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Route engine logs to the test writer, filtered by `RUST_LOG`
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or(Value::Null)
}

fn with_field(receiver: &Value, name: &str, value: Value) -> Value {
    let mut updated = receiver.clone();
    if let Some(object) = updated.as_object_mut() {
        object.insert(name.to_string(), value);
    }
    updated
}

/// Types of a small shop domain
///
/// - `shop::Order`: plain fields, nested list, set, map and optional
/// - `shop::Customer`: accessor-backed `email` next to a field
/// - `shop::Money`: constructed through its single named-parameter factory
/// - `shop::Account`: assembled through `Account::builder()`
/// - `shop::Category`: self-referential
/// - `shop::PaymentMethod`: interface
pub fn registry() -> TypeRegistry {
    let email = AccessorPair {
        getter: Some(Invoker::new(|receiver, _| {
            Ok(receiver
                .and_then(|instance| instance.get("contact"))
                .cloned()
                .unwrap_or(Value::Null))
        })),
        setter: Some(Invoker::new(|receiver, args| {
            let receiver = receiver.cloned().unwrap_or_else(|| json!({}));
            Ok(with_field(&receiver, "contact", arg(&args, 0)))
        })),
    };

    TypeRegistry::new()
        .with(
            TypeDescriptor::structure("shop::Order")
                .field("id", "u64")
                .field("customer", "shop::Customer")
                .nullable_field("note", "String")
                .field("lines", "Vec<shop::LineItem>")
                .field("tags", "HashSet<String>")
                .field("stock", "HashMap<String, u32>")
                .field("coupon", "Option<String>")
                .field("payment", "shop::PaymentMethod"),
        )
        .with(
            TypeDescriptor::structure("shop::LineItem")
                .field("sku", "String")
                .field("quantity", "u32")
                .field("price", "shop::Money"),
        )
        .with(
            TypeDescriptor::structure("shop::Customer")
                .field("name", "String")
                .accessor("email", "String", email)
                .default_instance(json!({"tier": "basic"})),
        )
        .with(
            TypeDescriptor::structure("shop::Money")
                .field("cents", "i64")
                .field("currency", "String")
                .factory(
                    "of",
                    vec![
                        Parameter::named("cents", "i64"),
                        Parameter::named("currency", "String"),
                    ],
                    |args| {
                        let currency = arg(&args, 1);
                        if currency == json!("") {
                            return Err(InvocationError::InvalidArgument(
                                "currency must not be empty".to_string(),
                            ));
                        }
                        Ok(json!({"cents": arg(&args, 0), "currency": currency, "checked": true}))
                    },
                ),
        )
        .with(
            TypeDescriptor::structure("shop::Account")
                .field("owner", "String")
                .field("limit", "i64")
                .field("state", "String")
                .static_method("builder", vec![], "shop::AccountBuilder", |_| {
                    Ok(json!({"owner": null, "limit": 0, "state": "open"}))
                }),
        )
        .with(
            TypeDescriptor::structure("shop::AccountBuilder")
                .method(
                    "owner",
                    vec![Parameter::named("owner", "String")],
                    "shop::AccountBuilder",
                    |receiver, args| Ok(with_field(receiver, "owner", arg(&args, 0))),
                )
                .method(
                    "limit",
                    vec![Parameter::named("limit", "i64")],
                    "shop::AccountBuilder",
                    |receiver, args| {
                        let limit = arg(&args, 0);
                        if limit.as_i64().is_some_and(i64::is_negative) {
                            return Err(InvocationError::Failed(
                                "limit must not be negative".to_string(),
                            ));
                        }
                        Ok(with_field(receiver, "limit", limit))
                    },
                )
                .method("build", vec![], "shop::Account", |receiver, _| Ok(receiver.clone())),
        )
        .with(
            TypeDescriptor::structure("shop::Category")
                .field("name", "String")
                .field("children", "Vec<shop::Category>"),
        )
        .with(TypeDescriptor::interface("shop::PaymentMethod"))
}

/// Seeded session without null injection
pub fn session() -> FixtureSession {
    session_with(GenerateOptions::default().with_seed(7).with_null_inject(0.0))
}

/// Session over [`registry`] with custom options
pub fn session_with(options: GenerateOptions) -> FixtureSession {
    init_tracing();
    FixtureSession::new(Arc::new(registry()), options).unwrap()
}
