//! Shared type fixtures for unit tests

use std::sync::Arc;

use serde_json::{Value, json};

use crate::introspection::{InvocationError, Parameter, TypeDescriptor, TypeRegistry};
use crate::metadata_cache::MetadataCache;

fn first(args: &[Value]) -> Value {
    args.first().cloned().unwrap_or(Value::Null)
}

fn with_field(receiver: &Value, name: &str, value: Value) -> Value {
    let mut updated = receiver.clone();
    if let Some(object) = updated.as_object_mut() {
        object.insert(name.to_string(), value);
    }
    updated
}

/// `demo::Order`, `demo::Item`, `demo::Node`, `demo::Shape`, `demo::Page<T>`,
/// `demo::Account` (builder) and `demo::Money` (constructor)
pub fn registry() -> TypeRegistry {
    TypeRegistry::new()
        .with(
            TypeDescriptor::structure("demo::Order")
                .field("id", "u64")
                .field("customer", "String")
                .nullable_field("note", "String")
                .field("items", "Vec<demo::Item>")
                .field("tags", "HashSet<String>")
                .field("attributes", "HashMap<String, i32>")
                .field("coupon", "Option<String>"),
        )
        .with(
            TypeDescriptor::structure("demo::Item")
                .field("sku", "String")
                .field("quantity", "u32"),
        )
        .with(
            TypeDescriptor::structure("demo::Node")
                .field("value", "i32")
                .field("next", "Option<demo::Node>"),
        )
        .with(TypeDescriptor::interface("demo::Shape"))
        .with(
            TypeDescriptor::generic("demo::Page", ["T"])
                .field("items", "Vec<T>")
                .field("total", "usize"),
        )
        .with(
            TypeDescriptor::structure("demo::Money")
                .field("amount", "i64")
                .field("currency", "String")
                .constructor(
                    vec![
                        Parameter::named("amount", "i64"),
                        Parameter::named("currency", "String"),
                    ],
                    |args| {
                        let currency = args.get(1).cloned().unwrap_or(Value::Null);
                        if currency == json!("") {
                            return Err(InvocationError::InvalidArgument(
                                "currency must not be empty".to_string(),
                            ));
                        }
                        Ok(json!({"amount": first(&args), "currency": currency, "validated": true}))
                    },
                ),
        )
        .with(
            TypeDescriptor::structure("demo::Account")
                .field("owner", "String")
                .field("balance", "i64")
                .field("status", "String")
                .static_method("builder", vec![], "demo::AccountBuilder", |_| {
                    Ok(json!({"owner": null, "balance": 0, "status": "new"}))
                }),
        )
        .with(
            TypeDescriptor::structure("demo::AccountBuilder")
                .method(
                    "owner",
                    vec![Parameter::named("owner", "String")],
                    "demo::AccountBuilder",
                    |receiver, args| Ok(with_field(receiver, "owner", first(&args))),
                )
                .method(
                    "balance",
                    vec![Parameter::named("balance", "i64")],
                    "demo::AccountBuilder",
                    |receiver, args| {
                        let balance = first(&args);
                        if balance.as_i64() == Some(i64::MIN) {
                            return Err(InvocationError::Failed("balance underflow".to_string()));
                        }
                        Ok(with_field(receiver, "balance", balance))
                    },
                )
                .method("build", vec![], "demo::Account", |receiver, _| {
                    Ok(receiver.clone())
                }),
        )
}

/// A cache over [`registry`]
pub fn cache() -> MetadataCache {
    MetadataCache::new(Arc::new(registry()), 64)
}
