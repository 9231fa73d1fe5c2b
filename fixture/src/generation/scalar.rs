//! Random leaf values

use fake::Fake;
use fake::faker::lorem::en::Word;
use fake::faker::name::en::Name;
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde_json::{Number, Value, json};

use crate::type_system::ScalarKind;

const FLOAT_RANGE: f64 = 1_000_000.0;

/// Draw a random value of the given scalar kind
pub fn generate_scalar<R: Rng + ?Sized>(kind: ScalarKind, rng: &mut R) -> Value {
    match kind {
        ScalarKind::Bool => Value::Bool(rng.r#gen()),
        ScalarKind::Char => Value::String(char::from(rng.sample(Alphanumeric)).to_string()),
        ScalarKind::I8 => json!(rng.r#gen::<i8>()),
        ScalarKind::I16 => json!(rng.r#gen::<i16>()),
        ScalarKind::I32 => json!(rng.r#gen::<i32>()),
        ScalarKind::I64 | ScalarKind::Isize => json!(rng.r#gen::<i64>()),
        ScalarKind::U8 => json!(rng.r#gen::<u8>()),
        ScalarKind::U16 => json!(rng.r#gen::<u16>()),
        ScalarKind::U32 => json!(rng.r#gen::<u32>()),
        ScalarKind::U64 | ScalarKind::Usize => json!(rng.r#gen::<u64>()),
        ScalarKind::F32 | ScalarKind::F64 => Number::from_f64(rng.gen_range(-FLOAT_RANGE..FLOAT_RANGE))
            .map_or(Value::Null, Value::Number),
        ScalarKind::String => {
            let text: String = if rng.gen_bool(0.5) {
                Word().fake_with_rng(rng)
            } else {
                Name().fake_with_rng(rng)
            };
            Value::String(text)
        }
    }
}

/// Render a generated map key as a JSON object key
pub fn render_key(key: &Value) -> Option<String> {
    match key {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Parse a JSON object key back into a key value of the given kind
pub fn parse_key(key: &str, kind: Option<ScalarKind>) -> Value {
    match kind {
        Some(ScalarKind::String | ScalarKind::Char) | None => Value::String(key.to_string()),
        Some(_) => serde_json::from_str(key).unwrap_or_else(|_| Value::String(key.to_string())),
    }
}
