//! Read-only export of a tree to JSON.
//!
//! Interior nodes become objects with keys in child order. Names that repeat
//! among siblings collect their values into an array. Conditions are dropped.

use std::collections::HashMap;

use serde_json::{Map, Number, Value as JsonValue};

use crate::document::NodeRef;
use crate::value::Value;

/// Converts `node` to JSON: an object for interior nodes, a scalar (or a
/// `[r, g, b, a]` array for colors) for leaves.
///
/// ```
/// use vdf::Document;
/// use serde_json::json;
///
/// let doc = Document::from_text("\"a\" \"1\" \"b\" { \"c\" \"x\" \"c\" \"y\" }").unwrap();
/// assert_eq!(doc.to_json(), json!({ "a": "1", "b": { "c": ["x", "y"] } }));
/// ```
pub fn to_json(node: NodeRef<'_>) -> JsonValue {
    match node.value() {
        Value::None => JsonValue::Object(object(node)),
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Int(v) => JsonValue::from(*v),
        Value::Float(v) => Number::from_f64(f64::from(*v))
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Value::Ptr(v) => JsonValue::from(*v),
        Value::WString(_) => JsonValue::String(node.string().into_owned()),
        Value::Color(c) => JsonValue::from(vec![c.r, c.g, c.b, c.a]),
        Value::Uint64(v) => JsonValue::from(*v),
    }
}

fn object(node: NodeRef<'_>) -> Map<String, JsonValue> {
    let mut entries: Vec<(&str, Vec<JsonValue>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for child in node.children() {
        let value = to_json(child);
        match index.get(child.name()) {
            Some(&i) => entries[i].1.push(value),
            None => {
                index.insert(child.name(), entries.len());
                entries.push((child.name(), vec![value]));
            }
        }
    }
    entries
        .into_iter()
        .map(|(name, mut values)| {
            let value = if values.len() == 1 {
                values.remove(0)
            } else {
                JsonValue::Array(values)
            };
            (name.to_owned(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Document};
    use serde_json::json;

    #[test]
    fn typed_leaves() {
        let mut doc = Document::new();
        let root = doc.root_id();
        let leaves = [
            doc.create_leaf("int", -3),
            doc.create_leaf("float", 0.5f32),
            doc.create_leaf("nan", f32::NAN),
            doc.create_leaf("ptr", 9u32),
            doc.create_leaf("wide", vec![0x68u16, 0x69]),
            doc.create_leaf("color", Color::new(255, 0, 10, 128)),
            doc.create_leaf("big", u64::MAX),
        ];
        for leaf in leaves {
            doc.append(root, leaf);
        }
        assert_eq!(
            doc.to_json(),
            json!({
                "int": -3,
                "float": 0.5,
                "nan": null,
                "ptr": 9,
                "wide": "hi",
                "color": [255, 0, 10, 128],
                "big": u64::MAX,
            })
        );
    }

    #[test]
    fn keys_keep_child_order() {
        let doc = Document::from_text("z 1\na 2\nz 3\nm { }\n").unwrap();
        let json = doc.to_json();
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["z", "a", "m"]);
        assert_eq!(json["z"], json!(["1", "3"]));
        assert_eq!(json["m"], json!({}));
    }

    #[test]
    fn leaf_and_absent_nodes() {
        let doc = Document::from_text("k v").unwrap();
        assert_eq!(doc.root().first_child().to_json(), json!("v"));
        assert_eq!(doc.root().first_by_name("nope").to_json(), json!({}));
    }
}
