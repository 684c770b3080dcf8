// Author: Dustin Pilgrim
// License: MIT

use std::path::Path;

use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::ast::{Key, Value};
use crate::config::Block;
use crate::format::render_expr;
use crate::ConfError;

/// Blocks become maps in binding order.
impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Lists and tuples become sequences, dictionaries maps with text keys, and
/// expressions their symbolic form.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Str(s) => serializer.serialize_str(s),
            Value::List(items) | Value::Tuple(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Dict(dict) => {
                let mut map = serializer.serialize_map(Some(dict.len()))?;
                for (key, value) in dict {
                    map.serialize_entry(&key_text(key), value)?;
                }
                map.end()
            }
            Value::Block(block) => Serialize::serialize(block, serializer),
            Value::Expr(expr) => {
                let text = render_expr(expr).map_err(S::Error::custom)?;
                serializer.serialize_str(&text)
            }
        }
    }
}

/// JSON object keys are strings, so non-string keys use their literal text.
fn key_text(key: &Key) -> String {
    match key {
        Key::Str(s) => s.clone(),
        Key::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Evaluate a configuration and render it as pretty-printed JSON.
///
/// # Examples
/// ```no_run
/// use caseconf::{Block, export};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let case = Block::from_file("setup.inp")?;
/// println!("{}", export::to_json(&case)?);
/// # Ok(())
/// # }
/// ```
pub fn to_json(block: &Block) -> Result<String, ConfError> {
    let evaluated = block.evaluated()?;
    serde_json::to_string_pretty(&evaluated).map_err(|e| ConfError::Value {
        message: format!("JSON export failed: {}", e),
        hint: None,
        code: Some(405),
    })
}

/// Read, parse and export a configuration file in one call.
///
/// # Errors
/// Returns an error if the file cannot be read, does not parse, or fails to
/// evaluate.
pub fn export_file<P: AsRef<Path>>(path: P) -> Result<String, ConfError> {
    to_json(&Block::from_file(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn json(input: &str) -> serde_json::Value {
        let block: Block = input.parse().expect("input should parse");
        let text = to_json(&block).expect("block should export");
        serde_json::from_str(&text).expect("export should be valid JSON")
    }

    #[test]
    fn test_export_evaluates_bindings() {
        let v = json("r = 2\narea = r ^ 2\nratio = r / 4\nname = \"cyl\"\nwall = TRUE");
        assert_eq!(v["area"], 4);
        assert_eq!(v["ratio"], 0.5);
        assert_eq!(v["name"], "cyl");
        assert_eq!(v["wall"], true);
    }

    #[test]
    fn test_export_containers() {
        let v = json("l = 1, 2\nt = (1, 2.5)\nd = {\"a\": 1, 3: \"b\", false: 0}\nempty = []");
        assert_eq!(v["l"], serde_json::json!([1, 2]));
        assert_eq!(v["t"], serde_json::json!([1, 2.5]));
        assert_eq!(v["d"]["a"], 1);
        assert_eq!(v["d"]["3"], "b");
        assert_eq!(v["d"]["false"], 0);
        assert_eq!(v["empty"], serde_json::json!([]));
    }

    #[test]
    fn test_export_nested_blocks_keep_order() {
        let block: Block = "z = 1\nmesh {\n\th = z / 10\n\tlevels = 3\n}\na = 2".parse().unwrap();
        let text = to_json(&block).unwrap();

        let z = text.find("\"z\"").unwrap();
        let mesh = text.find("\"mesh\"").unwrap();
        let a = text.find("\"a\"").unwrap();
        assert!(z < mesh && mesh < a);

        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["mesh"]["h"], 0.1);
        assert_eq!(v["mesh"]["levels"], 3);
    }

    #[test]
    fn test_raw_values_serialize_symbolically() {
        let block: Block = "x = (a + b) * 2".parse().unwrap();
        let v = serde_json::to_value(&block).unwrap();
        assert_eq!(v["x"], "(a + b) * 2");
    }

    #[test]
    fn test_export_propagates_evaluation_errors() {
        let block: Block = "x = missing + 1".parse().unwrap();
        assert!(matches!(to_json(&block), Err(ConfError::MissingVariable { .. })));
    }

    #[test]
    fn test_export_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("setup.inp");
        fs::write(&path, "num_zones = 2 * 3\n").unwrap();

        let v: serde_json::Value = serde_json::from_str(&export_file(&path).unwrap()).unwrap();
        assert_eq!(v["num_zones"], 6);
    }

    #[test]
    fn test_export_file_missing() {
        assert!(matches!(
            export_file("/nonexistent/setup.inp"),
            Err(ConfError::File { .. })
        ));
    }
}
