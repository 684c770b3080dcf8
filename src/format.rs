// Author: Dustin Pilgrim
// License: MIT

//! Text serialization of a configuration tree.
//!
//! The output is valid input: one binding per line, nested blocks indented by
//! one tab per level, expressions written with just enough parentheses to
//! parse back into the same tree.

use std::fmt;

use crate::ast::{BinOp, Dict, Expr, Key, Value};
use crate::config::Block;
use crate::utils::{format_bool, format_float, indent};
use crate::ConfError;

impl Block {
    /// Render this block as configuration text.
    ///
    /// With `evaluate` every binding is replaced by its value first; without
    /// it expressions are written symbolically.
    pub fn serialize(&self, evaluate: bool) -> Result<String, ConfError> {
        let mut out = String::new();
        if evaluate {
            write_block(&mut out, &self.evaluated()?, 0)?;
        } else {
            write_block(&mut out, self, 0)?;
        }
        Ok(out)
    }
}

fn write_block(out: &mut String, block: &Block, depth: usize) -> Result<(), ConfError> {
    for (name, value) in block.iter() {
        indent(out, depth);
        match value {
            Value::Block(inner) => {
                out.push_str(name);
                out.push_str(" {\n");
                write_block(out, inner, depth + 1)?;
                indent(out, depth);
                out.push_str("}\n");
            }
            Value::List(items) if is_bare(items) => {
                out.push_str(name);
                out.push_str(" = ");
                out.push_str(&render_items(items)?);
                out.push('\n');
            }
            other => {
                out.push_str(name);
                out.push_str(" = ");
                out.push_str(&render_value(other)?);
                out.push('\n');
            }
        }
    }
    Ok(())
}

/// Top-level lists of two or more items are written without brackets, unless
/// every item is a tuple.
fn is_bare(items: &[Value]) -> bool {
    items.len() >= 2 && !items.iter().all(Value::is_tuple)
}

fn render_items(items: &[Value]) -> Result<String, ConfError> {
    let parts = items.iter().map(render_value).collect::<Result<Vec<_>, _>>()?;
    Ok(parts.join(", "))
}

fn render_value(value: &Value) -> Result<String, ConfError> {
    Ok(match value {
        Value::Bool(b) => format_bool(*b).to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => render_float(*f)?,
        Value::Str(s) => render_str(s)?,
        Value::List(items) => format!("[{}]", render_items(items)?),
        Value::Tuple(items) => format!("({})", render_items(items)?),
        Value::Dict(dict) => render_dict(dict)?,
        Value::Expr(expr) => render_expr(expr)?,
        Value::Block(_) => {
            return Err(ConfError::type_error(
                "a block can only be written directly after a name",
            ));
        }
    })
}

fn render_float(value: f64) -> Result<String, ConfError> {
    if !value.is_finite() {
        return Err(ConfError::Value {
            message: format!("cannot write non-finite float {}", value),
            hint: Some("Only finite numbers can be read back".into()),
            code: Some(404),
        });
    }
    Ok(format_float(value))
}

/// Strings have no escapes, so one holding a quote cannot be read back.
fn render_str(value: &str) -> Result<String, ConfError> {
    if value.contains('"') {
        return Err(ConfError::Value {
            message: format!("cannot write string containing a double quote: {}", value),
            hint: Some("String literals have no escapes".into()),
            code: Some(406),
        });
    }
    Ok(format!("\"{}\"", value))
}

fn render_dict(dict: &Dict) -> Result<String, ConfError> {
    let parts = dict
        .iter()
        .map(|(key, value)| -> Result<String, ConfError> {
            let key = match key {
                Key::Str(s) => render_str(s)?,
                other => other.to_string(),
            };
            Ok(format!("{}: {}", key, render_value(value)?))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!("{{{}}}", parts.join(", ")))
}

/// Symbolic form of an expression, parenthesized only where the parser
/// would otherwise build a different tree.
pub(crate) fn render_expr(expr: &Expr) -> Result<String, ConfError> {
    match expr {
        Expr::Var(name) => Ok(name.clone()),
        Expr::Neg(operand) => {
            let inner = render_value(operand)?;
            if matches!(**operand, Value::Expr(Expr::Binary { .. })) {
                Ok(format!("-({})", inner))
            } else {
                Ok(format!("-{}", inner))
            }
        }
        Expr::Binary { op, lhs, rhs } => {
            let left = render_operand(lhs, *op, false)?;
            let right = render_operand(rhs, *op, true)?;
            Ok(format!("{} {} {}", left, op, right))
        }
    }
}

fn render_operand(operand: &Value, parent: BinOp, right: bool) -> Result<String, ConfError> {
    let text = render_value(operand)?;
    let Value::Expr(Expr::Binary { op, .. }) = operand else {
        return Ok(text);
    };

    // left-associative: an equal-precedence child only needs parentheses on the right
    let needs_parens = op.precedence() < parent.precedence()
        || (right && op.precedence() == parent.precedence());
    Ok(if needs_parens { format!("({})", text) } else { text })
}

/// Literal form of a dictionary key.
impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Str(s) => write!(f, "\"{}\"", s),
            Key::Int(i) => write!(f, "{}", i),
            Key::Float(x) => f.write_str(&format_float(*x)),
            Key::Bool(b) => f.write_str(format_bool(*b)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(input: &str) -> String {
        let block: Block = input.parse().expect("input should parse");
        block.serialize(false).expect("block should serialize")
    }

    fn evaluated(input: &str) -> String {
        let block: Block = input.parse().expect("input should parse");
        block.serialize(true).expect("block should serialize")
    }

    #[test]
    fn test_raw_keeps_minimal_parentheses() {
        assert_eq!(raw("x = a + b * c"), "x = a + b * c\n");
        assert_eq!(raw("x = (a + b) * c"), "x = (a + b) * c\n");
        assert_eq!(raw("x = a - (b - c)"), "x = a - (b - c)\n");
        assert_eq!(raw("x = (a - b) - c"), "x = a - b - c\n");
        assert_eq!(raw("x = -(a + b)"), "x = -(a + b)\n");
        assert_eq!(raw("x = a ^ (b ^ c)"), "x = a ^ (b ^ c)\n");
        assert_eq!(raw("x = -a ^ 2"), "x = -a ^ 2\n");
    }

    #[test]
    fn test_raw_output_parses_to_the_same_tree() {
        let input = "r = 2\nx = (r + 1) / (r - 1) ^ 2\ny = 3 - -2\nz = r * (0.5 + r)";
        let block: Block = input.parse().unwrap();
        let text = block.serialize(false).unwrap();
        let reparsed: Block = text.parse().unwrap();
        assert_eq!(reparsed, block);
    }

    #[test]
    fn test_evaluated_scalars() {
        let text = evaluated("name = \"cyl\"\nflag = true\nn = 2 + 3\nh = 1 / 4\nbig = 1e20");
        assert_eq!(
            text,
            "name = \"cyl\"\nflag = TRUE\nn = 5\nh = 0.25\nbig = 1e20\n"
        );
    }

    #[test]
    fn test_lists_and_containers() {
        assert_eq!(evaluated("l = 1, 2, 3"), "l = 1, 2, 3\n");
        assert_eq!(evaluated("l = [1, 2]"), "l = 1, 2\n");
        assert_eq!(evaluated("l = [7]"), "l = [7]\n");
        assert_eq!(evaluated("l = []"), "l = []\n");
        assert_eq!(evaluated("l = (1, 2), (3, 4)"), "l = [(1, 2), (3, 4)]\n");
        assert_eq!(evaluated("l = (1, 2), 3"), "l = (1, 2), 3\n");
        assert_eq!(
            evaluated("d = {\"a\": 1, 2: 0.5, true: \"x\"}"),
            "d = {\"a\": 1, 2: 0.5, TRUE: \"x\"}\n"
        );
        assert_eq!(evaluated("d = {}"), "d = {}\n");
    }

    #[test]
    fn test_nested_blocks_are_indented() {
        let text = evaluated("a = 1\nouter {\n inner { b = a * 2 }\n c = 3\n}\nempty {}");
        assert_eq!(
            text,
            "a = 1\nouter {\n\tinner {\n\t\tb = 2\n\t}\n\tc = 3\n}\nempty {\n}\n"
        );
    }

    #[test]
    fn test_evaluated_round_trip() {
        let input = "a = 1\nb = 2.5\nc = \"s\"\nd = FALSE\nl = 1, 2.0, \"x\"\nt = (1, 2)\nm = {1: 2}\nblk {\n\tx = -3\n}\n";
        let block: Block = input.parse().unwrap();
        let reparsed: Block = block.serialize(true).unwrap().parse().unwrap();
        assert_eq!(reparsed.names(), block.names());
        assert_eq!(reparsed, block);
    }

    #[test]
    fn test_non_finite_float_is_rejected() {
        let mut block = Block::new();
        block.add("x", f64::INFINITY).unwrap();
        assert!(matches!(
            block.serialize(true),
            Err(ConfError::Value { code: Some(404), .. })
        ));
    }

    #[test]
    fn test_string_with_quote_is_rejected() {
        let mut block = Block::new();
        block.add("s", "a\"b").unwrap();
        assert!(matches!(
            block.serialize(false),
            Err(ConfError::Value { code: Some(406), .. })
        ));

        let mut dict = Dict::new();
        dict.insert(Key::from("k\""), Value::Int(1));
        let mut block = Block::new();
        block.add("d", Value::Dict(dict)).unwrap();
        assert!(matches!(
            block.serialize(true),
            Err(ConfError::Value { code: Some(406), .. })
        ));
    }

    #[test]
    fn test_block_inside_a_list_is_rejected() {
        let mut block = Block::new();
        block
            .add("l", Value::List(vec![Value::Block(Block::new()), Value::Int(1)]))
            .unwrap();
        assert!(matches!(block.serialize(false), Err(ConfError::Type { .. })));
    }

    #[test]
    fn test_key_display() {
        assert_eq!(Key::from("k").to_string(), "\"k\"");
        assert_eq!(Key::Int(-4).to_string(), "-4");
        assert_eq!(Key::Float(1.0).to_string(), "1.0");
        assert_eq!(Key::Bool(false).to_string(), "FALSE");
    }
}
