//! Lazy evaluation of stored values.
//!
//! Nothing is cached: every read walks the expression tree again against the
//! current bindings. A `var` looks in the block it was written in, then in the
//! document root, and nowhere else.

use std::ptr;

use tracing::trace;

use crate::ast::{BinOp, Dict, Expr, Value};
use crate::config::{Block, Scope};
use crate::ConfError;

/// Evaluate `value` as if it were written inside `scope`.
pub fn evaluate(value: &Value, scope: Scope<'_>) -> Result<Value, ConfError> {
    Resolver::new(scope.root()).value(value, scope.block())
}

/// Evaluate the binding `name` of the scope's block.
pub(crate) fn evaluate_binding(scope: Scope<'_>, name: &str) -> Result<Value, ConfError> {
    Resolver::new(scope.root()).binding(scope.block(), name)
}

pub(crate) fn evaluate_block(scope: Scope<'_>) -> Result<Block, ConfError> {
    Resolver::new(scope.root()).block(scope.block())
}

struct Resolver<'a> {
    root: &'a Block,
    /// Bindings currently being evaluated, to report reference cycles.
    active: Vec<(&'a Block, &'a str)>,
}

impl<'a> Resolver<'a> {
    fn new(root: &'a Block) -> Self {
        Self {
            root,
            active: Vec::new(),
        }
    }

    fn binding(&mut self, scope: &'a Block, name: &str) -> Result<Value, ConfError> {
        let (key, raw) = scope.entry(name).ok_or_else(|| ConfError::missing(name))?;
        let key = key.as_str();

        if self.active.iter().any(|(b, n)| ptr::eq(*b, scope) && *n == key) {
            let chain: Vec<&str> = self.active.iter().map(|(_, n)| *n).collect();
            return Err(ConfError::Value {
                message: format!("circular reference to \"{}\"", key),
                hint: Some(format!("Reference chain: {} -> {}", chain.join(" -> "), key)),
                code: Some(403),
            });
        }

        self.active.push((scope, key));
        let result = self.value(raw, scope);
        self.active.pop();
        result
    }

    fn value(&mut self, value: &'a Value, scope: &'a Block) -> Result<Value, ConfError> {
        match value {
            Value::Expr(expr) => self.expr(expr, scope),
            Value::List(items) => Ok(Value::List(self.items(items, scope)?)),
            Value::Tuple(items) => Ok(Value::Tuple(self.items(items, scope)?)),
            Value::Dict(dict) => {
                let mut out = Dict::with_capacity(dict.len());
                for (key, item) in dict {
                    out.insert(key.clone(), self.value(item, scope)?);
                }
                Ok(Value::Dict(out))
            }
            // Entries of a nested block are written inside that block.
            Value::Block(inner) => Ok(Value::Block(self.block(inner)?)),
            Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::Str(_) => Ok(value.clone()),
        }
    }

    fn items(&mut self, items: &'a [Value], scope: &'a Block) -> Result<Vec<Value>, ConfError> {
        items.iter().map(|item| self.value(item, scope)).collect()
    }

    fn block(&mut self, block: &'a Block) -> Result<Block, ConfError> {
        let mut out = Block::new();
        for (name, _) in block.iter() {
            out.add(name, self.binding(block, name)?)?;
        }
        Ok(out)
    }

    fn expr(&mut self, expr: &'a Expr, scope: &'a Block) -> Result<Value, ConfError> {
        match expr {
            Expr::Var(name) => self.var(name, scope),
            Expr::Neg(operand) => negate(self.value(operand, scope)?),
            Expr::Binary { op, lhs, rhs } => {
                let lhs = self.value(lhs, scope)?;
                let rhs = self.value(rhs, scope)?;
                apply(*op, lhs, rhs)
            }
        }
    }

    fn var(&mut self, name: &str, scope: &'a Block) -> Result<Value, ConfError> {
        if scope.contains(name) {
            trace!(name, "resolving variable in local block");
            return self.binding(scope, name);
        }
        if self.root.contains(name) {
            trace!(name, "resolving variable in document root");
            return self.binding(self.root, name);
        }
        Err(ConfError::missing(name)
            .with_hint("Names resolve in the enclosing block, then in the document root"))
    }
}

fn negate(value: Value) -> Result<Value, ConfError> {
    match value {
        Value::Int(i) => i
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| ConfError::value_error(format!("integer overflow negating {}", i))),
        Value::Float(f) => Ok(Value::Float(-f)),
        other => Err(ConfError::type_error(format!(
            "bad operand type for unary -: {}",
            other.type_name()
        ))),
    }
}

/// Integer arithmetic stays integral except for `/` and negative powers; any
/// float operand promotes the operation to float.
fn apply(op: BinOp, lhs: Value, rhs: Value) -> Result<Value, ConfError> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => int_op(op, a, b),
        (lhs, rhs) => {
            let a = as_float(op, &lhs)?;
            let b = as_float(op, &rhs)?;
            float_op(op, a, b)
        }
    }
}

fn as_float(op: BinOp, value: &Value) -> Result<f64, ConfError> {
    match value {
        Value::Int(i) => Ok(*i as f64),
        Value::Float(f) => Ok(*f),
        other => Err(ConfError::type_error(format!(
            "unsupported operand type for {}: {}",
            op,
            other.type_name()
        ))),
    }
}

fn int_op(op: BinOp, a: i64, b: i64) -> Result<Value, ConfError> {
    let overflow = || ConfError::value_error(format!("integer overflow in {} {} {}", a, op, b));
    match op {
        BinOp::Add => a.checked_add(b).map(Value::Int).ok_or_else(overflow),
        BinOp::Sub => a.checked_sub(b).map(Value::Int).ok_or_else(overflow),
        BinOp::Mul => a.checked_mul(b).map(Value::Int).ok_or_else(overflow),
        BinOp::Div => float_op(op, a as f64, b as f64),
        BinOp::Pow => match u32::try_from(b) {
            Ok(exp) => a.checked_pow(exp).map(Value::Int).ok_or_else(overflow),
            Err(_) if b < 0 => float_op(op, a as f64, b as f64),
            Err(_) => Err(overflow()),
        },
    }
}

fn float_op(op: BinOp, a: f64, b: f64) -> Result<Value, ConfError> {
    let result = match op {
        BinOp::Add => a + b,
        BinOp::Sub => a - b,
        BinOp::Mul => a * b,
        BinOp::Div => {
            if b == 0.0 {
                return Err(ConfError::value_error("division by zero"));
            }
            a / b
        }
        BinOp::Pow => {
            if a == 0.0 && b < 0.0 {
                return Err(ConfError::value_error("zero cannot be raised to a negative power"));
            }
            if a < 0.0 && b.fract() != 0.0 {
                return Err(ConfError::value_error(
                    "negative number cannot be raised to a fractional power",
                ));
            }
            a.powf(b)
        }
    };
    Ok(Value::Float(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Key;

    fn eval(input: &str, name: &str) -> Result<Value, ConfError> {
        let block: Block = input.parse().expect("input should parse");
        block.value(name)
    }

    #[test]
    fn test_integer_arithmetic_stays_integral() {
        assert_eq!(eval("x = 2 + 3 * 4", "x").unwrap(), Value::Int(14));
        assert_eq!(eval("x = 7 - 10", "x").unwrap(), Value::Int(-3));
        assert_eq!(eval("x = 2 ^ 10", "x").unwrap(), Value::Int(1024));
    }

    #[test]
    fn test_division_is_always_float() {
        assert_eq!(eval("x = 7 / 2", "x").unwrap(), Value::Float(3.5));
        assert_eq!(eval("x = 6 / 3", "x").unwrap(), Value::Float(2.0));
    }

    #[test]
    fn test_mixed_operands_promote_to_float() {
        assert_eq!(eval("x = 1 + 0.5", "x").unwrap(), Value::Float(1.5));
        assert_eq!(eval("x = 2 ^ -1", "x").unwrap(), Value::Float(0.5));
    }

    #[test]
    fn test_power_is_left_associative() {
        assert_eq!(eval("x = 2 ^ 3 ^ 2", "x").unwrap(), Value::Int(64));
    }

    #[test]
    fn test_unary_minus_binds_tightest() {
        assert_eq!(eval("a = 2\nx = -a ^ 2", "x").unwrap(), Value::Int(4));
        assert_eq!(eval("a = 2\nx = -(a ^ 3)", "x").unwrap(), Value::Int(-8));
    }

    #[test]
    fn test_division_by_zero() {
        assert!(matches!(eval("x = 1 / 0", "x"), Err(ConfError::Value { .. })));
        assert!(matches!(eval("x = 1.5 / 0.0", "x"), Err(ConfError::Value { .. })));
        assert!(matches!(eval("x = 0 ^ -1", "x"), Err(ConfError::Value { .. })));
    }

    #[test]
    fn test_integer_overflow() {
        assert!(matches!(
            eval("x = 9223372036854775807 + 1", "x"),
            Err(ConfError::Value { .. })
        ));
    }

    #[test]
    fn test_non_numeric_operand() {
        let result = eval("s = \"abc\"\nx = s * 2", "x");
        assert!(matches!(result, Err(ConfError::Type { .. })));

        let result = eval("flag = TRUE\nx = -flag", "x");
        assert!(matches!(result, Err(ConfError::Type { .. })));
    }

    #[test]
    fn test_missing_variable() {
        let result = eval("x = y + 1", "x");
        assert!(matches!(result, Err(ConfError::MissingVariable { ref name, .. }) if name == "y"));
    }

    #[test]
    fn test_circular_reference() {
        let result = eval("a = b\nb = a + 1", "a");
        assert!(matches!(result, Err(ConfError::Value { code: Some(403), .. })));
    }

    #[test]
    fn test_variable_resolves_to_non_numeric_value() {
        let block: Block = "name = \"cyl\"\nalias = name\nlist = [name, 1]".parse().unwrap();
        assert_eq!(block.get("alias").unwrap(), Value::Str("cyl".into()));
        assert_eq!(
            block.get("list").unwrap(),
            Value::List(vec![Value::Str("cyl".into()), Value::Int(1)])
        );
    }

    #[test]
    fn test_dictionary_values_are_evaluated() {
        let block: Block = "r = 2\nd = {\"area\": r ^ 2, 1: (r, -r)}".parse().unwrap();
        let Value::Dict(dict) = block.value("d").unwrap() else {
            panic!("Expected a dictionary");
        };
        assert_eq!(dict[&Key::from("area")], Value::Int(4));
        assert_eq!(
            dict[&Key::Int(1)],
            Value::Tuple(vec![Value::Int(2), Value::Int(-2)])
        );
    }

    #[test]
    fn test_evaluate_arbitrary_value_in_scope() {
        let block: Block = "h = 0.5\nmesh { h = 0.1 }".parse().unwrap();
        let expr = Value::Expr(Expr::binary(BinOp::Mul, Value::Int(2), Expr::var("h").into()));

        assert_eq!(evaluate(&expr, block.scope()).unwrap(), Value::Float(1.0));
        let mesh = block.child("mesh").unwrap();
        assert_eq!(evaluate(&expr, mesh).unwrap(), Value::Float(0.2));
    }
}
