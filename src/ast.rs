use std::fmt;
use std::hash::{Hash, Hasher};

use indexmap::IndexMap;

use crate::config::Block;

/// A value bound to a name, stored in a list/tuple, or held by a dictionary.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    /// Fixed group, rendered with parentheses.
    Tuple(Vec<Value>),
    Dict(Dict),
    Block(Block),
    /// Deferred arithmetic or a variable reference, evaluated on every read.
    Expr(Expr),
}

/// Dictionary key. Only literal scalars are allowed as keys.
///
/// Keys of different kinds never compare equal, so `1`, `1.0` and `TRUE` are
/// three distinct keys of one dictionary.
#[derive(Debug, Clone)]
pub enum Key {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

// Float keys compare by bit pattern so that keys can live in a hash map.
impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Key::Str(a), Key::Str(b)) => a == b,
            (Key::Int(a), Key::Int(b)) => a == b,
            (Key::Float(a), Key::Float(b)) => a.to_bits() == b.to_bits(),
            (Key::Bool(a), Key::Bool(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Key::Str(s) => s.hash(state),
            Key::Int(i) => i.hash(state),
            Key::Float(f) => f.to_bits().hash(state),
            Key::Bool(b) => b.hash(state),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(s.to_string())
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Int(i)
    }
}

pub type Dict = IndexMap<Key, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Pow => "^",
        }
    }

    /// Binding strength, higher binds tighter. All binary operators are left-associative.
    pub fn precedence(self) -> u8 {
        match self {
            BinOp::Add | BinOp::Sub => 1,
            BinOp::Mul | BinOp::Div => 2,
            BinOp::Pow => 3,
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Unevaluated operation node. Operands are values, so a literal operand stays a
/// literal and a nested operation is another `Value::Expr`.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Binary {
        op: BinOp,
        lhs: Box<Value>,
        rhs: Box<Value>,
    },
    /// Unary negation (`--` in the operator table).
    Neg(Box<Value>),
    /// Reference to a name in the local block or the document root.
    Var(String),
}

impl Expr {
    pub fn binary(op: BinOp, lhs: Value, rhs: Value) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn neg(operand: Value) -> Self {
        Expr::Neg(Box::new(operand))
    }

    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var(name.into())
    }
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Dict(_) => "dictionary",
            Value::Block(_) => "block",
            Value::Expr(_) => "expression",
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        if let Value::Block(block) = self {
            Some(block)
        } else {
            None
        }
    }

    pub fn is_tuple(&self) -> bool {
        matches!(self, Value::Tuple(_))
    }

    /// True when no expression remains anywhere inside this value.
    pub fn is_literal(&self) -> bool {
        match self {
            Value::Expr(_) => false,
            Value::List(items) | Value::Tuple(items) => items.iter().all(Value::is_literal),
            Value::Dict(dict) => dict.values().all(Value::is_literal),
            Value::Block(block) => block.iter().all(|(_, v)| v.is_literal()),
            _ => true,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Expr> for Value {
    fn from(e: Expr) -> Self {
        Value::Expr(e)
    }
}

impl From<Block> for Value {
    fn from(b: Block) -> Self {
        Value::Block(b)
    }
}
