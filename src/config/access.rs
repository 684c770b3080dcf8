use std::ptr;

use super::*;
use crate::resolver;

/// A block seen from a document root.
///
/// Expressions written inside `block` resolve names in `block` first and then
/// in `root`, never in the blocks in between. Navigating with [`Scope::child`]
/// keeps the root, so nested lookups behave as they would in the full document.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    block: &'a Block,
    root: &'a Block,
}

impl<'a> Scope<'a> {
    pub fn block(&self) -> &'a Block {
        self.block
    }

    pub fn root(&self) -> &'a Block {
        self.root
    }

    pub fn is_root(&self) -> bool {
        ptr::eq(self.block, self.root)
    }

    /// Read the binding `name` in this scope.
    ///
    /// Values are evaluated afresh on every call, so they always reflect the
    /// current bindings. A nested block is not evaluated at all: it comes back
    /// as a [`Lookup::Block`] still tied to this root, and each of its entries
    /// is evaluated (and may fail) only when read.
    pub fn get(&self, name: &str) -> Result<Lookup<'a>, ConfError> {
        match self.block.raw(name)? {
            Value::Block(_) => self.child(name).map(Lookup::Block),
            _ => self.value(name).map(Lookup::Value),
        }
    }

    /// Evaluate the binding `name`. A nested block comes back with every entry
    /// evaluated.
    pub fn value(&self, name: &str) -> Result<Value, ConfError> {
        resolver::evaluate_binding(*self, name)
    }

    /// Step into the nested block bound to `name`.
    pub fn child(&self, name: &str) -> Result<Scope<'a>, ConfError> {
        match self.block.raw(name)? {
            Value::Block(inner) => Ok(Scope {
                block: inner,
                root: self.root,
            }),
            other => Err(ConfError::type_error(format!(
                "\"{}\" is a {}, not a block",
                name,
                other.type_name()
            ))),
        }
    }

    /// Navigate a dotted path and evaluate its last segment.
    pub fn lookup(&self, path: &str) -> Result<Value, ConfError> {
        let segments = helpers::split_path(path)?;
        let (last, parents) = segments
            .split_last()
            .ok_or_else(|| ConfError::missing(path))?;

        let mut scope = *self;
        for segment in parents {
            scope = scope.child(segment)?;
        }
        scope.value(last)
    }

    /// Navigate a dotted path of nested blocks.
    pub fn descend(&self, path: &str) -> Result<Scope<'a>, ConfError> {
        let mut scope = *self;
        for segment in helpers::split_path(path)? {
            scope = scope.child(segment)?;
        }
        Ok(scope)
    }
}

/// Result of [`Block::get`] and [`Scope::get`].
#[derive(Debug, Clone)]
pub enum Lookup<'a> {
    /// An evaluated value.
    Value(Value),
    /// A nested block, unevaluated and tied to the document root.
    Block(Scope<'a>),
}

impl<'a> Lookup<'a> {
    /// Read `name` inside a nested block.
    pub fn get(&self, name: &str) -> Result<Lookup<'a>, ConfError> {
        match self {
            Lookup::Block(scope) => scope.get(name),
            Lookup::Value(value) => Err(ConfError::type_error(format!(
                "cannot read \"{}\" from a {}",
                name,
                value.type_name()
            ))),
        }
    }

    pub fn as_scope(&self) -> Option<Scope<'a>> {
        match self {
            Lookup::Block(scope) => Some(*scope),
            Lookup::Value(_) => None,
        }
    }

    /// The evaluated value. A block is evaluated entry by entry.
    pub fn into_value(self) -> Result<Value, ConfError> {
        match self {
            Lookup::Value(value) => Ok(value),
            Lookup::Block(scope) => resolver::evaluate_block(scope).map(Value::Block),
        }
    }
}

/// A block handle equals a `Value::Block` holding the same raw entries.
impl PartialEq<Value> for Lookup<'_> {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Lookup::Value(value), other) => value == other,
            (Lookup::Block(scope), Value::Block(block)) => scope.block() == block,
            (Lookup::Block(_), _) => false,
        }
    }
}

impl Block {
    /// This block as a document root.
    pub fn scope(&self) -> Scope<'_> {
        Scope {
            block: self,
            root: self,
        }
    }

    /// Read the binding `name`, with this block as the document root.
    ///
    /// Lists, tuples and dictionary values are evaluated element by element. A
    /// nested block is returned lazily, so nested reads chain:
    ///
    /// ```ignore
    /// let write = case.get("boundary")?.get("internal")?.get("write")?;
    /// ```
    pub fn get(&self, name: &str) -> Result<Lookup<'_>, ConfError> {
        self.scope().get(name)
    }

    /// Evaluate the binding `name` completely, nested blocks included.
    pub fn value(&self, name: &str) -> Result<Value, ConfError> {
        self.scope().value(name)
    }

    /// Step into the nested block bound to `name`, keeping this block as root.
    ///
    /// ```ignore
    /// let write: bool = case.child("boundary")?.child("internal")?.value("write")?.try_into()?;
    /// ```
    pub fn child(&self, name: &str) -> Result<Scope<'_>, ConfError> {
        self.scope().child(name)
    }

    /// A copy of this block with every expression replaced by its value.
    pub fn evaluated(&self) -> Result<Block, ConfError> {
        resolver::evaluate_block(self.scope())
    }

    /// Get an evaluated value by dotted path, e.g. `boundary.internal.write`.
    pub fn get_path(&self, path: &str) -> Result<Value, ConfError> {
        self.scope()
            .lookup(path)
            .map_err(|e| match e {
                ConfError::MissingVariable { name, code, .. } => ConfError::MissingVariable {
                    hint: Some(format!("While looking up '{}'", path)),
                    name,
                    code,
                },
                other => other,
            })
    }

    /// Get a typed value by dotted path.
    ///
    /// # Examples
    /// ```no_run
    /// # use caseconf::Block;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let case = Block::from_file("setup.inp")?;
    /// let zones: i64 = case.get_as("num_zones")?;
    /// let write_in: bool = case.get_as("boundary.internal.write")?;
    /// let names: Vec<String> = case.get_as("boundary.internal.name")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn get_as<T>(&self, path: &str) -> Result<T, ConfError>
    where
        T: TryFrom<Value, Error = ConfError>,
    {
        let value = self.get_path(path)?;
        T::try_from(value).map_err(|e| e.with_hint(format!("While converting '{}'", path)))
    }

    /// Get a typed value, or `None` when the path is not bound.
    pub fn get_optional<T>(&self, path: &str) -> Result<Option<T>, ConfError>
    where
        T: TryFrom<Value, Error = ConfError>,
    {
        if !self.has(path) {
            return Ok(None);
        }
        self.get_as(path).map(Some)
    }

    /// Get a typed value with a fallback default.
    ///
    /// # Examples
    /// ```no_run
    /// # use caseconf::Block;
    /// # let case = Block::from_file("setup.inp").unwrap();
    /// let format = case.get_or("write_format", String::from("vtk"));
    /// ```
    pub fn get_or<T>(&self, path: &str, default: T) -> T
    where
        T: TryFrom<Value, Error = ConfError>,
    {
        self.get_as(path).unwrap_or(default)
    }

    /// Check whether a dotted path is bound, without evaluating it.
    pub fn has(&self, path: &str) -> bool {
        let Ok(segments) = helpers::split_path(path) else {
            return false;
        };
        let Some((last, parents)) = segments.split_last() else {
            return false;
        };

        let mut block = self;
        for segment in parents {
            match block.raw(segment) {
                Ok(Value::Block(inner)) => block = inner,
                _ => return false,
            }
        }
        block.contains(last)
    }

    /// Names bound in the block at `path`, or at the root for an empty path.
    pub fn keys(&self, path: &str) -> Result<Vec<String>, ConfError> {
        let scope = if path.trim().is_empty() {
            self.scope()
        } else {
            self.scope().descend(path)?
        };
        Ok(scope.block().names().into_iter().map(String::from).collect())
    }
}
