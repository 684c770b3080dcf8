// Author: Dustin Pilgrim
// License: MIT

use std::fs;
use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use tracing::debug;

use crate::ast::Value;
use crate::parser;
use crate::ConfError;

mod access;
mod conversion;
mod helpers;

pub use access::{Lookup, Scope};

/// One lexical scope of a case configuration: the document root or a nested
/// `name { ... }` block.
///
/// Names are unique within a block and keep their insertion order. A block does
/// not remember which document it belongs to: the root is whichever block a
/// lookup starts from (see [`Scope`]). Moving a block into another tree or
/// cloning a tree therefore never leaves a stale root behind, and a clone is
/// fully independent of the original.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    entries: IndexMap<String, Value>,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a case configuration file.
    ///
    /// # Example
    /// ```ignore
    /// let case = Block::from_file("setup.inp")?;
    /// let zones: i64 = case.get_as("num_zones")?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfError> {
        let path = helpers::resolve_path(path.as_ref())?;
        debug!(path = %path.display(), "reading configuration file");

        let content = fs::read_to_string(&path).map_err(|e| ConfError::File {
            message: format!("Failed to read file: {}", e),
            path: path.to_string_lossy().to_string(),
            hint: Some("Check that the file exists and is readable".into()),
            code: Some(501),
        })?;

        content.parse()
    }

    /// Load from the primary path, or from the fallback path when the primary
    /// cannot be read. Parse errors in the primary file are not masked.
    pub fn from_file_with_fallback<P: AsRef<Path>>(primary: P, fallback: P) -> Result<Self, ConfError> {
        match Self::from_file(&primary) {
            Ok(block) => Ok(block),
            Err(ConfError::File { .. }) => {
                debug!(
                    primary = %primary.as_ref().display(),
                    fallback = %fallback.as_ref().display(),
                    "primary configuration unreadable, trying fallback"
                );
                Self::from_file(&fallback).map_err(|e| match e {
                    ConfError::File { message, .. } => ConfError::File {
                        message: format!(
                            "Failed to load config from primary path '{}' or fallback path '{}': {}",
                            primary.as_ref().display(),
                            fallback.as_ref().display(),
                            message
                        ),
                        path: format!(
                            "{} (fallback: {})",
                            primary.as_ref().display(),
                            fallback.as_ref().display()
                        ),
                        hint: Some("Check that at least one of the config files exists".into()),
                        code: Some(501),
                    },
                    other => other,
                })
            }
            Err(other) => Err(other),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bind a new name. Fails if the name is already bound in this block.
    pub fn add(&mut self, name: &str, value: impl Into<Value>) -> Result<(), ConfError> {
        if self.entries.contains_key(name) {
            return Err(ConfError::duplicate(name));
        }
        self.entries.insert(name.to_string(), value.into());
        Ok(())
    }

    /// Unbind a name and return its raw value. Remaining names keep their order.
    pub fn remove(&mut self, name: &str) -> Result<Value, ConfError> {
        self.entries
            .shift_remove(name)
            .ok_or_else(|| ConfError::missing(name))
    }

    /// Replace the value of an existing name, keeping its position.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), ConfError> {
        match self.entries.get_mut(name) {
            Some(slot) => {
                *slot = value.into();
                Ok(())
            }
            None => Err(ConfError::missing(name)),
        }
    }

    /// Unbind every name.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The nested block bound to `name`, for changing it in place.
    pub fn child_mut(&mut self, name: &str) -> Result<&mut Block, ConfError> {
        match self.entries.get_mut(name) {
            Some(Value::Block(inner)) => Ok(inner),
            Some(other) => Err(ConfError::type_error(format!(
                "\"{}\" is a {}, not a block",
                name,
                other.type_name()
            ))),
            None => Err(ConfError::missing(name)),
        }
    }

    /// The nested block at a dotted path such as `boundary.internal`.
    pub fn descend_mut(&mut self, path: &str) -> Result<&mut Block, ConfError> {
        let mut block = self;
        for segment in helpers::split_path(path)? {
            block = block.child_mut(segment)?;
        }
        Ok(block)
    }

    /// Replace the value at a dotted path, e.g. `boundary.internal.write`.
    pub fn set_path(&mut self, path: &str, value: impl Into<Value>) -> Result<(), ConfError> {
        let segments = helpers::split_path(path)?;
        let (last, parents) = segments
            .split_last()
            .ok_or_else(|| ConfError::missing(path))?;

        let mut block = self;
        for segment in parents {
            block = block.child_mut(segment)?;
        }
        block.set(last, value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Bound names in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// The stored value, without evaluating expressions.
    pub fn raw(&self, name: &str) -> Result<&Value, ConfError> {
        self.entries.get(name).ok_or_else(|| ConfError::missing(name))
    }

    /// Raw entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn entry(&self, name: &str) -> Option<(&String, &Value)> {
        self.entries.get_key_value(name)
    }

    /// Write the raw (unevaluated) form of this configuration.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfError> {
        self.to_file(path, false)
    }

    /// Write this configuration, either evaluated or with expressions kept symbolic.
    pub fn to_file<P: AsRef<Path>>(&self, path: P, evaluate: bool) -> Result<(), ConfError> {
        let path = helpers::resolve_path(path.as_ref())?;
        let text = self.serialize(evaluate)?;
        debug!(path = %path.display(), evaluate, bytes = text.len(), "writing configuration file");

        fs::write(&path, text).map_err(|e| {
            ConfError::file_error(
                format!("Failed to write file: {}", e),
                path.to_string_lossy().to_string(),
            )
        })
    }
}

impl FromStr for Block {
    type Err = ConfError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        debug!(bytes = content.len(), "parsing configuration");
        let mut parser = parser::Parser::new(content)?;
        let block = parser.parse_document()?;
        debug!(entries = block.len(), "configuration parsed");
        Ok(block)
    }
}
