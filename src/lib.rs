pub mod ast;
pub mod error;
pub mod export;
pub mod format;
pub mod lexer;
pub mod parser;
pub mod resolver;
pub mod utils;
pub mod config;

use std::path::Path;

pub use ast::{BinOp, Dict, Expr, Key, Value};
pub use error::ConfError;
pub use config::{Block, Lookup, Scope};

/// Parse configuration text into its root block.
pub fn parse_str(input: &str) -> Result<Block, ConfError> {
    input.parse()
}

/// Read and parse a configuration file; `~/` expands to the home directory.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Block, ConfError> {
    Block::from_file(path)
}
