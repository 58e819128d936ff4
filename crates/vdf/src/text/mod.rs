//! Text encoding: `"name" "value"` pairs and `"name" { ... }` blocks with
//! optional `[$CONDITION]` tags and `//` line comments.

mod encoder;
mod error;
mod escape;
mod lexer;
mod parser;

pub use encoder::TextEncoder;
pub use error::TextError;
pub use parser::TextParser;
