//! The command language: lexing, parsing and running statements.

mod parse;
mod resolve;
mod tokens;

pub use parse::parse;
pub use resolve::Resolver;
pub use tokens::tokenize;
