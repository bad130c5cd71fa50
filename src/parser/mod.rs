//! Template parsing for both marker syntaxes

pub mod ast;
mod grammar;
pub mod legacy;
pub mod lexer;

pub use ast::*;
pub use grammar::parse;
pub use legacy::migrate;
