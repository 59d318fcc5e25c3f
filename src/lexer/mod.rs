//! Lexical layer: turns PHP source into the classified token stream.

pub mod scanner;
pub mod token;

pub use scanner::tokenize;
pub use token::{Token, TokenEffect, TokenKind};
