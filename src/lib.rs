//! Dialect-driven lexing for SQL-family query languages.
//!
//! A [`Dialect`] is a declarative grammar: top-level statement keywords,
//! each expanding into an ordered clause list. The [`Lexer`] walks that
//! grammar with a trampolined state machine, producing a flat stream of
//! [`Token`]s one at a time; parsers consume the stream through a
//! [`TokenPager`] or collect it with [`tokenize`].
//!
//! Built-in dialects cover SQL, FilterQL, bare expressions, logical
//! expressions, and JSON:
//!
//! ```
//! use qlex::{Lexer, TokenType};
//!
//! let mut lexer = Lexer::sql("SELECT name FROM users;");
//! assert_eq!(lexer.next_token().token_type, TokenType::Select);
//! assert_eq!(lexer.next_token().value, "name");
//! ```
//!
//! Errors never panic: malformed input ends the stream with a single
//! terminal `Error` token, after which only `Eof` follows.

mod api;
pub mod dialect;
pub mod error;
pub mod lexer;
pub mod pager;
pub mod states;
pub mod token;

pub use api::{tokenize, tokenize_named};
pub use dialect::{
    dialect_from_name, Clause, Dialect, LexerConfig, EXPRESSION_DIALECT, FILTERQL_DIALECT,
    JSON_DIALECT, LOGICAL_DIALECT, MAX_STACK_DEPTH, SQL_DIALECT,
};
pub use error::{QlexError, Result};
pub use lexer::{Lexer, StateFn};
pub use pager::{TokenPager, MAX_BACKTRACK};
pub use token::{Pos, Token, TokenInfo, TokenType};
