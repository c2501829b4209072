use crate::dialect::Dialect;
use crate::error::{QlexError, Result};
use crate::lexer::Lexer;
use crate::token::{Token, TokenType};

/// Lex the whole input, collecting every token up to (but not including)
/// `Eof`. A terminal `Error` token becomes `QlexError::Lex`.
pub fn tokenize(input: &str, dialect: &Dialect) -> Result<Vec<Token>> {
    let mut lexer = Lexer::new(input, dialect);
    let mut out = Vec::new();
    loop {
        let tok = lexer.next_token();
        match tok.token_type {
            TokenType::Eof => return Ok(out),
            TokenType::Error => {
                return Err(QlexError::Lex {
                    position: tok.position,
                    message: tok.value.to_string(),
                })
            }
            _ => out.push(tok),
        }
    }
}

/// `tokenize` with a dialect looked up by name.
pub fn tokenize_named(input: &str, dialect_name: &str) -> Result<Vec<Token>> {
    let dialect = crate::dialect::dialect_from_name(dialect_name)?;
    tokenize(input, dialect)
}
