use smallvec::SmallVec;

use crate::lexer::Lexer;
use crate::token::{Token, TokenType};

/// How many already-consumed tokens remain reachable via `backup`.
pub const MAX_BACKTRACK: usize = 4;

/// Token types that end a clause for SQL parsing.
const SQL_CLAUSE_ENDS: &[TokenType] = &[
    TokenType::Eof,
    TokenType::Eos,
    TokenType::Error,
    TokenType::Into,
    TokenType::From,
    TokenType::Where,
    TokenType::Having,
    TokenType::GroupBy,
    TokenType::OrderBy,
    TokenType::Limit,
    TokenType::With,
    TokenType::Alias,
    TokenType::Values,
];

/// Token types that end a clause for FilterQL parsing.
const FILTERQL_CLAUSE_ENDS: &[TokenType] = &[
    TokenType::Eof,
    TokenType::Eos,
    TokenType::Error,
    TokenType::From,
    TokenType::Filter,
    TokenType::Limit,
    TokenType::With,
    TokenType::Alias,
];

/// A cursor over a lexer's token stream with single-token lookahead and a
/// bounded backtrack window. Parsers use `backup` to un-consume a token
/// after an over-eager read; anything older than `MAX_BACKTRACK` tokens
/// is discarded and cannot be returned to.
pub struct TokenPager<'a> {
    lexer: Lexer<'a>,
    window: SmallVec<[Token; MAX_BACKTRACK + 2]>,
    cursor: usize,
    clause_ends: &'static [TokenType],
}

impl<'a> TokenPager<'a> {
    pub fn new(mut lexer: Lexer<'a>, clause_ends: &'static [TokenType]) -> Self {
        let first = lexer.next_token();
        let mut window = SmallVec::new();
        window.push(first);
        Self {
            lexer,
            window,
            cursor: 0,
            clause_ends,
        }
    }

    /// Pager over SQL input with the SQL clause-terminator set.
    pub fn sql(input: &'a str) -> Self {
        Self::new(Lexer::sql(input), SQL_CLAUSE_ENDS)
    }

    /// Pager over FilterQL input with the FilterQL clause-terminator set.
    pub fn filterql(input: &'a str) -> Self {
        Self::new(Lexer::filterql(input), FILTERQL_CLAUSE_ENDS)
    }

    /// The current token.
    pub fn cur(&self) -> &Token {
        &self.window[self.cursor]
    }

    /// Advance to, and return, the next token.
    pub fn next(&mut self) -> Token {
        if self.cursor + 1 >= self.window.len() {
            let t = self.lexer.next_token();
            self.window.push(t);
        }
        self.cursor += 1;
        if self.cursor > MAX_BACKTRACK {
            self.window.remove(0);
            self.cursor -= 1;
        }
        self.window[self.cursor].clone()
    }

    /// The next token without consuming it.
    pub fn peek(&mut self) -> &Token {
        if self.cursor + 1 >= self.window.len() {
            let t = self.lexer.next_token();
            self.window.push(t);
        }
        &self.window[self.cursor + 1]
    }

    /// Step back one token. Returns false once the backtrack window is
    /// exhausted.
    pub fn backup(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Is the current token a stream terminator (Eof, Eos, Error)?
    pub fn is_end(&self) -> bool {
        self.cur().token_type.is_terminal()
    }

    /// Is the current token one of this pager's clause terminators?
    pub fn clause_end(&self) -> bool {
        self.clause_ends.contains(&self.cur().token_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cur_and_next() {
        let mut p = TokenPager::sql("SELECT a FROM b");
        assert_eq!(p.cur().token_type, TokenType::Select);
        assert_eq!(p.next().token_type, TokenType::Identity);
        assert_eq!(p.cur().token_type, TokenType::Identity);
        assert_eq!(p.next().token_type, TokenType::From);
        assert_eq!(p.next().token_type, TokenType::Identity);
        assert_eq!(p.next().token_type, TokenType::Eof);
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut p = TokenPager::sql("SELECT a");
        assert_eq!(p.peek().token_type, TokenType::Identity);
        assert_eq!(p.cur().token_type, TokenType::Select);
        assert_eq!(p.next().token_type, TokenType::Identity);
    }

    #[test]
    fn test_backup_within_window() {
        let mut p = TokenPager::sql("SELECT a, b FROM c");
        p.next(); // a
        p.next(); // ,
        assert!(p.backup());
        assert_eq!(p.cur().token_type, TokenType::Identity);
        assert_eq!(p.next().token_type, TokenType::Comma);
    }

    #[test]
    fn test_backup_is_bounded() {
        let mut p = TokenPager::sql("SELECT a, b, c, d, e FROM t");
        for _ in 0..8 {
            p.next();
        }
        let mut steps = 0;
        while p.backup() {
            steps += 1;
        }
        assert_eq!(steps, MAX_BACKTRACK);
    }

    #[test]
    fn test_clause_end() {
        let mut p = TokenPager::sql("SELECT a FROM b");
        assert!(!p.clause_end());
        p.next(); // a
        p.next(); // FROM
        assert!(p.clause_end());
        assert!(!p.is_end());
    }

    #[test]
    fn test_is_end_at_eof() {
        let mut p = TokenPager::sql("SELECT a");
        p.next();
        p.next();
        assert_eq!(p.cur().token_type, TokenType::Eof);
        assert!(p.is_end());
        assert!(p.clause_end());
    }

    #[test]
    fn test_filterql_clause_ends() {
        let mut p = TokenPager::filterql("FILTER x > 5 FROM t");
        while p.cur().token_type != TokenType::From {
            assert!(!p.is_end(), "ran off the end before FROM");
            p.next();
        }
        assert!(p.clause_end());
    }
}
