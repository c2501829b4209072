use std::fmt;

use memchr::{memchr, memmem};
use smallvec::SmallVec;

use crate::dialect::{Clause, Dialect, LexerConfig, MAX_STACK_DEPTH};
use crate::token::{Token, TokenType};

/// A unit of lexing logic: consumes characters, emits at most one token,
/// and returns the next unit to run (`None` pops the continuation stack).
/// States are plain function pointers; anything a state needs to carry
/// lives in the lexer's grammar-context fields.
#[derive(Clone, Copy)]
pub struct StateFn {
    pub(crate) name: &'static str,
    pub(crate) f: fn(&mut Lexer<'_>) -> Option<StateFn>,
}

impl fmt::Debug for StateFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A named continuation: where to resume after the current lexing unit
/// finishes, plus the grammar context to restore. The name is diagnostic
/// only.
struct Frame<'a> {
    name: &'static str,
    resume: StateFn,
    clauses: Option<&'a [Clause]>,
    clause_pos: usize,
    clause_matched: bool,
    sub_clauses: Option<&'a [Clause]>,
}

/// The dialect-driven lexer. Single-owner, single-threaded state; construct
/// one per input string. `next_token` drives the state machine forward on
/// the caller's stack until a token is ready — no channels, no tasks.
pub struct Lexer<'a> {
    input: &'a str,
    start: usize,
    pos: usize,
    width: usize,
    state: Option<StateFn>,
    dialect: &'a Dialect,
    config: LexerConfig,

    // Active grammar context.
    pub(crate) clauses: Option<&'a [Clause]>,
    pub(crate) clause_pos: usize,
    pub(crate) clause_matched: bool,
    pub(crate) sub_clauses: Option<&'a [Clause]>,

    stack: SmallVec<[Frame<'a>; 8]>,
    ready: Option<Token>,
    errored: bool,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str, dialect: &'a Dialect) -> Self {
        Self::with_config(input, dialect, dialect.config)
    }

    /// Construct with explicit feature toggles, overriding the dialect's
    /// defaults.
    pub fn with_config(input: &'a str, dialect: &'a Dialect, config: LexerConfig) -> Self {
        Self {
            input,
            start: 0,
            pos: 0,
            width: 0,
            state: Some(crate::states::LEX_DIALECT_FOR_STATEMENT),
            dialect,
            config,
            clauses: None,
            clause_pos: 0,
            clause_matched: false,
            sub_clauses: None,
            stack: SmallVec::new(),
            ready: None,
            errored: false,
            done: false,
        }
    }

    pub fn sql(input: &'a str) -> Self {
        Self::new(input, &crate::dialect::SQL_DIALECT)
    }

    pub fn filterql(input: &'a str) -> Self {
        Self::new(input, &crate::dialect::FILTERQL_DIALECT)
    }

    pub fn expression(input: &'a str) -> Self {
        Self::new(input, &crate::dialect::EXPRESSION_DIALECT)
    }

    pub fn logical(input: &'a str) -> Self {
        Self::new(input, &crate::dialect::LOGICAL_DIALECT)
    }

    pub fn json(input: &'a str) -> Self {
        Self::new(input, &crate::dialect::JSON_DIALECT)
    }

    pub fn dialect(&self) -> &'a Dialect {
        self.dialect
    }

    pub fn config(&self) -> &LexerConfig {
        &self.config
    }

    pub fn raw_input(&self) -> &'a str {
        self.input
    }

    /// The unconsumed tail of the input and whether anything remains.
    /// Callers lexing multi-statement input re-lex this after each `Eos`.
    pub fn remainder(&self) -> (String, bool) {
        let rest = &self.input[self.pos..];
        (rest.to_string(), !rest.trim().is_empty())
    }

    // ---- Trampoline ----

    /// Pull the next token, driving state functions until one is emitted.
    /// After a terminal `Error` token, and after input exhaustion, returns
    /// `Eof` forever.
    pub fn next_token(&mut self) -> Token {
        // A state function must consume input or emit before returning
        // itself; this bound turns a violation into an internal error
        // instead of a hang.
        let mut budget = self.input.len().saturating_mul(4) + 1024;
        loop {
            if let Some(tok) = self.ready.take() {
                return tok;
            }
            if self.errored {
                return Token::eof(self.pos);
            }
            match self.state {
                Some(state) => {
                    self.state = (state.f)(self);
                }
                None => match self.stack.pop() {
                    Some(frame) => {
                        self.clauses = frame.clauses;
                        self.clause_pos = frame.clause_pos;
                        self.clause_matched = frame.clause_matched;
                        self.sub_clauses = frame.sub_clauses;
                        self.state = Some(frame.resume);
                    }
                    None => return Token::eof(self.pos),
                },
            }
            if budget == 0 {
                self.internal_error("lexer made no progress");
                continue;
            }
            budget -= 1;
        }
    }

    // ---- Cursor primitives ----

    pub(crate) fn at_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Decode one rune and advance.
    pub(crate) fn next_char(&mut self) -> Option<char> {
        let c = self.input[self.pos..].chars().next()?;
        self.width = c.len_utf8();
        self.pos += self.width;
        Some(c)
    }

    /// Undo exactly one `next_char`. Single-level only; a second call
    /// without an intervening `next_char` is a no-op.
    pub(crate) fn backup(&mut self) {
        self.pos -= self.width;
        self.width = 0;
    }

    pub(crate) fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    pub(crate) fn peek_byte_at(&self, offset: usize) -> Option<u8> {
        self.input.as_bytes().get(self.pos + offset).copied()
    }

    /// Consume and discard whitespace; never emitted.
    pub(crate) fn skip_whitespace(&mut self) {
        let bytes = self.input.as_bytes();
        while self.pos < bytes.len() && bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        self.width = 0;
        self.start = self.pos;
    }

    /// The bare word (alphanumeric/underscore run) starting at `idx`,
    /// without consuming it.
    pub(crate) fn word_at(&self, idx: usize) -> &'a str {
        let bytes = self.input.as_bytes();
        let mut end = idx;
        while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_') {
            end += 1;
        }
        &self.input[idx..end]
    }

    pub(crate) fn peek_word(&self) -> &'a str {
        self.word_at(self.pos)
    }

    /// The next word past whitespace and comments, without consuming
    /// anything. Lookahead only; comments still get emitted by whichever
    /// state handles them.
    pub(crate) fn peek_word_skipping_trivia(&self) -> &'a str {
        let bytes = self.input.as_bytes();
        let mut i = self.pos;
        loop {
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            let rest = &bytes[i..];
            if rest.starts_with(b"/*") {
                match memmem::find(&rest[2..], b"*/") {
                    Some(idx) => i += 2 + idx + 2,
                    None => return "",
                }
            } else if rest.starts_with(b"--") || rest.starts_with(b"//") || rest.starts_with(b"#")
            {
                match memchr(b'\n', rest) {
                    Some(idx) => i += idx + 1,
                    None => return "",
                }
            } else {
                return self.word_at(i);
            }
        }
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn byte_at(&self, idx: usize) -> Option<u8> {
        self.input.as_bytes().get(idx).copied()
    }

    /// Jump the cursor to an absolute offset (after multi-word keyword or
    /// lookahead-based matching).
    pub(crate) fn advance_to(&mut self, end: usize) {
        self.pos = end;
        self.width = 0;
    }

    /// If the clause's (possibly multi-word) keyword matches at the
    /// cursor, returns the absolute byte offset just past it.
    pub(crate) fn match_clause_keyword(&self, clause: &Clause) -> Option<usize> {
        let bytes = self.input.as_bytes();
        let mut cursor = self.pos;
        let mut first = true;
        for word in clause.keyword_words() {
            if !first {
                while cursor < bytes.len() && bytes[cursor].is_ascii_whitespace() {
                    cursor += 1;
                }
            }
            let next = self.word_at(cursor);
            if !next.eq_ignore_ascii_case(word) {
                return None;
            }
            cursor += next.len();
            first = false;
        }
        if first {
            None
        } else {
            Some(cursor)
        }
    }

    /// Match a whitespace-separated word sequence at the cursor,
    /// case-insensitively. Returns the offset just past the last word.
    pub(crate) fn match_words(&self, words: &[&str]) -> Option<usize> {
        let bytes = self.input.as_bytes();
        let mut cursor = self.pos;
        let mut first = true;
        for word in words {
            if !first {
                while cursor < bytes.len() && bytes[cursor].is_ascii_whitespace() {
                    cursor += 1;
                }
            }
            let next = self.word_at(cursor);
            if !next.eq_ignore_ascii_case(word) {
                return None;
            }
            cursor += next.len();
            first = false;
        }
        Some(cursor)
    }

    /// End of the bare-identifier run starting at the cursor (identifier
    /// characters plus `.`, `@`, configured extras, and `.*`). Used by the
    /// function-expression lookahead: a run immediately followed by `(`
    /// is a UDF expression, not an identity.
    pub(crate) fn bare_identifier_end(&self) -> usize {
        let bytes = self.input.as_bytes();
        let len = bytes.len();
        let mut i = self.pos;
        while i < len {
            let b = bytes[i];
            if b.is_ascii_alphanumeric() || b == b'_' || b == b'@' || b == b'.' || b >= 0x80 {
                i += 1;
            } else if b == b'*' && i > self.pos && bytes[i - 1] == b'.' {
                i += 1;
            } else if self.config.identifier_extra.contains(&b) {
                i += 1;
            } else {
                break;
            }
        }
        i
    }

    pub(crate) fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    // ---- Emission ----

    /// Emit a token for `input[start..pos]` into the one-slot buffer.
    /// Emitting over an undelivered token is an internal error, not a
    /// silent overwrite.
    pub(crate) fn emit(&mut self, token_type: TokenType) {
        if self.ready.is_some() {
            self.internal_error("token buffer overrun");
            return;
        }
        self.ready = Some(Token::new(
            token_type,
            &self.input[self.start..self.pos],
            self.start,
        ));
        self.start = self.pos;
    }

    /// Emit with an explicit value (used where quote characters are
    /// stripped from the matched text).
    pub(crate) fn emit_with(&mut self, token_type: TokenType, value: &str) {
        if self.ready.is_some() {
            self.internal_error("token buffer overrun");
            return;
        }
        self.ready = Some(Token::new(token_type, value, self.start));
        self.start = self.pos;
    }

    /// Emit a terminal `Error` token. The stream is dead afterward: only
    /// `Eof` follows.
    pub(crate) fn error(&mut self, message: impl fmt::Display) -> Option<StateFn> {
        self.ready = Some(Token::new(
            TokenType::Error,
            &message.to_string(),
            self.start,
        ));
        self.errored = true;
        self.state = None;
        self.stack.clear();
        None
    }

    /// An invariant violation inside the state machine itself. Surfaced
    /// through the same channel as input errors rather than a panic.
    pub(crate) fn internal_error(&mut self, message: &str) {
        self.ready = Some(Token::new(
            TokenType::Error,
            &format!("internal lexer error: {message}"),
            self.start,
        ));
        self.errored = true;
        self.state = None;
        self.stack.clear();
    }

    // ---- Continuation stack ----

    /// Push a named continuation, snapshotting the grammar context.
    /// Returns false when the stack is at its depth bound; callers must
    /// treat that as a terminal condition.
    pub(crate) fn push(&mut self, name: &'static str, resume: StateFn) -> bool {
        if self.stack.len() >= MAX_STACK_DEPTH {
            return false;
        }
        self.stack.push(Frame {
            name,
            resume,
            clauses: self.clauses,
            clause_pos: self.clause_pos,
            clause_matched: self.clause_matched,
            sub_clauses: self.sub_clauses,
        });
        true
    }

    pub(crate) fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    pub(crate) fn stack_is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    #[allow(dead_code)]
    pub(crate) fn stack_names(&self) -> Vec<&'static str> {
        self.stack.iter().map(|f| f.name).collect()
    }

    // ---- Grammar context ----

    /// Switch the active clause table (entering a statement or sub-select
    /// grammar). The previous context lives in the continuation stack.
    pub(crate) fn enter_grammar(&mut self, clauses: &'a [Clause]) {
        self.clauses = Some(clauses);
        self.clause_pos = 0;
        self.clause_matched = false;
        self.sub_clauses = None;
    }

    /// Reset after an end-of-statement token; the next token starts a
    /// fresh statement.
    pub(crate) fn reset_statement(&mut self) {
        self.clauses = None;
        self.clause_pos = 0;
        self.clause_matched = false;
        self.sub_clauses = None;
        self.stack.clear();
    }

    /// Is the word at the cursor the keyword of a remaining clause of the
    /// active statement? This is the boundary that lets a free-form clause
    /// lexer (column list, conditional) stop without a fixed token count.
    pub(crate) fn is_next_keyword(&self) -> bool {
        let Some(clauses) = self.clauses else {
            return false;
        };
        let first = self.peek_word();
        if first.is_empty() {
            return false;
        }
        'clauses: for clause in &clauses[self.clause_pos.min(clauses.len())..] {
            if clause.word_count() == 0 || !first.eq_ignore_ascii_case(clause.first_word()) {
                continue;
            }
            if !clause.multi_word() {
                return true;
            }
            // Multi-word keyword: every following word must match too.
            let mut cursor = self.pos + first.len();
            for word in clause.keyword_words().skip(1) {
                let bytes = self.input.as_bytes();
                while cursor < bytes.len() && bytes[cursor].is_ascii_whitespace() {
                    cursor += 1;
                }
                let next = self.word_at(cursor);
                if !next.eq_ignore_ascii_case(word) {
                    continue 'clauses;
                }
                cursor += next.len();
            }
            return true;
        }
        false
    }

    /// After an opening paren: does the word at the cursor start a
    /// sub-select? The current clause's nested grammar wins; otherwise a
    /// top-level SELECT grammar of the dialect is used, which is what
    /// allows unbounded nesting depth past the declared children.
    pub(crate) fn sub_select_grammar(&self) -> Option<&'a [Clause]> {
        let word = self.peek_word_skipping_trivia();
        if word.is_empty() {
            return None;
        }
        if let Some(sub) = self.sub_clauses {
            if !sub.is_empty() && word.eq_ignore_ascii_case(sub[0].first_word()) {
                return Some(sub);
            }
        }
        if let Some(stmt) = self.dialect.statement_for_word(word) {
            if stmt.keyword == TokenType::Select {
                return Some(&stmt.clauses);
            }
        }
        None
    }

    // ---- Literal / identifier / comment scanners ----

    /// Is the cursor at the start of a comment?
    pub(crate) fn at_comment(&self) -> bool {
        let rest = self.rest().as_bytes();
        match rest {
            [b'-', b'-', ..] | [b'/', b'/', ..] | [b'/', b'*', ..] => true,
            [b'#', ..] => true,
            _ => false,
        }
    }

    /// Scan and emit one comment token. Returns false on error (already
    /// emitted).
    pub(crate) fn scan_comment(&mut self) -> bool {
        let rest = self.rest().as_bytes();
        if rest.starts_with(b"/*") {
            match memmem::find(&rest[2..], b"*/") {
                Some(idx) => {
                    let end = 2 + idx + 2;
                    let text = &self.rest()[..end];
                    let token_type = if memchr(b'\n', text.as_bytes()).is_some() {
                        TokenType::CommentML
                    } else {
                        TokenType::Comment
                    };
                    self.pos += end;
                    self.width = 0;
                    self.emit(token_type);
                    true
                }
                None => {
                    self.error("unterminated /* comment");
                    false
                }
            }
        } else {
            let token_type = match rest {
                [b'-', b'-', ..] => TokenType::CommentSingleLine,
                [b'/', b'/', ..] => TokenType::CommentSlashes,
                _ => TokenType::CommentHash,
            };
            let end = memchr(b'\n', rest).unwrap_or(rest.len());
            self.pos += end;
            self.width = 0;
            self.emit(token_type);
            true
        }
    }

    /// Scan a quoted string literal; the delimiters are stripped from the
    /// token value. A doubled single quote (`''`) keeps scanning and
    /// promotes the token to `ValueWithSingleQuote`; a backslash escapes
    /// the following rune.
    pub(crate) fn scan_value(&mut self) -> bool {
        let quote = match self.next_char() {
            Some(c @ ('\'' | '"')) => c,
            _ => {
                self.error("expected quoted value");
                return false;
            }
        };
        let inner_start = self.pos;
        let mut doubled = false;
        loop {
            match self.next_char() {
                None => {
                    self.error(format!("unterminated string, expected closing {quote}"));
                    return false;
                }
                Some('\\') => {
                    self.next_char();
                }
                Some(c) if c == quote => {
                    if self.peek_char() == Some(quote) {
                        self.next_char();
                        doubled = true;
                        continue;
                    }
                    break;
                }
                Some(_) => {}
            }
        }
        let inner = &self.input[inner_start..self.pos - 1];
        let token_type = if doubled && quote == '\'' {
            TokenType::ValueWithSingleQuote
        } else {
            TokenType::Value
        };
        self.emit_with(token_type, inner);
        true
    }

    fn is_duration_unit(b: u8) -> bool {
        matches!(b, b'y' | b'm' | b'd' | b'h' | b'w' | b's' | b'u' | b'n')
    }

    /// Scan a numeric or duration literal under the strict grammar:
    /// optional sign; `0x` + uppercase hex digits (no sign, no dot);
    /// decimal integers without leading zeros; floats with digits on both
    /// sides of `.`; lowercase-`e` scientific notation; optional duration
    /// unit suffix. The token must not run into another alphanumeric rune.
    pub(crate) fn scan_number(&mut self) -> bool {
        let bytes = self.input.as_bytes();
        let len = bytes.len();
        let mut i = self.pos;
        let mut signed = false;

        if i < len && (bytes[i] == b'+' || bytes[i] == b'-') {
            signed = true;
            i += 1;
        }

        if i + 1 < len && bytes[i] == b'0' && bytes[i + 1] == b'x' {
            if signed {
                self.error("hex literal cannot be signed");
                return false;
            }
            i += 2;
            let digits_start = i;
            while i < len && (bytes[i].is_ascii_digit() || (b'A'..=b'F').contains(&bytes[i])) {
                i += 1;
            }
            if i == digits_start {
                self.error("malformed hex literal");
                return false;
            }
            if i < len && (bytes[i] == b'.' || bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_')
            {
                self.error("malformed hex literal");
                return false;
            }
            self.pos = i;
            self.width = 0;
            self.emit(TokenType::Integer);
            return true;
        }

        let digits_start = i;
        while i < len && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == digits_start {
            self.error("malformed numeric literal");
            return false;
        }
        if i - digits_start > 1 && bytes[digits_start] == b'0' {
            self.error("numeric literal cannot have a leading zero");
            return false;
        }

        let mut is_float = false;
        if i < len && bytes[i] == b'.' {
            i += 1;
            let frac_start = i;
            while i < len && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if i == frac_start {
                self.error("digits required after decimal point");
                return false;
            }
            is_float = true;
        }
        if i < len && bytes[i] == b'e' {
            let mut j = i + 1;
            if j < len && (bytes[j] == b'+' || bytes[j] == b'-') {
                j += 1;
            }
            let exp_start = j;
            while j < len && bytes[j].is_ascii_digit() {
                j += 1;
            }
            if j == exp_start {
                self.error("malformed exponent in numeric literal");
                return false;
            }
            i = j;
            is_float = true;
        }

        if self.config.supports_duration && i < len && Self::is_duration_unit(bytes[i]) {
            while i < len && Self::is_duration_unit(bytes[i]) {
                i += 1;
            }
            if i < len && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                self.error("malformed duration literal");
                return false;
            }
            self.pos = i;
            self.width = 0;
            self.emit(TokenType::Duration);
            return true;
        }

        if i < len && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
            self.error("malformed numeric literal");
            return false;
        }
        self.pos = i;
        self.width = 0;
        self.emit(if is_float {
            TokenType::Float
        } else {
            TokenType::Integer
        });
        true
    }

    /// Scan a quoted or bare identifier. Quoted identifiers use the
    /// dialect's quoting set (`[` closes with `]`) and must begin with a
    /// letter; quotes are stripped from the value. Bare identifiers allow
    /// alphanumerics, `_`, `@`, `.` (and `.*`), configured extras, and
    /// non-ASCII runes.
    pub(crate) fn scan_identity(&mut self) -> bool {
        let Some(c) = self.peek_char() else {
            self.error("expected identifier");
            return false;
        };
        if c.is_ascii() && self.config.identity_quoting.contains(&(c as u8)) {
            self.next_char();
            let closer = if c == '[' { ']' } else { c };
            let inner_start = self.pos;
            match self.peek_char() {
                Some(first) if first.is_alphabetic() || first == '_' => {}
                _ => {
                    self.error("quoted identifier must begin with a letter");
                    return false;
                }
            }
            loop {
                match self.next_char() {
                    None => {
                        self.error(format!(
                            "unterminated quoted identifier, expected closing {closer}"
                        ));
                        return false;
                    }
                    Some(ch) if ch == closer => break,
                    Some(_) => {}
                }
            }
            let inner = &self.input[inner_start..self.pos - 1];
            self.emit_with(TokenType::Identity, inner);
            return true;
        }

        if !(c.is_alphabetic() || c == '_' || c == '@') {
            self.error(format!("unexpected character in identifier: {c:?}"));
            return false;
        }
        let bytes = self.input.as_bytes();
        let len = bytes.len();
        let mut i = self.pos;
        while i < len {
            let b = bytes[i];
            if b.is_ascii_alphanumeric() || b == b'_' || b == b'@' || b == b'.' || b >= 0x80 {
                i += 1;
            } else if b == b'*' && i > self.pos && bytes[i - 1] == b'.' {
                i += 1;
            } else if self.config.identifier_extra.contains(&b) {
                i += 1;
            } else {
                break;
            }
        }
        self.pos = i;
        self.width = 0;
        self.emit(TokenType::Identity);
        true
    }

    /// Scan `/pattern/modifiers` with escape awareness.
    pub(crate) fn scan_regex(&mut self) -> bool {
        match self.next_char() {
            Some('/') => {}
            _ => {
                self.error("expected regex");
                return false;
            }
        }
        loop {
            match self.next_char() {
                None => {
                    self.error("unterminated regex, expected closing /");
                    return false;
                }
                Some('\\') => {
                    self.next_char();
                }
                Some('/') => break,
                Some(_) => {}
            }
        }
        while matches!(self.peek_char(), Some(c) if c.is_ascii_lowercase()) {
            self.next_char();
        }
        self.emit(TokenType::Regex);
        true
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    /// Tokens up to and including the first `Eof`.
    fn next(&mut self) -> Option<Token> {
        if self.done {
            return None;
        }
        let tok = self.next_token();
        if tok.token_type == TokenType::Eof {
            self.done = true;
        }
        Some(tok)
    }
}
