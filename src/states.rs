//! The state-function library. Each state consumes characters, emits at
//! most one token, and returns the next state (`None` pops the lexer's
//! continuation stack). Statement walking is driven by the dialect's
//! clause tables; the free-form tokenizers below handle the text between
//! clause keywords.

use phf::phf_map;

use crate::lexer::{Lexer, StateFn};
use crate::token::TokenType;

pub const LEX_DIALECT_FOR_STATEMENT: StateFn = StateFn {
    name: "lex_dialect_for_statement",
    f: lex_dialect_for_statement,
};
pub const LEX_STATEMENT: StateFn = StateFn {
    name: "lex_statement",
    f: lex_statement,
};
pub const LEX_COLUMNS: StateFn = StateFn {
    name: "lex_columns",
    f: lex_columns,
};
pub const LEX_CONDITIONAL_CLAUSE: StateFn = StateFn {
    name: "lex_conditional_clause",
    f: lex_conditional_clause,
};
pub const LEX_EXPRESSION: StateFn = StateFn {
    name: "lex_expression",
    f: lex_expression,
};
pub const LEX_LOGICAL_EXPRESSION: StateFn = StateFn {
    name: "lex_logical_expression",
    f: lex_logical_expression,
};
pub const LEX_EXPRESSION_OR_IDENTITY: StateFn = StateFn {
    name: "lex_expression_or_identity",
    f: lex_expression_or_identity,
};
pub const LEX_LIST_OF_ARGS: StateFn = StateFn {
    name: "lex_list_of_args",
    f: lex_list_of_args,
};
pub const LEX_TABLE_REFERENCES: StateFn = StateFn {
    name: "lex_table_references",
    f: lex_table_references,
};
pub const LEX_ORDER_BY_COLUMN: StateFn = StateFn {
    name: "lex_order_by_column",
    f: lex_order_by_column,
};
pub const LEX_DDL_COLUMN: StateFn = StateFn {
    name: "lex_ddl_column",
    f: lex_ddl_column,
};
pub const LEX_FILTER_CLAUSE: StateFn = StateFn {
    name: "lex_filter_clause",
    f: lex_filter_clause,
};
pub const LEX_IDENTIFIER: StateFn = StateFn {
    name: "lex_identifier",
    f: lex_identifier,
};
pub const LEX_NUMBER: StateFn = StateFn {
    name: "lex_number",
    f: lex_number,
};
pub const LEX_VALUE: StateFn = StateFn {
    name: "lex_value",
    f: lex_value,
};
pub const LEX_END_SUBSELECT: StateFn = StateFn {
    name: "lex_end_subselect",
    f: lex_end_subselect,
};
pub const LEX_COMMENT: StateFn = StateFn {
    name: "lex_comment",
    f: lex_comment,
};
pub const LEX_JSON_VALUE: StateFn = StateFn {
    name: "lex_json_value",
    f: lex_json_value,
};
pub const LEX_JSON_OBJECT: StateFn = StateFn {
    name: "lex_json_object",
    f: lex_json_object,
};
pub const LEX_JSON_ARRAY: StateFn = StateFn {
    name: "lex_json_array",
    f: lex_json_array,
};

const DEPTH_ERR: &str = "statement nesting exceeds maximum depth";

/// Words that lex as operator or literal tokens in term position.
static EXPR_KEYWORDS: phf::Map<&'static str, TokenType> = phf_map! {
    "and" => TokenType::LogicAnd,
    "or" => TokenType::LogicOr,
    "not" => TokenType::Negate,
    "in" => TokenType::In,
    "like" => TokenType::Like,
    "between" => TokenType::Between,
    "as" => TokenType::As,
    "true" => TokenType::Bool,
    "false" => TokenType::Bool,
};

/// Words with dedicated tokens inside a FROM clause (joins and the
/// conditions of ON).
static TABLE_KEYWORDS: phf::Map<&'static str, TokenType> = phf_map! {
    "join" => TokenType::Join,
    "inner" => TokenType::Inner,
    "outer" => TokenType::Outer,
    "left" => TokenType::Left,
    "right" => TokenType::Right,
    "cross" => TokenType::Cross,
    "full" => TokenType::Full,
    "on" => TokenType::On,
    "as" => TokenType::As,
    "and" => TokenType::LogicAnd,
    "or" => TokenType::LogicOr,
    "not" => TokenType::Negate,
    "in" => TokenType::In,
    "like" => TokenType::Like,
};

static ORDER_KEYWORDS: phf::Map<&'static str, TokenType> = phf_map! {
    "asc" => TokenType::Asc,
    "desc" => TokenType::Desc,
};

static DDL_KEYWORDS: phf::Map<&'static str, TokenType> = phf_map! {
    "default" => TokenType::Default,
    "unique" => TokenType::Unique,
    "key" => TokenType::Key,
    "not" => TokenType::Negate,
};

// ---- Shared helpers ----

/// Skip whitespace and, when the cursor sits on a comment, divert through
/// the comment state with `resume` as the continuation. Comments are legal
/// at any token boundary, so every state calls this first.
fn trivia(l: &mut Lexer<'_>, resume: StateFn) -> Option<Option<StateFn>> {
    l.skip_whitespace();
    if l.at_comment() {
        if !l.push("comment", resume) {
            return Some(l.error(DEPTH_ERR));
        }
        return Some(Some(LEX_COMMENT));
    }
    None
}

/// Divert into the single-term tokenizer, resuming `resume` afterward.
fn operand(l: &mut Lexer<'_>, resume: StateFn) -> Option<StateFn> {
    if !l.push("operand", resume) {
        return l.error(DEPTH_ERR);
    }
    Some(LEX_EXPRESSION_OR_IDENTITY)
}

/// Handle an opening paren. If the word inside starts a sub-select the
/// lexer switches to that statement grammar (with a frame to consume the
/// closing paren); otherwise the group lexes as a parenthesized list.
fn open_group(l: &mut Lexer<'_>, resume: StateFn) -> Option<StateFn> {
    l.next_char();
    l.emit(TokenType::LeftParen);
    l.skip_whitespace();
    if let Some(sub) = l.sub_select_grammar() {
        if !l.push("subquery resume", resume) {
            return l.error(DEPTH_ERR);
        }
        if !l.push("subquery close", LEX_END_SUBSELECT) {
            return l.error(DEPTH_ERR);
        }
        l.enter_grammar(sub);
        return Some(LEX_STATEMENT);
    }
    if !l.push("paren group", resume) {
        return l.error(DEPTH_ERR);
    }
    Some(LEX_LIST_OF_ARGS)
}

fn starts_term(c: char) -> bool {
    c == '\'' || c == '"' || c == '`' || c == '[' || c == '@' || c == '_' || c.is_alphanumeric()
}

fn digit_follows(l: &Lexer<'_>) -> bool {
    matches!(l.peek_byte_at(1), Some(b) if b.is_ascii_digit())
}

// ---- Statement-level states ----

/// Entry state: dispatch on the first word of the input to one of the
/// dialect's statement grammars.
fn lex_dialect_for_statement(l: &mut Lexer<'_>) -> Option<StateFn> {
    if let Some(next) = trivia(l, LEX_DIALECT_FOR_STATEMENT) {
        return next;
    }
    if l.at_eof() {
        return None;
    }
    let word = l.peek_word();
    match l.dialect().statement_for_word(word) {
        Some(stmt) => {
            l.enter_grammar(&stmt.clauses);
            Some(LEX_STATEMENT)
        }
        None => {
            if word.is_empty() {
                let c = l.peek_char();
                l.error(format!("unexpected character at start of statement: {c:?}"))
            } else {
                l.error(format!("unrecognized statement: {word}"))
            }
        }
    }
}

/// Walk the active statement's clause table: match the next clause
/// keyword, emit its token, and hand off to the clause's tokenizer with
/// this state pushed as the continuation. Optional clauses are skipped on
/// a non-match; missing required clauses are an error.
fn lex_statement(l: &mut Lexer<'_>) -> Option<StateFn> {
    loop {
        if let Some(next) = trivia(l, LEX_STATEMENT) {
            return next;
        }
        if l.at_eof() {
            return None;
        }
        if l.peek_char() == Some(';') {
            if !l.stack_is_empty() {
                return l.error("unexpected ; inside nested statement");
            }
            l.next_char();
            l.emit(TokenType::Eos);
            l.reset_statement();
            return Some(LEX_DIALECT_FOR_STATEMENT);
        }
        let Some(clauses) = l.clauses else {
            l.internal_error("statement walker has no active grammar");
            return None;
        };
        if l.clause_pos >= clauses.len() {
            // Statement exhausted. Leftover input at the top level is an
            // error; in a nested grammar the caller's frame resumes.
            if l.stack_is_empty() {
                let tail = l.peek_word();
                return if !tail.is_empty() {
                    l.error(format!("unexpected input after statement: {tail}"))
                } else {
                    l.error(format!(
                        "unexpected character after statement: {:?}",
                        l.peek_char()
                    ))
                };
            }
            return None;
        }
        let clause = &clauses[l.clause_pos];
        let wildcard = clause.keyword == TokenType::Nil;
        let matched_end = if wildcard {
            None
        } else {
            l.match_clause_keyword(clause)
        };
        if wildcard || matched_end.is_some() {
            if let Some(end) = matched_end {
                l.advance_to(end);
                l.emit(clause.keyword);
            }
            let sub = if clause.clauses.is_empty() {
                None
            } else {
                Some(clause.clauses.as_slice())
            };
            if clause.repeat {
                l.clause_matched = true;
            } else {
                l.clause_pos += 1;
                l.clause_matched = false;
            }
            if let Some(clause_lexer) = clause.lexer {
                if !l.push("clause", LEX_STATEMENT) {
                    return l.error(DEPTH_ERR);
                }
                l.sub_clauses = sub;
                return Some(clause_lexer);
            }
            if !wildcard {
                return Some(LEX_STATEMENT);
            }
            continue;
        }
        if clause.optional || (clause.repeat && l.clause_matched) {
            l.clause_pos += 1;
            l.clause_matched = false;
            continue;
        }
        return l.error(format!("expected {}", clause.keyword_text()));
    }
}

/// Consume the closing paren of a completed sub-select.
fn lex_end_subselect(l: &mut Lexer<'_>) -> Option<StateFn> {
    if let Some(next) = trivia(l, LEX_END_SUBSELECT) {
        return next;
    }
    match l.peek_char() {
        Some(')') => {
            l.next_char();
            l.emit(TokenType::RightParen);
            None
        }
        _ => l.error("expected ) to close subquery"),
    }
}

// ---- Free-form clause tokenizers ----

/// One step of a comma-separated expression list. `clause_bounded` lexers
/// stop (without consuming) at the keyword of a later clause of the
/// active statement; the bare expression dialects have no such boundary.
fn expr_step(l: &mut Lexer<'_>, me: StateFn, clause_bounded: bool) -> Option<StateFn> {
    if let Some(next) = trivia(l, me) {
        return next;
    }
    let Some(c) = l.peek_char() else {
        return None;
    };
    if c == ';' || c == ')' {
        return None;
    }
    if clause_bounded && c.is_ascii_alphabetic() && l.is_next_keyword() {
        return None;
    }
    match c {
        ',' => {
            l.next_char();
            l.emit(TokenType::Comma);
            Some(me)
        }
        '(' => open_group(l, me),
        '*' => {
            l.next_char();
            l.emit(TokenType::Star);
            Some(me)
        }
        '-' | '+' if digit_follows(l) => operand(l, me),
        // After a binary operator the next token is a term, so regexes
        // and signed numbers lex correctly there.
        '=' | '!' | '<' | '>' | '+' | '-' | '/' | '%' | '&' | '|' => match scan_operator(l) {
            Some(tt) => {
                l.emit(tt);
                operand(l, me)
            }
            None => l.error(format!("unexpected character {c:?} in expression")),
        },
        _ if starts_term(c) => operand(l, me),
        _ => l.error(format!("unexpected character {c:?} in expression")),
    }
}

fn lex_columns(l: &mut Lexer<'_>) -> Option<StateFn> {
    expr_step(l, LEX_COLUMNS, true)
}

fn lex_conditional_clause(l: &mut Lexer<'_>) -> Option<StateFn> {
    expr_step(l, LEX_CONDITIONAL_CLAUSE, true)
}

fn lex_filter_clause(l: &mut Lexer<'_>) -> Option<StateFn> {
    expr_step(l, LEX_FILTER_CLAUSE, true)
}

fn lex_expression(l: &mut Lexer<'_>) -> Option<StateFn> {
    expr_step(l, LEX_EXPRESSION, false)
}

fn lex_logical_expression(l: &mut Lexer<'_>) -> Option<StateFn> {
    expr_step(l, LEX_LOGICAL_EXPRESSION, false)
}

/// Emit exactly one term: a keyword-operator word, a UDF name, an
/// identity, a literal, or a parenthesized group / sub-select. Pushed as
/// a detour by the list tokenizers; returning `None` resumes the caller.
fn lex_expression_or_identity(l: &mut Lexer<'_>) -> Option<StateFn> {
    if let Some(next) = trivia(l, LEX_EXPRESSION_OR_IDENTITY) {
        return next;
    }
    let Some(c) = l.peek_char() else {
        return l.error("unexpected end of input, expected expression");
    };
    match c {
        '(' => {
            l.next_char();
            l.emit(TokenType::LeftParen);
            l.skip_whitespace();
            if let Some(sub) = l.sub_select_grammar() {
                if !l.push("subquery close", LEX_END_SUBSELECT) {
                    return l.error(DEPTH_ERR);
                }
                l.enter_grammar(sub);
                return Some(LEX_STATEMENT);
            }
            Some(LEX_LIST_OF_ARGS)
        }
        '!' => {
            l.next_char();
            l.emit(TokenType::Negate);
            Some(LEX_EXPRESSION_OR_IDENTITY)
        }
        '/' => {
            l.scan_regex();
            None
        }
        '-' | '+' => {
            l.scan_number();
            None
        }
        _ if c.is_ascii_digit() => {
            l.scan_number();
            None
        }
        '\'' | '"' => {
            if l.config().identity_quoting.contains(&(c as u8)) {
                l.scan_identity();
            } else {
                l.scan_value();
            }
            None
        }
        _ if c.is_ascii() && l.config().identity_quoting.contains(&(c as u8)) => {
            l.scan_identity();
            None
        }
        _ if c.is_alphabetic() || c == '_' || c == '@' => {
            let word = l.peek_word();
            if !word.is_empty() {
                let lower = word.to_ascii_lowercase();
                if let Some(&tt) = EXPR_KEYWORDS.get(lower.as_str()) {
                    let end = l.pos() + word.len();
                    l.advance_to(end);
                    l.emit(tt);
                    return None;
                }
            }
            // A bare identifier run followed directly by ( is a function
            // call; the name lexes as one token without the paren.
            let end = l.bare_identifier_end();
            if end > l.pos() && l.byte_at(end) == Some(b'(') {
                l.advance_to(end);
                l.emit(TokenType::UdfExpr);
                return None;
            }
            l.scan_identity();
            None
        }
        _ => l.error(format!("expected expression, found {c:?}")),
    }
}

/// Inside a parenthesized group: comma-separated terms until the closing
/// paren, which this state consumes and emits. Clause-keyword boundaries
/// do not apply here, so `select` or `from` are ordinary words.
fn lex_list_of_args(l: &mut Lexer<'_>) -> Option<StateFn> {
    let me = LEX_LIST_OF_ARGS;
    if let Some(next) = trivia(l, me) {
        return next;
    }
    let Some(c) = l.peek_char() else {
        return l.error("unterminated parenthesized list, expected )");
    };
    match c {
        ')' => {
            l.next_char();
            l.emit(TokenType::RightParen);
            None
        }
        ',' => {
            l.next_char();
            l.emit(TokenType::Comma);
            Some(me)
        }
        ';' => l.error("unexpected ; inside parenthesized list"),
        '(' => open_group(l, me),
        '*' => {
            l.next_char();
            l.emit(TokenType::Star);
            Some(me)
        }
        '-' | '+' if digit_follows(l) => operand(l, me),
        '=' | '!' | '<' | '>' | '+' | '-' | '/' | '%' | '&' | '|' => match scan_operator(l) {
            Some(tt) => {
                l.emit(tt);
                operand(l, me)
            }
            None => l.error(format!("unexpected character {c:?} in list")),
        },
        _ if starts_term(c) => operand(l, me),
        _ => l.error(format!("unexpected character {c:?} in list")),
    }
}

/// FROM clause body: table names, join words, ON conditions, and
/// parenthesized sub-selects.
fn lex_table_references(l: &mut Lexer<'_>) -> Option<StateFn> {
    let me = LEX_TABLE_REFERENCES;
    if let Some(next) = trivia(l, me) {
        return next;
    }
    let Some(c) = l.peek_char() else {
        return None;
    };
    if c == ';' || c == ')' {
        return None;
    }
    if c.is_ascii_alphabetic() && l.is_next_keyword() {
        return None;
    }
    match c {
        ',' => {
            l.next_char();
            l.emit(TokenType::Comma);
            Some(me)
        }
        '(' => open_group(l, me),
        '=' | '!' | '<' | '>' => match scan_operator(l) {
            Some(tt) => {
                l.emit(tt);
                Some(me)
            }
            None => l.error(format!("unexpected character {c:?} in table reference")),
        },
        _ if c.is_alphabetic() || c == '_' || c == '@' => {
            let word = l.peek_word();
            let lower = word.to_ascii_lowercase();
            if let Some(&tt) = TABLE_KEYWORDS.get(lower.as_str()) {
                let end = l.pos() + word.len();
                l.advance_to(end);
                l.emit(tt);
                return Some(me);
            }
            operand(l, me)
        }
        _ if starts_term(c) => operand(l, me),
        _ => l.error(format!("unexpected character {c:?} in table reference")),
    }
}

/// ORDER BY body: columns or expressions with optional ASC/DESC words.
fn lex_order_by_column(l: &mut Lexer<'_>) -> Option<StateFn> {
    let me = LEX_ORDER_BY_COLUMN;
    if let Some(next) = trivia(l, me) {
        return next;
    }
    let Some(c) = l.peek_char() else {
        return None;
    };
    if c == ';' || c == ')' {
        return None;
    }
    if c.is_ascii_alphabetic() && l.is_next_keyword() {
        return None;
    }
    match c {
        ',' => {
            l.next_char();
            l.emit(TokenType::Comma);
            Some(me)
        }
        '(' => open_group(l, me),
        _ if c.is_alphabetic() || c == '_' || c == '@' => {
            let word = l.peek_word();
            let lower = word.to_ascii_lowercase();
            if let Some(&tt) = ORDER_KEYWORDS.get(lower.as_str()) {
                let end = l.pos() + word.len();
                l.advance_to(end);
                l.emit(tt);
                return Some(me);
            }
            operand(l, me)
        }
        _ if starts_term(c) => operand(l, me),
        _ => l.error(format!("unexpected character {c:?} in order by")),
    }
}

/// ALTER ... CHANGE body: column name plus type and attribute words such
/// as DEFAULT, UNIQUE, KEY, NOT NULL, CHARACTER SET.
fn lex_ddl_column(l: &mut Lexer<'_>) -> Option<StateFn> {
    let me = LEX_DDL_COLUMN;
    if let Some(next) = trivia(l, me) {
        return next;
    }
    let Some(c) = l.peek_char() else {
        return None;
    };
    if c == ';' || c == ')' {
        return None;
    }
    if c.is_ascii_alphabetic() && l.is_next_keyword() {
        return None;
    }
    match c {
        ',' => {
            l.next_char();
            l.emit(TokenType::Comma);
            Some(me)
        }
        '(' => open_group(l, me),
        '=' => match scan_operator(l) {
            Some(tt) => {
                l.emit(tt);
                Some(me)
            }
            None => l.error("unexpected character '=' in ddl column"),
        },
        _ if c.is_alphabetic() || c == '_' || c == '@' => {
            if let Some(end) = l.match_words(&["character", "set"]) {
                l.advance_to(end);
                l.emit(TokenType::CharacterSet);
                return Some(me);
            }
            let word = l.peek_word();
            let lower = word.to_ascii_lowercase();
            if let Some(&tt) = DDL_KEYWORDS.get(lower.as_str()) {
                let end = l.pos() + word.len();
                l.advance_to(end);
                l.emit(tt);
                return Some(me);
            }
            operand(l, me)
        }
        _ if starts_term(c) => operand(l, me),
        _ => l.error(format!("unexpected character {c:?} in ddl column")),
    }
}

// ---- Single-token clause states ----

fn lex_identifier(l: &mut Lexer<'_>) -> Option<StateFn> {
    if let Some(next) = trivia(l, LEX_IDENTIFIER) {
        return next;
    }
    if l.at_eof() {
        return l.error("expected identifier");
    }
    l.scan_identity();
    None
}

fn lex_number(l: &mut Lexer<'_>) -> Option<StateFn> {
    if let Some(next) = trivia(l, LEX_NUMBER) {
        return next;
    }
    if l.at_eof() {
        return l.error("expected numeric literal");
    }
    l.scan_number();
    None
}

fn lex_value(l: &mut Lexer<'_>) -> Option<StateFn> {
    if let Some(next) = trivia(l, LEX_VALUE) {
        return next;
    }
    if l.at_eof() {
        return l.error("expected quoted value");
    }
    l.scan_value();
    None
}

fn lex_comment(l: &mut Lexer<'_>) -> Option<StateFn> {
    l.scan_comment();
    None
}

// ---- JSON states ----

/// One JSON value: object, array, string, number, boolean, or null.
/// Containers hand off to their own states; scalars emit and pop.
fn lex_json_value(l: &mut Lexer<'_>) -> Option<StateFn> {
    if let Some(next) = trivia(l, LEX_JSON_VALUE) {
        return next;
    }
    let Some(c) = l.peek_char() else {
        return None;
    };
    match c {
        '{' => {
            l.next_char();
            l.emit(TokenType::LeftBrace);
            Some(LEX_JSON_OBJECT)
        }
        '[' => {
            l.next_char();
            l.emit(TokenType::LeftBracket);
            Some(LEX_JSON_ARRAY)
        }
        '"' | '\'' => {
            l.scan_value();
            None
        }
        '-' | '+' => {
            l.scan_number();
            None
        }
        _ if c.is_ascii_digit() => {
            l.scan_number();
            None
        }
        _ if c.is_alphabetic() => {
            let word = l.peek_word();
            let end = l.pos() + word.len();
            match word.to_ascii_lowercase().as_str() {
                "true" | "false" => {
                    l.advance_to(end);
                    l.emit(TokenType::Bool);
                    None
                }
                "null" => {
                    l.advance_to(end);
                    l.emit(TokenType::Identity);
                    None
                }
                _ => l.error(format!("invalid json literal: {word}")),
            }
        }
        _ => l.error(format!("unexpected character {c:?} in json")),
    }
}

fn lex_json_object(l: &mut Lexer<'_>) -> Option<StateFn> {
    let me = LEX_JSON_OBJECT;
    if let Some(next) = trivia(l, me) {
        return next;
    }
    let Some(c) = l.peek_char() else {
        return l.error("unterminated json object, expected }");
    };
    match c {
        '}' => {
            l.next_char();
            l.emit(TokenType::RightBrace);
            None
        }
        ',' => {
            l.next_char();
            l.emit(TokenType::Comma);
            Some(me)
        }
        ':' => {
            l.next_char();
            l.emit(TokenType::Colon);
            Some(me)
        }
        '"' | '\'' => {
            l.scan_value();
            Some(me)
        }
        _ => {
            if !l.push("json member", me) {
                return l.error(DEPTH_ERR);
            }
            Some(LEX_JSON_VALUE)
        }
    }
}

fn lex_json_array(l: &mut Lexer<'_>) -> Option<StateFn> {
    let me = LEX_JSON_ARRAY;
    if let Some(next) = trivia(l, me) {
        return next;
    }
    let Some(c) = l.peek_char() else {
        return l.error("unterminated json array, expected ]");
    };
    match c {
        ']' => {
            l.next_char();
            l.emit(TokenType::RightBracket);
            None
        }
        ',' => {
            l.next_char();
            l.emit(TokenType::Comma);
            Some(me)
        }
        _ => {
            if !l.push("json element", me) {
                return l.error(DEPTH_ERR);
            }
            Some(LEX_JSON_VALUE)
        }
    }
}

// ---- Character-level operators ----

/// Consume one symbolic operator. Multi-character forms (`==`, `!=`,
/// `>=`, `<=`, `<>`, `&&`, `||`) win over their prefixes.
fn scan_operator(l: &mut Lexer<'_>) -> Option<TokenType> {
    let c = l.next_char()?;
    Some(match c {
        '=' => {
            if l.peek_char() == Some('=') {
                l.next_char();
                TokenType::EqualEqual
            } else {
                TokenType::Equal
            }
        }
        '!' => {
            if l.peek_char() == Some('=') {
                l.next_char();
                TokenType::NE
            } else {
                TokenType::Negate
            }
        }
        '>' => {
            if l.peek_char() == Some('=') {
                l.next_char();
                TokenType::GE
            } else {
                TokenType::GT
            }
        }
        '<' => match l.peek_char() {
            Some('=') => {
                l.next_char();
                TokenType::LE
            }
            Some('>') => {
                l.next_char();
                TokenType::NE
            }
            _ => TokenType::LT,
        },
        '+' => TokenType::Plus,
        '-' => TokenType::Minus,
        '*' => TokenType::Star,
        '/' => TokenType::Divide,
        '%' => TokenType::Modulus,
        '&' if l.peek_char() == Some('&') => {
            l.next_char();
            TokenType::And
        }
        '|' if l.peek_char() == Some('|') => {
            l.next_char();
            TokenType::Or
        }
        _ => return None,
    })
}
