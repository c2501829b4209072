use std::sync::LazyLock;

use crate::error::QlexError;
use crate::lexer::StateFn;
use crate::states::{
    LEX_COLUMNS, LEX_CONDITIONAL_CLAUSE, LEX_DDL_COLUMN, LEX_EXPRESSION, LEX_FILTER_CLAUSE,
    LEX_IDENTIFIER, LEX_JSON_VALUE, LEX_LOGICAL_EXPRESSION, LEX_NUMBER, LEX_ORDER_BY_COLUMN,
    LEX_TABLE_REFERENCES, LEX_VALUE,
};
use crate::token::TokenType;

/// Maximum depth of the lexer's continuation stack. Inputs that would grow
/// the stack past this bound terminate with an `Error` token instead.
pub const MAX_STACK_DEPTH: usize = 100;

/// Construction-time feature toggles. There is no global mutable state:
/// a differently-configured lexer is a differently-constructed lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexerConfig {
    /// Accept duration literals such as `7d` or `45m`.
    pub supports_duration: bool,
    /// Delimiter bytes that open a quoted identifier (`[` closes with `]`).
    pub identity_quoting: &'static [u8],
    /// Extra bytes permitted inside bare identifiers (e.g. `/` for
    /// path-like table names).
    pub identifier_extra: &'static [u8],
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self {
            supports_duration: true,
            identity_quoting: b"`[",
            identifier_extra: b"",
        }
    }
}

/// One labeled segment of a statement's grammar. A statement is itself a
/// `Clause` whose `clauses` are its ordered clause list; nested `clauses`
/// on a clause such as FROM or WHERE describe the sub-select grammar.
#[derive(Debug, Clone)]
pub struct Clause {
    pub keyword: TokenType,
    pub lexer: Option<StateFn>,
    pub optional: bool,
    pub repeat: bool,
    pub clauses: Vec<Clause>,

    // Derived by init().
    keyword_text: &'static str,
    first_word: &'static str,
    multi_word: bool,
    word_count: usize,
}

impl Clause {
    pub fn new(keyword: TokenType, lexer: Option<StateFn>) -> Self {
        Self {
            keyword,
            lexer,
            optional: false,
            repeat: false,
            clauses: Vec::new(),
            keyword_text: "",
            first_word: "",
            multi_word: false,
            word_count: 0,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn repeat(mut self) -> Self {
        self.repeat = true;
        self
    }

    pub fn children(mut self, clauses: Vec<Clause>) -> Self {
        self.clauses = clauses;
        self
    }

    /// Derive keyword-matching metadata, recursively. Idempotent.
    pub fn init(&mut self) {
        let info = self.keyword.info();
        self.keyword_text = info.keyword;
        self.first_word = info.first_word;
        self.multi_word = info.has_spaces;
        self.word_count = if info.keyword.is_empty() {
            0
        } else {
            info.keyword.split(' ').count()
        };
        for child in &mut self.clauses {
            child.init();
        }
    }

    pub fn keyword_text(&self) -> &str {
        self.keyword_text
    }

    pub fn first_word(&self) -> &str {
        self.first_word
    }

    pub fn multi_word(&self) -> bool {
        self.multi_word
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    /// Words of the keyword, for multi-word matching.
    pub fn keyword_words(&self) -> impl Iterator<Item = &'static str> {
        self.keyword_text.split(' ').filter(|w| !w.is_empty())
    }
}

/// A named, declarative grammar: a set of top-level statement keywords,
/// each expanding into an ordered clause list. Immutable after `init()`;
/// the built-in dialects are process-wide read-only singletons safe to
/// share across any number of lexer instances.
#[derive(Debug, Clone)]
pub struct Dialect {
    pub name: &'static str,
    pub statements: Vec<Clause>,
    pub config: LexerConfig,
}

impl Dialect {
    pub fn new(name: &'static str, statements: Vec<Clause>, config: LexerConfig) -> Self {
        let mut d = Self {
            name,
            statements,
            config,
        };
        d.init();
        d
    }

    /// Recompute derived clause metadata. Idempotent; called by `new`.
    pub fn init(&mut self) {
        for stmt in &mut self.statements {
            stmt.init();
        }
    }

    /// Find the top-level statement grammar whose leading keyword matches
    /// `word` (already a bare word, compared case-insensitively). A
    /// `TokenType::Nil` statement is a wildcard and matches anything.
    pub fn statement_for_word(&self, word: &str) -> Option<&Clause> {
        for stmt in &self.statements {
            if stmt.keyword == TokenType::Nil {
                return Some(stmt);
            }
            if !stmt.first_word().is_empty() && word.eq_ignore_ascii_case(stmt.first_word()) {
                return Some(stmt);
            }
        }
        None
    }
}

// ---- Built-in grammars ----

/// The SELECT clause list. `nested` grammars are used as sub-select
/// children and carry no children of their own; deeper nesting resolves
/// through the dialect's top-level statement table at lex time.
fn select_clauses(nested: bool) -> Vec<Clause> {
    let mut from = Clause::new(TokenType::From, Some(LEX_TABLE_REFERENCES))
        .optional()
        .repeat();
    let mut where_ = Clause::new(TokenType::Where, Some(LEX_CONDITIONAL_CLAUSE)).optional();
    if !nested {
        from = from.children(select_clauses(true));
        where_ = where_.children(select_clauses(true));
    }
    vec![
        Clause::new(TokenType::Select, Some(LEX_COLUMNS)),
        Clause::new(TokenType::Into, Some(LEX_IDENTIFIER)).optional(),
        from,
        where_,
        Clause::new(TokenType::GroupBy, Some(LEX_COLUMNS)).optional(),
        Clause::new(TokenType::Having, Some(LEX_CONDITIONAL_CLAUSE)).optional(),
        Clause::new(TokenType::OrderBy, Some(LEX_ORDER_BY_COLUMN)).optional(),
        Clause::new(TokenType::Limit, Some(LEX_NUMBER)).optional(),
        Clause::new(TokenType::With, Some(LEX_COLUMNS)).optional(),
        Clause::new(TokenType::Alias, Some(LEX_IDENTIFIER)).optional(),
    ]
}

fn insert_clauses(keyword: TokenType) -> Vec<Clause> {
    vec![
        Clause::new(keyword, None),
        Clause::new(TokenType::Into, Some(LEX_COLUMNS)),
        Clause::new(TokenType::Values, Some(LEX_COLUMNS)).optional(),
    ]
}

fn update_clauses() -> Vec<Clause> {
    vec![
        Clause::new(TokenType::Update, Some(LEX_IDENTIFIER)),
        Clause::new(TokenType::Set, Some(LEX_COLUMNS)),
        Clause::new(TokenType::Where, Some(LEX_CONDITIONAL_CLAUSE)).optional(),
        Clause::new(TokenType::Limit, Some(LEX_NUMBER)).optional(),
        Clause::new(TokenType::With, Some(LEX_COLUMNS)).optional(),
    ]
}

fn delete_clauses() -> Vec<Clause> {
    vec![
        Clause::new(TokenType::Delete, None),
        Clause::new(TokenType::From, Some(LEX_IDENTIFIER)),
        Clause::new(TokenType::Where, Some(LEX_CONDITIONAL_CLAUSE)).optional(),
        Clause::new(TokenType::Limit, Some(LEX_NUMBER)).optional(),
    ]
}

fn alter_clauses() -> Vec<Clause> {
    vec![
        Clause::new(TokenType::Alter, None),
        Clause::new(TokenType::Table, Some(LEX_IDENTIFIER)),
        Clause::new(TokenType::Change, Some(LEX_DDL_COLUMN))
            .optional()
            .repeat(),
    ]
}

fn describe_clauses(keyword: TokenType) -> Vec<Clause> {
    vec![Clause::new(keyword, Some(LEX_COLUMNS))]
}

fn sql_statements() -> Vec<Clause> {
    vec![
        Clause::new(TokenType::Select, None).children(select_clauses(false)),
        Clause::new(TokenType::Insert, None).children(insert_clauses(TokenType::Insert)),
        Clause::new(TokenType::Replace, None).children(insert_clauses(TokenType::Replace)),
        Clause::new(TokenType::Upsert, None).children(vec![
            Clause::new(TokenType::Upsert, None),
            Clause::new(TokenType::Into, Some(LEX_COLUMNS)),
            Clause::new(TokenType::Values, Some(LEX_COLUMNS)).optional(),
        ]),
        Clause::new(TokenType::Update, None).children(update_clauses()),
        Clause::new(TokenType::Delete, None).children(delete_clauses()),
        Clause::new(TokenType::Alter, None).children(alter_clauses()),
        Clause::new(TokenType::Describe, None).children(describe_clauses(TokenType::Describe)),
        Clause::new(TokenType::Desc, None).children(describe_clauses(TokenType::Desc)),
        Clause::new(TokenType::Explain, None).children(describe_clauses(TokenType::Explain)),
        Clause::new(TokenType::Show, None).children(vec![Clause::new(
            TokenType::Show,
            Some(LEX_COLUMNS),
        )]),
        Clause::new(TokenType::Prepare, None).children(vec![
            Clause::new(TokenType::Prepare, Some(LEX_IDENTIFIER)),
            Clause::new(TokenType::From, Some(LEX_VALUE)),
        ]),
        Clause::new(TokenType::Set, None).children(vec![Clause::new(
            TokenType::Set,
            Some(LEX_COLUMNS),
        )]),
        Clause::new(TokenType::Use, None).children(vec![Clause::new(
            TokenType::Use,
            Some(LEX_IDENTIFIER),
        )]),
    ]
}

fn filterql_statements() -> Vec<Clause> {
    vec![
        Clause::new(TokenType::Filter, None).children(vec![
            Clause::new(TokenType::Filter, Some(LEX_FILTER_CLAUSE)),
            Clause::new(TokenType::From, Some(LEX_IDENTIFIER)).optional(),
            Clause::new(TokenType::Limit, Some(LEX_NUMBER)).optional(),
            Clause::new(TokenType::With, Some(LEX_COLUMNS)).optional(),
            Clause::new(TokenType::Alias, Some(LEX_IDENTIFIER)).optional(),
        ]),
        Clause::new(TokenType::Select, None).children(vec![
            Clause::new(TokenType::Select, Some(LEX_COLUMNS)),
            Clause::new(TokenType::From, Some(LEX_IDENTIFIER)).optional(),
            Clause::new(TokenType::Where, Some(LEX_CONDITIONAL_CLAUSE)).optional(),
            Clause::new(TokenType::Filter, Some(LEX_FILTER_CLAUSE)).optional(),
            Clause::new(TokenType::Limit, Some(LEX_NUMBER)).optional(),
            Clause::new(TokenType::With, Some(LEX_COLUMNS)).optional(),
            Clause::new(TokenType::Alias, Some(LEX_IDENTIFIER)).optional(),
        ]),
    ]
}

fn wildcard_statement(entry: StateFn) -> Vec<Clause> {
    vec![Clause::new(TokenType::Nil, None)
        .children(vec![Clause::new(TokenType::Nil, Some(entry))])]
}

/// SQL dialect: SELECT, INSERT, UPDATE, UPSERT, REPLACE, DELETE, ALTER,
/// DESCRIBE/DESC/EXPLAIN, SHOW, PREPARE, SET, USE.
pub static SQL_DIALECT: LazyLock<Dialect> =
    LazyLock::new(|| Dialect::new("sql", sql_statements(), LexerConfig::default()));

/// FilterQL dialect: `FILTER <bool-expr>` and `SELECT ... WHERE|FILTER ...`.
pub static FILTERQL_DIALECT: LazyLock<Dialect> =
    LazyLock::new(|| Dialect::new("filterql", filterql_statements(), LexerConfig::default()));

/// Bare expression dialect, e.g. `eq(tolower(item), "buy")`.
pub static EXPRESSION_DIALECT: LazyLock<Dialect> = LazyLock::new(|| {
    Dialect::new(
        "expression",
        wildcard_statement(LEX_EXPRESSION),
        LexerConfig {
            identity_quoting: b"`",
            ..LexerConfig::default()
        },
    )
});

/// Logical expression dialect, e.g. `4 + 5 > 9 AND tolower(x) == "y"`.
pub static LOGICAL_DIALECT: LazyLock<Dialect> = LazyLock::new(|| {
    Dialect::new(
        "logical",
        wildcard_statement(LEX_LOGICAL_EXPRESSION),
        LexerConfig {
            identity_quoting: b"`",
            ..LexerConfig::default()
        },
    )
});

/// JSON dialect: `{ }`, `[ ]`, `:`, `,`, strings, numbers, booleans.
pub static JSON_DIALECT: LazyLock<Dialect> = LazyLock::new(|| {
    Dialect::new(
        "json",
        wildcard_statement(LEX_JSON_VALUE),
        LexerConfig {
            supports_duration: false,
            identity_quoting: b"",
            identifier_extra: b"",
        },
    )
});

/// Look up a built-in dialect by name.
pub fn dialect_from_name(name: &str) -> Result<&'static Dialect, QlexError> {
    match name.to_ascii_lowercase().as_str() {
        "sql" => Ok(&SQL_DIALECT),
        "filterql" => Ok(&FILTERQL_DIALECT),
        "expression" => Ok(&EXPRESSION_DIALECT),
        "logical" => Ok(&LOGICAL_DIALECT),
        "json" => Ok(&JSON_DIALECT),
        _ => Err(QlexError::UnknownDialect(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clause_init_derives_metadata() {
        let mut clause = Clause::new(TokenType::GroupBy, Some(LEX_COLUMNS));
        clause.init();
        assert_eq!(clause.keyword_text(), "group by");
        assert_eq!(clause.first_word(), "group");
        assert!(clause.multi_word());
        assert_eq!(clause.word_count(), 2);
    }

    #[test]
    fn test_init_is_idempotent() {
        let mut d = Dialect::new("sql", sql_statements(), LexerConfig::default());
        let before = d.statements[0].keyword_text().to_string();
        d.init();
        d.init();
        assert_eq!(d.statements[0].keyword_text(), before);
    }

    #[test]
    fn test_statement_dispatch_by_word() {
        let d = &*SQL_DIALECT;
        assert_eq!(
            d.statement_for_word("SELECT").map(|s| s.keyword),
            Some(TokenType::Select)
        );
        assert_eq!(
            d.statement_for_word("delete").map(|s| s.keyword),
            Some(TokenType::Delete)
        );
        assert!(d.statement_for_word("frobnicate").is_none());
    }

    #[test]
    fn test_wildcard_statement_matches_anything() {
        let d = &*EXPRESSION_DIALECT;
        assert!(d.statement_for_word("whatever").is_some());
    }

    #[test]
    fn test_sub_select_children() {
        let d = &*SQL_DIALECT;
        let select = d.statement_for_word("select").unwrap();
        let from = select
            .clauses
            .iter()
            .find(|c| c.keyword == TokenType::From)
            .unwrap();
        assert!(from.repeat);
        assert!(!from.clauses.is_empty());
        assert_eq!(from.clauses[0].keyword, TokenType::Select);
    }

    #[test]
    fn test_dialect_from_name() {
        assert!(dialect_from_name("sql").is_ok());
        assert!(dialect_from_name("FilterQL").is_ok());
        assert!(dialect_from_name("json").is_ok());
        assert!(dialect_from_name("cobol").is_err());
    }
}
