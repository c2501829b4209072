use pretty_assertions::assert_eq;
use qlex::TokenType as T;
use qlex::{tokenize, Lexer, LexerConfig, Token, TokenType, LOGICAL_DIALECT, SQL_DIALECT};

/// Every token until (and including) the stream terminator.
fn lex_all(mut lexer: Lexer<'_>) -> Vec<Token> {
    let mut out = Vec::new();
    loop {
        let t = lexer.next_token();
        let terminal = t.token_type == T::Eof || t.token_type == T::Error;
        out.push(t);
        if terminal {
            return out;
        }
    }
}

fn kinds(tokens: &[Token]) -> Vec<TokenType> {
    tokens.iter().map(|t| t.token_type).collect()
}

fn values(tokens: &[Token]) -> Vec<&str> {
    tokens.iter().map(|t| t.value.as_str()).collect()
}

#[test]
fn test_select_where_in_sequence() {
    let toks =
        tokenize("SELECT x FROM p WHERE Name IN ('Blade', 'c w', 1) AND Name LIKE '%bob';", &SQL_DIALECT)
            .unwrap();
    assert_eq!(
        kinds(&toks),
        vec![
            T::Select,
            T::Identity,
            T::From,
            T::Identity,
            T::Where,
            T::Identity,
            T::In,
            T::LeftParen,
            T::Value,
            T::Comma,
            T::Value,
            T::Comma,
            T::Integer,
            T::RightParen,
            T::LogicAnd,
            T::Identity,
            T::Like,
            T::Value,
            T::Eos,
        ]
    );
    assert_eq!(
        values(&toks),
        vec![
            "SELECT", "x", "FROM", "p", "WHERE", "Name", "IN", "(", "Blade", ",", "c w", ",",
            "1", ")", "AND", "Name", "LIKE", "%bob", ";",
        ]
    );
}

#[test]
fn test_nested_udf_sequence() {
    let toks = tokenize(
        "SELECT REPLACE(LOWER(Name),'p','x'), RIGHT(email,10) FROM users",
        &SQL_DIALECT,
    )
    .unwrap();
    assert_eq!(
        kinds(&toks),
        vec![
            T::Select,
            T::UdfExpr,
            T::LeftParen,
            T::UdfExpr,
            T::LeftParen,
            T::Identity,
            T::RightParen,
            T::Comma,
            T::Value,
            T::Comma,
            T::Value,
            T::RightParen,
            T::Comma,
            T::UdfExpr,
            T::LeftParen,
            T::Identity,
            T::Comma,
            T::Integer,
            T::RightParen,
            T::From,
            T::Identity,
        ]
    );
    assert_eq!(toks[1].value, "REPLACE");
    assert_eq!(toks[3].value, "LOWER");
    assert_eq!(toks[13].value, "RIGHT");
}

#[test]
fn test_keyword_words_inside_identifiers() {
    // Words that merely start with a keyword are ordinary identities.
    let toks = tokenize("SELECT notes, fromage FROM t", &SQL_DIALECT).unwrap();
    assert_eq!(
        kinds(&toks),
        vec![
            T::Select,
            T::Identity,
            T::Comma,
            T::Identity,
            T::From,
            T::Identity,
        ]
    );
    assert_eq!(toks[1].value, "notes");
    assert_eq!(toks[3].value, "fromage");
}

#[test]
fn test_full_select_clause_walk() {
    let toks = tokenize(
        "SELECT a, COUNT(*) FROM t GROUP BY a HAVING COUNT(*) > 2 ORDER BY a DESC LIMIT 10;",
        &SQL_DIALECT,
    )
    .unwrap();
    assert_eq!(
        kinds(&toks),
        vec![
            T::Select,
            T::Identity,
            T::Comma,
            T::UdfExpr,
            T::LeftParen,
            T::Star,
            T::RightParen,
            T::From,
            T::Identity,
            T::GroupBy,
            T::Identity,
            T::Having,
            T::UdfExpr,
            T::LeftParen,
            T::Star,
            T::RightParen,
            T::GT,
            T::Integer,
            T::OrderBy,
            T::Identity,
            T::Desc,
            T::Limit,
            T::Integer,
            T::Eos,
        ]
    );
    // Multi-word clause keywords lex as one token with the exact text.
    assert_eq!(toks[9].value, "GROUP BY");
    assert_eq!(toks[18].value, "ORDER BY");
}

#[test]
fn test_insert_values() {
    let toks = tokenize(
        "INSERT INTO users (name, email) VALUES ('x', 'y');",
        &SQL_DIALECT,
    )
    .unwrap();
    assert_eq!(
        kinds(&toks),
        vec![
            T::Insert,
            T::Into,
            T::Identity,
            T::LeftParen,
            T::Identity,
            T::Comma,
            T::Identity,
            T::RightParen,
            T::Values,
            T::LeftParen,
            T::Value,
            T::Comma,
            T::Value,
            T::RightParen,
            T::Eos,
        ]
    );
}

#[test]
fn test_update_and_delete() {
    let toks = tokenize("UPDATE users SET name = 'bob' WHERE id = 7", &SQL_DIALECT).unwrap();
    assert_eq!(
        kinds(&toks),
        vec![
            T::Update,
            T::Identity,
            T::Set,
            T::Identity,
            T::Equal,
            T::Value,
            T::Where,
            T::Identity,
            T::Equal,
            T::Integer,
        ]
    );

    let toks = tokenize("DELETE FROM users WHERE id = 7 LIMIT 1", &SQL_DIALECT).unwrap();
    assert_eq!(
        kinds(&toks),
        vec![
            T::Delete,
            T::From,
            T::Identity,
            T::Where,
            T::Identity,
            T::Equal,
            T::Integer,
            T::Limit,
            T::Integer,
        ]
    );
}

#[test]
fn test_alter_table_change() {
    let toks = tokenize(
        "ALTER TABLE users CHANGE col1 TEXT CHARACTER SET utf8, CHANGE col2 INT DEFAULT 0;",
        &SQL_DIALECT,
    )
    .unwrap();
    assert_eq!(
        kinds(&toks),
        vec![
            T::Alter,
            T::Table,
            T::Identity,
            T::Change,
            T::Identity,
            T::Identity,
            T::CharacterSet,
            T::Identity,
            T::Comma,
            T::Change,
            T::Identity,
            T::Identity,
            T::Default,
            T::Integer,
            T::Eos,
        ]
    );
    assert_eq!(toks[6].value, "CHARACTER SET");
}

#[test]
fn test_subselect_in_from() {
    let toks = tokenize("SELECT a FROM (SELECT b FROM c) AS t;", &SQL_DIALECT).unwrap();
    assert_eq!(
        kinds(&toks),
        vec![
            T::Select,
            T::Identity,
            T::From,
            T::LeftParen,
            T::Select,
            T::Identity,
            T::From,
            T::Identity,
            T::RightParen,
            T::As,
            T::Identity,
            T::Eos,
        ]
    );
}

#[test]
fn test_subselect_nesting_past_declared_children() {
    // The second-level IN falls back to the dialect's top-level SELECT
    // grammar, so nesting depth is not limited by the clause tables.
    let toks = tokenize(
        "SELECT a FROM t WHERE x IN (SELECT b FROM u WHERE y IN (SELECT c FROM v));",
        &SQL_DIALECT,
    )
    .unwrap();
    assert_eq!(
        kinds(&toks),
        vec![
            T::Select,
            T::Identity,
            T::From,
            T::Identity,
            T::Where,
            T::Identity,
            T::In,
            T::LeftParen,
            T::Select,
            T::Identity,
            T::From,
            T::Identity,
            T::Where,
            T::Identity,
            T::In,
            T::LeftParen,
            T::Select,
            T::Identity,
            T::From,
            T::Identity,
            T::RightParen,
            T::RightParen,
            T::Eos,
        ]
    );
}

#[test]
fn test_joins() {
    let toks = tokenize(
        "SELECT a FROM t1 INNER JOIN t2 ON t1.id = t2.id",
        &SQL_DIALECT,
    )
    .unwrap();
    assert_eq!(
        kinds(&toks),
        vec![
            T::Select,
            T::Identity,
            T::From,
            T::Identity,
            T::Inner,
            T::Join,
            T::Identity,
            T::On,
            T::Identity,
            T::Equal,
            T::Identity,
        ]
    );
    assert_eq!(toks[8].value, "t1.id");
}

#[test]
fn test_filterql_statement() {
    let toks = tokenize(
        "FILTER AND ( x > 5, NOT exists(y) ) FROM users ALIAS adults",
        &qlex::FILTERQL_DIALECT,
    )
    .unwrap();
    assert_eq!(
        kinds(&toks),
        vec![
            T::Filter,
            T::LogicAnd,
            T::LeftParen,
            T::Identity,
            T::GT,
            T::Integer,
            T::Comma,
            T::Negate,
            T::UdfExpr,
            T::LeftParen,
            T::Identity,
            T::RightParen,
            T::RightParen,
            T::From,
            T::Identity,
            T::Alias,
            T::Identity,
        ]
    );
}

#[test]
fn test_multi_statement_eos() {
    let toks = tokenize("SELECT 1; SELECT 2;", &SQL_DIALECT).unwrap();
    assert_eq!(
        kinds(&toks),
        vec![
            T::Select,
            T::Integer,
            T::Eos,
            T::Select,
            T::Integer,
            T::Eos,
        ]
    );
}

#[test]
fn test_comment_transparency() {
    let plain = tokenize("SELECT x FROM p WHERE y = 5", &SQL_DIALECT).unwrap();
    let commented = tokenize(
        "SELECT x -- pick x\nFROM p /* the table */ WHERE // really\n y = # end\n 5",
        &SQL_DIALECT,
    )
    .unwrap();
    let stripped: Vec<&Token> = commented
        .iter()
        .filter(|t| !t.token_type.is_comment())
        .collect();
    assert_eq!(
        kinds(&plain),
        stripped.iter().map(|t| t.token_type).collect::<Vec<_>>()
    );
    assert_eq!(
        values(&plain),
        stripped.iter().map(|t| t.value.as_str()).collect::<Vec<_>>()
    );
    // All four comment styles were seen.
    let comment_kinds: Vec<TokenType> = commented
        .iter()
        .filter(|t| t.token_type.is_comment())
        .map(|t| t.token_type)
        .collect();
    assert_eq!(
        comment_kinds,
        vec![
            T::CommentSingleLine,
            T::Comment,
            T::CommentSlashes,
            T::CommentHash,
        ]
    );
}

#[test]
fn test_filterql_comments_between_nested_terms() {
    let plain = tokenize(
        "FILTER AND ( x > 5, NOT exists(y) ) FROM users",
        &qlex::FILTERQL_DIALECT,
    )
    .unwrap();
    let commented = tokenize(
        "FILTER AND ( -- leading\n x > 5, /* mid */ NOT exists(y) # trailing\n ) FROM users",
        &qlex::FILTERQL_DIALECT,
    )
    .unwrap();
    let stripped: Vec<(TokenType, &str)> = commented
        .iter()
        .filter(|t| !t.token_type.is_comment())
        .map(|t| (t.token_type, t.value.as_str()))
        .collect();
    let expected: Vec<(TokenType, &str)> = plain
        .iter()
        .map(|t| (t.token_type, t.value.as_str()))
        .collect();
    assert_eq!(stripped, expected);
    assert_eq!(
        commented
            .iter()
            .filter(|t| t.token_type.is_comment())
            .map(|t| t.token_type)
            .collect::<Vec<_>>(),
        vec![T::CommentSingleLine, T::Comment, T::CommentHash]
    );
}

#[test]
fn test_excessive_paren_nesting_is_bounded() {
    let input = "(".repeat(500);
    let toks = lex_all(Lexer::logical(&input));
    let last = toks.last().unwrap();
    assert_eq!(last.token_type, T::Error);
    assert!(toks.len() < 200, "stream should stop at the depth bound");
}

#[test]
fn test_excessive_json_nesting_is_bounded() {
    let input = "[".repeat(500);
    let toks = lex_all(Lexer::json(&input));
    assert_eq!(toks.last().unwrap().token_type, T::Error);
}

#[test]
fn test_determinism() {
    let input = "SELECT a, todate(b) FROM t WHERE x IN (1, 2, 3) LIMIT 9;";
    let a = tokenize(input, &SQL_DIALECT).unwrap();
    let b = tokenize(input, &SQL_DIALECT).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_position_monotonicity() {
    let toks = lex_all(Lexer::sql(
        "SELECT a, 'v', 7d /* c */ FROM t WHERE x LIKE '%y%';",
    ));
    let mut last = 0;
    for t in &toks {
        assert!(
            t.position >= last,
            "position went backwards at {:?} ({} < {})",
            t.token_type,
            t.position,
            last
        );
        last = t.position;
    }
}

#[test]
fn test_errors_are_terminal_tokens() {
    for input in ["SELECT 042", "SELECT 'unterminated", "%%%", "SELECT a FROM t )"] {
        let toks = lex_all(Lexer::sql(input));
        let errors = toks
            .iter()
            .filter(|t| t.token_type == T::Error)
            .count();
        assert_eq!(errors, 1, "{input} should yield exactly one error token");
        assert_eq!(toks.last().unwrap().token_type, T::Error);
    }
}

#[test]
fn test_eof_after_error_is_idempotent() {
    let mut l = Lexer::sql("SELECT 042");
    while l.next_token().token_type != T::Error {}
    assert_eq!(l.next_token().token_type, T::Eof);
    assert_eq!(l.next_token().token_type, T::Eof);
}

#[test]
fn test_duration_toggle() {
    let on = tokenize("SELECT 7d", &SQL_DIALECT).unwrap();
    assert_eq!(on[1].token_type, T::Duration);

    let cfg = LexerConfig {
        supports_duration: false,
        ..LexerConfig::default()
    };
    let mut l = Lexer::with_config("7d", &LOGICAL_DIALECT, cfg);
    let mut last = l.next_token();
    while !last.token_type.is_terminal() {
        last = l.next_token();
    }
    assert_eq!(last.token_type, T::Error);
}

#[test]
fn test_identifier_extra_characters() {
    let cfg = LexerConfig {
        identifier_extra: b"/",
        ..LexerConfig::default()
    };
    let toks = lex_all(Lexer::with_config("SELECT a FROM web/logs", &SQL_DIALECT, cfg));
    assert_eq!(
        kinds(&toks),
        vec![T::Select, T::Identity, T::From, T::Identity, T::Eof]
    );
    assert_eq!(toks[3].value, "web/logs");
}

#[test]
fn test_quoted_identities() {
    let toks = tokenize("SELECT `the name`, [First Name] FROM t", &SQL_DIALECT).unwrap();
    assert_eq!(toks[1].token_type, T::Identity);
    assert_eq!(toks[1].value, "the name");
    assert_eq!(toks[3].token_type, T::Identity);
    assert_eq!(toks[3].value, "First Name");
}

#[test]
fn test_logical_expression_dialect() {
    let toks = tokenize("4 + 5 > 9 AND tolower(x) == \"y\"", &LOGICAL_DIALECT).unwrap();
    assert_eq!(
        kinds(&toks),
        vec![
            T::Integer,
            T::Plus,
            T::Integer,
            T::GT,
            T::Integer,
            T::LogicAnd,
            T::UdfExpr,
            T::LeftParen,
            T::Identity,
            T::RightParen,
            T::EqualEqual,
            T::Value,
        ]
    );
}

#[test]
fn test_json_dialect_nested() {
    let toks = tokenize(
        r#"{"k": {"nested": [1, -2.5, "s"]}, "ok": false}"#,
        &qlex::JSON_DIALECT,
    )
    .unwrap();
    assert_eq!(
        kinds(&toks),
        vec![
            T::LeftBrace,
            T::Value,
            T::Colon,
            T::LeftBrace,
            T::Value,
            T::Colon,
            T::LeftBracket,
            T::Integer,
            T::Comma,
            T::Float,
            T::Comma,
            T::Value,
            T::RightBracket,
            T::RightBrace,
            T::Comma,
            T::Value,
            T::Colon,
            T::Bool,
            T::RightBrace,
        ]
    );
}

#[test]
fn test_describe_show_use() {
    let toks = tokenize("DESCRIBE users", &SQL_DIALECT).unwrap();
    assert_eq!(kinds(&toks), vec![T::Describe, T::Identity]);

    let toks = tokenize("SHOW databases", &SQL_DIALECT).unwrap();
    assert_eq!(kinds(&toks), vec![T::Show, T::Identity]);

    let toks = tokenize("USE mydb", &SQL_DIALECT).unwrap();
    assert_eq!(kinds(&toks), vec![T::Use, T::Identity]);
}
