use compact_str::CompactString;
use serde::Serialize;

/// Position in the source string (byte offset).
pub type Pos = usize;

/// All token types emitted by the lexer. This is a closed set: the parser
/// and test harnesses depend on exact kinds and exact `value` substrings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenType {
    // Structural
    Nil,
    Error,
    Eof,
    Eos,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    Comma,
    Colon,

    // Literals
    Integer,
    Float,
    Bool,
    Value,
    ValueWithSingleQuote,
    Regex,
    Duration,

    // Comments
    Comment,
    CommentML,
    CommentSingleLine,
    CommentSlashes,
    CommentHash,

    // Operators
    Equal,
    EqualEqual,
    NE,
    GE,
    LE,
    GT,
    LT,
    Plus,
    Minus,
    Star,
    Divide,
    Modulus,
    And,
    Or,
    LogicAnd,
    LogicOr,
    Negate,
    In,
    Like,
    Between,

    // Statement and clause keywords
    Select,
    Insert,
    Update,
    Delete,
    Upsert,
    Replace,
    Alter,
    Describe,
    Desc,
    Explain,
    Show,
    Prepare,
    Set,
    Use,
    Filter,
    From,
    Where,
    Having,
    GroupBy,
    OrderBy,
    Limit,
    Into,
    Values,
    As,
    Alias,
    With,
    On,
    Join,
    Inner,
    Outer,
    Left,
    Right,
    Cross,
    Full,
    Table,
    Asc,
    Change,
    CharacterSet,
    Default,
    Unique,
    Key,

    // Value kinds
    Identity,
    UdfExpr,
}

/// Keyword metadata used for clause matching. `first_word` is the portion
/// of `keyword` up to the first space; `has_spaces` marks multi-word
/// keywords such as "group by" or "character set".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenInfo {
    pub keyword: &'static str,
    pub first_word: &'static str,
    pub has_spaces: bool,
}

impl TokenType {
    /// The canonical (lowercase) keyword for this token type, or "" for
    /// types that are not matched by word.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::LeftBracket => "[",
            Self::RightBracket => "]",
            Self::LeftBrace => "{",
            Self::RightBrace => "}",
            Self::Comma => ",",
            Self::Colon => ":",
            Self::Eos => ";",
            Self::Equal => "=",
            Self::EqualEqual => "==",
            Self::NE => "!=",
            Self::GE => ">=",
            Self::LE => "<=",
            Self::GT => ">",
            Self::LT => "<",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Divide => "/",
            Self::Modulus => "%",
            Self::And => "&&",
            Self::Or => "||",
            Self::LogicAnd => "and",
            Self::LogicOr => "or",
            Self::Negate => "not",
            Self::In => "in",
            Self::Like => "like",
            Self::Between => "between",
            Self::Comment => "/*",
            Self::CommentML => "/*",
            Self::CommentSingleLine => "--",
            Self::CommentSlashes => "//",
            Self::CommentHash => "#",
            Self::Select => "select",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Upsert => "upsert",
            Self::Replace => "replace",
            Self::Alter => "alter",
            Self::Describe => "describe",
            Self::Desc => "desc",
            Self::Explain => "explain",
            Self::Show => "show",
            Self::Prepare => "prepare",
            Self::Set => "set",
            Self::Use => "use",
            Self::Filter => "filter",
            Self::From => "from",
            Self::Where => "where",
            Self::Having => "having",
            Self::GroupBy => "group by",
            Self::OrderBy => "order by",
            Self::Limit => "limit",
            Self::Into => "into",
            Self::Values => "values",
            Self::As => "as",
            Self::Alias => "alias",
            Self::With => "with",
            Self::On => "on",
            Self::Join => "join",
            Self::Inner => "inner",
            Self::Outer => "outer",
            Self::Left => "left",
            Self::Right => "right",
            Self::Cross => "cross",
            Self::Full => "full",
            Self::Table => "table",
            Self::Asc => "asc",
            Self::Change => "change",
            Self::CharacterSet => "character set",
            Self::Default => "default",
            Self::Unique => "unique",
            Self::Key => "key",
            _ => "",
        }
    }

    /// Full keyword metadata for clause matching.
    pub fn info(self) -> TokenInfo {
        let keyword = self.keyword();
        let first_word = match keyword.find(' ') {
            Some(idx) => &keyword[..idx],
            None => keyword,
        };
        TokenInfo {
            keyword,
            first_word,
            has_spaces: keyword.contains(' '),
        }
    }

    pub fn is_comment(self) -> bool {
        matches!(
            self,
            Self::Comment
                | Self::CommentML
                | Self::CommentSingleLine
                | Self::CommentSlashes
                | Self::CommentHash
        )
    }

    /// Tokens that terminate a token stream.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Eof | Self::Eos | Self::Error)
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            Self::Integer
                | Self::Float
                | Self::Bool
                | Self::Value
                | Self::ValueWithSingleQuote
                | Self::Regex
                | Self::Duration
        )
    }

    pub fn is_operator(self) -> bool {
        matches!(
            self,
            Self::Equal
                | Self::EqualEqual
                | Self::NE
                | Self::GE
                | Self::LE
                | Self::GT
                | Self::LT
                | Self::Plus
                | Self::Minus
                | Self::Star
                | Self::Divide
                | Self::Modulus
                | Self::And
                | Self::Or
                | Self::LogicAnd
                | Self::LogicOr
                | Self::Negate
                | Self::In
                | Self::Like
                | Self::Between
        )
    }
}

/// An immutable token produced by the lexer. `value` is the exact matched
/// substring except for quoted strings and quoted identifiers, where the
/// surrounding quote characters are stripped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub token_type: TokenType,
    pub value: CompactString,
    pub position: Pos,
}

impl Token {
    pub fn new(token_type: TokenType, value: &str, position: Pos) -> Self {
        Self {
            token_type,
            value: CompactString::new(value),
            position,
        }
    }

    pub fn eof(position: Pos) -> Self {
        Self::new(TokenType::Eof, "", position)
    }
}
