use codespan::Span;

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // literals
    IntLiteral { value: u64, overflow: bool },
    FloatLiteral(f64),
    CharLiteral(u8),
    StringLiteral { value: Vec<u8>, is_c: bool },

    // names
    Identifier(String),
    // @name
    Builtin(String),
    // #name
    Directive(String),

    // keywords
    KwFn,
    KwVar,
    KwConst,
    KwStruct,
    KwEnum,
    KwError,
    KwImport,
    KwCImport,
    KwExtern,
    KwExport,
    KwPub,
    KwReturn,
    KwIf,
    KwElse,
    KwWhile,
    KwFor,
    KwSwitch,
    KwBreak,
    KwContinue,
    KwGoto,
    KwTrue,
    KwFalse,
    KwNull,
    KwUndefined,
    KwNoalias,

    // operators
    Plus,          // +
    PlusPlus,      // ++
    PlusEq,        // +=
    Minus,         // -
    MinusEq,       // -=
    Star,          // *
    StarEq,        // *=
    Slash,         // /
    SlashEq,       // /=
    Percent,       // %
    PercentPercent, // %%
    PercentEq,     // %=
    Eq,            // =
    EqEq,          // ==
    FatArrow,      // =>
    Bang,          // !
    BangEq,        // !=
    Lt,            // <
    LtEq,          // <=
    Shl,           // <<
    ShlEq,         // <<=
    Gt,            // >
    GtEq,          // >=
    Shr,           // >>
    ShrEq,         // >>=
    Amp,           // &
    AmpAmp,        // &&
    AmpEq,         // &=
    AmpAmpEq,      // &&=
    Pipe,          // |
    PipePipe,      // ||
    PipeEq,        // |=
    PipePipeEq,    // ||=
    Caret,         // ^
    CaretEq,       // ^=
    Tilde,         // ~
    Question,      // ?
    QuestionQuestion, // ??
    QuestionEq,    // ?=
    Arrow,         // ->
    Dot,           // .
    DotDot,        // ..
    Ellipsis,      // ...
    Comma,         // ,
    Semicolon,     // ;
    Colon,         // :

    // delimiters
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,

    Eof,
}

impl TokenKind {
    pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
        match s {
            "fn" => Some(TokenKind::KwFn),
            "var" => Some(TokenKind::KwVar),
            "const" => Some(TokenKind::KwConst),
            "struct" => Some(TokenKind::KwStruct),
            "enum" => Some(TokenKind::KwEnum),
            "error" => Some(TokenKind::KwError),
            "import" => Some(TokenKind::KwImport),
            "c_import" => Some(TokenKind::KwCImport),
            "extern" => Some(TokenKind::KwExtern),
            "export" => Some(TokenKind::KwExport),
            "pub" => Some(TokenKind::KwPub),
            "return" => Some(TokenKind::KwReturn),
            "if" => Some(TokenKind::KwIf),
            "else" => Some(TokenKind::KwElse),
            "while" => Some(TokenKind::KwWhile),
            "for" => Some(TokenKind::KwFor),
            "switch" => Some(TokenKind::KwSwitch),
            "break" => Some(TokenKind::KwBreak),
            "continue" => Some(TokenKind::KwContinue),
            "goto" => Some(TokenKind::KwGoto),
            "true" => Some(TokenKind::KwTrue),
            "false" => Some(TokenKind::KwFalse),
            "null" => Some(TokenKind::KwNull),
            "undefined" => Some(TokenKind::KwUndefined),
            "noalias" => Some(TokenKind::KwNoalias),
            _ => None,
        }
    }

    /// token text for syntax error messages
    pub fn describe(&self) -> String {
        match self {
            TokenKind::IntLiteral { .. } => "integer literal".to_string(),
            TokenKind::FloatLiteral(_) => "float literal".to_string(),
            TokenKind::CharLiteral(_) => "char literal".to_string(),
            TokenKind::StringLiteral { .. } => "string literal".to_string(),
            TokenKind::Identifier(name) => format!("'{}'", name),
            TokenKind::Builtin(name) => format!("'@{}'", name),
            TokenKind::Directive(name) => format!("'#{}'", name),
            TokenKind::Eof => "end of file".to_string(),
            other => format!("'{}'", other.text()),
        }
    }

    fn text(&self) -> &'static str {
        match self {
            TokenKind::KwFn => "fn",
            TokenKind::KwVar => "var",
            TokenKind::KwConst => "const",
            TokenKind::KwStruct => "struct",
            TokenKind::KwEnum => "enum",
            TokenKind::KwError => "error",
            TokenKind::KwImport => "import",
            TokenKind::KwCImport => "c_import",
            TokenKind::KwExtern => "extern",
            TokenKind::KwExport => "export",
            TokenKind::KwPub => "pub",
            TokenKind::KwReturn => "return",
            TokenKind::KwIf => "if",
            TokenKind::KwElse => "else",
            TokenKind::KwWhile => "while",
            TokenKind::KwFor => "for",
            TokenKind::KwSwitch => "switch",
            TokenKind::KwBreak => "break",
            TokenKind::KwContinue => "continue",
            TokenKind::KwGoto => "goto",
            TokenKind::KwTrue => "true",
            TokenKind::KwFalse => "false",
            TokenKind::KwNull => "null",
            TokenKind::KwUndefined => "undefined",
            TokenKind::KwNoalias => "noalias",
            TokenKind::Plus => "+",
            TokenKind::PlusPlus => "++",
            TokenKind::PlusEq => "+=",
            TokenKind::Minus => "-",
            TokenKind::MinusEq => "-=",
            TokenKind::Star => "*",
            TokenKind::StarEq => "*=",
            TokenKind::Slash => "/",
            TokenKind::SlashEq => "/=",
            TokenKind::Percent => "%",
            TokenKind::PercentPercent => "%%",
            TokenKind::PercentEq => "%=",
            TokenKind::Eq => "=",
            TokenKind::EqEq => "==",
            TokenKind::FatArrow => "=>",
            TokenKind::Bang => "!",
            TokenKind::BangEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Shl => "<<",
            TokenKind::ShlEq => "<<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::Shr => ">>",
            TokenKind::ShrEq => ">>=",
            TokenKind::Amp => "&",
            TokenKind::AmpAmp => "&&",
            TokenKind::AmpEq => "&=",
            TokenKind::AmpAmpEq => "&&=",
            TokenKind::Pipe => "|",
            TokenKind::PipePipe => "||",
            TokenKind::PipeEq => "|=",
            TokenKind::PipePipeEq => "||=",
            TokenKind::Caret => "^",
            TokenKind::CaretEq => "^=",
            TokenKind::Tilde => "~",
            TokenKind::Question => "?",
            TokenKind::QuestionQuestion => "??",
            TokenKind::QuestionEq => "?=",
            TokenKind::Arrow => "->",
            TokenKind::Dot => ".",
            TokenKind::DotDot => "..",
            TokenKind::Ellipsis => "...",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            _ => "",
        }
    }
}
