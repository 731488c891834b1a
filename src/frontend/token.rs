use std::collections::HashMap;

use enum_map::{enum_map, Enum, EnumMap};
use once_cell::sync::Lazy;

pub static KEYWORDS: Lazy<HashMap<&'static str, TokenKind>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("int", TokenKind::KwInt);
    m.insert("float", TokenKind::KwFloat);
    m.insert("string", TokenKind::KwString);
    m.insert("def", TokenKind::KwDef);
    m.insert("for", TokenKind::KwFor);
    m.insert("if", TokenKind::KwIf);
    m.insert("else", TokenKind::KwElse);
    m.insert("print", TokenKind::KwPrint);
    m.insert("read", TokenKind::KwRead);
    m.insert("return", TokenKind::KwReturn);
    m.insert("break", TokenKind::KwBreak);
    m.insert("new", TokenKind::KwNew);
    m.insert("null", TokenKind::KwNull);
    m
});

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Enum)]
pub enum TokenKind {
    /// an identifier
    Ident,
    /// [0-9]+
    IntConst,
    /// [0-9]+ '.' [0-9]*
    FloatConst,
    /// a " delimited string; the lexeme excludes the quotes
    StrConst,
    /// int
    KwInt,
    /// float
    KwFloat,
    /// string
    KwString,
    /// def
    KwDef,
    /// for
    KwFor,
    /// if
    KwIf,
    /// else
    KwElse,
    /// print
    KwPrint,
    /// read
    KwRead,
    /// return
    KwReturn,
    /// break
    KwBreak,
    /// new
    KwNew,
    /// null
    KwNull,
    /// +
    Plus,
    /// -
    Dash,
    /// *
    Star,
    /// /
    Slash,
    /// %
    Percent,
    /// <
    Lt,
    /// >
    Gt,
    /// <=
    LtEq,
    /// >=
    GtEq,
    /// ==
    EqEq,
    /// !=
    BangEq,
    /// =
    Eq,
    /// ,
    Comma,
    /// ;
    Semi,
    /// (
    LParen,
    /// )
    RParen,
    /// {
    LBrace,
    /// }
    RBrace,
    /// [
    LBracket,
    /// ]
    RBracket,
    /// end of input
    Eof,
    /// a lexical error; the lexeme holds the message
    Error,
}

impl TokenKind {
    /// Human-readable terminal name, used by diagnostics and the token dump.
    pub fn name(self) -> &'static str {
        static NAMES: Lazy<EnumMap<TokenKind, &'static str>> = Lazy::new(|| {
            enum_map! {
                TokenKind::Ident => "identifier",
                TokenKind::IntConst => "integer literal",
                TokenKind::FloatConst => "float literal",
                TokenKind::StrConst => "string literal",
                TokenKind::KwInt => "'int'",
                TokenKind::KwFloat => "'float'",
                TokenKind::KwString => "'string'",
                TokenKind::KwDef => "'def'",
                TokenKind::KwFor => "'for'",
                TokenKind::KwIf => "'if'",
                TokenKind::KwElse => "'else'",
                TokenKind::KwPrint => "'print'",
                TokenKind::KwRead => "'read'",
                TokenKind::KwReturn => "'return'",
                TokenKind::KwBreak => "'break'",
                TokenKind::KwNew => "'new'",
                TokenKind::KwNull => "'null'",
                TokenKind::Plus => "'+'",
                TokenKind::Dash => "'-'",
                TokenKind::Star => "'*'",
                TokenKind::Slash => "'/'",
                TokenKind::Percent => "'%'",
                TokenKind::Lt => "'<'",
                TokenKind::Gt => "'>'",
                TokenKind::LtEq => "'<='",
                TokenKind::GtEq => "'>='",
                TokenKind::EqEq => "'=='",
                TokenKind::BangEq => "'!='",
                TokenKind::Eq => "'='",
                TokenKind::Comma => "','",
                TokenKind::Semi => "';'",
                TokenKind::LParen => "'('",
                TokenKind::RParen => "')'",
                TokenKind::LBrace => "'{'",
                TokenKind::RBrace => "'}'",
                TokenKind::LBracket => "'['",
                TokenKind::RBracket => "']'",
                TokenKind::Eof => "end of file",
                TokenKind::Error => "lexical error",
            }
        });

        NAMES[self]
    }
}

#[derive(Clone, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: u32,
    pub column: u32,
}

impl Token {
    pub fn eof(line: u32, column: u32) -> Token {
        Token {
            kind: TokenKind::Eof,
            lexeme: String::new(),
            line,
            column,
        }
    }
}
