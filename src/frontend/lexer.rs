use super::symbols::SymbolTable;
use super::token::{Token, TokenKind, KEYWORDS};

/// Byte-driven scanner. Plain identifier tokens record an occurrence in the
/// symbol table as they are scanned; during scanning the table has a single
/// frame, so every occurrence lands in the global frame.
pub struct Lexer<'input> {
    src: &'input [u8],
    index: usize,
    line: u32,
    column: u32,
    symbols: SymbolTable,
}

impl<'input> Lexer<'input> {
    pub fn new(input: &'input str) -> Self {
        Lexer {
            src: input.as_bytes(),
            index: 0,
            line: 1,
            column: 1,
            symbols: SymbolTable::new(),
        }
    }

    pub fn into_symbols(self) -> SymbolTable {
        self.symbols
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.index).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let b = self.peek()?;
        if b == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.index += 1;
        Some(b)
    }

    fn token(&self, kind: TokenKind, lexeme: impl Into<String>, line: u32, column: u32) -> Token {
        Token {
            kind,
            lexeme: lexeme.into(),
            line,
            column,
        }
    }

    fn number(&mut self, line: u32, column: u32) -> Token {
        let start = self.index;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.advance();
        }

        let mut kind = TokenKind::IntConst;
        if self.peek() == Some(b'.') {
            kind = TokenKind::FloatConst;
            self.advance();
            while self.peek().is_some_and(|b| b.is_ascii_digit()) {
                self.advance();
            }
        }

        let lexeme = String::from_utf8_lossy(&self.src[start..self.index]).into_owned();
        self.token(kind, lexeme, line, column)
    }

    fn identifier(&mut self, line: u32, column: u32) -> Token {
        let start = self.index;
        while self
            .peek()
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_')
        {
            self.advance();
        }

        let lexeme = String::from_utf8_lossy(&self.src[start..self.index]).into_owned();
        if let Some(&kind) = KEYWORDS.get(lexeme.as_str()) {
            return self.token(kind, lexeme, line, column);
        }

        self.symbols.add_occurrence(&lexeme, line, column);
        self.token(TokenKind::Ident, lexeme, line, column)
    }

    fn string_literal(&mut self, line: u32, column: u32) -> Token {
        self.advance(); // opening quote
        let start = self.index;
        while self.peek().is_some_and(|b| b != b'"') {
            self.advance();
        }

        if self.peek() == Some(b'"') {
            let lexeme = String::from_utf8_lossy(&self.src[start..self.index]).into_owned();
            self.advance(); // closing quote
            return self.token(TokenKind::StrConst, lexeme, line, column);
        }

        self.token(TokenKind::Error, "unterminated string", line, column)
    }

    fn single(&mut self, kind: TokenKind, lexeme: &str, line: u32, column: u32) -> Token {
        self.advance();
        self.token(kind, lexeme, line, column)
    }

    /// Consumes one character and, if the next one is `=`, that one too.
    fn maybe_eq(
        &mut self,
        single: TokenKind,
        single_lexeme: &str,
        double: TokenKind,
        double_lexeme: &str,
        line: u32,
        column: u32,
    ) -> Token {
        self.advance();
        if self.peek() == Some(b'=') {
            self.advance();
            self.token(double, double_lexeme, line, column)
        } else {
            self.token(single, single_lexeme, line, column)
        }
    }

    pub fn next_token(&mut self) -> Token {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.advance();
        }

        let (line, column) = (self.line, self.column);
        let Some(b) = self.peek() else {
            return Token::eof(line, column);
        };

        use TokenKind as Tk;
        match b {
            b'0'..=b'9' => self.number(line, column),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.identifier(line, column),
            b'"' => self.string_literal(line, column),
            b'+' => self.single(Tk::Plus, "+", line, column),
            b'-' => self.single(Tk::Dash, "-", line, column),
            b'*' => self.single(Tk::Star, "*", line, column),
            b'/' => self.single(Tk::Slash, "/", line, column),
            b'%' => self.single(Tk::Percent, "%", line, column),
            b'(' => self.single(Tk::LParen, "(", line, column),
            b')' => self.single(Tk::RParen, ")", line, column),
            b'{' => self.single(Tk::LBrace, "{", line, column),
            b'}' => self.single(Tk::RBrace, "}", line, column),
            b'[' => self.single(Tk::LBracket, "[", line, column),
            b']' => self.single(Tk::RBracket, "]", line, column),
            b',' => self.single(Tk::Comma, ",", line, column),
            b';' => self.single(Tk::Semi, ";", line, column),
            b'=' => self.maybe_eq(Tk::Eq, "=", Tk::EqEq, "==", line, column),
            b'<' => self.maybe_eq(Tk::Lt, "<", Tk::LtEq, "<=", line, column),
            b'>' => self.maybe_eq(Tk::Gt, ">", Tk::GtEq, ">=", line, column),
            b'!' => {
                self.advance();
                if self.peek() == Some(b'=') {
                    self.advance();
                    self.token(Tk::BangEq, "!=", line, column)
                } else {
                    self.token(Tk::Error, "unexpected '!'", line, column)
                }
            }
            _ => {
                self.advance();
                self.token(
                    Tk::Error,
                    format!("unexpected character '{}'", b as char),
                    line,
                    column,
                )
            }
        }
    }
}
