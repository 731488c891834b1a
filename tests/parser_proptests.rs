use proptest::prelude::*;

use ell::frontend::lexer::Lexer;
use ell::frontend::token::{Token, TokenKind};

fn lex_all(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let kind = token.kind;
        tokens.push(token);
        if matches!(kind, TokenKind::Eof | TokenKind::Error) {
            return tokens;
        }
    }
}

proptest! {
    #[test]
    fn doesnt_crash(s in "\\PC*") {
        let _ = ell::frontend::parse(&s);
    }

    /// Joining the lexemes back together with single spaces must preserve
    /// the token kind sequence.
    #[test]
    fn respaced_lexemes_keep_their_kinds(s in "\\PC*") {
        let tokens = lex_all(&s);
        if tokens.iter().any(|t| t.kind == TokenKind::Error) {
            return Ok(());
        }

        let rebuilt = tokens
            .iter()
            .filter(|t| t.kind != TokenKind::Eof)
            .map(|t| match t.kind {
                TokenKind::StrConst => format!("\"{}\"", t.lexeme),
                _ => t.lexeme.clone(),
            })
            .collect::<Vec<_>>()
            .join(" ");

        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        let again: Vec<TokenKind> = lex_all(&rebuilt).iter().map(|t| t.kind).collect();
        prop_assert_eq!(kinds, again);
    }
}
