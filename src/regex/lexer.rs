use std::str::Chars;

use super::{RegexError, RegexErrorKind, SPECIAL_CHARACTERS};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Character(char),
    Epsilon,
    Union,
    Star,
    LeftParen,
    RightParen,
    End,
}

/// A token together with the position of its first character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

pub(crate) struct Lexer<'a> {
    src: Chars<'a>,
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Lexer {
            src: src.chars(),
            position: 0,
        }
    }

    /// Scans the next token. Once the input is exhausted, [`TokenKind::End`] is returned forever.
    pub fn scan(&mut self) -> Result<Token, RegexError> {
        let position = self.position;
        let kind = match self.bump() {
            Some('\\') => match self.bump() {
                Some(c) if SPECIAL_CHARACTERS.contains(&c) => TokenKind::Character(c),
                Some(c) => {
                    return Err(RegexError::new(RegexErrorKind::UnknownEscape(c), position))
                }
                None => return Err(RegexError::new(RegexErrorKind::TrailingBackslash, position)),
            },
            Some('+') => TokenKind::Union,
            Some('*') => TokenKind::Star,
            Some('(') => TokenKind::LeftParen,
            Some(')') => TokenKind::RightParen,
            Some('$') => TokenKind::Epsilon,
            Some(c) => TokenKind::Character(c),
            None => TokenKind::End,
        };
        Ok(Token { kind, position })
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.src.next()?;
        self.position += 1;
        Some(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(src);
        let mut out = vec![];
        loop {
            let token = lexer.scan().unwrap();
            out.push(token.kind);
            if token.kind == TokenKind::End {
                return out;
            }
        }
    }

    #[test]
    fn scan() {
        assert_eq!(
            kinds("a+(b$)*"),
            vec![
                TokenKind::Character('a'),
                TokenKind::Union,
                TokenKind::LeftParen,
                TokenKind::Character('b'),
                TokenKind::Epsilon,
                TokenKind::RightParen,
                TokenKind::Star,
                TokenKind::End,
            ]
        );
        assert_eq!(kinds(""), vec![TokenKind::End]);
    }

    #[test]
    fn scan_with_escapes() {
        assert_eq!(
            kinds(r"\+\$\\"),
            vec![
                TokenKind::Character('+'),
                TokenKind::Character('$'),
                TokenKind::Character('\\'),
                TokenKind::End,
            ]
        );
        let mut lexer = Lexer::new(r"ab\x");
        lexer.scan().unwrap();
        lexer.scan().unwrap();
        assert_eq!(
            lexer.scan(),
            Err(RegexError::new(RegexErrorKind::UnknownEscape('x'), 2))
        );
        let mut lexer = Lexer::new("\\");
        assert_eq!(
            lexer.scan().unwrap_err().kind,
            RegexErrorKind::TrailingBackslash
        );
    }

    #[test]
    fn positions_count_characters() {
        let mut lexer = Lexer::new(r"ä\*b");
        assert_eq!(lexer.scan().unwrap().position, 0);
        assert_eq!(lexer.scan().unwrap().position, 1);
        assert_eq!(lexer.scan().unwrap().position, 3);
    }
}
