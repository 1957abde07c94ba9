use super::{
    lexer::{Lexer, Token, TokenKind},
    Regex, RegexError, RegexErrorKind, MAX_NESTING_DEPTH,
};

/// Parses `expression` into a [`Regex`].
///
/// Groups may be nested at most [`MAX_NESTING_DEPTH`] levels deep. Repeated stars like `a**`
/// are read as a single star.
///
/// ```
/// use automata_lab::prelude::*;
///
/// let regex = parse("a(b+$)*").unwrap();
/// assert_eq!(regex.to_string(), "a(b+$)*");
/// assert_eq!(parse("a(b").unwrap_err().kind, RegexErrorKind::UnclosedGroup);
/// ```
pub fn parse(expression: &str) -> Result<Regex, RegexError> {
    Parser::new(Lexer::new(expression))?.expression()
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    look: Token,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(mut lexer: Lexer<'a>) -> Result<Self, RegexError> {
        let look = lexer.scan()?;
        Ok(Parser {
            lexer,
            look,
            depth: 0,
        })
    }

    fn advance(&mut self) -> Result<(), RegexError> {
        self.look = self.lexer.scan()?;
        Ok(())
    }

    fn error(&self, kind: RegexErrorKind) -> RegexError {
        RegexError::new(kind, self.look.position)
    }

    /// <expression> ::= <union> End
    fn expression(&mut self) -> Result<Regex, RegexError> {
        let regex = self.union()?;
        match self.look.kind {
            TokenKind::End => Ok(regex),
            _ => Err(self.error(RegexErrorKind::UnmatchedClose)),
        }
    }

    /// <union> ::= <concat> ('+' <concat>)*
    fn union(&mut self) -> Result<Regex, RegexError> {
        let mut alternatives = vec![self.concat()?];
        while self.look.kind == TokenKind::Union {
            let operator = self.error(RegexErrorKind::DanglingOperator('+'));
            if alternatives.last().is_some_and(Vec::is_empty) {
                return Err(operator);
            }
            self.advance()?;
            let alternative = self.concat()?;
            if alternative.is_empty() {
                return Err(operator);
            }
            alternatives.push(alternative);
        }

        let mut alternatives: Vec<Regex> = alternatives.into_iter().map(concatenation).collect();
        Ok(if alternatives.len() == 1 {
            alternatives.remove(0)
        } else {
            Regex::Union(alternatives)
        })
    }

    /// <concat> ::= <starred>*
    fn concat(&mut self) -> Result<Vec<Regex>, RegexError> {
        let mut parts = vec![];
        loop {
            let factor = match self.look.kind {
                TokenKind::Character(c) => {
                    self.advance()?;
                    Regex::Symbol(c)
                }
                TokenKind::Epsilon => {
                    self.advance()?;
                    Regex::Epsilon
                }
                TokenKind::LeftParen => self.group()?,
                TokenKind::Star => return Err(self.error(RegexErrorKind::DanglingOperator('*'))),
                TokenKind::Union | TokenKind::RightParen | TokenKind::End => return Ok(parts),
            };
            parts.push(self.stars(factor)?);
        }
    }

    /// <starred> ::= <factor> '*'*
    fn stars(&mut self, factor: Regex) -> Result<Regex, RegexError> {
        if self.look.kind != TokenKind::Star {
            return Ok(factor);
        }
        while self.look.kind == TokenKind::Star {
            self.advance()?;
        }
        Ok(factor.star())
    }

    /// <group> ::= '(' <union> ')'
    fn group(&mut self) -> Result<Regex, RegexError> {
        let open = self.look.position;
        if self.depth == MAX_NESTING_DEPTH {
            return Err(RegexError::new(RegexErrorKind::TooDeeplyNested, open));
        }
        self.advance()?;
        if self.look.kind == TokenKind::RightParen {
            return Err(RegexError::new(RegexErrorKind::EmptyGroup, open));
        }
        self.depth += 1;
        let inner = self.union()?;
        self.depth -= 1;
        if self.look.kind != TokenKind::RightParen {
            return Err(RegexError::new(RegexErrorKind::UnclosedGroup, open));
        }
        self.advance()?;
        Ok(inner)
    }
}

fn concatenation(mut parts: Vec<Regex>) -> Regex {
    match parts.len() {
        0 => Regex::Epsilon,
        1 => parts.remove(0),
        _ => Regex::Concat(parts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error(expression: &str) -> (RegexErrorKind, usize) {
        let error = parse(expression).unwrap_err();
        (error.kind, error.position)
    }

    #[test]
    fn precedence() {
        assert_eq!(
            parse("a+bc*").unwrap(),
            Regex::Union(vec![
                Regex::Symbol('a'),
                Regex::Concat(vec![Regex::Symbol('b'), Regex::Symbol('c').star()]),
            ])
        );
        assert_eq!(
            parse("(a+$)*").unwrap(),
            Regex::Union(vec![Regex::Symbol('a'), Regex::Epsilon]).star()
        );
        assert_eq!(parse("a***").unwrap(), Regex::Symbol('a').star());
        assert_eq!(parse("").unwrap(), Regex::Epsilon);
    }

    #[test]
    fn escapes_produce_literals() {
        assert_eq!(
            parse(r"\(\*").unwrap(),
            Regex::Concat(vec![Regex::Symbol('('), Regex::Symbol('*')])
        );
        assert_eq!(parse(r"\$").unwrap(), Regex::Symbol('$'));
    }

    #[test]
    fn malformed_expressions() {
        assert_eq!(error("a(b"), (RegexErrorKind::UnclosedGroup, 1));
        assert_eq!(error("((a)"), (RegexErrorKind::UnclosedGroup, 0));
        assert_eq!(error("ab)"), (RegexErrorKind::UnmatchedClose, 2));
        assert_eq!(error("a()"), (RegexErrorKind::EmptyGroup, 1));
        assert_eq!(error("+a"), (RegexErrorKind::DanglingOperator('+'), 0));
        assert_eq!(error("a+"), (RegexErrorKind::DanglingOperator('+'), 1));
        assert_eq!(error("a+)"), (RegexErrorKind::DanglingOperator('+'), 1));
        assert_eq!(error("(a+)"), (RegexErrorKind::DanglingOperator('+'), 2));
        assert_eq!(error("*a"), (RegexErrorKind::DanglingOperator('*'), 0));
        assert_eq!(error("a+*"), (RegexErrorKind::DanglingOperator('*'), 2));
        assert_eq!(error(r"a\q"), (RegexErrorKind::UnknownEscape('q'), 1));
        assert_eq!(error(r"ab\"), (RegexErrorKind::TrailingBackslash, 2));
    }

    #[test_log::test]
    fn nesting_depth_is_limited() {
        let deep = format!("{}a{}", "(".repeat(5000), ")".repeat(5000));
        assert_eq!(
            error(&deep),
            (RegexErrorKind::TooDeeplyNested, MAX_NESTING_DEPTH)
        );

        let starred = format!("{}a{}", "(".repeat(5000), ")*".repeat(5000));
        assert_eq!(
            error(&starred),
            (RegexErrorKind::TooDeeplyNested, MAX_NESTING_DEPTH)
        );

        let deepest = format!(
            "{}a{}",
            "(".repeat(MAX_NESTING_DEPTH),
            ")*b".repeat(MAX_NESTING_DEPTH)
        );
        let regex = parse(&deepest).unwrap();
        assert_eq!(parse(&regex.to_string()).unwrap(), regex);
        let dfa = regex.to_automaton().minimal_dfa();
        assert!(dfa.is_accepted("b"));
        assert!(dfa.is_accepted("bb"));
        assert!(!dfa.is_accepted("a"));
        assert!(!regex.simplify().to_string().is_empty());
    }
}
