//! Regular expressions over characters and their compilation into minimal automata.
//!
//! The syntax knows literal characters, union `+` (lowest precedence), implicit concatenation,
//! the postfix Kleene star `*` (highest precedence), grouping with `(` and `)` and `$` for the
//! empty word. A backslash turns any of `+*()$\` into a literal. The empty expression denotes
//! the empty word.

use std::fmt::Display;

use thiserror::Error;
use tracing::debug;

use crate::prelude::*;

mod lexer;

mod parser;
pub use parser::parse;

mod thompson;

mod simplify;
pub use simplify::simplify;

/// The characters with a special meaning, they have to be escaped to be used as literals.
pub const SPECIAL_CHARACTERS: [char; 6] = ['+', '*', '(', ')', '$', '\\'];

/// How deeply groups may be nested in an expression.
pub const MAX_NESTING_DEPTH: usize = 100;

/// The abstract syntax tree of a regular expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Regex {
    /// The empty word, written `$`.
    Epsilon,
    /// A single literal character.
    Symbol(char),
    /// The concatenation of all parts, in order.
    Concat(Vec<Regex>),
    /// The union of all alternatives.
    Union(Vec<Regex>),
    /// Zero or more repetitions of the inner expression.
    Star(Box<Regex>),
}

impl Regex {
    /// Wraps `self` in a Kleene star.
    pub fn star(self) -> Regex {
        Regex::Star(Box::new(self))
    }

    /// Returns true if the empty word belongs to the language of `self`.
    pub fn is_nullable(&self) -> bool {
        match self {
            Regex::Epsilon | Regex::Star(_) => true,
            Regex::Symbol(_) => false,
            Regex::Concat(parts) => parts.iter().all(Regex::is_nullable),
            Regex::Union(alternatives) => alternatives.iter().any(Regex::is_nullable),
        }
    }

    /// Counts the literal characters occurring in `self`.
    pub fn symbol_count(&self) -> usize {
        match self {
            Regex::Epsilon => 0,
            Regex::Symbol(_) => 1,
            Regex::Concat(children) | Regex::Union(children) => {
                children.iter().map(Regex::symbol_count).sum()
            }
            Regex::Star(inner) => inner.symbol_count(),
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Regex::Union(alternatives) if alternatives.len() == 1 => alternatives[0].precedence(),
            Regex::Concat(parts) if parts.len() == 1 => parts[0].precedence(),
            Regex::Union(alternatives) if alternatives.len() > 1 => 0,
            Regex::Concat(parts) if parts.len() > 1 => 1,
            Regex::Star(_) => 2,
            _ => 3,
        }
    }

    fn fmt_child(&self, f: &mut std::fmt::Formatter<'_>, min_precedence: u8) -> std::fmt::Result {
        if self.precedence() < min_precedence {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

impl Display for Regex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Regex::Epsilon => write!(f, "$"),
            Regex::Symbol(c) if SPECIAL_CHARACTERS.contains(c) => write!(f, "\\{c}"),
            Regex::Symbol(c) => write!(f, "{c}"),
            Regex::Concat(parts) if parts.is_empty() => write!(f, "$"),
            Regex::Concat(parts) | Regex::Union(parts) if parts.len() == 1 => parts[0].fmt(f),
            Regex::Concat(parts) => parts.iter().try_for_each(|part| part.fmt_child(f, 1)),
            Regex::Union(alternatives) if alternatives.is_empty() => write!(f, "$"),
            Regex::Union(alternatives) => {
                for (i, alternative) in alternatives.iter().enumerate() {
                    if i > 0 {
                        write!(f, "+")?;
                    }
                    alternative.fmt_child(f, 1)?;
                }
                Ok(())
            }
            Regex::Star(inner) => {
                inner.fmt_child(f, 2)?;
                write!(f, "*")
            }
        }
    }
}

impl std::str::FromStr for Regex {
    type Err = RegexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// The reasons for which an expression can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegexErrorKind {
    /// A `(` without matching `)`.
    #[error("unclosed group, `(` is never closed")]
    UnclosedGroup,
    /// A `)` without matching `(`.
    #[error("unmatched `)`")]
    UnmatchedClose,
    /// The group `()` contains nothing.
    #[error("empty group `()`, write `$` for the empty word")]
    EmptyGroup,
    /// An operator that is missing an operand.
    #[error("operator `{0}` is missing an operand")]
    DanglingOperator(char),
    /// A backslash followed by a character that has no special meaning.
    #[error("unknown escape `\\{0}`")]
    UnknownEscape(char),
    /// A backslash at the very end of the expression.
    #[error("trailing backslash")]
    TrailingBackslash,
    /// A `(` that opens more than [`MAX_NESTING_DEPTH`] nested groups.
    #[error("groups are nested more than {MAX_NESTING_DEPTH} levels deep")]
    TooDeeplyNested,
}

/// Returned when an expression cannot be parsed. The position is the 0-based offset in
/// characters at which the problem was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} at position {position}")]
pub struct RegexError {
    /// What went wrong.
    pub kind: RegexErrorKind,
    /// Where it went wrong.
    pub position: usize,
}

impl RegexError {
    pub(crate) fn new(kind: RegexErrorKind, position: usize) -> Self {
        Self { kind, position }
    }

    /// A human readable description of the problem.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Parses `expression` and compiles it into the minimal complete deterministic automaton
/// for its language, with states named `s0, s1, ...` and `s0` initial.
///
/// The expression is turned into an automaton with epsilon transitions by Thompson's
/// construction, which is then run through [`Automaton::minimal_dfa`]. If parsing fails the
/// error is returned and no automaton is built.
pub fn compile(expression: &str) -> Result<Automaton, RegexError> {
    let regex = parse(expression)?;
    let nfa = regex.to_automaton();
    debug!(
        "thompson construction for {expression:?} has {} states",
        nfa.size()
    );
    Ok(nfa.minimal_dfa())
}
