use std::fmt::Display;

use itertools::Itertools;
use tracing::warn;

use crate::math::{IndexedSet, OrderedSet};

/// The character that denotes the empty word in edge labels and regular expressions.
pub const EPSILON: char = '$';

/// The character separating symbols in an edge label such as `a,b,c`.
pub const LABEL_SEPARATOR: char = ',';

/// The alphabet of an automaton is the set of characters that appear on its transitions. It
/// remembers the order in which symbols were first seen and never contains epsilon.
pub type Alphabet = IndexedSet<char>;

/// A symbol labelling a transition. Epsilon transitions can be taken without consuming input,
/// every other transition consumes exactly one character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    /// The empty word.
    Epsilon,
    /// A single input character.
    Char(char),
}

impl Symbol {
    /// Returns true if `self` is [`Symbol::Epsilon`].
    pub fn is_epsilon(&self) -> bool {
        matches!(self, Symbol::Epsilon)
    }

    /// Returns the character consumed by `self`, or `None` for epsilon.
    pub fn as_char(&self) -> Option<char> {
        match self {
            Symbol::Epsilon => None,
            Symbol::Char(c) => Some(*c),
        }
    }
}

impl From<char> for Symbol {
    fn from(value: char) -> Self {
        Symbol::Char(value)
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::Epsilon => write!(f, "{EPSILON}"),
            Symbol::Char(c) if needs_escape(*c) => write!(f, "\\{c}"),
            Symbol::Char(c) => write!(f, "{c}"),
        }
    }
}

fn needs_escape(c: char) -> bool {
    c == EPSILON || c == LABEL_SEPARATOR || c == '\\'
}

/// Splits an edge label like `a,b,c` into the set of symbols it denotes.
///
/// Tokens are trimmed, `$` stands for epsilon and a backslash makes the following character
/// literal, so `\,` and `\$` denote the comma and dollar characters. Empty tokens are ignored,
/// tokens that do not denote exactly one symbol are skipped with a warning.
pub fn parse_label(label: &str) -> OrderedSet<Symbol> {
    let mut tokens = vec![String::new()];
    let mut chars = label.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let current = tokens.last_mut().expect("there is always a current token");
                current.push('\\');
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            LABEL_SEPARATOR => tokens.push(String::new()),
            c => tokens
                .last_mut()
                .expect("there is always a current token")
                .push(c),
        }
    }

    tokens
        .iter()
        .map(|token| token.trim())
        .filter(|token| !token.is_empty())
        .filter_map(|token| {
            let symbol = parse_token(token);
            if symbol.is_none() {
                warn!("ignoring label token {token:?} as it does not denote a single symbol");
            }
            symbol
        })
        .collect()
}

fn parse_token(token: &str) -> Option<Symbol> {
    let chars = token.chars().collect_vec();
    match chars.as_slice() {
        [EPSILON] => Some(Symbol::Epsilon),
        ['\\', c] => Some(Symbol::Char(*c)),
        [c] if *c != '\\' => Some(Symbol::Char(*c)),
        _ => None,
    }
}

/// Renders symbols as an edge label, the inverse of [`parse_label`].
pub fn format_label<'a, I>(symbols: I) -> String
where
    I: IntoIterator<Item = &'a Symbol>,
{
    symbols
        .into_iter()
        .map(|symbol| symbol.to_string())
        .join(&LABEL_SEPARATOR.to_string())
}
