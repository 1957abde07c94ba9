use tracing::trace;

use super::{parse, Regex, RegexError};
use crate::math::IndexedSet;

/// Parses `expression`, simplifies it with [`Regex::simplify`] and renders the result.
///
/// ```
/// use automata_lab::prelude::*;
///
/// assert_eq!(simplify("((a+$)*b*)*").unwrap(), "(a+b)*");
/// assert!(simplify("(a").is_err());
/// ```
pub fn simplify(expression: &str) -> Result<String, RegexError> {
    Ok(parse(expression)?.simplify().to_string())
}

impl Regex {
    /// Rewrites `self` by algebraic identities that preserve the language until none applies
    /// anymore. The result is usually shorter, but it is not a normal form: equivalent inputs
    /// may simplify to different expressions.
    ///
    /// The identities used are
    /// - nested unions and concatenations are flattened, `$` is dropped from concatenations,
    /// - duplicate alternatives are removed, as is `$` if another alternative is nullable,
    /// - `x + x*` becomes `x*` and `x*x*` becomes `x*`,
    /// - `$*` becomes `$` and `(x*)*` becomes `x*`,
    /// - inside a star, `$` alternatives vanish and starred alternatives lose their star, so
    ///   `(x + $)*` becomes `x*` and `(x* + y)*` becomes `(x + y)*`,
    /// - `(x*y*)*` becomes `(x + y)*`.
    pub fn simplify(&self) -> Regex {
        let mut current = self.clone();
        loop {
            let next = current.simplify_once();
            if next == current {
                return next;
            }
            trace!("rewrote {current} to {next}");
            current = next;
        }
    }

    fn simplify_once(&self) -> Regex {
        match self {
            Regex::Epsilon | Regex::Symbol(_) => self.clone(),
            Regex::Concat(parts) => simplify_concat(parts.iter().map(Regex::simplify_once)),
            Regex::Union(alternatives) => {
                simplify_union(alternatives.iter().map(Regex::simplify_once))
            }
            Regex::Star(inner) => simplify_star(inner.simplify_once()),
        }
    }
}

fn simplify_concat<I: IntoIterator<Item = Regex>>(parts: I) -> Regex {
    let mut out: Vec<Regex> = vec![];
    for part in parts {
        match part {
            Regex::Epsilon => {}
            Regex::Concat(inner) => out.extend(inner),
            Regex::Star(_) if out.last() == Some(&part) => {}
            part => out.push(part),
        }
    }
    match out.len() {
        0 => Regex::Epsilon,
        1 => out.remove(0),
        _ => Regex::Concat(out),
    }
}

fn simplify_union<I: IntoIterator<Item = Regex>>(alternatives: I) -> Regex {
    let mut unique: IndexedSet<Regex> = IndexedSet::default();
    for alternative in alternatives {
        match alternative {
            Regex::Union(inner) => unique.extend(inner),
            alternative => {
                unique.insert(alternative);
            }
        }
    }

    let nullable = unique
        .iter()
        .filter(|alternative| **alternative != Regex::Epsilon)
        .any(Regex::is_nullable);
    let mut out: Vec<Regex> = unique
        .iter()
        .filter(|alternative| !(nullable && **alternative == Regex::Epsilon))
        .filter(|alternative| !unique.contains(&(*alternative).clone().star()))
        .cloned()
        .collect();
    match out.len() {
        0 => Regex::Epsilon,
        1 => out.remove(0),
        _ => Regex::Union(out),
    }
}

fn simplify_star(inner: Regex) -> Regex {
    match inner {
        Regex::Epsilon => Regex::Epsilon,
        Regex::Star(_) => inner,
        Regex::Union(alternatives) => {
            let stripped = alternatives
                .into_iter()
                .filter(|alternative| *alternative != Regex::Epsilon)
                .map(unstar);
            simplify_union(stripped).star()
        }
        Regex::Concat(parts) if parts.iter().all(|part| matches!(part, Regex::Star(_))) => {
            simplify_union(parts.into_iter().map(unstar)).star()
        }
        inner => inner.star(),
    }
}

fn unstar(regex: Regex) -> Regex {
    match regex {
        Regex::Star(inner) => *inner,
        regex => regex,
    }
}
