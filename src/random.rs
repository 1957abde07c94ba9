//! Random regular expressions and words, for demonstrations and randomized tests.
//!
//! All functions take the random number generator as an argument, so seeding it makes the
//! output reproducible.

use fastrand::Rng;
use tracing::trace;

use crate::prelude::*;

/// Controls the shape of randomly generated expressions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomOptions {
    /// Probability with which a subexpression is wrapped in a Kleene star.
    pub star_probability: f64,
    /// Probability with which an inner node becomes a union rather than a concatenation.
    pub union_probability: f64,
    /// Probability with which a leaf becomes `$` rather than a symbol.
    pub epsilon_probability: f64,
}

impl Default for RandomOptions {
    fn default() -> Self {
        Self {
            star_probability: 0.2,
            union_probability: 0.4,
            epsilon_probability: 0.05,
        }
    }
}

/// Generates a random [`Regex`] over `alphabet` with at most `max_symbols` leaves. Without
/// symbols to draw from or without room for any leaf, the result is [`Regex::Epsilon`].
pub fn random_regex(
    rng: &mut Rng,
    max_symbols: usize,
    alphabet: &[char],
    options: &RandomOptions,
) -> Regex {
    if alphabet.is_empty() || max_symbols == 0 {
        return Regex::Epsilon;
    }
    let leaves = rng.usize(1..=max_symbols);
    grow(rng, leaves, alphabet, options)
}

fn grow(rng: &mut Rng, leaves: usize, alphabet: &[char], options: &RandomOptions) -> Regex {
    let node = if leaves == 1 {
        if rng.f64() < options.epsilon_probability {
            Regex::Epsilon
        } else {
            Regex::Symbol(alphabet[rng.usize(..alphabet.len())])
        }
    } else {
        let left = rng.usize(1..leaves);
        let children = vec![
            grow(rng, left, alphabet, options),
            grow(rng, leaves - left, alphabet, options),
        ];
        if rng.f64() < options.union_probability {
            Regex::Union(children)
        } else {
            Regex::Concat(children)
        }
    };
    if rng.f64() < options.star_probability {
        node.star()
    } else {
        node
    }
}

/// Generates a random expression over the characters of `alphabet` containing at most
/// `max_length` symbols. The result can always be parsed by [`parse`], special characters in
/// the alphabet are escaped.
pub fn random_expression(
    rng: &mut Rng,
    max_length: usize,
    alphabet: &str,
    options: &RandomOptions,
) -> String {
    let symbols: Vec<char> = alphabet.chars().collect();
    let expression = random_regex(rng, max_length, &symbols, options).to_string();
    trace!("generated random expression {expression}");
    expression
}

/// Generates a random word over `alphabet` whose length is drawn uniformly from
/// `min_len..=max_len`. The word is empty if the alphabet is.
pub fn generate_random_word(
    rng: &mut Rng,
    alphabet: &[char],
    min_len: usize,
    max_len: usize,
) -> String {
    if alphabet.is_empty() {
        return String::new();
    }
    let length = rng.usize(min_len..=max_len);
    (0..length)
        .map(|_| alphabet[rng.usize(..alphabet.len())])
        .collect()
}
