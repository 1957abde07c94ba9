//! Ready made automata and expressions for demonstrations.

use crate::prelude::*;

/// An automaton together with a title and a word to try it on.
#[derive(Debug, Clone)]
pub struct AutomatonSample {
    /// Short description.
    pub title: &'static str,
    /// A word that is worth running through the automaton.
    pub test_word: &'static str,
    /// The automaton itself, including its layout.
    pub automaton: Automaton,
}

/// A regular expression together with words inside and outside of its language.
#[derive(Debug, Clone, Copy)]
pub struct ExpressionSample {
    /// Short description.
    pub title: &'static str,
    /// The expression.
    pub expression: &'static str,
    /// Words in the language of the expression.
    pub accept_words: &'static [&'static str],
    /// Words outside the language of the expression.
    pub reject_words: &'static [&'static str],
}

/// The deterministic automaton for `ab(ab)*` with three states laid out in a row.
pub fn dfa_ab() -> AutomatonSample {
    let automaton = Automaton::builder()
        .with_positioned_states([
            ("s0", Point::new(60.0, 60.0)),
            ("s1", Point::new(180.0, 60.0)),
            ("s2", Point::new(340.0, 60.0)),
        ])
        .with_transitions([("s0", 'a', "s1"), ("s1", 'b', "s2"), ("s2", 'a', "s1")])
        .with_initial("s0")
        .with_accepting(["s2"])
        .build()
        .set_edge_anchor("s0", "s1", EdgeAnchor::straight())
        .set_edge_anchor("s1", "s2", EdgeAnchor::straight())
        .set_edge_anchor("s2", "s1", EdgeAnchor::straight());
    AutomatonSample {
        title: "DFA ab",
        test_word: "ababab",
        automaton,
    }
}

/// All automaton samples.
pub fn automata() -> Vec<AutomatonSample> {
    vec![dfa_ab()]
}

/// All expression samples.
pub const EXPRESSIONS: &[ExpressionSample] = &[
    ExpressionSample {
        title: "repeated ab",
        expression: "ab(ab)*",
        accept_words: &["ab", "abab", "ababab"],
        reject_words: &["", "a", "b", "aba", "ababb"],
    },
    ExpressionSample {
        title: "at least two zeros",
        expression: "(0+1)*0(0+1)*0(0+1)*",
        accept_words: &["00", "100101", "0110"],
        reject_words: &["", "0", "1", "111", "0111"],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn dfa_ab_sample() {
        let sample = dfa_ab();
        let automaton = &sample.automaton;
        assert!(automaton.is_accepted(sample.test_word));
        assert!(automaton.is_deterministic());
        assert_eq!(
            automaton.layout().state_position("s2"),
            Some(Point::new(340.0, 60.0))
        );
        assert_eq!(
            automaton.layout().edge_anchor("s2", "s1"),
            Some(EdgeAnchor::straight())
        );
        assert!(automaton.equivalent(&compile("ab(ab)*").unwrap()));
    }

    #[test_log::test]
    fn expression_samples_classify_their_words() {
        for sample in EXPRESSIONS {
            let dfa = compile(sample.expression).unwrap();
            for word in sample.accept_words {
                assert!(dfa.is_accepted(word), "{}: {word:?}", sample.title);
            }
            for word in sample.reject_words {
                assert!(!dfa.is_accepted(word), "{}: {word:?}", sample.title);
            }
        }
        assert_eq!(automata().len(), 1);
    }
}
