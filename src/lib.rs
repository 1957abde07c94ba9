//! Library for building, editing and analysing finite automata over characters.
//!
//! The central type is [`Automaton`], a possibly nondeterministic automaton with epsilon
//! transitions. Automata are values: every edit (see [`Edit`] and the mutators on
//! [`Automaton`]) and every algorithm takes a shared reference and returns a new automaton, so
//! older snapshots stay valid and can be kept around, e.g. for undo or while a new one is being
//! computed. Next to states and transitions an automaton carries a [`automaton::Layout`] with
//! positions for drawing it, which the edits keep consistent and the algorithms ignore.
//!
//! The algorithms cover the classic pipeline from regular expressions to minimal automata:
//! - [`Automaton::epsilon_closure`] and [`Automaton::remove_epsilon`],
//! - [`Automaton::determinize`] by the subset construction,
//! - [`Automaton::minimize`] by partition refinement,
//! - [`Automaton::renumber_states`] which gives states canonical names `s0, s1, ...`,
//! - [`Automaton::is_accepted`] and [`Automaton::equivalent`] for membership and equivalence.
//!
//! Regular expressions are handled by the [`regex`] module, which parses expressions like
//! `ab(ab)*` or `(0+1)*0` and compiles them into minimal deterministic automata through
//! Thompson's construction. The [`debugger`] module steps through a run one symbol at a time.
//!
//! ```
//! use automata_lab::prelude::*;
//!
//! let dfa = compile("(0+1)*0(0+1)*0(0+1)*").unwrap();
//! assert!(dfa.is_accepted("100101"));
//! assert!(!dfa.is_accepted("0111"));
//! assert_eq!(dfa.size(), 3);
//! ```
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use automata_lab::prelude::*;` should be enough to use the package.
pub mod prelude {
    #[cfg(feature = "random")]
    pub use super::random::{generate_random_word, random_expression, random_regex, RandomOptions};
    pub use super::{
        alphabet::{format_label, parse_label, Alphabet, Symbol, EPSILON},
        automaton::{
            Automaton, AutomatonBuilder, EdgeAnchor, EdgeGroup, Edit, Layout, Point, StateId,
            StateSet,
        },
        debugger::{Debugger, DebuggerError, DebuggingState},
        math::{self, Partition},
        regex::{compile, parse, simplify, Regex, RegexError, RegexErrorKind},
    };
}

/// This module contains some definitions of mathematical objects which are used throughout the
/// crate and do not really fit to the top level.
pub mod math;

/// Module that contains definitions for dealing with symbols, alphabets and edge labels.
pub mod alphabet;

/// Defines the automaton model together with its builder, layout and edits.
pub mod automaton;
pub use automaton::{Automaton, Edit};

pub mod operations;

/// Minimization of deterministic automata.
pub mod minimization;

/// Running automata on words.
pub mod run;

pub mod regex;

pub mod debugger;

pub mod samples;

#[cfg(feature = "random")]
pub mod random;

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    fn dfa_ab() -> Automaton {
        Automaton::new()
            .add_state("s0", Point::new(60.0, 60.0))
            .add_state("s1", Point::new(180.0, 60.0))
            .add_state("s2", Point::new(340.0, 60.0))
            .set_initial("s0")
            .set_accepting("s2", true)
            .add_transition("s0", "s1", Symbol::Char('a'))
            .add_transition("s1", "s2", Symbol::Char('b'))
            .add_transition("s2", "s1", Symbol::Char('a'))
    }

    #[test_log::test]
    fn hand_built_automaton() {
        let automaton = dfa_ab();
        assert!(automaton.is_accepted("ab"));
        assert!(automaton.is_accepted("abab"));
        assert!(!automaton.is_accepted("a"));
        assert!(!automaton.is_accepted("aba"));
        assert_eq!(automaton.minimal_dfa(), compile("ab(ab)*").unwrap());
    }

    #[test_log::test]
    fn failed_compilation_leaves_previous_result_alone() {
        let mut shown = compile("ab").unwrap();
        for expression in ["a", "a(", "a(b", "a(b)"] {
            match compile(expression) {
                Ok(automaton) => shown = automaton,
                Err(error) => assert_eq!(error.kind, RegexErrorKind::UnclosedGroup),
            }
        }
        assert!(shown.is_accepted("ab"));
        assert!(!shown.is_accepted("a"));
    }

    #[test_log::test]
    fn edits_do_not_touch_older_snapshots() {
        let before = dfa_ab();
        let after = before
            .remove_state("s1")
            .update_transition_symbols("s0", "s2", "", "a,b");
        assert_eq!(before, dfa_ab());
        assert_eq!(after.size(), 2);
        assert_eq!(
            after.symbols_between("s0", "s2"),
            vec![Symbol::Char('a'), Symbol::Char('b')]
        );
    }

    #[test_log::test]
    fn removing_a_target_of_a_transition() {
        let automaton = Automaton::builder()
            .with_transitions([("s0", 'a', "s1"), ("s0", 'a', "s2"), ("s1", 'b', "s2")])
            .build();
        let without_s2 = automaton.remove_state("s2");
        assert_eq!(without_s2.transition_count(), 1);
        assert!(without_s2.has_transition("s0", "s1", Symbol::Char('a')));
        let without_s1 = automaton.remove_state("s1");
        assert_eq!(without_s1.transition_count(), 1);
        assert!(without_s1.has_transition("s0", "s2", Symbol::Char('a')));
    }
}
