use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::{
    automaton::state_set_name,
    math::{IndexedMap, IndexedSet},
    prelude::*,
};

impl Automaton {
    /// Applies the subset construction and returns a complete deterministic automaton
    /// accepting the same language.
    ///
    /// Every state of the result stands for a set of states of `self` and is named after its
    /// sorted members, e.g. `{s0,s2}`, so equal sets always receive the same name. The empty
    /// set `{}` is the dead state, it only appears if some transition would otherwise be missing.
    /// Only sets reachable from the epsilon closure of the initial state are built. Without an
    /// initial state, the result has no states.
    pub fn determinize(&self) -> Automaton {
        let mut out = Automaton {
            alphabet: self.alphabet.clone(),
            ..Default::default()
        };
        if self.initial().is_none() {
            debug!("automaton has no initial state, determinization yields no states");
            return out;
        }

        let symbols = self.sorted_alphabet();
        let start = self.initial_states();
        let mut names: IndexedMap<StateSet, StateId> = IndexedMap::default();
        names.insert(start.clone(), state_set_name(&start));
        let mut queue = VecDeque::from([start]);

        while let Some(set) = queue.pop_front() {
            let source = names[&set].clone();
            out.insert_state(source.clone(), None);
            if self.contains_accepting(&set) {
                out.accepting.insert(source.clone());
            }
            for a in &symbols {
                let next = self.step(&set, *a);
                let target = match names.get(&next) {
                    Some(name) => name.clone(),
                    None => {
                        let name = state_set_name(&next);
                        trace!("discovered subset {name}");
                        names.insert(next.clone(), name.clone());
                        queue.push_back(next);
                        name
                    }
                };
                out.transitions
                    .entry((source.clone(), Symbol::Char(*a)))
                    .or_insert_with(IndexedSet::default)
                    .insert(target);
            }
        }

        debug!(
            "subset construction turned {} states into {} states",
            self.size(),
            out.size()
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    fn ends_with_ab() -> Automaton {
        Automaton::builder()
            .with_transitions([
                ("q0", 'a', "q0"),
                ("q0", 'b', "q0"),
                ("q0", 'a', "q1"),
                ("q1", 'b', "q2"),
            ])
            .with_initial("q0")
            .with_accepting(["q2"])
            .build()
    }

    #[test_log::test]
    fn subset_construction() {
        let nfa = ends_with_ab();
        let dfa = nfa.determinize();
        assert!(dfa.is_complete_deterministic());
        assert_eq!(dfa.size(), 3);
        assert_eq!(dfa.initial(), Some(&StateId::from("{q0}")));
        assert!(dfa.contains_state("{q0,q1}"));
        assert!(dfa.is_accepting("{q0,q2}"));
        assert!(!dfa.contains_state("{}"));
    }

    #[test_log::test]
    fn dead_state_is_added_when_needed() {
        let partial = Automaton::builder()
            .with_transitions([("s0", 'a', "s1")])
            .with_accepting(["s1"])
            .build();
        let dfa = partial.determinize();
        assert!(dfa.contains_state("{}"));
        assert!(!dfa.is_accepting("{}"));
        assert!(dfa.is_complete_deterministic());
        assert_eq!(dfa.size(), 3);
    }

    #[test_log::test]
    fn determinization_preserves_language() {
        let nfa = Automaton::builder()
            .with_transitions([("s0", 'a', "s1"), ("s1", 'b', "s1"), ("s2", 'a', "s0")])
            .with_epsilon_transitions([("s0", "s2"), ("s1", "s0")])
            .with_initial("s0")
            .with_accepting(["s1"])
            .build();
        let dfa = nfa.remove_epsilon().determinize();
        let direct = nfa.determinize();
        for word in ["", "a", "ab", "aa", "aab", "abba", "b", "ba", "abab"] {
            assert_eq!(nfa.is_accepted(word), dfa.is_accepted(word), "{word:?}");
            assert_eq!(nfa.is_accepted(word), direct.is_accepted(word), "{word:?}");
        }
    }

    #[test_log::test]
    fn identifiers_containing_commas() {
        let nfa = Automaton::builder()
            .with_transitions([
                ("i", 'x', "a"),
                ("i", 'x', "b"),
                ("i", 'y', "a,b"),
                ("a", 'z', "f"),
            ])
            .with_initial("i")
            .with_accepting(["f"])
            .build();
        let dfa = nfa.determinize();
        assert!(dfa.is_complete_deterministic());
        assert!(dfa.contains_state("{a,b}"));
        assert!(dfa.contains_state(r"{a\,b}"));
        for word in ["xz", "yz", "x", "y", "xzz", ""] {
            assert_eq!(nfa.is_accepted(word), dfa.is_accepted(word), "{word:?}");
        }
        assert!(dfa.is_accepted("xz"));
        assert!(!dfa.is_accepted("yz"));
    }

    #[test]
    fn no_initial_state_yields_no_states() {
        let dfa = ends_with_ab().clear_initial().determinize();
        assert!(dfa.is_empty());
        assert_eq!(dfa.sorted_alphabet(), vec!['a', 'b']);
    }
}
