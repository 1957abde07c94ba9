use tracing::trace;

use crate::prelude::*;

impl Automaton {
    /// Reads a single character from every state in `states` and returns the epsilon closure
    /// of all targets. The result is empty if no transition matches, which amounts to rejection.
    pub fn step(&self, states: &StateSet, symbol: char) -> StateSet {
        let targets: Vec<&StateId> = states
            .iter()
            .filter_map(|q| self.targets(q.as_str(), Symbol::Char(symbol)))
            .flatten()
            .collect();
        self.epsilon_closure(targets)
    }

    /// Runs `word` starting in `states` and returns the set of states reached at the end.
    pub fn run_from(&self, states: &StateSet, word: &str) -> StateSet {
        let mut current = self.epsilon_closure(states);
        for symbol in word.chars() {
            if current.is_empty() {
                break;
            }
            current = self.step(&current, symbol);
        }
        current
    }

    /// Runs `word` from the initial state and returns the set of states reached at the end.
    /// Empty if there is no initial state or the run gets stuck.
    pub fn reached_states(&self, word: &str) -> StateSet {
        self.run_from(&self.initial_states(), word)
    }

    /// Returns true if some run on `word` from `states` ends in an accepting state.
    pub fn accepts_from(&self, states: &StateSet, word: &str) -> bool {
        self.contains_accepting(&self.run_from(states, word))
    }

    /// Returns true if the automaton accepts `word`.
    ///
    /// An automaton without initial state or without any transition accepts nothing, not
    /// even the empty word. Use [`Automaton::accepts_from`] together with
    /// [`Automaton::initial_states`] for the unguarded semantics.
    pub fn is_accepted(&self, word: &str) -> bool {
        if !self.is_testable() {
            trace!("automaton without initial state or transitions rejects {word:?}");
            return false;
        }
        self.accepts_from(&self.initial_states(), word)
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    fn dfa_ab() -> Automaton {
        Automaton::builder()
            .with_transitions([("s0", 'a', "s1"), ("s1", 'b', "s2"), ("s2", 'a', "s1")])
            .with_initial("s0")
            .with_accepting(["s2"])
            .build()
    }

    #[test_log::test]
    fn acceptance() {
        let automaton = dfa_ab();
        assert!(automaton.is_accepted("ab"));
        assert!(automaton.is_accepted("abab"));
        assert!(!automaton.is_accepted("a"));
        assert!(!automaton.is_accepted("aba"));
        assert!(!automaton.is_accepted(""));
        assert!(!automaton.is_accepted("abc"));
    }

    #[test_log::test]
    fn stepping() {
        let automaton = dfa_ab();
        let start = automaton.initial_states();
        let after_a = automaton.step(&start, 'a');
        assert_eq!(after_a, StateSet::from([StateId::from("s1")]));
        assert!(automaton.step(&start, 'b').is_empty());
        assert!(automaton.step(&StateSet::new(), 'a').is_empty());
        assert_eq!(
            automaton.reached_states("aba"),
            StateSet::from([StateId::from("s1")])
        );
    }

    #[test_log::test]
    fn degenerate_automata_reject() {
        assert!(!Automaton::new().is_accepted(""));
        assert!(!dfa_ab().clear_initial().is_accepted("ab"));

        let lonely = Automaton::builder()
            .with_states(["s0"])
            .with_accepting(["s0"])
            .build();
        assert!(!lonely.is_accepted(""));
        assert!(lonely.accepts_from(&lonely.initial_states(), ""));
    }

    #[test_log::test]
    fn nondeterministic_runs() {
        let automaton = Automaton::builder()
            .with_transitions([("q0", 'a', "q0"), ("q0", 'b', "q0"), ("q0", 'a', "q1")])
            .with_transitions([("q1", 'b', "q2")])
            .with_initial("q0")
            .with_accepting(["q2"])
            .build();
        assert!(automaton.is_accepted("ab"));
        assert!(automaton.is_accepted("babab"));
        assert!(!automaton.is_accepted("aba"));
    }
}
