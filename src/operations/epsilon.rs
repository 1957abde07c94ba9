use tracing::trace;

use crate::prelude::*;

impl Automaton {
    /// Returns all states reachable from `states` through zero or more epsilon transitions,
    /// including `states` themselves. Epsilon cycles are fine.
    pub fn epsilon_closure<'a, I>(&self, states: I) -> StateSet
    where
        I: IntoIterator<Item = &'a StateId>,
    {
        let mut closure: StateSet = states.into_iter().cloned().collect();
        let mut stack: Vec<StateId> = closure.iter().cloned().collect();
        while let Some(q) = stack.pop() {
            let Some(targets) = self.targets(q.as_str(), Symbol::Epsilon) else {
                continue;
            };
            for p in targets {
                if closure.insert(p.clone()) {
                    stack.push(p.clone());
                }
            }
        }
        closure
    }

    /// The epsilon closure of the initial state, or the empty set if there is none.
    pub fn initial_states(&self) -> StateSet {
        self.epsilon_closure(self.initial())
    }

    /// Builds an automaton without epsilon transitions that accepts the same language. States,
    /// initial state and layout of the states are kept. A state gets a transition on `a` to
    /// every state reachable by reading `a` somewhere within its epsilon closure, and it becomes
    /// accepting if its epsilon closure contains an accepting state.
    pub fn remove_epsilon(&self) -> Automaton {
        if !self.has_epsilon_transitions() {
            return self.clone();
        }

        let mut out = Automaton {
            states: self.states.clone(),
            alphabet: self.alphabet.clone(),
            initial: self.initial.clone(),
            ..Default::default()
        };
        let symbols = self.sorted_alphabet();
        for q in self.states() {
            let closure = self.epsilon_closure([q]);
            if self.contains_accepting(&closure) {
                out.accepting.insert(q.clone());
            }
            for a in &symbols {
                for p in self.step(&closure, *a) {
                    out.insert_transition(q.clone(), p, Symbol::Char(*a));
                }
            }
        }
        let mut layout = self.layout.project(|q| Some(q.clone()));
        layout.edges.retain(|(from, to), _| {
            !out.symbols_between(from.as_str(), to.as_str()).is_empty()
        });
        out.layout = layout;
        trace!(
            "removed epsilon transitions, {} transitions remain",
            out.transition_count()
        );
        out
    }
}
