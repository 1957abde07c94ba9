use crate::prelude::*;

/// Helper struct for assembling an [`Automaton`] from literal lists of states and transitions.
/// States that only appear on transitions are created implicitly, in the order in which they
/// are first mentioned.
///
/// # Example
///
/// The automaton accepting `ab(ab)*` with states `s0`, `s1` and `s2` can be built like so
/// ```
/// use automata_lab::prelude::*;
///
/// let automaton = Automaton::builder()
///     .with_transitions([("s0", 'a', "s1"), ("s1", 'b', "s2"), ("s2", 'a', "s1")])
///     .with_initial("s0")
///     .with_accepting(["s2"])
///     .build();
/// assert!(automaton.is_accepted("abab"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct AutomatonBuilder {
    automaton: Automaton,
    initial: Option<StateId>,
    accepting: Vec<StateId>,
}

impl AutomatonBuilder {
    /// Adds the given states, ignoring identifiers that already exist.
    pub fn with_states<I, X>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = X>,
        X: Into<StateId>,
    {
        for q in states {
            self.automaton.insert_state(q.into(), None);
        }
        self
    }

    /// Adds the given states together with their positions.
    pub fn with_positioned_states<I, X>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = (X, Point)>,
        X: Into<StateId>,
    {
        for (q, position) in states {
            let q = q.into();
            self.automaton.insert_state(q.clone(), None);
            self.automaton.layout.states.insert(q, position);
        }
        self
    }

    /// Adds transitions given as `(source, symbol, target)` triples.
    pub fn with_transitions<I, X, S, Y>(mut self, transitions: I) -> Self
    where
        I: IntoIterator<Item = (X, S, Y)>,
        X: Into<StateId>,
        S: Into<Symbol>,
        Y: Into<StateId>,
    {
        for (from, symbol, to) in transitions {
            let (from, to) = (from.into(), to.into());
            self.automaton.insert_state(from.clone(), None);
            self.automaton.insert_state(to.clone(), None);
            self.automaton.insert_transition(from, to, symbol.into());
        }
        self
    }

    /// Adds epsilon transitions given as `(source, target)` pairs.
    pub fn with_epsilon_transitions<I, X, Y>(self, transitions: I) -> Self
    where
        I: IntoIterator<Item = (X, Y)>,
        X: Into<StateId>,
        Y: Into<StateId>,
    {
        self.with_transitions(
            transitions
                .into_iter()
                .map(|(from, to)| (from, Symbol::Epsilon, to)),
        )
    }

    /// Adds characters to the alphabet that need not appear on any transition.
    pub fn with_alphabet_symbols<I>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = char>,
    {
        self.automaton.alphabet.extend(symbols);
        self
    }

    /// Designates the initial state. Without this call, the first state becomes initial.
    pub fn with_initial<X: Into<StateId>>(mut self, initial: X) -> Self {
        self.initial = Some(initial.into());
        self
    }

    /// Marks the given states as accepting.
    pub fn with_accepting<I, X>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = X>,
        X: Into<StateId>,
    {
        self.accepting.extend(states.into_iter().map(Into::into));
        self
    }

    /// Consumes the builder and returns the automaton.
    pub fn build(self) -> Automaton {
        let mut automaton = self.automaton;
        for q in self.accepting {
            automaton.insert_state(q.clone(), None);
            automaton.accepting.insert(q);
        }
        if let Some(initial) = self.initial {
            automaton.insert_state(initial.clone(), None);
            automaton.initial = Some(initial);
        }
        automaton
    }
}
