use std::{borrow::Borrow, collections::VecDeque, fmt::Display};

use itertools::Itertools;

use crate::{
    alphabet::{Alphabet, Symbol},
    math::{IndexedMap, IndexedSet, OrderedSet, Set},
};

mod builder;
pub use builder::AutomatonBuilder;

mod edit;
pub use edit::Edit;

mod layout;
pub use layout::{EdgeAnchor, Layout, Point};

mod display;
pub use display::EdgeGroup;

/// The prefix of state identifiers that are created by the automaton itself.
pub const STATE_PREFIX: char = 's';

/// Identifies a state of an [`Automaton`]. Identifiers are arbitrary strings, states that are
/// created through [`Automaton::next_state_id`] follow the scheme `s<N>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(String);

impl StateId {
    /// Creates a new identifier from anything that can be turned into a `String`.
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    /// Creates the identifier `s<n>`.
    pub fn numbered(n: usize) -> Self {
        Self(format!("{STATE_PREFIX}{n}"))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `N` if `self` is of the form `s<N>`.
    pub fn numeric_suffix(&self) -> Option<usize> {
        self.0.strip_prefix(STATE_PREFIX)?.parse().ok()
    }
}

impl Borrow<str> for StateId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Display for StateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for StateId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for StateId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&StateId> for StateId {
    fn from(value: &StateId) -> Self {
        value.clone()
    }
}

/// A set of states, ordered by identifier. Every algorithm that computes a set of states
/// returns one of these, which makes results independent of insertion order.
pub type StateSet = OrderedSet<StateId>;

/// Renders a set of states as `{s0,s1}`. Subset construction uses this to name the states
/// of the deterministic automaton, so equal sets always receive equal names. Backslashes,
/// commas and braces inside member identifiers are escaped with a backslash, which makes the
/// name unique to the set: `{a,b}` and `{a\,b}` are different sets.
pub fn state_set_name(states: &StateSet) -> StateId {
    let members = states.iter().map(|q| escape_member(q.as_str())).join(",");
    StateId(format!("{{{members}}}"))
}

fn escape_member(id: &str) -> String {
    let mut escaped = String::with_capacity(id.len());
    for c in id.chars() {
        if matches!(c, '\\' | ',' | '{' | '}') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// A reference to all transitions leaving `from` on `symbol`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRef<'a> {
    /// The state the transitions leave.
    pub from: &'a StateId,
    /// The symbol they are labelled with.
    pub symbol: Symbol,
    /// All targets.
    pub to: &'a IndexedSet<StateId>,
}

/// A finite automaton over characters, possibly nondeterministic and with epsilon transitions.
///
/// An automaton is a value: every edit and every algorithm takes `&self` and returns a fresh
/// automaton, the receiver is never modified. Transitions are stored as a multimap from
/// `(source, symbol)` to the set of targets. States, symbols and transitions keep the order
/// in which they were inserted, which makes iteration and rendering deterministic.
///
/// Next to the structural data, an automaton carries a [`Layout`] with positions for states and
/// edges. Edits keep it consistent with the structure, algorithms never look at it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Automaton {
    pub(crate) states: IndexedSet<StateId>,
    pub(crate) alphabet: Alphabet,
    pub(crate) transitions: IndexedMap<(StateId, Symbol), IndexedSet<StateId>>,
    pub(crate) initial: Option<StateId>,
    pub(crate) accepting: IndexedSet<StateId>,
    pub(crate) layout: Layout,
}

impl Automaton {
    /// Creates an automaton without states.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a builder for assembling an automaton from lists of states and transitions.
    pub fn builder() -> AutomatonBuilder {
        AutomatonBuilder::default()
    }

    /// Iterates over all states in insertion order.
    pub fn states(&self) -> impl Iterator<Item = &StateId> + '_ {
        self.states.iter()
    }

    /// Returns the number of states.
    pub fn size(&self) -> usize {
        self.states.len()
    }

    /// Returns true if there are no states.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Returns true if a state with the given identifier exists.
    pub fn contains_state(&self, id: &str) -> bool {
        self.states.contains(id)
    }

    /// Gives a reference to the alphabet.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Returns the alphabet in sorted order. Algorithms iterate over symbols in this order.
    pub fn sorted_alphabet(&self) -> Vec<char> {
        let mut symbols: Vec<char> = self.alphabet.iter().copied().collect();
        symbols.sort_unstable();
        symbols
    }

    /// Returns the initial state, if one is set.
    pub fn initial(&self) -> Option<&StateId> {
        self.initial.as_ref()
    }

    /// Iterates over the accepting states.
    pub fn accepting_states(&self) -> impl Iterator<Item = &StateId> + '_ {
        self.accepting.iter()
    }

    /// Returns true if `id` is an accepting state.
    pub fn is_accepting(&self, id: &str) -> bool {
        self.accepting.contains(id)
    }

    /// Returns true if any of the given states is accepting.
    pub fn contains_accepting<'a, I>(&self, states: I) -> bool
    where
        I: IntoIterator<Item = &'a StateId>,
    {
        states.into_iter().any(|q| self.accepting.contains(q))
    }

    /// Gives a reference to the positional metadata.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Iterates over all transition records, one per `(source, symbol)` pair.
    pub fn transitions(&self) -> impl Iterator<Item = TransitionRef<'_>> + '_ {
        self.transitions
            .iter()
            .map(|((from, symbol), to)| TransitionRef {
                from,
                symbol: *symbol,
                to,
            })
    }

    /// Iterates over all transitions as `(source, symbol, target)` triples.
    pub fn edges(&self) -> impl Iterator<Item = (&StateId, Symbol, &StateId)> + '_ {
        self.transitions
            .iter()
            .flat_map(|((from, symbol), to)| to.iter().map(move |q| (from, *symbol, q)))
    }

    /// Returns the number of `(source, symbol, target)` triples.
    pub fn transition_count(&self) -> usize {
        self.transitions.values().map(|to| to.len()).sum()
    }

    /// Returns true if the automaton has no transitions at all.
    pub fn has_no_transitions(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Returns the targets of the transitions leaving `from` on `symbol`.
    pub fn targets(&self, from: &str, symbol: Symbol) -> Option<&IndexedSet<StateId>> {
        self.transitions.get(&(StateId::from(from), symbol))
    }

    /// Returns true if there is a transition `from --symbol--> to`.
    pub fn has_transition(&self, from: &str, to: &str, symbol: Symbol) -> bool {
        self.targets(from, symbol)
            .map(|targets| targets.contains(to))
            .unwrap_or(false)
    }

    /// Returns all symbols on transitions from `from` to `to`, sorted.
    pub fn symbols_between(&self, from: &str, to: &str) -> Vec<Symbol> {
        let mut symbols: Vec<Symbol> = self
            .transitions
            .iter()
            .filter(|((source, _), targets)| source.as_str() == from && targets.contains(to))
            .map(|((_, symbol), _)| *symbol)
            .collect();
        symbols.sort_unstable();
        symbols.dedup();
        symbols
    }

    /// Returns true if some transition is labelled with epsilon.
    pub fn has_epsilon_transitions(&self) -> bool {
        self.transitions.keys().any(|(_, symbol)| symbol.is_epsilon())
    }

    /// Returns true if there are no epsilon transitions and no state has two targets on the
    /// same symbol. Missing transitions are allowed, so a deterministic automaton may be partial.
    pub fn is_deterministic(&self) -> bool {
        self.transitions
            .iter()
            .all(|((_, symbol), to)| !symbol.is_epsilon() && to.len() <= 1)
    }

    /// Returns true if the automaton is deterministic and every state has a transition for
    /// every symbol of the alphabet.
    pub fn is_complete_deterministic(&self) -> bool {
        self.is_deterministic()
            && self.states.iter().all(|q| {
                self.alphabet
                    .iter()
                    .all(|a| self.targets(q.as_str(), Symbol::Char(*a)).is_some())
            })
    }

    /// Returns true if an initial state exists and there is at least one transition. Only then
    /// is it meaningful to test words against the automaton, see [`Automaton::is_accepted`].
    pub fn is_testable(&self) -> bool {
        self.initial.is_some() && !self.transitions.is_empty()
    }

    /// Returns the states reachable from the initial state (following any transition,
    /// including epsilon transitions) in breadth-first order. Empty if there is no initial state.
    pub fn reachable_states(&self) -> Vec<StateId> {
        let Some(initial) = self.initial.clone() else {
            return vec![];
        };
        let mut successors: IndexedMap<&StateId, Vec<&StateId>> = IndexedMap::default();
        for (from, _, to) in self.edges() {
            successors.entry(from).or_default().push(to);
        }

        let mut seen = Set::default();
        seen.insert(initial.clone());
        let mut order = vec![];
        let mut queue = VecDeque::from([initial]);
        while let Some(q) = queue.pop_front() {
            if let Some(next) = successors.get(&q) {
                for p in next {
                    if seen.insert((*p).clone()) {
                        queue.push_back((*p).clone());
                    }
                }
            }
            order.push(q);
        }
        order
    }

    /// Returns `s<N>` where `N` is one larger than the largest numeric suffix of any state
    /// named according to that scheme, so that identifiers of deleted states are not reused
    /// while higher ones are still around.
    pub fn next_state_id(&self) -> StateId {
        let next = self
            .states
            .iter()
            .filter_map(StateId::numeric_suffix)
            .max()
            .map(|n| n + 1)
            .unwrap_or(0);
        StateId::numbered(next)
    }

    /// Returns an identifier derived from `base` that is not yet used by any state.
    pub(crate) fn fresh_state_id(&self, base: &str) -> StateId {
        if !self.contains_state(base) {
            return StateId::from(base);
        }
        (1..)
            .map(|i| StateId(format!("{base}'{i}")))
            .find(|candidate| !self.states.contains(candidate))
            .expect("there are only finitely many states")
    }

    /// Compares the structure of two automata while ignoring their layouts.
    pub fn same_structure(&self, other: &Self) -> bool {
        self.states == other.states
            && self.alphabet == other.alphabet
            && self.transitions == other.transitions
            && self.initial == other.initial
            && self.accepting == other.accepting
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn state_ids() {
        assert_eq!(StateId::from("s12").numeric_suffix(), Some(12));
        assert_eq!(StateId::from("q1").numeric_suffix(), None);
        assert_eq!(StateId::from("s").numeric_suffix(), None);
        assert_eq!(StateId::numbered(3).as_str(), "s3");
    }

    #[test]
    fn next_state_id_skips_gaps() {
        let automaton = Automaton::builder()
            .with_states(["s0", "s4", "x9"])
            .build();
        assert_eq!(automaton.next_state_id(), StateId::from("s5"));
        assert_eq!(Automaton::new().next_state_id(), StateId::from("s0"));
    }

    #[test]
    fn subset_names_are_sorted() {
        let set: StateSet = ["s2", "s0"].into_iter().map(StateId::from).collect();
        assert_eq!(state_set_name(&set).as_str(), "{s0,s2}");
        assert_eq!(state_set_name(&StateSet::new()).as_str(), "{}");
    }

    #[test]
    fn subset_names_escape_separators() {
        let pair: StateSet = ["a", "b"].into_iter().map(StateId::from).collect();
        let single: StateSet = [StateId::from("a,b")].into();
        assert_eq!(state_set_name(&pair).as_str(), "{a,b}");
        assert_eq!(state_set_name(&single).as_str(), r"{a\,b}");

        let nested: StateSet = [StateId::from("{x}"), StateId::from(r"y\")].into();
        assert_eq!(state_set_name(&nested).as_str(), r"{y\\,\{x\}}");
    }

    #[test]
    fn queries() {
        let automaton = Automaton::builder()
            .with_transitions([("s0", 'a', "s1"), ("s0", 'a', "s2"), ("s1", 'b', "s2")])
            .with_epsilon_transitions([("s2", "s0")])
            .with_initial("s0")
            .with_accepting(["s2"])
            .build();

        assert_eq!(automaton.size(), 3);
        assert_eq!(automaton.transition_count(), 4);
        assert!(!automaton.is_deterministic());
        assert!(automaton.has_epsilon_transitions());
        assert!(automaton.has_transition("s0", "s2", Symbol::Char('a')));
        assert!(!automaton.has_transition("s0", "s2", Symbol::Char('b')));
        assert_eq!(automaton.symbols_between("s2", "s0"), vec![Symbol::Epsilon]);
        assert!(automaton.is_testable());
        assert_eq!(
            automaton.reachable_states(),
            vec![StateId::from("s0"), StateId::from("s1"), StateId::from("s2")]
        );
    }

    #[test]
    fn fresh_state_ids_avoid_collisions() {
        let automaton = Automaton::builder().with_states(["{}", "{}'1"]).build();
        assert_eq!(automaton.fresh_state_id("{}").as_str(), "{}'2");
        assert_eq!(automaton.fresh_state_id("dead").as_str(), "dead");
    }
}
