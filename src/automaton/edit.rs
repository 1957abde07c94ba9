use tracing::{debug, warn};

use crate::{alphabet::parse_label, prelude::*};

/// Describes a single edit of an [`Automaton`] as issued by an editor. Applying an edit through
/// [`Automaton::apply`] never modifies the automaton it is applied to, it returns the edited copy.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    /// Inserts a new state at the given position.
    AddState {
        /// Identifier of the new state.
        id: StateId,
        /// Where the state is drawn.
        position: Point,
    },
    /// Removes a state together with all transitions that touch it.
    RemoveState {
        /// The state to remove.
        id: StateId,
    },
    /// Marks a state as accepting or rejecting.
    SetAccepting {
        /// The state to change.
        id: StateId,
        /// Whether it should be accepting.
        accepting: bool,
    },
    /// Makes a state the initial state.
    SetInitial {
        /// The new initial state.
        id: StateId,
    },
    /// Unsets the initial state.
    ClearInitial,
    /// Adds a single transition.
    AddTransition {
        /// Source state.
        from: StateId,
        /// Target state.
        to: StateId,
        /// Label of the transition.
        symbol: Symbol,
    },
    /// Removes a single transition.
    RemoveTransition {
        /// Source state.
        from: StateId,
        /// Target state.
        to: StateId,
        /// Label of the transition.
        symbol: Symbol,
    },
    /// Replaces the label of the edge between two states, see [`Automaton::update_transition_symbols`].
    UpdateTransitionSymbols {
        /// Source state.
        from: StateId,
        /// Target state.
        to: StateId,
        /// The label as it was shown before the edit, e.g. `a,b`.
        old_label: String,
        /// The label entered by the user.
        new_label: String,
    },
    /// Removes every transition from one state to another.
    RemoveEdge {
        /// Source state.
        from: StateId,
        /// Target state.
        to: StateId,
    },
    /// Moves a state.
    MoveState {
        /// The state to move.
        id: StateId,
        /// Its new position.
        position: Point,
    },
    /// Changes how the edge between two states is drawn.
    SetEdgeAnchor {
        /// Source state.
        from: StateId,
        /// Target state.
        to: StateId,
        /// The new anchor.
        anchor: EdgeAnchor,
    },
}

impl Automaton {
    /// Applies a single [`Edit`] and returns the result.
    pub fn apply(&self, edit: &Edit) -> Automaton {
        match edit {
            Edit::AddState { id, position } => self.add_state(id, *position),
            Edit::RemoveState { id } => self.remove_state(id.as_str()),
            Edit::SetAccepting { id, accepting } => self.set_accepting(id.as_str(), *accepting),
            Edit::SetInitial { id } => self.set_initial(id.as_str()),
            Edit::ClearInitial => self.clear_initial(),
            Edit::AddTransition { from, to, symbol } => {
                self.add_transition(from.as_str(), to.as_str(), *symbol)
            }
            Edit::RemoveTransition { from, to, symbol } => {
                self.remove_transition(from.as_str(), to.as_str(), *symbol)
            }
            Edit::UpdateTransitionSymbols {
                from,
                to,
                old_label,
                new_label,
            } => self.update_transition_symbols(from.as_str(), to.as_str(), old_label, new_label),
            Edit::RemoveEdge { from, to } => self.remove_edge(from.as_str(), to.as_str()),
            Edit::MoveState { id, position } => self.move_state(id.as_str(), *position),
            Edit::SetEdgeAnchor { from, to, anchor } => {
                self.set_edge_anchor(from.as_str(), to.as_str(), *anchor)
            }
        }
    }

    /// Applies a sequence of edits, one after the other.
    pub fn apply_all<'a, I>(&self, edits: I) -> Automaton
    where
        I: IntoIterator<Item = &'a Edit>,
    {
        let mut out = self.clone();
        for edit in edits {
            out = out.apply(edit);
        }
        out
    }

    /// Returns a copy with an additional state `id` placed at `position`. The first state of an
    /// automaton becomes its initial state. If `id` is already taken, the copy is unchanged.
    pub fn add_state<X: Into<StateId>>(&self, id: X, position: Point) -> Automaton {
        let mut out = self.clone();
        let id = id.into();
        if !out.insert_state(id.clone(), Some(position)) {
            warn!("cannot add state {id} as it already exists");
        }
        out
    }

    /// Adds a state named by [`Automaton::next_state_id`] and returns the copy together with
    /// the identifier of the new state.
    pub fn add_next_state(&self, position: Point) -> (Automaton, StateId) {
        let id = self.next_state_id();
        (self.add_state(id.clone(), position), id)
    }

    /// Returns a copy without the state `id`. The state is dropped from the accepting states,
    /// unset as initial state, and every transition leaving it is removed. Transitions entering
    /// it lose it as a target and disappear once they have no targets left.
    pub fn remove_state(&self, id: &str) -> Automaton {
        let mut out = self.clone();
        if !out.delete_state(id) {
            warn!("cannot remove state {id} as it does not exist");
        }
        out
    }

    /// Returns a copy in which `id` is accepting if and only if `accepting` holds.
    pub fn set_accepting(&self, id: &str, accepting: bool) -> Automaton {
        let mut out = self.clone();
        if !out.contains_state(id) {
            warn!("cannot change acceptance of unknown state {id}");
            return out;
        }
        if accepting {
            out.accepting.insert(StateId::from(id));
        } else {
            out.accepting.shift_remove(id);
        }
        out
    }

    /// Returns a copy whose initial state is `id`, replacing any previous initial state.
    pub fn set_initial(&self, id: &str) -> Automaton {
        let mut out = self.clone();
        if !out.contains_state(id) {
            warn!("cannot make unknown state {id} initial");
            return out;
        }
        out.initial = Some(StateId::from(id));
        out
    }

    /// Returns a copy without initial state.
    pub fn clear_initial(&self) -> Automaton {
        let mut out = self.clone();
        out.initial = None;
        out
    }

    /// Returns a copy with the transition `from --symbol--> to`. A previously unseen character
    /// is added to the alphabet.
    pub fn add_transition(&self, from: &str, to: &str, symbol: Symbol) -> Automaton {
        let mut out = self.clone();
        if !(out.contains_state(from) && out.contains_state(to)) {
            warn!("cannot add transition from {from} to {to} as one of the states does not exist");
            return out;
        }
        out.insert_transition(StateId::from(from), StateId::from(to), symbol);
        out
    }

    /// Returns a copy without the transition `from --symbol--> to`. The alphabet is left as is.
    pub fn remove_transition(&self, from: &str, to: &str, symbol: Symbol) -> Automaton {
        let mut out = self.clone();
        if !out.delete_transition(from, to, symbol) {
            debug!("no transition from {from} to {to} on {symbol} to remove");
        }
        out
    }

    /// Returns a copy without any transition from `from` to `to`.
    pub fn remove_edge(&self, from: &str, to: &str) -> Automaton {
        let mut out = self.clone();
        for symbol in self.symbols_between(from, to) {
            out.delete_transition(from, to, symbol);
        }
        out
    }

    /// Reconciles the label of the edge from `from` to `to` after it was edited. Both labels are
    /// comma separated symbol lists (see [`parse_label`]). Symbols only in `new_label` get a
    /// transition, symbols only in `old_label` lose theirs, symbols in both stay untouched.
    pub fn update_transition_symbols(
        &self,
        from: &str,
        to: &str,
        old_label: &str,
        new_label: &str,
    ) -> Automaton {
        if !(self.contains_state(from) && self.contains_state(to)) {
            warn!("cannot relabel edge from {from} to {to} as one of the states does not exist");
            return self.clone();
        }
        let old = parse_label(old_label);
        let new = parse_label(new_label);

        let mut out = self.clone();
        for symbol in new.difference(&old) {
            out.insert_transition(StateId::from(from), StateId::from(to), *symbol);
        }
        for symbol in old.difference(&new) {
            out.delete_transition(from, to, *symbol);
        }
        out
    }

    /// Returns a copy in which `id` is drawn at `position`.
    pub fn move_state(&self, id: &str, position: Point) -> Automaton {
        let mut out = self.clone();
        if !out.contains_state(id) {
            warn!("cannot move unknown state {id}");
            return out;
        }
        out.layout.states.insert(StateId::from(id), position);
        out
    }

    /// Returns a copy in which the edge from `from` to `to` is drawn according to `anchor`.
    pub fn set_edge_anchor(&self, from: &str, to: &str, anchor: EdgeAnchor) -> Automaton {
        let mut out = self.clone();
        if self.symbols_between(from, to).is_empty() {
            warn!("cannot anchor edge from {from} to {to} as there is no such edge");
            return out;
        }
        out.layout
            .edges
            .insert((StateId::from(from), StateId::from(to)), anchor);
        out
    }

    /// Inserts a state, making it initial if it is the first one. Returns false if the
    /// state already exists, in which case nothing changes.
    pub(crate) fn insert_state(&mut self, id: StateId, position: Option<Point>) -> bool {
        if self.states.contains(&id) {
            return false;
        }
        if let Some(position) = position {
            self.layout.states.insert(id.clone(), position);
        }
        self.states.insert(id.clone());
        if self.states.len() == 1 {
            self.initial = Some(id);
        }
        true
    }

    pub(crate) fn insert_transition(&mut self, from: StateId, to: StateId, symbol: Symbol) {
        if let Symbol::Char(c) = symbol {
            self.alphabet.insert(c);
        }
        self.transitions.entry((from, symbol)).or_default().insert(to);
    }

    fn delete_transition(&mut self, from: &str, to: &str, symbol: Symbol) -> bool {
        let key = (StateId::from(from), symbol);
        let Some(targets) = self.transitions.get_mut(&key) else {
            return false;
        };
        if !targets.shift_remove(to) {
            return false;
        }
        if targets.is_empty() {
            self.transitions.shift_remove(&key);
        }
        if self.symbols_between(from, to).is_empty() {
            self.layout.edges.shift_remove(&(key.0, StateId::from(to)));
        }
        true
    }

    fn delete_state(&mut self, id: &str) -> bool {
        if !self.states.shift_remove(id) {
            return false;
        }
        if self.initial.as_ref().is_some_and(|q| q.as_str() == id) {
            self.initial = None;
        }
        self.accepting.shift_remove(id);
        self.transitions.retain(|(from, _), targets| {
            if from.as_str() == id {
                return false;
            }
            targets.shift_remove(id);
            !targets.is_empty()
        });
        self.layout.states.shift_remove(id);
        self.layout
            .edges
            .retain(|(from, to), _| from.as_str() != id && to.as_str() != id);
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    fn two_states() -> Automaton {
        Automaton::new()
            .add_state("s1", Point::new(0.0, 0.0))
            .add_state("s2", Point::new(10.0, 10.0))
    }

    #[test_log::test]
    fn manage_states() {
        let automaton = two_states();
        assert_eq!(automaton.initial(), Some(&StateId::from("s1")));
        assert_eq!(
            automaton.layout().state_position("s2"),
            Some(Point::new(10.0, 10.0))
        );
        assert_eq!(automaton.accepting_states().count(), 0);

        let automaton = automaton.remove_state("s1");
        assert_eq!(automaton.initial(), None);
        assert!(!automaton.contains_state("s1"));
        assert_eq!(automaton.layout().state_position("s1"), None);

        let automaton = automaton.set_accepting("s2", true);
        assert!(automaton.is_accepting("s2"));
        assert!(automaton.set_accepting("s2", true).is_accepting("s2"));
        assert!(!automaton.set_accepting("s2", false).is_accepting("s2"));
    }

    #[test_log::test]
    fn edits_leave_the_original_untouched() {
        let original = two_states().add_transition("s1", "s2", Symbol::Char('a'));
        let snapshot = original.clone();

        let _ = original.remove_state("s2");
        let _ = original.add_transition("s2", "s1", Symbol::Char('b'));
        let _ = original.move_state("s1", Point::new(5.0, 5.0));
        let _ = original.set_edge_anchor("s1", "s2", EdgeAnchor::straight());
        assert_eq!(original, snapshot);
    }

    #[test_log::test]
    fn duplicate_and_unknown_states_are_noops() {
        let automaton = two_states();
        assert_eq!(automaton.add_state("s1", Point::new(3.0, 3.0)), automaton);
        assert_eq!(automaton.remove_state("nope"), automaton);
        assert_eq!(automaton.set_accepting("nope", true), automaton);
        assert_eq!(automaton.set_initial("nope"), automaton);
        assert_eq!(
            automaton.add_transition("s1", "nope", Symbol::Char('a')),
            automaton
        );
    }

    #[test_log::test]
    fn add_then_remove_state_round_trips() {
        let automaton = Automaton::builder()
            .with_transitions([("s0", 'a', "s1"), ("s1", 'b', "s0")])
            .with_accepting(["s1"])
            .build();
        let with_new = automaton.add_state("s_new", Point::new(1.0, 2.0));
        assert_eq!(with_new.remove_state("s_new"), automaton);

        let connected = with_new
            .add_transition("s0", "s_new", Symbol::Char('a'))
            .add_transition("s_new", "s1", Symbol::Char('c'));
        let expected = Automaton::builder()
            .with_transitions([("s0", 'a', "s1"), ("s1", 'b', "s0")])
            .with_alphabet_symbols(['c'])
            .with_accepting(["s1"])
            .build();
        assert!(connected.remove_state("s_new").same_structure(&expected));

        let empty = Automaton::new();
        assert_eq!(
            empty.add_state("s_new", Point::default()).remove_state("s_new"),
            empty
        );
    }

    #[test_log::test]
    fn removing_a_target_state() {
        let automaton = Automaton::builder()
            .with_transitions([
                ("s0", 'a', "s1"),
                ("s0", 'b', "s1"),
                ("s0", 'b', "s2"),
                ("s1", 'a', "s0"),
            ])
            .build();

        let pruned = automaton.remove_state("s1");
        assert!(pruned.targets("s0", Symbol::Char('a')).is_none());
        assert_eq!(
            pruned
                .targets("s0", Symbol::Char('b'))
                .map(|to| to.iter().cloned().collect::<Vec<_>>()),
            Some(vec![StateId::from("s2")])
        );
        assert_eq!(pruned.transition_count(), 1);
        assert_eq!(pruned.sorted_alphabet(), vec!['a', 'b']);
    }

    #[test_log::test]
    fn manage_transitions() {
        let automaton = two_states()
            .update_transition_symbols("s1", "s1", "", "a,b")
            .update_transition_symbols("s1", "s2", "", "c");
        assert_eq!(automaton.transition_count(), 3);
        assert_eq!(automaton.sorted_alphabet(), vec!['a', 'b', 'c']);

        let automaton = automaton.remove_edge("s1", "s1");
        assert_eq!(automaton.transition_count(), 1);
        assert!(automaton.has_transition("s1", "s2", Symbol::Char('c')));
        assert_eq!(automaton.sorted_alphabet(), vec!['a', 'b', 'c']);
    }

    #[test_log::test]
    fn relabelling_an_edge() {
        let automaton = two_states()
            .add_transition("s1", "s2", Symbol::Char('a'))
            .add_transition("s1", "s2", Symbol::Char('b'))
            .set_edge_anchor("s1", "s2", EdgeAnchor::straight());

        let relabelled = automaton.update_transition_symbols("s1", "s2", "a,b", "b,c");
        assert_eq!(
            relabelled.symbols_between("s1", "s2"),
            vec![Symbol::Char('b'), Symbol::Char('c')]
        );
        assert!(relabelled.layout().edge_anchor("s1", "s2").is_some());

        let cleared = relabelled.update_transition_symbols("s1", "s2", "b,c", "");
        assert!(cleared.symbols_between("s1", "s2").is_empty());
        assert!(cleared.layout().edge_anchor("s1", "s2").is_none());
    }

    #[test_log::test]
    fn removing_transitions() {
        let automaton = Automaton::builder()
            .with_transitions([("s0", 'a', "s1"), ("s0", 'a', "s2")])
            .build();
        let once = automaton.remove_transition("s0", "s1", Symbol::Char('a'));
        assert_eq!(once.transition_count(), 1);
        let twice = once.remove_transition("s0", "s2", Symbol::Char('a'));
        assert!(twice.has_no_transitions());
        assert_eq!(twice.sorted_alphabet(), vec!['a']);
        assert_eq!(twice.remove_transition("s0", "s2", Symbol::Char('a')), twice);
    }

    #[test_log::test]
    fn edits_as_values() {
        let edits = [
            Edit::AddState {
                id: "s0".into(),
                position: Point::new(60.0, 60.0),
            },
            Edit::AddState {
                id: "s1".into(),
                position: Point::new(180.0, 60.0),
            },
            Edit::UpdateTransitionSymbols {
                from: "s0".into(),
                to: "s1".into(),
                old_label: String::new(),
                new_label: "a".into(),
            },
            Edit::SetAccepting {
                id: "s1".into(),
                accepting: true,
            },
            Edit::SetInitial { id: "s1".into() },
            Edit::SetInitial { id: "s0".into() },
        ];
        let automaton = Automaton::new().apply_all(&edits);
        assert!(automaton.is_accepted("a"));
        assert!(!automaton.apply(&Edit::ClearInitial).is_accepted("a"));
        assert!(!automaton
            .apply(&Edit::RemoveEdge {
                from: "s0".into(),
                to: "s1".into()
            })
            .is_accepted("a"));

        let (with_next, id) = automaton.add_next_state(Point::default());
        assert_eq!(id, StateId::from("s2"));
        assert!(with_next.contains_state("s2"));
    }
}
