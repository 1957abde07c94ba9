use std::collections::VecDeque;

use itertools::Itertools;
use tracing::trace;

use crate::{math::Map, prelude::*};

impl Automaton {
    /// Checks whether `self` and `other` accept the same language.
    ///
    /// Both automata are run in lockstep on their sets of current states, so neither has to be
    /// deterministic. This uses the plain semantics of [`Automaton::accepts_from`], i.e. an
    /// automaton without transitions whose initial state is accepting accepts the empty word.
    pub fn equivalent(&self, other: &Automaton) -> bool {
        self.separating_word(other).is_none()
    }

    /// Attempts to find a word that is accepted by exactly one of `self` and `other`. The word
    /// returned is a shortest one, and among those the smallest with respect to the ordering of
    /// characters. Returns `None` if the two automata are equivalent.
    pub fn separating_word(&self, other: &Automaton) -> Option<String> {
        let symbols: Vec<char> = self
            .alphabet()
            .iter()
            .chain(other.alphabet())
            .copied()
            .unique()
            .sorted()
            .collect();

        let start = (self.initial_states(), other.initial_states());
        let mut reached: Map<(StateSet, StateSet), String> = Map::default();
        reached.insert(start.clone(), String::new());
        let mut queue = VecDeque::from([start]);

        while let Some(pair) = queue.pop_front() {
            let word = reached[&pair].clone();
            let (left, right) = &pair;
            if self.contains_accepting(left) != other.contains_accepting(right) {
                trace!("found separating word {word:?}");
                return Some(word);
            }
            for a in &symbols {
                let next = (self.step(left, *a), other.step(right, *a));
                if !reached.contains_key(&next) {
                    reached.insert(next.clone(), format!("{word}{a}"));
                    queue.push_back(next);
                }
            }
        }
        None
    }
}
