//! Constructions that turn one automaton into another one accepting the same language.
//!
//! The regular expression pipeline chains them as
//! `remove_epsilon` → `determinize` → `minimize` → `renumber_states`, which is available in one
//! go as [`Automaton::minimal_dfa`].

mod epsilon;

mod subset;

mod renumber;

mod equivalence;

use tracing::debug;

use crate::prelude::*;

impl Automaton {
    /// Computes the minimal complete deterministic automaton accepting the same language as
    /// `self`, with states named `s0, s1, ...` in breadth-first order.
    pub fn minimal_dfa(&self) -> Automaton {
        let minimal = self
            .remove_epsilon()
            .determinize()
            .minimize()
            .renumber_states();
        debug!(
            "reduced automaton with {} states to minimal DFA with {} states",
            self.size(),
            minimal.size()
        );
        minimal
    }
}
