use std::collections::VecDeque;

use crate::{
    math::{Bijection, IndexedSet},
    prelude::*,
};

impl Automaton {
    /// Renames all states to `s0, s1, ...`. States are numbered in breadth-first order from
    /// the initial state, following symbols in sorted order (epsilon first), followed by the
    /// unreachable states in insertion order. Transitions, initial and accepting states and the
    /// layout are carried over. For minimal deterministic automata the result is canonical: two
    /// of them accept the same language if and only if their renumbered forms are equal.
    pub fn renumber_states(&self) -> Automaton {
        self.renumber_states_with_bijection().0
    }

    /// Works as [`Automaton::renumber_states`], but also returns the mapping from old to new
    /// state identifiers.
    pub fn renumber_states_with_bijection(&self) -> (Automaton, Bijection<StateId, StateId>) {
        let order = self.canonical_order();
        let mut map = Bijection::new();
        for (i, q) in order.iter().enumerate() {
            map.insert(q.clone(), StateId::numbered(i));
        }
        let rename = |q: &StateId| {
            map.get_by_left(q)
                .cloned()
                .expect("every state is numbered")
        };

        let mut out = Automaton {
            alphabet: self.alphabet.clone(),
            ..Default::default()
        };
        for q in &order {
            out.insert_state(rename(q), None);
        }
        out.initial = self.initial().map(rename);
        out.accepting = order
            .iter()
            .filter(|q| self.is_accepting(q.as_str()))
            .map(rename)
            .collect();
        for q in &order {
            for symbol in self.sorted_symbols() {
                let Some(targets) = self.targets(q.as_str(), symbol) else {
                    continue;
                };
                for p in targets {
                    out.insert_transition(rename(q), rename(p), symbol);
                }
            }
        }
        out.layout = self.layout.project(|q| map.get_by_left(q).cloned());
        (out, map)
    }

    fn sorted_symbols(&self) -> impl Iterator<Item = Symbol> {
        std::iter::once(Symbol::Epsilon).chain(self.sorted_alphabet().into_iter().map(Symbol::Char))
    }

    fn canonical_order(&self) -> Vec<StateId> {
        let mut order: IndexedSet<StateId> = IndexedSet::default();
        if let Some(initial) = self.initial() {
            order.insert(initial.clone());
            let mut queue = VecDeque::from([initial.clone()]);
            while let Some(q) = queue.pop_front() {
                for symbol in self.sorted_symbols() {
                    let Some(targets) = self.targets(q.as_str(), symbol) else {
                        continue;
                    };
                    for p in targets {
                        if order.insert(p.clone()) {
                            queue.push_back(p.clone());
                        }
                    }
                }
            }
        }
        order.extend(self.states().cloned());
        order.into_iter().collect()
    }
}
