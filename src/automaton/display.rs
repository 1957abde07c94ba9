use std::fmt::Display;

use itertools::Itertools;

use crate::{
    alphabet::format_label,
    math::{IndexedMap, OrderedSet},
    prelude::*,
};

/// All transitions from one state to another, collapsed into a single edge as it is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeGroup {
    /// Source state.
    pub from: StateId,
    /// Target state.
    pub to: StateId,
    /// The symbols of all transitions from `from` to `to`, sorted and without duplicates.
    pub symbols: Vec<Symbol>,
}

impl EdgeGroup {
    /// Renders the symbols as a comma separated label such as `a,b`.
    pub fn label(&self) -> String {
        format_label(&self.symbols)
    }

    /// Returns true if the edge starts and ends in the same state.
    pub fn is_loop(&self) -> bool {
        self.from == self.to
    }
}

impl Automaton {
    /// Collapses all transitions that share source and target into one [`EdgeGroup`]. Groups
    /// appear in the order in which their first transition was inserted, the symbols of each
    /// group are sorted, so the result only depends on the automaton.
    pub fn group_transitions_for_display(&self) -> Vec<EdgeGroup> {
        let mut groups: IndexedMap<(&StateId, &StateId), OrderedSet<Symbol>> =
            IndexedMap::default();
        for (from, symbol, to) in self.edges() {
            groups.entry((from, to)).or_default().insert(symbol);
        }
        groups
            .into_iter()
            .map(|((from, to), symbols)| EdgeGroup {
                from: from.clone(),
                to: to.clone(),
                symbols: symbols.into_iter().collect(),
            })
            .collect()
    }

    /// Returns a string representation of the transition table. The initial state is marked
    /// with `→`, accepting states with `*`, and missing transitions are shown as `-`.
    pub fn transition_table(&self) -> String {
        let mut columns: Vec<Symbol> = vec![];
        if self.has_epsilon_transitions() {
            columns.push(Symbol::Epsilon);
        }
        columns.extend(self.sorted_alphabet().into_iter().map(Symbol::Char));

        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once("State".to_string()).chain(columns.iter().map(|s| s.to_string())),
        );
        for q in self.states() {
            let mut row = vec![format!(
                "{}{}{}",
                if self.initial() == Some(q) { "→" } else { "" },
                if self.is_accepting(q.as_str()) { "*" } else { "" },
                q
            )];
            for symbol in &columns {
                row.push(match self.targets(q.as_str(), *symbol) {
                    Some(targets) => targets.iter().join(","),
                    None => "-".to_string(),
                });
            }
            builder.push_record(row);
        }

        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }
}

impl Display for Automaton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.transition_table())
    }
}
