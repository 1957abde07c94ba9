use tracing::{debug, trace, warn};

use crate::{
    math::{Map, Partition, Set},
    prelude::*,
};

impl Automaton {
    /// Returns the unique minimal complete deterministic automaton accepting the same language
    /// as `self`, up to the naming of states.
    ///
    /// Unreachable states are dropped, missing transitions are sent to a dead state, and states
    /// are then merged by Moore's partition refinement. Every merged state is named after its
    /// first member in insertion order. The input should be deterministic, if it is not it is
    /// determinized first. Without an initial state the result has no states.
    pub fn minimize(&self) -> Automaton {
        if self.initial().is_none() {
            debug!("automaton has no initial state, minimization yields no states");
            return Automaton {
                alphabet: self.alphabet.clone(),
                ..Default::default()
            };
        }
        let dfa = if self.is_deterministic() {
            self.trim()
        } else {
            warn!("minimizing a nondeterministic automaton, determinizing it first");
            self.determinize()
        };
        let dfa = dfa.complete();

        let partition = dfa.equivalence_partition();
        let minimal = dfa.quotient(&partition);
        debug!(
            "minimized automaton from {} to {} states",
            self.size(),
            minimal.size()
        );
        minimal
    }

    /// Returns a copy containing only the states reachable from the initial state.
    pub fn trim(&self) -> Automaton {
        let reachable: Set<StateId> = self.reachable_states().into_iter().collect();
        if reachable.len() == self.size() {
            return self.clone();
        }
        trace!("dropping {} unreachable states", self.size() - reachable.len());
        let keep = |q: &StateId| reachable.contains(q).then(|| q.clone());
        self.restrict(keep)
    }

    /// Returns a copy of a deterministic automaton in which every state has a transition for
    /// every symbol. Missing transitions lead to a new non-accepting dead state that loops on
    /// every symbol.
    pub fn complete(&self) -> Automaton {
        let symbols = self.sorted_alphabet();
        let missing: Vec<(StateId, char)> = self
            .states()
            .flat_map(|q| symbols.iter().map(move |a| (q.clone(), *a)))
            .filter(|(q, a)| self.targets(q.as_str(), Symbol::Char(*a)).is_none())
            .collect();
        if missing.is_empty() {
            return self.clone();
        }

        let mut out = self.clone();
        let dead = self.fresh_state_id("{}");
        out.insert_state(dead.clone(), None);
        for (q, a) in missing {
            out.insert_transition(q, dead.clone(), Symbol::Char(a));
        }
        for a in symbols {
            out.insert_transition(dead.clone(), dead.clone(), Symbol::Char(a));
        }
        out
    }

    /// Groups the states of a complete deterministic automaton into classes of states that
    /// accept the same language, starting from the split into accepting and rejecting states
    /// and refining until no class can be split by a single symbol.
    pub fn equivalence_partition(&self) -> Partition<StateId> {
        let symbols = self.sorted_alphabet();
        let mut block: Map<StateId, usize> = Map::default();
        let initial_split = self
            .states()
            .map(|q| (q.clone(), vec![usize::from(self.is_accepting(q.as_str()))]));
        let mut count = number_blocks(initial_split, &mut block);

        loop {
            let signatures = self
                .states()
                .map(|q| {
                    let mut signature = vec![block[q]];
                    signature.extend(symbols.iter().map(|a| {
                        self.targets(q.as_str(), Symbol::Char(*a))
                            .and_then(|to| to.first())
                            .map(|p| block[p])
                            .unwrap_or(usize::MAX)
                    }));
                    (q.clone(), signature)
                })
                .collect::<Vec<_>>();
            let mut refined = Map::default();
            let refined_count = number_blocks(signatures, &mut refined);
            block = refined;
            trace!("refined partition into {refined_count} classes");
            if refined_count == count {
                break;
            }
            count = refined_count;
        }

        let mut classes = vec![vec![]; count];
        for q in self.states() {
            classes[block[q]].push(q.clone());
        }
        Partition::new(classes)
    }

    /// Merges the states of each class of `partition` into one state named after the first
    /// member of the class in insertion order. The partition has to be a congruence.
    pub(crate) fn quotient(&self, partition: &Partition<StateId>) -> Automaton {
        let representatives: Map<StateId, StateId> = partition
            .iter()
            .flat_map(|class| {
                let representative = class
                    .iter()
                    .min_by_key(|q| self.states.get_index_of(*q))
                    .expect("classes of a partition are not empty")
                    .clone();
                class
                    .iter()
                    .map(move |q| (q.clone(), representative.clone()))
            })
            .collect();

        let mut out = Automaton {
            alphabet: self.alphabet.clone(),
            ..Default::default()
        };
        for q in self.states() {
            let representative = &representatives[q];
            if representative != q {
                continue;
            }
            out.insert_state(q.clone(), None);
            if self.is_accepting(q.as_str()) {
                out.accepting.insert(q.clone());
            }
        }
        for (from, symbol, to) in self.edges() {
            if &representatives[from] == from {
                out.insert_transition(from.clone(), representatives[to].clone(), symbol);
            }
        }
        out.initial = self.initial().map(|q| representatives[q].clone());

        let mut layout = self
            .layout
            .project(|q| (representatives.get(q)? == q).then(|| q.clone()));
        layout
            .edges
            .retain(|(from, to), _| !out.symbols_between(from.as_str(), to.as_str()).is_empty());
        out.layout = layout;
        out
    }

    fn restrict<F>(&self, keep: F) -> Automaton
    where
        F: Fn(&StateId) -> Option<StateId>,
    {
        let mut out = Automaton {
            alphabet: self.alphabet.clone(),
            initial: self.initial().and_then(&keep),
            ..Default::default()
        };
        out.states = self.states().filter_map(&keep).collect();
        out.accepting = self.accepting_states().filter_map(&keep).collect();
        for (from, symbol, to) in self.edges() {
            if let (Some(from), Some(to)) = (keep(from), keep(to)) {
                out.insert_transition(from, to, symbol);
            }
        }
        out.layout = self.layout.project(&keep);
        out
    }
}

/// Assigns consecutive numbers to the distinct signatures in order of first appearance and
/// records the number of every state in `block`. Returns the number of distinct signatures.
fn number_blocks<I>(signatures: I, block: &mut Map<StateId, usize>) -> usize
where
    I: IntoIterator<Item = (StateId, Vec<usize>)>,
{
    let mut numbers: Map<Vec<usize>, usize> = Map::default();
    for (q, signature) in signatures {
        let next = numbers.len();
        let number = *numbers.entry(signature).or_insert(next);
        block.insert(q, number);
    }
    numbers.len()
}
