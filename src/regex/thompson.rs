use super::Regex;
use crate::prelude::*;

/// A piece of the automaton under construction with a single entry and a single exit state.
#[derive(Debug, Clone)]
struct Fragment {
    entry: StateId,
    exit: StateId,
}

#[derive(Default)]
struct Thompson {
    automaton: Automaton,
    counter: usize,
}

impl Thompson {
    fn fresh(&mut self) -> StateId {
        let q = StateId::numbered(self.counter);
        self.counter += 1;
        self.automaton.insert_state(q.clone(), None);
        q
    }

    fn epsilon(&mut self, from: &StateId, to: &StateId) {
        self.automaton
            .insert_transition(from.clone(), to.clone(), Symbol::Epsilon);
    }

    fn build(&mut self, regex: &Regex) -> Fragment {
        match regex {
            Regex::Epsilon | Regex::Symbol(_) => {
                let (entry, exit) = (self.fresh(), self.fresh());
                let symbol = match regex {
                    Regex::Symbol(c) => Symbol::Char(*c),
                    _ => Symbol::Epsilon,
                };
                self.automaton
                    .insert_transition(entry.clone(), exit.clone(), symbol);
                Fragment { entry, exit }
            }
            Regex::Concat(parts) if !parts.is_empty() => {
                let fragments: Vec<Fragment> = parts.iter().map(|part| self.build(part)).collect();
                for pair in fragments.windows(2) {
                    self.epsilon(&pair[0].exit, &pair[1].entry);
                }
                Fragment {
                    entry: fragments[0].entry.clone(),
                    exit: fragments[fragments.len() - 1].exit.clone(),
                }
            }
            Regex::Union(alternatives) if !alternatives.is_empty() => {
                let entry = self.fresh();
                let fragments: Vec<Fragment> = alternatives
                    .iter()
                    .map(|alternative| self.build(alternative))
                    .collect();
                let exit = self.fresh();
                for fragment in &fragments {
                    self.epsilon(&entry, &fragment.entry);
                    self.epsilon(&fragment.exit, &exit);
                }
                Fragment { entry, exit }
            }
            Regex::Concat(_) | Regex::Union(_) => self.build(&Regex::Epsilon),
            Regex::Star(inner) => {
                let entry = self.fresh();
                let body = self.build(inner);
                let exit = self.fresh();
                self.epsilon(&entry, &body.entry);
                self.epsilon(&body.exit, &exit);
                self.epsilon(&entry, &exit);
                self.epsilon(&body.exit, &body.entry);
                Fragment { entry, exit }
            }
        }
    }
}

impl Regex {
    /// Builds an automaton with epsilon transitions for `self` by Thompson's construction.
    ///
    /// Every node contributes a fragment with one entry and one exit state, fragments are glued
    /// together with epsilon transitions. States are named `s0, s1, ...` in creation order, the
    /// entry of the whole expression is initial and its exit is the only accepting state.
    pub fn to_automaton(&self) -> Automaton {
        let mut thompson = Thompson::default();
        let Fragment { entry, exit } = thompson.build(self);
        let mut automaton = thompson.automaton;
        automaton.initial = Some(entry);
        automaton.accepting.insert(exit);
        automaton
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test_log::test]
    fn fragments_are_wired_with_epsilon() {
        let nfa = parse("a+b").unwrap().to_automaton();
        assert_eq!(nfa.size(), 6);
        assert_eq!(nfa.initial(), Some(&StateId::from("s0")));
        assert!(nfa.is_accepting("s5"));
        assert!(nfa.has_transition("s0", "s1", Symbol::Epsilon));
        assert!(nfa.has_transition("s1", "s2", Symbol::Char('a')));
        assert!(nfa.has_transition("s4", "s5", Symbol::Epsilon));
        assert!(nfa.is_accepted("a"));
        assert!(nfa.is_accepted("b"));
        assert!(!nfa.is_accepted("ab"));
    }

    #[test_log::test]
    fn star_fragment() {
        let nfa = parse("(ab)*").unwrap().to_automaton();
        assert!(nfa.has_epsilon_transitions());
        for word in ["", "ab", "abab"] {
            assert!(nfa.is_accepted(word), "{word:?}");
        }
        for word in ["a", "aba", "ba"] {
            assert!(!nfa.is_accepted(word), "{word:?}");
        }
    }

    #[test]
    fn epsilon_fragment() {
        let nfa = Regex::Epsilon.to_automaton();
        assert_eq!(nfa.size(), 2);
        assert!(nfa.alphabet().is_empty());
        assert!(nfa.is_accepted(""));
    }
}
