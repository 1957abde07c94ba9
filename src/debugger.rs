//! Stepping through the run of an automaton on a word, one symbol at a time.

use thiserror::Error;
use tracing::{debug, trace};

use crate::prelude::*;

/// Reasons for which [`Debugger::start`] refuses to run an automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DebuggerError {
    /// The automaton has no states at all.
    #[error("the automaton has no states")]
    NoStates,
    /// No state is marked initial.
    #[error("the automaton has no initial state")]
    NoInitialState,
}

/// Progress of a run: the set of states the automaton may be in after reading the first
/// `next_symbol_index` symbols of the test word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebuggingState {
    current_states: StateSet,
    test_word: String,
    symbols: Vec<char>,
    next_symbol_index: usize,
}

impl DebuggingState {
    /// The states the automaton may currently be in. Always closed under epsilon transitions.
    pub fn current_states(&self) -> &StateSet {
        &self.current_states
    }

    /// The word that is being run.
    pub fn test_word(&self) -> &str {
        &self.test_word
    }

    /// The number of symbols that have been read so far.
    pub fn next_symbol_index(&self) -> usize {
        self.next_symbol_index
    }

    /// The symbol that is read by the next step, if any is left.
    pub fn next_symbol(&self) -> Option<char> {
        self.symbols.get(self.next_symbol_index).copied()
    }

    /// Returns true if the whole word has been read.
    pub fn is_finished(&self) -> bool {
        self.next_symbol_index == self.symbols.len()
    }
}

/// A state machine that is either idle or running an automaton on a word.
///
/// Starting takes a snapshot of the automaton, so later edits to it do not disturb a run in
/// progress. Stepping backward does not rely on a history but replays the prefix from the
/// initial state.
///
/// ```
/// use automata_lab::prelude::*;
///
/// let automaton = compile("ab(ab)*").unwrap();
/// let mut debugger = Debugger::new();
/// debugger.start(&automaton, "ab").unwrap();
/// assert!(debugger.step_forward());
/// assert_eq!(debugger.accepted(), None);
/// debugger.run_to_completion();
/// assert_eq!(debugger.accepted(), Some(true));
/// ```
#[derive(Debug, Clone, Default)]
pub enum Debugger {
    /// Nothing is being run.
    #[default]
    Idle,
    /// A run is in progress.
    Running {
        /// The automaton that is run.
        automaton: Automaton,
        /// The progress of the run.
        state: DebuggingState,
    },
}

impl Debugger {
    /// Creates an idle debugger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts running `automaton` on `word`, replacing any run in progress. The current states
    /// are the epsilon closure of the initial state. Fails without changing anything if the
    /// automaton has no states or no initial state.
    pub fn start(
        &mut self,
        automaton: &Automaton,
        word: &str,
    ) -> Result<&DebuggingState, DebuggerError> {
        if automaton.is_empty() {
            return Err(DebuggerError::NoStates);
        }
        if automaton.initial().is_none() {
            return Err(DebuggerError::NoInitialState);
        }
        debug!("starting to debug run on {word:?}");
        *self = Debugger::Running {
            automaton: automaton.clone(),
            state: DebuggingState {
                current_states: automaton.initial_states(),
                test_word: word.to_string(),
                symbols: word.chars().collect(),
                next_symbol_index: 0,
            },
        };
        Ok(self.state().expect("debugger was just started"))
    }

    /// Ends the run in progress, if any.
    pub fn stop(&mut self) {
        *self = Debugger::Idle;
    }

    /// Returns true if a run is in progress.
    pub fn is_running(&self) -> bool {
        matches!(self, Debugger::Running { .. })
    }

    /// Gives the progress of the run, or `None` if idle.
    pub fn state(&self) -> Option<&DebuggingState> {
        match self {
            Debugger::Idle => None,
            Debugger::Running { state, .. } => Some(state),
        }
    }

    /// Returns true if a run is in progress and has read the whole word.
    pub fn is_finished(&self) -> bool {
        self.state().is_some_and(DebuggingState::is_finished)
    }

    /// Once the whole word has been read, tells whether one of the current states is
    /// accepting. Returns `None` while idle or before the end of the word.
    pub fn accepted(&self) -> Option<bool> {
        match self {
            Debugger::Running { automaton, state } if state.is_finished() => {
                Some(automaton.contains_accepting(&state.current_states))
            }
            _ => None,
        }
    }

    /// Reads the next symbol. Returns false, and does nothing, if idle or at the end of the word.
    pub fn step_forward(&mut self) -> bool {
        let Debugger::Running { automaton, state } = self else {
            return false;
        };
        let Some(symbol) = state.next_symbol() else {
            return false;
        };
        state.current_states = automaton.step(&state.current_states, symbol);
        state.next_symbol_index += 1;
        trace!(
            "read {symbol:?}, now in {} states",
            state.current_states.len()
        );
        true
    }

    /// Undoes the last step by replaying the word up to the previous symbol. Returns false, and
    /// does nothing, if idle or at the start of the word.
    pub fn step_backward(&mut self) -> bool {
        let Debugger::Running { automaton, state } = self else {
            return false;
        };
        if state.next_symbol_index == 0 {
            return false;
        }
        state.next_symbol_index -= 1;
        let prefix: String = state.symbols[..state.next_symbol_index].iter().collect();
        state.current_states = automaton.run_from(&automaton.initial_states(), &prefix);
        true
    }

    /// Steps forward until the whole word is read and returns the number of steps taken.
    pub fn run_to_completion(&mut self) -> usize {
        self.steps().count()
    }

    /// Returns an iterator that performs one forward step per call to `next` and yields the
    /// current states after it. Callers that want to animate a run can pace the iteration.
    pub fn steps(&mut self) -> Steps<'_> {
        Steps { debugger: self }
    }
}

/// Iterator over the forward steps of a [`Debugger`], see [`Debugger::steps`].
#[derive(Debug)]
pub struct Steps<'a> {
    debugger: &'a mut Debugger,
}

impl Iterator for Steps<'_> {
    type Item = StateSet;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.debugger.step_forward() {
            return None;
        }
        self.debugger
            .state()
            .map(|state| state.current_states().clone())
    }
}
