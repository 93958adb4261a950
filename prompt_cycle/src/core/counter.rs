//! Step counter state machine.
//!
//! The n-th emission after a fresh start is `start_value + n * step` with
//! `step_index = n`. A bounded counter (`max_steps >= 0`) turns terminal once
//! `step_index >= max_steps` and then either holds or restarts.

use tracing::debug;

/// Inputs that shape the sequence. A change between calls restarts it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterParams {
    pub start_value: f64,
    pub step: f64,
    /// Negative means unbounded.
    pub max_steps: i64,
    pub auto_reset: bool,
}

/// One counter output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Emission {
    pub value: f64,
    pub step_index: i64,
    pub done: bool,
}

/// Per-instance counter state.
///
/// `step_index` is 0 before the first emission and 1-based afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CounterState {
    current_value: f64,
    step_index: i64,
    done: bool,
    params: Option<CounterParams>,
}

fn is_terminal(step_index: i64, max_steps: i64) -> bool {
    max_steps >= 0 && step_index >= max_steps
}

impl CounterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one tick.
    ///
    /// `reset`, a parameter change, and (with `auto_reset`) a terminal prior
    /// state all restart the sequence and emit its first value in the same
    /// call. A terminal state without `auto_reset` is returned unchanged.
    pub fn advance(&mut self, params: CounterParams, reset: bool) -> Emission {
        let params_changed = self.params.is_some_and(|previous| previous != params);
        if self.params.is_none() {
            self.restart(params);
        }

        if reset || params_changed {
            debug!(reset, params_changed, "counter restarted");
            self.restart(params);
            return self.emit(params);
        }

        if self.done {
            if params.auto_reset {
                debug!(max_steps = params.max_steps, "counter auto-reset");
                self.restart(params);
                return self.emit(params);
            }
            debug!(step_index = self.step_index, "counter holding terminal state");
            return self.current();
        }

        self.emit(params)
    }

    /// Last emitted value (or the pre-emission state).
    pub fn current(&self) -> Emission {
        Emission {
            value: self.current_value,
            step_index: self.step_index,
            done: self.done,
        }
    }

    fn restart(&mut self, params: CounterParams) {
        self.params = Some(params);
        self.current_value = params.start_value;
        self.step_index = 0;
        self.done = is_terminal(0, params.max_steps);
    }

    fn emit(&mut self, params: CounterParams) -> Emission {
        self.current_value += params.step;
        self.step_index = self.step_index.saturating_add(1);
        self.done = is_terminal(self.step_index, params.max_steps);
        self.current()
    }
}
