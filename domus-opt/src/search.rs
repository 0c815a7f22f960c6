//! Search loop over cabin configurations.
use crate::{
    checkpoint::{self, CheckpointSaver},
    Minimizer, OptimizeResult, SearchSpace,
};
use anyhow::{bail, Result};
use chrono::Local;
use domus_core::record::{Record, RecordValue, Recorder};
use log::{debug, info};
use std::{cell::RefCell, fmt, path::PathBuf};

/// Phase of a [`SearchLoop`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchState {
    /// Nothing done yet.
    Init,
    /// Loading the history of a previous search.
    Restart,
    /// Evaluating a candidate.
    Evaluating,
    /// The running result was checkpointed.
    Checkpointed,
    /// The final result was written.
    Done,
}

impl fmt::Display for SearchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Configuration of [`SearchLoop`].
#[derive(Clone, Debug, PartialEq)]
pub struct SearchConfig {
    /// Number of new evaluations.
    pub n_calls: usize,

    /// Checkpoint written after every evaluation.
    pub checkpoint: Option<PathBuf>,

    /// Resumes from the search saved in the checkpoint.
    pub restart: bool,

    /// File receiving the final result.
    pub output: PathBuf,
}

impl SearchConfig {
    /// Configuration writing the final result to `output`.
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            n_calls: 100,
            checkpoint: None,
            restart: false,
            output: output.into(),
        }
    }

    /// Sets the number of new evaluations.
    pub fn n_calls(mut self, n_calls: usize) -> Self {
        self.n_calls = n_calls;
        self
    }

    /// Sets the checkpoint file.
    pub fn checkpoint(mut self, path: Option<PathBuf>) -> Self {
        self.checkpoint = path;
        self
    }

    /// Sets the restart flag.
    pub fn restart(mut self, restart: bool) -> Self {
        self.restart = restart;
        self
    }
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Drives a [`Minimizer`] over the candidate configurations.
///
/// ```mermaid
/// stateDiagram-v2
///     [*] --> Init
///     Init --> Restart: restart requested
///     Init --> Evaluating
///     Restart --> Evaluating: history loaded
///     Evaluating --> Checkpointed: candidate evaluated
///     Checkpointed --> Evaluating: next candidate proposed
///     Checkpointed --> Done: result written
///     Evaluating --> Done: no call
///     Done --> [*]
/// ```
///
/// The loop stays in `Checkpointed` until the minimiser hands over the next
/// candidate. [`SearchLoop::transitions`] lists the states of the last run.
///
/// * On restart, the `(x_iters, func_vals)` of the checkpoint become the
///   history of the minimiser and are not evaluated again. A missing
///   checkpoint is fatal.
/// * After every evaluation the running result is written to the checkpoint
///   file, if any, and a record with the candidate and its loss is written to
///   the recorder.
/// * The final result is written to the output file.
pub struct SearchLoop<M: Minimizer> {
    config: SearchConfig,
    minimizer: M,
    space: SearchSpace,
    transitions: RefCell<Vec<SearchState>>,
}

impl<M: Minimizer> SearchLoop<M> {
    /// Constructs the loop over `space`.
    pub fn new(config: SearchConfig, minimizer: M, space: SearchSpace) -> Self {
        Self {
            config,
            minimizer,
            space,
            transitions: RefCell::new(vec![SearchState::Init]),
        }
    }

    /// Current phase.
    pub fn state(&self) -> SearchState {
        Self::current(&self.transitions)
    }

    /// Phases entered since the start of the last run, in order.
    pub fn transitions(&self) -> Vec<SearchState> {
        self.transitions.borrow().clone()
    }

    fn current(transitions: &RefCell<Vec<SearchState>>) -> SearchState {
        transitions
            .borrow()
            .last()
            .copied()
            .unwrap_or(SearchState::Init)
    }

    fn enter(transitions: &RefCell<Vec<SearchState>>, next: SearchState) {
        let prev = Self::current(transitions);
        if prev != next {
            debug!("SearchLoop: {} -> {}", prev, next);
            transitions.borrow_mut().push(next);
        }
    }

    fn transition(&self, next: SearchState) {
        Self::enter(&self.transitions, next);
    }

    fn record(res: &OptimizeResult) -> Record {
        let mut record = Record::from_slice(&[
            ("n_evals", RecordValue::Scalar(res.len() as f32)),
            ("best_loss", RecordValue::Scalar(res.fun as f32)),
            ("best_x", RecordValue::Array1(res.x.iter().map(|&v| v as f32).collect())),
            ("time", RecordValue::DateTime(Local::now())),
        ]);
        if let (Some(x), Some(y)) = (res.x_iters.last(), res.func_vals.last()) {
            record.insert("x", RecordValue::Array1(x.iter().map(|&v| v as f32).collect()));
            record.insert("loss", RecordValue::Scalar(*y as f32));
        }
        record
    }

    /// Runs the search, minimising `objective`.
    pub fn run<F, R>(&mut self, mut objective: F, recorder: &mut R) -> Result<OptimizeResult>
    where
        F: FnMut(&[i64]) -> Result<f64>,
        R: Recorder,
    {
        self.transitions.replace(vec![SearchState::Init]);
        let history = if self.config.restart {
            self.transition(SearchState::Restart);
            let path = match &self.config.checkpoint {
                Some(path) => path,
                None => bail!("Restart requested without a checkpoint file"),
            };
            let prev = checkpoint::load(path)?;
            info!("Restarting from {:?} with {} evaluations", path, prev.len());
            Some(OptimizeResult::from_history(prev.x_iters, prev.func_vals)?)
        } else {
            None
        };

        self.transition(SearchState::Evaluating);
        let saver = self.config.checkpoint.as_ref().map(CheckpointSaver::new);
        let transitions = &self.transitions;
        let mut evaluate = |x: &[i64]| -> Result<f64> {
            Self::enter(transitions, SearchState::Evaluating);
            objective(x)
        };
        let mut callback = |res: &OptimizeResult| -> Result<()> {
            if let Some(saver) = &saver {
                saver.save(res)?;
            }
            Self::enter(transitions, SearchState::Checkpointed);
            recorder.write(Self::record(res));
            Ok(())
        };
        let res = self.minimizer.minimize(
            &mut evaluate,
            &self.space,
            self.config.n_calls,
            history,
            &mut callback,
        )?;

        checkpoint::dump(&res, &self.config.output)?;
        self.transition(SearchState::Done);
        info!("Best candidate {:?} with loss {}", res.x, res.fun);
        Ok(res)
    }
}
