//! Solve lifecycle: owns one problem, drives one integrator, emits samples,
//! classifies the terminal outcome.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam::channel::{unbounded, Receiver, Sender};
use nalgebra::DVector;
use thiserror::Error;

use crate::numerics::integrator::{BdfIntegrator, DaeIntegrator, StepFailure};
use crate::numerics::newton::SolverError;
use crate::numerics::problem::SolverProblem;

/// One output point: the state at `time`, split into the differential and
/// algebraic unknowns in slot order.
#[derive(Debug, Clone)]
pub struct Sample {
    pub time: f64,
    pub differential: DVector<f64>,
    pub algebraic: DVector<f64>,
}

/// Why a run stopped.
#[derive(Debug, Error)]
pub enum SolveError {
    #[error("initial condition correction failed: {0}")]
    InitialConditionFailure(#[source] SolverError),
    #[error("solver step failed: {0}")]
    SolverStepFailure(#[source] StepFailure),
}

#[derive(Debug)]
pub enum TerminalStatus {
    Completed,
    Failed(SolveError),
    Cancelled,
}

impl TerminalStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, TerminalStatus::Completed)
    }
}

/// Everything a finished run leaves behind. The samples are ordered by
/// strictly increasing time and stay re-readable; on failure the last valid
/// sample is the final entry.
#[derive(Debug)]
pub struct RunReport {
    pub status: TerminalStatus,
    pub samples: Vec<Sample>,
    pub steps: usize,
    pub final_time: f64,
}

/// Cooperative cancellation flag, honored at step boundaries only.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// One solve, consumed by [`run`](SolveSession::run). State machine:
/// `Initialized → Stepping → {Completed | Failed | Cancelled}`; no terminal
/// state is re-enterable. A new session is needed for a new run, which the
/// by-value `run` makes a compile-time property.
pub struct SolveSession<I = BdfIntegrator> {
    problem: SolverProblem,
    integrator: I,
    cancel: CancelToken,
    sender: Option<Sender<Sample>>,
    logging: bool,
}

impl SolveSession<BdfIntegrator> {
    pub fn new(problem: SolverProblem) -> Self {
        Self::with_integrator(problem, BdfIntegrator::default())
    }
}

impl<I: DaeIntegrator> SolveSession<I> {
    pub fn with_integrator(problem: SolverProblem, integrator: I) -> Self {
        Self {
            problem,
            integrator,
            cancel: CancelToken::default(),
            sender: None,
            logging: false,
        }
    }

    pub fn with_logging(mut self, logging: bool) -> Self {
        self.logging = logging;
        self
    }

    /// Forward every sample through `sender` as it is produced, in addition
    /// to collecting it in the report. The session never calls back into
    /// caller code.
    pub fn with_sample_sender(mut self, sender: Sender<Sample>) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Handle for requesting cancellation from another thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Drive the integration to the end time, a failure, or cancellation.
    pub fn run(mut self) -> RunReport {
        let mut samples: Vec<Sample> = Vec::new();
        let mut steps = 0usize;

        if self.cancel.is_cancelled() {
            return RunReport {
                status: TerminalStatus::Cancelled,
                samples,
                steps,
                final_time: 0.0,
            };
        }

        if self.logging {
            println!(
                "Starting solve: t = 0 -> {:.3e} s, {} unknowns ({} differential, {} algebraic)",
                self.problem.t_end,
                self.problem.layout.len(),
                self.problem.layout.n_differential(),
                self.problem.layout.n_algebraic(),
            );
        }

        if let Err(e) = self.integrator.initialize(&self.problem) {
            return RunReport {
                status: TerminalStatus::Failed(SolveError::InitialConditionFailure(e)),
                samples,
                steps,
                final_time: 0.0,
            };
        }

        // The corrected rest state is the first sample.
        let first = self.make_sample(self.integrator.time(), self.integrator.state());
        self.emit(&mut samples, first);

        let status = loop {
            if self.cancel.is_cancelled() {
                break TerminalStatus::Cancelled;
            }
            if self.integrator.time() >= self.problem.t_end {
                break TerminalStatus::Completed;
            }

            match self.integrator.advance(&self.problem) {
                Ok(step) => {
                    steps += 1;
                    if self.logging {
                        println!(
                            "Step {:>4} | t = {:.4e} | iters = {}",
                            steps, step.time, step.newton_iterations
                        );
                    }
                    let sample = self.make_sample(step.time, &step.state);
                    self.emit(&mut samples, sample);
                }
                Err(failure) => {
                    break TerminalStatus::Failed(SolveError::SolverStepFailure(failure));
                }
            }
        };

        let final_time = samples.last().map(|s| s.time).unwrap_or(0.0);
        RunReport {
            status,
            samples,
            steps,
            final_time,
        }
    }

    /// Run on a worker thread; samples stream through the returned channel
    /// while the report arrives through the join handle.
    pub fn spawn(self) -> (JoinHandle<RunReport>, Receiver<Sample>, CancelToken)
    where
        I: Send + 'static,
    {
        let token = self.cancel_token();
        let (tx, rx) = unbounded();
        let session = self.with_sample_sender(tx);
        let handle = thread::spawn(move || session.run());
        (handle, rx, token)
    }

    fn make_sample(&self, time: f64, state: &DVector<f64>) -> Sample {
        let (differential, algebraic) = self.problem.layout.split(state);
        Sample {
            time,
            differential,
            algebraic,
        }
    }

    fn emit(&self, samples: &mut Vec<Sample>, sample: Sample) {
        if let Some(sender) = &self.sender {
            // A dropped receiver is not an error; the report still collects
            // everything.
            let _ = sender.send(sample.clone());
        }
        samples.push(sample);
    }
}
