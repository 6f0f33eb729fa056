//! Background run loop.
//!
//! The worker thread owns the machine outright while it runs. The caller
//! keeps a `RunHandle`, which can ask the worker to stop and later takes the
//! machine back together with a report of the run.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::hyper9::{Hyper9, StopReason};

#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    /// Maximum instructions to execute, or unbounded.
    pub limit: Option<u64>,
    pub breakpoints: Vec<u16>,
}

/// What a finished run hands back to the caller.
pub struct RunReport {
    pub machine: Hyper9,
    pub instructions: u64,
    pub elapsed: Duration,
    pub reason: StopReason,
}

impl RunReport {
    pub fn instructions_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.instructions as f64 / secs
        } else {
            0.0
        }
    }
}

pub struct RunController;

impl RunController {
    /// Move `machine` onto a worker thread and start running it.
    pub fn spawn(machine: Hyper9, options: RunOptions) -> RunHandle {
        let (stop_tx, stop_rx) = mpsc::channel();
        let worker = thread::spawn(move || run_worker(machine, options, stop_rx));
        RunHandle { stop_tx, worker }
    }
}

fn run_worker(mut machine: Hyper9, options: RunOptions, stop_rx: Receiver<()>) -> RunReport {
    let started = Instant::now();
    // A dropped handle can never collect the machine, so treat it as a stop.
    let outcome = machine.run_until(options.limit, &options.breakpoints, || {
        !matches!(stop_rx.try_recv(), Err(TryRecvError::Empty))
    });
    RunReport {
        machine,
        instructions: outcome.instructions,
        elapsed: started.elapsed(),
        reason: outcome.reason,
    }
}

pub struct RunHandle {
    stop_tx: Sender<()>,
    worker: JoinHandle<RunReport>,
}

impl RunHandle {
    /// Ask the worker to stop at its next check. Has no effect if the run
    /// already ended.
    pub fn stop(&self) {
        let _ = self.stop_tx.send(());
    }

    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Wait for the run to end and take the machine back.
    pub fn join(self) -> thread::Result<RunReport> {
        self.worker.join()
    }
}
