pub mod hyper9;
pub mod run;

pub use hyper9::{Hyper9, RunOutcome, STOP_CHECK_INTERVAL, StopReason};
pub use run::{RunController, RunHandle, RunOptions, RunReport};
