pub mod error;
pub mod state;
pub mod turbo9;

pub use error::CpuError;
pub use state::{CpuStateTrait, Turbo9State};
pub use turbo9::Turbo9;
