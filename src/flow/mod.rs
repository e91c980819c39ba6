//! Step navigation, path routing and timed work.

pub mod clock;
mod controller;
mod scheduler;
mod state;

#[cfg(test)]
pub use clock::ManualClock;
pub use clock::{Clock, SystemClock};
pub use controller::{FlowController, FlowError};
pub use scheduler::{Action, Scheduler};
pub use state::{Answer, PathScores, QuizState};
