//! Operator-facing reporting of lifecycle milestones.

mod format;
mod model;
mod report;

pub use format::OutputFormat;
pub use model::LifecycleEvent;
pub use report::{JsonReporter, Reporter, TextReporter, stdout_reporter};
