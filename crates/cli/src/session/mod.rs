//! Session lifecycle subsystem.
//!
//! Turns operator parameters into a start request, opens the service, and
//! drives start, describe, hold and stop against it.

/// Credential resolution followed by dialing.
pub mod connector;
/// Lifecycle controller and its outcome types.
pub mod controller;
/// Bounded hold and shutdown signal.
pub mod hold;
/// Operator parameters and conversion to the start request.
pub mod spec;

pub use connector::open_service;
pub use controller::{DescribeOutcome, LifecycleController, LifecycleOptions, LifecycleOutcome, LifecycleState};
pub use hold::{HoldOutcome, hold, shutdown_signal};
pub use spec::SessionParams;
