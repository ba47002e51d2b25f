//! Wire and domain types for the ticket buyer session protocol.
//!
//! This crate contains the data shapes exchanged with the remote wallet's
//! ticket buyer service. It is split into two layers:
//!
//! * Domain types ([`SessionRequest`], [`SessionConfig`], [`Amount`]) that the
//!   session controller works with.
//! * Protobuf messages in [`wire`], one set per [`ServiceFlavor`], which match the
//!   remote service's schema field-for-field.
//!
//! Types in this crate are pure data: no I/O and no logging.

pub mod amount;
pub mod flavor;
pub mod session;
pub mod wire;

pub use amount::*;
pub use flavor::*;
pub use session::*;
