//! Transport and service-client layer for the ticket buyer session controller.
//!
//! * [`credentials`] turns the operator's TLS settings into channel credentials
//!   without touching the network.
//! * [`channel`] dials the remote wallet with those credentials.
//! * [`client`] wraps the dialed channel in a [`PurchaseService`] for the
//!   selected service flavor.
//! * [`fake`] is an in-memory [`PurchaseService`] for exercising callers in tests,
//!   and [`fake_wallet`] serves the same behavior over a loopback gRPC listener.

pub mod channel;
pub mod client;
pub mod credentials;
pub mod error;
pub mod fake;
pub mod fake_wallet;

pub use channel::{ChannelConfig, normalize_endpoint, open_channel};
pub use client::{Dialer, PurchaseService, TonicDialer, TonicPurchaseClient, connect_service};
pub use credentials::{Security, TransportCredentials, resolve_credentials};
pub use error::{Error, Result};
pub use fake::{FakeCall, FakeCallLog, FakeDialer, FakePurchaseService, FakeScript};
pub use fake_wallet::FakeWallet;
pub use tonic::{Code, Status};
