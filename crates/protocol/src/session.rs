//! Domain types for one purchase session.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::amount::Amount;

/// Wallet passphrase. Never printed: `Debug` is redacted and there is no `Display`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Passphrase(Vec<u8>);

impl Passphrase {
	pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
		Self(bytes.into())
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}

	/// Consumes the wrapper, handing the bytes to the wire message.
	pub fn into_bytes(self) -> Vec<u8> {
		self.0
	}
}

impl From<String> for Passphrase {
	fn from(text: String) -> Self {
		Self(text.into_bytes())
	}
}

impl fmt::Debug for Passphrase {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("Passphrase(<redacted>)")
	}
}

/// Parameters carried by the start call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRequest {
	pub passphrase: Passphrase,
	pub account: String,
	pub balance_to_maintain: Amount,
	pub max_fee: Amount,
	pub max_price_absolute: Amount,
	pub ticket_address: String,
}

/// Effective session configuration as reported by the remote service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
	pub account: String,
	pub balance_to_maintain: Amount,
	pub max_fee: Amount,
	pub max_per_block: i64,
	pub max_price_absolute: Amount,
	pub max_price_relative: f64,
	pub pool_address: String,
	pub pool_fees: f64,
	pub ticket_address: String,
}
