//! Fixed-point currency amounts in minor units.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of minor units in one coin. The remote service uses the same scale.
pub const ATOMS_PER_COIN: i64 = 100_000_000;

const ATOMS_PER_COIN_F64: f64 = ATOMS_PER_COIN as f64;

/// Rejected decimal input.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum AmountError {
	#[error("amount {0} is not a finite number")]
	NotFinite(f64),
	#[error("amount {0} is out of range")]
	OutOfRange(f64),
}

/// A currency amount expressed as an integer number of minor units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
	pub const ZERO: Amount = Amount(0);

	/// Wraps a raw minor-unit value as received from the wire.
	pub const fn from_atoms(atoms: i64) -> Self {
		Self(atoms)
	}

	/// Converts a decimal coin value with `round(value * 1e8)`.
	///
	/// Sign is not checked here; the remote service owns range validation.
	pub fn from_coin(value: f64) -> Result<Self, AmountError> {
		if !value.is_finite() {
			return Err(AmountError::NotFinite(value));
		}

		let scaled = (value * ATOMS_PER_COIN_F64).round();
		// i64::MAX is not representable as f64; the cast rounds up to 2^63.
		if scaled >= i64::MAX as f64 || scaled < i64::MIN as f64 {
			return Err(AmountError::OutOfRange(value));
		}

		Ok(Self(scaled as i64))
	}

	pub const fn atoms(self) -> i64 {
		self.0
	}

	/// Decimal coin value, used for display only.
	pub fn to_coin(self) -> f64 {
		self.0 as f64 / ATOMS_PER_COIN_F64
	}
}

impl fmt::Display for Amount {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.to_coin())
	}
}
