//! Session parameters as entered by the operator, before conversion to the
//! start call's request.

use tixbuy_protocol::{Amount, Passphrase, SessionRequest};

use crate::error::{Result, TixError};

/// Start-call parameters with amounts still in coins.
#[derive(Debug, Clone, Default)]
pub struct SessionParams {
	/// Wallet passphrase, moved into the request on [`SessionParams::build`].
	pub passphrase: Passphrase,
	pub account: String,
	/// Balance to keep unspent, in coins.
	pub balance: f64,
	/// Max ticket fee, in coins.
	pub max_fee: f64,
	/// Max ticket price, in coins.
	pub max_price: f64,
	pub ticket_address: String,
}

impl SessionParams {
	pub fn with_passphrase(mut self, passphrase: Passphrase) -> Self {
		self.passphrase = passphrase;
		self
	}

	pub fn with_account(mut self, account: impl Into<String>) -> Self {
		self.account = account.into();
		self
	}

	/// Sets balance, max fee and max price, all in coins.
	pub fn with_amounts(mut self, balance: f64, max_fee: f64, max_price: f64) -> Self {
		self.balance = balance;
		self.max_fee = max_fee;
		self.max_price = max_price;
		self
	}

	pub fn with_ticket_address(mut self, address: impl Into<String>) -> Self {
		self.ticket_address = address.into();
		self
	}

	/// Converts amounts to atoms. Fails before any network activity when an
	/// amount cannot be represented.
	pub fn build(self) -> Result<SessionRequest> {
		Ok(SessionRequest {
			balance_to_maintain: atoms("--balance", self.balance)?,
			max_fee: atoms("--maxfee", self.max_fee)?,
			max_price_absolute: atoms("--maxprice", self.max_price)?,
			passphrase: self.passphrase,
			account: self.account,
			ticket_address: self.ticket_address,
		})
	}
}

fn atoms(flag: &str, coins: f64) -> Result<Amount> {
	Amount::from_coin(coins).map_err(|err| TixError::InvalidInput(format!("{flag}: {err}")))
}
