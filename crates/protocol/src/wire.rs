//! Protobuf messages of the remote `walletrpc.TicketBuyerService`.
//!
//! Field tags follow the service's `.proto` schema. Both method sets share the
//! empty stop/config requests; only the start request and the config response
//! differ in shape.

use crate::amount::Amount;
use crate::session::{Passphrase, SessionConfig, SessionRequest};

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StartTicketPurchaseRequest {
	#[prost(bytes = "vec", tag = "1")]
	pub passphrase: Vec<u8>,
	#[prost(string, tag = "2")]
	pub account_name: String,
	#[prost(int64, tag = "3")]
	pub balance_to_maintain: i64,
	#[prost(int64, tag = "4")]
	pub max_fee: i64,
	#[prost(int64, tag = "5")]
	pub max_price_absolute: i64,
	#[prost(string, tag = "6")]
	pub ticket_address: String,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct StartTicketPurchaseResponse {}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct StopTicketPurchaseRequest {}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct StopTicketPurchaseResponse {}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct TicketBuyerConfigRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TicketBuyerConfigResponse {
	#[prost(string, tag = "1")]
	pub account_name: String,
	#[prost(int64, tag = "2")]
	pub balance_to_maintain: i64,
	#[prost(int64, tag = "3")]
	pub max_fee: i64,
	#[prost(int64, tag = "4")]
	pub max_per_block: i64,
	#[prost(int64, tag = "5")]
	pub max_price_absolute: i64,
	#[prost(double, tag = "6")]
	pub max_price_relative: f64,
	#[prost(string, tag = "7")]
	pub pool_address: String,
	#[prost(double, tag = "8")]
	pub pool_fees: f64,
	#[prost(string, tag = "9")]
	pub ticket_address: String,
}

/// Start request of the auto-buyer method set. The fee limit is per kilobyte
/// there, and the ticket address is called the voting address.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StartAutoBuyerRequest {
	#[prost(bytes = "vec", tag = "1")]
	pub passphrase: Vec<u8>,
	#[prost(string, tag = "2")]
	pub account_name: String,
	#[prost(int64, tag = "3")]
	pub balance_to_maintain: i64,
	#[prost(int64, tag = "4")]
	pub max_fee_per_kb: i64,
	#[prost(int64, tag = "6")]
	pub max_price_absolute: i64,
	#[prost(string, tag = "7")]
	pub voting_address: String,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct StartAutoBuyerResponse {}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct StopAutoBuyerRequest {}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct StopAutoBuyerResponse {}

impl From<SessionRequest> for StartTicketPurchaseRequest {
	fn from(request: SessionRequest) -> Self {
		Self {
			passphrase: request.passphrase.into_bytes(),
			account_name: request.account,
			balance_to_maintain: request.balance_to_maintain.atoms(),
			max_fee: request.max_fee.atoms(),
			max_price_absolute: request.max_price_absolute.atoms(),
			ticket_address: request.ticket_address,
		}
	}
}

impl From<SessionRequest> for StartAutoBuyerRequest {
	fn from(request: SessionRequest) -> Self {
		Self {
			passphrase: request.passphrase.into_bytes(),
			account_name: request.account,
			balance_to_maintain: request.balance_to_maintain.atoms(),
			max_fee_per_kb: request.max_fee.atoms(),
			max_price_absolute: request.max_price_absolute.atoms(),
			voting_address: request.ticket_address,
		}
	}
}

impl From<TicketBuyerConfigResponse> for SessionConfig {
	fn from(resp: TicketBuyerConfigResponse) -> Self {
		Self {
			account: resp.account_name,
			balance_to_maintain: Amount::from_atoms(resp.balance_to_maintain),
			max_fee: Amount::from_atoms(resp.max_fee),
			max_per_block: resp.max_per_block,
			max_price_absolute: Amount::from_atoms(resp.max_price_absolute),
			max_price_relative: resp.max_price_relative,
			pool_address: resp.pool_address,
			pool_fees: resp.pool_fees,
			ticket_address: resp.ticket_address,
		}
	}
}

// Server-side decoding, used by in-process test wallets.

impl From<StartTicketPurchaseRequest> for SessionRequest {
	fn from(req: StartTicketPurchaseRequest) -> Self {
		Self {
			passphrase: Passphrase::new(req.passphrase),
			account: req.account_name,
			balance_to_maintain: Amount::from_atoms(req.balance_to_maintain),
			max_fee: Amount::from_atoms(req.max_fee),
			max_price_absolute: Amount::from_atoms(req.max_price_absolute),
			ticket_address: req.ticket_address,
		}
	}
}

impl From<StartAutoBuyerRequest> for SessionRequest {
	fn from(req: StartAutoBuyerRequest) -> Self {
		Self {
			passphrase: Passphrase::new(req.passphrase),
			account: req.account_name,
			balance_to_maintain: Amount::from_atoms(req.balance_to_maintain),
			max_fee: Amount::from_atoms(req.max_fee_per_kb),
			max_price_absolute: Amount::from_atoms(req.max_price_absolute),
			ticket_address: req.voting_address,
		}
	}
}

impl From<SessionConfig> for TicketBuyerConfigResponse {
	fn from(config: SessionConfig) -> Self {
		Self {
			account_name: config.account,
			balance_to_maintain: config.balance_to_maintain.atoms(),
			max_fee: config.max_fee.atoms(),
			max_per_block: config.max_per_block,
			max_price_absolute: config.max_price_absolute.atoms(),
			max_price_relative: config.max_price_relative,
			pool_address: config.pool_address,
			pool_fees: config.pool_fees,
			ticket_address: config.ticket_address,
		}
	}
}
