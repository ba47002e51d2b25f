//! Remote service variants and their method paths.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// gRPC service that both variants are registered under.
pub const SERVICE_NAME: &str = "walletrpc.TicketBuyerService";

/// Which method set of the remote ticket buyer service to drive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceFlavor {
	/// `StartTicketPurchase` / `Config` / `StopTicketPurchase`.
	#[default]
	TicketBuyer,
	/// `StartAutoBuyer` / `StopAutoBuyer`; has no config call.
	AutoBuyer,
}

/// Fully qualified method paths for one flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodPaths {
	pub start: &'static str,
	pub describe: Option<&'static str>,
	pub stop: &'static str,
}

impl ServiceFlavor {
	pub const fn methods(self) -> MethodPaths {
		match self {
			ServiceFlavor::TicketBuyer => MethodPaths {
				start: "/walletrpc.TicketBuyerService/StartTicketPurchase",
				describe: Some("/walletrpc.TicketBuyerService/Config"),
				stop: "/walletrpc.TicketBuyerService/StopTicketPurchase",
			},
			ServiceFlavor::AutoBuyer => MethodPaths {
				start: "/walletrpc.TicketBuyerService/StartAutoBuyer",
				describe: None,
				stop: "/walletrpc.TicketBuyerService/StopAutoBuyer",
			},
		}
	}

	pub const fn supports_describe(self) -> bool {
		self.methods().describe.is_some()
	}

	pub const fn as_str(self) -> &'static str {
		match self {
			ServiceFlavor::TicketBuyer => "ticket-buyer",
			ServiceFlavor::AutoBuyer => "auto-buyer",
		}
	}
}

impl FromStr for ServiceFlavor {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"ticket-buyer" | "ticketbuyer" => Ok(ServiceFlavor::TicketBuyer),
			"auto-buyer" | "autobuyer" => Ok(ServiceFlavor::AutoBuyer),
			_ => Err(format!("unknown service flavor: {s} (expected ticket-buyer or auto-buyer)")),
		}
	}
}

/// Last segment of a method path, e.g. `StartTicketPurchase`.
pub fn method_name(path: &'static str) -> &'static str {
	path.rsplit('/').next().unwrap_or(path)
}

impl fmt::Display for ServiceFlavor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
