//! Service-client abstraction over the two remote method sets.

use async_trait::async_trait;
use tixbuy_protocol::wire::{
	StartAutoBuyerRequest, StartAutoBuyerResponse, StartTicketPurchaseRequest, StartTicketPurchaseResponse, StopAutoBuyerRequest, StopAutoBuyerResponse,
	StopTicketPurchaseRequest, StopTicketPurchaseResponse, TicketBuyerConfigRequest, TicketBuyerConfigResponse,
};
use tixbuy_protocol::{ServiceFlavor, SessionConfig, SessionRequest, method_name};
use tonic::client::Grpc;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::Channel;
use tracing::debug;

use crate::channel::{ChannelConfig, open_channel};
use crate::credentials::TransportCredentials;
use crate::error::{Error, Result};

/// The three-call contract shared by every flavor of the remote service.
///
/// Calls are issued once each and never retried by implementations.
#[async_trait]
pub trait PurchaseService: Send {
	fn flavor(&self) -> ServiceFlavor;

	/// Starts purchasing. The request, passphrase included, is consumed.
	async fn start(&mut self, request: SessionRequest) -> Result<()>;

	/// Reads the effective configuration, or `Ok(None)` when the flavor has no
	/// config call.
	async fn describe(&mut self) -> Result<Option<SessionConfig>>;

	async fn stop(&mut self) -> Result<()>;
}

/// Opens a channel and returns a ready service client. Split from
/// [`TonicDialer`] so callers can swap the transport in tests.
#[async_trait]
pub trait Dialer: Send + Sync {
	async fn dial(&self, config: &ChannelConfig, credentials: TransportCredentials) -> Result<Box<dyn PurchaseService>>;
}

/// Production dialer: tonic channel plus the flavor's method set.
#[derive(Debug, Clone, Copy)]
pub struct TonicDialer {
	flavor: ServiceFlavor,
}

impl TonicDialer {
	pub fn new(flavor: ServiceFlavor) -> Self {
		Self { flavor }
	}
}

#[async_trait]
impl Dialer for TonicDialer {
	async fn dial(&self, config: &ChannelConfig, credentials: TransportCredentials) -> Result<Box<dyn PurchaseService>> {
		let client = connect_service(config, credentials, self.flavor).await?;
		Ok(Box::new(client))
	}
}

/// Dials `config` and wraps the channel for `flavor`.
pub async fn connect_service(config: &ChannelConfig, credentials: TransportCredentials, flavor: ServiceFlavor) -> Result<TonicPurchaseClient> {
	let channel = open_channel(config, credentials).await?;
	Ok(TonicPurchaseClient::new(channel, flavor))
}

/// gRPC client for `walletrpc.TicketBuyerService`.
#[derive(Debug, Clone)]
pub struct TonicPurchaseClient {
	inner: Grpc<Channel>,
	flavor: ServiceFlavor,
}

impl TonicPurchaseClient {
	pub fn new(channel: Channel, flavor: ServiceFlavor) -> Self {
		Self {
			inner: Grpc::new(channel),
			flavor,
		}
	}

	async fn unary<Req, Resp>(&mut self, path: &'static str, request: Req) -> Result<Resp>
	where
		Req: prost::Message + Send + Sync + 'static,
		Resp: prost::Message + Default + Send + Sync + 'static,
	{
		let method = method_name(path);
		self.inner.ready().await.map_err(|err| Error::Rpc {
			method,
			status: tonic::Status::unavailable(format!("service was not ready: {err}")),
		})?;

		debug!(target = "tixbuy.transport", %method, "calling");
		let codec: ProstCodec<Req, Resp> = ProstCodec::default();
		let response = self
			.inner
			.unary(tonic::Request::new(request), PathAndQuery::from_static(path), codec)
			.await
			.map_err(|status| Error::Rpc { method, status })?;

		Ok(response.into_inner())
	}
}

#[async_trait]
impl PurchaseService for TonicPurchaseClient {
	fn flavor(&self) -> ServiceFlavor {
		self.flavor
	}

	async fn start(&mut self, request: SessionRequest) -> Result<()> {
		let path = self.flavor.methods().start;
		match self.flavor {
			ServiceFlavor::TicketBuyer => {
				let _: StartTicketPurchaseResponse = self.unary(path, StartTicketPurchaseRequest::from(request)).await?;
			}
			ServiceFlavor::AutoBuyer => {
				let _: StartAutoBuyerResponse = self.unary(path, StartAutoBuyerRequest::from(request)).await?;
			}
		}
		Ok(())
	}

	async fn describe(&mut self) -> Result<Option<SessionConfig>> {
		let Some(path) = self.flavor.methods().describe else {
			return Ok(None);
		};
		let resp: TicketBuyerConfigResponse = self.unary(path, TicketBuyerConfigRequest {}).await?;
		Ok(Some(resp.into()))
	}

	async fn stop(&mut self) -> Result<()> {
		let path = self.flavor.methods().stop;
		match self.flavor {
			ServiceFlavor::TicketBuyer => {
				let _: StopTicketPurchaseResponse = self.unary(path, StopTicketPurchaseRequest {}).await?;
			}
			ServiceFlavor::AutoBuyer => {
				let _: StopAutoBuyerResponse = self.unary(path, StopAutoBuyerRequest {}).await?;
			}
		}
		Ok(())
	}
}
