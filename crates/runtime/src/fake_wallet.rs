//! In-process gRPC wallet serving both ticket buyer method sets.
//!
//! Backed by the same state machine as [`FakePurchaseService`](crate::FakePurchaseService),
//! so tests can drive the real [`TonicPurchaseClient`](crate::TonicPurchaseClient)
//! (or the `tixbuy` binary) against a listener on loopback.

use std::convert::Infallible;
use std::future::{pending, ready};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::task::{Context, Poll};

use parking_lot::Mutex;
use tixbuy_protocol::wire::{
	StartAutoBuyerRequest, StartAutoBuyerResponse, StartTicketPurchaseRequest, StartTicketPurchaseResponse, StopAutoBuyerRequest, StopAutoBuyerResponse,
	StopTicketPurchaseRequest, StopTicketPurchaseResponse, TicketBuyerConfigRequest, TicketBuyerConfigResponse,
};
use tixbuy_protocol::{SERVICE_NAME, ServiceFlavor, SessionRequest};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tonic::Status;
use tonic::body::BoxBody;
use tonic::codec::ProstCodec;
use tonic::codegen::{BoxFuture, Service, http};
use tonic::server::{Grpc, NamedService, UnaryService};
use tonic::transport::Server;
use tonic::transport::server::TcpIncoming;
use tracing::debug;

use crate::fake::{FakeCall, FakeCallLog, FakeScript, FakeState};

type Shared = Arc<Mutex<FakeState>>;

/// Running wallet listener. Shuts down when dropped.
#[derive(Debug)]
pub struct FakeWallet {
	addr: SocketAddr,
	state: Shared,
	calls: FakeCallLog,
	shutdown: Option<oneshot::Sender<()>>,
}

impl FakeWallet {
	/// Binds `127.0.0.1:0` and starts serving on the current runtime.
	pub async fn spawn(script: FakeScript) -> io::Result<Self> {
		let listener = TcpListener::bind("127.0.0.1:0").await?;
		let addr = listener.local_addr()?;
		let incoming = TcpIncoming::from_listener(listener, true, None).map_err(io::Error::other)?;

		let state = FakeState::new(script);
		let calls = state.calls();
		let state: Shared = Arc::new(Mutex::new(state));
		let service = WalletService { state: state.clone() };
		let (tx, rx) = oneshot::channel::<()>();

		tokio::spawn(async move {
			let served = Server::builder()
				.add_service(service)
				.serve_with_incoming_shutdown(incoming, async {
					let _ = rx.await;
				})
				.await;
			if let Err(err) = served {
				debug!(target = "tixbuy.transport", error = %err, "fake wallet stopped");
			}
		});

		Ok(Self {
			addr,
			state,
			calls,
			shutdown: Some(tx),
		})
	}

	pub fn addr(&self) -> SocketAddr {
		self.addr
	}

	pub fn call_log(&self) -> FakeCallLog {
		self.calls.clone()
	}

	pub fn is_active(&self) -> bool {
		self.state.lock().is_active()
	}
}

impl Drop for FakeWallet {
	fn drop(&mut self) {
		if let Some(tx) = self.shutdown.take() {
			let _ = tx.send(());
		}
	}
}

#[derive(Clone)]
struct WalletService {
	state: Shared,
}

impl NamedService for WalletService {
	const NAME: &'static str = SERVICE_NAME;
}

impl Service<http::Request<BoxBody>> for WalletService {
	type Response = http::Response<BoxBody>;
	type Error = Infallible;
	type Future = BoxFuture<Self::Response, Self::Error>;

	fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		Poll::Ready(Ok(()))
	}

	fn call(&mut self, req: http::Request<BoxBody>) -> Self::Future {
		let state = self.state.clone();
		let ticket = ServiceFlavor::TicketBuyer.methods();
		let auto = ServiceFlavor::AutoBuyer.methods();
		let path = req.uri().path().to_owned();

		Box::pin(async move {
			let response = if path == ticket.start {
				unary(req, move |msg: StartTicketPurchaseRequest| {
					answer(start(&state, msg.into()).map(|()| StartTicketPurchaseResponse {}))
				})
				.await
			} else if Some(path.as_str()) == ticket.describe {
				unary(req, move |_: TicketBuyerConfigRequest| {
					answer(state.lock().describe().map(TicketBuyerConfigResponse::from))
				})
				.await
			} else if path == ticket.stop {
				unary(req, move |_: StopTicketPurchaseRequest| stop(&state, StopTicketPurchaseResponse {})).await
			} else if path == auto.start {
				unary(req, move |msg: StartAutoBuyerRequest| answer(start(&state, msg.into()).map(|()| StartAutoBuyerResponse {}))).await
			} else if path == auto.stop {
				unary(req, move |_: StopAutoBuyerRequest| stop(&state, StopAutoBuyerResponse {})).await
			} else {
				Status::unimplemented(format!("no such method: {path}")).into_http()
			};
			Ok(response)
		})
	}
}

fn start(state: &Shared, request: SessionRequest) -> Result<(), Status> {
	state.lock().start(request)
}

fn stop<M: Send + 'static>(state: &Shared, ok: M) -> BoxFuture<tonic::Response<M>, Status> {
	let mut state = state.lock();
	if state.hangs_on_stop() {
		state.calls().push(FakeCall::Stop);
		return Box::pin(pending());
	}
	answer(state.stop().map(|()| ok))
}

fn answer<M: Send + 'static>(result: Result<M, Status>) -> BoxFuture<tonic::Response<M>, Status> {
	Box::pin(ready(result.map(tonic::Response::new)))
}

/// Adapts a message handler to tonic's unary server path.
struct Handler<F>(F);

impl<Req, Resp, F> UnaryService<Req> for Handler<F>
where
	F: FnMut(Req) -> BoxFuture<tonic::Response<Resp>, Status>,
{
	type Response = Resp;
	type Future = BoxFuture<tonic::Response<Resp>, Status>;

	fn call(&mut self, request: tonic::Request<Req>) -> Self::Future {
		(self.0)(request.into_inner())
	}
}

fn unary<Req, Resp, F>(req: http::Request<BoxBody>, handler: F) -> std::pin::Pin<Box<dyn std::future::Future<Output = http::Response<BoxBody>> + Send>>
where
	Req: prost::Message + Default + Send + 'static,
	Resp: prost::Message + Send + 'static,
	F: FnMut(Req) -> BoxFuture<tonic::Response<Resp>, Status> + Send + 'static,
{
	Box::pin(async move {
		let mut grpc = Grpc::new(ProstCodec::<Resp, Req>::default());
		grpc.unary(Handler(handler), req).await
	})
}
