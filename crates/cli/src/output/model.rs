use serde::Serialize;
use tixbuy_protocol::{ServiceFlavor, SessionConfig};

/// One reported milestone, serialized with an `event` tag.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LifecycleEvent<'a> {
	Started { service: ServiceFlavor },
	Config { config: &'a SessionConfig },
	DescribeFailed { message: String },
	DescribeUnsupported { service: ServiceFlavor },
	Holding { seconds: u64 },
	Interrupted { elapsed_ms: u64 },
	Stopping,
	Stopped,
	StopFailed { message: String },
}
