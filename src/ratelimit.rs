use std::{sync::Arc, time::Duration};

use axum::{
	body::Body,
	response::{IntoResponse, Response},
};
use governor::middleware::StateInformationMiddleware;
use tower_governor::{
	governor::{GovernorConfig, GovernorConfigBuilder},
	key_extractor::PeerIpKeyExtractor,
	GovernorError,
};

use crate::error::AppError;

pub type Config = Arc<GovernorConfig<PeerIpKeyExtractor, StateInformationMiddleware>>;

/// Per-IP request quotas, shared by every router built from them.
#[derive(Clone)]
pub struct Limits {
	/// Applies to every `/api` route.
	pub read: Config,
	/// Applies on top of `read` to recipe creation.
	pub create: Config,
}

impl Default for Limits {
	fn default() -> Self {
		Self {
			// a burst of 60, then one request per second
			read: quota(1, 60),
			// a burst of 5, then one recipe every 10 seconds
			create: quota(10, 5),
		}
	}
}

impl Limits {
	/// Periodically drops the state of clients that are back to a full quota.
	pub fn spawn_cleanup(&self) {
		let limiters = [self.read.limiter().clone(), self.create.limiter().clone()];
		let interval = Duration::from_secs(60);

		std::thread::spawn(move || loop {
			std::thread::sleep(interval);

			for limiter in &limiters {
				tracing::debug!("rate limiting storage size: {}", limiter.len());

				limiter.retain_recent();
			}
		});
	}
}

/// One element of the quota is replenished every `seconds`, up to `burst`.
fn quota(seconds: u64, burst: u32) -> Config {
	Arc::new(
		GovernorConfigBuilder::default()
			.per_second(seconds)
			.burst_size(burst)
			.use_headers()
			.error_handler(error_handler)
			.finish()
			.expect("quota period and burst size are non-zero"),
	)
}

fn error_handler(error: GovernorError) -> Response<Body> {
	AppError::from(error).into_response()
}
