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

/// A per-client-IP limit of `per_second` requests, allowing bursts of
/// up to `burst_size`.
///
/// Returns `None` if either value is zero.
pub fn per_ip(per_second: u64, burst_size: u32) -> Option<Config> {
	GovernorConfigBuilder::default()
		.per_second(per_second)
		.burst_size(burst_size)
		.use_headers()
		.error_handler(error_handler)
		.finish()
		.map(Arc::new)
}

fn error_handler(error: GovernorError) -> Response<Body> {
	AppError::from(error).into_response()
}

/// Periodically drops the state of clients that have not been seen recently.
pub fn spawn_cleanup(config: &Config) {
	let limiter = config.limiter().clone();

	tokio::spawn(async move {
		let mut interval = tokio::time::interval(Duration::from_secs(60));

		loop {
			interval.tick().await;

			tracing::debug!(clients = limiter.len(), "pruning rate limiter state");
			limiter.retain_recent();
		}
	});
}
