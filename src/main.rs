#![warn(clippy::pedantic)]

mod config;
mod error;
mod extract;
mod openapi;
mod ratelimit;
mod route;
mod store;
#[cfg(test)]
mod test;
mod trace;

use std::{net::SocketAddr, sync::Arc};

use aide::{axum::ApiRouter, openapi::OpenApi};
use axum::{Extension, Router};
use tower::ServiceBuilder;
use tower_governor::GovernorLayer;
use tower_http::{
	compression::CompressionLayer,
	cors::CorsLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};

pub type AppState = State;

/// The persistence layer shared by every handler.
pub type Store = Arc<dyn store::PostStore>;

/// The shared application state.
///
/// Handlers extract the parts they need through [`axum::extract::FromRef`].
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub store: Store,
}

/// Builds the application router with its documentation and middleware.
///
/// Rate limiting is added by [`main`], since it needs the peer address.
pub fn app(state: State) -> Router {
	aide::gen::extract_schemas(true);

	let mut api = OpenApi::default();

	ApiRouter::new()
		.merge(route::post::routes())
		.merge(route::docs::routes())
		.finish_api_with(&mut api, openapi::docs)
		.layer(Extension(Arc::new(api)))
		.layer(
			ServiceBuilder::new()
				.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
				.layer(TraceLayer::new_for_http())
				.layer(PropagateRequestIdLayer::x_request_id())
				.layer(CompressionLayer::new())
				.layer(CorsLayer::permissive()),
		)
		.with_state(state)
}

async fn connect_store(config: &config::Config) -> Result<Store, store::Error> {
	Ok(match &config.database_url {
		Some(url) => Arc::new(store::PgPostStore::connect(url, config.database_max_connections).await?),
		None => {
			tracing::warn!("DATABASE_URL is not set, posts are kept in memory");
			Arc::new(store::MemoryPostStore::new())
		}
	})
}

async fn shutdown_signal() {
	if let Err(error) = tokio::signal::ctrl_c().await {
		tracing::error!(%error, "failed to listen for shutdown signal");
	}

	tracing::info!("shutting down");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let config = config::Config::from_env()?;
	let _guard =
		trace::init_tracing_subscriber(config.log_level, config.otlp_endpoint.as_deref())?;

	let state = State {
		store: connect_store(&config).await?,
	};

	let limit = ratelimit::per_ip(config.rate_limit_per_second, config.rate_limit_burst)
		.ok_or("rate limit must be positive")?;

	ratelimit::spawn_cleanup(&limit);

	let app = app(state).layer(GovernorLayer { config: limit });

	let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;

	tracing::info!("listening on {}", listener.local_addr()?);

	axum::serve(
		listener,
		app.into_make_service_with_connect_info::<SocketAddr>(),
	)
	.with_graceful_shutdown(shutdown_signal())
	.await?;

	Ok(())
}
