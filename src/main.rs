#![warn(clippy::pedantic)]

mod config;
mod error;
mod extract;
mod message;
mod openapi;
mod ratelimit;
mod route;
mod session;
mod store;
mod trace;

#[cfg(test)]
mod test;

use std::{net::SocketAddr, sync::Arc};

use sqlx::postgres::PgPoolOptions;

use crate::{
	config::Config,
	ratelimit::Limits,
	store::{PgRecipeStore, RecipeStore},
};

pub type Database = sqlx::Pool<sqlx::Postgres>;
pub type Store = Arc<dyn RecipeStore>;
pub type AppState = State;

/// The shared application state.
///
/// Handlers pick the part they need with [`axum::extract::State`], for
/// example `State<Store>`.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub store: Store,
	pub keys: session::Keys,
}

#[tokio::main]
async fn main() {
	let config = Config::from_env().expect("failed to load configuration");

	let _guard =
		trace::init(config.otlp_endpoint.as_deref()).expect("failed to initialize tracing");

	let database = PgPoolOptions::new()
		.max_connections(config.database_max_connections)
		.connect(&config.database_url)
		.await
		.expect("failed to connect to database");

	tracing::info!(url = %config::redact(&config.database_url), "connected to database");

	sqlx::migrate!()
		.run(&database)
		.await
		.expect("failed to run migrations");

	let limits = config.rate_limit.then(Limits::default);

	if let Some(limits) = &limits {
		limits.spawn_cleanup();
	}

	let state = State {
		store: Arc::new(PgRecipeStore::new(database.clone())),
		keys: session::Keys::new(config.jwt_secret.as_bytes()),
	};

	let app = route::router(state, limits.as_ref());

	let listener = tokio::net::TcpListener::bind((config.host, config.port))
		.await
		.expect("failed to bind to port");

	tracing::info!("listening on {}:{}", config.host, config.port);

	axum::serve(
		listener,
		app.into_make_service_with_connect_info::<SocketAddr>(),
	)
	.with_graceful_shutdown(shutdown_signal())
	.await
	.expect("server error");

	database.close().await;

	tracing::info!("database connection closed");
}

/// Resolves on Ctrl+C, or on SIGTERM for unix targets.
async fn shutdown_signal() {
	let ctrl_c = async {
		tokio::signal::ctrl_c()
			.await
			.expect("failed to install Ctrl+C handler");
	};

	#[cfg(unix)]
	let terminate = async {
		tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
			.expect("failed to install signal handler")
			.recv()
			.await;
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		() = ctrl_c => {},
		() = terminate => {},
	}

	tracing::info!("shutting down");
}
