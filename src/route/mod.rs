use std::{sync::Arc, time::Duration};

use aide::{axum::ApiRouter, openapi::OpenApi};
use axum::{
	http::{header, HeaderName, Method, Response},
	Extension,
};
use tower::ServiceBuilder;
use tower_http::{
	compression::CompressionLayer,
	cors::{Any, CorsLayer},
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};
use tracing::Span;

use crate::{openapi, ratelimit::Limits, session, AppState};

pub mod docs;
pub mod model;
pub mod recipe;

/// Builds the whole application: the recipe API under `/api`, its
/// documentation under `/docs`, and the shared HTTP layers.
///
/// Every response records its latency in the `latency_ms` histogram.
///
/// Rate limiting is only applied when `limits` is given.
pub fn router(state: AppState, limits: Option<&Limits>) -> axum::Router {
	let mut api = OpenApi::default();

	ApiRouter::new()
		.nest_api_service("/api", recipe::routes(state, limits))
		.nest_api_service("/docs", docs::routes())
		.finish_api_with(&mut api, openapi::docs)
		.layer(Extension(Arc::new(api)))
		.layer(
			ServiceBuilder::new()
				.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
				.layer(TraceLayer::new_for_http().on_response(
					|response: &Response<_>, latency: Duration, _span: &Span| {
						tracing::info!(
							histogram.latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
							status = response.status().as_u16(),
							"finished processing request"
						);
					},
				))
				.layer(PropagateRequestIdLayer::x_request_id())
				.layer(CompressionLayer::new())
				.layer(
					CorsLayer::new()
						.allow_methods([Method::GET, Method::POST])
						.allow_headers([
							header::AUTHORIZATION,
							header::CONTENT_TYPE,
							HeaderName::from_static(session::ACCESS_TOKEN_HEADER),
						])
						.allow_origin(Any),
				),
		)
}

#[cfg(test)]
mod test {
	use std::sync::{Arc, Mutex};

	use axum::http::Method;
	use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

	use crate::test::*;

	/// Collects the names of every field of every event.
	#[derive(Clone, Default)]
	struct Fields(Arc<Mutex<Vec<String>>>);

	impl<S: tracing::Subscriber> Layer<S> for Fields {
		fn on_event(
			&self,
			event: &tracing::Event<'_>,
			_ctx: tracing_subscriber::layer::Context<'_, S>,
		) {
			self.0
				.lock()
				.unwrap()
				.extend(event.fields().map(|field| field.name().to_owned()));
		}
	}

	#[tokio::test]
	async fn test_records_request_latency() {
		let fields = Fields::default();
		let _guard = tracing_subscriber::registry()
			.with(fields.clone())
			.set_default();

		let server = app(MemoryStore::shared());

		server.get("/api/get_recipes").await;

		assert!(fields
			.0
			.lock()
			.unwrap()
			.iter()
			.any(|name| name == "histogram.latency_ms"));
	}

	#[tokio::test]
	async fn test_serves_openapi_document() {
		let server = app(MemoryStore::shared());

		let response = server.get("/docs/private/api.json").await;

		assert_eq!(response.status_code(), StatusCode::OK);

		let document = response.json::<Value>();

		let create = &document["paths"]["/api/auth/create_recipe"]["post"];
		let search = &document["paths"]["/api/get_recipes"]["get"];

		assert_eq!(create["operationId"], "create_recipe");
		assert_eq!(create["summary"], "Create recipe");
		assert!(create["requestBody"]["content"]["application/x-www-form-urlencoded"].is_object());

		for status in ["400", "401", "500"] {
			assert!(create["responses"][status]["description"].is_string(), "{status}");
		}

		for status in ["400", "500"] {
			assert!(search["responses"][status]["description"].is_string(), "{status}");
		}
	}

	#[tokio::test]
	async fn test_propagates_request_id() {
		let server = app(MemoryStore::shared());

		let response = server.get("/api/get_recipes").await;

		assert!(response.headers().contains_key("x-request-id"));
	}

	#[tokio::test]
	async fn test_preflight_allows_token_headers() {
		let server = app(MemoryStore::shared());

		let response = server
			.method(Method::OPTIONS, "/api/auth/create_recipe")
			.add_header(header::ORIGIN, HeaderValue::from_static("https://recipes.example"))
			.add_header(
				header::ACCESS_CONTROL_REQUEST_METHOD,
				HeaderValue::from_static("POST"),
			)
			.add_header(
				header::ACCESS_CONTROL_REQUEST_HEADERS,
				HeaderValue::from_static("x-access-token,content-type"),
			)
			.await;

		assert_eq!(response.status_code(), StatusCode::OK);

		let allowed = response
			.headers()
			.get(header::ACCESS_CONTROL_ALLOW_HEADERS)
			.unwrap()
			.to_str()
			.unwrap()
			.to_owned();

		for name in ["authorization", "content-type", "x-access-token"] {
			assert!(allowed.contains(name), "{allowed}");
		}

		assert_eq!(
			response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
			Some(&HeaderValue::from_static("*"))
		);
	}

	#[tokio::test]
	async fn test_unknown_route() {
		let server = app(MemoryStore::shared());

		let response = server.get("/api/recipes").await;

		assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
	}
}
