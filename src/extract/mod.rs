mod session;

pub use session::Session;

use aide::{
	gen::GenContext,
	openapi::{Operation, ReferenceOr},
	OperationInput, OperationIo,
};
use axum::{
	body::Body,
	extract::{FromRequest, FromRequestParts, Request},
	http::{header, request, HeaderMap, Response},
	response::IntoResponse,
};
use schemars::JsonSchema;
use serde::de;

use crate::error::AppError;

/// Extractor that checks a JSON body against its schema and deserializes it.
///
/// T must implement [`serde::de::DeserializeOwned`] and [`schemars::JsonSchema`]
/// in order to be used in an extractor. Any failure, from a missing content
/// type to a wrongly typed field, becomes [`AppError::Json`].
///
/// ```rust
/// async fn route(Json(recipe): Json<CreateRecipeInput>) {
///   // ...
/// }
/// ```
#[derive(OperationIo)]
#[aide(
	input_with = "axum_jsonschema::Json<T>",
	output_with = "axum_jsonschema::Json<T>",
	json_schema
)]
pub struct Json<T>(pub T);

impl<T> IntoResponse for Json<T>
where
	T: serde::Serialize,
{
	fn into_response(self) -> Response<Body> {
		axum::extract::Json(self.0).into_response()
	}
}

#[axum::async_trait]
impl<T, S> FromRequest<S> for Json<T>
where
	T: de::DeserializeOwned + JsonSchema + 'static,
	S: Send + Sync,
{
	type Rejection = AppError;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		let result = axum_jsonschema::Json::<T>::from_request(req, state)
			.await?
			.0;

		Ok(Self(result))
	}
}

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Extractor for a body sent either as JSON or as an HTML form.
///
/// Form bodies are read with [`axum_extra::extract::Form`], so a key given
/// once stays a single string and a repeated key becomes a list. Any other
/// content type goes through [`Json<T>`].
///
/// ```rust
/// async fn route(JsonOrForm(recipe): JsonOrForm<CreateRecipeInput>) {
///   // ...
/// }
/// ```
pub struct JsonOrForm<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for JsonOrForm<T>
where
	T: de::DeserializeOwned + JsonSchema + 'static,
	S: Send + Sync,
{
	type Rejection = AppError;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		if is_form(req.headers()) {
			let axum_extra::extract::Form(result) =
				axum_extra::extract::Form::<T>::from_request(req, state).await?;

			return Ok(Self(result));
		}

		let Json(result) = Json::<T>::from_request(req, state).await?;

		Ok(Self(result))
	}
}

impl<T: JsonSchema> OperationInput for JsonOrForm<T> {
	/// Documents the JSON body, and the same schema for form bodies.
	fn operation_input(ctx: &mut GenContext, operation: &mut Operation) {
		axum_jsonschema::Json::<T>::operation_input(ctx, operation);

		if let Some(ReferenceOr::Item(body)) = &mut operation.request_body {
			if let Some(json) = body.content.get("application/json").cloned() {
				body.content.insert(FORM_CONTENT_TYPE.into(), json);
			}
		}
	}
}

fn is_form(headers: &HeaderMap) -> bool {
	headers
		.get(header::CONTENT_TYPE)
		.and_then(|value| value.to_str().ok())
		.and_then(|value| value.split(';').next())
		.is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
}

/// Extractor that deserializes a query string.
///
/// This is similar to [`Json<T>`], but does not consume the body.
///
/// ```rust
/// async fn route(Query(params): Query<RecipeQuery>) {
///   // ...
/// }
/// ```
#[derive(OperationIo)]
#[aide(
	input_with = "axum::extract::Query<T>",
	output_with = "axum_jsonschema::Json<T>",
	json_schema
)]
pub struct Query<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for Query<T>
where
	T: de::DeserializeOwned,
	S: Send + Sync,
{
	type Rejection = AppError;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let result = axum::extract::Query::<T>::from_request_parts(parts, state)
			.await?
			.0;

		Ok(Self(result))
	}
}
