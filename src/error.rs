use aide::OperationOutput;
use axum::{
	body::Body,
	extract::rejection::QueryRejection,
	http::{header, HeaderValue, Response, StatusCode},
	response::IntoResponse,
};
use axum_extra::extract::FormRejection;
use tower_governor::GovernorError;

use crate::{
	extract::Json,
	message::{Code, Message},
	session,
};

/// Errors shared by every route.
///
/// The Display trait is not sent to the client, so it can show
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	#[error("malformed json body: {0:?}")]
	Json(axum_jsonschema::JsonSchemaRejection),
	#[error("malformed form body: {0}")]
	Form(#[from] FormRejection),
	#[error("malformed query string: {0}")]
	Query(#[from] QueryRejection),
	#[error("auth error: {0}")]
	Auth(#[from] session::Error),
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
	#[error("rate limit error: {0:?}")]
	RateLimit(GovernorError),
}

impl From<axum_jsonschema::JsonSchemaRejection> for AppError {
	fn from(rejection: axum_jsonschema::JsonSchemaRejection) -> Self {
		Self::Json(rejection)
	}
}

impl From<GovernorError> for AppError {
	fn from(error: GovernorError) -> Self {
		Self::RateLimit(error)
	}
}

impl AppError {
	pub fn status(&self) -> StatusCode {
		match self {
			Self::Json(..) | Self::Form(..) | Self::Query(..) => StatusCode::BAD_REQUEST,
			Self::Auth(..) => StatusCode::UNAUTHORIZED,
			Self::Database(..) => StatusCode::INTERNAL_SERVER_ERROR,
			Self::RateLimit(GovernorError::TooManyRequests { .. }) => StatusCode::TOO_MANY_REQUESTS,
			Self::RateLimit(..) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	pub fn code(&self) -> Code {
		match self {
			Self::Json(..) | Self::Form(..) | Self::Query(..) => Code::MalformedRequest,
			Self::Auth(error) => error.code(),
			Self::Database(..) => Code::DbError,
			Self::RateLimit(GovernorError::TooManyRequests { .. }) => Code::TooManyRequests,
			Self::RateLimit(..) => Code::InternalError,
		}
	}
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response<Body> {
		let status = self.status();
		let code = self.code();

		log(status, &self);

		let mut response = (status, Json(Message::from(code))).into_response();

		if let Self::RateLimit(GovernorError::TooManyRequests { wait_time, headers }) = self {
			let response_headers = response.headers_mut();

			response_headers.extend(headers.unwrap_or_default());
			response_headers.insert(header::RETRY_AFTER, HeaderValue::from(wait_time));
		}

		response
	}
}

/// An error specific to a group of routes.
pub trait ErrorShape: std::error::Error {
	/// The HTTP status to respond with.
	fn status(&self) -> StatusCode;

	/// The catalog code sent to the client.
	fn code(&self) -> Code;
}

/// The error type returned by route handlers: either a shared [`AppError`]
/// or the route group's own error `E`.
#[derive(Debug)]
pub enum RouteError<E> {
	App(AppError),
	Route(E),
}

impl<E: ErrorShape> From<E> for RouteError<E> {
	fn from(error: E) -> Self {
		Self::Route(error)
	}
}

impl<E> From<AppError> for RouteError<E> {
	fn from(error: AppError) -> Self {
		Self::App(error)
	}
}

impl<E> From<sqlx::Error> for RouteError<E> {
	fn from(error: sqlx::Error) -> Self {
		Self::App(error.into())
	}
}

impl<E: ErrorShape> IntoResponse for RouteError<E> {
	fn into_response(self) -> Response<Body> {
		match self {
			Self::App(error) => error.into_response(),
			Self::Route(error) => {
				let status = error.status();

				log(status, &error);

				(status, Json(Message::from(error.code()))).into_response()
			}
		}
	}
}

impl<E> OperationOutput for RouteError<E> {
	type Inner = Message;
}

/// Server faults are logged in full, client faults only at debug level.
fn log(status: StatusCode, error: &dyn std::error::Error) {
	if status.is_server_error() {
		tracing::error!(%status, "{error}");
	} else {
		tracing::debug!(%status, "{error}");
	}
}
