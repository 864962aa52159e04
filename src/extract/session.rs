use aide::OperationInput;
use axum::{
	extract::{FromRef, FromRequestParts},
	http::{header, request},
};

use crate::{
	error::AppError,
	openapi::{SECURITY_SCHEME_ACCESS_TOKEN, SECURITY_SCHEME_BEARER},
	session::{self, Keys, ACCESS_TOKEN_HEADER, AUTHORIZATION_PREFIX},
};

/// Extracts the verified caller from the request.
///
/// The token is read from `Authorization: Bearer <token>`, falling back to the
/// `x-access-token` header when there is no bearer token (including when
/// `Authorization` uses another scheme). If neither is present, a
/// [`session::Error::MissingToken`] is returned; if the token does not verify,
/// [`session::Error::InvalidToken`] or [`session::Error::ExpiredToken`].
///
/// ```rust
/// async fn route(session: Session) {
///   println!("{}", session.username);
/// }
/// ```
#[derive(Debug)]
pub struct Session {
	pub username: String,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Session
where
	Keys: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = AppError;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let bearer = parts
			.headers
			.get(header::AUTHORIZATION)
			.and_then(|value| value.to_str().ok())
			.and_then(|value| value.strip_prefix(AUTHORIZATION_PREFIX));

		let token = bearer
			.or_else(|| {
				parts
					.headers
					.get(ACCESS_TOKEN_HEADER)
					.and_then(|value| value.to_str().ok())
			})
			.ok_or(session::Error::MissingToken)?;

		let claims = Keys::from_ref(state).verify(token.trim())?;

		Ok(Self {
			username: claims.username,
		})
	}
}

impl OperationInput for Session {
	/// Operation input for the session extractor.
	///
	/// This adds a token requirement to the `OpenAPI` operation.
	fn operation_input(_ctx: &mut aide::gen::GenContext, operation: &mut aide::openapi::Operation) {
		operation.security.extend([
			[(SECURITY_SCHEME_BEARER.to_string(), Vec::new())]
				.into_iter()
				.collect(),
			[(SECURITY_SCHEME_ACCESS_TOKEN.to_string(), Vec::new())]
				.into_iter()
				.collect(),
		]);
	}
}
