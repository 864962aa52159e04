use jsonwebtoken::{errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::message::Code;

/// The scheme prefix of an `Authorization` header carrying a token.
pub const AUTHORIZATION_PREFIX: &str = "Bearer ";

/// Header accepted as a fallback for clients that cannot set `Authorization`.
pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";

/// An error that can occur while verifying an access token.
///
/// Note that the messages are not presented to the client, the response
/// only carries the catalog code.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("no access token")]
	MissingToken,
	#[error("access token has expired")]
	ExpiredToken,
	#[error("invalid access token: {0}")]
	InvalidToken(#[from] jsonwebtoken::errors::Error),
}

impl Error {
	pub fn code(&self) -> Code {
		match self {
			Self::MissingToken => Code::MissingToken,
			Self::ExpiredToken | Self::InvalidToken(..) => Code::InvalidToken,
		}
	}
}

/// The claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
	/// The user the token was issued to.
	pub username: String,
	/// Expiration as a Unix timestamp.
	pub exp: i64,
}

/// Keys used to verify access tokens.
///
/// Tokens are issued elsewhere and signed with HS256 using the shared secret.
#[derive(Clone)]
pub struct Keys {
	decoding: DecodingKey,
	validation: Validation,
}

impl Keys {
	pub fn new(secret: &[u8]) -> Self {
		Self {
			decoding: DecodingKey::from_secret(secret),
			validation: Validation::new(Algorithm::HS256),
		}
	}

	/// Verifies the token's signature and expiry, returning its claims.
	pub fn verify(&self, token: &str) -> Result<Claims, Error> {
		jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
			.map(|data| data.claims)
			.map_err(|error| {
				if matches!(error.kind(), ErrorKind::ExpiredSignature) {
					Error::ExpiredToken
				} else {
					Error::InvalidToken(error)
				}
			})
	}
}
