//! The message catalog shared by success and error responses.
//!
//! Every response body carries a symbolic [`Code`] and the human-readable
//! text registered for it, so clients can branch on the code and show the
//! text as-is.

use schemars::JsonSchema;
use serde::Serialize;

/// A symbolic response code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Code {
	MissingTitle,
	MissingTagline,
	MissingIngredients,
	MissingInstructions,
	MultipleIngredientsNeeded,
	MultiplePreparationStepsNeeded,
	CreateRecipeSuccess,
	InvalidPageNumber,
	InvalidRecipeId,
	RecipeSearchComplete,
	DbError,
	MalformedRequest,
	MissingToken,
	InvalidToken,
	TooManyRequests,
	InternalError,
}

impl Code {
	/// The text shown to the client for this code.
	pub const fn text(self) -> &'static str {
		match self {
			Self::MissingTitle => "Recipe title is required.",
			Self::MissingTagline => "Recipe tagline is required.",
			Self::MissingIngredients => "Recipe ingredients are required.",
			Self::MissingInstructions => "Recipe preparation instructions are required.",
			Self::MultipleIngredientsNeeded => "More than 1 ingredient is required.",
			Self::MultiplePreparationStepsNeeded => "More than 1 instruction step is required.",
			Self::CreateRecipeSuccess => "Recipe successfully created.",
			Self::InvalidPageNumber => "Page number must be 1 or greater.",
			Self::InvalidRecipeId => "Recipe ID is not valid.",
			Self::RecipeSearchComplete => "Recipe search complete.",
			Self::DbError => "Unknown database error occurred.",
			Self::MalformedRequest => "The request could not be parsed.",
			Self::MissingToken => "An access token is required.",
			Self::InvalidToken => "The access token is invalid or has expired.",
			Self::TooManyRequests => "Too many requests, please slow down.",
			Self::InternalError => "An unexpected error occurred.",
		}
	}
}

/// A `(code, message)` pair, the body of every error response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Message {
	/// The symbolic code, stable across releases.
	pub code: Code,
	/// Human-readable text for the code.
	pub message: &'static str,
}

impl From<Code> for Message {
	fn from(code: Code) -> Self {
		Self {
			code,
			message: code.text(),
		}
	}
}

/// A successful response: the catalog message plus a payload.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Reply<T> {
	#[serde(flatten)]
	pub message: Message,
	pub payload: T,
}

impl<T> Reply<T> {
	pub fn new(code: Code, payload: T) -> Self {
		Self {
			message: code.into(),
			payload,
		}
	}
}
