use aide::axum::{
	routing::{get_with, post_with},
	ApiRouter,
};
use axum::http::StatusCode;
use tower_governor::GovernorLayer;

use crate::{error, message::Code, ratelimit::Limits, AppState};

pub mod model;
pub mod route;

/// An error in a recipe request.
///
/// Only the catalog code reaches the client, the messages are for logs.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("recipe title is missing or blank")]
	MissingTitle,
	#[error("recipe tagline is missing or blank")]
	MissingTagline,
	#[error("recipe ingredients are missing")]
	MissingIngredients,
	#[error("recipe instructions are missing")]
	MissingInstructions,
	#[error("fewer than two ingredients")]
	MultipleIngredientsNeeded,
	#[error("fewer than two preparation steps")]
	MultiplePreparationStepsNeeded,
	#[error("page number {0} is below 1")]
	InvalidPageNumber(i64),
	#[error("recipe id {0:?} is not a uuid")]
	InvalidRecipeId(String),
}

pub type RouteError = error::RouteError<Error>;

/// The `/api` routes. Recipe creation lives under `/api/auth` with the other
/// routes that need an access token.
pub fn routes(state: AppState, limits: Option<&Limits>) -> ApiRouter {
	use route::*;

	let mut auth =
		ApiRouter::new().api_route("/create_recipe", post_with(create_recipe, create_recipe_docs));

	if let Some(limits) = limits {
		auth = auth.layer(GovernorLayer {
			config: limits.create.clone(),
		});
	}

	let mut router = ApiRouter::new()
		.api_route("/get_recipes", get_with(get_recipes, get_recipes_docs))
		.nest("/auth", auth);

	if let Some(limits) = limits {
		router = router.layer(GovernorLayer {
			config: limits.read.clone(),
		});
	}

	router.with_state(state)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		StatusCode::BAD_REQUEST
	}

	fn code(&self) -> Code {
		match self {
			Self::MissingTitle => Code::MissingTitle,
			Self::MissingTagline => Code::MissingTagline,
			Self::MissingIngredients => Code::MissingIngredients,
			Self::MissingInstructions => Code::MissingInstructions,
			Self::MultipleIngredientsNeeded => Code::MultipleIngredientsNeeded,
			Self::MultiplePreparationStepsNeeded => Code::MultiplePreparationStepsNeeded,
			Self::InvalidPageNumber(..) => Code::InvalidPageNumber,
			Self::InvalidRecipeId(..) => Code::InvalidRecipeId,
		}
	}
}
