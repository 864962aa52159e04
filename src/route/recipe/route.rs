use axum::extract::State;
use macros::route;

use crate::{
	extract::{Json, JsonOrForm, Query, Session},
	message::{Code, Message, Reply},
	openapi::tag,
	Store,
};

use super::{model, RouteError};

/// Create recipe
/// Validates a recipe submitted by the authenticated user and stores it.
/// The owner is always the user the access token was issued to.
#[route(
	tag = tag::RECIPE,
	response(status = 400, description = "The recipe is incomplete, or the body could not be parsed.", shape = "Json<Message>"),
	response(status = 401, description = "The access token is missing, invalid or expired.", shape = "Json<Message>"),
	response(status = 500, description = "The recipe could not be stored.", shape = "Json<Message>"),
)]
pub async fn create_recipe(
	State(store): State<Store>,
	session: Session,
	JsonOrForm(input): JsonOrForm<model::CreateRecipeInput>,
) -> Result<Json<Reply<model::RecipePayload>>, RouteError> {
	let recipe = input.into_new_recipe(session.username)?;
	let recipe = store.create(recipe).await?;

	tracing::info!(
		monotonic_counter.recipes_created = 1_u64,
		recipe = %recipe.id,
		username = %recipe.username,
		"created recipe"
	);

	Ok(Json(Reply::new(
		Code::CreateRecipeSuccess,
		model::RecipePayload { recipe },
	)))
}

/// Search recipes
/// Returns a page of 20 recipes, oldest first, optionally filtered by
/// recipe id and the user that submitted them.
#[route(
	tag = tag::RECIPE,
	response(status = 400, description = "The page number or recipe id is invalid.", shape = "Json<Message>"),
	response(status = 500, description = "The recipes could not be loaded.", shape = "Json<Message>"),
)]
pub async fn get_recipes(
	State(store): State<Store>,
	Query(query): Query<model::RecipeQuery>,
) -> Result<Json<Reply<model::RecipesPayload>>, RouteError> {
	let search = query.into_search()?;
	let recipes = store.find(&search.filter, search.paginate).await?;

	tracing::debug!(
		page = search.paginate.page(),
		found = recipes.len(),
		"searched recipes"
	);

	Ok(Json(Reply::new(
		Code::RecipeSearchComplete,
		model::RecipesPayload { recipes },
	)))
}
