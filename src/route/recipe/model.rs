pub use crate::route::model::Paginate;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::route::model::sanitize_page_number;

use super::Error;

/// The fewest ingredients or preparation steps a recipe may have.
pub const MIN_STEPS: usize = 2;

/// A single recipe, submitted by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema, sqlx::FromRow)]
pub struct Recipe {
	/// The unique identifier of the recipe.
	pub id: Uuid,
	/// The user that submitted the recipe.
	pub username: String,
	/// The name of the dish.
	pub title: String,
	/// A short line describing the dish.
	pub tagline: String,
	/// The ingredients, in the order they were given.
	pub ingredients: Vec<String>,
	/// The preparation steps, in order.
	pub instructions: Vec<String>,
	/// The creation time of the recipe.
	pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A validated recipe that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
	pub username: String,
	pub title: String,
	pub tagline: String,
	pub ingredients: Vec<String>,
	pub instructions: Vec<String>,
}

/// A list field as submitted: either one string or a list of strings.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Steps {
	One(String),
	Many(Vec<String>),
}

impl Steps {
	/// An empty string counts as not submitted at all.
	fn is_present(&self) -> bool {
		match self {
			Self::One(value) => !value.is_empty(),
			Self::Many(..) => true,
		}
	}
}

/// The body of a recipe creation request.
///
/// Every field is optional here so that a missing field is reported with its
/// own code instead of a generic parse failure. A `username` in the body is
/// ignored, the owner always comes from the access token.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct CreateRecipeInput {
	/// The name of the dish.
	pub title: Option<String>,
	/// A short line describing the dish.
	pub tagline: Option<String>,
	/// At least two ingredients.
	pub ingredients: Option<Steps>,
	/// At least two preparation steps.
	pub instructions: Option<Steps>,
}

impl CreateRecipeInput {
	/// Validates the input, stopping at the first failed check, and builds the
	/// recipe owned by `username`.
	pub fn into_new_recipe(self, username: String) -> Result<NewRecipe, Error> {
		let title = required(self.title, Error::MissingTitle)?;
		let tagline = required(self.tagline, Error::MissingTagline)?;

		let ingredients = self
			.ingredients
			.filter(Steps::is_present)
			.ok_or(Error::MissingIngredients)?;
		let instructions = self
			.instructions
			.filter(Steps::is_present)
			.ok_or(Error::MissingInstructions)?;

		let Steps::Many(ingredients) = ingredients else {
			return Err(Error::MultipleIngredientsNeeded);
		};
		let Steps::Many(instructions) = instructions else {
			return Err(Error::MultiplePreparationStepsNeeded);
		};

		let ingredients = filter_blank(ingredients);
		let instructions = filter_blank(instructions);

		if ingredients.len() < MIN_STEPS {
			return Err(Error::MultipleIngredientsNeeded);
		}

		if instructions.len() < MIN_STEPS {
			return Err(Error::MultiplePreparationStepsNeeded);
		}

		Ok(NewRecipe {
			username,
			title,
			tagline,
			ingredients,
			instructions,
		})
	}
}

/// Trims the value, failing with `error` when nothing is left.
fn required(value: Option<String>, error: Error) -> Result<String, Error> {
	match value.as_deref().map(str::trim) {
		Some(value) if !value.is_empty() => Ok(value.to_owned()),
		_ => Err(error),
	}
}

/// Trims every item and drops the ones that end up empty.
pub fn filter_blank(items: Vec<String>) -> Vec<String> {
	items
		.into_iter()
		.map(|item| item.trim().to_owned())
		.filter(|item| !item.is_empty())
		.collect()
}

/// The query string of a recipe search.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct RecipeQuery {
	/// Only return the recipe with this id.
	pub recipe_id: Option<String>,
	/// Only return recipes submitted by this user.
	pub username: Option<String>,
	/// The page to return (1-indexed, 20 recipes per page).
	#[serde(rename = "pageNum")]
	pub page_num: Option<String>,
}

/// Conditions a recipe must meet to be returned, combined with AND.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecipeFilter {
	pub id: Option<Uuid>,
	pub username: Option<String>,
}

/// A validated recipe search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeSearch {
	pub filter: RecipeFilter,
	pub paginate: Paginate,
}

impl RecipeQuery {
	/// Validates the page number and then the recipe id, building the search.
	pub fn into_search(self) -> Result<RecipeSearch, Error> {
		let page = sanitize_page_number(self.page_num.as_deref());
		let paginate = Paginate::new(page).ok_or(Error::InvalidPageNumber(page))?;

		let id = non_empty(self.recipe_id)
			.map(|id| Uuid::parse_str(&id).map_err(|_| Error::InvalidRecipeId(id)))
			.transpose()?;

		Ok(RecipeSearch {
			filter: RecipeFilter {
				id,
				username: non_empty(self.username),
			},
			paginate,
		})
	}
}

fn non_empty(value: Option<String>) -> Option<String> {
	value.filter(|value| !value.is_empty())
}

/// The payload of a successful creation.
#[derive(Debug, Serialize, JsonSchema)]
pub struct RecipePayload {
	pub recipe: Recipe,
}

/// The payload of a successful search.
#[derive(Debug, Serialize, JsonSchema)]
pub struct RecipesPayload {
	pub recipes: Vec<Recipe>,
}
