use crate::{
	route::recipe::model::{NewRecipe, Paginate, Recipe, RecipeFilter},
	Database,
};

/// Where recipes are kept.
///
/// Handlers only see this trait, so they can be exercised without a database.
#[axum::async_trait]
pub trait RecipeStore: Send + Sync {
	/// Stores a new recipe, returning it with its id and creation time.
	async fn create(&self, recipe: NewRecipe) -> Result<Recipe, sqlx::Error>;

	/// Returns one page of the recipes matching `filter`, oldest first.
	async fn find(
		&self,
		filter: &RecipeFilter,
		paginate: Paginate,
	) -> Result<Vec<Recipe>, sqlx::Error>;
}

/// A [`RecipeStore`] backed by the `recipe` table.
pub struct PgRecipeStore {
	database: Database,
}

impl PgRecipeStore {
	pub fn new(database: Database) -> Self {
		Self { database }
	}
}

#[axum::async_trait]
impl RecipeStore for PgRecipeStore {
	#[tracing::instrument(skip_all, fields(username = %recipe.username))]
	async fn create(&self, recipe: NewRecipe) -> Result<Recipe, sqlx::Error> {
		sqlx::query_as::<_, Recipe>(
			r#"
				INSERT INTO recipe (id, username, title, tagline, ingredients, instructions)
				VALUES (DEFAULT, $1, $2, $3, $4, $5)
				RETURNING *
			"#,
		)
		.bind(recipe.username)
		.bind(recipe.title)
		.bind(recipe.tagline)
		.bind(recipe.ingredients)
		.bind(recipe.instructions)
		.fetch_one(&self.database)
		.await
	}

	#[tracing::instrument(skip(self))]
	async fn find(
		&self,
		filter: &RecipeFilter,
		paginate: Paginate,
	) -> Result<Vec<Recipe>, sqlx::Error> {
		sqlx::query_as::<_, Recipe>(
			r#"
				SELECT * FROM recipe
				WHERE ($1::uuid IS NULL OR id = $1)
				AND ($2::text IS NULL OR username = $2)
				ORDER BY created_at ASC, id ASC
				LIMIT $3 OFFSET $4
			"#,
		)
		.bind(filter.id)
		.bind(filter.username.as_deref())
		.bind(paginate.limit())
		.bind(paginate.offset())
		.fetch_all(&self.database)
		.await
	}
}
