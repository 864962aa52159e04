//! Shared helpers for handler tests: an in-memory store and token signing.

use std::sync::{
	atomic::{AtomicBool, AtomicUsize, Ordering},
	Arc,
};

pub use axum::http::{header, HeaderValue, StatusCode};
pub use axum_test::TestServer;
pub use serde_json::{json, Value};

use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
	route::{
		self,
		recipe::model::{NewRecipe, Paginate, Recipe, RecipeFilter},
	},
	session::{Claims, Keys},
	store::RecipeStore,
	State,
};

pub const SECRET: &str = "handler-test-secret-of-at-least-32-bytes";

/// A [`RecipeStore`] that keeps recipes in memory.
#[derive(Default)]
pub struct MemoryStore {
	recipes: Mutex<Vec<Recipe>>,
	calls: AtomicUsize,
	fail: AtomicBool,
}

impl MemoryStore {
	pub fn shared() -> Arc<Self> {
		Arc::default()
	}

	/// A store whose every call fails like an unreachable database.
	pub fn failing() -> Arc<Self> {
		let store = Self::shared();
		store.fail.store(true, Ordering::SeqCst);
		store
	}

	/// How many times the handlers reached the store.
	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	pub async fn recipes(&self) -> Vec<Recipe> {
		self.recipes.lock().await.clone()
	}

	/// Inserts a recipe directly, without counting as a call.
	pub async fn seed(&self, username: &str, title: &str) -> Recipe {
		let recipe = Recipe {
			id: Uuid::new_v4(),
			username: username.into(),
			title: title.into(),
			tagline: "Seeded".into(),
			ingredients: vec!["Salt".into(), "Pepper".into()],
			instructions: vec!["Mix".into(), "Serve".into()],
			created_at: Utc::now(),
		};

		self.recipes.lock().await.push(recipe.clone());
		recipe
	}

	fn call(&self) -> Result<(), sqlx::Error> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		if self.fail.load(Ordering::SeqCst) {
			Err(sqlx::Error::PoolTimedOut)
		} else {
			Ok(())
		}
	}
}

#[axum::async_trait]
impl RecipeStore for MemoryStore {
	async fn create(&self, recipe: NewRecipe) -> Result<Recipe, sqlx::Error> {
		self.call()?;

		let recipe = Recipe {
			id: Uuid::new_v4(),
			username: recipe.username,
			title: recipe.title,
			tagline: recipe.tagline,
			ingredients: recipe.ingredients,
			instructions: recipe.instructions,
			created_at: Utc::now(),
		};

		self.recipes.lock().await.push(recipe.clone());
		Ok(recipe)
	}

	async fn find(
		&self,
		filter: &RecipeFilter,
		paginate: Paginate,
	) -> Result<Vec<Recipe>, sqlx::Error> {
		self.call()?;

		let mut recipes = self
			.recipes
			.lock()
			.await
			.iter()
			.filter(|recipe| filter.id.map_or(true, |id| recipe.id == id))
			.filter(|recipe| {
				filter
					.username
					.as_deref()
					.map_or(true, |username| recipe.username == username)
			})
			.cloned()
			.collect::<Vec<_>>();

		recipes.sort_by_key(|recipe| recipe.created_at);

		Ok(recipes
			.into_iter()
			.skip(usize::try_from(paginate.offset()).unwrap())
			.take(usize::try_from(paginate.limit()).unwrap())
			.collect())
	}
}

/// Serves the whole application on top of `store`, without rate limits.
pub fn app(store: Arc<MemoryStore>) -> TestServer {
	let state = State {
		store,
		keys: Keys::new(SECRET.as_bytes()),
	};

	TestServer::new(route::router(state, None)).unwrap()
}

/// Signs an access token for `username`, valid for an hour.
pub fn token(username: &str) -> String {
	let claims = Claims {
		username: username.into(),
		exp: Utc::now().timestamp() + 3600,
	};

	jsonwebtoken::encode(
		&Header::default(),
		&claims,
		&EncodingKey::from_secret(SECRET.as_bytes()),
	)
	.unwrap()
}

/// An `Authorization` header value carrying a token for `username`.
pub fn bearer(username: &str) -> HeaderValue {
	HeaderValue::from_str(&format!("Bearer {}", token(username))).unwrap()
}
