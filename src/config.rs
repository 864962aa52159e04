use std::{fmt::Display, net::IpAddr, str::FromStr};

use validator::Validate;

/// An error while loading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{0} must be set")]
	Missing(&'static str),
	#[error("{key} has an invalid value: {reason}")]
	Invalid { key: &'static str, reason: String },
	#[error("invalid configuration: {0}")]
	Validation(#[from] validator::ValidationErrors),
}

/// Runtime configuration, read from the environment (and `.env`).
#[derive(Debug, Validate)]
pub struct Config {
	/// `HOST`, the address to listen on.
	pub host: IpAddr,
	/// `PORT`, the port to listen on.
	pub port: u16,
	/// `DATABASE_URL`, the Postgres connection string.
	#[validate(url)]
	pub database_url: String,
	/// `DATABASE_MAX_CONNECTIONS`, the size of the connection pool.
	#[validate(range(min = 1, max = 1024))]
	pub database_max_connections: u32,
	/// `JWT_SECRET`, the secret access tokens are signed with.
	#[validate(length(min = 32))]
	pub jwt_secret: String,
	/// `RATE_LIMIT`, whether per-IP rate limiting is enabled.
	pub rate_limit: bool,
	/// `OTEL_EXPORTER_OTLP_ENDPOINT`, where traces and metrics are exported.
	#[validate(url)]
	pub otlp_endpoint: Option<String>,
}

impl Config {
	pub fn from_env() -> Result<Self, Error> {
		dotenvy::dotenv().ok();

		Self::from_vars(|key| std::env::var(key).ok())
	}

	/// Builds the configuration from a variable lookup, then validates it.
	pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
		let var = |key: &str| var(key).filter(|value| !value.trim().is_empty());

		let config = Self {
			host: parse(&var, "HOST", "127.0.0.1")?,
			port: parse(&var, "PORT", "8080")?,
			database_url: var("DATABASE_URL").ok_or(Error::Missing("DATABASE_URL"))?,
			database_max_connections: parse(&var, "DATABASE_MAX_CONNECTIONS", "10")?,
			jwt_secret: var("JWT_SECRET").ok_or(Error::Missing("JWT_SECRET"))?,
			rate_limit: parse(&var, "RATE_LIMIT", "true")?,
			otlp_endpoint: var("OTEL_EXPORTER_OTLP_ENDPOINT"),
		};

		config.validate()?;
		Ok(config)
	}
}

fn parse<T>(var: impl Fn(&str) -> Option<String>, key: &'static str, default: &str) -> Result<T, Error>
where
	T: FromStr,
	T::Err: Display,
{
	var(key)
		.as_deref()
		.unwrap_or(default)
		.trim()
		.parse()
		.map_err(|e: T::Err| Error::Invalid {
			key,
			reason: e.to_string(),
		})
}

/// Hides the password of a connection URL so it can be logged.
pub fn redact(url: &str) -> String {
	let Some((scheme, rest)) = url.split_once("://") else {
		return url.to_owned();
	};

	let Some((credentials, host)) = rest.rsplit_once('@') else {
		return url.to_owned();
	};

	match credentials.split_once(':') {
		Some((user, _)) => format!("{scheme}://{user}:***@{host}"),
		None => url.to_owned(),
	}
}

#[cfg(test)]
mod test {
	use std::collections::HashMap;

	use super::*;

	const SECRET: &str = "0123456789abcdef0123456789abcdef";

	fn load(vars: &[(&str, &str)]) -> Result<Config, Error> {
		let vars = vars
			.iter()
			.map(|&(key, value)| (key.to_owned(), value.to_owned()))
			.collect::<HashMap<_, _>>();

		Config::from_vars(|key| vars.get(key).cloned())
	}

	#[test]
	fn test_defaults() {
		let config = load(&[
			("DATABASE_URL", "postgres://localhost/recipes"),
			("JWT_SECRET", SECRET),
		])
		.unwrap();

		assert_eq!(config.host.to_string(), "127.0.0.1");
		assert_eq!(config.port, 8080);
		assert_eq!(config.database_max_connections, 10);
		assert!(config.rate_limit);
		assert_eq!(config.otlp_endpoint, None);
	}

	#[test]
	fn test_overrides() {
		let config = load(&[
			("HOST", "0.0.0.0"),
			("PORT", "3000"),
			("DATABASE_URL", "postgres://localhost/recipes"),
			("JWT_SECRET", SECRET),
			("RATE_LIMIT", "false"),
			("OTEL_EXPORTER_OTLP_ENDPOINT", "http://localhost:4317"),
		])
		.unwrap();

		assert_eq!(config.port, 3000);
		assert!(!config.rate_limit);
		assert_eq!(config.otlp_endpoint.as_deref(), Some("http://localhost:4317"));
	}

	#[test]
	fn test_missing_required() {
		let error = load(&[("JWT_SECRET", SECRET)]).unwrap_err();

		assert!(matches!(error, Error::Missing("DATABASE_URL")));
	}

	#[test]
	fn test_invalid_values() {
		let error = load(&[
			("PORT", "eighty"),
			("DATABASE_URL", "postgres://localhost/recipes"),
			("JWT_SECRET", SECRET),
		])
		.unwrap_err();

		assert!(matches!(error, Error::Invalid { key: "PORT", .. }));

		let error = load(&[
			("DATABASE_URL", "postgres://localhost/recipes"),
			("JWT_SECRET", "short"),
		])
		.unwrap_err();

		assert!(matches!(error, Error::Validation(..)));
	}

	#[test]
	fn test_redact() {
		assert_eq!(
			redact("postgres://recipes:hunter2@db:5432/recipes"),
			"postgres://recipes:***@db:5432/recipes"
		);
		assert_eq!(
			redact("postgres://db:5432/recipes"),
			"postgres://db:5432/recipes"
		);
	}
}
