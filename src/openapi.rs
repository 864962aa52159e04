use aide::{
	openapi::{ApiKeyLocation, SecurityScheme, Tag},
	transform::TransformOpenApi,
};

use crate::{
	extract::Json,
	message::{Code, Message},
	session,
};

pub const SECURITY_SCHEME_BEARER: &str = "Bearer";
pub const SECURITY_SCHEME_ACCESS_TOKEN: &str = "Access Token";

pub mod tag {
	pub const RECIPE: &str = "Recipe";
}

pub fn docs(api: TransformOpenApi) -> TransformOpenApi {
	api.title("Recipe Book")
		.summary("Share and search recipes")
		.description(include_str!("../README.md"))
		.tag(Tag {
			name: tag::RECIPE.into(),
			description: Some("Recipe submission and search".into()),
			..Default::default()
		})
		.security_scheme(
			SECURITY_SCHEME_BEARER,
			SecurityScheme::Http {
				scheme: "bearer".into(),
				bearer_format: Some("JWT".into()),
				description: Some("An access token issued by the login service".into()),
				extensions: Default::default(),
			},
		)
		.security_scheme(
			SECURITY_SCHEME_ACCESS_TOKEN,
			SecurityScheme::ApiKey {
				location: ApiKeyLocation::Header,
				name: session::ACCESS_TOKEN_HEADER.into(),
				description: Some(
					"The same access token, for clients that cannot set `Authorization`".into(),
				),
				extensions: Default::default(),
			},
		)
		.default_response_with::<Json<Message>, _>(|res| res.example(Message::from(Code::DbError)))
}
