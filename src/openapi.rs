use std::borrow::Cow;

use aide::{openapi::Tag, transform::TransformOpenApi};

use crate::{error, extract::Json};

pub mod tag {
	pub const POST: &str = "Post";
}

pub fn docs(api: TransformOpenApi) -> TransformOpenApi {
	api.title("Newspaper API")
		.summary("News and articles")
		.description(include_str!("../README.md"))
		.tag(Tag {
			name: tag::POST.into(),
			description: Some("News and article management".into()),
			..Default::default()
		})
		.default_response_with::<Json<Vec<error::Message<'static>>>, _>(|res| {
			res.example(vec![error::Message {
				content: "unknown_post".into(),
				field: None,
				details: Some(Cow::Owned({
					let mut map = error::Map::new();
					map.insert(
						"post".into(),
						serde_json::json!("00000000-0000-0000-0000-000000000000"),
					);
					map
				})),
			}])
		})
}
