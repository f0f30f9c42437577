use std::borrow::Cow;

use aide::axum::{
	routing::{get_with, post_with},
	ApiRouter,
};
use axum::{http::StatusCode, Extension};
use serde_json::json;
use uuid::Uuid;

use crate::{error, AppState};

pub mod model;
pub mod route;

use model::Genre;

/// An error that can occur while working with posts.
///
/// A post that exists but belongs to another genre is reported exactly
/// like a post that does not exist.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown post {0}")]
	UnknownPost(Uuid),
}

pub type RouteError = error::RouteError<Error>;

impl From<Error> for RouteError {
	fn from(error: Error) -> Self {
		Self::Route(error)
	}
}

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.merge(genre_routes(Genre::News))
		.merge(genre_routes(Genre::Article))
		.api_route("/post/:id/", get_with(get_post, get_post_docs))
		.api_route("/search/", get_with(search_posts, search_posts_docs))
}

/// Routes scoped to a single genre, nested under its list path.
fn genre_routes(genre: Genre) -> ApiRouter<AppState> {
	use route::*;

	let base = genre.list_path();

	ApiRouter::new()
		.api_route(base, get_with(list_posts, list_posts_docs))
		.api_route(
			&format!("{base}create/"),
			post_with(create_post, create_post_docs),
		)
		.api_route(
			&format!("{base}:id/edit/"),
			post_with(update_post, update_post_docs),
		)
		.api_route(
			&format!("{base}:id/delete/"),
			post_with(delete_post, delete_post_docs),
		)
		.layer(Extension(genre))
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownPost(..) => StatusCode::NOT_FOUND,
		}
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		match self {
			Self::UnknownPost(post) => vec![error::Message {
				content: "unknown_post".into(),
				field: None,
				details: Some(Cow::Owned({
					let mut map = error::Map::new();
					map.insert("post".into(), json!(post));
					map
				})),
			}],
		}
	}
}
