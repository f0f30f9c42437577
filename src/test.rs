//! Helpers shared by the HTTP tests.

use std::sync::Arc;

pub use axum_test::TestServer;
pub use serde_json::json;

use crate::{
	route::post::model::{Genre, Post},
	store::MemoryPostStore,
	State,
};

/// Serves the application over an empty in-memory store.
pub fn app() -> TestServer {
	let state = State {
		store: Arc::new(MemoryPostStore::new()),
	};

	TestServer::new(crate::app(state)).unwrap()
}

/// Creates a post through the create route of `genre`.
pub async fn create_post(app: &TestServer, genre: Genre, title: &str) -> Post {
	let response = app
		.post(&format!("{}create/", genre.list_path()))
		.json(&json!({
			"title": title,
			"body": format!("The body of {title}."),
		}))
		.await;

	assert_eq!(response.status_code(), 200);

	response.json::<Post>()
}
