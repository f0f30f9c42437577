use std::sync::Arc;

use aide::{
	axum::{routing::get, ApiRouter, IntoApiResponse},
	openapi::OpenApi,
};
use axum::{response::IntoResponse, Extension};

use crate::{extract::Json, AppState};

/// Serves the generated OpenAPI document. The route itself is left out of it.
pub fn routes() -> ApiRouter<AppState> {
	ApiRouter::new().route("/docs/api.json", get(serve_docs))
}

async fn serve_docs(Extension(api): Extension<Arc<OpenApi>>) -> impl IntoApiResponse {
	Json(api.as_ref()).into_response()
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[tokio::test]
	async fn test_docs_list_post_routes() {
		let app = app();

		let response = app.get("/docs/api.json").await;

		assert_eq!(response.status_code(), 200);

		let api = response.json::<serde_json::Value>();

		assert!(api["paths"]["/news/"]["get"].is_object());
		assert!(api["paths"]["/articles/{id}/delete/"]["post"].is_object());
		assert!(api["paths"]["/search/"]["get"].is_object());
		assert!(api["paths"].get("/docs/api.json").is_none());
	}
}
