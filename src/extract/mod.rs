use std::convert::Infallible;

use aide::{OperationInput, OperationIo};
use axum::{
	body::Body,
	extract::{FromRequest, FromRequestParts, Request},
	http::{request, Response},
	response::IntoResponse,
};
use serde::de;

use crate::error::AppError;

/// Runs the form validation rules of `value`.
///
/// Nothing downstream of an extractor ever sees input that failed here.
fn validated<T: validator::Validate>(value: T) -> Result<T, AppError> {
	match value.validate() {
		Ok(()) => Ok(value),
		Err(errors) => {
			tracing::debug!(%errors, "rejected invalid input");
			Err(AppError::Validation(errors))
		}
	}
}

/// Extractor that deserializes a JSON body and validates it.
///
/// T must implement [`serde::de::DeserializeOwned`] and [`validator::Validate`]
/// in order to be used in an extractor.
///
/// ```rust
/// async fn route(Json(post): Json<CreatePostInput>) {
///   // ...
/// }
/// ```
#[derive(OperationIo)]
#[aide(input_with = "axum::Json<T>", output_with = "axum::Json<T>", json_schema)]
pub struct Json<T>(pub T);

impl<T> IntoResponse for Json<T>
where
	T: serde::Serialize,
{
	fn into_response(self) -> Response<Body> {
		axum::Json(self.0).into_response()
	}
}

#[axum::async_trait]
impl<T, S> FromRequest<S> for Json<T>
where
	T: de::DeserializeOwned + validator::Validate,
	S: Send + Sync,
{
	type Rejection = AppError;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		let result = axum::Json::<T>::from_request(req, state).await?.0;

		validated(result).map(Self)
	}
}

/// Extractor that deserializes a JSON body, leaving validation to the
/// handler.
///
/// Decoding and validation errors are only reported by [`LazyJson::validate`],
/// so a handler can reject a request for other reasons (such as an unknown
/// resource) before looking at its body.
pub struct LazyJson<T>(Result<T, AppError>);

impl<T: validator::Validate> LazyJson<T> {
	pub fn validate(self) -> Result<T, AppError> {
		self.0.and_then(validated)
	}
}

#[axum::async_trait]
impl<T, S> FromRequest<S> for LazyJson<T>
where
	T: de::DeserializeOwned,
	S: Send + Sync,
{
	type Rejection = Infallible;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		let result = axum::Json::<T>::from_request(req, state)
			.await
			.map(|json| json.0)
			.map_err(AppError::from);

		Ok(Self(result))
	}
}

impl<T: schemars::JsonSchema> OperationInput for LazyJson<T> {
	fn operation_input(ctx: &mut aide::gen::GenContext, operation: &mut aide::openapi::Operation) {
		axum::Json::<T>::operation_input(ctx, operation);
	}
}

/// Extractor that deserializes a query string and validates it.
///
/// This is similar to [`Json<T>`], but does not consume the body.
/// Unknown parameters are ignored, so several `Query` extractors can
/// read different parts of the same query string.
#[derive(OperationIo)]
#[aide(
	input_with = "axum::extract::Query<T>",
	output_with = "axum::Json<T>",
	json_schema
)]
pub struct Query<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for Query<T>
where
	T: de::DeserializeOwned + validator::Validate,
	S: Send + Sync,
{
	type Rejection = AppError;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let result = axum::extract::Query::<T>::from_request_parts(parts, state)
			.await?
			.0;

		validated(result).map(Self)
	}
}

/// Extractor that deserializes a path parameter and validates it.
#[derive(OperationIo)]
#[aide(
	input_with = "axum::extract::Path<T>",
	output_with = "axum::Json<T>",
	json_schema
)]
pub struct Path<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for Path<T>
where
	T: de::DeserializeOwned + validator::Validate + Send,
	S: Send + Sync,
{
	type Rejection = AppError;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let result = axum::extract::Path::<T>::from_request_parts(parts, state)
			.await?
			.0;

		validated(result).map(Self)
	}
}
