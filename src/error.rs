use std::borrow::Cow;

use aide::OperationOutput;
use axum::{
	body::Body,
	extract::rejection,
	http::{header, Response, StatusCode},
	response::IntoResponse,
};
use schemars::JsonSchema;
use serde::Serialize;
use tower_governor::GovernorError;

use crate::{extract::Json, store};

pub type Map = serde_json::Map<String, serde_json::Value>;

/// A single error message sent to the client.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Message<'a> {
	/// A machine-readable error code.
	pub content: Cow<'a, str>,
	/// The input field that caused the error, if any.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub field: Option<Cow<'a, str>>,
	/// Additional context for the error.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<Cow<'a, Map>>,
}

/// Describes how an error is presented to the client.
pub trait ErrorShape: std::error::Error {
	fn status(&self) -> StatusCode;
	fn errors(&self) -> Vec<Message<'_>>;
}

/// Errors shared by every route.
///
/// The Display trait is not sent to the client, so it can show
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("json error: {0}")]
	Json(#[from] rejection::JsonRejection),
	#[error("query error: {0}")]
	Query(#[from] rejection::QueryRejection),
	#[error("path error: {0}")]
	Path(#[from] rejection::PathRejection),
	#[error("store error: {0}")]
	Store(#[from] store::Error),
	#[error("rate limited")]
	RateLimit(GovernorError),
}

impl From<GovernorError> for AppError {
	fn from(error: GovernorError) -> Self {
		Self::RateLimit(error)
	}
}

/// The input field a JSON data error points at, read from its
/// `target type: <path>: <reason>` text.
fn json_error_field(text: &str) -> Option<&str> {
	let (_, rest) = text.split_once("target type: ")?;
	let (path, _) = rest.split_once(": ")?;

	(path != "." && !path.contains(char::is_whitespace)).then_some(path)
}

impl ErrorShape for AppError {
	fn status(&self) -> StatusCode {
		match self {
			Self::Validation(..)
			| Self::Query(..)
			| Self::Json(rejection::JsonRejection::JsonDataError(..)) => StatusCode::BAD_REQUEST,
			Self::Json(rejection) => rejection.status(),
			// a malformed id can never name an existing post
			Self::Path(..) => StatusCode::NOT_FOUND,
			Self::Store(..) => StatusCode::INTERNAL_SERVER_ERROR,
			Self::RateLimit(GovernorError::TooManyRequests { .. }) => StatusCode::TOO_MANY_REQUESTS,
			Self::RateLimit(..) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn errors(&self) -> Vec<Message<'_>> {
		match self {
			Self::Validation(errors) => {
				let mut messages = errors
					.field_errors()
					.into_iter()
					.flat_map(|(field, errors)| {
						let field = field.to_string();

						errors.iter().map(move |error| Message {
							content: error.code.clone(),
							field: Some(Cow::Owned(field.clone())),
							details: None,
						})
					})
					.collect::<Vec<_>>();

				messages.sort_by(|a, b| a.field.cmp(&b.field));
				messages
			}
			Self::Json(rejection::JsonRejection::JsonDataError(error)) => vec![Message {
				content: "invalid_type".into(),
				field: json_error_field(&error.body_text()).map(|field| Cow::Owned(field.into())),
				details: None,
			}],
			Self::Json(rejection) => vec![Message {
				content: rejection.body_text().into(),
				field: None,
				details: None,
			}],
			Self::Query(rejection) => vec![Message {
				content: rejection.body_text().into(),
				field: None,
				details: None,
			}],
			Self::Path(..) => vec![Message {
				content: "not_found".into(),
				field: None,
				details: None,
			}],
			Self::Store(..) => vec![Message {
				content: "internal_error".into(),
				field: None,
				details: None,
			}],
			Self::RateLimit(..) => vec![Message {
				content: "rate_limited".into(),
				field: None,
				details: None,
			}],
		}
	}
}

/// Renders an [`ErrorShape`], logging server-side failures.
fn shape_response<E: ErrorShape>(error: &E) -> Response<Body> {
	let status = error.status();

	if status.is_server_error() {
		tracing::error!(%error, "request failed");
	}

	(status, Json(error.errors())).into_response()
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response<Body> {
		let mut response = shape_response(&self);

		if let Self::RateLimit(GovernorError::TooManyRequests { wait_time, .. }) = self {
			if let Ok(value) = wait_time.to_string().parse() {
				response.headers_mut().insert(header::RETRY_AFTER, value);
			}
		}

		response
	}
}

/// The error type returned by route handlers.
///
/// `E` is the route module's own error type, which decides how its
/// variants are presented through [`ErrorShape`].
#[derive(Debug, thiserror::Error)]
pub enum RouteError<E> {
	#[error(transparent)]
	App(#[from] AppError),
	#[error(transparent)]
	Route(E),
}

impl<E> From<store::Error> for RouteError<E> {
	fn from(error: store::Error) -> Self {
		Self::App(error.into())
	}
}

impl<E> IntoResponse for RouteError<E>
where
	E: ErrorShape,
{
	fn into_response(self) -> Response<Body> {
		match self {
			Self::App(error) => error.into_response(),
			Self::Route(error) => shape_response(&error),
		}
	}
}

impl<E> OperationOutput for RouteError<E> {
	type Inner = Vec<Message<'static>>;
}

#[cfg(test)]
mod test {
	use validator::Validate;

	use super::*;

	#[derive(Validate)]
	struct Input {
		#[validate(length(min = 1))]
		title: String,
		#[validate(range(min = 1))]
		page: i64,
	}

	#[test]
	fn test_validation_errors_are_per_field() {
		let errors = Input {
			title: String::new(),
			page: 0,
		}
		.validate()
		.unwrap_err();

		let error = AppError::from(errors);
		let messages = error.errors();

		assert_eq!(error.status(), StatusCode::BAD_REQUEST);
		assert_eq!(messages.len(), 2);
		assert_eq!(messages[0].field.as_deref(), Some("page"));
		assert_eq!(messages[0].content, "range");
		assert_eq!(messages[1].field.as_deref(), Some("title"));
		assert_eq!(messages[1].content, "length");
	}

	#[test]
	fn test_json_error_field() {
		assert_eq!(
			json_error_field(
				"Failed to deserialize the JSON body into the target type: title: invalid type: integer `5`, expected a string at line 1 column 11"
			),
			Some("title")
		);
		assert_eq!(
			json_error_field(
				"Failed to deserialize the JSON body into the target type: invalid type: integer `5`, expected struct Input at line 1 column 1"
			),
			None
		);
		assert_eq!(
			json_error_field("Failed to deserialize the JSON body into the target type: .: invalid type"),
			None
		);
	}

	#[test]
	fn test_store_errors_are_opaque() {
		let error = AppError::from(store::Error::from(sqlx::Error::RowNotFound));

		assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(error.errors()[0].content, "internal_error");
		assert!(error.errors()[0].details.is_none());
	}
}
