pub use crate::route::model::{IdInput, Page, Paginate};

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// The category a post belongs to.
///
/// Fixed by the endpoint a post is created through and never changed
/// afterwards.
#[derive(
	Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "post_genre", rename_all = "lowercase")]
pub enum Genre {
	News,
	Article,
}

impl Genre {
	/// The path of the list view for this genre.
	pub fn list_path(self) -> &'static str {
		match self {
			Self::News => "/news/",
			Self::Article => "/articles/",
		}
	}
}

/// A single post, either a news item or an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, sqlx::FromRow)]
pub struct Post {
	/// The unique identifier of the post.
	pub id: Uuid,
	/// Whether this post is a news item or an article.
	pub genre: Genre,
	/// The title of the post.
	pub title: String,
	/// The content of the post.
	pub body: String,
	/// The name the post is signed with.
	pub author: Option<String>,
	/// The creation time of the post.
	pub created_at: DateTime<Utc>,
}

/// Rejects a missing or empty content field.
fn required(value: &str) -> Result<(), ValidationError> {
	if value.is_empty() {
		return Err(ValidationError::new("required"));
	}

	Ok(())
}

/// The fields of a new post. The genre is decided by the route.
///
/// Missing fields decode as empty, so they are reported by validation
/// along with every other invalid field.
#[derive(Debug, Clone, Deserialize, Validate, JsonSchema)]
pub struct CreatePostInput {
	#[validate(custom(function = "required"), length(max = 128))]
	#[serde(default)]
	pub title: String,
	#[validate(custom(function = "required"), length(max = 65536))]
	#[serde(default)]
	pub body: String,
	#[validate(length(min = 1, max = 64))]
	pub author: Option<String>,
}

/// Changes to an existing post. Omitted fields are left as they are.
#[derive(Debug, Clone, Default, Deserialize, Validate, JsonSchema)]
pub struct UpdatePostInput {
	#[validate(custom(function = "required"), length(max = 128))]
	pub title: Option<String>,
	#[validate(custom(function = "required"), length(max = 65536))]
	pub body: Option<String>,
	#[validate(length(min = 1, max = 64))]
	pub author: Option<String>,
}

/// Search criteria for posts. Every criterion is optional and
/// all given criteria must match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, JsonSchema)]
pub struct PostFilter {
	/// Only posts whose title contains this text, ignoring case.
	#[validate(length(max = 128))]
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	/// Only posts whose author contains this text, ignoring case.
	#[validate(length(max = 64))]
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub author: Option<String>,
	/// Only posts of this genre.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub genre: Option<Genre>,
	/// Only posts created at or after this time.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub after: Option<DateTime<Utc>>,
}

impl PostFilter {
	/// A filter matching every post of one genre.
	pub fn genre(genre: Genre) -> Self {
		Self {
			genre: Some(genre),
			..Self::default()
		}
	}

	pub fn matches(&self, post: &Post) -> bool {
		fn contains(haystack: &str, needle: &str) -> bool {
			haystack.to_lowercase().contains(&needle.to_lowercase())
		}

		self.genre.map_or(true, |genre| post.genre == genre)
			&& self.after.map_or(true, |after| post.created_at >= after)
			&& self
				.title
				.as_deref()
				.map_or(true, |title| contains(&post.title, title))
			&& self.author.as_deref().map_or(true, |author| {
				post.author
					.as_deref()
					.is_some_and(|name| contains(name, author))
			})
	}
}

/// A page of search results.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchPage {
	#[serde(flatten)]
	pub page: Page<Post>,
	/// The filter the results were selected with.
	pub filter: PostFilter,
	/// The time the search was performed.
	pub time_now: DateTime<Utc>,
}

/// The outcome of deleting a post.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct Deleted {
	/// The list view the client should return to.
	pub redirect: String,
}
