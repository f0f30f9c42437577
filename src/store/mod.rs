//! Persistence of posts.
//!
//! Every operation that is scoped to a genre takes it explicitly, so a
//! store never returns or changes a post of another genre.

mod memory;
mod postgres;

pub use memory::MemoryPostStore;
pub use postgres::PgPostStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::route::post::model::{
	CreatePostInput, Genre, Page, Paginate, Post, PostFilter, UpdatePostInput,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
	#[error("migration error: {0}")]
	Migrate(#[from] sqlx::migrate::MigrateError),
}

#[async_trait]
pub trait PostStore: Send + Sync {
	/// Returns one page of the posts matching `filter`, newest first.
	async fn list(&self, filter: &PostFilter, paginate: &Paginate) -> Result<Page<Post>, Error>;

	/// Finds a post by id, whatever its genre.
	async fn get(&self, id: Uuid) -> Result<Option<Post>, Error>;

	/// Stores a new post of the given genre.
	async fn create(&self, genre: Genre, input: CreatePostInput) -> Result<Post, Error>;

	/// Applies `input` to the post with this id, if it has this genre.
	///
	/// Returns `None` when no such post exists.
	async fn update(
		&self,
		id: Uuid,
		genre: Genre,
		input: UpdatePostInput,
	) -> Result<Option<Post>, Error>;

	/// Removes the post with this id, if it has this genre.
	///
	/// Returns `false` when no such post exists.
	async fn delete(&self, id: Uuid, genre: Genre) -> Result<bool, Error>;
}
