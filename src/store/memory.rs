//! In-memory post store, used when no database is configured and in tests.
//! Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Error, PostStore};
use crate::route::post::model::{
	CreatePostInput, Genre, Page, Paginate, Post, PostFilter, UpdatePostInput,
};

#[derive(Default)]
struct Inner {
	posts: HashMap<Uuid, Post>,
	last_created_at: Option<DateTime<Utc>>,
}

impl Inner {
	/// Creation times are strictly increasing, even when the clock
	/// reports the same instant twice.
	fn next_created_at(&mut self) -> DateTime<Utc> {
		let mut now = Utc::now();

		if let Some(last) = self.last_created_at {
			if now <= last {
				now = last + chrono::Duration::microseconds(1);
			}
		}

		self.last_created_at = Some(now);
		now
	}
}

#[derive(Default)]
pub struct MemoryPostStore {
	inner: RwLock<Inner>,
}

impl MemoryPostStore {
	pub fn new() -> Self {
		Self::default()
	}
}

#[async_trait]
impl PostStore for MemoryPostStore {
	async fn list(&self, filter: &PostFilter, paginate: &Paginate) -> Result<Page<Post>, Error> {
		let inner = self.inner.read().await;

		let mut posts = inner
			.posts
			.values()
			.filter(|post| filter.matches(post))
			.collect::<Vec<_>>();

		posts.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

		let total = i64::try_from(posts.len()).unwrap_or(i64::MAX);
		let offset = usize::try_from(paginate.offset()).unwrap_or(usize::MAX);
		let limit = usize::try_from(paginate.limit()).unwrap_or_default();

		let items = posts
			.into_iter()
			.skip(offset)
			.take(limit)
			.cloned()
			.collect();

		Ok(Page::new(items, paginate, total))
	}

	async fn get(&self, id: Uuid) -> Result<Option<Post>, Error> {
		Ok(self.inner.read().await.posts.get(&id).cloned())
	}

	async fn create(&self, genre: Genre, input: CreatePostInput) -> Result<Post, Error> {
		let mut inner = self.inner.write().await;

		let post = Post {
			id: Uuid::new_v4(),
			genre,
			title: input.title,
			body: input.body,
			author: input.author,
			created_at: inner.next_created_at(),
		};

		inner.posts.insert(post.id, post.clone());

		Ok(post)
	}

	async fn update(
		&self,
		id: Uuid,
		genre: Genre,
		input: UpdatePostInput,
	) -> Result<Option<Post>, Error> {
		let mut inner = self.inner.write().await;

		let Some(post) = inner.posts.get_mut(&id).filter(|post| post.genre == genre) else {
			return Ok(None);
		};

		if let Some(title) = input.title {
			post.title = title;
		}

		if let Some(body) = input.body {
			post.body = body;
		}

		if let Some(author) = input.author {
			post.author = Some(author);
		}

		Ok(Some(post.clone()))
	}

	async fn delete(&self, id: Uuid, genre: Genre) -> Result<bool, Error> {
		let mut inner = self.inner.write().await;

		if !inner.posts.get(&id).is_some_and(|post| post.genre == genre) {
			return Ok(false);
		}

		Ok(inner.posts.remove(&id).is_some())
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::store::tests;

	#[test]
	fn test_created_at_is_strictly_increasing() {
		let mut inner = Inner::default();

		let times = (0..100).map(|_| inner.next_created_at()).collect::<Vec<_>>();

		assert!(times.windows(2).all(|w| w[0] < w[1]));
	}

	#[tokio::test]
	async fn test_list_is_newest_first_in_pages() {
		tests::list_is_newest_first_in_pages(&MemoryPostStore::new()).await;
	}

	#[tokio::test]
	async fn test_list_past_the_end_is_empty() {
		tests::list_past_the_end_is_empty(&MemoryPostStore::new()).await;
	}

	#[tokio::test]
	async fn test_list_is_partitioned_by_genre() {
		tests::list_is_partitioned_by_genre(&MemoryPostStore::new()).await;
	}

	#[tokio::test]
	async fn test_update_requires_matching_genre() {
		tests::update_requires_matching_genre(&MemoryPostStore::new()).await;
	}

	#[tokio::test]
	async fn test_delete_requires_matching_genre() {
		tests::delete_requires_matching_genre(&MemoryPostStore::new()).await;
	}

	#[tokio::test]
	async fn test_search_matches_text_literally() {
		tests::search_matches_text_literally(&MemoryPostStore::new()).await;
	}

	#[tokio::test]
	async fn test_search_after_includes_the_boundary() {
		tests::search_after_includes_the_boundary(&MemoryPostStore::new()).await;
	}
}
