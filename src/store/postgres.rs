use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use super::{Error, PostStore};
use crate::route::post::model::{
	CreatePostInput, Genre, Page, Paginate, Post, PostFilter, UpdatePostInput,
};

pub type Database = sqlx::Pool<sqlx::Postgres>;

/// The columns of a [`Post`], in the order they are selected.
macro_rules! columns {
	() => {
		"id, genre, title, body, author, created_at"
	};
}

/// Builds a query over the posts matching a [`PostFilter`], bound as
/// `$1` (genre), `$2` (title pattern), `$3` (author pattern), `$4` (after).
macro_rules! filtered {
	($select:expr, $tail:expr) => {
		concat!(
			$select,
			r#"
			FROM post
			WHERE ($1::post_genre IS NULL OR genre = $1)
				AND ($2::text IS NULL OR title ILIKE $2)
				AND ($3::text IS NULL OR author ILIKE $3)
				AND ($4::timestamptz IS NULL OR created_at >= $4)
			"#,
			$tail
		)
	};
}

/// Turns user input into a `LIKE` pattern matching it anywhere,
/// with wildcards in the input matched literally.
fn contains_pattern(text: &str) -> String {
	let mut pattern = String::with_capacity(text.len() + 2);

	pattern.push('%');

	for c in text.chars() {
		if matches!(c, '%' | '_' | '\\') {
			pattern.push('\\');
		}

		pattern.push(c);
	}

	pattern.push('%');
	pattern
}

/// Post store backed by PostgreSQL.
pub struct PgPostStore {
	database: Database,
}

impl PgPostStore {
	/// Wraps a pool whose database is already migrated.
	pub fn new(database: Database) -> Self {
		Self { database }
	}

	/// Connects to the database and applies pending migrations.
	pub async fn connect(url: &str, max_connections: u32) -> Result<Self, Error> {
		let database = PgPoolOptions::new()
			.max_connections(max_connections)
			.connect(url)
			.await?;

		sqlx::migrate!().run(&database).await?;

		Ok(Self::new(database))
	}
}

#[async_trait]
impl PostStore for PgPostStore {
	async fn list(&self, filter: &PostFilter, paginate: &Paginate) -> Result<Page<Post>, Error> {
		let title = filter.title.as_deref().map(contains_pattern);
		let author = filter.author.as_deref().map(contains_pattern);

		let total: i64 = sqlx::query_scalar(filtered!("SELECT COUNT(*)", ""))
			.bind(filter.genre)
			.bind(&title)
			.bind(&author)
			.bind(filter.after)
			.fetch_one(&self.database)
			.await?;

		let posts = sqlx::query_as::<_, Post>(filtered!(
			concat!("SELECT ", columns!()),
			"ORDER BY created_at DESC, id DESC LIMIT $5 OFFSET $6"
		))
		.bind(filter.genre)
		.bind(&title)
		.bind(&author)
		.bind(filter.after)
		.bind(paginate.limit())
		.bind(paginate.offset())
		.fetch_all(&self.database)
		.await?;

		Ok(Page::new(posts, paginate, total))
	}

	async fn get(&self, id: Uuid) -> Result<Option<Post>, Error> {
		let post = sqlx::query_as::<_, Post>(concat!(
			"SELECT ",
			columns!(),
			" FROM post WHERE id = $1"
		))
		.bind(id)
		.fetch_optional(&self.database)
		.await?;

		Ok(post)
	}

	async fn create(&self, genre: Genre, input: CreatePostInput) -> Result<Post, Error> {
		let post = sqlx::query_as::<_, Post>(concat!(
			r#"
			INSERT INTO post (genre, title, body, author)
			VALUES ($1, $2, $3, $4)
			RETURNING "#,
			columns!()
		))
		.bind(genre)
		.bind(input.title)
		.bind(input.body)
		.bind(input.author)
		.fetch_one(&self.database)
		.await?;

		Ok(post)
	}

	async fn update(
		&self,
		id: Uuid,
		genre: Genre,
		input: UpdatePostInput,
	) -> Result<Option<Post>, Error> {
		let post = sqlx::query_as::<_, Post>(concat!(
			r#"
			UPDATE post
			SET title = COALESCE($1, title),
				body = COALESCE($2, body),
				author = COALESCE($3, author)
			WHERE id = $4 AND genre = $5
			RETURNING "#,
			columns!()
		))
		.bind(input.title)
		.bind(input.body)
		.bind(input.author)
		.bind(id)
		.bind(genre)
		.fetch_optional(&self.database)
		.await?;

		Ok(post)
	}

	async fn delete(&self, id: Uuid, genre: Genre) -> Result<bool, Error> {
		let status = sqlx::query("DELETE FROM post WHERE id = $1 AND genre = $2")
			.bind(id)
			.bind(genre)
			.execute(&self.database)
			.await?;

		Ok(status.rows_affected() > 0)
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::store::tests;

	#[test]
	fn test_contains_pattern_escapes_wildcards() {
		assert_eq!(contains_pattern("rust"), "%rust%");
		assert_eq!(contains_pattern("100%"), "%100\\%%");
		assert_eq!(contains_pattern("a_b\\c"), "%a\\_b\\\\c%");
	}

	#[sqlx::test]
	async fn test_list_is_newest_first_in_pages(pool: Database) {
		tests::list_is_newest_first_in_pages(&PgPostStore::new(pool)).await;
	}

	#[sqlx::test]
	async fn test_list_past_the_end_is_empty(pool: Database) {
		tests::list_past_the_end_is_empty(&PgPostStore::new(pool)).await;
	}

	#[sqlx::test]
	async fn test_list_is_partitioned_by_genre(pool: Database) {
		tests::list_is_partitioned_by_genre(&PgPostStore::new(pool)).await;
	}

	#[sqlx::test]
	async fn test_update_requires_matching_genre(pool: Database) {
		tests::update_requires_matching_genre(&PgPostStore::new(pool)).await;
	}

	#[sqlx::test]
	async fn test_delete_requires_matching_genre(pool: Database) {
		tests::delete_requires_matching_genre(&PgPostStore::new(pool)).await;
	}

	#[sqlx::test]
	async fn test_search_matches_text_literally(pool: Database) {
		tests::search_matches_text_literally(&PgPostStore::new(pool)).await;
	}

	#[sqlx::test]
	async fn test_search_after_includes_the_boundary(pool: Database) {
		tests::search_after_includes_the_boundary(&PgPostStore::new(pool)).await;
	}
}
