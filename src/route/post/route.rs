use aide::{axum::IntoApiResponse, transform::TransformOperation};
use axum::{extract::State, http::header, Extension};
use chrono::Utc;

use crate::{
	extract::{Json, LazyJson, Path, Query},
	openapi::tag,
	Store,
};

use super::{model, Error, RouteError};

pub fn list_posts_docs(op: TransformOperation) -> TransformOperation {
	op.summary("List posts")
		.description("Returns a paginated response of the posts in this category, newest first.")
		.tag(tag::POST)
}

/// Returns a page of the posts of the route's genre, newest first.
pub async fn list_posts(
	State(store): State<Store>,
	Extension(genre): Extension<model::Genre>,
	Query(paginate): Query<model::Paginate>,
) -> Result<Json<model::Page<model::Post>>, RouteError> {
	let page = store
		.list(&model::PostFilter::genre(genre), &paginate)
		.await?;

	Ok(Json(page))
}

pub fn get_post_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Get single post")
		.description("Returns a single post of any category by its unique id.")
		.tag(tag::POST)
}

/// Returns a single post by its unique id.
pub async fn get_post(
	State(store): State<Store>,
	Path(path): Path<model::IdInput>,
) -> Result<Json<model::Post>, RouteError> {
	let post = store.get(path.id).await?;

	Ok(Json(post.ok_or(Error::UnknownPost(path.id))?))
}

pub fn search_posts_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Search posts")
		.description(
			"Returns a paginated response of the posts of every category matching the filter, newest first.",
		)
		.tag(tag::POST)
}

/// Returns a page of the posts matching the filter, newest first.
pub async fn search_posts(
	State(store): State<Store>,
	Query(filter): Query<model::PostFilter>,
	Query(paginate): Query<model::Paginate>,
) -> Result<Json<model::SearchPage>, RouteError> {
	let page = store.list(&filter, &paginate).await?;

	Ok(Json(model::SearchPage {
		page,
		filter,
		time_now: Utc::now(),
	}))
}

pub fn create_post_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Create post")
		.description("Creates a new post in this category.")
		.tag(tag::POST)
}

/// Creates a new post. The genre always comes from the route.
pub async fn create_post(
	State(store): State<Store>,
	Extension(genre): Extension<model::Genre>,
	Json(input): Json<model::CreatePostInput>,
) -> Result<Json<model::Post>, RouteError> {
	let post = store.create(genre, input).await?;

	tracing::info!(post = %post.id, ?genre, "created post");

	Ok(Json(post))
}

pub fn update_post_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Update post")
		.description("Updates an existing post in this category by its unique id.")
		.tag(tag::POST)
}

/// Updates the content of a post of the route's genre.
///
/// A post of another genre is unknown here, whatever the body holds.
pub async fn update_post(
	State(store): State<Store>,
	Extension(genre): Extension<model::Genre>,
	Path(path): Path<model::IdInput>,
	input: LazyJson<model::UpdatePostInput>,
) -> Result<Json<model::Post>, RouteError> {
	store
		.get(path.id)
		.await?
		.filter(|post| post.genre == genre)
		.ok_or(Error::UnknownPost(path.id))?;

	let input = input.validate()?;

	// the write itself is still scoped to the genre
	let post = store.update(path.id, genre, input).await?;

	Ok(Json(post.ok_or(Error::UnknownPost(path.id))?))
}

pub fn delete_post_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Delete post")
		.description(
			"Deletes an existing post in this category by its unique id, pointing back to the category's list.",
		)
		.tag(tag::POST)
}

/// Deletes a post of the route's genre.
pub async fn delete_post(
	State(store): State<Store>,
	Extension(genre): Extension<model::Genre>,
	Path(path): Path<model::IdInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	if !store.delete(path.id, genre).await? {
		return Err(Error::UnknownPost(path.id).into());
	}

	tracing::info!(post = %path.id, ?genre, "deleted post");

	let redirect = genre.list_path();

	Ok((
		[(header::LOCATION, redirect)],
		Json(model::Deleted {
			redirect: redirect.into(),
		}),
	))
}
