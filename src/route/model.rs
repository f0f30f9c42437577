use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Number of items on every page of a paginated response.
pub const PAGE_SIZE: i64 = 10;

/// This can be removed when [`serde`] supports
/// literal defaults: <https://github.com/serde-rs/serde/issues/368>
#[inline]
fn one() -> i64 {
	1
}

#[derive(Debug, Clone, Copy, Deserialize, Validate, JsonSchema)]
pub struct Paginate {
	/// The page number to return (1-indexed).
	#[validate(range(min = 1, max = 1000))]
	#[serde(default = "one")]
	pub page: i64,
}

impl Default for Paginate {
	fn default() -> Self {
		Self { page: one() }
	}
}

impl Paginate {
	pub fn offset(&self) -> i64 {
		(self.page - 1) * PAGE_SIZE
	}

	pub fn limit(&self) -> i64 {
		PAGE_SIZE
	}
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct IdInput {
	pub id: Uuid,
}

/// A single page of results, newest first.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct Page<T> {
	/// The items on this page.
	pub items: Vec<T>,
	/// The current page number (1-indexed).
	pub page: i64,
	/// The maximum number of items on a page.
	pub page_size: i64,
	/// The number of matching items across all pages.
	pub total: i64,
	/// The number of pages needed to show every matching item.
	pub page_count: i64,
}

impl<T> Page<T> {
	pub fn new(items: Vec<T>, paginate: &Paginate, total: i64) -> Self {
		Self {
			items,
			page: paginate.page,
			page_size: PAGE_SIZE,
			total,
			page_count: (total + PAGE_SIZE - 1) / PAGE_SIZE,
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_paginate_offset() {
		let mut paginate = Paginate { page: 1 };

		assert_eq!(paginate.offset(), 0);

		paginate.page = 2;

		assert_eq!(paginate.offset(), 10);

		paginate.page = 5;

		assert_eq!(paginate.offset(), 40);
	}

	#[test]
	fn test_paginate_limit() {
		let paginate = Paginate::default();

		assert_eq!(paginate.page, 1);
		assert_eq!(paginate.limit(), PAGE_SIZE);
	}

	#[test]
	fn test_page_count() {
		let paginate = Paginate::default();

		assert_eq!(Page::<()>::new(Vec::new(), &paginate, 0).page_count, 0);
		assert_eq!(Page::<()>::new(Vec::new(), &paginate, 10).page_count, 1);
		assert_eq!(Page::<()>::new(Vec::new(), &paginate, 11).page_count, 2);
	}

	#[test]
	fn test_paginate_bounds() {
		assert!(Paginate { page: 0 }.validate().is_err());
		assert!(Paginate { page: 1000 }.validate().is_ok());
		assert!(Paginate { page: 1001 }.validate().is_err());
	}
}
