/// The number of items on every page.
pub const PAGE_SIZE: i64 = 20;

/// The page used when none (or no number) is given.
pub const DEFAULT_PAGE: i64 = 1;

/// A fixed-size page window, 1-indexed.
///
/// Only [`Paginate::new`] builds one, so the page is always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginate {
	page: i64,
}

impl Paginate {
	/// Returns `None` when `page` is below 1.
	pub fn new(page: i64) -> Option<Self> {
		(page >= 1).then_some(Self { page })
	}

	pub fn page(&self) -> i64 {
		self.page
	}

	pub fn offset(&self) -> i64 {
		(self.page - 1).saturating_mul(PAGE_SIZE)
	}

	pub fn limit(&self) -> i64 {
		PAGE_SIZE
	}
}

/// Turns a raw `pageNum` query value into a page number.
///
/// Absent or empty input, and input that does not start with an integer,
/// yield [`DEFAULT_PAGE`]. Otherwise the leading integer is used as-is, so
/// `"2abc"` is page 2 and `"-3"` is page -3 (rejected later).
pub fn sanitize_page_number(raw: Option<&str>) -> i64 {
	raw.filter(|raw| !raw.is_empty())
		.and_then(parse_leading_int)
		.unwrap_or(DEFAULT_PAGE)
}

/// Parses an optionally signed run of decimal digits after leading
/// whitespace, ignoring anything that follows. Saturates instead of
/// overflowing.
fn parse_leading_int(raw: &str) -> Option<i64> {
	let raw = raw.trim_start();
	let (negative, digits) = match raw.as_bytes().first() {
		Some(b'-') => (true, &raw[1..]),
		Some(b'+') => (false, &raw[1..]),
		_ => (false, raw),
	};

	let mut digits = digits.bytes().take_while(u8::is_ascii_digit).peekable();
	digits.peek()?;

	let magnitude = digits.fold(0_i64, |acc, digit| {
		acc.saturating_mul(10)
			.saturating_add(i64::from(digit - b'0'))
	});

	Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_paginate_offset() {
		assert_eq!(Paginate::new(1).unwrap().offset(), 0);
		assert_eq!(Paginate::new(2).unwrap().offset(), 20);
		assert_eq!(Paginate::new(5).unwrap().offset(), 80);
	}

	#[test]
	fn test_paginate_limit() {
		let paginate = Paginate::new(3).unwrap();

		assert_eq!(paginate.limit(), 20);
	}

	#[test]
	fn test_paginate_rejects_below_one() {
		assert_eq!(Paginate::new(0), None);
		assert_eq!(Paginate::new(-4), None);
		assert_eq!(Paginate::new(7).map(|paginate| paginate.page()), Some(7));
	}

	#[test]
	fn test_paginate_offset_saturates() {
		let paginate = Paginate::new(i64::MAX).unwrap();

		assert_eq!(paginate.offset(), i64::MAX);
	}

	#[test]
	fn test_sanitize_defaults_to_first_page() {
		assert_eq!(sanitize_page_number(None), 1);
		assert_eq!(sanitize_page_number(Some("")), 1);
		assert_eq!(sanitize_page_number(Some("abc")), 1);
		assert_eq!(sanitize_page_number(Some("   ")), 1);
		assert_eq!(sanitize_page_number(Some("-")), 1);
	}

	#[test]
	fn test_sanitize_uses_leading_integer() {
		assert_eq!(sanitize_page_number(Some("2")), 2);
		assert_eq!(sanitize_page_number(Some("  7")), 7);
		assert_eq!(sanitize_page_number(Some("2abc")), 2);
		assert_eq!(sanitize_page_number(Some("3.9")), 3);
		assert_eq!(sanitize_page_number(Some("+4")), 4);
	}

	#[test]
	fn test_sanitize_keeps_non_positive_numbers() {
		assert_eq!(sanitize_page_number(Some("0")), 0);
		assert_eq!(sanitize_page_number(Some("-3")), -3);
	}

	#[test]
	fn test_sanitize_saturates_huge_numbers() {
		assert_eq!(
			sanitize_page_number(Some("99999999999999999999999")),
			i64::MAX
		);
	}
}
