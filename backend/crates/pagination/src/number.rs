//! Caller-supplied page numbers.

/// A requested page number as received from a query string.
///
/// `None` inside means the caller either omitted the page or supplied
/// something that is not an integer; both resolve to the first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageNumber(Option<i64>);

impl PageNumber {
    /// Request the first page explicitly.
    #[must_use]
    pub const fn first() -> Self {
        Self(Some(1))
    }

    /// Request a specific page number, which may still be out of range.
    #[must_use]
    pub const fn new(number: i64) -> Self {
        Self(Some(number))
    }

    /// Parse a raw query value, accepting surrounding whitespace.
    ///
    /// ```
    /// use pagination::PageNumber;
    ///
    /// assert_eq!(PageNumber::parse(Some(" 3 ")).requested(), Some(3));
    /// assert_eq!(PageNumber::parse(Some("three")).requested(), None);
    /// assert_eq!(PageNumber::parse(None).requested(), None);
    /// ```
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        Self(raw.and_then(|value| value.trim().parse::<i64>().ok()))
    }

    /// The integer the caller asked for, if one was supplied.
    #[must_use]
    pub const fn requested(&self) -> Option<i64> {
        self.0
    }
}
