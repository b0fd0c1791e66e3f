//! Equality filters for customer search.

use super::Customer;

/// One optional exact-match value per searchable column.
///
/// Set fields combine with AND; unset fields are not applied. An empty
/// filter selects every customer.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CustomerFilter {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
}

impl CustomerFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first_name(mut self, value: impl Into<String>) -> Self {
        self.first_name = Some(value.into());
        self
    }

    pub fn last_name(mut self, value: impl Into<String>) -> Self {
        self.last_name = Some(value.into());
        self
    }

    pub fn address(mut self, value: impl Into<String>) -> Self {
        self.address = Some(value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.address.is_none()
    }

    /// Filter for a full name like `"Alice Middle Jones"`.
    ///
    /// The first token is matched against `first_name`, the last token
    /// against `last_name`; tokens in between are ignored. A single token
    /// constrains `first_name` only. `None` for a blank name.
    ///
    /// Matching is exact. There is no fuzzy (partial or case-insensitive)
    /// name search; every filter here is an equality test.
    pub fn from_name(name: &str) -> Option<Self> {
        let mut tokens = name.split_whitespace();
        let first = tokens.next()?;
        let filter = Self::new().first_name(first);
        Some(match tokens.last() {
            Some(last) => filter.last_name(last),
            None => filter,
        })
    }

    /// Combines two filters with AND.
    ///
    /// `None` when both constrain the same column to different values, since
    /// no customer can match.
    pub fn and(self, other: Self) -> Option<Self> {
        Some(Self {
            first_name: merge(self.first_name, other.first_name)?,
            last_name: merge(self.last_name, other.last_name)?,
            address: merge(self.address, other.address)?,
        })
    }

    /// Whether `customer` satisfies every set field.
    pub fn matches(&self, customer: &Customer) -> bool {
        let eq = |want: &Option<String>, have: &str| want.as_deref().is_none_or(|w| w == have);
        eq(&self.first_name, &customer.first_name)
            && eq(&self.last_name, &customer.last_name)
            && eq(&self.address, &customer.address)
    }
}

fn merge(a: Option<String>, b: Option<String>) -> Option<Option<String>> {
    match (a, b) {
        (Some(a), Some(b)) if a != b => None,
        (a, b) => Some(a.or(b)),
    }
}
