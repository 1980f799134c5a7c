use chrono::{DateTime, Utc};

/// Pure user model for inter-module communication (no serde)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a new user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

/// Partial update data for a user
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Case-insensitive substring filters, AND-combined.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserFilter {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub id: i32,
    pub text: String,
    pub category: Option<String>,
    /// Id of the user the quote is attributed to.
    pub author: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuote {
    pub text: String,
    pub category: Option<String>,
    pub author: i32,
}

/// Partial update data for a quote.
///
/// `category: Some(None)` clears the category.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuotePatch {
    pub text: Option<String>,
    pub category: Option<Option<String>>,
    pub author: Option<i32>,
}

/// Exact-match filters, AND-combined.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuoteFilter {
    pub category: Option<String>,
    pub author: Option<i32>,
}

/// Requested page; unset fields fall back to the module defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageRequest {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl PageRequest {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
        }
    }
}

/// One page of a filtered listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Size of the filtered set before pagination.
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
        }
    }
}
