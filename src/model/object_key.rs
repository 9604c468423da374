use std::fmt;

/// Bucket-relative identifier of one stored object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey(String);

impl ObjectKey {
    pub fn new(key: impl Into<String>) -> Self {
        ObjectKey(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectKey {
    fn from(key: &str) -> Self {
        ObjectKey::new(key)
    }
}

impl From<String> for ObjectKey {
    fn from(key: String) -> Self {
        ObjectKey(key)
    }
}

/// One response of a paginated listing call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingPage {
    pub keys: Vec<ObjectKey>,
    pub is_truncated: bool,
    pub next_continuation_token: Option<String>,
}

impl ListingPage {
    /// Final page, nothing left to fetch
    pub fn last(keys: Vec<ObjectKey>) -> Self {
        ListingPage {
            keys,
            is_truncated: false,
            next_continuation_token: None,
        }
    }

    /// Truncated page that continues at `token`
    pub fn truncated(keys: Vec<ObjectKey>, token: impl Into<String>) -> Self {
        ListingPage {
            keys,
            is_truncated: true,
            next_continuation_token: Some(token.into()),
        }
    }
}
