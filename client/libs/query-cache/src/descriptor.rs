//! Descriptors identifying cached remote reads.

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifies a remote read operation: operation name plus structured input.
///
/// Two descriptors with the same operation and semantically-equal input map to
/// the same cache slot. Equality and hashing go through a canonical string key
/// computed once at construction, so JSON object key order never splits a slot.
#[derive(Debug, Clone, Serialize)]
pub struct QueryDescriptor {
    operation: String,
    input: Option<Value>,
    #[serde(skip)]
    key: String,
}

impl QueryDescriptor {
    /// Descriptor for an operation that takes no input.
    pub fn new(operation: impl Into<String>) -> Self {
        let operation = operation.into();
        let key = operation.clone();
        Self {
            operation,
            input: None,
            key,
        }
    }

    /// Descriptor for an operation with a structured input.
    pub fn with_input(operation: impl Into<String>, input: Value) -> Self {
        let operation = operation.into();
        let key = format!("{}?{}", operation, canonical_json(&input));
        Self {
            operation,
            input: Some(input),
            key,
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn input(&self) -> Option<&Value> {
        self.input.as_ref()
    }

    /// Canonical cache key: `operation` or `operation?<canonical-json>`.
    pub fn cache_key(&self) -> &str {
        &self.key
    }
}

impl PartialEq for QueryDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for QueryDescriptor {}

impl Hash for QueryDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for QueryDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)
    }
}

/// Serialize a JSON value with object keys in sorted order at every level.
fn canonical_json(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            // serde_json's default map is ordered by key; re-sort defensively so
            // the key stays canonical even with the preserve_order feature on.
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by_key(|(k, _)| k.as_str());
            let body: Vec<String> = entries
                .iter()
                .map(|(k, v)| format!("{}:{}", Value::String((*k).clone()), canonical_json(v)))
                .collect();
            format!("{{{}}}", body.join(","))
        }
        Value::Array(items) => {
            let body: Vec<String> = items.iter().map(canonical_json).collect();
            format!("[{}]", body.join(","))
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(d: &QueryDescriptor) -> u64 {
        let mut h = DefaultHasher::new();
        d.hash(&mut h);
        h.finish()
    }

    #[test]
    fn test_no_input_key_is_operation_name() {
        let d = QueryDescriptor::new("bookmark.getUserBookmarks");
        assert_eq!(d.cache_key(), "bookmark.getUserBookmarks");
        assert!(d.input().is_none());
    }

    #[test]
    fn test_equal_inputs_share_a_slot() {
        let a = QueryDescriptor::with_input("tweet.getSingleTweet", json!({ "tweetId": "42" }));
        let b = QueryDescriptor::with_input("tweet.getSingleTweet", json!({ "tweetId": "42" }));
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_key_order_does_not_split_slots() {
        let a = QueryDescriptor::with_input(
            "tweet.searchTweets",
            json!({ "term": "rust", "filtering": "latest", "limit": 10 }),
        );
        let b = QueryDescriptor::with_input(
            "tweet.searchTweets",
            json!({ "limit": 10, "filtering": "latest", "term": "rust" }),
        );
        assert_eq!(a.cache_key(), b.cache_key());
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_inputs_are_distinct() {
        let a = QueryDescriptor::with_input("user.getUserProfile", json!({ "userId": "1" }));
        let b = QueryDescriptor::with_input("user.getUserProfile", json!({ "userId": "2" }));
        assert_ne!(a, b);
    }

    #[test]
    fn test_nested_input_canonicalization() {
        let a = QueryDescriptor::with_input(
            "tweet.getUserTweets",
            json!({ "filter": { "b": 1, "a": [true, null] }, "userId": "7" }),
        );
        let b = QueryDescriptor::with_input(
            "tweet.getUserTweets",
            json!({ "userId": "7", "filter": { "a": [true, null], "b": 1 } }),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_display_matches_cache_key() {
        let d = QueryDescriptor::with_input("follow.getSingleFollower", json!({ "followingId": "x" }));
        assert_eq!(d.to_string(), d.cache_key());
    }
}
