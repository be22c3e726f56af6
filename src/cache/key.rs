//! Cache Key Derivation
//!
//! Turns a function identity plus its call arguments into a stable cache key.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::warn;

/// Keyword-style arguments. Sorted by name, so insertion order never matters.
pub type KeywordArgs = BTreeMap<String, Value>;

/// Prefix shared by every derived key.
pub const KEY_PREFIX: &str = "cache";

// == Derive Key ==
/// Derives `cache:{function_id}:{hash}` from the identity and arguments.
///
/// Arguments are rendered as canonical JSON: objects come out with sorted
/// keys, so a struct or map of named arguments yields the same key whatever
/// order it was built in. The hash is the first 16 bytes of SHA-256 over
/// `"{function_id}:{json}"`.
///
/// WEAKNESS: when the arguments cannot be serialized the key degrades to
/// `cache:{function_id}` alone. Every such call for the same function then
/// shares one entry and can return another call's result.
pub fn derive_key<A>(function_id: &str, args: &A) -> String
where
    A: Serialize + ?Sized,
{
    match canonical_args(args) {
        Ok(canonical) => {
            let digest = Sha256::digest(format!("{}:{}", function_id, canonical).as_bytes());
            format!("{}:{}:{}", KEY_PREFIX, function_id, hex::encode(&digest[..16]))
        }
        Err(err) => {
            warn!(
                "Arguments of {} are not serializable ({}), using shared fallback key",
                function_id, err
            );
            fallback_key(function_id)
        }
    }
}

/// The identity-only key used when arguments cannot be serialized.
pub fn fallback_key(function_id: &str) -> String {
    format!("{}:{}", KEY_PREFIX, function_id)
}

fn canonical_args<A>(args: &A) -> serde_json::Result<String>
where
    A: Serialize + ?Sized,
{
    // Going through Value sorts object keys (serde_json's Map is a BTreeMap).
    let value = serde_json::to_value(args)?;
    serde_json::to_string(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[derive(Serialize)]
    struct PeriodArgs<'a> {
        period: &'a str,
        user_id: i64,
    }

    #[test]
    fn test_same_args_same_key() {
        let a = derive_key("get_dashboard_metrics", &("24h", 1));
        let b = derive_key("get_dashboard_metrics", &("24h", 1));
        assert_eq!(a, b);
        assert!(a.starts_with("cache:get_dashboard_metrics:"));
        // prefix + id + 32 hex chars
        assert_eq!(a.len(), "cache:get_dashboard_metrics:".len() + 32);
    }

    #[test]
    fn test_different_args_different_key() {
        let a = derive_key("f", &(5,));
        let b = derive_key("f", &(10,));
        assert_ne!(a, b);
    }

    #[test]
    fn test_different_functions_different_key() {
        assert_ne!(derive_key("f", &(1,)), derive_key("g", &(1,)));
    }

    #[test]
    fn test_keyword_order_irrelevant() {
        let mut first = KeywordArgs::new();
        first.insert("y".to_string(), json!(10));
        first.insert("x".to_string(), json!(5));

        let mut second = KeywordArgs::new();
        second.insert("x".to_string(), json!(5));
        second.insert("y".to_string(), json!(10));

        assert_eq!(derive_key("f", &first), derive_key("f", &second));

        // A HashMap with the same contents canonicalizes identically
        let hashed: HashMap<&str, i32> = [("y", 10), ("x", 5)].into_iter().collect();
        assert_eq!(derive_key("f", &hashed), derive_key("f", &first));
    }

    #[test]
    fn test_struct_args_match_equivalent_map() {
        let args = PeriodArgs {
            period: "7d",
            user_id: 3,
        };
        let map = json!({"user_id": 3, "period": "7d"});
        assert_eq!(derive_key("stats", &args), derive_key("stats", &map));
    }

    #[test]
    fn test_unserializable_args_fall_back_to_identity() {
        // JSON object keys must be strings; tuple keys cannot be serialized
        let mut bad: HashMap<(u8, u8), u8> = HashMap::new();
        bad.insert((1, 2), 3);
        let mut other: HashMap<(u8, u8), u8> = HashMap::new();
        other.insert((4, 5), 6);

        assert_eq!(derive_key("f", &bad), "cache:f");
        // Distinct calls collide on the fallback key
        assert_eq!(derive_key("f", &bad), derive_key("f", &other));
    }
}
