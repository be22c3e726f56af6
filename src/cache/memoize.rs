//! Memoization Module
//!
//! Wraps data-producing functions so their results are served from the cache
//! manager, keyed by function identity and arguments.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use crate::cache::{derive_key, CacheManager};

// == Cached ==
/// Wraps `func` so calls go through `manager`.
///
/// `function_id` must be unique among memoized functions sharing a manager;
/// it is the identity part of every key. `ttl` of `None` uses the manager's
/// default.
///
/// ```ignore
/// let double = cached(manager.clone(), "double", Some(5), |x: &i64| x * 2);
/// assert_eq!(double.call(&5), 10);
/// double.handle().invalidate(&5);
/// ```
pub fn cached<A, R, F>(
    manager: Arc<CacheManager>,
    function_id: impl Into<String>,
    ttl: Option<u64>,
    func: F,
) -> Memoized<A, R, F>
where
    F: Fn(&A) -> R,
{
    Memoized {
        function_id: function_id.into(),
        ttl,
        manager,
        func,
        _signature: PhantomData,
    }
}

// == Invalidate For ==
/// Drops the entry a memoized function `function_id` holds for `args`,
/// without needing the wrapper itself.
pub fn invalidate_for<A>(manager: &CacheManager, function_id: &str, args: &A)
where
    A: Serialize + ?Sized,
{
    manager.invalidate(&derive_key(function_id, args));
    info!("Cache invalidated for: {}", function_id);
}

// == Memoized ==
/// A memoized function. See [`cached`].
///
/// Known limitation: a cached JSON `null` reads as "nothing cached", so a
/// function whose result serializes to `null` (`()`, `None`) runs on every
/// call.
pub struct Memoized<A, R, F> {
    function_id: String,
    ttl: Option<u64>,
    manager: Arc<CacheManager>,
    func: F,
    _signature: PhantomData<fn(&A) -> R>,
}

impl<A, R, F> Memoized<A, R, F>
where
    A: Serialize,
{
    /// The key a call with `args` reads and writes.
    pub fn key_for(&self, args: &A) -> String {
        derive_key(&self.function_id, args)
    }

    /// A detachable handle for invalidating this function's entries.
    pub fn handle(&self) -> CacheHandle<A> {
        CacheHandle {
            function_id: self.function_id.clone(),
            manager: self.manager.clone(),
            _args: PhantomData,
        }
    }

    /// Drops the cached result for `args`.
    pub fn invalidate(&self, args: &A) {
        self.handle().invalidate(args);
    }

    /// Clears the whole manager, not just this function's entries.
    pub fn clear_all(&self) {
        self.manager.clear();
    }

    pub fn function_id(&self) -> &str {
        &self.function_id
    }

    pub fn ttl(&self) -> Option<u64> {
        self.ttl
    }

    fn lookup<V: DeserializeOwned>(&self, key: &str) -> Option<V> {
        let value = self.manager.get(key)?;
        if value.is_null() {
            return None;
        }
        match serde_json::from_value(value) {
            Ok(value) => {
                debug!("Using cached value: {}", self.function_id);
                Some(value)
            }
            Err(err) => {
                warn!(
                    "Cached value for {} has an unexpected shape ({}), recomputing",
                    self.function_id, err
                );
                None
            }
        }
    }

    fn store<V: Serialize>(&self, key: &str, value: &V) {
        match serde_json::to_value(value) {
            Ok(json) => self.manager.set(key, json, self.ttl),
            Err(err) => warn!(
                "Result of {} is not serializable ({}), not caching",
                self.function_id, err
            ),
        }
    }
}

impl<A, R, F> Memoized<A, R, F>
where
    A: Serialize,
    R: Serialize + DeserializeOwned,
    F: Fn(&A) -> R,
{
    // == Call ==
    /// Returns the cached result for `args`, computing and caching it on a miss.
    pub fn call(&self, args: &A) -> R {
        let key = self.key_for(args);
        if let Some(value) = self.lookup(&key) {
            return value;
        }

        debug!("Computing (not cached): {}", self.function_id);
        let result = (self.func)(args);
        self.store(&key, &result);
        result
    }
}

impl<A, T, E, F> Memoized<A, Result<T, E>, F>
where
    A: Serialize,
    T: Serialize + DeserializeOwned,
    F: Fn(&A) -> Result<T, E>,
{
    // == Try Call ==
    /// Like [`call`](Memoized::call) for fallible functions: only `Ok` values
    /// are cached, errors are returned untouched.
    pub fn try_call(&self, args: &A) -> Result<T, E> {
        let key = self.key_for(args);
        if let Some(value) = self.lookup(&key) {
            return Ok(value);
        }

        debug!("Computing (not cached): {}", self.function_id);
        let value = (self.func)(args)?;
        self.store(&key, &value);
        Ok(value)
    }
}

impl<A, R, F> fmt::Debug for Memoized<A, R, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoized")
            .field("function_id", &self.function_id)
            .field("ttl", &self.ttl)
            .finish()
    }
}

// == Cache Handle ==
/// Invalidation handle for one memoized function.
pub struct CacheHandle<A> {
    function_id: String,
    manager: Arc<CacheManager>,
    _args: PhantomData<fn(&A)>,
}

impl<A: Serialize> CacheHandle<A> {
    /// Drops the cached result for `args`.
    pub fn invalidate(&self, args: &A) {
        invalidate_for(&self.manager, &self.function_id, args);
    }

    /// Clears the whole manager, not just this function's entries.
    pub fn clear_all(&self) {
        self.manager.clear();
    }
}

impl<A> Clone for CacheHandle<A> {
    fn clone(&self) -> Self {
        Self {
            function_id: self.function_id.clone(),
            manager: self.manager.clone(),
            _args: PhantomData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::KeywordArgs;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    fn test_manager() -> Arc<CacheManager> {
        Arc::new(CacheManager::new(10, 2))
    }

    fn counter() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    #[test]
    fn test_cached_function() {
        let calls = counter();
        let seen = calls.clone();
        let double = cached(test_manager(), "expensive_func", Some(5), move |x: &i64| {
            seen.fetch_add(1, Ordering::SeqCst);
            x * 2
        });

        assert_eq!(double.call(&5), 10);
        assert_eq!(double.call(&5), 10);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cached_different_args() {
        let calls = counter();
        let seen = calls.clone();
        let double = cached(test_manager(), "func", Some(5), move |x: &i64| {
            seen.fetch_add(1, Ordering::SeqCst);
            x * 2
        });

        double.call(&5);
        double.call(&10);
        double.call(&5);
        double.call(&10);

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_cached_with_keyword_args_any_order() {
        let calls = counter();
        let seen = calls.clone();
        let add = cached(test_manager(), "add", Some(5), move |kw: &KeywordArgs| {
            seen.fetch_add(1, Ordering::SeqCst);
            kw["x"].as_i64().unwrap_or(0) + kw["y"].as_i64().unwrap_or(0)
        });

        let mut first = KeywordArgs::new();
        first.insert("x".to_string(), json!(5));
        first.insert("y".to_string(), json!(10));
        let mut second = KeywordArgs::new();
        second.insert("y".to_string(), json!(10));
        second.insert("x".to_string(), json!(5));

        assert_eq!(add.call(&first), 15);
        assert_eq!(add.call(&second), 15);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_invalidate_method() {
        let calls = counter();
        let seen = calls.clone();
        let double = cached(test_manager(), "func", Some(5), move |x: &i64| {
            seen.fetch_add(1, Ordering::SeqCst);
            x * 2
        });

        double.call(&5);
        double.invalidate(&5);
        double.call(&5);

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_handle_invalidates_only_its_arguments() {
        let calls = counter();
        let seen = calls.clone();
        let double = cached(test_manager(), "func", None, move |x: &i64| {
            seen.fetch_add(1, Ordering::SeqCst);
            x * 2
        });
        let handle = double.handle().clone();

        double.call(&1);
        double.call(&2);
        handle.invalidate(&1);
        double.call(&1);
        double.call(&2);

        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_invalidate_for_by_function_id() {
        let manager = test_manager();
        let calls = counter();
        let seen = calls.clone();
        let add = cached(manager.clone(), "add", None, move |args: &(i64, i64)| {
            seen.fetch_add(1, Ordering::SeqCst);
            args.0 + args.1
        });

        add.call(&(10, 20));
        add.call(&(1, 2));
        invalidate_for(&manager, "add", &(10, 20));
        invalidate_for(&manager, "other", &(1, 2));

        assert_eq!(add.call(&(10, 20)), 30);
        assert_eq!(add.call(&(1, 2)), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_clear_all_is_global() {
        let manager = test_manager();
        manager.set("unrelated", json!("kept?"), None);

        let double = cached(manager.clone(), "func", None, |x: &i64| x * 2);
        double.call(&1);
        double.clear_all();

        assert!(manager.is_empty());
        assert_eq!(manager.get("unrelated"), None);
    }

    #[test]
    fn test_same_args_shared_across_wrappers_with_same_id() {
        let manager = test_manager();
        let calls = counter();
        let seen = calls.clone();
        let first = cached(manager.clone(), "shared", None, move |x: &i64| {
            seen.fetch_add(1, Ordering::SeqCst);
            *x
        });
        let second = cached(manager, "shared", None, |_: &i64| -1i64);

        assert_eq!(first.call(&7), 7);
        // Same identity and arguments read the same entry
        assert_eq!(second.call(&7), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_try_call_does_not_cache_errors() {
        let calls = counter();
        let seen = calls.clone();
        let flaky = cached(test_manager(), "flaky", None, move |x: &i64| {
            let n = seen.fetch_add(1, Ordering::SeqCst);
            if n == 0 {
                Err(format!("attempt {} failed", n))
            } else {
                Ok(x + 1)
            }
        });

        assert_eq!(flaky.try_call(&1), Err("attempt 0 failed".to_string()));
        assert_eq!(flaky.try_call(&1), Ok(2));
        assert_eq!(flaky.try_call(&1), Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unit_results_are_recomputed() {
        let calls = counter();
        let seen = calls.clone();
        let side_effect = cached(test_manager(), "side_effect", None, move |_: &()| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        side_effect.call(&());
        side_effect.call(&());

        // () caches as null, which reads as a miss
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_shape_mismatch_recomputes() {
        let manager = test_manager();
        let double = cached(manager.clone(), "func", None, |x: &i64| x * 2);
        manager.set(&double.key_for(&4), json!("not a number"), None);

        assert_eq!(double.call(&4), 8);
        assert_eq!(manager.get(&double.key_for(&4)), Some(json!(8)));
    }

    #[test]
    fn test_cache_hit_is_faster_than_miss() {
        let slow = cached(test_manager(), "slow_func", Some(60), |x: &i64| {
            std::thread::sleep(Duration::from_millis(20));
            x * 2
        });

        let start = Instant::now();
        slow.call(&5);
        let uncached = start.elapsed();

        let start = Instant::now();
        slow.call(&5);
        let from_cache = start.elapsed();

        assert!(from_cache < uncached / 2);
    }

    #[test]
    fn test_uses_configured_ttl() {
        let manager = Arc::new(CacheManager::new(10, 3600));
        let calls = counter();
        let seen = calls.clone();
        let short = cached(manager, "short", Some(1), move |x: &i64| {
            seen.fetch_add(1, Ordering::SeqCst);
            *x
        });

        short.call(&1);
        std::thread::sleep(Duration::from_millis(1100));
        short.call(&1);

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(short.ttl(), Some(1));
    }
}
