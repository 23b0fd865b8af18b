//! Shared workflow context.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{LbError, Result};

/// Context keys whose values must never reach logs.
pub const SENSITIVE_KEYS: &[&str] = &["passphrase", "key_data"];

/// Values accumulated across the steps of one workflow run.
///
/// Keys are write-once: contributing a key that is already present fails
/// with [`LbError::ContextKeyConflict`].
///
/// # Example
///
/// ```
/// use lbcerts::workflow::Context;
///
/// let mut ctx = Context::seeded([("pool_id", "P")]).unwrap();
/// ctx.contribute("pool_cert", "c1").unwrap();
///
/// assert_eq!(ctx.get("pool_id"), Some("P"));
/// assert!(ctx.contribute("pool_id", "other").is_err());
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Context {
    values: BTreeMap<String, String>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context pre-seeded with dependency values.
    pub fn seeded<K, V>(values: impl IntoIterator<Item = (K, V)>) -> Result<Self>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut ctx = Self::new();
        for (key, value) in values {
            ctx.contribute(key, value)?;
        }
        Ok(ctx)
    }

    /// Add a key. Keys cannot be overwritten.
    pub fn contribute(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let key = key.into();
        if self.values.contains_key(&key) {
            return Err(LbError::ContextKeyConflict { key });
        }
        self.values.insert(key, value.into());
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// A view that masks [`SENSITIVE_KEYS`], for logging.
    pub fn redacted(&self) -> Redacted<'_> {
        Redacted(self)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Context {}", self.redacted())
    }
}

/// Display adapter returned by [`Context::redacted`].
pub struct Redacted<'a>(&'a Context);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in self.0.iter() {
            if SENSITIVE_KEYS.contains(&key) {
                map.entry(&key, &"[REDACTED]");
            } else {
                map.entry(&key, &value);
            }
        }
        map.finish()
    }
}
