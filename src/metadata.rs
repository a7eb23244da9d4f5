//! Build metadata providers
//!
//! A version can carry build metadata (`1.2.3+abc1234-20240101`). Each part
//! comes from a named provider. `sha` and `date` are built in; more can be
//! registered without touching the code that composes the metadata.

use crate::error::{Result, SemtagError};
use crate::git::Repository;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Providers requested when nothing is configured
pub const DEFAULT_PROVIDERS: &str = "sha";

/// A zero-argument function producing one metadata component
pub type Provider<'a> = Box<dyn Fn() -> Result<String> + 'a>;

/// Current UTC date as `YYYYMMDD`
pub fn current_date() -> String {
    chrono::Utc::now().format("%Y%m%d").to_string()
}

/// Registry mapping provider names to providers
#[derive(Default)]
pub struct MetadataRegistry<'a> {
    providers: BTreeMap<String, Provider<'a>>,
}

impl<'a> MetadataRegistry<'a> {
    /// An empty registry
    pub fn new() -> Self {
        MetadataRegistry {
            providers: BTreeMap::new(),
        }
    }

    /// A registry with the built-in `sha` and `date` providers
    pub fn with_builtins(repo: &'a dyn Repository) -> Self {
        let mut registry = Self::new();
        registry.register("sha", move || repo.head_short_id());
        registry.register("date", || Ok(current_date()));
        registry
    }

    /// Register (or replace) a provider under a name
    pub fn register<F>(&mut self, name: impl Into<String>, provider: F)
    where
        F: Fn() -> Result<String> + 'a,
    {
        self.providers.insert(name.into(), Box::new(provider));
    }

    /// Registered provider names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    /// Compose metadata from a comma-separated list of provider names.
    ///
    /// Every name is checked before any provider runs. Results are joined
    /// with `-` in request order. An empty request yields an empty string.
    ///
    /// # Errors
    /// Returns a configuration error naming every unsupported provider, or
    /// the first error raised by a provider.
    pub fn compute(&self, requested: &str) -> Result<String> {
        if requested.trim().is_empty() {
            return Ok(String::new());
        }

        let names: Vec<&str> = requested.split(',').map(str::trim).collect();
        let unsupported: Vec<&str> = names
            .iter()
            .copied()
            .filter(|name| !self.providers.contains_key(*name))
            .collect();

        if !unsupported.is_empty() {
            return Err(SemtagError::config(format!(
                "Unsupported metadata: {} (available: {})",
                unsupported
                    .iter()
                    .map(|name| format!("'{}'", name))
                    .collect::<Vec<_>>()
                    .join(", "),
                self.names().collect::<Vec<_>>().join(", ")
            )));
        }

        let parts = names
            .iter()
            .filter_map(|name| self.providers.get(*name))
            .map(|provider| provider())
            .collect::<Result<Vec<_>>>()?;

        let metadata = parts.join("-");
        debug!(requested, %metadata, "computed metadata");
        Ok(metadata)
    }
}

impl fmt::Debug for MetadataRegistry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataRegistry")
            .field("providers", &self.providers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRepository;

    #[test]
    fn test_builtin_sha() {
        let mut repo = MockRepository::new();
        repo.commit("feat: first");
        let registry = MetadataRegistry::with_builtins(&repo);
        assert_eq!(registry.compute("sha").unwrap(), repo.head_short_id().unwrap());
    }

    #[test]
    fn test_builtin_date_format() {
        let date = current_date();
        assert_eq!(date.len(), 8);
        assert!(date.chars().all(|c| c.is_ascii_digit()));
        assert!(date.starts_with("20"));
    }

    #[test]
    fn test_request_order_and_separator() {
        let mut registry = MetadataRegistry::new();
        registry.register("a", || Ok("one".to_string()));
        registry.register("b", || Ok("two".to_string()));
        assert_eq!(registry.compute("b,a").unwrap(), "two-one");
        assert_eq!(registry.compute("a, b").unwrap(), "one-two");
    }

    #[test]
    fn test_unsupported_names_are_reported_before_running() {
        use std::cell::Cell;

        let calls = Cell::new(0);
        let mut registry = MetadataRegistry::new();
        registry.register("a", || {
            calls.set(calls.get() + 1);
            Ok("one".to_string())
        });

        let err = registry.compute("a,bogus,other").unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, SemtagError::Configuration(_)));
        assert!(msg.contains("'bogus'"));
        assert!(msg.contains("'other'"));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_empty_request() {
        let registry = MetadataRegistry::new();
        assert_eq!(registry.compute("").unwrap(), "");
    }

    #[test]
    fn test_empty_name_in_list_is_unsupported() {
        let mut registry = MetadataRegistry::new();
        registry.register("a", || Ok("one".to_string()));
        assert!(registry.compute("a,,a").is_err());
    }

    #[test]
    fn test_provider_error_propagates() {
        let mut registry = MetadataRegistry::new();
        registry.register("broken", || Err(SemtagError::repository("no HEAD")));
        assert!(matches!(
            registry.compute("broken"),
            Err(SemtagError::RepositoryState(_))
        ));
    }

    #[test]
    fn test_names_are_sorted() {
        let repo = MockRepository::new();
        let registry = MetadataRegistry::with_builtins(&repo);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["date", "sha"]);
    }
}
