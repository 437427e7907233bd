//! Key-prefixing views over a translator

use std::sync::Arc;

use super::{degrade, validate_key, NullSession, Resolution, Translator};
use crate::locale::LocaleId;
use crate::resolver::ResolverOptions;
use crate::utils::errors::Result;

/// Prepends `prefix.` to every key before delegating to its parent
#[derive(Debug)]
pub struct ContextScope {
    parent: Arc<dyn Translator>,
    prefix: String,
}

impl ContextScope {
    /// Scope `parent` under `prefix`
    ///
    /// An invalid prefix is handed to the parent's policy; when suppressed
    /// the result is a degraded view rendering every key as a placeholder.
    pub fn new(parent: Arc<dyn Translator>, prefix: &str) -> Result<Arc<dyn Translator>> {
        if let Err(error) = validate_key(prefix) {
            parent.options().policy().suppress(error, parent.locale())?;
            return Ok(Arc::new(NullSession::new(
                parent.locale().clone(),
                parent.options(),
            )));
        }

        Ok(Arc::new(Self {
            parent,
            prefix: prefix.to_string(),
        }))
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Translator for ContextScope {
    fn locale(&self) -> &LocaleId {
        self.parent.locale()
    }

    fn options(&self) -> &ResolverOptions {
        self.parent.options()
    }

    fn resolve(&self, key: &str) -> Result<Resolution> {
        if let Err(error) = validate_key(key) {
            return degrade(self.options(), self.locale(), error, key);
        }
        self.parent.resolve(&format!("{}.{}", self.prefix, key))
    }

    fn context(self: Arc<Self>, prefix: &str) -> Result<Arc<dyn Translator>> {
        ContextScope::new(self, prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ErrorPolicy;
    use crate::session::Session;
    use crate::store::MemoryBackend;
    use crate::utils::errors::{ErrorCategory, KeyglotError};
    use assert_matches::assert_matches;

    fn session(options: ResolverOptions) -> Arc<dyn Translator> {
        let backend = Arc::new(MemoryBackend::new());
        let english = LocaleId::parse("en").unwrap();
        backend.insert(&english, "a.b.c", "abc");
        backend.insert(&english, "form.title", "Title");
        Arc::new(Session::new(english, Arc::new(options), backend).unwrap())
    }

    #[test]
    fn test_nested_contexts_compose() {
        let root = session(ResolverOptions::default());
        let scoped = root.clone().context("a").unwrap().context("b").unwrap();

        assert_eq!(scoped.get("c").unwrap(), root.get("a.b.c").unwrap());
        assert_eq!(root.clone().context("a.b").unwrap().get("c").unwrap(), "abc");
    }

    #[test]
    fn test_invalid_prefix() {
        let strict = session(ResolverOptions::default());
        assert_matches!(strict.clone().context(""), Err(KeyglotError::InvalidParameter(_)));
        assert_matches!(strict.context("a..b"), Err(KeyglotError::InvalidParameter(_)));

        let lenient = session(ResolverOptions::default().with_policy(ErrorPolicy::all()));
        let degraded = lenient.context(" ").unwrap();
        assert_eq!(degraded.get("title").unwrap(), "???title???");
    }

    #[test]
    fn test_invalid_key_uses_unprefixed_placeholder() {
        let options = ResolverOptions::default()
            .with_policy(ErrorPolicy::new([ErrorCategory::InvalidParameter]).unwrap());
        let form = session(options).context("form").unwrap();

        assert_eq!(form.get("title").unwrap(), "Title");
        assert_eq!(form.get("").unwrap(), "??????");
        assert_eq!(form.get("x..y").unwrap(), "???x..y???");
    }

    #[test]
    fn test_missing_key_carries_full_key() {
        let form = session(ResolverOptions::default()).context("form").unwrap();
        assert_matches!(
            form.get("subtitle"),
            Err(KeyglotError::MissingTranslation { key, .. }) if key == "form.subtitle"
        );
    }
}
