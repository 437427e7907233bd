//! One session per locale
//!
//! The registry memoizes sessions by locale. When a session cannot be
//! built and the policy suppresses every category, a [`NullSession`] is
//! handed out instead; it is not memoized, so the next request retries.
//! Building a session for one locale never blocks requests for another.

use std::fmt;
use std::sync::Arc;

use tracing::info;

use super::{NullSession, Session, Translator};
use crate::config::Settings;
use crate::locale::LocaleId;
use crate::resolver::ResolverOptions;
use crate::store::cached::CachedStoreFactory;
use crate::store::{StoreFactory, StoreRegistry};
use crate::utils::errors::Result;
use crate::utils::logging;
use crate::utils::once_map::OnceMap;

pub struct SessionRegistry {
    options: Arc<ResolverOptions>,
    factory: Arc<dyn StoreFactory>,
    sessions: OnceMap<LocaleId, Arc<Session>>,
}

impl SessionRegistry {
    pub fn new(options: ResolverOptions, factory: Arc<dyn StoreFactory>) -> Self {
        Self {
            options: Arc::new(options),
            factory,
            sessions: OnceMap::new(),
        }
    }

    /// Build a registry from validated settings and the named store backends
    pub fn from_settings(settings: &Settings, stores: &StoreRegistry) -> Result<Self> {
        settings.validate()?;
        let options = ResolverOptions::from_config(&settings.resolver)?;

        let mut factory = stores.get(&settings.store.backend)?;
        if let Some(ttl_seconds) = settings.store.cache_ttl_seconds {
            factory = Arc::new(CachedStoreFactory::new(factory, ttl_seconds));
        }

        info!(
            backend = %settings.store.backend,
            cache_ttl_seconds = ?settings.store.cache_ttl_seconds,
            "Session registry configured"
        );
        Ok(Self::new(options, factory))
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// The session for `locale`, built on first request
    pub fn for_locale(&self, locale: &LocaleId) -> Result<Arc<dyn Translator>> {
        let built = self.sessions.get_or_try_build(locale, || {
            Session::new(locale.clone(), Arc::clone(&self.options), Arc::clone(&self.factory)).map(Arc::new)
        });

        match built {
            Ok(session) => {
                let session: Arc<dyn Translator> = session;
                Ok(session)
            }
            Err(error) if self.options.policy().suppresses_all() => {
                logging::log_degraded_session(logging::locale_label(&locale.to_string()), &error);
                Ok(Arc::new(NullSession::new(locale.clone(), &self.options)))
            }
            Err(error) => Err(error),
        }
    }

    /// The session for a locale tag such as `de_DE`
    pub fn for_locale_str(&self, tag: &str) -> Result<Arc<dyn Translator>> {
        match LocaleId::parse(tag) {
            Ok(locale) => self.for_locale(&locale),
            Err(error) => {
                let root = LocaleId::root();
                self.options.policy().suppress(error, &root)?;
                Ok(Arc::new(NullSession::new(root, &self.options)))
            }
        }
    }

    /// Discard every memoized session
    pub fn reset(&self) {
        info!(sessions = self.sessions.len(), "Resetting session registry");
        self.sessions.clear();
    }

    /// Number of memoized sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("options", &self.options)
            .field("sessions", &self.len())
            .finish()
    }
}
