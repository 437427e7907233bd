//! Keyglot
//!
//! Hierarchical translation key resolution. Keys such as `Customer.name`
//! are looked up for a locale through a fallback chain of per-locale
//! stores (`de_DE` → `de` → root), then through include directives that
//! redirect one key prefix to others. Failures are classified into error
//! categories, and a configurable policy decides which of them degrade to
//! a placeholder instead of being returned.
//!
//! ```no_run
//! use std::sync::Arc;
//! use keyglot::{LocaleId, MemoryBackend, ResolverOptions, SessionRegistry, Translator};
//!
//! let backend = Arc::new(MemoryBackend::new());
//! backend.insert(&LocaleId::parse("de")?, "greeting", "Hallo");
//!
//! let registry = SessionRegistry::new(ResolverOptions::default(), backend);
//! let session = registry.for_locale_str("de_DE")?;
//! assert_eq!(session.get("greeting")?, "Hallo");
//! # Ok::<(), keyglot::KeyglotError>(())
//! ```

pub mod config;
pub mod locale;
pub mod resolver;
pub mod session;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{ErrorCategory, KeyglotError, Result};

// Re-export main components for easy access
pub use locale::{LocaleFallback, LocaleId};
pub use resolver::{Arg, ArgFormat, ClassPrefix, ErrorPolicy, ResolverOptions};
pub use session::{ContextScope, NullSession, Resolution, Session, SessionRegistry, Translator};
pub use store::{
    CachedStore, FileFormat, FileStoreFactory, MemoryBackend, MemoryStore, StoreFactory, StoreRegistry,
    TranslationStore,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
