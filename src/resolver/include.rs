//! Include directive resolution
//!
//! A value stored at `<prefix>.<tag>` lists alternate prefixes, separated
//! by `;`, to try when `<prefix>.<suffix>` is absent. Directives are looked
//! up from the nearest enclosing prefix outward; the first one found wins.
//! Every alternate prefix followed during one top-level call is recorded,
//! and following a recorded prefix again is an include loop.

use tracing::{debug, trace};

use crate::utils::errors::{KeyglotError, Result};

/// Follows include directives through a lookup function
#[derive(Debug, Clone)]
pub struct IncludeResolver {
    tag: String,
}

impl IncludeResolver {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Resolve `key` through include directives after a direct miss
    ///
    /// `lookup` performs a direct (fallback-aware) lookup. Returns
    /// `IncludeLoopDetected` naming the first alternate prefix followed twice.
    pub fn resolve<F>(&self, key: &str, lookup: F) -> Result<Option<String>>
    where
        F: Fn(&str) -> Result<Option<String>>,
    {
        let mut visited = Vec::new();
        self.resolve_from(key, &lookup, &mut visited)
    }

    fn resolve_from<F>(&self, key: &str, lookup: &F, visited: &mut Vec<String>) -> Result<Option<String>>
    where
        F: Fn(&str) -> Result<Option<String>>,
    {
        let mut end = key.len();
        while let Some(dot) = key[..end].rfind('.') {
            let prefix = &key[..dot];
            let suffix = &key[dot + 1..];
            end = dot;

            let directive_key = format!("{}.{}", prefix, self.tag);
            let Some(directive) = lookup(&directive_key)? else {
                continue;
            };
            trace!(key = key, prefix = prefix, directive = %directive, "Following include directive");

            for alternate in directive.split(';').map(str::trim).filter(|alt| !alt.is_empty()) {
                if visited.iter().any(|seen| seen == alternate) {
                    debug!(key = key, prefix = alternate, "Include loop detected");
                    return Err(KeyglotError::IncludeLoopDetected {
                        prefix: alternate.to_string(),
                    });
                }
                visited.push(alternate.to_string());

                let candidate = format!("{}.{}", alternate, suffix);
                if let Some(value) = lookup(&candidate)? {
                    return Ok(Some(value));
                }
                if let Some(value) = self.resolve_from(&candidate, lookup, visited)? {
                    return Ok(Some(value));
                }
            }

            return Ok(None);
        }

        Ok(None)
    }
}
