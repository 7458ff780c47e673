// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Role registry.
//!
//! Holds the current role set behind a time-boxed cache. The cache is the
//! only shared mutable state in the core: readers clone an `Arc` out of it
//! and a refresh swaps in a whole new `Arc`, so no reader ever sees a
//! partially replaced set.
//!
//! Staleness is bounded by the TTL. Any component that mutates role data
//! must call [`RoleRegistry::invalidate`] or permissions may lag by up to
//! one TTL window.

use crate::clock::Clock;
use crate::store::{RoleSnapshotStore, RoleSource};
use staffdesk_domain::{Role, RoleId, RoleSet};
use std::sync::{Arc, PoisonError, RwLock};
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

/// Registry configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// How long a fetched role set is served before refetching.
    pub ttl: Duration,
}

impl RegistryConfig {
    pub const DEFAULT_TTL: Duration = Duration::minutes(5);
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            ttl: Self::DEFAULT_TTL,
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    roles: Arc<RoleSet>,
    fetched_at: OffsetDateTime,
}

/// Cached view of the role source with a durable fallback.
pub struct RoleRegistry {
    config: RegistryConfig,
    clock: Arc<dyn Clock>,
    snapshot: Box<dyn RoleSnapshotStore + Send + Sync>,
    cache: RwLock<Option<CacheEntry>>,
}

impl std::fmt::Debug for RoleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleRegistry")
            .field("config", &self.config)
            .field("cached", &self.cached().map(|roles| roles.len()))
            .finish_non_exhaustive()
    }
}

impl RoleRegistry {
    /// Creates an empty registry. Nothing is fetched until the first `load`.
    #[must_use]
    pub fn new(
        config: RegistryConfig,
        clock: Arc<dyn Clock>,
        snapshot: Box<dyn RoleSnapshotStore + Send + Sync>,
    ) -> Self {
        Self {
            config,
            clock,
            snapshot,
            cache: RwLock::new(None),
        }
    }

    #[must_use]
    pub const fn config(&self) -> RegistryConfig {
        self.config
    }

    /// Returns the current role set.
    ///
    /// The cached set is returned while it is younger than the TTL unless
    /// `force_refresh` is set. Otherwise roles are fetched from `source`,
    /// the cache and the durable snapshot are replaced, and the fresh set
    /// is returned.
    ///
    /// Never fails. If the fetch fails, the durable snapshot is returned
    /// when present, else an empty set. Fallback results are not cached so
    /// the next call tries the source again.
    pub fn load(&self, source: &mut dyn RoleSource, force_refresh: bool) -> Arc<RoleSet> {
        let now: OffsetDateTime = self.clock.now();

        if !force_refresh
            && let Some(entry) = self.read_entry()
            && now - entry.fetched_at < self.config.ttl
        {
            debug!(roles = entry.roles.len(), "Role cache hit");
            return entry.roles;
        }

        match source.fetch_roles() {
            Ok(roles) => {
                if let Err(e) = self.snapshot.write(&roles) {
                    warn!(error = %e, "Failed to persist role snapshot");
                }
                let roles: Arc<RoleSet> = Arc::new(RoleSet::new(roles));
                info!(roles = roles.len(), force_refresh, "Fetched role set");
                *self.cache.write().unwrap_or_else(PoisonError::into_inner) = Some(CacheEntry {
                    roles: Arc::clone(&roles),
                    fetched_at: now,
                });
                roles
            }
            Err(e) => {
                let fallback: RoleSet = match self.snapshot.read() {
                    Ok(Some(roles)) => RoleSet::new(roles),
                    Ok(None) => RoleSet::default(),
                    Err(snapshot_error) => {
                        warn!(error = %snapshot_error, "Failed to read role snapshot");
                        RoleSet::default()
                    }
                };
                warn!(
                    error = %e,
                    fallback_roles = fallback.len(),
                    "Role fetch failed, serving durable snapshot"
                );
                Arc::new(fallback)
            }
        }
    }

    /// Looks up one role through [`Self::load`].
    pub fn get_by_id(&self, source: &mut dyn RoleSource, id: RoleId) -> Option<Role> {
        self.load(source, false).get(id).cloned()
    }

    /// Drops the cached set so the next `load` refetches.
    pub fn invalidate(&self) {
        *self.cache.write().unwrap_or_else(PoisonError::into_inner) = None;
        debug!("Role cache invalidated");
    }

    /// Returns the cached set without fetching, regardless of age.
    #[must_use]
    pub fn cached(&self) -> Option<Arc<RoleSet>> {
        self.read_entry().map(|entry| entry.roles)
    }

    fn read_entry(&self) -> Option<CacheEntry> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
