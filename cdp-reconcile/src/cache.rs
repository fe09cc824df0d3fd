//! Access to previously persisted profiles.

use cdp_types::{Profile, ProfileId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Errors a profile cache can report.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("profile cache unavailable: {0}")]
    Unavailable(String),

    #[error("cached profile {id} is unreadable: {reason}")]
    Corrupt { id: ProfileId, reason: String },
}

/// Looks up the last persisted version of a profile.
///
/// Reconciliation reads through this trait and never writes back, so the
/// read-merge-persist sequence is not transactional. Two events for the same
/// profile reconciled at once will both merge against the same snapshot.
/// Implementations backing a shared store are responsible for detecting the
/// resulting lost update when the merged profile is persisted (for example
/// with versioned or compare-and-swap writes).
pub trait ProfileCache: Send + Sync {
    /// Returns the cached profile, or `None` if the profile was never stored.
    fn load(&self, id: &ProfileId) -> Result<Option<Profile>, CacheError>;
}

impl<T: ProfileCache + ?Sized> ProfileCache for &T {
    fn load(&self, id: &ProfileId) -> Result<Option<Profile>, CacheError> {
        (**self).load(id)
    }
}

impl<T: ProfileCache + ?Sized> ProfileCache for Arc<T> {
    fn load(&self, id: &ProfileId) -> Result<Option<Profile>, CacheError> {
        (**self).load(id)
    }
}

/// A [`ProfileCache`] backed by a closure.
pub struct FnProfileCache<F>(F);

/// Wraps a lookup closure as a [`ProfileCache`].
pub fn cache_fn<F>(lookup: F) -> FnProfileCache<F>
where
    F: Fn(&ProfileId) -> Result<Option<Profile>, CacheError> + Send + Sync,
{
    FnProfileCache(lookup)
}

impl<F> ProfileCache for FnProfileCache<F>
where
    F: Fn(&ProfileId) -> Result<Option<Profile>, CacheError> + Send + Sync,
{
    fn load(&self, id: &ProfileId) -> Result<Option<Profile>, CacheError> {
        (self.0)(id)
    }
}

/// Process-local profile cache.
#[derive(Debug, Default)]
pub struct InMemoryProfileCache {
    profiles: RwLock<HashMap<ProfileId, Profile>>,
}

impl InMemoryProfileCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `profile`, replacing any previous version. Returns the
    /// replaced version.
    pub fn store(&self, profile: Profile) -> Result<Option<Profile>, CacheError> {
        let mut profiles = self
            .profiles
            .write()
            .map_err(|_| CacheError::Unavailable("profile cache lock poisoned".into()))?;
        Ok(profiles.insert(profile.id.clone(), profile))
    }

    /// Drops the cached version of a profile.
    pub fn remove(&self, id: &ProfileId) -> Result<Option<Profile>, CacheError> {
        let mut profiles = self
            .profiles
            .write()
            .map_err(|_| CacheError::Unavailable("profile cache lock poisoned".into()))?;
        Ok(profiles.remove(id))
    }

    /// Number of cached profiles.
    pub fn len(&self) -> Result<usize, CacheError> {
        let profiles = self
            .profiles
            .read()
            .map_err(|_| CacheError::Unavailable("profile cache lock poisoned".into()))?;
        Ok(profiles.len())
    }

    pub fn is_empty(&self) -> Result<bool, CacheError> {
        Ok(self.len()? == 0)
    }
}

impl ProfileCache for InMemoryProfileCache {
    fn load(&self, id: &ProfileId) -> Result<Option<Profile>, CacheError> {
        let profiles = self
            .profiles
            .read()
            .map_err(|_| CacheError::Unavailable("profile cache lock poisoned".into()))?;
        Ok(profiles.get(id).cloned())
    }
}
