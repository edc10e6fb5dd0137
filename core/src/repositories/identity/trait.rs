//! Identity lookup trait consumed by token validation.
//!
//! Account management owns the principals; token validation only needs to
//! know whether a subject exists and whether it is still active.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::entities::Subject;

/// Resolves a token subject against the identity store
///
/// Implementations are expected to hit the backing store on every call.
/// Account status can change between requests, so results are not cached.
#[async_trait]
pub trait IdentityLookup: Send + Sync {
    /// Find a principal by subject id
    ///
    /// # Returns
    /// * `Some(Subject)` - The principal exists (active or not)
    /// * `None` - No principal with this id
    async fn resolve(&self, subject_id: &str) -> Option<Subject>;
}

#[async_trait]
impl<T: IdentityLookup + ?Sized> IdentityLookup for Arc<T> {
    async fn resolve(&self, subject_id: &str) -> Option<Subject> {
        (**self).resolve(subject_id).await
    }
}
