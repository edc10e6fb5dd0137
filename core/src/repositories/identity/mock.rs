//! Mock implementation of IdentityLookup for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::Subject;

use super::trait_::IdentityLookup;

/// In-memory identity store that counts lookups
#[derive(Clone, Default)]
pub struct MockIdentityLookup {
    subjects: Arc<RwLock<HashMap<String, Subject>>>,
    lookups: Arc<AtomicUsize>,
}

impl MockIdentityLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with one active subject
    pub fn with_active(id: &str) -> Self {
        let subjects = HashMap::from([(id.to_string(), Subject::active(id))]);
        Self {
            subjects: Arc::new(RwLock::new(subjects)),
            lookups: Arc::default(),
        }
    }

    pub async fn insert(&self, subject: Subject) {
        self.subjects.write().await.insert(subject.id.clone(), subject);
    }

    pub async fn set_active(&self, id: &str, is_active: bool) {
        if let Some(subject) = self.subjects.write().await.get_mut(id) {
            subject.is_active = is_active;
        }
    }

    pub async fn remove(&self, id: &str) {
        self.subjects.write().await.remove(id);
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityLookup for MockIdentityLookup {
    async fn resolve(&self, subject_id: &str) -> Option<Subject> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.subjects.read().await.get(subject_id).cloned()
    }
}
