//! Allow-list access checker.

use async_trait::async_trait;
use std::collections::HashSet;

use crate::domain::foundation::ActorId;
use crate::ports::AccessChecker;

/// Access checker backed by a fixed set of allowed actor ids.
///
/// An empty list denies everyone; there is no implicit open mode.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    allowed: HashSet<ActorId>,
}

impl AllowList {
    /// Builds the allow-list from raw actor ids (as configured).
    pub fn new(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            allowed: ids.into_iter().map(ActorId::from_i64).collect(),
        }
    }

    /// Number of allowed actors.
    pub fn len(&self) -> usize {
        self.allowed.len()
    }

    /// Returns true if nobody is allowed.
    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}

#[async_trait]
impl AccessChecker for AllowList {
    async fn is_allowed(&self, actor: ActorId) -> bool {
        self.allowed.contains(&actor)
    }
}
