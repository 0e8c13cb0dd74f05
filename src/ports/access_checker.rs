//! Access control port - the allow-list gate.
//!
//! Consulted before any mutating dialogue or status action. A `false`
//! answer silently drops the request: disallowed actors learn nothing about
//! the system, not even that it refused them.

use async_trait::async_trait;

use crate::domain::foundation::ActorId;

/// Port for checking whether an actor may interact with the system.
///
/// Ownership of a listing does not restrict who may change its status; any
/// allowed broker watching the shared channel can mark a listing reserved
/// or closed.
#[async_trait]
pub trait AccessChecker: Send + Sync {
    /// Returns true if the actor is on the allow-list.
    async fn is_allowed(&self, actor: ActorId) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn AccessChecker) {}
}
