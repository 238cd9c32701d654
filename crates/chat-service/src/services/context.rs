//! Service context - dependency container for services
//!
//! Holds the repositories and presence store needed by services.

use std::sync::Arc;

use chat_core::{MessageRepository, PresenceRepository, RoomRepository};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// Cloning is cheap: every collaborator is behind an `Arc`.
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    message_repo: Arc<dyn MessageRepository>,
    room_repo: Arc<dyn RoomRepository>,

    // Ephemeral state
    presence: Arc<dyn PresenceRepository>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        message_repo: Arc<dyn MessageRepository>,
        room_repo: Arc<dyn RoomRepository>,
        presence: Arc<dyn PresenceRepository>,
    ) -> Self {
        Self {
            message_repo,
            room_repo,
            presence,
        }
    }

    // === Repositories ===

    /// Get the message repository
    pub fn message_repo(&self) -> &dyn MessageRepository {
        self.message_repo.as_ref()
    }

    /// Get the room repository
    pub fn room_repo(&self) -> &dyn RoomRepository {
        self.room_repo.as_ref()
    }

    // === Presence ===

    /// Get the presence store
    pub fn presence(&self) -> &dyn PresenceRepository {
        self.presence.as_ref()
    }

    /// Get a shared handle to the presence store
    pub fn presence_handle(&self) -> Arc<dyn PresenceRepository> {
        Arc::clone(&self.presence)
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("presence", &"...")
            .finish()
    }
}

/// Builder for creating ServiceContext
#[derive(Default)]
pub struct ServiceContextBuilder {
    message_repo: Option<Arc<dyn MessageRepository>>,
    room_repo: Option<Arc<dyn RoomRepository>>,
    presence: Option<Arc<dyn PresenceRepository>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message_repo(mut self, repo: Arc<dyn MessageRepository>) -> Self {
        self.message_repo = Some(repo);
        self
    }

    pub fn room_repo(mut self, repo: Arc<dyn RoomRepository>) -> Self {
        self.room_repo = Some(repo);
        self
    }

    pub fn presence(mut self, presence: Arc<dyn PresenceRepository>) -> Self {
        self.presence = Some(presence);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.message_repo
                .ok_or_else(|| ServiceError::validation("message_repo is required"))?,
            self.room_repo
                .ok_or_else(|| ServiceError::validation("room_repo is required"))?,
            self.presence
                .ok_or_else(|| ServiceError::validation("presence is required"))?,
        ))
    }
}
