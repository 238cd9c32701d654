//! Presence service
//!
//! Read and write access to online markers and typing sets.

use tracing::instrument;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Presence service
pub struct PresenceService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PresenceService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Whether the user has a live session anywhere
    pub async fn is_online(&self, user_id: &str) -> ServiceResult<bool> {
        Ok(self.ctx.presence().is_online(user_id).await?)
    }

    /// Users currently typing in the room
    pub async fn typing_users(&self, room_id: &str) -> ServiceResult<Vec<String>> {
        Ok(self.ctx.presence().list_typing(room_id).await?)
    }

    /// Record that a user started or stopped typing
    #[instrument(skip(self))]
    pub async fn set_typing(&self, room_id: &str, user_id: &str, is_typing: bool) -> ServiceResult<()> {
        let presence = self.ctx.presence();
        if is_typing {
            presence.add_typing(room_id, user_id).await?;
        } else {
            presence.remove_typing(room_id, user_id).await?;
        }
        Ok(())
    }
}
