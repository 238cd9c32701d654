//! # chat-service
//!
//! Application layer containing room/message business rules, services, and DTOs.

pub mod dto;
pub mod services;

pub use services::{
    MessageService, PresenceService, RoomService, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult,
};
