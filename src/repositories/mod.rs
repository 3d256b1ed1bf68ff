pub mod auth_repository;
pub mod conversation_repository;
pub mod message_repository;
pub mod profile_repository;
