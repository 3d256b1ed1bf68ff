pub mod auth_service;
pub mod conversation_service;
pub mod jwt_service;
pub mod message_service;
