pub mod auth_provider;
pub mod change_feed;
pub mod channel_repository;
pub mod contact_repository;
pub mod message_repository;
pub mod task_spawner;
pub mod template_repository;
