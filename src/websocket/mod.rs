pub mod handler;
pub mod msg_content_handler;
pub mod msg_lock_handler;
pub mod msg_relay_handler;
pub mod msg_rename_handler;
pub mod session;
