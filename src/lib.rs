//! WebSocket relay for Yjs collaborative editing.
//!
//! Clients join a room by id and every binary message is fanned out to the
//! other clients of that room. The relay never looks into document updates;
//! it only answers a handful of control messages (initialization lock,
//! initialized-content snapshot, room rename) and classifies awareness
//! updates in the global awareness room for logging.

pub mod auth;
pub mod awareness;
pub mod config;
pub mod docs;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod websocket;
pub mod ws;

pub use state::AppState;
