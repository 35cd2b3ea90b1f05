//! Application layer - use cases

pub mod compose;
pub mod config;
pub mod send_contact;
pub mod subscribe;
pub mod unsubscribe;
