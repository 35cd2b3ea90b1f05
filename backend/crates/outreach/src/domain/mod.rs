//! Domain layer - value objects

pub mod email;

pub use email::Email;
