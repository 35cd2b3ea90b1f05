//! Domain layer - pure protection logic

pub mod csrf;
pub mod signed_link;
