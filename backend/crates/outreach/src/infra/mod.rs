//! Infrastructure layer - mail provider client

pub mod resend;
