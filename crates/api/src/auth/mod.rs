//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and reset codes.
//! - [`jwt`] -- JWT access-token generation and validation.

pub mod jwt;
pub mod password;
