//! Domain logic for the HR documents backend.
//!
//! Everything in this crate is free of IO: salary computation, draft-id
//! derivation, field encryption, onboarding section validation, the
//! consolidation state machine, and letter rendering.

pub mod amount_words;
pub mod attachments;
pub mod consolidation;
pub mod crypto;
pub mod draft_id;
pub mod error;
pub mod hashing;
pub mod letters;
pub mod render;
pub mod roles;
pub mod salary;
pub mod sections;
pub mod types;
pub mod validation;
