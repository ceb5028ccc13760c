//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` entity struct matching the database
//! row plus the input types its repository accepts. Validation happens in
//! `hrdocs_core` before values reach these types.

pub mod hr_admin;
pub mod letters;
pub mod onboarded_candidate;
pub mod onboarding_section;
pub mod section_attachment;
