//! Authentication and authorization extractors.
//!
//! - [`auth::AuthAdmin`] -- Extracts the admin from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires any HR admin role.
//! - [`rbac::RequireSuperAdmin`] -- Requires the `super_admin` role.

pub mod auth;
pub mod rbac;
