//! Outbound notifications for the HR documents backend.
//!
//! - [`Notifier`]: the seam through which letters and password-reset codes
//!   leave the system.
//! - [`delivery`]: concrete channels (SMTP e-mail, log-only fallback).
//! - [`dispatch`]: fire-and-forget sending on a spawned task.

pub mod delivery;
pub mod notifier;

pub use delivery::email::{EmailConfig, EmailDelivery, EmailError};
pub use delivery::log::LogDelivery;
pub use notifier::{dispatch, EmailAttachment, Notifier, OutboundEmail};
