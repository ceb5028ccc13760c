//! Delivery channels implementing [`Notifier`](crate::Notifier).

pub mod email;
pub mod log;
