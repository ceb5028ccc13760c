pub mod appointment_letters;
pub mod auth;
pub mod candidates;
pub mod letter_support;
pub mod offer_letters;
pub mod onboarding;
pub mod relieving_letters;
pub mod salary;
