//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod appointment_letter_repo;
pub mod attachment_repo;
pub mod candidate_repo;
pub mod hr_admin_repo;
pub mod offer_letter_repo;
pub mod relieving_letter_repo;
pub mod section_repo;

pub use appointment_letter_repo::AppointmentLetterRepo;
pub use attachment_repo::AttachmentRepo;
pub use candidate_repo::CandidateRepo;
pub use hr_admin_repo::HrAdminRepo;
pub use offer_letter_repo::OfferLetterRepo;
pub use relieving_letter_repo::RelievingLetterRepo;
pub use section_repo::SectionRepo;
