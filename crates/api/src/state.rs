use std::sync::{Arc, RwLock};

use hrdocs_core::attachments::AttachmentPolicy;
use hrdocs_core::crypto::FieldCipher;
use hrdocs_core::error::CoreError;
use hrdocs_core::render::{LetterRenderer, PdfRenderer};
use hrdocs_core::salary::SalaryStructure;
use hrdocs_events::Notifier;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc` or already `Clone`.
#[derive(Clone)]
pub struct AppState {
    pub pool: hrdocs_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Current salary structure; replaced at runtime by super admins.
    pub salary_structure: Arc<RwLock<SalaryStructure>>,
    pub cipher: Arc<FieldCipher>,
    pub attachment_policy: Arc<AttachmentPolicy>,
    pub renderer: Arc<dyn LetterRenderer>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    /// Build the state from configuration, validating the salary structure,
    /// attachment policy and encryption key up front.
    pub fn new(
        pool: hrdocs_db::DbPool,
        config: ServerConfig,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, CoreError> {
        let structure = SalaryStructure::parse(&config.salary_structure)?;
        let policy = AttachmentPolicy::parse(&config.mandatory_attachments)?;
        let cipher = FieldCipher::new(&config.field_encryption_key, &config.draft_id_salt)?;
        let renderer = PdfRenderer::new(&config.company_name, &config.company_address);
        Ok(Self {
            pool,
            config: Arc::new(config),
            salary_structure: Arc::new(RwLock::new(structure)),
            cipher: Arc::new(cipher),
            attachment_policy: Arc::new(policy),
            renderer: Arc::new(renderer),
            notifier,
        })
    }

    /// Snapshot of the current salary structure. The lock is held only for
    /// the clone.
    pub fn salary_structure(&self) -> SalaryStructure {
        match self.salary_structure.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Swap the process-local structure. Not written to the database.
    pub fn replace_salary_structure(&self, structure: SalaryStructure) {
        match self.salary_structure.write() {
            Ok(mut guard) => *guard = structure,
            Err(poisoned) => *poisoned.into_inner() = structure,
        }
    }
}
