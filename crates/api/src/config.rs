use hrdocs_core::attachments::DEFAULT_MANDATORY_ATTACHMENTS;
use hrdocs_core::salary::DEFAULT_SALARY_STRUCTURE;

use crate::auth::jwt::JwtConfig;

/// Default request body ceiling for multipart uploads (10 MiB).
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Server configuration loaded from environment variables.
///
/// Missing secrets abort startup; everything else has a development default.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Largest accepted request body, multipart uploads included.
    pub max_upload_bytes: usize,
    pub jwt: JwtConfig,
    /// Server-side salt mixed into draft-id derivation and field hashes.
    pub draft_id_salt: String,
    /// Key material for sensitive-field encryption.
    pub field_encryption_key: String,
    /// Initial salary structure, `Name=fraction` pairs.
    pub salary_structure: String,
    /// Mandatory attachments, `section.slot` pairs.
    pub mandatory_attachments: String,
    /// Letterhead name.
    pub company_name: String,
    /// Letterhead address line.
    pub company_address: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `HOST`                  | `0.0.0.0`                  |
    /// | `PORT`                  | `3000`                     |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                       |
    /// | `MAX_UPLOAD_BYTES`      | `10485760`                 |
    /// | `DRAFT_ID_SALT`         | required                   |
    /// | `FIELD_ENCRYPTION_KEY`  | required                   |
    /// | `SALARY_STRUCTURE`      | five-component default     |
    /// | `MANDATORY_ATTACHMENTS` | Aadhaar, PAN, bank proof   |
    /// | `COMPANY_NAME`          | `HR Documents`             |
    /// | `COMPANY_ADDRESS`       | empty                      |
    ///
    /// # Panics
    ///
    /// Panics if a required variable is missing or a numeric one does not
    /// parse.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_BYTES.to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_upload_bytes,
            jwt: JwtConfig::from_env(),
            draft_id_salt: required("DRAFT_ID_SALT"),
            field_encryption_key: required("FIELD_ENCRYPTION_KEY"),
            salary_structure: std::env::var("SALARY_STRUCTURE")
                .unwrap_or_else(|_| DEFAULT_SALARY_STRUCTURE.into()),
            mandatory_attachments: std::env::var("MANDATORY_ATTACHMENTS")
                .unwrap_or_else(|_| DEFAULT_MANDATORY_ATTACHMENTS.into()),
            company_name: std::env::var("COMPANY_NAME").unwrap_or_else(|_| "HR Documents".into()),
            company_address: std::env::var("COMPANY_ADDRESS").unwrap_or_default(),
        }
    }
}

fn required(name: &str) -> String {
    let value = std::env::var(name).unwrap_or_else(|_| panic!("{name} must be set in the environment"));
    assert!(!value.is_empty(), "{name} must not be empty");
    value
}
