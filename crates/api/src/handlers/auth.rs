//! Handlers for the `/auth` resource: register, login, password reset and
//! the current-admin lookup.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use hrdocs_core::error::CoreError;
use hrdocs_core::roles::{validate_role, ROLE_ADMIN, ROLE_SUPER_ADMIN};
use hrdocs_core::validation::{require_email, require_text};
use hrdocs_db::models::hr_admin::{CreateHrAdmin, HrAdminResponse};
use hrdocs_db::repositories::HrAdminRepo;
use hrdocs_events::{dispatch, OutboundEmail};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{
    generate_reset_code, hash_password, hash_reset_code, validate_password_strength,
    verify_password, RESET_CODE_TTL_MINS,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: String,
    /// Ignored for the bootstrap admin, who is always a super admin.
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub otp: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub admin: HrAdminResponse,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Open while no admin exists; the first account becomes a super admin.
/// Afterwards only super admins may register further accounts.
pub async fn register(
    State(state): State<AppState>,
    caller: Option<AuthAdmin>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<HrAdminResponse>>)> {
    let bootstrap = HrAdminRepo::count(&state.pool).await? == 0;
    let role = if bootstrap {
        ROLE_SUPER_ADMIN.to_string()
    } else {
        match caller {
            Some(admin) if admin.is_super_admin() => {}
            Some(_) => {
                return Err(AppError::Core(CoreError::Forbidden(
                    "Super admin role required".into(),
                )))
            }
            None => {
                return Err(AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                )))
            }
        }
        let role = input.role.clone().unwrap_or_else(|| ROLE_ADMIN.to_string());
        validate_role(&role)?;
        role
    };

    validate_password_strength(&input.password)
        .map_err(|msg| CoreError::validation("password", msg))?;
    let create = CreateHrAdmin {
        first_name: require_text("first_name", &input.first_name)?,
        last_name: require_text("last_name", &input.last_name)?,
        email: require_email("email", &input.email)?,
        password_hash: hash_password(&input.password)
            .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?,
        role,
    };

    let admin = HrAdminRepo::create(&state.pool, &create).await?;
    tracing::info!(admin_id = admin.id, role = %admin.role, bootstrap, "HR admin registered");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: HrAdminResponse::from(&admin),
        }),
    ))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let email = input.email.trim().to_lowercase();
    let admin = HrAdminRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(invalid_credentials)?;

    let password_valid = verify_password(&input.password, &admin.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::warn!(admin_id = admin.id, "Failed login");
        return Err(invalid_credentials());
    }

    HrAdminRepo::record_login(&state.pool, admin.id).await?;

    let access_token = generate_access_token(admin.id, &admin.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(admin_id = admin.id, "HR admin logged in");
    Ok(Json(DataResponse {
        data: AuthResponse {
            access_token,
            token_type: "Bearer",
            expires_in: state.config.jwt.access_token_expiry_mins * 60,
            admin: HrAdminResponse::from(&admin),
        },
    }))
}

/// POST /api/v1/auth/forgot-password
///
/// Always answers 200 so the response does not reveal which e-mails exist.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(input): Json<ForgotPasswordRequest>,
) -> AppResult<Json<DataResponse<MessageResponse>>> {
    let email = input.email.trim().to_lowercase();
    if let Some(admin) = HrAdminRepo::find_by_email(&state.pool, &email).await? {
        let (code, code_hash) = generate_reset_code();
        let expires_at = Utc::now() + chrono::Duration::minutes(RESET_CODE_TTL_MINS);
        HrAdminRepo::set_reset_otp(&state.pool, admin.id, &code_hash, expires_at).await?;

        dispatch(
            state.notifier.clone(),
            OutboundEmail {
                to: admin.email.clone(),
                subject: "Password reset code".into(),
                body: format!(
                    "Hello {},\n\nYour password reset code is {code}. \
                     It expires in {RESET_CODE_TTL_MINS} minutes.\n\n\
                     If you did not request a reset, you can ignore this e-mail.",
                    admin.first_name
                ),
                attachments: Vec::new(),
            },
        );
        tracing::info!(admin_id = admin.id, "Password reset code issued");
    }

    Ok(Json(DataResponse {
        data: MessageResponse {
            message: "If the e-mail is registered, a reset code has been sent",
        },
    }))
}

/// POST /api/v1/auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<Json<DataResponse<MessageResponse>>> {
    if input.new_password != input.confirm_password {
        return Err(CoreError::validation("confirm_password", "passwords do not match").into());
    }
    validate_password_strength(&input.new_password)
        .map_err(|msg| CoreError::validation("new_password", msg))?;

    let invalid_code = || AppError::Core(CoreError::validation("otp", "invalid or expired code"));

    let email = input.email.trim().to_lowercase();
    let admin = HrAdminRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(invalid_code)?;

    let code_matches = admin.reset_otp_hash.as_deref() == Some(hash_reset_code(&input.otp).as_str());
    let unexpired = admin.reset_otp_expires_at.is_some_and(|at| at > Utc::now());
    if !code_matches || !unexpired {
        return Err(invalid_code());
    }

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    HrAdminRepo::reset_password(&state.pool, admin.id, &password_hash).await?;

    tracing::info!(admin_id = admin.id, "Password reset");
    Ok(Json(DataResponse {
        data: MessageResponse {
            message: "Password has been reset",
        },
    }))
}

/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    admin: AuthAdmin,
) -> AppResult<Json<DataResponse<HrAdminResponse>>> {
    let row = HrAdminRepo::find_by_id(&state.pool, admin.admin_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("HR admin", admin.admin_id)))?;
    Ok(Json(DataResponse {
        data: HrAdminResponse::from(&row),
    }))
}
