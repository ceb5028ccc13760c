//! Salary structure administration and breakdown preview.

use axum::extract::State;
use axum::Json;
use hrdocs_core::salary::{breakdown_for_value, ComponentShare, SalaryComponent, SalaryStructure};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::rbac::{RequireAdmin, RequireSuperAdmin};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplaceStructureRequest {
    pub components: Vec<ComponentShare>,
}

#[derive(Debug, Deserialize)]
pub struct BreakdownRequest {
    /// Number or numeric string.
    pub ctc: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct BreakdownResponse {
    pub ctc: i64,
    pub components: Vec<SalaryComponent>,
}

/// GET /api/v1/salary-structure
pub async fn get_structure(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<SalaryStructure>>> {
    Ok(Json(DataResponse {
        data: state.salary_structure(),
    }))
}

/// PUT /api/v1/salary-structure
///
/// Replaces the in-memory table. Existing letters and sections keep the
/// breakdown they were issued with.
///
/// The replacement is not persisted: a restart reverts to the structure in
/// `SALARY_STRUCTURE`, and each process holds its own copy.
pub async fn replace_structure(
    State(state): State<AppState>,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    Json(input): Json<ReplaceStructureRequest>,
) -> AppResult<Json<DataResponse<SalaryStructure>>> {
    let structure = SalaryStructure::new(input.components)?;
    state.replace_salary_structure(structure.clone());

    tracing::info!(
        admin_id = admin.admin_id,
        components = structure.components().len(),
        "Salary structure replaced",
    );
    Ok(Json(DataResponse { data: structure }))
}

/// POST /api/v1/salary-structure/breakdown
pub async fn preview_breakdown(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<BreakdownRequest>,
) -> AppResult<Json<DataResponse<BreakdownResponse>>> {
    let (ctc, components) = breakdown_for_value(&input.ctc, &state.salary_structure())?;
    Ok(Json(DataResponse {
        data: BreakdownResponse { ctc, components },
    }))
}
