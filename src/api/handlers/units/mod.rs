//! Institution unit CRUD handlers.
//!
//! HTTP dispatch stays thin here; SQL and constraint classification live in
//! the `storage` module. List and get annotate each unit with one level of
//! parent/child context; create and update return the bare row.

pub(crate) mod storage;
pub(crate) mod types;

use std::collections::HashMap;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use sqlx::PgPool;
use tracing::error;

use self::storage::{
    delete_unit as delete_unit_row, fetch_all_units, fetch_children, fetch_unit, fetch_unit_ref,
    insert_unit, update_unit as update_unit_row, would_create_cycle, StoreError, UnitRow,
};
use self::types::{
    CreateUnitRequest, UnitDetailResponse, UnitMessage, UnitRef, UnitResponse, UpdateUnitRequest,
};

const DELETE_BLOCKED_MESSAGE: &str = "Cannot delete unit. It is currently referenced by other \
     records (e.g., has child units, assigned roles, offered courses, or administered batches). \
     Please remove all dependencies first.";

fn message_body(status: StatusCode, message: String) -> axum::response::Response {
    (status, Json(UnitMessage { message })).into_response()
}

fn unit_response(row: UnitRow) -> UnitResponse {
    UnitResponse {
        unit_id: row.unit_id,
        unit_code: row.unit_code,
        unit_name: row.unit_name,
        unit_type: row.unit_type,
        parent_unit_id: row.parent_unit_id,
        created_at: row.created_at,
    }
}

/// Annotate every row with shallow parent/child references, resolved from
/// the same result set. Rows arrive ordered by id, so child lists stay
/// ordered as well.
fn assemble_details(rows: Vec<UnitRow>) -> Vec<UnitDetailResponse> {
    let refs: HashMap<i32, UnitRef> = rows.iter().map(|row| (row.unit_id, row.to_ref())).collect();

    let mut children: HashMap<i32, Vec<UnitRef>> = HashMap::new();
    for row in &rows {
        if let Some(parent_id) = row.parent_unit_id {
            children.entry(parent_id).or_default().push(row.to_ref());
        }
    }

    rows.into_iter()
        .map(|row| {
            let parent_unit = row.parent_unit_id.and_then(|id| refs.get(&id).cloned());
            let child_units = children.remove(&row.unit_id).unwrap_or_default();
            UnitDetailResponse {
                unit_id: row.unit_id,
                unit_code: row.unit_code,
                unit_name: row.unit_name,
                unit_type: row.unit_type,
                parent_unit_id: row.parent_unit_id,
                created_at: row.created_at,
                parent_unit,
                child_units,
            }
        })
        .collect()
}

fn parse_unit_id(id: &str) -> Option<i32> {
    id.trim().parse::<i32>().ok()
}

#[utoipa::path(
    get,
    path = "/api/institutionUnit",
    responses(
        (status = 200, description = "All units with parent/child projections.", body = [UnitDetailResponse]),
        (status = 500, description = "Internal server error.", body = UnitMessage),
    ),
    tag = "units"
)]
pub async fn list_units(pool: Extension<PgPool>) -> impl IntoResponse {
    match fetch_all_units(&pool).await {
        Ok(rows) => (StatusCode::OK, Json(assemble_details(rows))).into_response(),
        Err(err) => {
            error!("Error fetching units: {err:?}");
            message_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to retrieve units.".to_string(),
            )
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/institutionUnit/{id}",
    params(("id" = String, Path, description = "Unit id")),
    responses(
        (status = 200, description = "Unit with parent/child projections.", body = UnitDetailResponse),
        (status = 400, description = "Invalid unit id.", body = UnitMessage),
        (status = 404, description = "Unit not found.", body = UnitMessage),
        (status = 500, description = "Internal server error.", body = UnitMessage),
    ),
    tag = "units"
)]
pub async fn get_unit(Path(id): Path<String>, pool: Extension<PgPool>) -> impl IntoResponse {
    let Some(unit_id) = parse_unit_id(&id) else {
        return message_body(
            StatusCode::BAD_REQUEST,
            "Invalid Unit ID format.".to_string(),
        );
    };

    let row = match fetch_unit(&pool, unit_id).await {
        Ok(Some(row)) => row,
        Ok(None) => {
            return message_body(
                StatusCode::NOT_FOUND,
                format!("Institution Unit with ID {unit_id} not found."),
            );
        }
        Err(err) => {
            error!("Error fetching unit {unit_id}: {err:?}");
            return message_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to retrieve unit.".to_string(),
            );
        }
    };

    let parent_unit = match row.parent_unit_id {
        Some(parent_id) => match fetch_unit_ref(&pool, parent_id).await {
            Ok(parent) => parent,
            Err(err) => {
                error!("Error fetching parent of unit {unit_id}: {err:?}");
                return message_body(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to retrieve unit.".to_string(),
                );
            }
        },
        None => None,
    };

    let child_units = match fetch_children(&pool, unit_id).await {
        Ok(children) => children,
        Err(err) => {
            error!("Error fetching children of unit {unit_id}: {err:?}");
            return message_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to retrieve unit.".to_string(),
            );
        }
    };

    let detail = UnitDetailResponse {
        unit_id: row.unit_id,
        unit_code: row.unit_code,
        unit_name: row.unit_name,
        unit_type: row.unit_type,
        parent_unit_id: row.parent_unit_id,
        created_at: row.created_at,
        parent_unit,
        child_units,
    };

    (StatusCode::OK, Json(detail)).into_response()
}

#[utoipa::path(
    post,
    path = "/api/institutionUnit",
    request_body = CreateUnitRequest,
    responses(
        (status = 201, description = "Unit created.", body = UnitResponse),
        (status = 400, description = "Missing required fields.", body = UnitMessage),
        (status = 409, description = "Duplicate unit code or missing parent.", body = UnitMessage),
        (status = 500, description = "Internal server error.", body = UnitMessage),
    ),
    tag = "units"
)]
pub async fn create_unit(
    pool: Extension<PgPool>,
    payload: Option<Json<CreateUnitRequest>>,
) -> impl IntoResponse {
    let missing_fields = || {
        message_body(
            StatusCode::BAD_REQUEST,
            "Missing required fields: unit_code, unit_name, and unit_type.".to_string(),
        )
    };

    let Some(Json(request)) = payload else {
        return missing_fields();
    };

    let required = |value: &Option<String>| -> Option<String> {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let (Some(unit_code), Some(unit_name), Some(unit_type)) = (
        required(&request.unit_code),
        required(&request.unit_name),
        required(&request.unit_type),
    ) else {
        return missing_fields();
    };

    match insert_unit(&pool, &unit_code, &unit_name, &unit_type, request.parent_unit_id).await {
        Ok(row) => (StatusCode::CREATED, Json(unit_response(row))).into_response(),
        Err(StoreError::Unique) => message_body(
            StatusCode::CONFLICT,
            "Unit code already exists. Please use a unique code.".to_string(),
        ),
        Err(StoreError::ForeignKey) => message_body(
            StatusCode::CONFLICT,
            "Parent unit does not exist.".to_string(),
        ),
        Err(err) => {
            error!("Error creating unit: {err:?}");
            message_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create unit.".to_string(),
            )
        }
    }
}

#[utoipa::path(
    patch,
    path = "/api/institutionUnit/{id}",
    request_body = UpdateUnitRequest,
    params(("id" = String, Path, description = "Unit id")),
    responses(
        (status = 200, description = "Unit updated.", body = UnitResponse),
        (status = 400, description = "Invalid unit id or request body.", body = UnitMessage),
        (status = 404, description = "Unit not found.", body = UnitMessage),
        (status = 409, description = "Duplicate unit code, missing parent, or cycle.", body = UnitMessage),
        (status = 500, description = "Internal server error.", body = UnitMessage),
    ),
    tag = "units"
)]
pub async fn update_unit(
    Path(id): Path<String>,
    pool: Extension<PgPool>,
    payload: Option<Json<UpdateUnitRequest>>,
) -> impl IntoResponse {
    let Some(unit_id) = parse_unit_id(&id) else {
        return message_body(
            StatusCode::BAD_REQUEST,
            "Invalid Unit ID format.".to_string(),
        );
    };

    let Some(Json(request)) = payload else {
        return message_body(StatusCode::BAD_REQUEST, "Invalid request body.".to_string());
    };

    // Reparenting must not close a cycle in the hierarchy.
    if let Some(Some(new_parent_id)) = request.parent_unit_id {
        match would_create_cycle(&pool, unit_id, new_parent_id).await {
            Ok(true) => {
                return message_body(
                    StatusCode::CONFLICT,
                    "Cannot move unit under one of its own descendants.".to_string(),
                );
            }
            Ok(false) => (),
            Err(err) => {
                error!("Error checking hierarchy for unit {unit_id}: {err:?}");
                return message_body(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to update unit.".to_string(),
                );
            }
        }
    }

    match update_unit_row(
        &pool,
        unit_id,
        request.unit_code.as_deref(),
        request.unit_name.as_deref(),
        request.unit_type.as_deref(),
        request.parent_unit_id,
    )
    .await
    {
        Ok(row) => (StatusCode::OK, Json(unit_response(row))).into_response(),
        Err(StoreError::NotFound) => message_body(
            StatusCode::NOT_FOUND,
            format!("Institution Unit with ID {unit_id} not found."),
        ),
        Err(StoreError::Unique) => message_body(
            StatusCode::CONFLICT,
            "Unit code already exists. Please use a unique code.".to_string(),
        ),
        Err(StoreError::ForeignKey) => message_body(
            StatusCode::CONFLICT,
            "Parent unit does not exist.".to_string(),
        ),
        Err(StoreError::Other(err)) => {
            error!("Error updating unit {unit_id}: {err}");
            message_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to update unit.".to_string(),
            )
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/institutionUnit/{id}",
    params(("id" = String, Path, description = "Unit id")),
    responses(
        (status = 200, description = "Unit deleted.", body = UnitMessage),
        (status = 400, description = "Invalid unit id.", body = UnitMessage),
        (status = 404, description = "Unit not found.", body = UnitMessage),
        (status = 409, description = "Unit is still referenced by other records.", body = UnitMessage),
        (status = 500, description = "Internal server error.", body = UnitMessage),
    ),
    tag = "units"
)]
pub async fn delete_unit(Path(id): Path<String>, pool: Extension<PgPool>) -> impl IntoResponse {
    let Some(unit_id) = parse_unit_id(&id) else {
        return message_body(
            StatusCode::BAD_REQUEST,
            "Invalid Unit ID format.".to_string(),
        );
    };

    match delete_unit_row(&pool, unit_id).await {
        Ok(()) => message_body(
            StatusCode::OK,
            format!("Institution Unit {unit_id} deleted successfully."),
        ),
        Err(StoreError::NotFound) => message_body(
            StatusCode::NOT_FOUND,
            format!("Institution Unit with ID {unit_id} not found."),
        ),
        Err(StoreError::ForeignKey) => {
            message_body(StatusCode::CONFLICT, DELETE_BLOCKED_MESSAGE.to_string())
        }
        Err(err) => {
            error!("Error deleting unit {unit_id}: {err:?}");
            message_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to delete unit.".to_string(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(unit_id: i32, code: &str, parent: Option<i32>) -> UnitRow {
        UnitRow {
            unit_id,
            unit_code: code.to_string(),
            unit_name: format!("Unit {unit_id}"),
            unit_type: "department".to_string(),
            parent_unit_id: parent,
            created_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn parse_unit_id_accepts_integers_only() {
        assert_eq!(parse_unit_id("42"), Some(42));
        assert_eq!(parse_unit_id(" 42 "), Some(42));
        assert_eq!(parse_unit_id("abc"), None);
        assert_eq!(parse_unit_id("4.2"), None);
        assert_eq!(parse_unit_id(""), None);
    }

    #[test]
    fn assemble_details_projects_parent_and_children() {
        let details = assemble_details(vec![
            row(1, "INST", None),
            row(2, "ENG", Some(1)),
            row(3, "SCI", Some(1)),
            row(4, "CS", Some(2)),
        ]);

        assert_eq!(details.len(), 4);

        let institution = &details[0];
        assert!(institution.parent_unit.is_none());
        assert_eq!(
            institution
                .child_units
                .iter()
                .map(|child| child.unit_id)
                .collect::<Vec<_>>(),
            vec![2, 3]
        );

        let engineering = &details[1];
        assert_eq!(
            engineering.parent_unit.as_ref().map(|p| p.unit_id),
            Some(1)
        );
        assert_eq!(
            engineering
                .child_units
                .iter()
                .map(|child| child.unit_id)
                .collect::<Vec<_>>(),
            vec![4]
        );

        let compsci = &details[3];
        assert_eq!(compsci.parent_unit.as_ref().map(|p| p.unit_id), Some(2));
        assert!(compsci.child_units.is_empty());
    }

    #[test]
    fn assemble_details_keeps_row_order() {
        let details = assemble_details(vec![row(1, "A", None), row(2, "B", None)]);
        assert_eq!(
            details.iter().map(|d| d.unit_id).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }
}
