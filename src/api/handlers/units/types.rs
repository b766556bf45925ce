//! Request/response payloads for institution unit endpoints.

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Deserialize a tri-state field: absent (via `#[serde(default)]`) yields
/// `None`, an explicit `null` yields `Some(None)`, and a value yields
/// `Some(Some(value))`.
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}

/// Shallow reference to a related unit, used for parent/child projections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct UnitRef {
    pub unit_id: i32,
    pub unit_name: String,
    pub unit_code: String,
}

/// A unit row as stored, without relationship projections. Returned by
/// create and update.
#[derive(Debug, Serialize, ToSchema)]
pub struct UnitResponse {
    pub unit_id: i32,
    pub unit_code: String,
    pub unit_name: String,
    pub unit_type: String,
    pub parent_unit_id: Option<i32>,
    pub created_at: String,
}

/// A unit annotated with one level of parent/child context. Returned by
/// list and get.
#[derive(Debug, Serialize, ToSchema)]
pub struct UnitDetailResponse {
    pub unit_id: i32,
    pub unit_code: String,
    pub unit_name: String,
    pub unit_type: String,
    pub parent_unit_id: Option<i32>,
    pub created_at: String,
    #[serde(rename = "parentUnit")]
    pub parent_unit: Option<UnitRef>,
    #[serde(rename = "childUnits")]
    pub child_units: Vec<UnitRef>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUnitRequest {
    pub unit_code: Option<String>,
    pub unit_name: Option<String>,
    pub unit_type: Option<String>,
    pub parent_unit_id: Option<i32>,
}

/// Partial update. Absent fields are left unchanged; `parent_unit_id`
/// distinguishes absent (keep) from explicit null (detach).
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateUnitRequest {
    pub unit_code: Option<String>,
    pub unit_name: Option<String>,
    pub unit_type: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub parent_unit_id: Option<Option<i32>>,
}

/// Message body used for deletes and unit errors.
#[derive(Debug, Serialize, ToSchema)]
pub struct UnitMessage {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_request_distinguishes_absent_from_null() {
        let absent: UpdateUnitRequest = serde_json::from_str(r#"{"unit_name":"New"}"#).unwrap();
        assert_eq!(absent.parent_unit_id, None);

        let detach: UpdateUnitRequest =
            serde_json::from_str(r#"{"parent_unit_id":null}"#).unwrap();
        assert_eq!(detach.parent_unit_id, Some(None));

        let reparent: UpdateUnitRequest =
            serde_json::from_str(r#"{"parent_unit_id":5}"#).unwrap();
        assert_eq!(reparent.parent_unit_id, Some(Some(5)));
    }

    #[test]
    fn detail_serializes_relation_keys() {
        let detail = UnitDetailResponse {
            unit_id: 1,
            unit_code: "ENG".to_string(),
            unit_name: "Engineering".to_string(),
            unit_type: "college".to_string(),
            parent_unit_id: None,
            created_at: "2026-01-01T00:00:00Z".to_string(),
            parent_unit: None,
            child_units: Vec::new(),
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert!(json.get("parentUnit").is_some());
        assert!(json.get("childUnits").is_some());
        assert_eq!(json["parentUnit"], serde_json::Value::Null);
    }
}
