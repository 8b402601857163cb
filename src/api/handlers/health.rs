//! Public health-check endpoints and the static patient roster.

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::dto::MessageResponse;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status (always "ok" when responding)
    #[schema(example = "ok")]
    pub status: String,
    pub version: String,
}

/// Health check endpoint
///
/// Returns 200 OK when the API server is operational. Unauthenticated.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_handler() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse { status: "ok".to_string(), version: crate::VERSION.to_string() }),
    )
}

/// Liveness check kept for existing frontends.
#[utoipa::path(
    get,
    path = "/api/test",
    tag = "health",
    responses((status = 200, description = "Backend is reachable", body = MessageResponse))
)]
pub async fn api_test_handler() -> Json<MessageResponse> {
    Json(MessageResponse { message: "Backend is working!".to_string() })
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientSummary {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub condition: String,
    pub status: String,
    pub last_visit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientStats {
    pub total_patients: u32,
    pub appointments_today: u32,
    pub pending_reports: u32,
    pub average_wait_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PatientRosterResponse {
    pub patients: Vec<PatientSummary>,
    pub stats: PatientStats,
}

fn patient(id: &str, name: &str, age: u32, condition: &str, status: &str, last_visit: &str) -> PatientSummary {
    PatientSummary {
        id: id.to_string(),
        name: name.to_string(),
        age,
        condition: condition.to_string(),
        status: status.to_string(),
        last_visit: last_visit.to_string(),
    }
}

/// Fixed sample roster for dashboard development. Nothing here is persisted.
#[utoipa::path(
    get,
    path = "/api/patients",
    tag = "patients",
    responses((status = 200, description = "Sample patient roster", body = PatientRosterResponse))
)]
pub async fn patients_handler() -> Json<PatientRosterResponse> {
    Json(PatientRosterResponse {
        patients: vec![
            patient("P001", "Luffy", 19, "Regular Checkup", "Scheduled", "2024-04-05"),
            patient("P002", "Zoro", 21, "Cardiac Monitoring", "In Treatment", "2024-04-04"),
            patient("P003", "Nami", 20, "Regular Checkup", "Regular", "2024-04-03"),
            patient("P004", "Sanji", 21, "Regular Checkup", "Scheduled", "2024-04-02"),
        ],
        stats: PatientStats {
            total_patients: 1284,
            appointments_today: 45,
            pending_reports: 15,
            average_wait_time: "18 min".to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_handler_returns_ok() {
        let (status, Json(response)) = health_handler().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response.status, "ok");
        assert_eq!(response.version, crate::VERSION);
    }

    #[tokio::test]
    async fn roster_is_the_fixed_sample() {
        let Json(roster) = patients_handler().await;
        let names: Vec<_> = roster.patients.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Luffy", "Zoro", "Nami", "Sanji"]);
        assert_eq!(roster.stats.total_patients, 1284);

        let json = serde_json::to_value(&roster).unwrap();
        assert_eq!(json["patients"][1]["lastVisit"], "2024-04-04");
        assert_eq!(json["stats"]["averageWaitTime"], "18 min");
    }
}
