// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! OpenAPI documentation for cuca-server, generated from Rust types using
//! utoipa. The raw JSON is served at `/api/openapi.json`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cuca Booking API",
        version = "1.0.0",
        description = "Accounts, sessions and reservations for the Cuca booking site.",
        license(name = "Proprietary")
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    tags(
        (name = "general", description = "Welcome and gate check"),
        (name = "auth", description = "Registration, login, logout and profile"),
        (name = "reservations", description = "Reservation CRUD with ownership checks"),
        (name = "health", description = "Health checks")
    ),
    paths(
        crate::routes::index::welcome,
        crate::routes::index::protected,
        crate::routes::auth::status,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::get_me,
        crate::routes::auth::update_me,
        crate::routes::reservations::list_reservations,
        crate::routes::reservations::my_reservations,
        crate::routes::reservations::create_reservation,
        crate::routes::reservations::update_reservation,
        crate::routes::reservations::delete_reservation,
        crate::routes::health::health_check,
    ),
    components(
        schemas(
            crate::error::ErrorResponse,
            crate::routes::index::WelcomeResponse,
            crate::routes::index::ProtectedResponse,
            crate::routes::auth::CredentialsRequest,
            crate::routes::auth::RegisterResponse,
            crate::routes::auth::LoginUser,
            crate::routes::auth::LoginResponse,
            crate::routes::auth::LogoutResponse,
            crate::routes::auth::ProfileResponse,
            crate::routes::reservations::ReservationListResponse,
            crate::routes::reservations::DeleteReservationResponse,
            crate::routes::health::HealthResponse,
            crate::routes::health::DatabaseHealth,
            crate::routes::health::HealthStatus,
            cuca_server_auth::Principal,
            cuca_server_auth::AuthMethod,
            cuca_server_auth::AuthStatus,
            cuca_server_auth::StatusUser,
            cuca_server_identity::UserUpdate,
            cuca_reservations_core::Reservation,
            cuca_reservations_core::NewReservation,
            cuca_reservations_core::ReservationPatch,
            cuca_reservations_core::ReservationStatus,
            cuca_reservations_core::Pets,
        )
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn spec_generates_valid_json() {
		let spec = ApiDoc::openapi();
		let json = serde_json::to_string_pretty(&spec).expect("should serialize to JSON");

		assert!(json.contains("\"openapi\""));
		assert!(json.contains("Cuca Booking API"));
	}

	#[test]
	fn spec_has_documented_paths() {
		let spec = ApiDoc::openapi();
		let json = serde_json::to_string(&spec).expect("should serialize");

		for path in [
			"/api/auth/status",
			"/api/auth/login",
			"/api/reservations",
			"/api/reservations/my",
			"/api/reservations/{id}",
			"/health",
		] {
			assert!(json.contains(path), "Missing path: {path}");
		}
	}

	#[test]
	fn patch_schema_names_wire_fields() {
		let json = serde_json::to_string(&ApiDoc::openapi()).expect("should serialize");
		assert!(json.contains("totalNights"));
		assert!(json.contains("ReservationPatch"));
	}
}
