// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Reservation HTTP handlers.
//!
//! Every route here sits behind the token gate. Updates and deletes also go
//! through [`authorize_mutation`]: admins pass unconditionally, everyone else
//! must own the record by email or uid. A missing record is reported to a
//! non-admin exactly like someone else's record.

use axum::{
	extract::{Path, State},
	http::StatusCode,
	Json,
};
use cuca_reservations_core::{NewReservation, Reservation, ReservationPatch};
use cuca_server_auth::{authorize_mutation, Principal};
use cuca_server_db::ReservationRepository;
use cuca_server_identity::{IdentityError, IdentityProvider};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
	api::AppState,
	auth_middleware::RequireAuth,
	error::{ErrorResponse, ServerError},
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReservationListResponse {
	pub reservations: Vec<Reservation>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteReservationResponse {
	pub success: bool,
	pub message: String,
}

/// Reservations owned by `uid`.
///
/// Looks up `userId` first. Records created before ownership was stamped
/// only carry an email, so when nothing matches the uid the provider's email
/// for that account is tried instead.
pub async fn find_owned_reservations(
	repo: &ReservationRepository,
	identity: &dyn IdentityProvider,
	uid: &str,
) -> Result<Vec<Reservation>, ServerError> {
	let by_uid = repo.list_by_user_id(uid).await?;
	if !by_uid.is_empty() {
		return Ok(by_uid);
	}

	match identity.get_user(uid).await {
		Ok(user) if !user.email.is_empty() => Ok(repo.list_by_email(&user.email).await?),
		Ok(_) | Err(IdentityError::UserNotFound) => Ok(Vec::new()),
		Err(e) => Err(e.into()),
	}
}

#[utoipa::path(
    get,
    path = "/api/reservations",
    responses(
        (status = 200, description = "All reservations", body = ReservationListResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    tag = "reservations"
)]
/// GET /api/reservations - List every reservation.
pub async fn list_reservations(
	State(state): State<AppState>,
	RequireAuth(_principal): RequireAuth,
) -> Result<Json<ReservationListResponse>, ServerError> {
	let reservations = state.reservations.list_all().await?;
	Ok(Json(ReservationListResponse { reservations }))
}

#[utoipa::path(
    get,
    path = "/api/reservations/my",
    responses(
        (status = 200, description = "Reservations owned by the caller", body = ReservationListResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    tag = "reservations"
)]
/// GET /api/reservations/my - List the caller's reservations.
#[tracing::instrument(skip_all, fields(uid = %principal.uid))]
pub async fn my_reservations(
	State(state): State<AppState>,
	RequireAuth(principal): RequireAuth,
) -> Result<Json<ReservationListResponse>, ServerError> {
	let reservations =
		find_owned_reservations(&state.reservations, state.identity.as_ref(), &principal.uid)
			.await?;
	Ok(Json(ReservationListResponse { reservations }))
}

#[utoipa::path(
    post,
    path = "/api/reservations",
    request_body = NewReservation,
    responses(
        (status = 201, description = "Reservation created", body = Reservation),
        (status = 400, description = "Invalid reservation", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Requested id belongs to someone else", body = ErrorResponse)
    ),
    tag = "reservations"
)]
/// POST /api/reservations - Create a reservation owned by the caller.
///
/// A requested `id` that already exists is an overwrite and goes through the
/// same ownership check as an update.
#[tracing::instrument(skip_all, fields(uid = %principal.uid))]
pub async fn create_reservation(
	State(state): State<AppState>,
	RequireAuth(principal): RequireAuth,
	Json(mut body): Json<NewReservation>,
) -> Result<(StatusCode, Json<Reservation>), ServerError> {
	body.user_id = Some(principal.uid.clone());
	if body.email.as_deref().map_or(true, |e| e.trim().is_empty()) {
		body.email = principal.email.clone();
	}

	if let Some(id) = body.id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
		if let Some(existing) = state.reservations.get(id).await? {
			check_mutation(&principal, id, Some(&existing))?;
		}
	}

	let reservation = state.reservations.create(body).await?;
	Ok((StatusCode::CREATED, Json(reservation)))
}

#[utoipa::path(
    put,
    path = "/api/reservations/{id}",
    params(("id" = String, Path, description = "Reservation id")),
    request_body = ReservationPatch,
    responses(
        (status = 200, description = "Updated reservation", body = Reservation),
        (status = 400, description = "Invalid update", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "No such reservation (admins only)", body = ErrorResponse)
    ),
    tag = "reservations"
)]
/// PUT /api/reservations/{id} - Apply a partial update.
#[tracing::instrument(skip_all, fields(uid = %principal.uid, reservation_id = %id))]
pub async fn update_reservation(
	State(state): State<AppState>,
	RequireAuth(principal): RequireAuth,
	Path(id): Path<String>,
	Json(patch): Json<ReservationPatch>,
) -> Result<Json<Reservation>, ServerError> {
	authorize(&state.reservations, &principal, &id).await?;
	let updated = state.reservations.update(&id, &patch).await?;
	Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/reservations/{id}",
    params(("id" = String, Path, description = "Reservation id")),
    responses(
        (status = 200, description = "Reservation deleted", body = DeleteReservationResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse)
    ),
    tag = "reservations"
)]
/// DELETE /api/reservations/{id} - Remove a reservation.
#[tracing::instrument(skip_all, fields(uid = %principal.uid, reservation_id = %id))]
pub async fn delete_reservation(
	State(state): State<AppState>,
	RequireAuth(principal): RequireAuth,
	Path(id): Path<String>,
) -> Result<Json<DeleteReservationResponse>, ServerError> {
	authorize(&state.reservations, &principal, &id).await?;
	state.reservations.delete(&id).await?;
	Ok(Json(DeleteReservationResponse {
		success: true,
		message: "Reservation deleted".to_string(),
	}))
}

/// Admins skip the lookup; the store decides what happens to a missing id.
async fn authorize(
	repo: &ReservationRepository,
	principal: &Principal,
	id: &str,
) -> Result<(), ServerError> {
	let existing = if principal.admin {
		None
	} else {
		repo.get(id).await?
	};

	check_mutation(principal, id, existing.as_ref())
}

fn check_mutation(
	principal: &Principal,
	id: &str,
	existing: Option<&Reservation>,
) -> Result<(), ServerError> {
	authorize_mutation(principal, existing).map_err(|e| {
		tracing::warn!(uid = %principal.uid, reservation_id = %id, "reservation access denied");
		ServerError::from(e)
	})
}
