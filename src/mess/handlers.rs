// Mess handlers

use axum::{extract::Path, http::StatusCode, Extension, Json};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::auth::extractors::AuthedUser;
use crate::common::error::ApiError;
use crate::common::state::AppState;
use crate::mess::models::{CreateMessInput, Mess, MessListResponse};
use crate::mess::validators::{validate_description, validate_mess_name};
use crate::sequence::MESS_ID_KEY;

/// POST /api/mess - Create a mess with the next `messId`
///
/// The id is allocated before the insert. If the insert fails the id is
/// not reused.
pub async fn create_mess(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(input): Json<CreateMessInput>,
) -> Result<(StatusCode, Json<Mess>), ApiError> {
    validate_mess_name(&input.name)?;
    validate_description(input.description.as_deref())?;

    let state = state_lock.read().await.clone();
    let mess_id = state.sequences.next_sequence(MESS_ID_KEY).await?;

    let mess = Mess {
        mess_id,
        name: input.name.trim().to_string(),
        description: input
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
        owner_id: authed.id,
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    sqlx::query(
        "INSERT INTO messes (mess_id, name, description, owner_id, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(mess.mess_id)
    .bind(&mess.name)
    .bind(mess.description.as_deref())
    .bind(mess.owner_id)
    .bind(&mess.created_at)
    .execute(&state.db)
    .await
    .map_err(|e| {
        error!(
            error = %e,
            mess_id = mess_id,
            owner_id = authed.id,
            "Database error inserting mess, allocated mess_id is burned"
        );
        ApiError::DatabaseError(e)
    })?;

    info!(mess_id = mess_id, owner_id = authed.id, "Mess created");

    Ok((StatusCode::CREATED, Json(mess)))
}

/// GET /api/mess - List all messes in id order
pub async fn list_messes(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Result<Json<MessListResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let messes = sqlx::query_as::<_, Mess>("SELECT * FROM messes ORDER BY mess_id ASC")
        .fetch_all(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    let total = messes.len();
    Ok(Json(MessListResponse { messes, total }))
}

/// GET /api/mess/mine - List messes owned by the current user
pub async fn list_my_messes(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<MessListResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let messes = sqlx::query_as::<_, Mess>(
        "SELECT * FROM messes WHERE owner_id = ? ORDER BY mess_id ASC",
    )
    .bind(authed.id)
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let total = messes.len();
    Ok(Json(MessListResponse { messes, total }))
}

/// GET /api/mess/:mess_id
pub async fn get_mess(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Path(mess_id): Path<i64>,
) -> Result<Json<Mess>, ApiError> {
    let state = state_lock.read().await.clone();

    sqlx::query_as::<_, Mess>("SELECT * FROM messes WHERE mess_id = ?")
        .bind(mess_id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("mess {} not found", mess_id)))
}
