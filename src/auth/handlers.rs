//! Authentication handlers

use axum::extract::{Extension, Json};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use super::extractors::AuthedUser;
use super::models::{Claims, GoogleIdTokenPayload, GoogleIdentity, User};
use crate::common::{safe_email_log, ApiError, AppState};
use crate::sequence::USER_ID_KEY;

const GOOGLE_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// POST /api/auth/google
/// Authenticates a user via Google ID token
///
/// # Request Body
/// ```json
/// { "id_token": "<google id token>" }
/// ```
///
/// # Response
/// ```json
/// { "token": "<jwt token>", "user": { ... } }
/// ```
pub async fn google_auth(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(payload): Json<GoogleIdTokenPayload>,
) -> Result<Json<Value>, ApiError> {
    info!("🔐 Received Google auth request");
    let state = state_lock.read().await.clone();

    let body = fetch_tokeninfo(&state, &payload.id_token).await?;
    let identity = identity_from_tokeninfo(
        &body,
        state.config.google_client_id.as_deref(),
        Utc::now().timestamp(),
    )?;

    debug!(
        email = %safe_email_log(&identity.email),
        provider_id = %identity.sub,
        "Google token validation successful, proceeding with user lookup"
    );

    let user = find_or_create_user(&state, &identity).await?;
    let token = issue_token(&state.config.jwt_secret, user.id)?;

    info!(
        user_id = user.id,
        email = %safe_email_log(&user.email),
        provider = "google",
        "User authentication successful via Google OAuth"
    );

    Ok(Json(serde_json::json!({
        "token": token,
        "user": {
            "id": user.id,
            "email": user.email,
            "name": user.name,
            "avatar": user.avatar,
        },
    })))
}

/// Call Google's tokeninfo endpoint and return its JSON body
async fn fetch_tokeninfo(state: &AppState, id_token: &str) -> Result<Value, ApiError> {
    let resp = state
        .http
        .get(GOOGLE_TOKENINFO_URL)
        .query(&[("id_token", id_token)])
        .send()
        .await
        .map_err(|e| {
            error!(
                error = %e,
                endpoint = GOOGLE_TOKENINFO_URL,
                "HTTP error contacting Google tokeninfo endpoint"
            );
            ApiError::InternalServer("google token validation service unavailable".to_string())
        })?;

    let status = resp.status();
    debug!(http_status = %status, "Received response from Google tokeninfo endpoint");

    match status.as_u16() {
        200..=299 => resp.json::<Value>().await.map_err(|e| {
            error!(error = %e, "Failed to parse Google tokeninfo JSON response");
            ApiError::BadRequest("malformed id_token".to_string())
        }),
        401 => {
            warn!(http_status = %status, "Google tokeninfo returned 401 - expired or invalid token");
            Err(ApiError::Unauthorized("expired or invalid id_token".to_string()))
        }
        _ => {
            warn!(http_status = %status, "Google tokeninfo rejected the token");
            Err(ApiError::BadRequest("invalid or malformed id_token".to_string()))
        }
    }
}

/// Validate a tokeninfo body: required fields, expiry and (when configured) audience
pub fn identity_from_tokeninfo(
    body: &Value,
    client_id: Option<&str>,
    now: i64,
) -> Result<GoogleIdentity, ApiError> {
    let field = |name: &str| body.get(name).and_then(|v| v.as_str()).map(str::to_string);

    let (email, sub) = match (field("email"), field("sub")) {
        (Some(email), Some(sub)) => (email, sub),
        (email, sub) => {
            warn!(
                has_email = email.is_some(),
                has_sub = sub.is_some(),
                "Google token missing required fields (email/sub)"
            );
            return Err(ApiError::BadRequest(
                "token missing required fields".to_string(),
            ));
        }
    };

    // tokeninfo encodes numbers as strings
    let exp = body.get("exp").and_then(|v| {
        v.as_i64()
            .or_else(|| v.as_str().and_then(|s| s.parse::<i64>().ok()))
    });
    if let Some(exp) = exp {
        if exp < now {
            warn!(token_exp = exp, current_time = now, "Google token has expired");
            return Err(ApiError::Unauthorized("token has expired".to_string()));
        }
    }

    if let Some(client_id) = client_id {
        match body.get("aud").and_then(|v| v.as_str()) {
            Some(aud) if aud == client_id => {}
            Some(aud) => {
                warn!(
                    token_audience = %aud,
                    expected_client_id = %client_id,
                    "Google token audience validation failed - rejecting token"
                );
                return Err(ApiError::Unauthorized("token audience mismatch".to_string()));
            }
            None => {
                warn!(
                    expected_client_id = %client_id,
                    "Google token missing audience field - rejecting token"
                );
                return Err(ApiError::Unauthorized("token missing audience".to_string()));
            }
        }
    }

    Ok(GoogleIdentity {
        email,
        sub,
        name: field("name"),
        picture: field("picture"),
    })
}

/// Look up the Google user, creating it with the next `userId` when absent
///
/// Two concurrent first logins for the same account both allocate an id; the
/// losing insert is ignored and its id stays unused. An email already owned
/// by a different Google account is rejected with `Conflict`.
pub async fn find_or_create_user(
    state: &AppState,
    identity: &GoogleIdentity,
) -> Result<User, ApiError> {
    let existing = sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE provider = ? AND provider_id = ?",
    )
    .bind("google")
    .bind(&identity.sub)
    .fetch_optional(&state.db)
    .await
    .map_err(|e| {
        error!(
            error = %e,
            provider_id = %identity.sub,
            "Database error checking existing user during OAuth flow"
        );
        ApiError::DatabaseError(e)
    })?;

    if let Some(user) = existing {
        debug!(user_id = user.id, "Found existing user in database");
        return Ok(user);
    }

    let id = state.sequences.next_sequence(USER_ID_KEY).await?;
    info!(
        user_id = id,
        email = %safe_email_log(&identity.email),
        provider = "google",
        "Creating new user account via Google OAuth"
    );

    sqlx::query(
        "INSERT OR IGNORE INTO users (id, email, name, avatar, provider, provider_id) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(&identity.email)
    .bind(identity.name.as_deref())
    .bind(identity.picture.as_deref())
    .bind("google")
    .bind(&identity.sub)
    .execute(&state.db)
    .await
    .map_err(|e| {
        error!(
            error = %e,
            user_id = id,
            "Database error inserting new user during OAuth flow"
        );
        ApiError::DatabaseError(e)
    })?;

    let user = sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE provider = ? AND provider_id = ?",
    )
    .bind("google")
    .bind(&identity.sub)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| {
        warn!(
            allocated_id = id,
            email = %safe_email_log(&identity.email),
            provider_id = %identity.sub,
            "Email already linked to another account, rejecting login"
        );
        ApiError::Conflict("email is already linked to another account".to_string())
    })?;

    if user.id != id {
        warn!(
            allocated_id = id,
            user_id = user.id,
            "User created concurrently, allocated id left unused"
        );
    }

    Ok(user)
}

/// Sign a 24h HS256 JWT for `user_id`
pub fn issue_token(secret: &str, user_id: i64) -> Result<String, ApiError> {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (Utc::now() + Duration::hours(24)).timestamp() as usize,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        error!(error = %e, user_id = user_id, "JWT encoding error during authentication");
        ApiError::InternalServer("jwt error".to_string())
    })
}

/// GET /api/me
/// Returns the current authenticated user's information
pub async fn me_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let user = if state.config.dev_mode.is_enabled() {
        state.config.dev_mode.create_dev_user()
    } else {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(authed.id)
            .fetch_optional(&state.db)
            .await?
            .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?
    };

    Ok(Json(serde_json::json!({ "user": user })))
}

/// POST /api/auth/logout
/// Tokens are stateless; the client discards its copy
pub async fn logout_handler(authed: AuthedUser) -> Result<Json<Value>, ApiError> {
    info!(
        user_id = authed.id,
        email = %safe_email_log(&authed.email),
        "User logged out"
    );
    Ok(Json(serde_json::json!({ "message": "Logged out" })))
}
