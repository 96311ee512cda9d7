use axum::{
    extract::State,
    routing::{post, MethodRouter},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{hash_password, CurrentUser},
    error::ApiError,
    extract::{ValidJson, ValidQuery},
    state::AppState,
    users::{
        dto::{
            DeleteUserResponse, ShowUser, UpdateUserRequest, UpdatedUserResponse, UserCreate,
            UserIdQuery,
        },
        repo::StoreError,
        repo_types::{User, UserChanges},
        services::{validate_changes, validate_create},
    },
};

pub fn user_routes() -> Router<AppState> {
    let methods: MethodRouter<AppState> = post(create_user)
        .get(get_user_by_id)
        .patch(update_user_by_id)
        .delete(delete_user);
    Router::new()
        .route("/user/", methods.clone())
        .route("/user", methods)
}

fn unavailable(e: StoreError) -> ApiError {
    error!(error = %e, constraint = e.constraint(), "database error");
    ApiError::ServiceUnavailable(format!("Database error: {e}"))
}

fn not_found(user_id: uuid::Uuid) -> ApiError {
    ApiError::NotFound(format!("User with id {user_id} not found."))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<UserCreate>,
) -> Result<Json<ShowUser>, ApiError> {
    if let Err(e) = validate_create(&payload) {
        warn!(error = %e, "invalid create payload");
        return Err(e);
    }

    let hashed = hash_password(&payload.password).map_err(|e| {
        error!(error = %e, "hash_password failed");
        ApiError::Internal(e.to_string())
    })?;

    let user = User::new(payload.name, payload.surname, payload.email, hashed);
    let user = state.users.insert(user).await.map_err(unavailable)?;

    info!(user_id = %user.user_id, email = %user.email, "user created");
    Ok(Json(ShowUser::from(user)))
}

#[instrument(skip(state, caller), fields(caller = %caller.0.user_id))]
pub async fn get_user_by_id(
    State(state): State<AppState>,
    caller: CurrentUser,
    ValidQuery(q): ValidQuery<UserIdQuery>,
) -> Result<Json<ShowUser>, ApiError> {
    match state.users.get_by_id(q.user_id).await.map_err(unavailable)? {
        Some(user) => Ok(Json(ShowUser::from(user))),
        None => {
            warn!(user_id = %q.user_id, "user not found");
            Err(not_found(q.user_id))
        }
    }
}

#[instrument(skip(state, caller, payload), fields(caller = %caller.0.user_id))]
pub async fn update_user_by_id(
    State(state): State<AppState>,
    caller: CurrentUser,
    ValidQuery(q): ValidQuery<UserIdQuery>,
    ValidJson(payload): ValidJson<UpdateUserRequest>,
) -> Result<Json<UpdatedUserResponse>, ApiError> {
    let changes = UserChanges::from(payload);
    if let Err(e) = validate_changes(&changes) {
        warn!(error = %e, user_id = %q.user_id, "invalid update payload");
        return Err(e);
    }

    if state
        .users
        .get_by_id(q.user_id)
        .await
        .map_err(unavailable)?
        .is_none()
    {
        warn!(user_id = %q.user_id, "user not found");
        return Err(not_found(q.user_id));
    }

    let updated_user_id = state
        .users
        .update(q.user_id, &changes)
        .await
        .map_err(unavailable)?
        .ok_or_else(|| not_found(q.user_id))?;

    info!(user_id = %updated_user_id, "user updated");
    Ok(Json(UpdatedUserResponse { updated_user_id }))
}

#[instrument(skip(state, caller), fields(caller = %caller.0.user_id))]
pub async fn delete_user(
    State(state): State<AppState>,
    caller: CurrentUser,
    ValidQuery(q): ValidQuery<UserIdQuery>,
) -> Result<Json<DeleteUserResponse>, ApiError> {
    match state.users.delete(q.user_id).await.map_err(unavailable)? {
        Some(deleted_user_id) => {
            info!(user_id = %deleted_user_id, "user deleted");
            Ok(Json(DeleteUserResponse { deleted_user_id }))
        }
        None => {
            warn!(user_id = %q.user_id, "user not found");
            Err(not_found(q.user_id))
        }
    }
}
