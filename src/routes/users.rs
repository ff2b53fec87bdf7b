use axum::{
    async_trait,
    body::Bytes,
    extract::{rejection::BytesRejection, FromRequestParts, Path, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Json},
};

use crate::{
    dto::user_dto::{
        CreateUserPayload, MessageResponse, UpdateUserPayload, UserListResponse, UserResponse,
    },
    error::{Error, Result},
    routes::route_not_found,
    utils::json::parse_object,
    AppState,
};

/// Body extraction failures (e.g. over the size limit) are deferred to the
/// handler so they surface as `Error::Body` in the usual JSON shape.
type RawBody = std::result::Result<Bytes, BytesRejection>;

/// The `{id}` segment of `/users/{id}/`. Only unsigned decimal integers
/// match; anything else is treated as an unknown route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub i64);

impl UserId {
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        raw.parse().ok().map(UserId)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| route_not_found())?;
        UserId::parse(&raw).ok_or_else(route_not_found)
    }
}

#[axum::debug_handler]
pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let users = state.user_service.list().await?;
    Ok(Json(UserListResponse::from(users)))
}

#[axum::debug_handler]
pub async fn create_user(
    State(state): State<AppState>,
    body: RawBody,
) -> Result<impl IntoResponse> {
    let body = body?;
    let payload = CreateUserPayload::from_object(parse_object(&body)?)?;
    let user = state.user_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

#[axum::debug_handler]
pub async fn get_user(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> Result<impl IntoResponse> {
    let user = state.user_service.get_by_id(id).await?;
    Ok(Json(UserResponse::from(user)))
}

#[axum::debug_handler]
pub async fn update_user(
    State(state): State<AppState>,
    UserId(id): UserId,
    body: RawBody,
) -> Result<impl IntoResponse> {
    // Unknown ids win over malformed bodies.
    state.user_service.get_by_id(id).await?;
    let body = body?;
    let changes = UpdateUserPayload::from_object(parse_object(&body)?)?;
    let user = state.user_service.update(id, changes).await?;
    Ok(Json(UserResponse::from(user)))
}

#[axum::debug_handler]
pub async fn delete_user(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> Result<impl IntoResponse> {
    state.user_service.delete(id).await?;
    Ok(Json(MessageResponse {
        message: "User deleted".to_string(),
    }))
}
