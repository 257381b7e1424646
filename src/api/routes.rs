//! Game API route handlers.
//!
//! All endpoints return JSON. Handlers are thin: they unpack the request,
//! call into the registry, and map [`GameError`] to a status code.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::engine::registry::GameRegistry;
use crate::engine::view::GameView;
use crate::types::{ActionRequest, GameCode, GameError, PlayerId};

pub type AppState = Arc<GameRegistry>;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CreateGameRequest {
    pub game_code: String,
    #[serde(default)]
    pub host_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JoinGameRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitActionRequest {
    /// Empty when absent, which no seated player matches.
    #[serde(default)]
    pub player_id: PlayerId,
    #[serde(flatten)]
    pub action: ActionRequest,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StateQuery {
    pub player_id: Option<PlayerId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatResponse {
    pub game_id: GameCode,
    pub player_id: PlayerId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<bool>,
}

impl OkResponse {
    fn ok() -> Json<Self> {
        Json(Self {
            ok: true,
            resolved: None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// A [`GameError`] on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub GameError);

impl From<GameError> for ApiError {
    fn from(e: GameError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            GameError::GameNotFound => StatusCode::NOT_FOUND,
            GameError::NoItems => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };
        let body = ErrorBody {
            error: self.0.code().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// POST /api/game
pub async fn create_game(
    State(registry): State<AppState>,
    Json(req): Json<CreateGameRequest>,
) -> ApiResult<(StatusCode, Json<SeatResponse>)> {
    let (game_id, host) = registry
        .create(&req.game_code, &req.host_name)
        .await
        .inspect_err(|e| warn!(code = %req.game_code, error = %e, "Create rejected"))?;
    Ok((
        StatusCode::CREATED,
        Json(SeatResponse {
            game_id,
            player_id: host.id,
        }),
    ))
}

/// POST /api/game/:code/join
pub async fn join_game(
    State(registry): State<AppState>,
    Path(code): Path<String>,
    Json(req): Json<JoinGameRequest>,
) -> ApiResult<Json<SeatResponse>> {
    let (game_id, player) = registry.join(&code, &req.name).await?;
    Ok(Json(SeatResponse {
        game_id,
        player_id: player.id,
    }))
}

/// GET /api/game/:code/state?player_id=
pub async fn get_state(
    State(registry): State<AppState>,
    Path(code): Path<String>,
    Query(query): Query<StateQuery>,
) -> ApiResult<Json<GameView>> {
    let view = registry.view(&code, query.player_id.as_deref()).await?;
    Ok(Json(view))
}

/// POST /api/game/:code/action
pub async fn submit_action(
    State(registry): State<AppState>,
    Path(code): Path<String>,
    Json(req): Json<SubmitActionRequest>,
) -> ApiResult<Json<OkResponse>> {
    let resolved = registry
        .submit_action(&code, &req.player_id, req.action)
        .await?;
    Ok(Json(OkResponse {
        ok: true,
        resolved: Some(resolved),
    }))
}

/// POST /api/game/:code/advance
pub async fn advance(
    State(registry): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Json<OkResponse>> {
    registry.host_advance(&code).await?;
    Ok(OkResponse::ok())
}

/// POST /api/game/:code/resolve
pub async fn force_resolve(
    State(registry): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Json<OkResponse>> {
    registry.force_resolve(&code).await?;
    Ok(OkResponse::ok())
}

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
