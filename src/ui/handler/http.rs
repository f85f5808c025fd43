//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};

use crate::{
    domain::{Email, MessageId, UserId},
    infrastructure::dto::http::{
        CreateMessageRequest, DeleteMessageQuery, MessageResponse, UpdateMessageRequest,
    },
    infrastructure::dto::websocket::RosterClientDto,
    ui::auth::require_bearer,
    ui::state::AppState,
    usecase::MessageServiceError,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Debug endpoint to get the current presence roster (for testing purposes)
pub async fn debug_roster(State(state): State<Arc<AppState>>) -> Json<Vec<RosterClientDto>> {
    let roster = state.roster.lock().await;
    Json(
        roster
            .snapshot()
            .into_iter()
            .map(RosterClientDto::from)
            .collect(),
    )
}

/// Create a message (no authentication; unknown embedded users fall back to anonymous)
pub async fn create_message(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), StatusCode> {
    // A malformed embedded user is not worth a 400; the text still gets stored.
    let embedded_user = request.user.and_then(|dto| {
        match (UserId::new(dto.id), Email::new(dto.email)) {
            (Ok(id), Ok(email)) => Some((id, email)),
            _ => {
                tracing::warn!("Malformed embedded user on message create, storing as anonymous");
                None
            }
        }
    });

    match state.message_service.create(request.text, embedded_user).await {
        Ok(message) => Ok((StatusCode::CREATED, Json(MessageResponse::from(message)))),
        Err(MessageServiceError::Validation(e)) => {
            tracing::warn!("Rejected message create: {}", e);
            Err(StatusCode::BAD_REQUEST)
        }
        Err(e) => {
            tracing::error!("Message create failed: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get the full feed, oldest first
pub async fn get_messages(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MessageResponse>>, StatusCode> {
    match state.message_service.find_all().await {
        Ok(feed) => Ok(Json(feed.into_iter().map(MessageResponse::from).collect())),
        Err(e) => {
            tracing::error!("Feed fetch failed: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get a single message by ID
pub async fn get_message(
    State(state): State<Arc<AppState>>,
    Path(message_id): Path<String>,
) -> Result<Json<MessageResponse>, StatusCode> {
    // Non-UUID path segments cannot match any row
    let Ok(message_id) = MessageId::new(message_id) else {
        return Err(StatusCode::NOT_FOUND);
    };

    match state.message_service.find_one(&message_id).await {
        Ok(message) => Ok(Json(MessageResponse::from(message))),
        Err(MessageServiceError::NotFound(_)) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Message fetch failed: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Update a message body (requires bearer token)
pub async fn update_message(
    State(state): State<Arc<AppState>>,
    Path(message_id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<UpdateMessageRequest>,
) -> Result<Json<MessageResponse>, StatusCode> {
    require_bearer(&headers, state.api_token.as_deref())?;

    let Ok(message_id) = MessageId::new(message_id) else {
        return Err(StatusCode::NOT_FOUND);
    };

    match state.message_service.update(&message_id, request.text).await {
        Ok(message) => Ok(Json(MessageResponse::from(message))),
        Err(MessageServiceError::Validation(e)) => {
            tracing::warn!("Rejected message update: {}", e);
            Err(StatusCode::BAD_REQUEST)
        }
        Err(MessageServiceError::NotFound(_)) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Message update failed: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Delete a message (requires bearer token); `?soft=true` keeps the row
pub async fn delete_message(
    State(state): State<Arc<AppState>>,
    Path(message_id): Path<String>,
    Query(query): Query<DeleteMessageQuery>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    require_bearer(&headers, state.api_token.as_deref())?;

    let Ok(message_id) = MessageId::new(message_id) else {
        return Err(StatusCode::NOT_FOUND);
    };

    let result = if query.soft {
        state
            .message_service
            .soft_delete(&message_id)
            .await
            .map(|_| ())
    } else {
        state.message_service.hard_delete(&message_id).await
    };

    match result {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(MessageServiceError::NotFound(_)) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Message delete failed: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
