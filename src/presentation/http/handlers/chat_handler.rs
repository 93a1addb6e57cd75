use axum::{
    Json,
    extract::{ConnectInfo, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::application::services::RateLimiter;
use crate::application::services::rate_limiter::CHAT_POLICY;
use crate::application::use_cases::{
    ChatWithDocumentsUseCase,
    chat_with_documents::{ChatError, ChatRequest},
};
use crate::presentation::http::dto::{ApiResponse, ChatRequestDto, ChatResponseDto};
use crate::presentation::http::handlers::client_key;

pub struct ChatHandler {
    chat_use_case: Arc<ChatWithDocumentsUseCase>,
    rate_limiter: Arc<RateLimiter>,
}

impl ChatHandler {
    pub fn new(chat_use_case: Arc<ChatWithDocumentsUseCase>, rate_limiter: Arc<RateLimiter>) -> Self {
        Self {
            chat_use_case,
            rate_limiter,
        }
    }

    pub async fn chat(
        State(handler): State<Arc<ChatHandler>>,
        ConnectInfo(addr): ConnectInfo<SocketAddr>,
        headers: HeaderMap,
        Json(request): Json<ChatRequestDto>,
    ) -> Result<impl IntoResponse, StatusCode> {
        match handler
            .rate_limiter
            .allow("chat", &client_key(&headers, &addr), CHAT_POLICY)
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                return Ok((
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(ApiResponse::error(
                        "RATE_LIMITED".to_string(),
                        "You can only send 10 messages per minute.".to_string(),
                    )),
                ));
            }
            Err(_) => return Err(StatusCode::INTERNAL_SERVER_ERROR),
        }

        let request = ChatRequest {
            message: request.message,
            file_id: request.file_id,
            email: request.email,
        };

        match handler.chat_use_case.execute(request).await {
            Ok(answer) => Ok((
                StatusCode::OK,
                Json(ApiResponse::success(ChatResponseDto::from(answer))),
            )),
            Err(e @ ChatError::ValidationError(_)) => Ok((
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error("INVALID_REQUEST".to_string(), e.to_string())),
            )),
            Err(e) => Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("CHAT_FAILED".to_string(), e.to_string())),
            )),
        }
    }
}
