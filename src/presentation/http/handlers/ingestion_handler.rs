use axum::{
    Json,
    extract::{ConnectInfo, Multipart, Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::application::services::RateLimiter;
use crate::application::services::rate_limiter::UPLOAD_POLICY;
use crate::application::use_cases::{
    CancelIngestionUseCase, GetIngestionStatusUseCase, SubmitFileUseCase, SubmitUrlUseCase,
    submit_file::SubmitFileRequest, submit_url::{SubmitUrlError, SubmitUrlRequest},
};
use crate::presentation::http::dto::{
    ApiResponse, CancelResponseDto, IngestUrlRequestDto, StatusResponseDto, SubmitResponseDto,
};
use crate::presentation::http::handlers::client_key;

pub struct IngestionHandler {
    submit_file_use_case: Arc<SubmitFileUseCase>,
    submit_url_use_case: Arc<SubmitUrlUseCase>,
    get_status_use_case: Arc<GetIngestionStatusUseCase>,
    cancel_use_case: Arc<CancelIngestionUseCase>,
    rate_limiter: Arc<RateLimiter>,
}

impl IngestionHandler {
    pub fn new(
        submit_file_use_case: Arc<SubmitFileUseCase>,
        submit_url_use_case: Arc<SubmitUrlUseCase>,
        get_status_use_case: Arc<GetIngestionStatusUseCase>,
        cancel_use_case: Arc<CancelIngestionUseCase>,
        rate_limiter: Arc<RateLimiter>,
    ) -> Self {
        Self {
            submit_file_use_case,
            submit_url_use_case,
            get_status_use_case,
            cancel_use_case,
            rate_limiter,
        }
    }

    pub async fn upload_file(
        State(handler): State<Arc<IngestionHandler>>,
        ConnectInfo(addr): ConnectInfo<SocketAddr>,
        headers: HeaderMap,
        mut multipart: Multipart,
    ) -> Result<impl IntoResponse, StatusCode> {
        match handler
            .rate_limiter
            .allow("upload", &client_key(&headers, &addr), UPLOAD_POLICY)
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                return Ok((
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(ApiResponse::error(
                        "RATE_LIMITED".to_string(),
                        "You can upload only 1 file per 5 minutes.".to_string(),
                    )),
                ));
            }
            Err(_) => return Err(StatusCode::INTERNAL_SERVER_ERROR),
        }

        let mut file: Option<(String, Vec<u8>)> = None;
        let mut email: Option<String> = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|_| StatusCode::BAD_REQUEST)?
        {
            if field.name() == Some("email") {
                email = field.text().await.ok().filter(|e| !e.trim().is_empty());
                continue;
            }

            if let Some(file_name) = field.file_name() {
                let file_name = file_name.to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|_| StatusCode::BAD_REQUEST)?
                    .to_vec();
                file = Some((file_name, data));
            }
        }

        let Some((file_name, data)) = file else {
            return Ok((
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(
                    "NO_FILE_PROVIDED".to_string(),
                    "No file provided in the request".to_string(),
                )),
            ));
        };

        let request = SubmitFileRequest {
            file_name,
            data,
            email,
        };

        match handler.submit_file_use_case.execute(request).await {
            Ok(response) => {
                let dto = SubmitResponseDto::from(response);
                Ok((StatusCode::ACCEPTED, Json(ApiResponse::success(dto))))
            }
            Err(e) => Ok((
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error("UPLOAD_FAILED".to_string(), e.to_string())),
            )),
        }
    }

    pub async fn ingest_url(
        State(handler): State<Arc<IngestionHandler>>,
        Json(request): Json<IngestUrlRequestDto>,
    ) -> Result<impl IntoResponse, StatusCode> {
        let request = SubmitUrlRequest {
            url: request.url,
            email: request.email,
        };

        match handler.submit_url_use_case.execute(request).await {
            Ok(response) => {
                let dto = SubmitResponseDto::from(response);
                Ok((StatusCode::ACCEPTED, Json(ApiResponse::success(dto))))
            }
            Err(e @ SubmitUrlError::NotScrapable(_)) => Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ApiResponse::error(
                    "URL_NOT_SCRAPABLE".to_string(),
                    e.to_string(),
                )),
            )),
            Err(e) => Ok((
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error("INGEST_FAILED".to_string(), e.to_string())),
            )),
        }
    }

    pub async fn get_status(
        State(handler): State<Arc<IngestionHandler>>,
        Path(file_id): Path<String>,
    ) -> Result<impl IntoResponse, StatusCode> {
        match handler.get_status_use_case.execute(&file_id).await {
            Ok(state) => Ok((
                StatusCode::OK,
                Json(ApiResponse::success(StatusResponseDto::from_state(state))),
            )),
            Err(e) => Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("STATUS_FAILED".to_string(), e.to_string())),
            )),
        }
    }

    pub async fn cancel_ingestion(
        State(handler): State<Arc<IngestionHandler>>,
        Path(file_id): Path<String>,
    ) -> Result<impl IntoResponse, StatusCode> {
        match handler.cancel_use_case.execute(&file_id).await {
            Ok(removed) => Ok((
                StatusCode::OK,
                Json(ApiResponse::success(CancelResponseDto { file_id, removed })),
            )),
            Err(e) => Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("CANCEL_FAILED".to_string(), e.to_string())),
            )),
        }
    }
}
