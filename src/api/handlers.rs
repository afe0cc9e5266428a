use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Json, Response};
use chrono::{SecondsFormat, Utc};

use crate::core::{validate_cookie_text, validate_for_save};
use crate::error::WebUiError;
use crate::models::{
    ConfigResponse, ErrorResponse, HealthResponse, SaveConfigRequest, SuccessResponse,
    TestCookiesRequest,
};
use crate::storage::ConfigStore;

const LOAD_FAILED: &str = "Failed to load configuration";
const SAVE_FAILED: &str = "Failed to save configuration";
const INTERNAL_ERROR: &str = "Internal server error";

/// 单个 Web UI 实例的共享状态
pub struct WebUiState {
    pub store: ConfigStore,
    pub assets_dir: PathBuf,
}

/// 共享状态类型
pub type AppState = Arc<WebUiState>;

// ---- WebUiError -> HTTP Response ----

/// 带有路由专属兜底消息的错误。500 只返回兜底消息，细节写日志
#[derive(Debug)]
pub struct ApiError {
    source: WebUiError,
    generic: &'static str,
}

impl WebUiError {
    pub fn with_generic(self, generic: &'static str) -> ApiError {
        ApiError {
            source: self,
            generic,
        }
    }
}

impl From<WebUiError> for ApiError {
    fn from(source: WebUiError) -> Self {
        source.with_generic(INTERNAL_ERROR)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        WebUiError::BadRequest(rejection.body_text()).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.source {
            WebUiError::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            WebUiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            WebUiError::PageMissing(path) => {
                tracing::error!("页面文件缺失: {}", path.display());
                (StatusCode::NOT_FOUND, "Page not found".to_string())
            }
            other => {
                tracing::error!("{}: {}", self.generic, other);
                (StatusCode::INTERNAL_SERVER_ERROR, self.generic.to_string())
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

// ---- 处理器 ----

/// 302 Found 跳转
fn found(location: &'static str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

/// GET /
pub async fn index(State(state): State<AppState>) -> Response {
    if state.store.exists_and_load().await.is_some() {
        found("/settings")
    } else {
        found("/setup")
    }
}

/// GET /setup
pub async fn setup_page(State(state): State<AppState>) -> Result<Html<Vec<u8>>, ApiError> {
    serve_page(&state.assets_dir.join("setup.html")).await
}

/// GET /settings
pub async fn settings_page(State(state): State<AppState>) -> Result<Response, ApiError> {
    if state.store.exists_and_load().await.is_none() {
        return Ok(found("/setup"));
    }
    Ok(serve_page(&state.assets_dir.join("settings.html"))
        .await?
        .into_response())
}

/// GET /api/config
pub async fn get_config(State(state): State<AppState>) -> Result<Json<ConfigResponse>, ApiError> {
    if let Some(config) = state.store.exists_and_load().await {
        return Ok(Json(ConfigResponse {
            config,
            exists: true,
        }));
    }

    let config = state
        .store
        .load_default()
        .await
        .map_err(|e| e.with_generic(LOAD_FAILED))?;
    Ok(Json(ConfigResponse {
        config,
        exists: false,
    }))
}

/// POST /api/config
pub async fn save_config(
    State(state): State<AppState>,
    payload: Result<Json<SaveConfigRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let Json(SaveConfigRequest { config }) = payload?;

    validate_for_save(&config).map_err(WebUiError::from)?;

    state
        .store
        .save(&config)
        .await
        .map_err(|e| e.with_generic(SAVE_FAILED))?;

    tracing::info!(
        "配置已保存: {} 个账号, {} 个平台",
        config.account_count(),
        config.platform_count()
    );
    Ok(Json(SuccessResponse::new("Configuration saved successfully!")))
}

/// POST /api/test-cookies
pub async fn test_cookies(
    payload: Result<Json<TestCookiesRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let Json(request) = payload?;
    tracing::debug!(game = %request.game, "检查 cookie 格式");

    validate_cookie_text(&request.cookies).map_err(WebUiError::from)?;

    // 真正的校验要调用 HoYoLAB 接口，交给机器人启动时完成
    Ok(Json(SuccessResponse::new(
        "Cookies format appears valid. Full validation will occur when the bot starts.",
    )))
}

/// POST /api/restart-app，不做任何进程管理
pub async fn restart_app() -> Json<SuccessResponse> {
    Json(SuccessResponse::new(
        "Configuration saved. Please restart the container to apply changes.",
    ))
}

/// GET /api/health，读取镜像，不访问磁盘
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        config_exists: state.store.mirror_exists(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        web_ui_enabled: true,
    })
}

async fn serve_page(path: &Path) -> Result<Html<Vec<u8>>, ApiError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Html(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(WebUiError::PageMissing(path.to_path_buf()).into())
        }
        Err(e) => Err(WebUiError::Io(e).into()),
    }
}
