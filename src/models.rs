use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 机器人使用的配置文档。账号和平台条目对本服务不透明，其余顶层字段原样保留
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConfigDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accounts: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platforms: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConfigDocument {
    pub fn account_count(&self) -> usize {
        self.accounts.as_ref().map_or(0, Vec::len)
    }

    pub fn platform_count(&self) -> usize {
        self.platforms.as_ref().map_or(0, Vec::len)
    }
}

// ---- 请求体 ----

/// POST /api/config
#[derive(Debug, Deserialize)]
pub struct SaveConfigRequest {
    pub config: ConfigDocument,
}

/// POST /api/test-cookies
///
/// 两个字段都保持为任意 JSON 值：`cookies` 的类型检查交给校验层以便返回具体原因，
/// `game` 只用于日志
#[derive(Debug, Deserialize)]
pub struct TestCookiesRequest {
    #[serde(default)]
    pub cookies: Value,
    #[serde(default)]
    pub game: Value,
}

// ---- 响应体 ----

#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub config: ConfigDocument,
    pub exists: bool,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

impl SuccessResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub config_exists: bool,
    pub timestamp: String,
    #[serde(rename = "webUIEnabled")]
    pub web_ui_enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_preserves_unknown_fields() {
        let raw = json!({
            "accounts": [{"name": "main"}],
            "platforms": ["discord"],
            "schedule": "0 9 * * *",
            "notify": {"enabled": true}
        });
        let doc: ConfigDocument = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(doc.account_count(), 1);
        assert_eq!(doc.platform_count(), 1);
        assert_eq!(doc.extra["schedule"], json!("0 9 * * *"));
        assert_eq!(serde_json::to_value(&doc).unwrap(), raw);
    }

    #[test]
    fn test_document_null_collections_are_absent() {
        let doc: ConfigDocument =
            serde_json::from_value(json!({"accounts": null})).unwrap();
        assert!(doc.accounts.is_none());
        assert!(doc.platforms.is_none());
        assert_eq!(doc.account_count(), 0);
    }

    #[test]
    fn test_health_response_field_names() {
        let body = serde_json::to_value(HealthResponse {
            status: "ok".to_string(),
            config_exists: false,
            timestamp: "2024-01-01T00:00:00.000Z".to_string(),
            web_ui_enabled: true,
        })
        .unwrap();
        assert_eq!(body["configExists"], json!(false));
        assert_eq!(body["webUIEnabled"], json!(true));
    }

    #[test]
    fn test_cookies_request_defaults() {
        let req: TestCookiesRequest = serde_json::from_value(json!({})).unwrap();
        assert!(req.cookies.is_null());
        assert!(req.game.is_null());
    }
}
