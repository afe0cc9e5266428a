use serde_json::Value;

use crate::error::ValidationError;
use crate::models::ConfigDocument;

/// Cookie 文本中必须出现的字段：账号 ID 和会话令牌
pub const REQUIRED_COOKIE_MARKERS: [&str; 2] = ["account_id", "cookie_token"];

/// 保存前的结构检查。先查账号再查平台，只返回第一个错误
pub fn validate_for_save(doc: &ConfigDocument) -> Result<(), ValidationError> {
    if doc.account_count() == 0 {
        return Err(ValidationError::MissingAccounts);
    }
    if doc.platform_count() == 0 {
        return Err(ValidationError::MissingPlatforms);
    }
    Ok(())
}

/// Cookie 的语法检查，不访问远端服务。通过时返回文本本身
pub fn validate_cookie_text(cookies: &Value) -> Result<&str, ValidationError> {
    let text = match cookies {
        Value::String(s) if !s.is_empty() => s.as_str(),
        _ => return Err(ValidationError::InvalidFormat),
    };

    if !REQUIRED_COOKIE_MARKERS
        .iter()
        .all(|marker| text.contains(marker))
    {
        return Err(ValidationError::MissingMarkers);
    }

    Ok(text)
}
