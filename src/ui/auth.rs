//! 更新系 REST エンドポイントの Bearer トークン検証

use axum::http::{HeaderMap, StatusCode, header};

/// `Authorization: Bearer <token>` が設定済みトークンと一致するか検証する。
///
/// トークンが未設定のサーバでは更新系エンドポイントは常に 401 を返す。
pub fn require_bearer(headers: &HeaderMap, expected: Option<&str>) -> Result<(), StatusCode> {
    let Some(expected) = expected else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match presented {
        Some(token) if token == expected => Ok(()),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}
