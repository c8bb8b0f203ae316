//! 认证中间件与请求上下文
//!
//! 提供以下中间件和辅助函数：
//! - request_context：请求上下文中间件，注入 request_id/trace_id
//! - bearer_token：从 Authorization 头提取 Bearer token
//! - require_user：验证 token 并返回 subject（用户标识）
//!
//! 认证流程：
//! 1. request_context：在所有请求前注入追踪 ID
//! 2. bearer_token：从请求头提取 token
//! 3. require_user：验证 JWT 签名与有效期，取出 subject

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, HeaderValue, header},
    middleware::Next,
    response::Response,
};
use nms_auth::AuthError;
use nms_telemetry::new_request_ids;
use tracing::{Instrument, info_span};

use crate::AppState;
use crate::utils::response::{auth_error, internal_error};

/// 请求上下文中间件：注入 request_id/trace_id
pub async fn request_context(mut req: Request<Body>, next: Next) -> Response {
    let ids = new_request_ids();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    req.extensions_mut().insert(ids.clone());

    let span = info_span!(
        "request",
        request_id = %ids.request_id,
        trace_id = %ids.trace_id,
        method = %method,
        path = %path
    );

    let mut response: axum::response::Response = next.run(req).instrument(span).await;
    response.headers_mut().insert(
        "x-request-id",
        HeaderValue::from_str(&ids.request_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response.headers_mut().insert(
        "x-trace-id",
        HeaderValue::from_str(&ids.trace_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response
}

/// 从请求头中提取 Bearer token
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let header_value = headers.get(header::AUTHORIZATION)?;
    let auth_str = header_value.to_str().ok()?;
    auth_str.strip_prefix("Bearer ")
}

/// 验证 token 并返回其 subject（用户标识）
pub fn require_user(state: &AppState, headers: &HeaderMap) -> Result<String, Response> {
    let token = match bearer_token(headers) {
        Some(token) => token,
        None => return Err(auth_error()),
    };
    match state.verifier.verify(token) {
        Ok(user_id) => Ok(user_id),
        Err(AuthError::TokenInvalid | AuthError::TokenExpired) => Err(auth_error()),
        Err(err) => Err(internal_error(err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::bearer_token;
    use axum::http::{HeaderMap, HeaderValue, header};

    #[test]
    fn bearer_token_extracts() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer token-1"),
        );
        assert_eq!(bearer_token(&headers), Some("token-1"));
    }

    #[test]
    fn missing_or_malformed_header_is_none() {
        let headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("token-1"));
        assert_eq!(bearer_token(&headers), None);
    }
}
