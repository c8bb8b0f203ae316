//! 认证能力：订阅端准入所需的 JWT 校验。
//!
//! 会话签发归外围系统；本模块只负责把传入的 token 当作不透明凭证
//! 做签名与有效期校验，返回其 subject。

mod jwt;

pub use jwt::JwtVerifier;

/// 认证相关错误。
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("token expired")]
    TokenExpired,
    #[error("token invalid")]
    TokenInvalid,
    #[error("internal error: {0}")]
    Internal(String),
}
