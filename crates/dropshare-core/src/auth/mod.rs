//! 登录校验模块
//!
//! 以明文比对存储中的用户记录，只用于演示，不提供任何安全保证。

mod gate;

pub use gate::CredentialGate;

use crate::storage::StoreError;
use thiserror::Error;

/// 登录相关错误
#[derive(Debug, Error)]
pub enum AuthError {
    /// 邮箱或密码未填写
    #[error("Please fill in all fields")]
    Validation,

    /// 账号不存在、邮箱或密码不匹配（三者对调用方不可区分）
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// 写入存储失败
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

pub type AuthResult<T> = Result<T, AuthError>;
