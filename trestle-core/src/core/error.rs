//! 错误类型 (Core 层)
//!
//! 三类结果分开表达：
//! - `CoercionFailure`：类型转换失败。哨兵值，驱动“尝试下一个候选”，
//!   从不向脚本传播。
//! - `HostCallError`：宿主 thunk 内部失败。由 dispatch 层包装。
//! - `DispatchError`：派发失败。总是作为可抛错误传播给脚本侧。

use thiserror::Error;

use crate::core::value::HandleId;

/// 类型转换失败（可恢复哨兵，不是致命错误）
///
/// 调用方必须将其视为“换下一个候选”，而不是向上传播。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot coerce {found} to {expected}")]
pub struct CoercionFailure {
    /// 目标类型描述
    pub expected: String,
    /// 输入值的 tag 名
    pub found: &'static str,
}

impl CoercionFailure {
    pub fn new(expected: impl Into<String>, found: &'static str) -> Self {
        Self {
            expected: expected.into(),
            found,
        }
    }
}

/// 宿主调用失败（thunk 内部错误）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct HostCallError(pub String);

impl HostCallError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// thunk 收到了与声明不符的接收者或参数（注册代码的 bug）
    pub fn type_mismatch(expected: &str) -> Self {
        Self(format!("host thunk expected {expected}"))
    }
}

/// 统一的派发错误类型
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// 同名重载全部不匹配
    #[error("no matching method found among {candidates} overloads of `{name}`")]
    NoMatchingMethod { name: String, candidates: usize },

    /// 属性赋值找不到 setter 或字段
    #[error("no setter or field found for: {0}")]
    NoSetterOrField(String),

    /// 类名无法解析
    #[error("class not found: {0}")]
    ClassNotFound(String),

    /// 类没有公开构造器
    #[error("no public constructors found for {0}")]
    NoPublicConstructors(String),

    /// 构造器全部不匹配
    #[error("no matching constructor found for {0}")]
    NoMatchingConstructor(String),

    /// 严格 arity 检查失败（静态方法）
    #[error("wrong number of arguments for `{name}`: expected {expected}, got {got}")]
    WrongArgumentCount {
        name: String,
        expected: usize,
        got: usize,
    },

    /// 单候选位置上的参数转换失败（setter、静态方法）
    #[error("cannot coerce argument {index} of `{name}`: {source}")]
    ArgumentCoercion {
        name: String,
        index: usize,
        source: CoercionFailure,
    },

    /// 转换成功后宿主调用失败。立即中止派发，不再尝试后续候选。
    #[error("error calling `{name}`: {message}")]
    HostCall { name: String, message: String },

    /// 句柄表中不存在的 id
    #[error("stale object handle: {0}")]
    StaleHandle(HandleId),

    /// 对非可调用值发起调用
    #[error("value of type {0} is not callable")]
    NotCallable(&'static str),
}

impl DispatchError {
    pub(crate) fn host_call(name: &str, err: HostCallError) -> Self {
        DispatchError::HostCall {
            name: name.to_string(),
            message: err.0,
        }
    }
}
