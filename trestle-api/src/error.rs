//! API 错误类型
//!
//! 提供统一的错误类型和结构化错误报告。`CoercionFailure` 不在此列：
//! 它只在候选搜索内部流转，从不到达 API 边界。

use thiserror::Error;

pub use trestle_core::{CoercionFailure, DispatchError};
pub use trestle_swf::SwfError;

/// Trestle 错误类型
#[derive(Error, Debug)]
pub enum TrestleError {
    /// 派发错误（方法、构造器、属性、句柄）
    #[error("{0}")]
    Dispatch(#[from] DispatchError),

    /// SWF 解析/打开错误（只在绕过 `open` 的 Nil 策略时出现）
    #[error("{0}")]
    Swf(#[from] SwfError),

    /// 脚本驱动错误（未定义变量、非法操作等）
    #[error("Script error: {0}")]
    Script(String),
}

impl TrestleError {
    /// 获取错误阶段名称
    pub fn phase(&self) -> &'static str {
        match self {
            TrestleError::Dispatch(_) => "dispatch",
            TrestleError::Swf(_) => "facade",
            TrestleError::Script(_) => "cli",
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            TrestleError::Dispatch(e) => match e {
                DispatchError::NoMatchingMethod { .. } => "NoMatchingMethod",
                DispatchError::NoSetterOrField(_) => "NoSetterOrField",
                DispatchError::ClassNotFound(_) => "ClassNotFound",
                DispatchError::NoPublicConstructors(_) => "NoPublicConstructors",
                DispatchError::NoMatchingConstructor(_) => "NoMatchingConstructor",
                DispatchError::WrongArgumentCount { .. } => "WrongArgumentCount",
                DispatchError::ArgumentCoercion { .. } => "ArgumentCoercion",
                DispatchError::HostCall { .. } => "HostCall",
                DispatchError::StaleHandle(_) => "StaleHandle",
                DispatchError::NotCallable(_) => "NotCallable",
            },
            TrestleError::Swf(e) => match e {
                SwfError::InvalidSignature(_) => "InvalidSignature",
                SwfError::Truncated { .. } => "Truncated",
                SwfError::UnsupportedVersion(_) => "UnsupportedVersion",
                SwfError::TooLarge { .. } => "TooLarge",
                SwfError::Io(_) => "Io",
            },
            TrestleError::Script(_) => "ScriptError",
        }
    }

    /// 转换为结构化错误报告
    ///
    /// CLI 可以直接打印，上层应用可以序列化为 JSON。
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            phase: self.phase(),
            error_kind: self.kind().to_string(),
            message: self.to_string(),
        }
    }
}

/// 结构化错误报告
///
/// 上层应用（CLI、Web）可以根据自己的需求格式化。
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorReport {
    /// 错误阶段: dispatch, facade, cli
    pub phase: &'static str,
    /// 错误类型（可用于程序化处理）
    pub error_kind: String,
    /// 人类可读的错误消息
    pub message: String,
}

impl std::fmt::Display for ErrorReport {
    /// 默认的 CLI 友好格式
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.phase, self.error_kind, self.message)
    }
}

impl ErrorReport {
    /// 转换为 JSON 格式（Web API 使用）
    ///
    /// 不依赖 serde，手动构建 JSON 字符串。
    pub fn to_json(&self) -> String {
        format!(
            r#"{{"phase":"{}","error_kind":"{}","message":"{}"}}"#,
            self.phase,
            escape_json(&self.error_kind),
            escape_json(&self.message)
        )
    }

    /// 简洁格式（适合终端）
    pub fn to_short(&self) -> String {
        format!("{}: {}", self.phase, self.message)
    }
}

/// 简单的 JSON 字符串转义
fn escape_json(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}
