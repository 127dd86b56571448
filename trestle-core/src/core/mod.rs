//! Core 层：动态值模型与错误类型
//!
//! 不依赖 registry / bridge，供上层模块复用。

pub mod error;
pub mod value;
