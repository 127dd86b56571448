//! SWF 解析错误
//!
//! 只在 `open` 边界被消费：facade 捕获后转换为 Nil + 诊断日志，
//! 从不抛给脚本侧。

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SwfError {
    /// 前三字节不是 FWS/CWS/ZWS
    #[error("invalid SWF signature: {0:02x?}")]
    InvalidSignature([u8; 3]),

    /// 数据在结构中途截断
    #[error("truncated SWF data: needed {needed} bytes at offset {offset}")]
    Truncated { offset: usize, needed: usize },

    /// 版本字节超出已知范围
    #[error("unsupported SWF version: {0}")]
    UnsupportedVersion(u8),

    /// 文件超出配置的读取上限
    #[error("SWF file too large: {size} bytes (limit {limit})")]
    TooLarge { size: u64, limit: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = SwfError::InvalidSignature([b'X', b'W', b'S']);
        assert_eq!(err.to_string(), "invalid SWF signature: [58, 57, 53]");

        let err = SwfError::Truncated {
            offset: 8,
            needed: 2,
        };
        assert_eq!(
            err.to_string(),
            "truncated SWF data: needed 2 bytes at offset 8"
        );

        let err = SwfError::UnsupportedVersion(0);
        assert_eq!(err.to_string(), "unsupported SWF version: 0");
    }
}
