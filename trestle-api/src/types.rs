//! API 类型定义

use trestle_core::DynamicValue;

/// `open` 的带诊断输出
///
/// 脚本可见的结果只有 `value`（句柄或 Nil）；`diagnostic` 供宿主程序
/// 或测试检查失败原因，脚本侧永远看不到它。
#[derive(Debug)]
pub struct OpenOutput {
    pub value: DynamicValue,
    pub diagnostic: Option<String>,
}

impl OpenOutput {
    pub fn succeeded(&self) -> bool {
        self.diagnostic.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_succeeded() {
        let ok = OpenOutput {
            value: DynamicValue::Nil,
            diagnostic: None,
        };
        assert!(ok.succeeded());

        let failed = OpenOutput {
            value: DynamicValue::Nil,
            diagnostic: Some("invalid signature".into()),
        };
        assert!(!failed.succeeded());
    }
}
