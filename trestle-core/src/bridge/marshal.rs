//! 宿主值到脚本值的封送
//!
//! 与转换引擎方向相反：thunk 的返回值翻译为脚本侧的动态值。
//! 不透明对象不翻译内容，装入句柄表后返回句柄。

use std::collections::HashMap;

use crate::bridge::BridgeCtx;
use crate::core::value::{DynamicValue, MapKey};
use crate::registry::HostValue;

/// 把宿主值封送为脚本值
pub fn to_script(ctx: &BridgeCtx, value: HostValue) -> DynamicValue {
    match value {
        HostValue::Null => DynamicValue::Nil,
        HostValue::Bool(b) => DynamicValue::Bool(b),
        HostValue::Int(n) => DynamicValue::Number(n as f64),
        HostValue::Float(n) => DynamicValue::Number(n),
        HostValue::Char(c) => DynamicValue::Text(c.to_string()),
        HostValue::Text(s) => DynamicValue::Text(s),
        HostValue::Seq(items) => DynamicValue::Sequence(
            items.into_iter().map(|item| to_script(ctx, item)).collect(),
        ),
        HostValue::Map(entries) => {
            let mut out = HashMap::with_capacity(entries.len());
            for (key, value) in entries {
                let key = to_script(ctx, key);
                match MapKey::from_value(&key) {
                    Some(k) => {
                        out.insert(k, to_script(ctx, value));
                    }
                    None => {
                        // 键在脚本侧不可表示，丢弃该条目
                        tracing::warn!(
                            target: "trestle::marshal",
                            "dropping map entry with unrepresentable key {}",
                            key.tag_name()
                        );
                    }
                }
            }
            DynamicValue::Mapping(out)
        }
        HostValue::Object(host) => DynamicValue::Handle(ctx.wrap(host)),
    }
}
