//! 脚本值到宿主值的类型转换引擎
//!
//! 规则按优先级排列：Nil、基础类别、强类型数组、列表、关联容器、对象。
//! 转换是纯函数式的（除了读句柄表），失败返回 `CoercionFailure`，
//! 由派发层决定这算不算错误（候选搜索中只是淘汰一个候选）。
//!
//! 数字与文本双向互转：目标是数字时可读文本接受，目标是文本时数字
//! 接受。Nil 不转换为任何基础类别。

use crate::bridge::BridgeCtx;
use crate::core::error::CoercionFailure;
use crate::core::value::{format_number, DynamicValue};
use crate::registry::{HostValue, TypeDesc};

/// 按目标描述符转换脚本值
pub fn coerce(
    ctx: &BridgeCtx,
    value: &DynamicValue,
    target: &TypeDesc,
) -> Result<HostValue, CoercionFailure> {
    // 规则 1：Nil 转换为任何非基础目标的空引用
    if value.is_nil() {
        if target.is_primitive() {
            return Err(reject(value, target));
        }
        return Ok(HostValue::Null);
    }

    match target {
        TypeDesc::Bool => match value {
            DynamicValue::Bool(b) => Ok(HostValue::Bool(*b)),
            _ => Err(reject(value, target)),
        },
        TypeDesc::I8 => int_of(value, target).map(|n| HostValue::Int(n as i8 as i64)),
        TypeDesc::I16 => int_of(value, target).map(|n| HostValue::Int(n as i16 as i64)),
        TypeDesc::I32 => int_of(value, target).map(|n| HostValue::Int(n as i32 as i64)),
        TypeDesc::I64 => int_of(value, target).map(HostValue::Int),
        TypeDesc::F32 => number_of(value)
            .map(|n| HostValue::Float(n as f32 as f64))
            .ok_or_else(|| reject(value, target)),
        TypeDesc::F64 => number_of(value)
            .map(HostValue::Float)
            .ok_or_else(|| reject(value, target)),
        TypeDesc::Char => match value {
            DynamicValue::Text(s) => Ok(HostValue::Char(s.chars().next().unwrap_or('\0'))),
            _ => Err(reject(value, target)),
        },
        TypeDesc::Text => match value {
            DynamicValue::Text(s) => Ok(HostValue::Text(s.clone())),
            DynamicValue::Number(n) => Ok(HostValue::Text(format_number(*n))),
            _ => Err(reject(value, target)),
        },
        TypeDesc::Array(elem) => {
            let items = value
                .as_sequence()
                .ok_or_else(|| reject(value, target))?;
            coerce_elements(ctx, items, elem).ok_or_else(|| reject(value, target))
        }
        TypeDesc::FixedArray(elem, count) => {
            let items = value
                .as_sequence()
                .ok_or_else(|| reject(value, target))?;
            if items.len() != *count {
                return Err(reject(value, target));
            }
            coerce_elements(ctx, items, elem).ok_or_else(|| reject(value, target))
        }
        TypeDesc::List => {
            let items = value
                .as_sequence()
                .ok_or_else(|| reject(value, target))?;
            Ok(HostValue::Seq(
                items
                    .iter()
                    .map(|item| coerce_any(ctx, item).unwrap_or(HostValue::Null))
                    .collect(),
            ))
        }
        TypeDesc::Map => match value {
            DynamicValue::Mapping(entries) => Ok(HostValue::Map(
                entries
                    .iter()
                    .map(|(k, v)| {
                        let key = coerce_any(ctx, &k.to_value()).unwrap_or(HostValue::Null);
                        let value = coerce_any(ctx, v).unwrap_or(HostValue::Null);
                        (key, value)
                    })
                    .collect(),
            )),
            _ => Err(reject(value, target)),
        },
        TypeDesc::Object(class) => match value {
            DynamicValue::Handle(id) => {
                let slot = ctx.slot(*id).map_err(|_| reject(value, target))?;
                let entry = slot.entry.as_ref().ok_or_else(|| reject(value, target))?;
                if ctx.registry().is_assignable(entry, class) {
                    Ok(HostValue::Object(slot.host))
                } else {
                    Err(reject(value, target))
                }
            }
            _ => Err(reject(value, target)),
        },
        TypeDesc::Any => coerce_any(ctx, value),
    }
}

/// 无目标类型信息时取输入的自然表示
pub fn coerce_any(ctx: &BridgeCtx, value: &DynamicValue) -> Result<HostValue, CoercionFailure> {
    match value {
        DynamicValue::Nil => Ok(HostValue::Null),
        DynamicValue::Bool(b) => Ok(HostValue::Bool(*b)),
        DynamicValue::Number(n) => Ok(HostValue::Float(*n)),
        DynamicValue::Text(s) => Ok(HostValue::Text(s.clone())),
        DynamicValue::Sequence(items) => Ok(HostValue::Seq(
            items
                .iter()
                .map(|item| coerce_any(ctx, item).unwrap_or(HostValue::Null))
                .collect(),
        )),
        DynamicValue::Mapping(entries) => Ok(HostValue::Map(
            entries
                .iter()
                .map(|(k, v)| {
                    let key = coerce_any(ctx, &k.to_value()).unwrap_or(HostValue::Null);
                    let value = coerce_any(ctx, v).unwrap_or(HostValue::Null);
                    (key, value)
                })
                .collect(),
        )),
        DynamicValue::Handle(id) => {
            let slot = ctx
                .slot(*id)
                .map_err(|_| reject(value, &TypeDesc::Any))?;
            Ok(HostValue::Object(slot.host))
        }
        DynamicValue::Callable(_) => Err(reject(value, &TypeDesc::Any)),
    }
}

/// 强类型数组的逐元素转换。基础元素失败导致整体失败（None），
/// 非基础元素失败降级为空引用。
fn coerce_elements(
    ctx: &BridgeCtx,
    items: &[DynamicValue],
    elem: &TypeDesc,
) -> Option<HostValue> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match coerce(ctx, item, elem) {
            Ok(v) => out.push(v),
            Err(_) if elem.is_primitive() => return None,
            Err(_) => out.push(HostValue::Null),
        }
    }
    Some(HostValue::Seq(out))
}

/// 数字解读：数字直接取值，文本按十进制解析
fn number_of(value: &DynamicValue) -> Option<f64> {
    match value {
        DynamicValue::Number(n) => Some(*n),
        DynamicValue::Text(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn int_of(value: &DynamicValue, target: &TypeDesc) -> Result<i64, CoercionFailure> {
    number_of(value)
        .map(|n| n as i64)
        .ok_or_else(|| reject(value, target))
}

fn reject(value: &DynamicValue, target: &TypeDesc) -> CoercionFailure {
    tracing::trace!(
        target: "trestle::coerce",
        "cannot coerce {} to {}",
        value.tag_name(),
        target
    );
    CoercionFailure::new(target.to_string(), value.tag_name())
}
