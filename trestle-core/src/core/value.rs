//! 动态值模型（Core 层）
//!
//! `DynamicValue` 是脚本侧的 tagged 值表示：任一时刻只有一个 tag 生效。
//! 集合按值持有；宿主对象以 `Handle(id)` 间接引用，id 指向 bridge 层的
//! 句柄表。

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::core::error::DispatchError;

// ==================== 句柄 ID ====================

/// 句柄表索引。一个 id 终生绑定同一个宿主对象，从不复用。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HandleId(pub u64);

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handle#{}", self.0)
    }
}

// ==================== Mapping 键 ====================

/// Mapping 的键：DynamicValue 中可哈希的子集。
///
/// 数字键在整数范围内归一化为 `Int`，否则按规范文本形式存储。
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MapKey {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl MapKey {
    /// 尝试从 DynamicValue 构造键。不可表示的值（集合、可调用、句柄、Nil）
    /// 返回 None。
    pub fn from_value(value: &DynamicValue) -> Option<MapKey> {
        match value {
            DynamicValue::Bool(b) => Some(MapKey::Bool(*b)),
            DynamicValue::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() && (i64::MIN as f64..=i64::MAX as f64).contains(n) {
                    Some(MapKey::Int(*n as i64))
                } else {
                    Some(MapKey::Text(format_number(*n)))
                }
            }
            DynamicValue::Text(s) => Some(MapKey::Text(s.clone())),
            _ => None,
        }
    }

    /// 转回 DynamicValue（用于 Mapping 的整表遍历）
    pub fn to_value(&self) -> DynamicValue {
        match self {
            MapKey::Bool(b) => DynamicValue::Bool(*b),
            MapKey::Int(n) => DynamicValue::Number(*n as f64),
            MapKey::Text(s) => DynamicValue::Text(s.clone()),
        }
    }
}

// ==================== 可调用值 ====================

type CallableFn = dyn Fn(&[DynamicValue]) -> Result<DynamicValue, DispatchError>;

/// 脚本可调用值。按引用比较（同一底层闭包视为相等）。
#[derive(Clone)]
pub struct Callable {
    name: Rc<str>,
    func: Rc<CallableFn>,
}

impl Callable {
    pub fn new<F>(name: impl Into<Rc<str>>, func: F) -> Self
    where
        F: Fn(&[DynamicValue]) -> Result<DynamicValue, DispatchError> + 'static,
    {
        Self {
            name: name.into(),
            func: Rc::new(func),
        }
    }

    /// 调用，参数按位置传递
    pub fn invoke(&self, args: &[DynamicValue]) -> Result<DynamicValue, DispatchError> {
        (self.func)(args)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<callable {}>", self.name)
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.func, &other.func)
    }
}

// ==================== DynamicValue ====================

/// 脚本运行时的 tagged 值
#[derive(Clone, Debug, PartialEq, Default)]
pub enum DynamicValue {
    #[default]
    Nil,
    Bool(bool),
    Number(f64),
    Text(String),
    /// 有序序列。脚本侧按 1 起始下标访问，存储为 0 起始 Vec。
    Sequence(Vec<DynamicValue>),
    /// 关联容器。键唯一，插入顺序无意义。
    Mapping(HashMap<MapKey, DynamicValue>),
    Callable(Callable),
    /// 不透明宿主对象句柄。一旦包装为 Handle，不会再降级为基础 tag。
    Handle(HandleId),
}

impl DynamicValue {
    /// tag 名称（用于诊断信息）
    pub fn tag_name(&self) -> &'static str {
        match self {
            DynamicValue::Nil => "nil",
            DynamicValue::Bool(_) => "bool",
            DynamicValue::Number(_) => "number",
            DynamicValue::Text(_) => "text",
            DynamicValue::Sequence(_) => "sequence",
            DynamicValue::Mapping(_) => "mapping",
            DynamicValue::Callable(_) => "callable",
            DynamicValue::Handle(_) => "handle",
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, DynamicValue::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DynamicValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            DynamicValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            DynamicValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[DynamicValue]> {
        match self {
            DynamicValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_handle(&self) -> Option<HandleId> {
        match self {
            DynamicValue::Handle(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            DynamicValue::Callable(c) => Some(c),
            _ => None,
        }
    }
}

impl fmt::Display for DynamicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DynamicValue::Nil => write!(f, "nil"),
            DynamicValue::Bool(b) => write!(f, "{b}"),
            DynamicValue::Number(n) => write!(f, "{}", format_number(*n)),
            DynamicValue::Text(s) => write!(f, "{s}"),
            DynamicValue::Sequence(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            DynamicValue::Mapping(map) => write!(f, "<mapping {} entries>", map.len()),
            DynamicValue::Callable(c) => write!(f, "<callable {}>", c.name()),
            DynamicValue::Handle(id) => write!(f, "{id}"),
        }
    }
}

/// 数字的规范文本形式：整数值不带小数部分
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_names() {
        assert_eq!(DynamicValue::Nil.tag_name(), "nil");
        assert_eq!(DynamicValue::Number(1.0).tag_name(), "number");
        assert_eq!(DynamicValue::Handle(HandleId(3)).tag_name(), "handle");
    }

    #[test]
    fn test_accessors() {
        assert_eq!(DynamicValue::Bool(true).as_bool(), Some(true));
        assert_eq!(DynamicValue::Number(2.5).as_number(), Some(2.5));
        assert_eq!(DynamicValue::Text("x".into()).as_text(), Some("x"));
        assert!(DynamicValue::Nil.as_number().is_none());
    }

    #[test]
    fn test_map_key_from_value() {
        assert_eq!(
            MapKey::from_value(&DynamicValue::Number(4.0)),
            Some(MapKey::Int(4))
        );
        assert_eq!(
            MapKey::from_value(&DynamicValue::Number(1.5)),
            Some(MapKey::Text("1.5".into()))
        );
        assert_eq!(
            MapKey::from_value(&DynamicValue::Text("k".into())),
            Some(MapKey::Text("k".into()))
        );
        assert_eq!(MapKey::from_value(&DynamicValue::Nil), None);
        assert_eq!(
            MapKey::from_value(&DynamicValue::Sequence(vec![])),
            None
        );
    }

    #[test]
    fn test_map_key_round_trip() {
        let key = MapKey::from_value(&DynamicValue::Number(7.0)).unwrap();
        assert_eq!(key.to_value(), DynamicValue::Number(7.0));
    }

    #[test]
    fn test_callable_identity() {
        let a = Callable::new("f", |_| Ok(DynamicValue::Nil));
        let b = a.clone();
        let c = Callable::new("f", |_| Ok(DynamicValue::Nil));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(42.0), "42");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(2.5), "2.5");
    }

    #[test]
    fn test_display() {
        let seq = DynamicValue::Sequence(vec![
            DynamicValue::Number(1.0),
            DynamicValue::Text("a".into()),
        ]);
        assert_eq!(format!("{seq}"), "[1, a]");
        assert_eq!(format!("{}", DynamicValue::Handle(HandleId(9))), "handle#9");
    }
}
