//! 参数类型描述符与基础类型查找表

use std::collections::HashMap;
use std::fmt;

/// 目标类型描述符，转换引擎按它决定转换规则。
///
/// `Bool` 到 `Text` 为“基础类别”（primitive kind）：Nil 不会转换为它们，
/// 基础元素数组不允许部分失败。
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeDesc {
    Bool,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Char,
    Text,
    /// 强类型数组，长度由输入决定
    Array(Box<TypeDesc>),
    /// 定长数组，元素数必须精确匹配
    FixedArray(Box<TypeDesc>, usize),
    /// 可增长列表，元素保持“最适表示”
    List,
    /// 关联容器，键值都取“最适表示”
    Map,
    /// 不透明宿主类型，按类名做可赋值性检查
    Object(&'static str),
    /// 无目标类型信息，取输入的自然表示
    Any,
}

impl TypeDesc {
    /// 是否为基础类别
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            TypeDesc::Bool
                | TypeDesc::I8
                | TypeDesc::I16
                | TypeDesc::I32
                | TypeDesc::I64
                | TypeDesc::F32
                | TypeDesc::F64
                | TypeDesc::Char
                | TypeDesc::Text
        )
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDesc::Bool => write!(f, "bool"),
            TypeDesc::I8 => write!(f, "i8"),
            TypeDesc::I16 => write!(f, "i16"),
            TypeDesc::I32 => write!(f, "i32"),
            TypeDesc::I64 => write!(f, "i64"),
            TypeDesc::F32 => write!(f, "f32"),
            TypeDesc::F64 => write!(f, "f64"),
            TypeDesc::Char => write!(f, "char"),
            TypeDesc::Text => write!(f, "text"),
            TypeDesc::Array(t) => write!(f, "array of {t}"),
            TypeDesc::FixedArray(t, n) => write!(f, "array of {n} {t}"),
            TypeDesc::List => write!(f, "list"),
            TypeDesc::Map => write!(f, "map"),
            TypeDesc::Object(class) => write!(f, "object {class}"),
            TypeDesc::Any => write!(f, "any"),
        }
    }
}

/// 基础类型名查找表。bridge 构造时建一次，之后只读。
pub struct PrimitiveTable {
    entries: HashMap<&'static str, TypeDesc>,
}

impl PrimitiveTable {
    pub fn new() -> Self {
        let mut entries = HashMap::new();
        entries.insert("bool", TypeDesc::Bool);
        entries.insert("i8", TypeDesc::I8);
        entries.insert("i16", TypeDesc::I16);
        entries.insert("i32", TypeDesc::I32);
        entries.insert("i64", TypeDesc::I64);
        entries.insert("f32", TypeDesc::F32);
        entries.insert("f64", TypeDesc::F64);
        entries.insert("char", TypeDesc::Char);
        entries.insert("text", TypeDesc::Text);
        entries.insert("string", TypeDesc::Text);
        Self { entries }
    }

    pub fn lookup(&self, name: &str) -> Option<&TypeDesc> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
}

impl Default for PrimitiveTable {
    fn default() -> Self {
        Self::new()
    }
}
