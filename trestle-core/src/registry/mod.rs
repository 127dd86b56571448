//! 宿主类型注册表
//!
//! Rust 没有运行时反射，原型里靠反射枚举成员的地方全部改为显式注册表：
//! 每个宿主类型在 bridge 初始化时注册一次，成员保存为**有序**列表
//! （注册顺序即声明顺序），派发层按该顺序做“先声明者胜出”的候选搜索。
//! 成员携带调用 thunk，thunk 负责向下转型与宽度收窄。

pub mod builder;
pub mod desc;
pub mod host;

pub use builder::TypeEntryBuilder;
pub use desc::{PrimitiveTable, TypeDesc};
pub use host::{
    arg_bool, arg_f64, arg_i64, arg_object, arg_seq, arg_text, borrow_host, borrow_host_mut,
    host_ref, HostRef, HostValue,
};

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::rc::Rc;

use crate::core::error::HostCallError;

// ==================== Thunk 类型 ====================

/// 实例方法 thunk：接收者 + 已转换参数
pub type MethodThunk = Rc<dyn Fn(&HostRef, &[HostValue]) -> Result<HostValue, HostCallError>>;

/// 静态方法 / 构造器 thunk：仅参数
pub type StaticThunk = Rc<dyn Fn(&[HostValue]) -> Result<HostValue, HostCallError>>;

/// 字段读取。downcast 失败返回 None（沿祖先链投影后不该发生）。
pub type FieldGet = Rc<dyn Fn(&dyn Any) -> Option<HostValue>>;

/// 字段写入
pub type FieldSet = Rc<dyn Fn(&mut dyn Any, HostValue) -> Result<(), HostCallError>>;

// ==================== 成员条目 ====================

/// 一个实例方法候选（重载解析的基本单位）
pub struct MethodEntry {
    pub name: &'static str,
    /// 按位置排列的参数类型描述；arity = params.len()
    pub params: Vec<TypeDesc>,
    pub invoke: MethodThunk,
}

impl MethodEntry {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl Clone for MethodEntry {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            params: self.params.clone(),
            invoke: Rc::clone(&self.invoke),
        }
    }
}

/// 公开字段
pub struct FieldEntry {
    pub name: &'static str,
    pub ty: TypeDesc,
    pub get: FieldGet,
    /// None 表示只读字段
    pub set: Option<FieldSet>,
}

/// 静态字段。值在暴露时求值一次。
pub struct StaticFieldEntry {
    pub name: &'static str,
    pub value: Rc<dyn Fn() -> HostValue>,
}

/// 静态方法（单候选、严格 arity，不参与重载搜索）
pub struct StaticMethodEntry {
    pub name: &'static str,
    pub params: Vec<TypeDesc>,
    pub invoke: StaticThunk,
}

/// 公开构造器
pub struct CtorEntry {
    pub params: Vec<TypeDesc>,
    pub invoke: StaticThunk,
}

/// 指向父类型的链接，用于字段的祖先链查找与可赋值性判断
pub struct ParentLink {
    pub class: &'static str,
    /// 将子对象投影为父视图
    pub project: fn(&dyn Any) -> Option<&dyn Any>,
    pub project_mut: fn(&mut dyn Any) -> Option<&mut dyn Any>,
}

// ==================== 类型条目 ====================

/// 一个已注册宿主类型的全部运行时信息
pub struct TypeEntry {
    /// 完全限定类名（如 "swf.Tag"）
    pub class: &'static str,
    pub type_id: TypeId,
    pub parent: Option<ParentLink>,
    pub constructors: Vec<CtorEntry>,
    pub methods: Vec<MethodEntry>,
    pub fields: Vec<FieldEntry>,
    pub static_fields: Vec<StaticFieldEntry>,
    pub static_methods: Vec<StaticMethodEntry>,
    /// toString 内建使用的文本化函数
    pub display: Rc<dyn Fn(&dyn Any) -> String>,
}

impl TypeEntry {
    /// 按名字收集同名实例方法（保持注册顺序）
    pub fn methods_named(&self, name: &str) -> Vec<MethodEntry> {
        self.methods
            .iter()
            .filter(|m| m.name == name)
            .cloned()
            .collect()
    }
}

impl std::fmt::Debug for TypeEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeEntry")
            .field("class", &self.class)
            .field("constructors", &self.constructors.len())
            .field("methods", &self.methods.len())
            .field("fields", &self.fields.len())
            .finish()
    }
}

// ==================== 注册表 ====================

/// 类型注册表。初始化时填充一次，之后只读。
#[derive(Default)]
pub struct TypeRegistry {
    by_name: HashMap<&'static str, Rc<TypeEntry>>,
    by_id: HashMap<TypeId, Rc<TypeEntry>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册一个类型条目。同名重复注册以后者为准。
    pub fn register(&mut self, entry: TypeEntry) {
        tracing::debug!(
            target: "trestle::registry",
            class = entry.class,
            methods = entry.methods.len(),
            fields = entry.fields.len(),
            "registering host type"
        );
        let entry = Rc::new(entry);
        self.by_name.insert(entry.class, Rc::clone(&entry));
        self.by_id.insert(entry.type_id, entry);
    }

    /// 按类名查找
    pub fn get(&self, class: &str) -> Option<&Rc<TypeEntry>> {
        self.by_name.get(class)
    }

    /// 按具体值的运行时类型查找
    pub fn entry_for(&self, value: &dyn Any) -> Option<&Rc<TypeEntry>> {
        self.by_id.get(&value.type_id())
    }

    /// `from` 的实例是否可赋值给名为 `to_class` 的类型（沿父链向上走）
    pub fn is_assignable(&self, from: &TypeEntry, to_class: &str) -> bool {
        if from.class == to_class {
            return true;
        }
        let mut cur = from.parent.as_ref().map(|p| p.class);
        while let Some(class) = cur {
            if class == to_class {
                return true;
            }
            cur = self
                .get(class)
                .and_then(|e| e.parent.as_ref().map(|p| p.class));
        }
        false
    }

    /// 已注册的类名（测试与诊断用）
    pub fn class_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.by_name.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
