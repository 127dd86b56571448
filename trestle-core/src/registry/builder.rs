//! 类型条目的流式构建器
//!
//! 注册代码（手写，每类型一处）通过它声明成员。声明顺序被原样保存，
//! 即派发层的候选搜索顺序。

use std::any::{Any, TypeId};
use std::marker::PhantomData;
use std::rc::Rc;

use super::desc::TypeDesc;
use super::host::{borrow_host, borrow_host_mut, HostValue};
use super::{
    CtorEntry, FieldEntry, MethodEntry, ParentLink, StaticFieldEntry, StaticMethodEntry, TypeEntry,
};
use crate::core::error::HostCallError;

pub struct TypeEntryBuilder<T: 'static> {
    class: &'static str,
    parent: Option<ParentLink>,
    constructors: Vec<CtorEntry>,
    methods: Vec<MethodEntry>,
    fields: Vec<FieldEntry>,
    static_fields: Vec<StaticFieldEntry>,
    static_methods: Vec<StaticMethodEntry>,
    display: Option<Rc<dyn Fn(&dyn Any) -> String>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: 'static> TypeEntryBuilder<T> {
    pub fn new(class: &'static str) -> Self {
        Self {
            class,
            parent: None,
            constructors: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
            static_fields: Vec::new(),
            static_methods: Vec::new(),
            display: None,
            _marker: PhantomData,
        }
    }

    /// 声明父类型。`project` 把子对象投影为父视图，供字段祖先链查找使用。
    pub fn parent(
        mut self,
        class: &'static str,
        project: fn(&dyn Any) -> Option<&dyn Any>,
        project_mut: fn(&mut dyn Any) -> Option<&mut dyn Any>,
    ) -> Self {
        self.parent = Some(ParentLink {
            class,
            project,
            project_mut,
        });
        self
    }

    /// 自定义 toString 文本化
    pub fn display<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> String + 'static,
    {
        self.display = Some(Rc::new(move |any: &dyn Any| match any.downcast_ref::<T>() {
            Some(v) => f(v),
            None => "<foreign object>".to_string(),
        }));
        self
    }

    /// 公开构造器。thunk 返回具体值，构建器负责装箱。
    pub fn constructor<F>(mut self, params: Vec<TypeDesc>, f: F) -> Self
    where
        F: Fn(&[HostValue]) -> Result<T, HostCallError> + 'static,
    {
        self.constructors.push(CtorEntry {
            params,
            invoke: Rc::new(move |args| Ok(HostValue::object(f(args)?))),
        });
        self
    }

    /// 公开实例方法（不可变接收者）
    pub fn method<F>(mut self, name: &'static str, params: Vec<TypeDesc>, f: F) -> Self
    where
        F: Fn(&T, &[HostValue]) -> Result<HostValue, HostCallError> + 'static,
    {
        self.methods.push(MethodEntry {
            name,
            params,
            invoke: Rc::new(move |host, args| {
                let guard = borrow_host::<T>(host)?;
                f(&guard, args)
            }),
        });
        self
    }

    /// 公开实例方法（可变接收者，setter 等）
    pub fn method_mut<F>(mut self, name: &'static str, params: Vec<TypeDesc>, f: F) -> Self
    where
        F: Fn(&mut T, &[HostValue]) -> Result<HostValue, HostCallError> + 'static,
    {
        self.methods.push(MethodEntry {
            name,
            params,
            invoke: Rc::new(move |host, args| {
                let mut guard = borrow_host_mut::<T>(host)?;
                f(&mut guard, args)
            }),
        });
        self
    }

    /// 只读公开字段
    pub fn field_get<F>(mut self, name: &'static str, ty: TypeDesc, get: F) -> Self
    where
        F: Fn(&T) -> HostValue + 'static,
    {
        self.fields.push(FieldEntry {
            name,
            ty,
            get: Rc::new(move |any| any.downcast_ref::<T>().map(&get)),
            set: None,
        });
        self
    }

    /// 可读写公开字段
    pub fn field<FG, FS>(mut self, name: &'static str, ty: TypeDesc, get: FG, set: FS) -> Self
    where
        FG: Fn(&T) -> HostValue + 'static,
        FS: Fn(&mut T, HostValue) -> Result<(), HostCallError> + 'static,
    {
        self.fields.push(FieldEntry {
            name,
            ty,
            get: Rc::new(move |any| any.downcast_ref::<T>().map(&get)),
            set: Some(Rc::new(move |any, value| {
                let target = any
                    .downcast_mut::<T>()
                    .ok_or_else(|| HostCallError::type_mismatch(std::any::type_name::<T>()))?;
                set(target, value)
            })),
        });
        self
    }

    /// 公开静态字段。值在暴露时求值。
    pub fn static_field<F>(mut self, name: &'static str, value: F) -> Self
    where
        F: Fn() -> HostValue + 'static,
    {
        self.static_fields.push(StaticFieldEntry {
            name,
            value: Rc::new(value),
        });
        self
    }

    /// 公开静态方法（单候选、严格 arity）
    pub fn static_method<F>(mut self, name: &'static str, params: Vec<TypeDesc>, f: F) -> Self
    where
        F: Fn(&[HostValue]) -> Result<HostValue, HostCallError> + 'static,
    {
        self.static_methods.push(StaticMethodEntry {
            name,
            params,
            invoke: Rc::new(f),
        });
        self
    }

    pub fn build(self) -> TypeEntry {
        let class = self.class;
        TypeEntry {
            class,
            type_id: TypeId::of::<T>(),
            parent: self.parent,
            constructors: self.constructors,
            methods: self.methods,
            fields: self.fields,
            static_fields: self.static_fields,
            static_methods: self.static_methods,
            display: self
                .display
                .unwrap_or_else(|| Rc::new(move |_| format!("<{class}>"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::host::{arg_i64, host_ref};

    struct Counter {
        count: i64,
    }

    fn counter_entry() -> TypeEntry {
        TypeEntryBuilder::<Counter>::new("test.Counter")
            .display(|c| format!("Counter({})", c.count))
            .constructor(vec![TypeDesc::I32], |args| {
                Ok(Counter {
                    count: arg_i64(args, 0)?,
                })
            })
            .method("getCount", vec![], |c, _| Ok(HostValue::Int(c.count)))
            .method_mut("add", vec![TypeDesc::I32], |c, args| {
                c.count += arg_i64(args, 0)?;
                Ok(HostValue::Int(c.count))
            })
            .field(
                "count",
                TypeDesc::I64,
                |c| HostValue::Int(c.count),
                |c, v| {
                    c.count = v.as_i64().ok_or_else(|| HostCallError::type_mismatch("i64"))?;
                    Ok(())
                },
            )
            .build()
    }

    #[test]
    fn test_builder_orders_members() {
        let entry = counter_entry();
        assert_eq!(entry.constructors.len(), 1);
        assert_eq!(entry.methods[0].name, "getCount");
        assert_eq!(entry.methods[1].name, "add");
        assert_eq!(entry.fields[0].name, "count");
    }

    #[test]
    fn test_method_thunk_round_trip() {
        let entry = counter_entry();
        let host = host_ref(Counter { count: 5 });

        let result = (entry.methods[0].invoke)(&host, &[]).unwrap();
        assert_eq!(result.as_i64(), Some(5));

        let result = (entry.methods[1].invoke)(&host, &[HostValue::Int(3)]).unwrap();
        assert_eq!(result.as_i64(), Some(8));
    }

    #[test]
    fn test_field_thunks() {
        let entry = counter_entry();
        let mut value = Counter { count: 1 };

        let field = &entry.fields[0];
        assert_eq!((field.get)(&value).unwrap().as_i64(), Some(1));

        let set = field.set.as_ref().unwrap();
        set(&mut value, HostValue::Int(9)).unwrap();
        assert_eq!(value.count, 9);
    }

    #[test]
    fn test_constructor_thunk() {
        let entry = counter_entry();
        let out = (entry.constructors[0].invoke)(&[HostValue::Int(4)]).unwrap();
        let host = out.as_object().unwrap();
        assert_eq!(borrow_host::<Counter>(host).unwrap().count, 4);
    }

    #[test]
    fn test_display_and_default_display() {
        let entry = counter_entry();
        let value = Counter { count: 2 };
        assert_eq!((entry.display)(&value), "Counter(2)");

        let plain = TypeEntryBuilder::<Counter>::new("test.Plain").build();
        assert_eq!((plain.display)(&value), "<test.Plain>");
    }
}
