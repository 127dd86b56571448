//! 集成测试共享夹具：一个小型宿主类型库
//!
//! Shape 是基类型，Rect 通过父链接挂在它下面。Library 汇集了重载、
//! 访问器和静态面，覆盖派发层的各条路径。

use std::any::Any;
use std::rc::Rc;

use trestle_core::registry::arg_f64;
use trestle_core::{
    host_ref, BridgeCtx, DynamicValue, HandleId, HostCallError, HostValue, TypeDesc,
    TypeEntryBuilder, TypeRegistry,
};

pub struct Shape {
    pub name: String,
}

pub struct Rect {
    pub shape: Shape,
    pub width: f64,
    pub height: f64,
}

pub struct Library {
    pub shapes: Vec<String>,
}

pub fn build_registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();

    registry.register(
        TypeEntryBuilder::<Shape>::new("fixture.Shape")
            .constructor(vec![TypeDesc::Text], |args| {
                Ok(Shape {
                    name: args[0]
                        .as_text()
                        .ok_or_else(|| HostCallError::type_mismatch("text"))?
                        .to_string(),
                })
            })
            .method("getName", vec![], |s, _| Ok(HostValue::Text(s.name.clone())))
            .field_get("name", TypeDesc::Text, |s| HostValue::Text(s.name.clone()))
            .build(),
    );

    registry.register(
        TypeEntryBuilder::<Rect>::new("fixture.Rect")
            .parent(
                "fixture.Shape",
                |any: &dyn Any| any.downcast_ref::<Rect>().map(|r| &r.shape as &dyn Any),
                |any: &mut dyn Any| {
                    any.downcast_mut::<Rect>()
                        .map(|r| &mut r.shape as &mut dyn Any)
                },
            )
            .display(|r| format!("Rect {}x{}", r.width, r.height))
            .constructor(vec![TypeDesc::F64, TypeDesc::F64], |args| {
                Ok(Rect {
                    shape: Shape {
                        name: "rect".into(),
                    },
                    width: arg_f64(args, 0)?,
                    height: arg_f64(args, 1)?,
                })
            })
            .method("getArea", vec![], |r, _| {
                Ok(HostValue::Float(r.width * r.height))
            })
            .method_mut("setWidth", vec![TypeDesc::F64], |r, args| {
                r.width = arg_f64(args, 0)?;
                Ok(HostValue::Null)
            })
            .method("isSquare", vec![], |r, _| {
                Ok(HostValue::Bool(r.width == r.height))
            })
            .method("scale", vec![TypeDesc::F64], |r, args| {
                Ok(HostValue::object(Rect {
                    shape: Shape {
                        name: r.shape.name.clone(),
                    },
                    width: r.width * arg_f64(args, 0)?,
                    height: r.height * arg_f64(args, 0)?,
                }))
            })
            .field(
                "height",
                TypeDesc::F64,
                |r| HostValue::Float(r.height),
                |r, v| {
                    r.height = v
                        .as_f64()
                        .ok_or_else(|| HostCallError::type_mismatch("f64"))?;
                    Ok(())
                },
            )
            .build(),
    );

    // probe 的两个候选都接受 Number 参数，顺序决定胜者：Text 先注册
    registry.register(
        TypeEntryBuilder::<Library>::new("fixture.Library")
            .constructor(vec![], |_| Ok(Library { shapes: Vec::new() }))
            .method("probe", vec![TypeDesc::Text], |_, _| Ok(HostValue::Int(1)))
            .method("probe", vec![TypeDesc::I32], |_, _| Ok(HostValue::Int(2)))
            .method(
                "register",
                vec![TypeDesc::Object("fixture.Shape")],
                |_, args| {
                    // 可赋值性按类名判定，thunk 自己对子类型做向下转型
                    let obj = args[0]
                        .as_object()
                        .ok_or_else(|| HostCallError::type_mismatch("an object"))?;
                    let guard = obj.borrow();
                    let name = if let Some(s) = guard.downcast_ref::<Shape>() {
                        s.name.clone()
                    } else if let Some(r) = guard.downcast_ref::<Rect>() {
                        r.shape.name.clone()
                    } else {
                        return Err(HostCallError::type_mismatch("a shape"));
                    };
                    Ok(HostValue::Text(name))
                },
            )
            .method("listAll", vec![], |lib, _| {
                Ok(HostValue::Seq(
                    lib.shapes
                        .iter()
                        .map(|s| HostValue::Text(s.clone()))
                        .collect(),
                ))
            })
            .static_field("VERSION", || HostValue::Int(3))
            .static_method("describe", vec![TypeDesc::Text], |args| {
                Ok(HostValue::Text(format!(
                    "library: {}",
                    args[0]
                        .as_text()
                        .ok_or_else(|| HostCallError::type_mismatch("text"))?
                )))
            })
            .build(),
    );

    registry
}

pub fn bridge() -> Rc<BridgeCtx> {
    BridgeCtx::new(build_registry())
}

pub fn wrap_rect(ctx: &Rc<BridgeCtx>, width: f64, height: f64) -> HandleId {
    ctx.wrap(host_ref(Rect {
        shape: Shape {
            name: "rect".into(),
        },
        width,
        height,
    }))
}

pub fn number(n: f64) -> DynamicValue {
    DynamicValue::Number(n)
}

pub fn text(s: &str) -> DynamicValue {
    DynamicValue::Text(s.to_string())
}
