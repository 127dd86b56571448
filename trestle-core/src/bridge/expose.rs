//! 静态命名空间暴露
//!
//! 把一个类型的静态字段和静态方法打包为脚本侧的 Mapping。静态字段
//! 在暴露时求值一次；静态方法是严格 arity 的单候选调用。字段与方法
//! 重名时按插入顺序后者覆盖前者（方法胜出）。

use std::collections::HashMap;
use std::rc::Rc;

use crate::bridge::coerce::coerce;
use crate::bridge::marshal::to_script;
use crate::bridge::BridgeCtx;
use crate::core::error::DispatchError;
use crate::core::value::{Callable, DynamicValue, MapKey};
use crate::registry::{StaticMethodEntry, TypeEntry};

/// 把类型条目的静态面暴露为 Mapping
pub fn expose_class(ctx: &Rc<BridgeCtx>, entry: &Rc<TypeEntry>) -> DynamicValue {
    let mut namespace = HashMap::new();
    for field in &entry.static_fields {
        namespace.insert(
            MapKey::Text(field.name.to_string()),
            to_script(ctx, (field.value)()),
        );
    }
    for method in &entry.static_methods {
        namespace.insert(
            MapKey::Text(method.name.to_string()),
            DynamicValue::Callable(static_callable(ctx, method)),
        );
    }
    tracing::debug!(
        target: "trestle::facade",
        class = entry.class,
        entries = namespace.len(),
        "exposed static namespace"
    );
    DynamicValue::Mapping(namespace)
}

fn static_callable(ctx: &Rc<BridgeCtx>, method: &StaticMethodEntry) -> Callable {
    let ctx = Rc::clone(ctx);
    let name = method.name;
    let params = method.params.clone();
    let invoke = Rc::clone(&method.invoke);
    Callable::new(name, move |args: &[DynamicValue]| {
        if args.len() != params.len() {
            return Err(DispatchError::WrongArgumentCount {
                name: name.to_string(),
                expected: params.len(),
                got: args.len(),
            });
        }
        let mut coerced = Vec::with_capacity(args.len());
        for (index, (arg, ty)) in args.iter().zip(&params).enumerate() {
            let v = coerce(&ctx, arg, ty).map_err(|e| DispatchError::ArgumentCoercion {
                name: name.to_string(),
                index,
                source: e,
            })?;
            coerced.push(v);
        }
        let out = invoke(&coerced).map_err(|e| DispatchError::host_call(name, e))?;
        Ok(to_script(&ctx, out))
    })
}
