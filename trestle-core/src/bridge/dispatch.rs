//! 成员派发：属性读取、属性赋值、重载调用
//!
//! 读取按固定顺序尝试：内建名、同名方法组、访问器（get/is 前缀）、
//! 公开字段（沿祖先链）、Nil 兜底。赋值只认 set 前缀方法和可写字段，
//! 全部失败报 `NoSetterOrField`。
//!
//! 重载解析不做最优匹配：按注册顺序取第一个 arity 相符且参数全部
//! 可转换的候选。转换成功后宿主调用若失败，立即中止，不再回退到
//! 后续候选。

use std::rc::Rc;

use crate::bridge::coerce::coerce;
use crate::bridge::marshal::to_script;
use crate::bridge::BridgeCtx;
use crate::core::error::DispatchError;
use crate::core::value::{Callable, DynamicValue, HandleId};
use crate::registry::{HostRef, MethodEntry};

/// 读取句柄对象的属性
pub fn get_attr(
    ctx: &Rc<BridgeCtx>,
    id: HandleId,
    name: &str,
) -> Result<DynamicValue, DispatchError> {
    let slot = ctx.slot(id)?;

    // 内建名优先于宿主成员
    match name {
        "toString" => {
            let host = slot.host.clone();
            let display = slot.entry.as_ref().map(|e| Rc::clone(&e.display));
            return Ok(DynamicValue::Callable(Callable::new(
                "toString",
                move |_args| {
                    let guard = host.borrow();
                    let text = match &display {
                        Some(d) => d(&*guard),
                        None => "<object>".to_string(),
                    };
                    Ok(DynamicValue::Text(text))
                },
            )));
        }
        "getClass" => {
            let class = slot
                .entry
                .as_ref()
                .map(|e| e.class)
                .unwrap_or("<unregistered>");
            return Ok(DynamicValue::Callable(Callable::new(
                "getClass",
                move |_args| Ok(DynamicValue::Text(class.to_string())),
            )));
        }
        _ => {}
    }

    let Some(entry) = slot.entry.as_ref() else {
        // 未注册类型没有可发现的成员
        return Ok(DynamicValue::Nil);
    };

    // 同名方法组：打包为延迟调用的重载派发闭包
    let exact = entry.methods_named(name);
    if !exact.is_empty() {
        return Ok(method_callable(ctx, &slot.host, name, exact));
    }

    // 访问器搜索：name 或 get<Name> 形式都映射到 get/is 前缀方法
    let prop = if let Some(rest) = name.strip_prefix("get").filter(|r| !r.is_empty()) {
        rest.to_string()
    } else {
        capitalize(name)
    };
    let getter = format!("get{prop}");
    let tester = format!("is{prop}");
    let accessors: Vec<MethodEntry> = entry
        .methods
        .iter()
        .filter(|m| m.name == getter || m.name == tester)
        .cloned()
        .collect();
    if !accessors.is_empty() {
        // 零参访问器按属性语义立即求值
        if let Some(zero) = accessors.iter().find(|m| m.arity() == 0) {
            let out =
                (zero.invoke)(&slot.host, &[]).map_err(|e| DispatchError::host_call(zero.name, e))?;
            return Ok(to_script(ctx, out));
        }
        return Ok(method_callable(ctx, &slot.host, name, accessors));
    }

    // 公开字段，沿祖先链向上投影
    {
        let guard = slot.host.borrow();
        let mut cur: &dyn std::any::Any = &*guard;
        let mut entry = Rc::clone(entry);
        loop {
            for field in &entry.fields {
                if field.name == name {
                    if let Some(v) = (field.get)(cur) {
                        return Ok(to_script(ctx, v));
                    }
                }
            }
            let Some(link) = entry.parent.as_ref() else {
                break;
            };
            let (class, project) = (link.class, link.project);
            let Some(next) = project(cur) else {
                break;
            };
            let Some(parent_entry) = ctx.registry().get(class).cloned() else {
                break;
            };
            cur = next;
            entry = parent_entry;
        }
    }

    // 未知属性不报错，读到 Nil
    tracing::trace!(
        target: "trestle::dispatch",
        class = entry.class,
        name,
        "attribute not found, yielding nil"
    );
    Ok(DynamicValue::Nil)
}

/// 对句柄对象的属性赋值
pub fn set_attr(
    ctx: &Rc<BridgeCtx>,
    id: HandleId,
    name: &str,
    value: &DynamicValue,
) -> Result<(), DispatchError> {
    let slot = ctx.slot(id)?;
    let Some(entry) = slot.entry.as_ref() else {
        return Err(DispatchError::NoSetterOrField(name.to_string()));
    };

    // set<Name> 单参方法优先于字段
    let setter = format!("set{}", capitalize(name));
    if let Some(method) = entry
        .methods
        .iter()
        .find(|m| m.name == setter && m.arity() == 1)
    {
        let arg = coerce(ctx, value, &method.params[0]).map_err(|e| {
            DispatchError::ArgumentCoercion {
                name: setter.clone(),
                index: 0,
                source: e,
            }
        })?;
        (method.invoke)(&slot.host, &[arg])
            .map_err(|e| DispatchError::host_call(&setter, e))?;
        return Ok(());
    }

    // 可写字段，沿祖先链向上投影
    let mut guard = slot.host.borrow_mut();
    let mut cur: &mut dyn std::any::Any = &mut *guard;
    let mut entry = Rc::clone(entry);
    loop {
        let found = entry
            .fields
            .iter()
            .position(|f| f.name == name && f.set.is_some());
        if let Some(i) = found {
            let field = &entry.fields[i];
            let v = coerce(ctx, value, &field.ty).map_err(|e| DispatchError::ArgumentCoercion {
                name: name.to_string(),
                index: 0,
                source: e,
            })?;
            let set = field.set.as_ref().unwrap();
            set(&mut *cur, v).map_err(|e| DispatchError::host_call(name, e))?;
            return Ok(());
        }
        let Some(link) = entry.parent.as_ref() else {
            break;
        };
        let (class, project_mut) = (link.class, link.project_mut);
        let Some(parent_entry) = ctx.registry().get(class).cloned() else {
            break;
        };
        cur = match project_mut(cur) {
            Some(next) => next,
            None => break,
        };
        entry = parent_entry;
    }

    Err(DispatchError::NoSetterOrField(name.to_string()))
}

/// 把同名候选组打包为脚本可调用值
fn method_callable(
    ctx: &Rc<BridgeCtx>,
    host: &HostRef,
    name: &str,
    candidates: Vec<MethodEntry>,
) -> DynamicValue {
    let ctx = Rc::clone(ctx);
    let host = host.clone();
    let name: Rc<str> = name.into();
    let closure_name = Rc::clone(&name);
    DynamicValue::Callable(Callable::new(name, move |args| {
        call_overloads(&ctx, &host, &closure_name, &candidates, args)
    }))
}

/// 重载派发：arity 过滤 + 注册顺序候选搜索
pub fn call_overloads(
    ctx: &Rc<BridgeCtx>,
    host: &HostRef,
    name: &str,
    candidates: &[MethodEntry],
    args: &[DynamicValue],
) -> Result<DynamicValue, DispatchError> {
    'candidates: for method in candidates {
        if method.arity() != args.len() {
            continue;
        }
        let mut coerced = Vec::with_capacity(args.len());
        for (index, (arg, ty)) in args.iter().zip(&method.params).enumerate() {
            match coerce(ctx, arg, ty) {
                Ok(v) => coerced.push(v),
                Err(failure) => {
                    tracing::trace!(
                        target: "trestle::dispatch",
                        name,
                        index,
                        %failure,
                        "overload candidate rejected"
                    );
                    continue 'candidates;
                }
            }
        }
        // 转换已成功：宿主失败即派发失败，不再回退
        let out = (method.invoke)(host, &coerced)
            .map_err(|e| DispatchError::host_call(method.name, e))?;
        return Ok(to_script(ctx, out));
    }
    Err(DispatchError::NoMatchingMethod {
        name: name.to_string(),
        candidates: candidates.len(),
    })
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
