//! 构造器解析
//!
//! 与方法重载同一套规则：arity 过滤 + 声明顺序候选搜索 + 转换成功后
//! 失败即中止。错误粒度区分三种情况：类不存在、没有公开构造器、
//! 有构造器但全部不匹配。

use std::rc::Rc;

use crate::bridge::coerce::coerce;
use crate::bridge::marshal::to_script;
use crate::bridge::BridgeCtx;
use crate::core::error::DispatchError;
use crate::core::value::DynamicValue;

/// 按类名构造宿主对象，返回其句柄
pub fn new_instance(
    ctx: &Rc<BridgeCtx>,
    class: &str,
    args: &[DynamicValue],
) -> Result<DynamicValue, DispatchError> {
    let entry = ctx
        .registry()
        .get(class)
        .cloned()
        .ok_or_else(|| DispatchError::ClassNotFound(class.to_string()))?;
    if entry.constructors.is_empty() {
        return Err(DispatchError::NoPublicConstructors(class.to_string()));
    }

    'candidates: for ctor in &entry.constructors {
        if ctor.params.len() != args.len() {
            continue;
        }
        let mut coerced = Vec::with_capacity(args.len());
        for (arg, ty) in args.iter().zip(&ctor.params) {
            match coerce(ctx, arg, ty) {
                Ok(v) => coerced.push(v),
                Err(_) => continue 'candidates,
            }
        }
        let out = (ctor.invoke)(&coerced)
            .map_err(|e| DispatchError::host_call(&format!("{class}.new"), e))?;
        tracing::debug!(target: "trestle::dispatch", class, "constructed host instance");
        return Ok(to_script(ctx, out));
    }

    Err(DispatchError::NoMatchingConstructor(class.to_string()))
}
