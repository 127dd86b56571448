//! Trestle API - Bridge facade layer
//!
//! Provides the unified bridge surface the script driver talks to:
//! - facade operations (`open`, `new_instance`, `instance_of`, `class_of`)
//! - the preloaded class namespace and `install()` entry table
//! - configuration abstraction (RunConfig) with a global singleton for CLI use
//! - unified error handling (TrestleError)
//!
//! For library use, prefer constructing a `Bridge` explicitly over the
//! global singleton API.

use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use trestle_core::bridge::{construct, dispatch, expose, marshal};
use trestle_core::{
    BridgeCtx, Callable, DynamicValue, HostValue, LimitConfig, MapKey, TypeRegistry,
};
use trestle_swf::WELL_KNOWN_CLASSES;

// Re-export config
pub mod config;
pub use config::{config as get_config, init as init_config, is_initialized, RunConfig};

// Re-export error and types
pub mod error;
pub mod types;
pub use error::{DispatchError, ErrorReport, TrestleError};
pub use types::OpenOutput;

// Re-export the shared vocabulary
pub use trestle_config::{BridgeOptions, Phase};
pub use trestle_core::{HandleId, HostRef, TypeDesc};

/// 桥接门面。持有注册表、句柄表和预加载的类命名空间。
pub struct Bridge {
    ctx: Rc<BridgeCtx>,
    limits: LimitConfig,
    classes: HashMap<MapKey, DynamicValue>,
}

impl Bridge {
    /// 用默认注册（全部 SWF 类型）构造桥接
    pub fn new(options: BridgeOptions) -> Self {
        let mut registry = TypeRegistry::new();
        trestle_swf::register_all(&mut registry);
        Self::with_registry(registry, options)
    }

    /// 用调用方提供的注册表构造桥接（测试和嵌入方使用）
    pub fn with_registry(registry: TypeRegistry, options: BridgeOptions) -> Self {
        let ctx = BridgeCtx::new(registry);

        // 预加载命名空间：每个类名一个静态 Mapping
        let preload: Vec<&str> = if options.preload.is_empty() {
            WELL_KNOWN_CLASSES.to_vec()
        } else {
            options.preload.iter().map(String::as_str).collect()
        };
        let mut classes = HashMap::new();
        for class in preload {
            match ctx.registry().get(class).cloned() {
                Some(entry) => {
                    classes.insert(
                        MapKey::Text(class.to_string()),
                        expose::expose_class(&ctx, &entry),
                    );
                }
                None => {
                    tracing::warn!(
                        target: "trestle::facade",
                        class,
                        "preload class not in registry, skipping"
                    );
                }
            }
        }
        tracing::info!(
            target: "trestle::facade",
            classes = classes.len(),
            registered = ctx.registry().len(),
            "bridge initialized"
        );

        Self {
            ctx,
            limits: options.limits,
            classes,
        }
    }

    pub fn ctx(&self) -> &Rc<BridgeCtx> {
        &self.ctx
    }

    /// 把任意宿主值装为脚本句柄（嵌入方和测试使用）
    pub fn wrap<T: 'static>(&self, value: T) -> DynamicValue {
        marshal::to_script(&self.ctx, HostValue::object(value))
    }

    // ==================== 门面操作 ====================

    /// 打开并解析 SWF 文件。脚本侧永远拿到句柄或 Nil，从不拿到错误。
    pub fn open(&self, path: impl AsRef<Path>) -> DynamicValue {
        self.open_detailed(path).value
    }

    /// `open` 的带诊断变体
    pub fn open_detailed(&self, path: impl AsRef<Path>) -> OpenOutput {
        open_impl(&self.ctx, &self.limits, path.as_ref())
    }

    /// 按类名构造实例
    pub fn new_instance(
        &self,
        class: &str,
        args: &[DynamicValue],
    ) -> Result<DynamicValue, TrestleError> {
        Ok(construct::new_instance(&self.ctx, class, args)?)
    }

    /// 值是否为指定类（或其祖先类）的实例。非句柄输入和未知类名
    /// 一律 false，从不报错。
    pub fn instance_of(&self, value: &DynamicValue, class: &str) -> bool {
        let Some(id) = value.as_handle() else {
            return false;
        };
        let Ok(slot) = self.ctx.slot(id) else {
            return false;
        };
        let Some(entry) = slot.entry.as_ref() else {
            return false;
        };
        self.ctx.registry().is_assignable(entry, class)
    }

    /// 按需暴露一个类的静态命名空间。每次调用都重新构建。
    /// 基础类型名（i32、text 等）不是类，按未知类处理。
    pub fn class_of(&self, class: &str) -> Result<DynamicValue, TrestleError> {
        if self.ctx.primitives().contains(class) {
            return Err(DispatchError::ClassNotFound(class.to_string()).into());
        }
        let entry = self
            .ctx
            .registry()
            .get(class)
            .cloned()
            .ok_or_else(|| DispatchError::ClassNotFound(class.to_string()))?;
        Ok(expose::expose_class(&self.ctx, &entry))
    }

    /// 预加载的类命名空间（构造时建好，这里按值克隆）
    pub fn classes(&self) -> DynamicValue {
        DynamicValue::Mapping(self.classes.clone())
    }

    /// 读取句柄对象的属性
    pub fn get_attr(
        &self,
        value: &DynamicValue,
        name: &str,
    ) -> Result<DynamicValue, TrestleError> {
        let id = value.as_handle().ok_or_else(|| {
            TrestleError::Script(format!("attribute access on {} value", value.tag_name()))
        })?;
        Ok(dispatch::get_attr(&self.ctx, id, name)?)
    }

    /// 对句柄对象的属性赋值
    pub fn set_attr(
        &self,
        value: &DynamicValue,
        name: &str,
        new_value: &DynamicValue,
    ) -> Result<(), TrestleError> {
        let id = value.as_handle().ok_or_else(|| {
            TrestleError::Script(format!("attribute access on {} value", value.tag_name()))
        })?;
        Ok(dispatch::set_attr(&self.ctx, id, name, new_value)?)
    }

    /// 调用一个可调用值
    pub fn call(
        &self,
        value: &DynamicValue,
        args: &[DynamicValue],
    ) -> Result<DynamicValue, TrestleError> {
        let callable = value
            .as_callable()
            .ok_or(DispatchError::NotCallable(value.tag_name()))?;
        Ok(callable.invoke(args)?)
    }

    /// 构建脚本可见的入口命名空间：open、newInstance、instanceOf、class
    pub fn install(&self) -> DynamicValue {
        let mut ns = HashMap::new();

        let ctx = Rc::clone(&self.ctx);
        let limits = self.limits.clone();
        ns.insert(
            MapKey::Text("open".into()),
            DynamicValue::Callable(Callable::new("open", move |args: &[DynamicValue]| {
                let Some(path) = args.first().and_then(DynamicValue::as_text) else {
                    tracing::warn!(target: "trestle::facade", "open called without a path");
                    return Ok(DynamicValue::Nil);
                };
                Ok(open_impl(&ctx, &limits, Path::new(path)).value)
            })),
        );

        let ctx = Rc::clone(&self.ctx);
        ns.insert(
            MapKey::Text("newInstance".into()),
            DynamicValue::Callable(Callable::new(
                "newInstance",
                move |args: &[DynamicValue]| {
                    let Some(class) = args.first().and_then(DynamicValue::as_text) else {
                        return Err(DispatchError::WrongArgumentCount {
                            name: "newInstance".into(),
                            expected: 1,
                            got: args.len(),
                        });
                    };
                    construct::new_instance(&ctx, class, &args[1..])
                },
            )),
        );

        let ctx = Rc::clone(&self.ctx);
        ns.insert(
            MapKey::Text("instanceOf".into()),
            DynamicValue::Callable(Callable::new(
                "instanceOf",
                move |args: &[DynamicValue]| {
                    let class = args.get(1).and_then(DynamicValue::as_text);
                    let result = match (args.first().and_then(DynamicValue::as_handle), class) {
                        (Some(id), Some(class)) => ctx
                            .slot(id)
                            .ok()
                            .and_then(|slot| slot.entry)
                            .map(|entry| ctx.registry().is_assignable(&entry, class))
                            .unwrap_or(false),
                        _ => false,
                    };
                    Ok(DynamicValue::Bool(result))
                },
            )),
        );

        let ctx = Rc::clone(&self.ctx);
        ns.insert(
            MapKey::Text("class".into()),
            DynamicValue::Callable(Callable::new("class", move |args: &[DynamicValue]| {
                let Some(class) = args.first().and_then(DynamicValue::as_text) else {
                    return Err(DispatchError::WrongArgumentCount {
                        name: "class".into(),
                        expected: 1,
                        got: args.len(),
                    });
                };
                let entry = ctx
                    .registry()
                    .get(class)
                    .cloned()
                    .ok_or_else(|| DispatchError::ClassNotFound(class.to_string()))?;
                Ok(expose::expose_class(&ctx, &entry))
            })),
        );

        DynamicValue::Mapping(ns)
    }
}

impl Default for Bridge {
    fn default() -> Self {
        Self::new(BridgeOptions::default())
    }
}

fn open_impl(ctx: &Rc<BridgeCtx>, limits: &LimitConfig, path: &Path) -> OpenOutput {
    match trestle_swf::parse_file(path, limits) {
        Ok(swf) => {
            tracing::info!(
                target: "trestle::facade",
                path = %path.display(),
                version = swf.version,
                tags = swf.tag_count(),
                "opened SWF"
            );
            OpenOutput {
                value: marshal::to_script(ctx, HostValue::object(swf)),
                diagnostic: None,
            }
        }
        Err(e) => {
            tracing::warn!(
                target: "trestle::facade",
                path = %path.display(),
                error = %e,
                "failed to open SWF"
            );
            OpenOutput {
                value: DynamicValue::Nil,
                diagnostic: Some(e.to_string()),
            }
        }
    }
}
