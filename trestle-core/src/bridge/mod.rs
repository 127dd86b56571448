//! Bridge 层：转换、封送、派发
//!
//! `BridgeCtx` 是桥接范围内唯一的配置/状态对象：注册表、基础类型表、
//! 句柄表。构造一次，此后配置部分只读；没有进程级全局状态。

pub mod coerce;
pub mod construct;
pub mod dispatch;
pub mod expose;
pub mod handle;
pub mod marshal;

pub use handle::{HandleSlot, HandleTable};

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::error::DispatchError;
use crate::core::value::HandleId;
use crate::registry::{HostRef, PrimitiveTable, TypeRegistry};

/// 桥接上下文。注册表与基础类型表在构造后不再变化；句柄表单线程内
/// 通过 RefCell 写入。
pub struct BridgeCtx {
    registry: TypeRegistry,
    primitives: PrimitiveTable,
    handles: RefCell<HandleTable>,
}

impl BridgeCtx {
    pub fn new(registry: TypeRegistry) -> Rc<Self> {
        Rc::new(Self {
            registry,
            primitives: PrimitiveTable::new(),
            handles: RefCell::new(HandleTable::new()),
        })
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn primitives(&self) -> &PrimitiveTable {
        &self.primitives
    }

    /// 把宿主对象装入句柄表，注册表条目按运行时类型解析
    pub fn wrap(&self, host: HostRef) -> HandleId {
        let entry = {
            let borrowed = host.borrow();
            self.registry.entry_for(&*borrowed).cloned()
        };
        if entry.is_none() {
            tracing::debug!(
                target: "trestle::marshal",
                "wrapping host value of unregistered type"
            );
        }
        self.handles.borrow_mut().insert(host, entry)
    }

    /// 解析句柄。伪造/越界 id 报 StaleHandle。
    pub fn slot(&self, id: HandleId) -> Result<HandleSlot, DispatchError> {
        self.handles
            .borrow()
            .get(id)
            .cloned()
            .ok_or(DispatchError::StaleHandle(id))
    }

    /// 当前句柄数（测试与诊断用）
    pub fn handle_count(&self) -> usize {
        self.handles.borrow().len()
    }
}
