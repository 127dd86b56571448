//! 句柄表（arena-with-index）
//!
//! 脚本侧只持有整数 id，宿主对象装箱存放在这里，不把裸引用暴露过边界。
//! 表只增不减：句柄的销毁耦合于脚本运行时自己的内存回收，本层不建模；
//! id 从不复用。

use std::rc::Rc;

use crate::core::value::HandleId;
use crate::registry::{HostRef, TypeEntry};

/// 一个句柄槽位：宿主对象 + 它的注册表条目
///
/// entry 为 None 表示具体类型未注册：仍可包装，但派发查不到任何成员。
#[derive(Clone)]
pub struct HandleSlot {
    pub host: HostRef,
    pub entry: Option<Rc<TypeEntry>>,
}

impl std::fmt::Debug for HandleSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandleSlot")
            .field("class", &self.entry.as_ref().map(|e| e.class))
            .finish()
    }
}

/// 句柄表。单线程使用，调用方（BridgeCtx）负责内部可变性。
#[derive(Default)]
pub struct HandleTable {
    slots: Vec<HandleSlot>,
}

impl HandleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 分配一个新句柄。绑定终生不变。
    pub fn insert(&mut self, host: HostRef, entry: Option<Rc<TypeEntry>>) -> HandleId {
        let id = HandleId(self.slots.len() as u64);
        self.slots.push(HandleSlot { host, entry });
        id
    }

    pub fn get(&self, id: HandleId) -> Option<&HandleSlot> {
        self.slots.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::host_ref;

    #[test]
    fn test_insert_and_get() {
        let mut table = HandleTable::new();
        let a = table.insert(host_ref(1u32), None);
        let b = table.insert(host_ref(2u32), None);
        assert_eq!(a, HandleId(0));
        assert_eq!(b, HandleId(1));
        assert_eq!(table.len(), 2);
        assert!(table.get(a).is_some());
        assert!(table.get(HandleId(99)).is_none());
    }

    #[test]
    fn test_slot_debug_names_the_class() {
        let mut table = HandleTable::new();
        let id = table.insert(host_ref(1u32), None);
        assert_eq!(
            format!("{:?}", table.get(id).unwrap()),
            "HandleSlot { class: None }"
        );
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut table = HandleTable::new();
        let first = table.insert(host_ref(()), None);
        let second = table.insert(host_ref(()), None);
        assert_ne!(first, second);
    }
}
