//! 宿主侧值表示
//!
//! `HostValue` 是转换引擎的输出、thunk 的参数与返回值：按目标宽度截断后
//! 的静态形状值。宽整数统一携带为 `Int(i64)`，由 thunk 收窄到自己声明的
//! 参数宽度。不透明对象以 `Rc<RefCell<dyn Any>>` 共享所有权，不跨边界
//! 裸别名。

use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use crate::core::error::HostCallError;

/// 宿主对象引用。单线程模型，内部可变性用 RefCell。
pub type HostRef = Rc<RefCell<dyn Any>>;

/// 把一个具体值装入共享宿主引用
pub fn host_ref<T: 'static>(value: T) -> HostRef {
    Rc::new(RefCell::new(value))
}

/// 转换后的宿主侧值
#[derive(Clone)]
pub enum HostValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Char(char),
    Text(String),
    Seq(Vec<HostValue>),
    Map(Vec<(HostValue, HostValue)>),
    Object(HostRef),
}

impl HostValue {
    /// 把一个具体宿主对象包为 Object
    pub fn object<T: 'static>(value: T) -> HostValue {
        HostValue::Object(host_ref(value))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            HostValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            HostValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            HostValue::Float(n) => Some(*n),
            HostValue::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_char(&self) -> Option<char> {
        match self {
            HostValue::Char(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            HostValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[HostValue]> {
        match self {
            HostValue::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&HostRef> {
        match self {
            HostValue::Object(r) => Some(r),
            _ => None,
        }
    }
}

impl fmt::Debug for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostValue::Null => write!(f, "Null"),
            HostValue::Bool(b) => write!(f, "Bool({b})"),
            HostValue::Int(n) => write!(f, "Int({n})"),
            HostValue::Float(n) => write!(f, "Float({n})"),
            HostValue::Char(c) => write!(f, "Char({c:?})"),
            HostValue::Text(s) => write!(f, "Text({s:?})"),
            HostValue::Seq(items) => f.debug_tuple("Seq").field(items).finish(),
            HostValue::Map(entries) => write!(f, "Map({} entries)", entries.len()),
            HostValue::Object(_) => write!(f, "Object(..)"),
        }
    }
}

// ==================== thunk 参数提取辅助 ====================

/// 按位置取 i64 参数（注册代码对照自己声明的 TypeDesc 使用）
pub fn arg_i64(args: &[HostValue], index: usize) -> Result<i64, HostCallError> {
    args.get(index)
        .and_then(HostValue::as_i64)
        .ok_or_else(|| HostCallError::type_mismatch("an integer argument"))
}

pub fn arg_f64(args: &[HostValue], index: usize) -> Result<f64, HostCallError> {
    args.get(index)
        .and_then(HostValue::as_f64)
        .ok_or_else(|| HostCallError::type_mismatch("a numeric argument"))
}

pub fn arg_bool(args: &[HostValue], index: usize) -> Result<bool, HostCallError> {
    args.get(index)
        .and_then(HostValue::as_bool)
        .ok_or_else(|| HostCallError::type_mismatch("a boolean argument"))
}

pub fn arg_text<'a>(args: &'a [HostValue], index: usize) -> Result<&'a str, HostCallError> {
    args.get(index)
        .and_then(HostValue::as_text)
        .ok_or_else(|| HostCallError::type_mismatch("a text argument"))
}

pub fn arg_seq<'a>(args: &'a [HostValue], index: usize) -> Result<&'a [HostValue], HostCallError> {
    args.get(index)
        .and_then(HostValue::as_seq)
        .ok_or_else(|| HostCallError::type_mismatch("a sequence argument"))
}

/// 按具体类型借出宿主对象参数
pub fn arg_object<T: 'static>(
    args: &[HostValue],
    index: usize,
) -> Result<Ref<'_, T>, HostCallError> {
    let r = args
        .get(index)
        .and_then(HostValue::as_object)
        .ok_or_else(|| HostCallError::type_mismatch("an object argument"))?;
    borrow_host::<T>(r)
}

/// 以具体类型 `T` 借出宿主引用
pub fn borrow_host<T: 'static>(r: &HostRef) -> Result<Ref<'_, T>, HostCallError> {
    Ref::filter_map(r.borrow(), |any| any.downcast_ref::<T>())
        .map_err(|_| HostCallError::type_mismatch(std::any::type_name::<T>()))
}

/// 以具体类型 `T` 可变借出宿主引用
pub fn borrow_host_mut<T: 'static>(r: &HostRef) -> Result<RefMut<'_, T>, HostCallError> {
    RefMut::filter_map(r.borrow_mut(), |any| any.downcast_mut::<T>())
        .map_err(|_| HostCallError::type_mismatch(std::any::type_name::<T>()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        assert_eq!(HostValue::Int(3).as_i64(), Some(3));
        assert_eq!(HostValue::Int(3).as_f64(), Some(3.0));
        assert_eq!(HostValue::Float(2.5).as_f64(), Some(2.5));
        assert_eq!(HostValue::Float(2.5).as_i64(), None);
        assert_eq!(HostValue::Text("x".into()).as_text(), Some("x"));
    }

    #[test]
    fn test_borrow_host() {
        let r = host_ref(42u32);
        assert_eq!(*borrow_host::<u32>(&r).unwrap(), 42);
        assert!(borrow_host::<String>(&r).is_err());
    }

    #[test]
    fn test_borrow_host_mut() {
        let r = host_ref(String::from("a"));
        borrow_host_mut::<String>(&r).unwrap().push('b');
        assert_eq!(*borrow_host::<String>(&r).unwrap(), "ab");
    }

    #[test]
    fn test_arg_helpers() {
        let args = vec![
            HostValue::Int(1),
            HostValue::Text("t".into()),
            HostValue::Bool(true),
        ];
        assert_eq!(arg_i64(&args, 0).unwrap(), 1);
        assert_eq!(arg_text(&args, 1).unwrap(), "t");
        assert!(arg_bool(&args, 2).unwrap());
        assert!(arg_i64(&args, 1).is_err());
        assert!(arg_f64(&args, 5).is_err());
    }
}
