//! Trestle SWF - 演示用宿主对象模型
//!
//! 桥接层暴露的"领域库"：一个最小的 SWF 容器解析器（签名、版本、
//! 文件长度、tag 记录），以及它的类型向注册表的手写注册。
//! 这里只建模容器结构，不做任何 tag 内容反编译。

pub mod error;
pub mod model;
pub mod parser;
pub mod register;

pub use error::SwfError;
pub use model::{tag_name, Color, Swf, Tag, TagCode};
pub use parser::{parse, parse_file};
pub use register::{register_all, WELL_KNOWN_CLASSES};
