//! SWF 类型的手写注册
//!
//! 每个暴露给脚本的类型在这里注册一次：成员按声明顺序进入注册表，
//! thunk 负责向下转型和参数收窄。这份注册就是原先靠反射发现的
//! 全部运行时类型信息。

use trestle_core::registry::{arg_i64, arg_text};
use trestle_core::{HostCallError, HostValue, TypeDesc, TypeEntryBuilder, TypeRegistry};

use crate::model::{tag_name, Color, Swf, Tag, TagCode};

/// 预加载命名空间使用的类名
pub const WELL_KNOWN_CLASSES: &[&str] = &["swf.Swf", "swf.Tag", "swf.Color", "swf.TagCode"];

/// 注册全部 SWF 类型
pub fn register_all(registry: &mut TypeRegistry) {
    registry.register(swf_entry());
    registry.register(tag_entry());
    registry.register(color_entry());
    registry.register(tag_code_entry());
}

fn swf_entry() -> trestle_core::TypeEntry {
    TypeEntryBuilder::<Swf>::new("swf.Swf")
        .display(|swf| {
            format!(
                "SWF v{} ({} tags{})",
                swf.version,
                swf.tag_count(),
                if swf.compressed { ", compressed" } else { "" }
            )
        })
        .method("getVersion", vec![], |swf, _| {
            Ok(HostValue::Int(swf.version as i64))
        })
        .method("isCompressed", vec![], |swf, _| {
            Ok(HostValue::Bool(swf.compressed))
        })
        .method("getFileLength", vec![], |swf, _| {
            Ok(HostValue::Int(swf.file_length as i64))
        })
        .method("getFrameRate", vec![], |swf, _| {
            Ok(HostValue::Float(swf.frame_rate as f64))
        })
        .method("getFrameCount", vec![], |swf, _| {
            Ok(HostValue::Int(swf.frame_count as i64))
        })
        .method("getTagCount", vec![], |swf, _| {
            Ok(HostValue::Int(swf.tag_count() as i64))
        })
        .method("getTag", vec![TypeDesc::I32], |swf, args| {
            let index = arg_i64(args, 0)?;
            swf.tag(index as usize)
                .map(|tag| HostValue::object(tag.clone()))
                .ok_or_else(|| HostCallError::new(format!("tag index out of range: {index}")))
        })
        .method("getTags", vec![], |swf, _| {
            Ok(HostValue::Seq(
                swf.tags
                    .iter()
                    .map(|tag| HostValue::object(tag.clone()))
                    .collect(),
            ))
        })
        .build()
}

fn tag_entry() -> trestle_core::TypeEntry {
    TypeEntryBuilder::<Tag>::new("swf.Tag")
        .display(|tag| format!("{}({} bytes)", tag.name(), tag.length))
        .method("getName", vec![], |tag, _| {
            Ok(HostValue::Text(tag.name().to_string()))
        })
        .method("isLongForm", vec![], |tag, _| {
            Ok(HostValue::Bool(tag.long_form))
        })
        .field_get("code", TypeDesc::I64, |tag| HostValue::Int(tag.code as i64))
        .field_get("length", TypeDesc::I64, |tag| {
            HostValue::Int(tag.length as i64)
        })
        .build()
}

fn color_entry() -> trestle_core::TypeEntry {
    TypeEntryBuilder::<Color>::new("swf.Color")
        .display(|c| c.to_hex())
        .constructor(vec![], |_| Ok(Color::default()))
        .constructor(
            vec![TypeDesc::I32, TypeDesc::I32, TypeDesc::I32],
            |args| {
                Ok(Color::new(
                    arg_i64(args, 0)? as u8,
                    arg_i64(args, 1)? as u8,
                    arg_i64(args, 2)? as u8,
                ))
            },
        )
        .constructor(
            vec![
                TypeDesc::I32,
                TypeDesc::I32,
                TypeDesc::I32,
                TypeDesc::I32,
            ],
            |args| {
                Ok(Color::with_alpha(
                    arg_i64(args, 0)? as u8,
                    arg_i64(args, 1)? as u8,
                    arg_i64(args, 2)? as u8,
                    arg_i64(args, 3)? as u8,
                ))
            },
        )
        .constructor(
            vec![TypeDesc::FixedArray(Box::new(TypeDesc::I32), 4)],
            |args| {
                let parts = args[0]
                    .as_seq()
                    .ok_or_else(|| HostCallError::type_mismatch("a component array"))?;
                let component = |i: usize| {
                    parts[i]
                        .as_i64()
                        .ok_or_else(|| HostCallError::type_mismatch("an integer component"))
                        .map(|n| n as u8)
                };
                Ok(Color::with_alpha(
                    component(0)?,
                    component(1)?,
                    component(2)?,
                    component(3)?,
                ))
            },
        )
        .method("toHex", vec![], |c, _| Ok(HostValue::Text(c.to_hex())))
        .field(
            "r",
            TypeDesc::I32,
            |c| HostValue::Int(c.r as i64),
            |c, v| {
                c.r = int_component(v)?;
                Ok(())
            },
        )
        .field(
            "g",
            TypeDesc::I32,
            |c| HostValue::Int(c.g as i64),
            |c, v| {
                c.g = int_component(v)?;
                Ok(())
            },
        )
        .field(
            "b",
            TypeDesc::I32,
            |c| HostValue::Int(c.b as i64),
            |c, v| {
                c.b = int_component(v)?;
                Ok(())
            },
        )
        .field(
            "a",
            TypeDesc::I32,
            |c| HostValue::Int(c.a as i64),
            |c, v| {
                c.a = int_component(v)?;
                Ok(())
            },
        )
        .static_method("fromHex", vec![TypeDesc::Text], |args| {
            let text = arg_text(args, 0)?;
            let hex = text.strip_prefix('#').unwrap_or(text);
            if hex.len() != 6 {
                return Err(HostCallError::new(format!("malformed hex color: {text}")));
            }
            let parse = |range: std::ops::Range<usize>| {
                u8::from_str_radix(&hex[range], 16)
                    .map_err(|_| HostCallError::new(format!("malformed hex color: {text}")))
            };
            Ok(HostValue::object(Color::new(
                parse(0..2)?,
                parse(2..4)?,
                parse(4..6)?,
            )))
        })
        .build()
}

fn tag_code_entry() -> trestle_core::TypeEntry {
    TypeEntryBuilder::<TagCode>::new("swf.TagCode")
        .static_field("END", || HostValue::Int(TagCode::END as i64))
        .static_field("SHOW_FRAME", || HostValue::Int(TagCode::SHOW_FRAME as i64))
        .static_field("DEFINE_SHAPE", || {
            HostValue::Int(TagCode::DEFINE_SHAPE as i64)
        })
        .static_field("PLACE_OBJECT", || {
            HostValue::Int(TagCode::PLACE_OBJECT as i64)
        })
        .static_field("REMOVE_OBJECT", || {
            HostValue::Int(TagCode::REMOVE_OBJECT as i64)
        })
        .static_field("SET_BACKGROUND_COLOR", || {
            HostValue::Int(TagCode::SET_BACKGROUND_COLOR as i64)
        })
        .static_field("DO_ACTION", || HostValue::Int(TagCode::DO_ACTION as i64))
        .static_field("PLACE_OBJECT2", || {
            HostValue::Int(TagCode::PLACE_OBJECT2 as i64)
        })
        .static_field("DEFINE_SPRITE", || {
            HostValue::Int(TagCode::DEFINE_SPRITE as i64)
        })
        .static_field("FRAME_LABEL", || HostValue::Int(TagCode::FRAME_LABEL as i64))
        .static_field("FILE_ATTRIBUTES", || {
            HostValue::Int(TagCode::FILE_ATTRIBUTES as i64)
        })
        .static_field("SYMBOL_CLASS", || {
            HostValue::Int(TagCode::SYMBOL_CLASS as i64)
        })
        .static_field("DO_ABC", || HostValue::Int(TagCode::DO_ABC as i64))
        .static_method("nameOf", vec![TypeDesc::I32], |args| {
            Ok(HostValue::Text(tag_name(arg_i64(args, 0)? as u16).to_string()))
        })
        .build()
}

fn int_component(v: HostValue) -> Result<u8, HostCallError> {
    v.as_i64()
        .map(|n| n as u8)
        .ok_or_else(|| HostCallError::type_mismatch("an integer component"))
}
