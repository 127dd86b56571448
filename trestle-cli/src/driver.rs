//! JSON 脚本驱动
//!
//! 外部脚本运行时的替身：脚本文件是一个 JSON 操作数组，按序执行。
//! 每个操作可以用 `save` 把结果存入变量环境，参数位置的 `"$name"`
//! 字符串引用已保存的变量。这只是驱动桥接的测试/演示载具，不是
//! 脚本语言。
//!
//! 操作一览：
//! - `{"op":"open","path":"a.swf","save":"swf"}`
//! - `{"op":"new","class":"swf.Color","args":[255,0,0],"save":"c"}`
//! - `{"op":"class","name":"swf.TagCode","save":"codes"}`
//! - `{"op":"instanceOf","value":"$c","class":"swf.Color","save":"ok"}`
//! - `{"op":"get","target":"$swf","name":"version","save":"v"}`
//! - `{"op":"set","target":"$c","name":"r","value":128}`
//! - `{"op":"call","target":"$m","args":[1],"save":"out"}`
//! - `{"op":"print","value":"$out"}`
//!
//! `get` 的目标既可以是句柄（走属性派发），也可以是 `class` 取回的
//! 静态命名空间 Mapping（按键读取，静态方法成员随后用 `call` 调用）。

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value as Json;

use trestle_api::{Bridge, TrestleError};
use trestle_core::{DynamicValue, MapKey};

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", deny_unknown_fields)]
enum Op {
    Open {
        path: String,
        #[serde(default)]
        save: Option<String>,
    },
    New {
        class: String,
        #[serde(default)]
        args: Vec<Json>,
        #[serde(default)]
        save: Option<String>,
    },
    Class {
        name: String,
        #[serde(default)]
        save: Option<String>,
    },
    InstanceOf {
        value: Json,
        class: String,
        #[serde(default)]
        save: Option<String>,
    },
    Get {
        target: Json,
        name: String,
        #[serde(default)]
        save: Option<String>,
    },
    Set {
        target: Json,
        name: String,
        value: Json,
    },
    Call {
        target: Json,
        #[serde(default)]
        args: Vec<Json>,
        #[serde(default)]
        save: Option<String>,
    },
    Print {
        value: Json,
    },
}

/// 脚本驱动器。持有桥接与变量环境。
pub struct Driver {
    bridge: Bridge,
    vars: HashMap<String, DynamicValue>,
    echo: bool,
}

impl Driver {
    pub fn new(bridge: Bridge, echo: bool) -> Self {
        Self {
            bridge,
            vars: HashMap::new(),
            echo,
        }
    }

    /// 读取已保存的变量（嵌入方和测试使用）
    pub fn var(&self, name: &str) -> Option<&DynamicValue> {
        self.vars.get(name)
    }

    /// 解析并执行整个脚本，遇到第一个错误即停止
    pub fn run(&mut self, source: &str) -> Result<(), TrestleError> {
        let ops: Vec<Op> = serde_json::from_str(source)
            .map_err(|e| TrestleError::Script(format!("malformed script: {e}")))?;
        tracing::info!(target: "trestle::cli", ops = ops.len(), "running script");
        for (index, op) in ops.into_iter().enumerate() {
            self.step(op)
                .map_err(|e| TrestleError::Script(format!("operation {index}: {e}")))?;
        }
        Ok(())
    }

    fn step(&mut self, op: Op) -> Result<(), TrestleError> {
        match op {
            Op::Open { path, save } => {
                let value = self.bridge.open(&path);
                self.finish(save, value);
            }
            Op::New { class, args, save } => {
                let args = self.resolve_all(&args)?;
                let value = self.bridge.new_instance(&class, &args)?;
                self.finish(save, value);
            }
            Op::Class { name, save } => {
                let value = self.bridge.class_of(&name)?;
                self.finish(save, value);
            }
            Op::InstanceOf { value, class, save } => {
                let value = self.resolve(&value)?;
                let result = DynamicValue::Bool(self.bridge.instance_of(&value, &class));
                self.finish(save, result);
            }
            Op::Get { target, name, save } => {
                let target = self.resolve(&target)?;
                // 静态命名空间是 Mapping，按键读取；句柄走属性派发
                let value = match &target {
                    DynamicValue::Mapping(entries) => entries
                        .get(&MapKey::Text(name.clone()))
                        .cloned()
                        .unwrap_or(DynamicValue::Nil),
                    _ => self.bridge.get_attr(&target, &name)?,
                };
                self.finish(save, value);
            }
            Op::Set {
                target,
                name,
                value,
            } => {
                let target = self.resolve(&target)?;
                let value = self.resolve(&value)?;
                self.bridge.set_attr(&target, &name, &value)?;
            }
            Op::Call { target, args, save } => {
                let target = self.resolve(&target)?;
                let args = self.resolve_all(&args)?;
                let value = self.bridge.call(&target, &args)?;
                self.finish(save, value);
            }
            Op::Print { value } => {
                let value = self.resolve(&value)?;
                println!("{value}");
            }
        }
        Ok(())
    }

    fn finish(&mut self, save: Option<String>, value: DynamicValue) {
        if self.echo {
            println!("=> {value}");
        }
        if let Some(name) = save {
            self.vars.insert(name, value);
        }
    }

    /// JSON 参数到 DynamicValue 的转换。`"$name"` 字符串解析为变量引用。
    fn resolve(&self, json: &Json) -> Result<DynamicValue, TrestleError> {
        Ok(match json {
            Json::Null => DynamicValue::Nil,
            Json::Bool(b) => DynamicValue::Bool(*b),
            Json::Number(n) => DynamicValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => match s.strip_prefix('$') {
                Some(name) => self
                    .vars
                    .get(name)
                    .cloned()
                    .ok_or_else(|| TrestleError::Script(format!("undefined variable: {name}")))?,
                None => DynamicValue::Text(s.clone()),
            },
            Json::Array(items) => DynamicValue::Sequence(self.resolve_all(items)?),
            Json::Object(entries) => {
                let mut out = HashMap::with_capacity(entries.len());
                for (key, value) in entries {
                    out.insert(MapKey::Text(key.clone()), self.resolve(value)?);
                }
                DynamicValue::Mapping(out)
            }
        })
    }

    fn resolve_all(&self, items: &[Json]) -> Result<Vec<DynamicValue>, TrestleError> {
        items.iter().map(|item| self.resolve(item)).collect()
    }
}
