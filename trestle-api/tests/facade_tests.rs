//! 门面层端到端测试：真实文件、真实注册表

use std::path::PathBuf;

use trestle_api::{Bridge, DispatchError, TrestleError};
use trestle_core::{DynamicValue, MapKey};

/// 最小合法 SWF：零尺寸矩形、1 帧、ShowFrame + End
fn minimal_swf_bytes() -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(b"FWS");
    data.push(6);
    data.extend_from_slice(&0u32.to_le_bytes());
    data.push(0x00); // RECT: nbits = 0
    data.extend_from_slice(&(12u16 * 256).to_le_bytes());
    data.extend_from_slice(&1u16.to_le_bytes());
    data.extend_from_slice(&(1u16 << 6).to_le_bytes()); // ShowFrame
    data.extend_from_slice(&0u16.to_le_bytes()); // End
    let length = data.len() as u32;
    data[4..8].copy_from_slice(&length.to_le_bytes());
    data
}

struct TempFile(PathBuf);

impl TempFile {
    fn new(name: &str, bytes: &[u8]) -> Self {
        let mut path = std::env::temp_dir();
        path.push(format!("trestle-{}-{name}", std::process::id()));
        std::fs::write(&path, bytes).unwrap();
        Self(path)
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

fn call_member(
    bridge: &Bridge,
    target: &DynamicValue,
    name: &str,
    args: &[DynamicValue],
) -> DynamicValue {
    let member = bridge.get_attr(target, name).unwrap();
    bridge.call(&member, args).unwrap()
}

#[test]
fn test_open_and_inspect() {
    let file = TempFile::new("ok.swf", &minimal_swf_bytes());
    let bridge = Bridge::default();

    let swf = bridge.open(&file.0);
    assert!(matches!(swf, DynamicValue::Handle(_)));
    assert!(bridge.instance_of(&swf, "swf.Swf"));

    assert_eq!(
        call_member(&bridge, &swf, "getVersion", &[]),
        DynamicValue::Number(6.0)
    );
    assert_eq!(
        call_member(&bridge, &swf, "getTagCount", &[]),
        DynamicValue::Number(2.0)
    );
    // version 也通过访问器语义直接可读
    assert_eq!(
        bridge.get_attr(&swf, "version").unwrap(),
        DynamicValue::Number(6.0)
    );
}

#[test]
fn test_open_tags_are_handles() {
    let file = TempFile::new("tags.swf", &minimal_swf_bytes());
    let bridge = Bridge::default();
    let swf = bridge.open(&file.0);

    let tag = call_member(&bridge, &swf, "getTag", &[DynamicValue::Number(0.0)]);
    assert!(bridge.instance_of(&tag, "swf.Tag"));
    assert_eq!(
        call_member(&bridge, &tag, "getName", &[]),
        DynamicValue::Text("ShowFrame".into())
    );
    assert_eq!(
        bridge.get_attr(&tag, "code").unwrap(),
        DynamicValue::Number(1.0)
    );
}

#[test]
fn test_open_missing_file_yields_nil() {
    let bridge = Bridge::default();
    let out = bridge.open_detailed("/no/such/file.swf");
    assert_eq!(out.value, DynamicValue::Nil);
    assert!(!out.succeeded());
}

#[test]
fn test_open_malformed_file_yields_nil_with_diagnostic() {
    let file = TempFile::new("bad.swf", b"not a swf at all");
    let bridge = Bridge::default();
    let out = bridge.open_detailed(&file.0);
    assert_eq!(out.value, DynamicValue::Nil);
    assert!(out.diagnostic.unwrap().contains("invalid SWF signature"));
}

#[test]
fn test_open_truncated_file_yields_nil() {
    let mut bytes = minimal_swf_bytes();
    bytes.truncate(10);
    let file = TempFile::new("short.swf", &bytes);
    let bridge = Bridge::default();
    let out = bridge.open_detailed(&file.0);
    assert_eq!(out.value, DynamicValue::Nil);
    assert!(out.diagnostic.unwrap().contains("truncated"));
}

#[test]
fn test_new_instance_and_errors() {
    let bridge = Bridge::default();

    let color = bridge
        .new_instance(
            "swf.Color",
            &[
                DynamicValue::Number(255.0),
                DynamicValue::Number(128.0),
                DynamicValue::Number(0.0),
            ],
        )
        .unwrap();
    assert_eq!(
        call_member(&bridge, &color, "toHex", &[]),
        DynamicValue::Text("#ff8000".into())
    );

    // 定长数组构造器
    let color = bridge
        .new_instance(
            "swf.Color",
            &[DynamicValue::Sequence(vec![
                DynamicValue::Number(1.0),
                DynamicValue::Number(2.0),
                DynamicValue::Number(3.0),
                DynamicValue::Number(255.0),
            ])],
        )
        .unwrap();
    assert!(bridge.instance_of(&color, "swf.Color"));

    let err = bridge.new_instance("no.Such", &[]).unwrap_err();
    assert!(matches!(
        err,
        TrestleError::Dispatch(DispatchError::ClassNotFound(_))
    ));

    let err = bridge.new_instance("swf.Swf", &[]).unwrap_err();
    assert!(matches!(
        err,
        TrestleError::Dispatch(DispatchError::NoPublicConstructors(_))
    ));

    let err = bridge
        .new_instance("swf.Color", &[DynamicValue::Bool(true)])
        .unwrap_err();
    assert!(matches!(
        err,
        TrestleError::Dispatch(DispatchError::NoMatchingConstructor(_))
    ));
}

#[test]
fn test_install_namespace_round_trip() {
    let file = TempFile::new("install.swf", &minimal_swf_bytes());
    let bridge = Bridge::default();
    let ns = match bridge.install() {
        DynamicValue::Mapping(m) => m,
        other => panic!("expected mapping, got {other}"),
    };

    let open = ns
        .get(&MapKey::Text("open".into()))
        .and_then(DynamicValue::as_callable)
        .unwrap();
    let swf = open
        .invoke(&[DynamicValue::Text(file.0.display().to_string())])
        .unwrap();
    assert!(matches!(swf, DynamicValue::Handle(_)));

    let instance_of = ns
        .get(&MapKey::Text("instanceOf".into()))
        .and_then(DynamicValue::as_callable)
        .unwrap();
    assert_eq!(
        instance_of
            .invoke(&[swf.clone(), DynamicValue::Text("swf.Swf".into())])
            .unwrap(),
        DynamicValue::Bool(true)
    );
    assert_eq!(
        instance_of
            .invoke(&[DynamicValue::Nil, DynamicValue::Text("swf.Swf".into())])
            .unwrap(),
        DynamicValue::Bool(false)
    );

    let new_instance = ns
        .get(&MapKey::Text("newInstance".into()))
        .and_then(DynamicValue::as_callable)
        .unwrap();
    let color = new_instance
        .invoke(&[DynamicValue::Text("swf.Color".into())])
        .unwrap();
    assert!(bridge.instance_of(&color, "swf.Color"));

    let class = ns
        .get(&MapKey::Text("class".into()))
        .and_then(DynamicValue::as_callable)
        .unwrap();
    let tag_codes = class
        .invoke(&[DynamicValue::Text("swf.TagCode".into())])
        .unwrap();
    let tag_codes = match tag_codes {
        DynamicValue::Mapping(m) => m,
        other => panic!("expected mapping, got {other}"),
    };
    assert_eq!(
        tag_codes.get(&MapKey::Text("SHOW_FRAME".into())),
        Some(&DynamicValue::Number(1.0))
    );
}

#[test]
fn test_class_of_rebuilds_namespace_each_call() {
    let bridge = Bridge::default();
    let first = bridge.class_of("swf.TagCode").unwrap();
    let second = bridge.class_of("swf.TagCode").unwrap();

    let name_of = |ns: &DynamicValue| match ns {
        DynamicValue::Mapping(m) => m
            .get(&MapKey::Text("nameOf".into()))
            .and_then(DynamicValue::as_callable)
            .unwrap()
            .clone(),
        other => panic!("expected mapping, got {other}"),
    };
    // 每次暴露都构建新的可调用值，不做缓存
    assert_ne!(name_of(&first), name_of(&second));
    assert_eq!(
        name_of(&first).invoke(&[DynamicValue::Number(0.0)]).unwrap(),
        DynamicValue::Text("End".into())
    );
}

#[test]
fn test_get_attr_on_non_handle_is_an_error() {
    let bridge = Bridge::default();
    let err = bridge
        .get_attr(&DynamicValue::Number(3.0), "anything")
        .unwrap_err();
    assert!(matches!(err, TrestleError::Script(_)));
    assert_eq!(err.phase(), "cli");
}
