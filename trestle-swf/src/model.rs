//! SWF 容器的数据模型

/// 已解析的 SWF 容器
///
/// 压缩文件（CWS/ZWS）只解析 8 字节头部，tag 列表为空。
#[derive(Debug, Clone)]
pub struct Swf {
    pub version: u8,
    pub compressed: bool,
    /// 头部声明的解压后总长度
    pub file_length: u32,
    pub frame_rate: f32,
    pub frame_count: u16,
    pub tags: Vec<Tag>,
}

impl Swf {
    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    pub fn tag(&self, index: usize) -> Option<&Tag> {
        self.tags.get(index)
    }
}

/// 一条 tag 记录（只保留记录头，不解析内容）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub code: u16,
    /// 内容字节数
    pub length: u32,
    /// 是否使用长格式长度字段
    pub long_form: bool,
}

impl Tag {
    pub fn name(&self) -> &'static str {
        tag_name(self.code)
    }
}

/// tag 码到名称的查找。未知码返回 "Unknown"。
pub fn tag_name(code: u16) -> &'static str {
    match code {
        0 => "End",
        1 => "ShowFrame",
        2 => "DefineShape",
        4 => "PlaceObject",
        5 => "RemoveObject",
        6 => "DefineBits",
        9 => "SetBackgroundColor",
        12 => "DoAction",
        26 => "PlaceObject2",
        39 => "DefineSprite",
        43 => "FrameLabel",
        69 => "FileAttributes",
        76 => "SymbolClass",
        82 => "DoABC",
        _ => "Unknown",
    }
}

/// tag 码常量的静态命名空间（注册后以 Mapping 形式暴露给脚本）
pub struct TagCode;

impl TagCode {
    pub const END: u16 = 0;
    pub const SHOW_FRAME: u16 = 1;
    pub const DEFINE_SHAPE: u16 = 2;
    pub const PLACE_OBJECT: u16 = 4;
    pub const REMOVE_OBJECT: u16 = 5;
    pub const SET_BACKGROUND_COLOR: u16 = 9;
    pub const DO_ACTION: u16 = 12;
    pub const PLACE_OBJECT2: u16 = 26;
    pub const DEFINE_SPRITE: u16 = 39;
    pub const FRAME_LABEL: u16 = 43;
    pub const FILE_ATTRIBUTES: u16 = 69;
    pub const SYMBOL_CLASS: u16 = 76;
    pub const DO_ABC: u16 = 82;
}

/// RGBA 颜色（SetBackgroundColor 等 tag 的值类型）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new(0, 0, 0)
    }
}
