//! 最小 SWF 容器解析器
//!
//! 只解析容器结构：8 字节头（签名、版本、声明长度）、帧矩形、
//! 帧率、帧数、tag 记录头序列。tag 内容按长度跳过，不做解码。
//! 压缩变体（CWS 的 zlib、ZWS 的 lzma）只解析头部，正文不解压。

use std::fs::File;
use std::io::Read;
use std::path::Path;

use trestle_core::LimitConfig;

use crate::error::SwfError;
use crate::model::{Swf, Tag};

/// 从字节序列解析 SWF 容器
pub fn parse(data: &[u8]) -> Result<Swf, SwfError> {
    let mut cursor = Cursor::new(data);
    let signature: [u8; 3] = [cursor.u8()?, cursor.u8()?, cursor.u8()?];
    let compressed = match &signature {
        b"FWS" => false,
        b"CWS" | b"ZWS" => true,
        _ => return Err(SwfError::InvalidSignature(signature)),
    };

    let version = cursor.u8()?;
    if version == 0 {
        return Err(SwfError::UnsupportedVersion(version));
    }
    let file_length = cursor.u32_le()?;

    if compressed {
        // 压缩正文不解压，只保留头部信息
        tracing::debug!(
            target: "trestle::facade",
            version,
            file_length,
            "compressed SWF, body left opaque"
        );
        return Ok(Swf {
            version,
            compressed,
            file_length,
            frame_rate: 0.0,
            frame_count: 0,
            tags: Vec::new(),
        });
    }

    cursor.skip_rect()?;
    let frame_rate = cursor.u16_le()? as f32 / 256.0;
    let frame_count = cursor.u16_le()?;

    let mut tags = Vec::new();
    loop {
        if cursor.remaining() == 0 {
            break;
        }
        let code_and_length = cursor.u16_le()?;
        let code = code_and_length >> 6;
        let short_length = (code_and_length & 0x3F) as u32;
        let (length, long_form) = if short_length == 0x3F {
            (cursor.u32_le()?, true)
        } else {
            (short_length, false)
        };
        cursor.skip(length as usize)?;
        tags.push(Tag {
            code,
            length,
            long_form,
        });
        if code == 0 {
            // End tag 终结记录流
            break;
        }
    }

    tracing::debug!(
        target: "trestle::facade",
        version,
        tag_count = tags.len(),
        "parsed SWF container"
    );
    Ok(Swf {
        version,
        compressed,
        file_length,
        frame_rate,
        frame_count,
        tags,
    })
}

/// 打开并解析文件。文件流在返回前关闭（RAII），任何失败路径同样释放。
pub fn parse_file(path: impl AsRef<Path>, limits: &LimitConfig) -> Result<Swf, SwfError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let size = file.metadata()?.len();
    if size > limits.max_open_bytes as u64 {
        return Err(SwfError::TooLarge {
            size,
            limit: limits.max_open_bytes,
        });
    }
    let mut data = Vec::with_capacity(size as usize);
    file.take(limits.max_open_bytes as u64)
        .read_to_end(&mut data)?;
    parse(&data)
}

/// 前向字节游标。所有读取都做边界检查，越界报 Truncated。
struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], SwfError> {
        if self.remaining() < n {
            return Err(SwfError::Truncated {
                offset: self.pos,
                needed: n,
            });
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    fn skip(&mut self, n: usize) -> Result<(), SwfError> {
        self.take(n).map(|_| ())
    }

    fn u8(&mut self) -> Result<u8, SwfError> {
        Ok(self.take(1)?[0])
    }

    fn u16_le(&mut self) -> Result<u16, SwfError> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn u32_le(&mut self) -> Result<u32, SwfError> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// 跳过帧矩形 RECT：首 5 bit 是每分量位宽，随后 4 个分量
    fn skip_rect(&mut self) -> Result<(), SwfError> {
        let first = self.take(1)?[0];
        let nbits = (first >> 3) as usize;
        let total_bits = 5 + nbits * 4;
        // 首字节已消费 8 bit
        let rest_bytes = total_bits.saturating_sub(8).div_ceil(8);
        self.skip(rest_bytes)
    }
}
