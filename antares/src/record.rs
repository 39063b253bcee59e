//! # 告警记录
//!
//! 消息体为 zlib 压缩的 BSON 文档。记录以 BSON 文档表示，保留字段顺序与值类型。

use crate::errors::AlertError;
use bson::{Bson, Document};
use flate2::{Compression, read::ZlibDecoder, write::ZlibEncoder};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::io::{Read, Write};

/// 告警子文档键
pub const ALERT_KEY: &str = "new_alert";
/// 主标识字段
pub const ID_KEY: &str = "alert_id";
/// 备用标识：巡天项目名
pub const SURVEY_KEY: &str = "survey";
/// 备用标识：原始标识
pub const ORIGINAL_KEY: &str = "original_id";

/// 文件名中保留原样的字符
const FILENAME_SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

/// 告警记录
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record(Document);

impl Record {
    /// 构造函数
    pub fn new(doc: Document) -> Self {
        Self(doc)
    }

    /// 获取底层文档
    pub fn document(&self) -> &Document {
        &self.0
    }

    /// 取出底层文档
    pub fn into_document(self) -> Document {
        self.0
    }

    /// 解析记录标识
    #[inline]
    pub fn identifier(&self) -> Result<String, AlertError> {
        resolve_identifier(self)
    }

    /// 转换为宽松模式的扩展 JSON
    pub fn to_json(&self) -> serde_json::Value {
        Bson::Document(self.0.clone()).into_relaxed_extjson()
    }
}

impl From<Document> for Record {
    fn from(doc: Document) -> Self {
        Self(doc)
    }
}

/// 解码消息体：先解压，再反序列化 BSON 文档
pub fn decode(payload: &[u8]) -> Result<Record, AlertError> {
    let mut buf = Vec::new();
    ZlibDecoder::new(payload)
        .read_to_end(&mut buf)
        .map_err(|e| AlertError::DecodeError(format!("解压失败：{e}")))?;
    let doc = Document::from_reader(buf.as_slice())
        .map_err(|e| AlertError::DecodeError(format!("BSON 反序列化失败：{e}")))?;
    Ok(Record(doc))
}

/// 编码记录：先序列化为 BSON，再压缩
pub fn encode(record: &Record) -> Result<Vec<u8>, AlertError> {
    let mut buf = Vec::new();
    record
        .0
        .to_writer(&mut buf)
        .map_err(|e| AlertError::EncodeError(e.to_string()))?;
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&buf)?;
    Ok(encoder.finish()?)
}

fn scalar(value: &Bson) -> Option<String> {
    match value {
        Bson::String(s) if !s.is_empty() => Some(s.clone()),
        Bson::Int32(n) => Some(n.to_string()),
        Bson::Int64(n) => Some(n.to_string()),
        _ => None,
    }
}

/// 解析记录标识
///
/// 优先取 `new_alert.alert_id`；缺失时由 `survey` 与 `original_id` 组合为
/// `{survey}-{original_id}`。结果中 `[A-Za-z0-9._-]` 以外的字节（含 `%`）做百分号编码，
/// 可直接用作文件名，且不同标识不会映射到同一文件名。
pub fn resolve_identifier(record: &Record) -> Result<String, AlertError> {
    let alert = match record.0.get(ALERT_KEY) {
        Some(Bson::Document(alert)) => alert,
        _ => {
            return Err(AlertError::SchemaError(format!(
                "缺少'{ALERT_KEY}'子文档"
            )));
        }
    };

    let raw = match alert.get(ID_KEY).and_then(scalar) {
        Some(id) => id,
        None => {
            let survey = alert.get(SURVEY_KEY).and_then(scalar);
            let original = alert.get(ORIGINAL_KEY).and_then(scalar);
            match (survey, original) {
                (Some(survey), Some(original)) => format!("{survey}-{original}"),
                _ => {
                    return Err(AlertError::SchemaError(format!(
                        "'{ALERT_KEY}'中既无'{ID_KEY}'，也无'{SURVEY_KEY}'与'{ORIGINAL_KEY}'"
                    )));
                }
            }
        }
    };

    let id = utf8_percent_encode(&raw, FILENAME_SAFE).to_string();

    if id == "." || id == ".." {
        return Err(AlertError::SchemaError(format!("标识'{raw}'不能用作文件名")));
    }
    Ok(id)
}
