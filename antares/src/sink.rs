//! # 告警落盘

use crate::{errors::AlertError, record::Record};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// 将告警写为 `{base_dir}/{topic}/{identifier}.json`
///
/// 目录按需递归创建；同一标识重复写入时覆盖原文件。
pub fn save(record: &Record, base_dir: &Path, topic: &str) -> Result<PathBuf, AlertError> {
    let id = record.identifier()?;
    let dir = base_dir.join(topic);
    fs::create_dir_all(&dir)?;

    let mut file_name = String::with_capacity(id.len() + 5);
    file_name.push_str(&id);
    file_name.push_str(".json");
    let path = dir.join(file_name);

    let mut writer = BufWriter::new(File::create(&path)?);
    let mut ser =
        serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
    record.to_json().serialize(&mut ser)?;
    writer.flush()?;

    Ok(path)
}
