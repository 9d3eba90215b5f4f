//! I/O 支持：结构描述的 JSON 与 RON 序列化，按文件扩展名选择格式。
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use log::debug;
use ron::ser::PrettyConfig;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::net::core::{Net, NetError};
use crate::net::description::NetDescription;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("ron error: {0}")]
    Ron(#[from] ron::Error),
    #[error("ron parse error: {0}")]
    RonParse(#[from] ron::error::SpannedError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid net: {0}")]
    Net(#[from] NetError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Ron,
}

impl Format {
    /// `.ron` 文件使用 RON，其余一律按 JSON 处理。
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("ron") => Format::Ron,
            _ => Format::Json,
        }
    }
}

pub fn to_json_string<T>(value: &T) -> Result<String, IoError>
where
    T: Serialize,
{
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn from_json_str<T>(s: &str) -> Result<T, IoError>
where
    T: DeserializeOwned,
{
    Ok(serde_json::from_str(s)?)
}

pub fn to_ron_string<T>(value: &T) -> Result<String, IoError>
where
    T: Serialize,
{
    let mut pretty = PrettyConfig::default();
    pretty.new_line = "\n".into();
    Ok(ron::ser::to_string_pretty(value, pretty)?)
}

pub fn from_ron_str<T>(s: &str) -> Result<T, IoError>
where
    T: DeserializeOwned,
{
    Ok(ron::from_str(s)?)
}

pub fn to_string<T: Serialize>(format: Format, value: &T) -> Result<String, IoError> {
    match format {
        Format::Json => to_json_string(value),
        Format::Ron => to_ron_string(value),
    }
}

pub fn from_str<T: DeserializeOwned>(format: Format, s: &str) -> Result<T, IoError> {
    match format {
        Format::Json => from_json_str(s),
        Format::Ron => from_ron_str(s),
    }
}

pub fn write_value<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<(), IoError> {
    let path = path.as_ref();
    let content = to_string(Format::from_path(path), value)?;
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

pub fn read_value<P: AsRef<Path>, T: DeserializeOwned>(path: P) -> Result<T, IoError> {
    let path = path.as_ref();
    let mut file = File::open(path)?;
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    from_str(Format::from_path(path), &content)
}

pub fn load_net<P: AsRef<Path>>(path: P) -> Result<Net, IoError> {
    let path = path.as_ref();
    debug!("loading net description from {}", path.display());
    let description: NetDescription = read_value(path)?;
    Ok(description.build()?)
}

pub fn save_net<P: AsRef<Path>>(path: P, net: &Net) -> Result<(), IoError> {
    write_value(path, &net.to_description())
}
