//! # **antares** 错误定义

use thiserror::Error;

/// 告警处理错误枚举
#[derive(Debug, Error)]
pub enum AlertError {
    /// 消息体解压或反序列化失败
    #[error("告警解码错误：{0}")]
    DecodeError(String),
    /// 告警缺少标识字段
    #[error("告警结构错误：{0}")]
    SchemaError(String),
    /// 告警编码失败
    #[error("告警编码错误：{0}")]
    EncodeError(String),
    /// 不可恢复的传输错误
    #[error("传输错误：{0}")]
    TransportError(String),
    /// 文件系统错误
    #[error("告警存储错误：{0}")]
    IoError(#[from] std::io::Error),
    /// JSON 序列化错误
    #[error("告警序列化错误：{0}")]
    JsonError(#[from] serde_json::Error),
}

/// 配置错误枚举
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 加载配置源失败
    #[error("加载配置失败：{0}")]
    LoadError(#[from] config::ConfigError),
    /// 配置项验证失败
    #[error("配置'{section}.{key}'验证失败：{message}")]
    ValidationError {
        /// 配置节
        section: String,
        /// 配置键
        key: String,
        /// 错误信息
        message: String,
    },
}
