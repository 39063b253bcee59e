//! # 客户端配置

use crate::errors::ClientError;
use antares::config::{build_config, load_section};
use rdkafka::ClientConfig;
use serde::Deserialize;
use std::{fmt, path::PathBuf, time::Duration};
use validator::Validate;

/// 默认 Broker 主机
pub const DEFAULT_HOST: &str = "pkc-epgnk.us-central1.gcp.confluent.cloud";
/// 默认 Broker 端口
pub const DEFAULT_PORT: u16 = 9092;

/// 客户端可调参数，来自分层配置的 `client` 节
#[derive(Debug, Deserialize, Validate, Clone)]
#[serde(default)]
pub struct ClientSettings {
    #[validate(length(min = 1))]
    pub host: String,
    #[validate(range(min = 1))]
    pub port: u16,
    /// 单批最大消息数
    #[validate(range(min = 1, max = 10000))]
    pub batch: usize,
    /// 单次拉取超时（毫秒）
    #[validate(range(min = 1))]
    pub timeout: u64,
    /// 消费组缺省名，未配置时取本机主机名
    pub hostname: Option<String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            batch: 10,
            timeout: 1000,
            hostname: None,
        }
    }
}

impl ClientSettings {
    /// 从 `dir/config` 或 `ANTARES_CONFIG_ROOT` 加载
    pub fn load(dir: PathBuf) -> Result<Self, ClientError> {
        let config = build_config(dir)?;
        Ok(load_section(&config, "client")?)
    }

    #[inline]
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }
}

/// 会话配置，启动时构造一次，由会话独占
#[derive(Clone, Validate)]
pub struct SessionConfig {
    #[validate(length(min = 1, message = "Broker 主机不能为空"))]
    pub host: String,
    #[validate(range(min = 1, message = "Broker 端口无效"))]
    pub port: u16,
    #[validate(length(min = 1, message = "必须提供 API Key"))]
    pub api_key: String,
    #[validate(length(min = 1, message = "必须提供 API Secret"))]
    pub api_secret: String,
    #[validate(length(min = 1, message = "消费组不能为空"))]
    pub group: String,
    pub ssl_ca_location: Option<PathBuf>,
    #[validate(length(min = 1, message = "至少订阅一个主题"))]
    pub topics: Vec<String>,
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_key", &self.api_key)
            .field("api_secret", &"***")
            .field("group", &self.group)
            .field("ssl_ca_location", &self.ssl_ca_location)
            .field("topics", &self.topics)
            .finish()
    }
}

impl SessionConfig {
    #[inline]
    pub fn bootstrap(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// 生成 librdkafka 消费者配置
    ///
    /// SASL PLAIN over TLS；新消费组从最早的未读消息开始；开启分区末尾通知。
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new();
        config
            .set("bootstrap.servers", self.bootstrap())
            .set("sasl.username", &self.api_key)
            .set("sasl.password", &self.api_secret)
            .set("group.id", &self.group)
            .set("auto.offset.reset", "earliest")
            .set("enable.partition.eof", "true")
            .set("api.version.request", "true")
            .set("broker.version.fallback", "0.10.0.0")
            .set("api.version.fallback.ms", "0")
            .set("sasl.mechanisms", "PLAIN")
            .set("security.protocol", "SASL_SSL");
        if let Some(path) = &self.ssl_ca_location {
            config.set("ssl.ca.location", path.to_string_lossy());
        }
        config
    }
}

/// 拆分逗号分隔的主题列表，去除空白与空项
pub fn split_topics(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
