use antares::errors::{AlertError, ConfigError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Kafka错误：{0}")]
    Kafka(#[from] rdkafka::error::KafkaError),
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Alert(#[from] AlertError),
    #[error("摄取任务异常终止：{0}")]
    Task(String),
    #[error("参数错误：{0}")]
    Invalid(String),
}

impl From<&str> for ClientError {
    fn from(s: &str) -> Self {
        ClientError::Invalid(s.to_string())
    }
}
