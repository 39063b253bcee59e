//! # Kafka 消费会话

use crate::{config::SessionConfig, errors::ClientError};
use antares::{Polled, RawMessage, Source, errors::AlertError};
use rdkafka::{
    Message,
    consumer::{BaseConsumer, Consumer},
    error::KafkaError,
    types::RDKafkaErrorCode,
};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Kafka 消费会话，独占一个已订阅的消费者
pub struct KafkaSession {
    consumer: Option<BaseConsumer>,
    topics: Vec<String>,
}

impl KafkaSession {
    /// 建立连接并订阅主题
    #[instrument(name = "open_session", skip_all, fields(bootstrap = %config.bootstrap(), group = %config.group))]
    pub fn open(config: &SessionConfig) -> Result<Self, ClientError> {
        match &config.ssl_ca_location {
            Some(path) => info!("使用信任库 {}", path.display()),
            None => warn!("未找到信任库，使用系统默认信任库"),
        }
        let consumer: BaseConsumer = config.client_config().create()?;
        let mut session = Self {
            consumer: Some(consumer),
            topics: Vec::new(),
        };
        session.subscribe(&config.topics)?;
        Ok(session)
    }

    /// 订阅主题
    pub fn subscribe(&mut self, topics: &[String]) -> Result<(), ClientError> {
        let consumer = self.consumer.as_ref().ok_or("会话已关闭")?;
        let names: Vec<&str> = topics.iter().map(String::as_str).collect();
        consumer.subscribe(&names)?;
        info!("成功订阅主题 {}", names.join(","));
        self.topics = topics.to_vec();
        Ok(())
    }

    /// 已订阅的主题
    pub fn topics(&self) -> &[String] {
        &self.topics
    }
}

impl Source for KafkaSession {
    fn poll(&mut self, max: usize, timeout: Duration) -> Result<Vec<Polled>, AlertError> {
        let consumer = self
            .consumer
            .as_ref()
            .ok_or_else(|| AlertError::TransportError("会话已关闭".to_string()))?;
        let deadline = Instant::now() + timeout;
        let mut batch = Vec::with_capacity(max);

        while batch.len() < max {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match consumer.poll(remaining) {
                Some(Ok(msg)) => batch.push(Polled::Message(RawMessage {
                    topic: msg.topic().to_string(),
                    partition: msg.partition(),
                    offset: msg.offset(),
                    payload: msg.payload().map(<[u8]>::to_vec).unwrap_or_default(),
                })),
                Some(Err(KafkaError::PartitionEOF(partition))) => {
                    batch.push(Polled::PartitionEof { partition })
                }
                Some(Err(e)) if e.rdkafka_error_code() == Some(RDKafkaErrorCode::Fatal) => {
                    return Err(AlertError::TransportError(e.to_string()));
                }
                Some(Err(e)) => batch.push(Polled::BrokerError(e.to_string())),
                None => break,
            }
            if remaining.is_zero() {
                break;
            }
        }

        Ok(batch)
    }

    fn close(&mut self) {
        if let Some(consumer) = self.consumer.take() {
            debug!("开始关闭会话");
            consumer.unsubscribe();
            drop(consumer);
            info!("会话已关闭");
        }
    }
}

impl Drop for KafkaSession {
    fn drop(&mut self) {
        self.close();
    }
}
