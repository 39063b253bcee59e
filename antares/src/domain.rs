//! # **antares** 特征

use crate::{errors::AlertError, record::Record};
use std::time::Duration;

/// 原始消息
#[derive(Debug, Clone, PartialEq)]
pub struct RawMessage {
    /// 主题
    pub topic: String,
    /// 分区
    pub partition: i32,
    /// 偏移
    pub offset: i64,
    /// 消息体
    pub payload: Vec<u8>,
}

/// 单次拉取结果中的一项
#[derive(Debug, Clone, PartialEq)]
pub enum Polled {
    /// 正常消息
    Message(RawMessage),
    /// 分区当前已无更多消息
    PartitionEof {
        /// 分区
        partition: i32,
    },
    /// Broker 报告的其它错误
    BrokerError(String),
}

/// 消息源特征
pub trait Source {
    /// 批量拉取
    ///
    /// 最多等待 `timeout`，返回至多 `max` 项；超时无消息时返回空集合。
    fn poll(&mut self, max: usize, timeout: Duration) -> Result<Vec<Polled>, AlertError>;

    /// 释放连接并退订，重复调用无副作用
    fn close(&mut self);
}

/// 告警处理特征
pub trait Processor {
    /// 处理单条告警，在落盘之前同步调用
    fn process(&mut self, record: &Record);
}

/// 空处理器
#[derive(Debug, Default, Clone, Copy)]
pub struct Noop;

impl Processor for Noop {
    #[inline(always)]
    fn process(&mut self, _record: &Record) {}
}

impl<F> Processor for F
where
    F: FnMut(&Record),
{
    #[inline]
    fn process(&mut self, record: &Record) {
        self(record)
    }
}
