//! # 摄取循环
//!
//! 反复批量拉取消息，按消息分类处理：分区末尾仅记录，Broker 错误记录后继续，
//! 正常消息解码后先交给处理器，再按需落盘。

use crate::{
    domain::{Polled, Processor, RawMessage, Source},
    errors::AlertError,
    record::decode,
    sink::save,
};
use std::{
    path::PathBuf,
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};
use tracing::{debug, error, info, instrument};

/// 单条消息故障的处理策略
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FaultPolicy {
    /// 记录后继续处理后续消息
    #[default]
    Skip,
    /// 停止摄取并返回该故障
    Halt,
}

/// 摄取统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestStats {
    /// 成功解码的告警数
    pub alerts: u64,
    /// 已落盘的告警数
    pub saved: u64,
    /// 分区末尾指示数
    pub boundaries: u64,
    /// Broker 错误数
    pub broker_errors: u64,
    /// 解码、结构或存储故障数
    pub faults: u64,
}

/// 摄取者
pub struct Ingestor<S, P>
where
    S: Source,
    P: Processor,
{
    source: S,
    processor: P,
    output_dir: Option<PathBuf>,
    batch: usize,
    timeout: Duration,
    policy: FaultPolicy,
    stats: IngestStats,
}

impl<S, P> Ingestor<S, P>
where
    S: Source,
    P: Processor,
{
    /// 构造函数，默认每批 10 条、超时 1 秒、故障跳过
    pub fn new(source: S, processor: P) -> Self {
        Self {
            source,
            processor,
            output_dir: None,
            batch: 10,
            timeout: Duration::from_secs(1),
            policy: FaultPolicy::Skip,
            stats: IngestStats::default(),
        }
    }

    /// 设置落盘目录，未设置时不落盘
    pub fn output_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.output_dir = dir;
        self
    }

    /// 设置单批最大消息数
    pub fn batch(mut self, batch: usize) -> Self {
        self.batch = batch.max(1);
        self
    }

    /// 设置单次拉取超时
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 设置故障策略
    pub fn policy(mut self, policy: FaultPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// 运行至收到退出信号，或遇到须停止的错误
    ///
    /// 无论以何种方式结束，返回前都会关闭消息源。
    #[instrument(name = "ingest", skip_all)]
    pub fn run(mut self, exit: &AtomicBool) -> Result<IngestStats, AlertError> {
        info!("开始摄取告警");
        let result = self.poll_loop(exit);
        self.source.close();
        match &result {
            Ok(stats) => info!(?stats, "摄取结束"),
            Err(e) => error!(stats = ?self.stats, "摄取异常结束：{e}"),
        }
        result
    }

    fn poll_loop(&mut self, exit: &AtomicBool) -> Result<IngestStats, AlertError> {
        while !exit.load(Ordering::SeqCst) {
            let msgs = self.source.poll(self.batch, self.timeout)?;
            for msg in msgs {
                if let Err(e) = self.dispatch(msg) {
                    self.stats.faults += 1;
                    if self.policy == FaultPolicy::Halt {
                        return Err(e);
                    }
                }
            }
        }
        info!("收到退出信号");
        Ok(self.stats)
    }

    fn dispatch(&mut self, msg: Polled) -> Result<Option<PathBuf>, AlertError> {
        match msg {
            Polled::PartitionEof { partition } => {
                debug!("分区 {partition} 已读到末尾，等待新消息");
                self.stats.boundaries += 1;
                Ok(None)
            }
            Polled::BrokerError(e) => {
                error!("Broker 错误：{e}");
                self.stats.broker_errors += 1;
                Ok(None)
            }
            Polled::Message(msg) => self.handle(msg),
        }
    }

    fn handle(&mut self, msg: RawMessage) -> Result<Option<PathBuf>, AlertError> {
        let RawMessage {
            topic,
            partition,
            offset,
            payload,
        } = msg;
        let record = match decode(&payload) {
            Ok(r) => r,
            Err(e) => {
                error!(
                    topic = %topic,
                    partition,
                    offset,
                    payload = %payload.escape_ascii(),
                    "消息解析失败：{e}"
                );
                return Err(e);
            }
        };
        self.stats.alerts += 1;
        self.processor.process(&record);

        match &self.output_dir {
            Some(dir) => match save(&record, dir, &topic) {
                Ok(path) => {
                    info!("已保存告警 {}", path.display());
                    self.stats.saved += 1;
                    Ok(Some(path))
                }
                Err(e) => {
                    error!(topic = %topic, partition, offset, "保存告警失败：{e}");
                    Err(e)
                }
            },
            None => {
                debug!("收到主题'{topic}'的告警");
                Ok(None)
            }
        }
    }
}
