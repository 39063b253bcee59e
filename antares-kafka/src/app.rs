//! 客户端上下文

use crate::errors::ClientError;
use antares::{IngestStats, Ingestor, Processor, Source};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tracing::{error, info};

/// 客户端上下文结构
pub struct App {
    initiated: AtomicBool,
    exit: Arc<AtomicBool>,
}

impl App {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            initiated: AtomicBool::new(false),
            exit: Arc::new(AtomicBool::new(false)),
        })
    }

    /// 监听 Ctrl-C 信号，收到后优雅关闭
    pub fn listen(self: &Arc<Self>) {
        let app = Arc::clone(self);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(_) => info!("收到 Ctrl-C 信号"),
                Err(e) => {
                    error!("监听 Ctrl-C 信号失败: {e}");
                    info!("启用备用关闭机制");
                }
            }
            app.shutdown();
        });
    }

    /// 优雅关闭，仅首次调用生效
    pub fn shutdown(&self) {
        if self
            .initiated
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::Relaxed)
            .is_ok()
        {
            info!("开始优雅退出，等待当前批次处理完毕");
            self.exit.store(true, Ordering::SeqCst);
        }
    }

    pub fn is_shutdown(&self) -> bool {
        self.exit.load(Ordering::SeqCst)
    }

    /// 在阻塞线程上运行摄取循环
    pub async fn run<S, P>(&self, ingestor: Ingestor<S, P>) -> Result<IngestStats, ClientError>
    where
        S: Source + Send + 'static,
        P: Processor + Send + 'static,
    {
        let exit = Arc::clone(&self.exit);
        match tokio::task::spawn_blocking(move || ingestor.run(&exit)).await {
            Ok(result) => Ok(result?),
            Err(e) => {
                error!("摄取任务异常终止：{e}");
                Err(ClientError::Task(e.to_string()))
            }
        }
    }
}
