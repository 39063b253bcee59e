//! 连接 ANTARES Kafka 集群并读取告警

mod args;

use antares::{Ingestor, Noop};
use antares_kafka::{App, KafkaSession, config::ClientSettings};
use args::Args;
use clap::Parser;
use std::{path::PathBuf, process::ExitCode};
use tracing::{error, info};
use tracing_appender::non_blocking;
use tracing_subscriber::fmt;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let (non_blocking, _guard) = non_blocking(std::io::stdout());
    fmt()
        .with_writer(non_blocking)
        .with_target(false)
        .with_max_level(args.level())
        .init();

    let dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let settings = match ClientSettings::load(dir) {
        Ok(s) => s,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let config = match args.session_config(&settings) {
        Ok(c) => c,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    info!("正在连接 {}...", config.bootstrap());
    let session = match KafkaSession::open(&config) {
        Ok(s) => s,
        Err(e) => {
            error!("建立会话失败：{e}");
            return ExitCode::FAILURE;
        }
    };

    let app = App::new();
    app.listen();
    let ingestor = Ingestor::new(session, Noop)
        .output_dir(args.output_dir.clone())
        .batch(settings.batch)
        .timeout(settings.poll_timeout())
        .policy(args.policy());

    match app.run(ingestor).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
