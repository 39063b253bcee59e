//! 命令行参数

use antares::FaultPolicy;
use antares_kafka::{
    config::{ClientSettings, SessionConfig, split_topics},
    errors::ClientError,
    ssl::trust_store,
};
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;
use validator::Validate;

/// 连接 ANTARES Kafka 集群并读取告警
#[derive(Parser, Debug)]
#[command(name = "antares-client")]
pub struct Args {
    /// Kafka 主题，多个主题以逗号分隔，不含空格
    pub topic: String,

    /// Kafka 集群主机名
    #[arg(long)]
    pub host: Option<String>,

    /// Kafka 集群端口
    #[arg(long)]
    pub port: Option<u16>,

    /// ANTARES Kafka API Key
    #[arg(long = "api_key", env = "KAFKA_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// ANTARES Kafka API Secret
    #[arg(long = "api_secret", env = "KAFKA_API_SECRET", hide_env_values = true)]
    pub api_secret: Option<String>,

    /// 根证书 cert.pem 文件位置
    #[arg(long = "ssl_ca_location", env = "SSL_CA_LOCATION")]
    pub ssl_ca_location: Option<PathBuf>,

    /// 全局唯一的消费组名，缺省为本机主机名
    #[arg(short, long)]
    pub group: Option<String>,

    /// 告警保存目录，缺省不保存
    #[arg(short = 'd', long = "output_dir")]
    pub output_dir: Option<PathBuf>,

    /// 输出调试日志
    #[arg(short, long)]
    pub verbose: bool,

    /// 遇到无法解析或无法保存的告警时停止
    #[arg(long = "halt_on_fault")]
    pub halt_on_fault: bool,
}

fn required(value: &Option<String>, flag: &str, var: &str) -> Result<String, ClientError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ClientError::Invalid(format!(
            "必须提供 --{flag}，或设置环境变量 {var}"
        ))),
    }
}

fn default_group(settings: &ClientSettings) -> Result<String, ClientError> {
    if let Some(name) = settings.hostname.as_deref().filter(|h| !h.is_empty()) {
        return Ok(name.to_string());
    }
    hostname::get()
        .map(|h| h.to_string_lossy().into_owned())
        .map_err(|e| ClientError::Invalid(format!("获取主机名失败：{e}")))
}

impl Args {
    #[inline]
    pub fn level(&self) -> Level {
        if self.verbose { Level::DEBUG } else { Level::INFO }
    }

    #[inline]
    pub fn policy(&self) -> FaultPolicy {
        if self.halt_on_fault {
            FaultPolicy::Halt
        } else {
            FaultPolicy::Skip
        }
    }

    /// 合并参数与配置，生成经过验证的会话配置
    ///
    /// 凭据缺失时立即失败，不做任何连接尝试。
    pub fn session_config(&self, settings: &ClientSettings) -> Result<SessionConfig, ClientError> {
        let api_key = required(&self.api_key, "api_key", "KAFKA_API_KEY")?;
        let api_secret = required(&self.api_secret, "api_secret", "KAFKA_API_SECRET")?;
        let group = match &self.group {
            Some(g) => g.clone(),
            None => default_group(settings)?,
        };

        let config = SessionConfig {
            host: self.host.clone().unwrap_or_else(|| settings.host.clone()),
            port: self.port.unwrap_or(settings.port),
            api_key,
            api_secret,
            group,
            ssl_ca_location: trust_store(self.ssl_ca_location.clone()),
            topics: split_topics(&self.topic),
        };
        config
            .validate()
            .map_err(|e| ClientError::Invalid(e.to_string()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use antares_kafka::config::{DEFAULT_HOST, DEFAULT_PORT};
    use rstest::*;

    #[fixture]
    fn settings() -> ClientSettings {
        ClientSettings {
            hostname: Some("ingest-a".to_string()),
            ..Default::default()
        }
    }

    const VARS: [&str; 3] = ["KAFKA_API_KEY", "KAFKA_API_SECRET", "SSL_CA_LOCATION"];

    /// 在只含 `env` 所列变量的环境下解析参数
    fn parse_with_env(args: &[&str], env: &[(&str, &str)]) -> Args {
        let vars: Vec<(&str, Option<&str>)> = VARS
            .iter()
            .map(|k| (*k, env.iter().find(|(n, _)| n == k).map(|(_, v)| *v)))
            .collect();
        temp_env::with_vars(vars, || {
            Args::try_parse_from(std::iter::once("antares-client").chain(args.iter().copied()))
                .unwrap()
        })
    }

    fn parse(args: &[&str]) -> Args {
        parse_with_env(args, &[])
    }

    #[rstest]
    fn missing_api_key_fails_before_connecting(settings: ClientSettings) {
        let args = parse(&["alerts", "--api_secret", "s"]);

        let result = args.session_config(&settings);

        assert!(matches!(result, Err(ClientError::Invalid(m)) if m.contains("--api_key")));
    }

    #[rstest]
    fn missing_api_secret_fails(settings: ClientSettings) {
        let args = parse(&["alerts", "--api_key", "k"]);

        let result = args.session_config(&settings);

        assert!(matches!(result, Err(ClientError::Invalid(m)) if m.contains("--api_secret")));
    }

    #[rstest]
    fn blank_api_key_is_missing(settings: ClientSettings) {
        let args = parse(&["alerts", "--api_key", " ", "--api_secret", "s"]);

        assert!(args.session_config(&settings).is_err());
    }

    #[rstest]
    fn credentials_fall_back_to_environment(settings: ClientSettings) {
        let args = parse_with_env(
            &["alerts", "--ssl_ca_location", "/custom/ca.pem"],
            &[("KAFKA_API_KEY", "envkey"), ("KAFKA_API_SECRET", "envsecret")],
        );

        let config = args.session_config(&settings).unwrap();

        assert_eq!(config.api_key, "envkey");
        assert_eq!(config.api_secret, "envsecret");
    }

    #[rstest]
    fn flags_override_environment(settings: ClientSettings) {
        let args = parse_with_env(
            &[
                "alerts",
                "--api_key",
                "flagkey",
                "--ssl_ca_location",
                "/custom/ca.pem",
            ],
            &[("KAFKA_API_KEY", "envkey"), ("KAFKA_API_SECRET", "envsecret")],
        );

        let config = args.session_config(&settings).unwrap();

        assert_eq!(config.api_key, "flagkey");
        assert_eq!(config.api_secret, "envsecret");
    }

    #[rstest]
    fn defaults_come_from_settings(settings: ClientSettings) {
        let args = parse(&[
            "alerts,nuclear",
            "--api_key",
            "k",
            "--api_secret",
            "s",
            "--ssl_ca_location",
            "/custom/ca.pem",
        ]);

        let config = args.session_config(&settings).unwrap();

        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.group, "ingest-a");
        assert_eq!(config.topics, vec!["alerts", "nuclear"]);
        assert_eq!(config.ssl_ca_location, Some(PathBuf::from("/custom/ca.pem")));
    }

    #[rstest]
    fn flags_override_settings(settings: ClientSettings) {
        let args = parse(&[
            "alerts",
            "--host",
            "localhost",
            "--port",
            "19092",
            "--api_key",
            "k",
            "--api_secret",
            "s",
            "-g",
            "my-group",
            "-d",
            "/tmp/out",
            "-v",
            "--halt_on_fault",
        ]);

        let config = args.session_config(&settings).unwrap();

        assert_eq!(config.bootstrap(), "localhost:19092");
        assert_eq!(config.group, "my-group");
        assert_eq!(args.output_dir, Some(PathBuf::from("/tmp/out")));
        assert_eq!(args.level(), Level::DEBUG);
        assert_eq!(args.policy(), FaultPolicy::Halt);
    }

    #[rstest]
    fn empty_topic_list_is_rejected(settings: ClientSettings) {
        let args = parse(&[",", "--api_key", "k", "--api_secret", "s"]);

        assert!(args.session_config(&settings).is_err());
    }

    #[test]
    fn topic_is_required() {
        let result = temp_env::with_vars_unset(VARS, || Args::try_parse_from(["antares-client"]));

        assert!(result.is_err());
    }
}
