//! # 分层配置
//!
//! 依次叠加 `default`、`{ANTARES_ENV}` 配置文件与 `ANTARES__` 前缀的环境变量。

use crate::errors::ConfigError;
use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use validator::Validate;

/// 构建分层配置
///
/// 配置根目录取 `ANTARES_CONFIG_ROOT`，未设置时为 `crate_dir/config`。
pub fn build_config(crate_dir: PathBuf) -> Result<Config, ConfigError> {
    let config_root = std::env::var("ANTARES_CONFIG_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| crate_dir.join("config"));
    let env = std::env::var("ANTARES_ENV").unwrap_or_else(|_| "dev".to_string());
    let config = Config::builder()
        .add_source(File::from(config_root.join("default")).required(false))
        .add_source(File::from(config_root.join(env)).required(false))
        .add_source(
            Environment::with_prefix("ANTARES")
                .separator("__")
                .list_separator(","),
        )
        .build()?;
    Ok(config)
}

/// 加载并验证配置节，配置节不存在时取默认值
pub fn load_section<T>(config: &Config, section: &str) -> Result<T, ConfigError>
where
    T: DeserializeOwned + Validate + Default,
{
    let cfg = match config.get::<T>(section) {
        Ok(c) => c,
        Err(config::ConfigError::NotFound(_)) => T::default(),
        Err(e) => return Err(e.into()),
    };

    cfg.validate().map_err(|e| ConfigError::ValidationError {
        section: section.to_string(),
        key: e
            .field_errors()
            .keys()
            .next()
            .map(|k| k.to_string())
            .unwrap_or_default(),
        message: e.to_string(),
    })?;

    Ok(cfg)
}
