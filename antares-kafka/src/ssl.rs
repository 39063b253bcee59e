//! # TLS 信任库定位

use std::{
    path::{Path, PathBuf},
    process::Command,
};
use tracing::debug;

/// 常见的根证书位置
pub const COMMON_CERT_LOCATIONS: [&str; 4] = [
    "/usr/local/etc/openssl/cert.pem",
    "/opt/local/etc/openssl/cert.pem",
    "/etc/pki/tls/cert.pem",
    "/etc/ssl/certs/ca-certificates.crt",
];

/// 在候选位置中取第一个存在的文件，均不存在时取 `fallback` 的结果
pub fn locate<P, F>(candidates: &[P], fallback: F) -> Option<PathBuf>
where
    P: AsRef<Path>,
    F: FnOnce() -> Option<PathBuf>,
{
    for candidate in candidates {
        let path = candidate.as_ref();
        if path.is_file() {
            return Some(path.to_path_buf());
        }
    }
    fallback().filter(|p| p.is_file())
}

/// 查询 OpenSSL 目录下的 `cert.pem`
///
/// 唯一调用外部命令之处：`openssl version -d`。
pub fn openssl_dir_cert() -> Option<PathBuf> {
    let output = match Command::new("openssl").args(["version", "-d"]).output() {
        Ok(o) if o.status.success() => o,
        Ok(o) => {
            debug!("查询 OpenSSL 目录失败：{}", o.status);
            return None;
        }
        Err(e) => {
            debug!("执行 openssl 失败：{e}");
            return None;
        }
    };
    parse_openssl_dir(&String::from_utf8_lossy(&output.stdout)).map(|dir| dir.join("cert.pem"))
}

fn parse_openssl_dir(stdout: &str) -> Option<PathBuf> {
    let rest = stdout.trim().strip_prefix("OPENSSLDIR:")?;
    let dir = rest.trim().trim_matches('"');
    if dir.is_empty() {
        None
    } else {
        Some(PathBuf::from(dir))
    }
}

/// 确定信任库：显式指定优先，其次常见位置，最后查询 OpenSSL
pub fn trust_store(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit.or_else(|| locate(&COMMON_CERT_LOCATIONS, openssl_dir_cert))
}
