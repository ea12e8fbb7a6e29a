use config::{Config, Environment, File};
use serde::Deserialize;
use std::num::NonZeroUsize;
use std::path::Path;

/// 兼容旧部署的分块大小环境变量（无前缀）
pub const CHUNK_SIZE_ENV: &str = "CHUNK_SIZE";

/// 应用配置总结构
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub upload: UploadSettings,
}

/// 服务相关配置（监听地址、端口、API 挂载前缀）
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// API 路由挂载点，例如 `/api`；空字符串表示挂载在根路径
    pub api_prefix: String,
}

/// 上传与识别配置
#[derive(Debug, Deserialize, Clone)]
pub struct UploadSettings {
    /// 每次送入识别器的字节数，默认 100
    pub chunk_size: usize,
    /// multipart 请求体上限（单位：MB），默认 10MB
    pub max_upload_mb: u64,
}

impl UploadSettings {
    pub fn chunk_size(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.chunk_size).unwrap_or(NonZeroUsize::MIN)
    }

    pub fn max_upload_bytes(&self) -> usize {
        usize::try_from(self.max_upload_mb.saturating_mul(1024 * 1024)).unwrap_or(usize::MAX)
    }
}

impl Settings {
    /// 加载配置：支持默认值、可选配置文件、环境变量覆盖
    pub fn new() -> anyhow::Result<Self> {
        Self::load(Path::new("config"), std::env::var(CHUNK_SIZE_ENV).ok())
    }

    /// 从指定配置文件（可不存在）加载，`chunk_size_override` 优先级最高
    pub fn load(config_file: &Path, chunk_size_override: Option<String>) -> anyhow::Result<Self> {
        let builder = Config::builder()
            // 默认值（代码内硬编码）
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("server.api_prefix", "/api")?
            .set_default("upload.chunk_size", 100)?
            .set_default("upload.max_upload_mb", 10)?
            .add_source(File::from(config_file).required(false))
            .add_source(Environment::with_prefix("FILESNIFF").separator("__"))
            .set_override_option("upload.chunk_size", chunk_size_override)?;

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.upload.chunk_size == 0 {
            anyhow::bail!("upload.chunk_size must be greater than zero");
        }
        if self.upload.max_upload_mb == 0 {
            anyhow::bail!("upload.max_upload_mb must be greater than zero");
        }
        let prefix = &self.server.api_prefix;
        if !prefix.is_empty() && (!prefix.starts_with('/') || prefix.ends_with('/')) {
            anyhow::bail!(
                "server.api_prefix must be empty or start with '/' without a trailing '/': {}",
                prefix
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Settings;
    use std::path::Path;

    #[test]
    fn defaults_apply_without_file() {
        let settings = Settings::load(Path::new("does-not-exist"), None).expect("settings");
        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.server.api_prefix, "/api");
        assert_eq!(settings.upload.chunk_size, 100);
        assert_eq!(settings.upload.chunk_size().get(), 100);
        assert_eq!(settings.upload.max_upload_bytes(), 10 * 1024 * 1024);
    }

    #[test]
    fn chunk_size_override_wins() {
        let settings =
            Settings::load(Path::new("does-not-exist"), Some("4096".into())).expect("settings");
        assert_eq!(settings.upload.chunk_size, 4096);
    }

    #[test]
    fn rejects_zero_chunk_size() {
        let err = Settings::load(Path::new("does-not-exist"), Some("0".into()))
            .expect_err("zero chunk size");
        assert!(err.to_string().contains("chunk_size"));
    }

    #[test]
    fn rejects_non_numeric_chunk_size() {
        assert!(Settings::load(Path::new("does-not-exist"), Some("abc".into())).is_err());
    }
}
