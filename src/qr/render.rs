use log::info;
use reqwest::{StatusCode, Url};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 外部二维码图片服务，只负责渲染，从不解码
pub const DEFAULT_RENDER_URL: &str = "https://api.qrserver.com/v1/create-qr-code/";
const RENDER_SIZE: &str = "200x200";

#[derive(thiserror::Error, Debug)]
pub enum QrRenderError {
    #[error("invalid render url: {0}")]
    InvalidUrl(String),
    #[error("http error: {0}")]
    Http(String),
    #[error("render service returned {0}")]
    Status(StatusCode),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 由物品 id 与提交时间（毫秒）生成的不透明编码
pub fn code_for(item_id: i32, submitted_at_millis: i64) -> String {
    format!("ewaste_{}_{}", item_id, submitted_at_millis)
}

pub fn render_url(base: &str, code: &str) -> Result<Url, QrRenderError> {
    Url::parse_with_params(base, &[("size", RENDER_SIZE), ("data", code)])
        .map_err(|e| QrRenderError::InvalidUrl(e.to_string()))
}

pub struct QrRenderClient {
    client: reqwest::Client,
    base_url: String,
    output_dir: PathBuf,
}

impl QrRenderClient {
    pub fn new(base_url: impl Into<String>, output_dir: impl Into<PathBuf>) -> Result<Self, QrRenderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| QrRenderError::Http(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            output_dir: output_dir.into(),
        })
    }

    pub fn url_for(&self, code: &str) -> Result<Url, QrRenderError> {
        render_url(&self.base_url, code)
    }

    /// 下载渲染好的 PNG 到输出目录，返回文件路径
    pub async fn save_png(&self, code: &str) -> Result<PathBuf, QrRenderError> {
        let url = self.url_for(code)?;
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| QrRenderError::Http(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(QrRenderError::Status(status));
        }
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| QrRenderError::Http(e.to_string()))?;

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = self.output_dir.join(file_name_for(code));
        tokio::fs::write(&path, &bytes).await?;
        info!("QR image saved: {} ({} bytes) from {}", path.display(), bytes.len(), url);
        Ok(path)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

fn file_name_for(code: &str) -> String {
    let safe: String = code
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}.png", safe)
}
