use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, Request, Response, Url};

use crate::config::RelayConfig;
use crate::error::{AppError, StartupError};

use super::models::{FILE_FIELD, FORM_FILE_MIME, UploadedFile};

/// 下游识别服务客户端
///
/// 持有解析后的下游地址与复用的 `reqwest::Client`，本身不可变，可在请求间共享。
#[derive(Debug, Clone)]
pub struct RecognitionClient {
    client: Client,
    endpoint: Url,
}

impl RecognitionClient {
    pub fn new(cfg: &RelayConfig) -> Result<Self, StartupError> {
        let endpoint = parse_downstream_url(&cfg.downstream_url)?;
        let client = crate::http::build_relay_client(cfg)
            .map_err(|e| StartupError::HttpClient(e.to_string()))?;
        Ok(Self { client, endpoint })
    }

    /// 下游识别服务地址
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// 构造出站请求：单个 `file` 分片，保留原文件名，boundary 由 reqwest 重新生成。
    pub fn build_request(&self, file: UploadedFile) -> Result<Request, AppError> {
        let len = file.bytes.len() as u64;
        let part = Part::stream_with_length(Body::from(file.bytes), len)
            .file_name(file.file_name)
            .mime_str(FORM_FILE_MIME)?;
        let form = Form::new().part(FILE_FIELD, part);

        let request = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .build()?;
        Ok(request)
    }

    /// 转发文件并返回下游响应（仅等待响应头，body 由调用方流式读取）
    pub async fn relay(&self, file: UploadedFile) -> Result<Response, AppError> {
        let request = self.build_request(file)?;
        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| AppError::UpstreamCall(crate::error::error_chain(&e)))?;
        Ok(response)
    }
}

fn parse_downstream_url(raw: &str) -> Result<Url, StartupError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| StartupError::InvalidDownstreamUrl(format!("{raw}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(StartupError::InvalidDownstreamUrl(format!(
            "{raw}: 仅支持 http/https"
        )));
    }
    if url.host_str().is_none() {
        return Err(StartupError::InvalidDownstreamUrl(format!("{raw}: 缺少主机名")));
    }
    Ok(url)
}
