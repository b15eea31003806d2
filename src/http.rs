//! reqwestによるHTTP送信

use codesage_common::{Error, HttpClient, HttpResponse, MultipartForm};
use reqwest::multipart::{Form, Part};
use std::time::Duration;

pub struct ReqwestHttp {
    client: reqwest::Client,
}

impl ReqwestHttp {
    pub fn new(timeout_seconds: u64) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| Error::Config(format!("HTTPクライアント生成エラー: {}", e)))?;
        Ok(Self { client })
    }
}

fn to_reqwest_form(form: MultipartForm) -> Result<Form, Error> {
    form.parts.into_iter().try_fold(Form::new(), |acc, part| {
        let file_part = Part::bytes(part.bytes)
            .file_name(part.file_name.clone())
            .mime_str(&part.mime_type)
            .map_err(|e| {
                Error::Validation(format!("{}: 不正なMIMEタイプ {} ({})", part.file_name, part.mime_type, e))
            })?;
        Ok(acc.part(part.field, file_part))
    })
}

impl HttpClient for ReqwestHttp {
    async fn post_multipart(&self, url: &str, form: MultipartForm) -> Result<HttpResponse, Error> {
        let response = self
            .client
            .post(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .multipart(to_reqwest_form(form)?)
            .send()
            .await
            .map_err(|e| Error::transport(e.to_string()))?;

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or("").to_string();
        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(format!("レスポンス読み込みエラー: {}", e)))?;

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text,
            body,
        })
    }
}
