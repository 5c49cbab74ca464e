use reqwest::StatusCode;
use reqwest::multipart;
use serde::Deserialize;
use url::Url;

use crate::document::SelectedFile;
use crate::error::ConvertError;

/// Converted document returned by the service
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Conversion {
    /// Markdown text
    pub content: String,
    /// Original or server-assigned file name
    pub filename: String,
}

/// Body of a failed request; `detail` is only trusted when it is a string
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// What the service root says about itself
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    #[serde(default)]
    pub usage: Option<String>,
    #[serde(default)]
    pub supported_formats: Vec<String>,
}

/// The remote collaborator that turns a document into Markdown.
/// Only ever used through generics, so the returned futures need no `Send` bound.
#[allow(async_fn_in_trait)]
pub trait ConversionService {
    async fn convert(
        &self,
        file: &SelectedFile,
        endpoint: &Url,
    ) -> Result<Conversion, ConvertError>;
}

#[derive(Debug, Clone)]
pub struct HttpConverter {
    client: reqwest::Client,
}

impl Default for HttpConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpConverter {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Fetch the service description from its root
    pub async fn service_info(&self, root: &Url) -> Result<ServiceInfo, ConvertError> {
        let response = self.client.get(root.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ConvertError::Service {
                status: status.as_u16(),
                detail: error_detail(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

impl ConversionService for HttpConverter {
    async fn convert(
        &self,
        file: &SelectedFile,
        endpoint: &Url,
    ) -> Result<Conversion, ConvertError> {
        let mut file_part =
            multipart::Part::bytes(file.data().to_vec()).file_name(file.name().to_string());
        if let Some(format) = file.format() {
            file_part = file_part.mime_str(format.mime_type())?;
        }

        let form = multipart::Form::new().part("file", file_part);

        tracing::debug!(%endpoint, file = file.name(), bytes = file.size(), "uploading document");

        let response = self
            .client
            .post(endpoint.clone())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(%status, body_len = body.len(), "conversion service responded");

        interpret_response(status, &body)
    }
}

/// Turn a status and raw body into a conversion or a typed failure
pub fn interpret_response(status: StatusCode, body: &str) -> Result<Conversion, ConvertError> {
    if !status.is_success() {
        return Err(ConvertError::Service {
            status: status.as_u16(),
            detail: error_detail(body),
        });
    }

    Ok(serde_json::from_str::<Conversion>(body)?)
}

fn error_detail(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .filter(|d| !d.trim().is_empty())
}
