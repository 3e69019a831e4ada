//! Cloudinary-compatible signed upload client.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{
    Client,
    multipart::{Form, Part},
};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::{debug, info};

use crate::domain::media::{MediaError, MediaHost, MediaUpload, StoredMedia};

/// Connection settings for the media host.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub base_url: String,
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: Option<String>,
    pub timeout: Duration,
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    url: Option<String>,
    public_id: String,
}

#[derive(Deserialize)]
struct DestroyResponse {
    result: String,
}

/// Media host backed by Cloudinary's signed upload API.
///
/// Requests are signed with SHA-256 over the sorted parameters followed by the
/// API secret.
pub struct CloudinaryMediaHost {
    client: Client,
    config: CloudinaryConfig,
}

impl CloudinaryMediaHost {
    /// Builds the HTTP client with the configured request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::Transport`] if the client cannot be constructed.
    pub fn new(config: CloudinaryConfig) -> Result<Self, MediaError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MediaError::Transport(e.to_string()))?;

        info!(
            "Media host configured: {} (cloud: {})",
            config.base_url, config.cloud_name
        );

        Ok(Self { client, config })
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/v1_1/{}/image/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.cloud_name,
            action
        )
    }

    /// Signs `params` as `k1=v1&k2=v2…{secret}` with keys in lexical order.
    fn sign(&self, params: &mut [(&str, String)]) -> String {
        params.sort_by(|a, b| a.0.cmp(b.0));
        let joined = params
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha256::new();
        hasher.update(joined.as_bytes());
        hasher.update(self.config.api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    fn signed_form(&self, mut params: Vec<(&'static str, String)>) -> Form {
        let signature = self.sign(&mut params);
        let mut form = Form::new();
        for (key, value) in params {
            form = form.text(key, value);
        }
        form.text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256")
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, MediaError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(MediaError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

fn transport(e: reqwest::Error) -> MediaError {
    MediaError::Transport(e.to_string())
}

#[async_trait]
impl MediaHost for CloudinaryMediaHost {
    async fn upload(&self, upload: &MediaUpload) -> Result<StoredMedia, MediaError> {
        let mut params = vec![("timestamp", Utc::now().timestamp().to_string())];
        if let Some(folder) = &self.config.folder {
            params.push(("folder", folder.clone()));
        }

        let file = Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(&upload.content_type)
            .map_err(|e| MediaError::InvalidResponse(format!("invalid content type: {e}")))?;

        let form = self.signed_form(params).part("file", file);

        let response = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;

        let body: UploadResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| MediaError::InvalidResponse(e.to_string()))?;

        let url = body
            .secure_url
            .or(body.url)
            .ok_or_else(|| MediaError::InvalidResponse("missing url".to_string()))?;

        debug!(public_id = %body.public_id, %url, "Avatar uploaded");

        Ok(StoredMedia {
            url,
            public_id: body.public_id,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<(), MediaError> {
        let params = vec![
            ("public_id", public_id.to_string()),
            ("timestamp", Utc::now().timestamp().to_string()),
        ];

        let response = self
            .client
            .post(self.endpoint("destroy"))
            .multipart(self.signed_form(params))
            .send()
            .await
            .map_err(transport)?;

        let body: DestroyResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| MediaError::InvalidResponse(e.to_string()))?;

        match body.result.as_str() {
            "ok" | "not found" => Ok(()),
            other => Err(MediaError::InvalidResponse(format!(
                "unexpected destroy result: {other}"
            ))),
        }
    }
}
