use super::{bearer, join_url};
use crate::error::{ClientError, Result};
use crate::session::Session;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, StatusCode};
use serde::Deserialize;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::{debug, info, warn};

/// File metadata as returned by the file service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteFile {
    #[serde(rename = "FileID")]
    pub id: String,
    #[serde(rename = "FileName")]
    pub name: String,
    #[serde(rename = "Size", default)]
    pub size: i64,
    #[serde(rename = "ContentType", default)]
    pub content_type: String,
    #[serde(rename = "Version", default = "default_version")]
    pub version: i32,
    #[serde(rename = "CreatedAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "CreatedBy", default)]
    pub created_by: Option<String>,
}

fn default_version() -> i32 {
    1
}

#[derive(Deserialize)]
struct ListResponse {
    #[serde(default)]
    files: Option<Vec<RemoteFile>>,
}

#[derive(Clone)]
pub struct FilesClient {
    client: reqwest::Client,
    base_url: String,
    upload_endpoint: String,
}

impl FilesClient {
    pub fn new(client: reqwest::Client, base_url: String, upload_endpoint: String) -> Self {
        Self {
            client,
            base_url,
            upload_endpoint,
        }
    }

    pub async fn list(&self, session: Option<&Session>) -> Result<Vec<RemoteFile>> {
        let auth = bearer(session)?;
        let url = join_url(&self.base_url, "/api/v1/files/list");
        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, auth)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::from_response(response).await);
        }

        let body: ListResponse = serde_json::from_slice(&response.bytes().await?)?;
        let files = body.files.unwrap_or_default();
        debug!(count = files.len(), "Fetched file list");
        Ok(files)
    }

    pub async fn delete(&self, session: Option<&Session>, file_id: &str) -> Result<()> {
        let auth = bearer(session)?;
        let url = join_url(&self.base_url, &format!("/api/v1/files/{}", file_id));
        let response = self
            .client
            .delete(&url)
            .header(AUTHORIZATION, auth)
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(file_id = %file_id, status = %response.status(), "Failed to delete the file");
            return Err(ClientError::from_response(response).await);
        }

        info!(file_id = %file_id, "File deleted");
        Ok(())
    }

    /// Streams the file body into `dest`. A partially written file is removed on failure.
    pub async fn download(
        &self,
        session: Option<&Session>,
        file_id: &str,
        dest: &Path,
    ) -> Result<u64> {
        let auth = bearer(session)?;
        let url = join_url(&self.base_url, &format!("/api/v1/files/download/{}", file_id));
        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, auth)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::from_response(response).await);
        }

        let file = tokio::fs::File::create(dest).await?;
        match write_body(response, file).await {
            Ok(written) => {
                info!(file_id = %file_id, bytes = written, path = %dest.display(), "File downloaded");
                Ok(written)
            }
            Err(e) => {
                let _ = tokio::fs::remove_file(dest).await;
                Err(e)
            }
        }
    }

    /// Sends one multipart upload. `on_progress(sent, total)` fires as the
    /// request body is consumed. Only HTTP 200 counts as success.
    pub async fn upload<F>(
        &self,
        session: Option<&Session>,
        path: &Path,
        file_name: &str,
        size_label: &str,
        mut on_progress: F,
    ) -> Result<()>
    where
        F: FnMut(u64, u64) + Send + Sync + 'static,
    {
        let auth = bearer(session)?;
        let file = tokio::fs::File::open(path).await?;
        let total = file.metadata().await?.len();

        let mut sent = 0u64;
        let stream = ReaderStream::new(file).inspect(move |chunk| {
            if let Ok(bytes) = chunk {
                sent += bytes.len() as u64;
                on_progress(sent, total);
            }
        });

        let part = Part::stream_with_length(Body::wrap_stream(stream), total)
            .file_name(file_name.to_string());
        let form = Form::new()
            .part("files", part)
            .text("fileName", file_name.to_string())
            .text("fileSize", size_label.to_string());

        debug!(file = %file_name, bytes = total, endpoint = %self.upload_endpoint, "Sending upload");
        let response = self
            .client
            .post(&self.upload_endpoint)
            .header(AUTHORIZATION, auth)
            .multipart(form)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(ClientError::from_response(response).await);
        }
        Ok(())
    }
}

async fn write_body(response: reqwest::Response, mut file: tokio::fs::File) -> Result<u64> {
    let mut stream = response.bytes_stream();
    let mut written = 0u64;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}
