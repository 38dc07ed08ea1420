/*
 * Copyright 2026 sukawasatoru
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use crate::model::{
    ApiError, ChatReply, ConversationID, DocumentReport, Feedback, Language, MessageRole,
    ProgressCallback,
};
use crate::prelude::*;
use bytes::Bytes;
use futures::Stream;
use mime::Mime;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, Response, header};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::instrument;
use url::Url;

/// Extensions offered by the upload dialog.
pub const ACCEPTED_DOCUMENT_EXTENSIONS: [&str; 4] = ["pdf", "doc", "docx", "txt"];

/// The backend refuses bigger files with 413.
pub const MAX_DOCUMENT_SIZE: u64 = 50 * 1024 * 1024;

const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

pub trait GetLegalAssistantRepository {
    type Repo: LegalAssistantRepository;

    fn get_legal_assistant_repo(&self) -> &Self::Repo;
}

/// The three endpoints of the assistant backend.
pub trait LegalAssistantRepository {
    /// `POST /chat/`
    fn send_chat(
        &self,
        conversation_id: &ConversationID,
        message: &str,
        language: Language,
    ) -> impl Future<Output = Result<ChatReply, ApiError>> + Send;

    /// `POST /feedback/`
    fn send_feedback(&self, feedback: &Feedback)
    -> impl Future<Output = Result<(), ApiError>> + Send;

    /// `POST /upload_document/`
    fn upload_document(
        &self,
        conversation_id: &ConversationID,
        path: &Path,
        language: Language,
        progress: ProgressCallback,
    ) -> impl Future<Output = Result<DocumentReport, ApiError>> + Send;
}

#[derive(Clone, Debug)]
pub struct RepositoryConfig {
    pub base_url: Url,
    /// Only timeout of a chat request.
    pub chat_timeout: Duration,
    /// Timeout of feedback and upload requests.
    pub request_timeout: Duration,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/".parse().expect("default base url"),
            chat_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(60),
        }
    }
}

pub struct LegalAssistantRepositoryImpl {
    client: Client,
    config: RepositoryConfig,
    chat_url: Url,
    feedback_url: Url,
    upload_url: Url,
}

impl LegalAssistantRepositoryImpl {
    pub fn create(mut config: RepositoryConfig) -> Fallible<Self> {
        ensure!(
            matches!(config.base_url.scheme(), "http" | "https"),
            "unsupported scheme: {}",
            config.base_url,
        );

        // `Url::join` replaces the last segment unless the path is a directory.
        if !config.base_url.path().ends_with('/') {
            let path = format!("{}/", config.base_url.path());
            config.base_url.set_path(&path);
        }

        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            chat_url: config.base_url.join("chat/")?,
            feedback_url: config.base_url.join("feedback/")?,
            upload_url: config.base_url.join("upload_document/")?,
            client,
            config,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.config.base_url
    }
}

/// ref. [LegalAssistantRepository::send_chat]
#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    role: MessageRole,
    conversation_id: &'a ConversationID,
}

/// ref. [ChatRequest]
#[derive(Deserialize)]
struct ChatResponse {
    response: Option<String>,
    /// `"arabic"` or `"french"`.
    language: Option<String>,
}

/// ref. [LegalAssistantRepository::upload_document]
#[derive(Deserialize)]
struct UploadResponse {
    filename: Option<String>,
    size: Option<String>,
    summary: String,
}

impl LegalAssistantRepository for LegalAssistantRepositoryImpl {
    #[instrument(skip(self, message))]
    async fn send_chat(
        &self,
        conversation_id: &ConversationID,
        message: &str,
        language: Language,
    ) -> Result<ChatReply, ApiError> {
        let res = self
            .client
            .post(self.chat_url.clone())
            .header(header::ACCEPT_LANGUAGE, language.code())
            .json(&ChatRequest {
                message,
                role: MessageRole::User,
                conversation_id,
            })
            .timeout(self.config.chat_timeout)
            .send()
            .await?;

        let body = read_body(res).await?;
        if body.trim().is_empty() {
            return Err(ApiError::EmptyResponse);
        }

        let res = serde_json::from_str::<ChatResponse>(&body).map_err(ApiError::MalformedResponse)?;
        match res.response {
            Some(content) if !content.trim().is_empty() => Ok(ChatReply {
                content,
                language: Language::from_backend_tag(res.language.as_deref()),
            }),
            _ => Err(ApiError::EmptyResponse),
        }
    }

    #[instrument(skip_all, fields(message_id = %feedback.message_id, rating = feedback.rating))]
    async fn send_feedback(&self, feedback: &Feedback) -> Result<(), ApiError> {
        let res = self
            .client
            .post(self.feedback_url.clone())
            .json(feedback)
            .timeout(self.config.request_timeout)
            .send()
            .await?;

        read_body(res).await?;
        Ok(())
    }

    #[instrument(skip(self, progress))]
    async fn upload_document(
        &self,
        conversation_id: &ConversationID,
        path: &Path,
        language: Language,
        progress: ProgressCallback,
    ) -> Result<DocumentReport, ApiError> {
        let info = validate_document(path)?;
        let data = Bytes::from(tokio::fs::read(path).await?);
        let length = data.len() as u64;
        debug!(file_name = %info.file_name, length, "upload");

        let part = Part::stream_with_length(
            Body::wrap_stream(progress_stream(data, progress.clone())),
            length,
        )
        .file_name(info.file_name.clone())
        .mime_str(info.mime.as_ref())?;

        let form = Form::new()
            .part("file", part)
            .text("conversation_id", conversation_id.0.clone())
            .text("language", language.code());

        let res = self
            .client
            .post(self.upload_url.clone())
            .multipart(form)
            .timeout(self.config.request_timeout)
            .send()
            .await?;

        let body = read_body(res).await?;
        let res =
            serde_json::from_str::<UploadResponse>(&body).map_err(ApiError::MalformedResponse)?;
        progress(100);

        Ok(DocumentReport {
            file_name: res.filename.unwrap_or(info.file_name),
            summary: res.summary,
            size: res.size,
        })
    }
}

/// Checked document metadata.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DocumentInfo {
    pub file_name: String,
    pub size: u64,
    pub mime: Mime,
}

/// Rejects files the backend would refuse anyway.
pub fn validate_document(path: &Path) -> Result<DocumentInfo, ApiError> {
    let file_name = path
        .file_name()
        .and_then(|data| data.to_str())
        .ok_or_else(|| ApiError::InvalidDocument(format!("no file name: {}", path.display())))?
        .to_owned();

    let extension = path
        .extension()
        .and_then(|data| data.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    let mime = match extension.as_str() {
        "pdf" => mime::APPLICATION_PDF,
        "txt" => mime::TEXT_PLAIN_UTF_8,
        "doc" => "application/msword"
            .parse()
            .map_err(|_| ApiError::InvalidDocument("application/msword".into()))?,
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            .parse()
            .map_err(|_| ApiError::InvalidDocument("docx".into()))?,
        _ => {
            return Err(ApiError::InvalidDocument(format!(
                "unsupported file type: {file_name} (accepted: {})",
                ACCEPTED_DOCUMENT_EXTENSIONS.join(", "),
            )));
        }
    };

    let size = std::fs::metadata(path)?.len();
    if MAX_DOCUMENT_SIZE < size {
        return Err(ApiError::InvalidDocument(format!(
            "file too large: {size} bytes (max {MAX_DOCUMENT_SIZE})"
        )));
    }

    Ok(DocumentInfo {
        file_name,
        size,
        mime,
    })
}

async fn read_body(res: Response) -> Result<String, ApiError> {
    let status = res.status();
    let body = res.text().await?;
    trace!(%status, %body);

    if !status.is_success() {
        return Err(ApiError::Status {
            status,
            detail: extract_detail(&body),
        });
    }

    Ok(body)
}

/// `detail` of an error answer. Validation errors carry a list instead of a string.
fn extract_detail(body: &str) -> Option<String> {
    let value = serde_json::from_str::<serde_json::Value>(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(data) => Some(data.clone()),
        serde_json::Value::Null => None,
        data => Some(data.to_string()),
    }
}

fn progress_stream(
    data: Bytes,
    progress: ProgressCallback,
) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Send + Sync + 'static {
    let total = data.len();
    let chunks = (0..total)
        .step_by(UPLOAD_CHUNK_SIZE)
        .map(|start| data.slice(start..(start + UPLOAD_CHUNK_SIZE).min(total)))
        .collect::<Vec<_>>();

    let mut sent = 0;
    futures::stream::iter(chunks.into_iter().map(move |chunk| {
        sent += chunk.len();
        progress(percent(sent, total));
        Ok(chunk)
    }))
}

fn percent(sent: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }

    ((sent as u64 * 100 + total as u64 / 2) / total as u64).min(100) as u8
}
