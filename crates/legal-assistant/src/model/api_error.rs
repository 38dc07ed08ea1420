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

use crate::feature::i18n::UiText;
use crate::model::Language;
use reqwest::StatusCode;
use std::fmt::{Display, Formatter};

/// Failure of a request to the assistant backend.
#[derive(Debug)]
pub enum ApiError {
    Timeout,
    Network(reqwest::Error),
    Status {
        status: StatusCode,
        detail: Option<String>,
    },
    EmptyResponse,
    MalformedResponse(serde_json::Error),
    /// Rejected before sending: unsupported type or too large.
    InvalidDocument(String),
    Io(std::io::Error),
}

/// Which request failed. Selects the wording shown to the user.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RequestKind {
    Chat,
    Feedback,
    Upload,
}

impl ApiError {
    /// Worth another attempt: timeouts, connection failures and 5xx answers.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Timeout | ApiError::Network(_) => true,
            ApiError::Status { status, .. } => status.is_server_error(),
            ApiError::EmptyResponse
            | ApiError::MalformedResponse(_)
            | ApiError::InvalidDocument(_)
            | ApiError::Io(_) => false,
        }
    }

    /// Message shown inline to the user.
    pub fn localized_message(&self, language: Language, kind: RequestKind) -> String {
        if kind == RequestKind::Upload {
            return match self {
                ApiError::InvalidDocument(reason) => {
                    format!("{}: {reason}", UiText::UploadFailed.localize(language))
                }
                _ => UiText::UploadFailed.localize(language).to_owned(),
            };
        }

        match self {
            ApiError::Timeout => UiText::TimeoutError.localize(language).to_owned(),
            ApiError::Status { status, detail } => {
                let mut message = format!(
                    "{}: {}",
                    UiText::ServerError.localize(language),
                    status.as_u16(),
                );
                if let Some(detail) = detail {
                    message.push_str(" - ");
                    message.push_str(detail);
                }
                message
            }
            _ => UiText::CommunicationError.localize(language).to_owned(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Network(value)
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(value: std::io::Error) -> Self {
        ApiError::Io(value)
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Timeout => f.write_str("request timed out"),
            ApiError::Network(_) => f.write_str("failed to communicate with the server"),
            ApiError::Status {
                status,
                detail: Some(detail),
            } => write!(f, "unexpected status code: {}, {detail}", status.as_u16()),
            ApiError::Status {
                status,
                detail: None,
            } => write!(f, "unexpected status code: {}", status.as_u16()),
            ApiError::EmptyResponse => f.write_str("empty response"),
            ApiError::MalformedResponse(_) => f.write_str("malformed response"),
            ApiError::InvalidDocument(reason) => write!(f, "invalid document: {reason}"),
            ApiError::Io(_) => f.write_str("failed to read the document"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Network(e) => Some(e),
            ApiError::MalformedResponse(e) => Some(e),
            ApiError::Io(e) => Some(e),
            _ => None,
        }
    }
}
