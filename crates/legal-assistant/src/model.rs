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

pub use crate::model::api_error::{ApiError, RequestKind};
pub use crate::model::language::{Language, TextDirection, detect_language};
pub use crate::model::message::{ConversationID, Message, MessageRole};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

mod api_error;
mod language;
mod message;

/// Rating sent to `/feedback/`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Feedback {
    pub conversation_id: ConversationID,
    /// Index of the rated message, as a decimal string.
    pub message_id: String,
    pub rating: u8,
    pub comment: String,
}

/// Answer of `/chat/`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChatReply {
    pub content: String,
    pub language: Language,
}

/// Answer of `/upload_document/`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DocumentReport {
    pub file_name: String,
    pub summary: String,
    pub size: Option<String>,
}

/// Called with the percentage of the upload body handed to the connection.
pub type ProgressCallback = Arc<dyn Fn(u8) + Send + Sync>;

/// The document selected in the upload dialog.
#[derive(Clone, Debug)]
pub struct UploadState {
    pub path: PathBuf,
    pub file_name: String,
    pub size: u64,
    pub status_text: Option<String>,
    progress: Arc<AtomicU8>,
}

impl UploadState {
    pub fn new(path: PathBuf, file_name: String, size: u64) -> Self {
        Self {
            path,
            file_name,
            size,
            status_text: None,
            progress: Default::default(),
        }
    }

    pub fn progress_percent(&self) -> u8 {
        self.progress.load(Ordering::Relaxed)
    }

    pub fn set_progress_percent(&self, percent: u8) {
        self.progress.store(percent.min(100), Ordering::Relaxed);
    }

    /// Callback that publishes upload progress into this state.
    pub fn progress_callback(&self) -> ProgressCallback {
        let progress = self.progress.clone();
        Arc::new(move |percent| progress.store(percent.min(100), Ordering::Relaxed))
    }
}

/// Rating dialog contents.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FeedbackDraft {
    pub message_index: usize,
    /// `0` until the user picks a star.
    pub rating: u8,
    pub comment: String,
}

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    PartialEq,
    Deserialize,
    Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}
