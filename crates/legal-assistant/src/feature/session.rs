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

//! Client side state of one conversation.
//!
//! [ChatSession] owns every piece of state the user interacts with. Requests are started
//! with a `begin_*` method that returns what has to be sent, and the answer is handed back
//! through the matching `complete_*` method.

use crate::data::repository::validate_document;
use crate::feature::export::{export_file_name, export_transcript};
use crate::feature::i18n::{Dialect, UiText, suggestions};
use crate::model::{
    ApiError, ChatReply, ConversationID, DocumentReport, Feedback, FeedbackDraft, Language,
    Message, ProgressCallback, RequestKind, Theme, UploadState, detect_language,
};
use crate::prelude::*;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Rejected user action. The state is left untouched.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SessionError {
    /// A request of the same kind is in flight.
    Busy,
    UnknownMessage(usize),
    /// User messages and document summaries cannot be rated.
    NotRateable(usize),
    AlreadyRated(usize),
    InvalidRating(u8),
    NoRatingSelected,
    FeedbackDialogClosed,
    UploadDialogClosed,
    NoFileSelected,
    InvalidDocument(String),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Busy => f.write_str("a request is already in progress"),
            SessionError::UnknownMessage(index) => write!(f, "no message #{index}"),
            SessionError::NotRateable(index) => write!(f, "message #{index} cannot be rated"),
            SessionError::AlreadyRated(index) => write!(f, "message #{index} is already rated"),
            SessionError::InvalidRating(rating) => {
                write!(f, "rating must be between 1 and 5: {rating}")
            }
            SessionError::NoRatingSelected => f.write_str("no rating selected"),
            SessionError::FeedbackDialogClosed => f.write_str("no rating in progress"),
            SessionError::UploadDialogClosed => f.write_str("no upload in progress"),
            SessionError::NoFileSelected => f.write_str("no file selected"),
            SessionError::InvalidDocument(reason) => f.write_str(reason),
        }
    }
}

impl std::error::Error for SessionError {}

/// What [ChatSession::begin_chat] wants sent.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChatRequest {
    pub conversation_id: ConversationID,
    pub message: String,
    pub language: Language,
}

/// What [ChatSession::begin_upload] wants sent.
#[derive(Clone)]
pub struct UploadRequest {
    pub conversation_id: ConversationID,
    pub path: PathBuf,
    pub language: Language,
    pub progress: ProgressCallback,
}

pub struct ChatSession {
    conversation_id: ConversationID,
    messages: Vec<Message>,
    loading: bool,
    error: Option<String>,
    notice: Option<String>,
    theme: Theme,
    current_language: Language,
    dialect: Dialect,
    search_query: String,
    feedback: Option<FeedbackDraft>,
    feedback_in_flight: bool,
    show_document_upload: bool,
    upload: Option<UploadState>,
    upload_in_flight: bool,
}

impl ChatSession {
    pub fn new(conversation_id: ConversationID) -> Self {
        Self {
            conversation_id,
            messages: vec![],
            loading: false,
            error: None,
            notice: None,
            theme: Default::default(),
            current_language: Default::default(),
            dialect: Default::default(),
            search_query: String::new(),
            feedback: None,
            feedback_in_flight: false,
            show_document_upload: false,
            upload: None,
            upload_in_flight: false,
        }
    }

    pub fn with_preferences(mut self, theme: Theme, dialect: Dialect) -> Self {
        self.theme = theme;
        self.dialect = dialect;
        self
    }

    pub fn conversation_id(&self) -> &ConversationID {
        &self.conversation_id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// One-shot status message such as the thanks for a rating.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggle();
        self.theme
    }

    pub fn current_language(&self) -> Language {
        self.current_language
    }

    pub fn toggle_language(&mut self) -> Language {
        self.current_language = self.current_language.toggle();
        self.current_language
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// UI string in the current language.
    pub fn text(&self, text: UiText) -> &'static str {
        text.localize_with(self.current_language, self.dialect)
    }

    pub fn suggestions(&self) -> Vec<&'static str> {
        suggestions(self.current_language, self.dialect)
    }

    /// Follows the language of what the user is typing.
    pub fn input_changed(&mut self, input: &str) {
        if !input.is_empty() {
            self.current_language = detect_language(input);
        }
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn set_search_query(&mut self, query: &str) {
        self.search_query = query.to_owned();
    }

    /// Messages matching the search query with their index in the conversation.
    /// A blank query shows everything. Otherwise the query is matched as typed, surrounding
    /// spaces included.
    pub fn visible_messages(&self) -> Vec<(usize, &Message)> {
        let blank = self.search_query.trim().is_empty();
        let query = self.search_query.to_lowercase();
        self.messages
            .iter()
            .enumerate()
            .filter(|(_, message)| blank || message.content.to_lowercase().contains(&query))
            .collect()
    }

    pub fn transcript(&self) -> String {
        export_transcript(&self.messages)
    }

    pub fn transcript_file_name(&self) -> &'static str {
        export_file_name(self.current_language)
    }

    /// Appends the question and marks the session as loading. Blank input is ignored without
    /// touching the state.
    pub fn begin_chat(&mut self, input: &str) -> Result<Option<ChatRequest>, SessionError> {
        let message = input.trim();
        if message.is_empty() {
            return Ok(None);
        }

        if self.loading {
            return Err(SessionError::Busy);
        }

        let language = detect_language(message);
        self.current_language = language;
        self.messages.push(Message::user(message.to_owned(), language));
        self.loading = true;
        self.error = None;

        Ok(Some(ChatRequest {
            conversation_id: self.conversation_id.clone(),
            message: message.to_owned(),
            language,
        }))
    }

    /// Returns the index of the answer.
    pub fn complete_chat(&mut self, result: Result<ChatReply, ApiError>) -> Option<usize> {
        self.loading = false;

        match result {
            Ok(reply) => {
                self.current_language = reply.language;
                self.messages
                    .push(Message::assistant(reply.content, reply.language));
                Some(self.messages.len() - 1)
            }
            Err(e) => {
                warn!(%e, "chat failed");
                self.error = Some(e.localized_message(self.current_language, RequestKind::Chat));
                None
            }
        }
    }

    pub fn feedback_draft(&self) -> Option<&FeedbackDraft> {
        self.feedback.as_ref()
    }

    pub fn open_feedback(&mut self, message_index: usize) -> Result<(), SessionError> {
        if self.feedback_in_flight {
            return Err(SessionError::Busy);
        }

        self.check_rateable(message_index)?;
        self.feedback = Some(FeedbackDraft {
            message_index,
            ..Default::default()
        });
        Ok(())
    }

    pub fn set_rating(&mut self, rating: u8) -> Result<(), SessionError> {
        if !(1..=5).contains(&rating) {
            return Err(SessionError::InvalidRating(rating));
        }

        let draft = self
            .feedback
            .as_mut()
            .ok_or(SessionError::FeedbackDialogClosed)?;
        draft.rating = rating;
        Ok(())
    }

    pub fn set_feedback_comment(&mut self, comment: &str) -> Result<(), SessionError> {
        let draft = self
            .feedback
            .as_mut()
            .ok_or(SessionError::FeedbackDialogClosed)?;
        draft.comment = comment.to_owned();
        Ok(())
    }

    pub fn cancel_feedback(&mut self) -> Result<(), SessionError> {
        if self.feedback_in_flight {
            return Err(SessionError::Busy);
        }

        self.feedback = None;
        Ok(())
    }

    pub fn begin_feedback(&mut self) -> Result<Feedback, SessionError> {
        if self.feedback_in_flight {
            return Err(SessionError::Busy);
        }

        let draft = self
            .feedback
            .as_ref()
            .ok_or(SessionError::FeedbackDialogClosed)?;
        if draft.rating == 0 {
            return Err(SessionError::NoRatingSelected);
        }
        self.check_rateable(draft.message_index)?;

        let feedback = Feedback {
            conversation_id: self.conversation_id.clone(),
            message_id: draft.message_index.to_string(),
            rating: draft.rating,
            comment: draft.comment.clone(),
        };
        self.feedback_in_flight = true;
        Ok(feedback)
    }

    /// Returns `true` when the rating was recorded.
    pub fn complete_feedback(&mut self, result: Result<(), ApiError>) -> bool {
        self.feedback_in_flight = false;

        match result {
            Ok(()) => {
                if let Some(draft) = self.feedback.take() {
                    if let Some(message) = self.messages.get_mut(draft.message_index) {
                        message.rated = true;
                    }
                }
                self.notice = Some(self.text(UiText::FeedbackThanks).to_owned());
                true
            }
            Err(e) => {
                warn!(%e, "feedback failed");
                self.error =
                    Some(e.localized_message(self.current_language, RequestKind::Feedback));
                false
            }
        }
    }

    /// Opens the rating dialog, selects the stars and starts sending in one step.
    pub fn rate(
        &mut self,
        message_index: usize,
        rating: u8,
        comment: &str,
    ) -> Result<Feedback, SessionError> {
        if !(1..=5).contains(&rating) {
            return Err(SessionError::InvalidRating(rating));
        }

        self.open_feedback(message_index)?;
        self.set_rating(rating)?;
        self.set_feedback_comment(comment)?;
        self.begin_feedback()
    }

    fn check_rateable(&self, message_index: usize) -> Result<(), SessionError> {
        let message = self
            .messages
            .get(message_index)
            .ok_or(SessionError::UnknownMessage(message_index))?;
        if message.rated {
            Err(SessionError::AlreadyRated(message_index))
        } else if message.is_rateable() {
            Ok(())
        } else {
            Err(SessionError::NotRateable(message_index))
        }
    }

    pub fn is_upload_dialog_open(&self) -> bool {
        self.show_document_upload
    }

    pub fn upload_state(&self) -> Option<&UploadState> {
        self.upload.as_ref()
    }

    pub fn open_upload(&mut self) {
        self.show_document_upload = true;
    }

    pub fn select_file(&mut self, path: PathBuf) -> Result<&UploadState, SessionError> {
        if !self.show_document_upload {
            return Err(SessionError::UploadDialogClosed);
        }
        if self.upload_in_flight {
            return Err(SessionError::Busy);
        }

        let info = validate_document(&path).map_err(|e| {
            SessionError::InvalidDocument(
                e.localized_message(self.current_language, RequestKind::Upload),
            )
        })?;

        Ok(&*self
            .upload
            .insert(UploadState::new(path, info.file_name, info.size)))
    }

    /// Closes the dialog and forgets the selected file.
    pub fn cancel_upload(&mut self) -> Result<(), SessionError> {
        if self.upload_in_flight {
            return Err(SessionError::Busy);
        }

        self.show_document_upload = false;
        self.upload = None;
        Ok(())
    }

    pub fn begin_upload(&mut self) -> Result<UploadRequest, SessionError> {
        if !self.show_document_upload {
            return Err(SessionError::UploadDialogClosed);
        }
        if self.upload_in_flight {
            return Err(SessionError::Busy);
        }

        let status_text = self.text(UiText::UploadInProgress).to_owned();
        let upload = self.upload.as_mut().ok_or(SessionError::NoFileSelected)?;
        upload.status_text = Some(status_text);
        upload.set_progress_percent(0);

        let request = UploadRequest {
            conversation_id: self.conversation_id.clone(),
            path: upload.path.clone(),
            language: self.current_language,
            progress: upload.progress_callback(),
        };
        self.upload_in_flight = true;
        Ok(request)
    }

    /// Returns the index of the document summary.
    pub fn complete_upload(&mut self, result: Result<DocumentReport, ApiError>) -> Option<usize> {
        self.upload_in_flight = false;

        match result {
            Ok(report) => {
                let file_name = self
                    .upload
                    .take()
                    .map(|data| data.file_name)
                    .unwrap_or(report.file_name);
                let content = format!(
                    "{}\n\n{}",
                    self.text(UiText::DocumentAnalyzed),
                    report.summary,
                );
                self.messages.push(Message::document(
                    content,
                    self.current_language,
                    file_name,
                ));
                self.show_document_upload = false;
                self.notice = Some(self.text(UiText::UploadSucceeded).to_owned());
                Some(self.messages.len() - 1)
            }
            Err(e) => {
                warn!(%e, "upload failed");
                let message = e.localized_message(self.current_language, RequestKind::Upload);
                if let Some(upload) = self.upload.as_mut() {
                    upload.set_progress_percent(0);
                    upload.status_text = Some(message);
                }
                None
            }
        }
    }
}
