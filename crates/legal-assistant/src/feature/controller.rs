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

use crate::data::repository::{GetLegalAssistantRepository, LegalAssistantRepository};
use crate::feature::retry::RetryPolicy;
use crate::feature::session::{ChatSession, SessionError};
use crate::model::ProgressCallback;
use crate::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;

/// Drives a [ChatSession] against the backend. Holding the session mutably for the whole
/// request keeps at most one request of each kind in flight.
pub struct ChatController<Ctx> {
    context: Ctx,
    session: ChatSession,
    retry: RetryPolicy,
}

impl<Ctx> ChatController<Ctx>
where
    Ctx: GetLegalAssistantRepository,
{
    pub fn new(context: Ctx, session: ChatSession) -> Self {
        Self {
            context,
            session,
            retry: Default::default(),
        }
    }

    /// Applied to feedback and upload requests.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ChatSession {
        &mut self.session
    }

    /// Asks a question. Returns the index of the answer, `None` when the input was blank or
    /// the request failed. The failure is kept in [ChatSession::error].
    pub async fn submit(&mut self, input: &str) -> Result<Option<usize>, SessionError> {
        let Some(request) = self.session.begin_chat(input)? else {
            return Ok(None);
        };

        let result = self
            .context
            .get_legal_assistant_repo()
            .send_chat(&request.conversation_id, &request.message, request.language)
            .await;
        Ok(self.session.complete_chat(result))
    }

    /// Returns `true` when the rating was recorded.
    pub async fn rate(
        &mut self,
        message_index: usize,
        rating: u8,
        comment: &str,
    ) -> Result<bool, SessionError> {
        let feedback = self.session.rate(message_index, rating, comment)?;
        info!(message_index, rating, "send feedback");

        let repo = self.context.get_legal_assistant_repo();
        let feedback = &feedback;
        let result = self.retry.run(move || repo.send_feedback(feedback)).await;
        Ok(self.session.complete_feedback(result))
    }

    /// Uploads `path` for analysis. `on_progress` additionally receives the upload progress.
    /// Returns the index of the document summary, `None` when the upload failed. The failure
    /// is kept in the [UploadState](crate::model::UploadState) of the session.
    pub async fn upload(
        &mut self,
        path: PathBuf,
        on_progress: Option<ProgressCallback>,
    ) -> Result<Option<usize>, SessionError> {
        self.session.open_upload();
        if let Err(e) = self.session.select_file(path) {
            // keeps the dialog closed when nothing was selected.
            self.session.cancel_upload()?;
            return Err(e);
        }

        let request = self.session.begin_upload()?;
        info!(path = %request.path.display(), "upload document");

        let progress: ProgressCallback = match on_progress {
            Some(on_progress) => {
                let state = request.progress.clone();
                Arc::new(move |percent| {
                    state(percent);
                    on_progress(percent);
                })
            }
            None => request.progress.clone(),
        };

        let repo = self.context.get_legal_assistant_repo();
        let request = &request;
        let result = self
            .retry
            .run(move || {
                repo.upload_document(
                    &request.conversation_id,
                    &request.path,
                    request.language,
                    progress.clone(),
                )
            })
            .await;

        Ok(self.session.complete_upload(result))
    }
}
