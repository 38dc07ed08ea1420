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

use crate::model::Language;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Identifies the conversation to the backend. Constant for the whole session.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ConversationID(pub String);

impl ConversationID {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Display for ConversationID {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    pub language: Language,
    pub timestamp: DateTime<Utc>,
    pub rated: bool,
    pub is_document: bool,
    pub document_name: Option<String>,
}

impl Message {
    pub fn user(content: String, language: Language) -> Self {
        Self {
            role: MessageRole::User,
            content,
            language,
            timestamp: Utc::now(),
            rated: false,
            is_document: false,
            document_name: None,
        }
    }

    pub fn assistant(content: String, language: Language) -> Self {
        Self {
            role: MessageRole::Assistant,
            ..Self::user(content, language)
        }
    }

    /// Assistant message carrying the analysis of an uploaded document.
    pub fn document(content: String, language: Language, document_name: String) -> Self {
        Self {
            is_document: true,
            document_name: Some(document_name),
            ..Self::assistant(content, language)
        }
    }

    /// Whether the rating control is offered for this message.
    pub fn is_rateable(&self) -> bool {
        self.role == MessageRole::Assistant && !self.is_document && !self.rated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rateable() {
        assert!(!Message::user("q".into(), Language::French).is_rateable());
        assert!(Message::assistant("a".into(), Language::French).is_rateable());
        assert!(
            !Message::document("a".into(), Language::French, "a.pdf".into()).is_rateable()
        );

        let mut rated = Message::assistant("a".into(), Language::Arabic);
        rated.rated = true;
        assert!(!rated.is_rateable());
    }

    #[test]
    fn conversation_id_serialize() {
        let id = ConversationID("123".into());
        assert_eq!("\"123\"", serde_json::to_string(&id).unwrap());
        assert_ne!(ConversationID::generate(), ConversationID::generate());
    }
}
