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
use crate::model::{Language, Message, MessageRole};
use crate::prelude::*;
use std::io::prelude::*;
use std::path::{Path, PathBuf};

/// Plain text transcript, one `<role>: <content>` entry per message in creation order.
pub fn export_transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|message| {
            let sender = match message.role {
                MessageRole::User => UiText::UserRole,
                MessageRole::Assistant => UiText::AssistantRole,
            };
            format!("{}: {}", sender.localize(message.language), message.content)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn export_file_name(language: Language) -> &'static str {
    match language {
        Language::French => "conversation-juridique.txt",
        Language::Arabic => "محادثة-قانونية.txt",
    }
}

/// Writes the transcript into `dir` and returns the created file.
pub fn write_transcript(dir: &Path, language: Language, messages: &[Message]) -> Fallible<PathBuf> {
    let path = dir.join(export_file_name(language));
    let mut writer = std::io::BufWriter::new(
        std::fs::File::create(&path)
            .with_context(|| format!("failed to create {}", path.display()))?,
    );
    writer.write_all(export_transcript(messages).as_bytes())?;
    writer.flush()?;

    info!(path = %path.display(), count = messages.len(), "export");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation() -> Vec<Message> {
        vec![
            Message::user("Quels sont mes droits ?".into(), Language::French),
            Message::assistant("Selon l'article 12...".into(), Language::French),
            Message::user("شنية حقوقي؟".into(), Language::Arabic),
            Message::assistant("وفقًا للفصل 15".into(), Language::Arabic),
        ]
    }

    #[test]
    fn transcript_keeps_creation_order() {
        assert_eq!(
            "Vous: Quels sont mes droits ?\n\nAssistant: Selon l'article 12...\n\nأنت: شنية حقوقي؟\n\nالمساعد: وفقًا للفصل 15",
            export_transcript(&conversation()),
        );
    }

    #[test]
    fn transcript_of_nothing() {
        assert_eq!("", export_transcript(&[]));
    }

    #[test]
    fn every_entry_has_role_prefix() {
        let messages = conversation();
        let transcript = export_transcript(&messages);
        let entries = transcript.split("\n\n").collect::<Vec<_>>();
        assert_eq!(messages.len(), entries.len());
        for (entry, message) in entries.iter().zip(&messages) {
            assert!(entry.ends_with(&message.content));
        }
    }

    #[test]
    fn file_name_is_localized() {
        assert_eq!("conversation-juridique.txt", export_file_name(Language::French));
        assert_eq!("محادثة-قانونية.txt", export_file_name(Language::Arabic));
    }

    #[test]
    fn write_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_transcript(dir.path(), Language::Arabic, &conversation()).unwrap();
        assert_eq!(dir.path().join("محادثة-قانونية.txt"), path);
        assert_eq!(
            export_transcript(&conversation()),
            std::fs::read_to_string(path).unwrap(),
        );
    }
}
