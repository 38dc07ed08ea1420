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

use crate::model::Settings;
use legal_assistant::data::repository::RepositoryConfig;
use legal_assistant::feature::formatter::{
    BlockKind, FormattedText, SpanStyle, escape_terminal, format_legal_text,
};
use legal_assistant::feature::i18n::{Dialect, UiText};
use legal_assistant::model::{ConversationID, Message, MessageRole, Theme};
use legal_assistant::prelude::*;
use ratatui::crossterm::queue;
use ratatui::crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor,
};
use std::io::{Write, stdout};
use std::time::Duration;
use url::Url;

/// Command line flags win over `settings.toml`.
pub fn create_repository_config(settings: &Settings, arg_base_url: Option<Url>) -> RepositoryConfig {
    let default = RepositoryConfig::default();
    RepositoryConfig {
        base_url: arg_base_url
            .or_else(|| settings.base_url.clone())
            .unwrap_or(default.base_url),
        chat_timeout: settings
            .chat_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(default.chat_timeout),
        request_timeout: settings
            .request_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(default.request_timeout),
    }
}

pub fn resolve_conversation_id(
    arg_conversation_id: Option<String>,
    settings: &Settings,
) -> ConversationID {
    arg_conversation_id
        .or_else(|| settings.conversation_id.clone())
        .filter(|data| !data.trim().is_empty())
        .map(ConversationID)
        .unwrap_or_else(ConversationID::generate)
}

/// Terminal colors of a [Theme].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Palette {
    pub user: Color,
    pub assistant: Color,
    pub heading: Color,
    pub citation: Color,
    pub recommendation: Color,
    pub error: Color,
    pub notice: Color,
}

impl Palette {
    pub fn new(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                user: Color::DarkBlue,
                assistant: Color::DarkGreen,
                heading: Color::DarkBlue,
                citation: Color::DarkMagenta,
                recommendation: Color::DarkYellow,
                error: Color::DarkRed,
                notice: Color::DarkGreen,
            },
            Theme::Dark => Self {
                user: Color::Cyan,
                assistant: Color::Green,
                heading: Color::Cyan,
                citation: Color::Magenta,
                recommendation: Color::Yellow,
                error: Color::Red,
                notice: Color::Green,
            },
        }
    }
}

pub fn println_color(message: &str, color: Color, disable_color: bool) -> Fallible<()> {
    let message = escape_terminal(message);
    let mut out = stdout().lock();
    if disable_color {
        writeln!(out, "{message}")?;
    } else {
        queue!(
            out,
            SetForegroundColor(color),
            Print(message),
            ResetColor,
            Print('\n'),
        )?;
    }
    out.flush()?;
    Ok(())
}

/// Writes an annotated answer, one line per block.
pub fn write_formatted<W: Write>(
    out: &mut W,
    text: &FormattedText,
    palette: Palette,
    disable_color: bool,
) -> Fallible<()> {
    for block in &text.blocks {
        if disable_color {
            for span in &block.spans {
                write!(out, "{}", escape_terminal(&span.text))?;
            }
            writeln!(out)?;
            continue;
        }

        let color = match block.kind {
            BlockKind::Heading => {
                queue!(out, SetAttribute(Attribute::Bold))?;
                Some(palette.heading)
            }
            BlockKind::Recommendation => Some(palette.recommendation),
            BlockKind::Bullet | BlockKind::Paragraph => None,
        };

        for span in &block.spans {
            let text = escape_terminal(&span.text);
            match span.style {
                SpanStyle::Plain => match color {
                    Some(color) => queue!(out, SetForegroundColor(color), Print(&text))?,
                    None => queue!(out, Print(&text))?,
                },
                SpanStyle::Citation => queue!(
                    out,
                    SetForegroundColor(palette.citation),
                    SetAttribute(Attribute::Underlined),
                    Print(&text),
                    SetAttribute(Attribute::NoUnderline),
                )?,
            }
            queue!(out, ResetColor)?;
        }
        queue!(out, SetAttribute(Attribute::Reset), Print('\n'))?;
    }

    Ok(())
}

/// Writes one entry of the conversation with its index, used by `/rate`.
pub fn write_message<W: Write>(
    out: &mut W,
    index: usize,
    message: &Message,
    palette: Palette,
    dialect: Dialect,
    disable_color: bool,
) -> Fallible<()> {
    let (role, color) = match message.role {
        MessageRole::User => (UiText::UserRole, palette.user),
        MessageRole::Assistant => (UiText::AssistantRole, palette.assistant),
    };

    let mut header = format!(
        "#{index} {} {}",
        role.localize_with(message.language, dialect),
        message.timestamp.with_timezone(&chrono::Local).format("%H:%M"),
    );
    if let Some(name) = &message.document_name {
        header.push_str(&format!(" [{}]", escape_terminal(name)));
    }
    if message.rated {
        header.push_str(" ✓");
    }

    if disable_color {
        writeln!(out, "{header}")?;
    } else {
        queue!(
            out,
            SetForegroundColor(color),
            SetAttribute(Attribute::Bold),
            Print(header),
            SetAttribute(Attribute::Reset),
            ResetColor,
            Print('\n'),
        )?;
    }

    match message.role {
        MessageRole::User => writeln!(out, "{}", escape_terminal(&message.content))?,
        MessageRole::Assistant => write_formatted(
            out,
            &format_legal_text(&message.content, message.language),
            palette,
            disable_color,
        )?,
    }

    if message.is_rateable() {
        writeln!(out, "  /rate {index} <1-5> [comment]")?;
    }

    Ok(())
}
