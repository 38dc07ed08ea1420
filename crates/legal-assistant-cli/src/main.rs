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

use crate::data::repository::{
    GetPreferencesRepository, PreferencesRepository, PreferencesRepositoryImpl,
};
use crate::feature::{ask, chat, get_setting, list_settings, set_setting, upload};
use crate::functions::{create_repository_config, resolve_conversation_id};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use directories::ProjectDirs;
use legal_assistant::data::repository::{
    GetLegalAssistantRepository, LegalAssistantRepositoryImpl,
};
use legal_assistant::feature::retry::RetryPolicy;
use legal_assistant::feature::session::ChatSession;
use legal_assistant::prelude::*;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use url::Url;

mod data;
mod feature;
mod functions;
mod model;

/// Tunisian legal assistant client
#[derive(Parser)]
struct Opt {
    /// Base URL of the assistant backend.
    #[arg(long, env = "LEGAL_ASSISTANT_BASE_URL")]
    base_url: Option<Url>,

    /// Conversation ID sent with every request. A new one is generated when omitted.
    #[arg(long, env = "LEGAL_ASSISTANT_CONVERSATION_ID")]
    conversation_id: Option<String>,

    /// Increase log verbosity. `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start an interactive conversation.
    #[command()]
    Chat {
        /// Disable colored escape sequence.
        #[arg(long)]
        disable_color: bool,
    },

    /// Ask a single question and print the answer.
    #[command()]
    Ask {
        /// Question in French or Arabic.
        question: String,

        /// Print the answer as HTML.
        #[arg(long)]
        html: bool,

        /// Disable colored escape sequence.
        #[arg(long)]
        disable_color: bool,
    },

    /// Upload a document (pdf, doc, docx, txt) for analysis.
    #[command()]
    Upload {
        /// Document to analyze.
        file: PathBuf,

        /// Disable colored escape sequence.
        #[arg(long)]
        disable_color: bool,
    },

    /// Manage settings.
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// List current settings.
    #[command()]
    List,

    /// Get current setting.
    #[command()]
    Get {
        /// Key to get the setting.
        key: SettingsKey,
    },

    /// Set setting. An empty value removes it.
    #[command()]
    Set {
        /// Key to set the setting.
        key: SettingsKey,

        /// Value to set the setting.
        value: String,
    },
}

#[derive(Clone, ValueEnum)]
pub enum SettingsKey {
    #[value(name = "base_url")]
    BaseUrl,
    #[value(name = "conversation_id")]
    ConversationId,
    #[value(name = "chat_timeout_secs")]
    ChatTimeoutSecs,
    #[value(name = "request_timeout_secs")]
    RequestTimeoutSecs,
    #[value(name = "retry_max_attempts")]
    RetryMaxAttempts,
    #[value(name = "theme")]
    Theme,
    #[value(name = "dialect")]
    Dialect,
}

impl Display for SettingsKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsKey::BaseUrl => f.write_str("base_url"),
            SettingsKey::ConversationId => f.write_str("conversation_id"),
            SettingsKey::ChatTimeoutSecs => f.write_str("chat_timeout_secs"),
            SettingsKey::RequestTimeoutSecs => f.write_str("request_timeout_secs"),
            SettingsKey::RetryMaxAttempts => f.write_str("retry_max_attempts"),
            SettingsKey::Theme => f.write_str("theme"),
            SettingsKey::Dialect => f.write_str("dialect"),
        }
    }
}

struct Context {
    legal_assistant_repo: LegalAssistantRepositoryImpl,
    prefs_repo: PreferencesRepositoryImpl,
}

impl GetLegalAssistantRepository for Context {
    type Repo = LegalAssistantRepositoryImpl;

    fn get_legal_assistant_repo(&self) -> &Self::Repo {
        &self.legal_assistant_repo
    }
}

impl GetPreferencesRepository for Context {
    type Repo = PreferencesRepositoryImpl;

    fn get_prefs_repo(&self) -> &Self::Repo {
        &self.prefs_repo
    }
}

#[tokio::main]
async fn main() -> Fallible<()> {
    dotenv::dotenv().ok();

    let opt = Opt::parse();

    let project_dir = ProjectDirs::from("com", "sukawasatoru", "Legal Assistant")
        .context("no valid home directory")?;

    let _guard = init_tracing(&opt, &project_dir.data_dir().join("logs"));

    info!("hello");

    let prefs_repo = PreferencesRepositoryImpl::create_with_path(project_dir.config_dir().to_owned());
    let settings = prefs_repo.load_settings()?;

    let context = Context {
        legal_assistant_repo: LegalAssistantRepositoryImpl::create(create_repository_config(
            &settings,
            opt.base_url,
        ))?,
        prefs_repo,
    };

    let session = ChatSession::new(resolve_conversation_id(opt.conversation_id, &settings))
        .with_preferences(
            settings.theme.unwrap_or_default(),
            settings.dialect.unwrap_or_default(),
        );
    let retry = RetryPolicy::with_attempts(settings.retry_max_attempts.unwrap_or(1));

    match opt.cmd {
        Command::Chat { disable_color } => chat(context, session, retry, disable_color).await?,
        Command::Ask {
            question,
            html,
            disable_color,
        } => ask(context, session, question, html, disable_color).await?,
        Command::Upload {
            file,
            disable_color,
        } => upload(context, session, retry, file, disable_color).await?,
        Command::Settings(cmd) => match cmd {
            SettingsCommand::List => list_settings(context)?,
            SettingsCommand::Get { key } => get_setting(context, &key)?,
            SettingsCommand::Set { key, value } => set_setting(context, &key, value)?,
        },
    }

    info!("bye");

    Ok(())
}

/// The chat loop owns the terminal, so its logs go to an hourly rolling file.
fn init_tracing(opt: &Opt, log_dir: &Path) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match opt.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });

    if matches!(opt.cmd, Command::Chat { .. }) {
        let (non_blocking, guard) = tracing_appender::non_blocking(
            tracing_appender::rolling::hourly(log_dir, "chat"),
        );
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(non_blocking)
            .with_ansi(false)
            .init();

        Some(guard)
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();

        None
    }
}
