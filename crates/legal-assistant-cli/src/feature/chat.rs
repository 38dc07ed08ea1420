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

use crate::feature::chat::command::{HELP, ReplCommand, parse_command};
use crate::feature::upload::{print_upload_result, upload_with_progress};
use crate::functions::{Palette, println_color, write_formatted, write_message};
use legal_assistant::data::repository::GetLegalAssistantRepository;
use legal_assistant::feature::controller::ChatController;
use legal_assistant::feature::export::write_transcript;
use legal_assistant::feature::formatter::format_legal_text;
use legal_assistant::feature::i18n::UiText;
use legal_assistant::feature::retry::RetryPolicy;
use legal_assistant::feature::session::ChatSession;
use legal_assistant::prelude::*;
use ratatui::crossterm::queue;
use ratatui::crossterm::style::{Print, ResetColor, SetForegroundColor};
use ratatui::crossterm::tty::IsTty;
use std::io::{Write, stdout};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

mod command;

/// Interactive conversation. Lines starting with `/` are commands, anything else is a question.
pub async fn chat<Ctx>(
    context: Ctx,
    session: ChatSession,
    retry: RetryPolicy,
    disable_color: bool,
) -> Fallible<()>
where
    Ctx: GetLegalAssistantRepository,
{
    let disable_color = disable_color || !stdout().is_tty();
    let mut controller = ChatController::new(context, session).with_retry(retry);
    info!(conversation_id = %controller.session().conversation_id(), "start chat");

    print_welcome(controller.session(), disable_color)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print_prompt(controller.session(), disable_color)?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(data) => data,
            Err(e) => {
                print_error(controller.session(), &e.to_string(), disable_color)?;
                continue;
            }
        };

        if command == ReplCommand::Quit {
            break;
        }

        handle_command(&mut controller, command, disable_color).await?;
    }

    println!();
    info!("end chat");
    Ok(())
}

/// One-shot question.
pub async fn ask<Ctx>(
    context: Ctx,
    session: ChatSession,
    question: String,
    html: bool,
    disable_color: bool,
) -> Fallible<()>
where
    Ctx: GetLegalAssistantRepository,
{
    let disable_color = disable_color || !stdout().is_tty();
    ensure!(!question.trim().is_empty(), "empty question");

    let mut controller = ChatController::new(context, session);
    let Some(index) = controller.submit(&question).await? else {
        bail!("{}", controller.session().error().unwrap_or_default());
    };

    let session = controller.session();
    let message = &session.messages()[index];
    let formatted = format_legal_text(&message.content, message.language);
    if html {
        println!("{}", formatted.to_html());
    } else {
        let mut out = stdout().lock();
        write_formatted(&mut out, &formatted, Palette::new(session.theme()), disable_color)?;
        out.flush()?;
    }

    Ok(())
}

async fn handle_command<Ctx>(
    controller: &mut ChatController<Ctx>,
    command: ReplCommand,
    disable_color: bool,
) -> Fallible<()>
where
    Ctx: GetLegalAssistantRepository,
{
    match command {
        ReplCommand::Ask(question) => submit(controller, &question, disable_color).await?,
        ReplCommand::Help => println!("{HELP}"),
        ReplCommand::Rate {
            index,
            rating,
            comment,
        } => match controller.rate(index, rating, &comment).await {
            Ok(true) => print_notice(controller.session_mut(), disable_color)?,
            Ok(false) => print_session_error(controller.session(), disable_color)?,
            Err(e) => print_error(controller.session(), &e.to_string(), disable_color)?,
        },
        ReplCommand::Upload(path) => match upload_with_progress(controller, path).await {
            Ok(index) => print_upload_result(controller, index, disable_color)?,
            Err(e) => print_error(controller.session(), &e.to_string(), disable_color)?,
        },
        ReplCommand::Export(dir) => {
            let ret = match dir {
                Some(data) => Ok(data),
                None => std::env::current_dir().context("no current directory"),
            }
            .and_then(|dir| export(controller.session(), dir, disable_color));
            if let Err(e) = ret {
                warn!(?e, "export");
                print_error(controller.session(), &format!("{e:#}"), disable_color)?;
            }
        }
        ReplCommand::Search(query) => {
            controller.session_mut().set_search_query(&query);
            print_history(controller.session(), disable_color)?;
        }
        ReplCommand::Lang => {
            let session = controller.session_mut();
            let language = session.toggle_language();
            println_color(
                &format!("{} ({language})", session.text(UiText::Title)),
                Palette::new(session.theme()).notice,
                disable_color,
            )?;
        }
        ReplCommand::Theme => {
            let theme = controller.session_mut().toggle_theme();
            println_color(
                &format!("theme: {theme}"),
                Palette::new(theme).notice,
                disable_color,
            )?;
        }
        ReplCommand::Suggest(None) => print_suggestions(controller.session()),
        ReplCommand::Suggest(Some(number)) => {
            let suggestion = controller.session().suggestions().get(number - 1).copied();
            match suggestion {
                Some(question) => {
                    println!("{question}");
                    submit(controller, question, disable_color).await?;
                }
                None => print_error(
                    controller.session(),
                    &format!("no suggestion #{number}"),
                    disable_color,
                )?,
            }
        }
        ReplCommand::History => print_history(controller.session(), disable_color)?,
        ReplCommand::Quit => {}
    }

    Ok(())
}

async fn submit<Ctx>(
    controller: &mut ChatController<Ctx>,
    question: &str,
    disable_color: bool,
) -> Fallible<()>
where
    Ctx: GetLegalAssistantRepository,
{
    controller.session_mut().input_changed(question);
    if question.trim().is_empty() {
        return Ok(());
    }

    let session = controller.session();
    println_color(
        session.text(UiText::Sending),
        Palette::new(session.theme()).notice,
        disable_color,
    )?;

    match controller.submit(question).await {
        Ok(Some(index)) => {
            let session = controller.session();
            write_message(
                &mut stdout().lock(),
                index,
                &session.messages()[index],
                Palette::new(session.theme()),
                session.dialect(),
                disable_color,
            )?;
        }
        Ok(None) => print_session_error(controller.session(), disable_color)?,
        Err(e) => print_error(controller.session(), &e.to_string(), disable_color)?,
    }

    Ok(())
}

fn export(session: &ChatSession, dir: PathBuf, disable_color: bool) -> Fallible<()> {
    let path = write_transcript(&dir, session.current_language(), session.messages())?;
    println_color(
        &format!("{} {}", session.text(UiText::Export), path.display()),
        Palette::new(session.theme()).notice,
        disable_color,
    )
}

fn print_welcome(session: &ChatSession, disable_color: bool) -> Fallible<()> {
    let palette = Palette::new(session.theme());
    println_color(session.text(UiText::Title), palette.assistant, disable_color)?;
    println!("{}", session.text(UiText::Subtitle));
    println!();
    println!("{}", session.text(UiText::Welcome));
    println!("{}", session.text(UiText::WelcomeHint));
    println!();
    print_suggestions(session);
    println!();
    println!("/help");
    Ok(())
}

fn print_suggestions(session: &ChatSession) {
    println!("{}", session.text(UiText::SuggestionsTitle));
    for (index, suggestion) in session.suggestions().iter().enumerate() {
        println!("  /suggest {}: {suggestion}", index + 1);
    }
}

fn print_history(session: &ChatSession, disable_color: bool) -> Fallible<()> {
    let palette = Palette::new(session.theme());
    let mut out = stdout().lock();
    if !session.search_query().is_empty() {
        writeln!(
            out,
            "{} {}",
            session.text(UiText::SearchPlaceholder),
            session.search_query(),
        )?;
    }

    for (index, message) in session.visible_messages() {
        write_message(
            &mut out,
            index,
            message,
            palette,
            session.dialect(),
            disable_color,
        )?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

fn print_prompt(session: &ChatSession, disable_color: bool) -> Fallible<()> {
    let mut out = stdout().lock();
    if disable_color {
        write!(out, "> ")?;
    } else {
        queue!(
            out,
            SetForegroundColor(Palette::new(session.theme()).user),
            Print("> "),
            ResetColor,
        )?;
    }
    out.flush()?;
    Ok(())
}

fn print_notice(session: &mut ChatSession, disable_color: bool) -> Fallible<()> {
    if let Some(notice) = session.take_notice() {
        println_color(&notice, Palette::new(session.theme()).notice, disable_color)?;
    }
    Ok(())
}

fn print_session_error(session: &ChatSession, disable_color: bool) -> Fallible<()> {
    match session.error() {
        Some(error) => print_error(session, error, disable_color),
        None => Ok(()),
    }
}

fn print_error(session: &ChatSession, message: &str, disable_color: bool) -> Fallible<()> {
    println_color(message, Palette::new(session.theme()).error, disable_color)
}
