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

use crate::functions::{Palette, println_color, write_message};
use indicatif::{ProgressBar, ProgressStyle};
use legal_assistant::data::repository::GetLegalAssistantRepository;
use legal_assistant::feature::controller::ChatController;
use legal_assistant::feature::i18n::UiText;
use legal_assistant::feature::retry::RetryPolicy;
use legal_assistant::feature::session::ChatSession;
use legal_assistant::model::ProgressCallback;
use legal_assistant::prelude::*;
use ratatui::crossterm::tty::IsTty;
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub async fn upload<Ctx>(
    context: Ctx,
    session: ChatSession,
    retry: RetryPolicy,
    path: PathBuf,
    disable_color: bool,
) -> Fallible<()>
where
    Ctx: GetLegalAssistantRepository,
{
    let disable_color = disable_color || !stdout().is_tty();
    let mut controller = ChatController::new(context, session).with_retry(retry);

    let index = upload_with_progress(&mut controller, path).await?;
    print_upload_result(&mut controller, index, disable_color)
}

/// Runs the upload behind a progress bar. Returns the index of the document summary.
pub async fn upload_with_progress<Ctx>(
    controller: &mut ChatController<Ctx>,
    path: PathBuf,
) -> Fallible<usize>
where
    Ctx: GetLegalAssistantRepository,
{
    let bar = create_progress_bar(progress_message(controller.session(), &path))?;

    match controller.upload(path, Some(progress_callback(&bar))).await {
        Ok(Some(index)) => {
            bar.finish_and_clear();
            Ok(index)
        }
        Ok(None) => {
            bar.abandon();
            let status = controller
                .session()
                .upload_state()
                .and_then(|data| data.status_text.clone())
                .unwrap_or_default();
            bail!("{status}")
        }
        Err(e) => {
            bar.abandon();
            Err(e.into())
        }
    }
}

pub fn print_upload_result<Ctx>(
    controller: &mut ChatController<Ctx>,
    index: usize,
    disable_color: bool,
) -> Fallible<()>
where
    Ctx: GetLegalAssistantRepository,
{
    let session = controller.session_mut();
    let palette = Palette::new(session.theme());
    if let Some(notice) = session.take_notice() {
        println_color(&notice, palette.notice, disable_color)?;
    }

    write_message(
        &mut stdout().lock(),
        index,
        &session.messages()[index],
        palette,
        session.dialect(),
        disable_color,
    )
}

/// File name and size, shown next to the bar.
fn progress_message(session: &ChatSession, path: &Path) -> String {
    let mut message = path
        .file_name()
        .map(|data| data.to_string_lossy().into_owned())
        .unwrap_or_default();
    if let Ok(metadata) = std::fs::metadata(path) {
        message.push_str(&format!(
            " ({} {})",
            session.text(UiText::FileSize),
            SizeFormat(metadata.len()),
        ));
    }
    message
}

fn create_progress_bar(file_name: String) -> Fallible<ProgressBar> {
    let style = ProgressStyle::with_template("{msg} [{bar:40}] {pos:>3}%")?.progress_chars("=> ");
    Ok(ProgressBar::new(100)
        .with_style(style)
        .with_message(file_name))
}

fn progress_callback(bar: &ProgressBar) -> ProgressCallback {
    let bar = bar.clone();
    Arc::new(move |percent| bar.set_position(percent as u64))
}
