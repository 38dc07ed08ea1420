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

use legal_assistant::prelude::*;
use std::path::PathBuf;

pub const HELP: &str = "\
/help                          show this help
/rate <#> <1-5> [comment]      rate an answer
/upload <file>                 analyze a document (pdf, doc, docx, txt)
/export [dir]                  save the conversation as text
/search [query]                filter the history, empty query clears
/lang                          switch between French and Arabic
/theme                         switch between light and dark colors
/suggest [n]                   list suggested questions or ask the n-th
/history                       print the conversation
/quit                          exit";

/// One line typed into the chat loop.
#[derive(Debug, Eq, PartialEq)]
pub enum ReplCommand {
    Ask(String),
    Help,
    Rate {
        index: usize,
        rating: u8,
        comment: String,
    },
    Upload(PathBuf),
    Export(Option<PathBuf>),
    Search(String),
    Lang,
    Theme,
    Suggest(Option<usize>),
    History,
    Quit,
}

pub fn parse_command(line: &str) -> Fallible<ReplCommand> {
    let Some(command_line) = line.trim_start().strip_prefix('/') else {
        return Ok(ReplCommand::Ask(line.to_owned()));
    };

    let (name, args) = next_arg(command_line);
    let command = match name {
        "help" | "h" | "?" => ReplCommand::Help,
        "rate" => {
            let (index, rest) = next_arg(args);
            let (rating, comment) = next_arg(rest);
            ensure!(
                !index.is_empty() && !rating.is_empty(),
                "usage: /rate <#> <1-5> [comment]"
            );
            ReplCommand::Rate {
                index: index
                    .trim_start_matches('#')
                    .parse()
                    .with_context(|| format!("invalid message number: {index}"))?,
                rating: rating
                    .parse()
                    .with_context(|| format!("invalid rating: {rating}"))?,
                comment: comment.trim().to_owned(),
            }
        }
        "upload" => {
            let path = args.trim();
            ensure!(!path.is_empty(), "usage: /upload <file>");
            ReplCommand::Upload(path.into())
        }
        "export" => {
            let dir = args.trim();
            ReplCommand::Export((!dir.is_empty()).then(|| dir.into()))
        }
        "search" => ReplCommand::Search(args.trim().to_owned()),
        "lang" => ReplCommand::Lang,
        "theme" => ReplCommand::Theme,
        "suggest" => {
            let (number, _) = next_arg(args);
            if number.is_empty() {
                ReplCommand::Suggest(None)
            } else {
                let number = number
                    .parse::<usize>()
                    .with_context(|| format!("invalid suggestion number: {number}"))?;
                ensure!(0 < number, "suggestions start at 1");
                ReplCommand::Suggest(Some(number))
            }
        }
        "history" => ReplCommand::History,
        "quit" | "exit" | "q" => ReplCommand::Quit,
        _ => bail!("unknown command: /{name} (/help for the list)"),
    };

    Ok(command)
}

fn next_arg(line: &str) -> (&str, &str) {
    let line = line.trim_start();
    line.split_once(char::is_whitespace).unwrap_or((line, ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question() {
        assert_eq!(
            ReplCommand::Ask("Quels sont mes droits ?".into()),
            parse_command("Quels sont mes droits ?").unwrap(),
        );
        assert_eq!(ReplCommand::Ask("".into()), parse_command("").unwrap());
        assert_eq!(
            ReplCommand::Ask("ما هي حقوقي؟".into()),
            parse_command("ما هي حقوقي؟").unwrap(),
        );
    }

    #[test]
    fn rate() {
        assert_eq!(
            ReplCommand::Rate {
                index: 3,
                rating: 5,
                comment: "très clair, merci".into(),
            },
            parse_command("/rate #3 5   très clair, merci ").unwrap(),
        );
        assert_eq!(
            ReplCommand::Rate {
                index: 1,
                rating: 2,
                comment: "".into(),
            },
            parse_command("/rate 1 2").unwrap(),
        );
        assert!(parse_command("/rate 1").is_err());
        assert!(parse_command("/rate x 2").is_err());
    }

    #[test]
    fn arguments() {
        assert_eq!(
            ReplCommand::Upload("/tmp/mon contrat.pdf".into()),
            parse_command("/upload /tmp/mon contrat.pdf").unwrap(),
        );
        assert!(parse_command("/upload").is_err());
        assert_eq!(ReplCommand::Export(None), parse_command("/export").unwrap());
        assert_eq!(
            ReplCommand::Export(Some("out".into())),
            parse_command("/export out").unwrap(),
        );
        assert_eq!(
            ReplCommand::Search("code du travail".into()),
            parse_command("/search code du travail").unwrap(),
        );
        assert_eq!(ReplCommand::Search("".into()), parse_command("/search").unwrap());
        assert_eq!(ReplCommand::Suggest(None), parse_command("/suggest").unwrap());
        assert_eq!(ReplCommand::Suggest(Some(2)), parse_command("/suggest 2").unwrap());
        assert!(parse_command("/suggest 0").is_err());
    }

    #[test]
    fn simple_commands() {
        assert_eq!(ReplCommand::Help, parse_command("/help").unwrap());
        assert_eq!(ReplCommand::Lang, parse_command(" /lang").unwrap());
        assert_eq!(ReplCommand::Theme, parse_command("/theme").unwrap());
        assert_eq!(ReplCommand::History, parse_command("/history").unwrap());
        assert_eq!(ReplCommand::Quit, parse_command("/quit").unwrap());
        assert!(parse_command("/unknown").is_err());
    }
}
