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

//! Annotates assistant answers with legal citations and clause structure.
//!
//! The answer is never turned into markup directly. [format_legal_text] produces a list of
//! annotated blocks and the renderers escape every fragment coming from the backend.

use crate::model::{Language, TextDirection};
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BlockKind {
    Paragraph,
    /// `1. ...`
    Heading,
    /// `* ...`
    Bullet,
    /// `Je vous recommande...`, `أوصي...`
    Recommendation,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SpanStyle {
    Plain,
    Citation,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Span {
    pub text: String,
    pub style: SpanStyle,
}

/// One line of the answer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Block {
    pub kind: BlockKind,
    pub spans: Vec<Span>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FormattedText {
    pub language: Language,
    pub blocks: Vec<Block>,
}

struct Rules {
    citation: Regex,
    recommendation: Regex,
}

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s+.+$").expect("heading pattern"));

static BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\s+.+$").expect("bullet pattern"));

static FRENCH: LazyLock<Rules> = LazyLock::new(|| Rules {
    citation: Regex::new(r"(?:article|Article|loi|Loi|décret|Décret|code|Code)\s+\d+[-\d]*")
        .expect("french citation pattern"),
    recommendation: Regex::new(r"^Je vous recommande.+$").expect("french recommendation pattern"),
});

static ARABIC: LazyLock<Rules> = LazyLock::new(|| Rules {
    citation: Regex::new(r"(?:مادة|المادة|قانون|القانون|مرسوم|المرسوم|فصل|الفصل)\s+\d+[-\d]*")
        .expect("arabic citation pattern"),
    recommendation: Regex::new(r"^أوصي.+$").expect("arabic recommendation pattern"),
});

static HTML_SPECIAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[&<>"']"#).expect("html pattern"));

static TERMINAL_CONTROL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{Cc}&&[^\t]]").expect("terminal control pattern"));

pub fn format_legal_text(text: &str, language: Language) -> FormattedText {
    let rules: &Rules = match language {
        Language::French => &FRENCH,
        Language::Arabic => &ARABIC,
    };

    let blocks = text
        .split('\n')
        .map(|line| Block {
            kind: classify_line(rules, line),
            spans: split_citations(rules, line),
        })
        .collect();

    FormattedText { language, blocks }
}

// first match wins.
fn classify_line(rules: &Rules, line: &str) -> BlockKind {
    if HEADING.is_match(line) {
        BlockKind::Heading
    } else if BULLET.is_match(line) {
        BlockKind::Bullet
    } else if rules.recommendation.is_match(line) {
        BlockKind::Recommendation
    } else {
        BlockKind::Paragraph
    }
}

fn split_citations(rules: &Rules, line: &str) -> Vec<Span> {
    let mut spans = vec![];
    let mut last = 0;
    for found in rules.citation.find_iter(line) {
        if last < found.start() {
            spans.push(Span {
                text: line[last..found.start()].to_owned(),
                style: SpanStyle::Plain,
            });
        }
        spans.push(Span {
            text: found.as_str().to_owned(),
            style: SpanStyle::Citation,
        });
        last = found.end();
    }

    if last < line.len() {
        spans.push(Span {
            text: line[last..].to_owned(),
            style: SpanStyle::Plain,
        });
    }

    spans
}

/// Escapes `&`, `<`, `>`, `"` and `'`.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    HTML_SPECIAL.replace_all(text, |caps: &Captures| match &caps[0] {
        "&" => "&amp;",
        "<" => "&lt;",
        ">" => "&gt;",
        "\"" => "&quot;",
        _ => "&#x27;",
    })
}

/// Drops control characters except tab so that escape sequences in the text never reach
/// the terminal.
pub fn escape_terminal(text: &str) -> Cow<'_, str> {
    TERMINAL_CONTROL.replace_all(text, "")
}

impl FormattedText {
    /// The text this was built from.
    pub fn to_plain(&self) -> String {
        self.blocks
            .iter()
            .map(|block| {
                block
                    .spans
                    .iter()
                    .map(|span| span.text.as_str())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Renders through fixed templates. Every fragment of the answer is escaped.
    pub fn to_html(&self) -> String {
        let mut ret = String::new();
        match self.language.direction() {
            TextDirection::Ltr => ret.push_str(r#"<div dir="ltr">"#),
            TextDirection::Rtl => ret.push_str(r#"<div class="arabic-text" dir="rtl">"#),
        }

        for (index, block) in self.blocks.iter().enumerate() {
            if index != 0 {
                ret.push('\n');
            }

            let (open, close) = match block.kind {
                BlockKind::Paragraph => ("", ""),
                BlockKind::Heading => ("<h3>", "</h3>"),
                BlockKind::Bullet => (r#"<div class="bullet-point">"#, "</div>"),
                BlockKind::Recommendation => (r#"<div class="recommendation">"#, "</div>"),
            };

            ret.push_str(open);
            for span in &block.spans {
                match span.style {
                    SpanStyle::Plain => ret.push_str(&escape_html(&span.text)),
                    SpanStyle::Citation => {
                        ret.push_str(r#"<span class="legal-reference">"#);
                        ret.push_str(&escape_html(&span.text));
                        ret.push_str("</span>");
                    }
                }
            }
            ret.push_str(close);
        }

        ret.push_str("</div>");
        ret
    }

    pub fn citations(&self) -> impl Iterator<Item = &str> {
        self.blocks
            .iter()
            .flat_map(|block| block.spans.iter())
            .filter(|span| span.style == SpanStyle::Citation)
            .map(|span| span.text.as_str())
    }
}
