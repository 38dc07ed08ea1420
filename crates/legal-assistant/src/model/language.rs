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

use serde::{Deserialize, Serialize};

/// Languages the assistant answers in.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    Deserialize,
    Serialize,
    strum::Display,
    strum::EnumString,
)]
pub enum Language {
    #[default]
    #[serde(rename = "fr")]
    #[strum(serialize = "fr")]
    French,

    #[serde(rename = "ar")]
    #[strum(serialize = "ar")]
    Arabic,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl Language {
    /// ISO 639-1 code, also used for `Accept-Language`.
    pub fn code(self) -> &'static str {
        match self {
            Language::French => "fr",
            Language::Arabic => "ar",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Language::French => Language::Arabic,
            Language::Arabic => Language::French,
        }
    }

    pub fn direction(self) -> TextDirection {
        match self {
            Language::French => TextDirection::Ltr,
            Language::Arabic => TextDirection::Rtl,
        }
    }

    /// Maps the `language` field of a chat answer. The backend reports `"arabic"` or
    /// `"french"`; anything but `"arabic"` is French.
    pub fn from_backend_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("arabic") => Language::Arabic,
            _ => Language::French,
        }
    }
}

/// Arabic if `text` contains any code point of the Arabic, Arabic Supplement or Arabic
/// Extended-A blocks, French otherwise.
pub fn detect_language(text: &str) -> Language {
    if text.chars().any(is_arabic) {
        Language::Arabic
    } else {
        Language::French
    }
}

fn is_arabic(c: char) -> bool {
    matches!(
        c,
        '\u{0600}'..='\u{06FF}' | '\u{0750}'..='\u{077F}' | '\u{08A0}'..='\u{08FF}'
    )
}
