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

use legal_assistant::feature::i18n::Dialect;
use legal_assistant::model::Theme;
use serde::{Deserialize, Serialize};
use url::Url;

/// Contents of `settings.toml`. Unset keys fall back to the built-in defaults.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub base_url: Option<Url>,
    pub conversation_id: Option<String>,
    pub chat_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub retry_max_attempts: Option<u32>,
    pub theme: Option<Theme>,
    pub dialect: Option<Dialect>,
}
