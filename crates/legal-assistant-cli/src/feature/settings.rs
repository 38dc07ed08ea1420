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

use crate::SettingsKey;
use crate::data::repository::{GetPreferencesRepository, PreferencesRepository};
use crate::model::Settings;
use clap::ValueEnum;
use legal_assistant::prelude::*;

pub fn list_settings<Ctx>(context: Ctx) -> Fallible<()>
where
    Ctx: GetPreferencesRepository,
{
    let settings = context.get_prefs_repo().load_settings()?;

    for key in SettingsKey::value_variants() {
        print_setting(key, setting_value(&settings, key));
    }

    Ok(())
}

pub fn get_setting<Ctx>(context: Ctx, key: &SettingsKey) -> Fallible<()>
where
    Ctx: GetPreferencesRepository,
{
    let settings = context.get_prefs_repo().load_settings()?;

    print_setting(key, setting_value(&settings, key));

    Ok(())
}

pub fn set_setting<Ctx>(context: Ctx, key: &SettingsKey, value: String) -> Fallible<()>
where
    Ctx: GetPreferencesRepository,
{
    let repo = context.get_prefs_repo();
    let mut settings = repo.load_settings()?;

    apply_setting(&mut settings, key, value)?;

    repo.save_settings(&settings)?;

    Ok(())
}

fn setting_value(settings: &Settings, key: &SettingsKey) -> Option<String> {
    match *key {
        SettingsKey::BaseUrl => settings.base_url.as_ref().map(ToString::to_string),
        SettingsKey::ConversationId => settings.conversation_id.clone(),
        SettingsKey::ChatTimeoutSecs => settings.chat_timeout_secs.map(|data| data.to_string()),
        SettingsKey::RequestTimeoutSecs => {
            settings.request_timeout_secs.map(|data| data.to_string())
        }
        SettingsKey::RetryMaxAttempts => settings.retry_max_attempts.map(|data| data.to_string()),
        SettingsKey::Theme => settings.theme.map(|data| data.to_string()),
        SettingsKey::Dialect => settings.dialect.map(|data| data.to_string()),
    }
}

/// An empty value removes the key.
fn apply_setting(settings: &mut Settings, key: &SettingsKey, value: String) -> Fallible<()> {
    let value = Some(value.trim().to_owned()).filter(|data| !data.is_empty());

    match *key {
        SettingsKey::BaseUrl => {
            settings.base_url = value
                .map(|data| data.parse())
                .transpose()
                .context("invalid url")?;
        }
        SettingsKey::ConversationId => settings.conversation_id = value,
        SettingsKey::ChatTimeoutSecs => {
            settings.chat_timeout_secs = value
                .map(|data| data.parse())
                .transpose()
                .context("invalid timeout")?;
        }
        SettingsKey::RequestTimeoutSecs => {
            settings.request_timeout_secs = value
                .map(|data| data.parse())
                .transpose()
                .context("invalid timeout")?;
        }
        SettingsKey::RetryMaxAttempts => {
            let attempts = value
                .map(|data| data.parse::<u32>())
                .transpose()
                .context("invalid number of attempts")?;
            ensure!(attempts != Some(0), "at least one attempt is required");
            settings.retry_max_attempts = attempts;
        }
        SettingsKey::Theme => {
            settings.theme = value
                .map(|data| data.parse())
                .transpose()
                .context("theme is light or dark")?;
        }
        SettingsKey::Dialect => {
            settings.dialect = value
                .map(|data| data.parse())
                .transpose()
                .context("dialect is standard or tunisian")?;
        }
    }

    Ok(())
}

fn print_setting(key: &SettingsKey, value: Option<String>) {
    println!("{key}: {}", value.as_deref().unwrap_or("(none)"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::repository::MockPreferencesRepository;
    use legal_assistant::feature::i18n::Dialect;
    use legal_assistant::model::Theme;

    struct MockContext {
        prefs_repo: MockPreferencesRepository,
    }

    impl GetPreferencesRepository for MockContext {
        type Repo = MockPreferencesRepository;

        fn get_prefs_repo(&self) -> &Self::Repo {
            &self.prefs_repo
        }
    }

    #[test]
    fn set_setting_saves() {
        let mut prefs_repo = MockPreferencesRepository::default();
        prefs_repo.expect_load_settings().returning(|| {
            Ok(Settings {
                theme: Some(Theme::Light),
                ..Default::default()
            })
        });
        prefs_repo
            .expect_save_settings()
            .withf(|settings| {
                *settings
                    == Settings {
                        theme: Some(Theme::Light),
                        dialect: Some(Dialect::Tunisian),
                        ..Default::default()
                    }
            })
            .times(1)
            .returning(|_| Ok(()));

        set_setting(
            MockContext { prefs_repo },
            &SettingsKey::Dialect,
            "tunisian".into(),
        )
        .unwrap();
    }

    #[test]
    fn set_setting_rejects_invalid_value() {
        let mut prefs_repo = MockPreferencesRepository::default();
        prefs_repo
            .expect_load_settings()
            .returning(|| Ok(Default::default()));
        prefs_repo.expect_save_settings().never();

        let ret = set_setting(MockContext { prefs_repo }, &SettingsKey::Theme, "blue".into());
        assert!(ret.is_err());
    }

    #[test]
    fn apply_and_read() {
        let mut settings = Settings::default();

        apply_setting(
            &mut settings,
            &SettingsKey::BaseUrl,
            "http://10.0.0.2:8000/".into(),
        )
        .unwrap();
        apply_setting(&mut settings, &SettingsKey::ChatTimeoutSecs, "45".into()).unwrap();
        apply_setting(&mut settings, &SettingsKey::RetryMaxAttempts, "3".into()).unwrap();

        assert_eq!(
            Some("http://10.0.0.2:8000/".to_owned()),
            setting_value(&settings, &SettingsKey::BaseUrl),
        );
        assert_eq!(
            Some("45".to_owned()),
            setting_value(&settings, &SettingsKey::ChatTimeoutSecs),
        );
        assert_eq!(None, setting_value(&settings, &SettingsKey::Theme));

        apply_setting(&mut settings, &SettingsKey::ChatTimeoutSecs, " ".into()).unwrap();
        assert_eq!(None, settings.chat_timeout_secs);

        assert!(apply_setting(&mut settings, &SettingsKey::RetryMaxAttempts, "0".into()).is_err());
        assert!(apply_setting(&mut settings, &SettingsKey::BaseUrl, "not a url".into()).is_err());
    }
}
