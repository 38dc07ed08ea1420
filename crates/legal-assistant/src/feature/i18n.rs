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

//! User facing strings.
//!
//! Every string has a French and a Modern Standard Arabic wording. On top of that,
//! [TUNISIAN_TRANSLATIONS] maps a subset of the French strings to the Tunisian dialect and is
//! used for display when the user prefers the dialect.

use crate::model::Language;
use serde::{Deserialize, Serialize};

/// Arabic wording preference.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    PartialEq,
    Deserialize,
    Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Dialect {
    #[default]
    Standard,
    Tunisian,
}

/// French → Tunisian dialect.
pub const TUNISIAN_TRANSLATIONS: &[(&str, &str)] = &[
    // titles
    ("Assistant Juridique Tunisien", "المستشار القانوني التونسي"),
    ("Vous", "أنت"),
    ("Assistant", "المستشار"),
    // actions
    ("Envoyer", "أبعث"),
    ("Exporter", "أحفظ"),
    ("Rechercher...", "لوّج..."),
    // system messages
    ("Envoi en cours...", "جاري الإرسال..."),
    (
        "Une erreur s'est produite lors de la communication avec le serveur.",
        "فما غلطة في الاتصال بالسيرفر.",
    ),
    // suggestions
    ("Quels sont mes droits en tant que salarié ?", "شنية حقوقي كخدّام؟"),
    ("Comment créer une entreprise en Tunisie ?", "كيفاش نعمل شركة في تونس؟"),
    ("Procédure de divorce en Tunisie", "كيفاش نعمل طلاق في تونس؟"),
    ("Lois sur la propriété immobilière", "قوانين الملكية العقارية"),
    ("Droits des consommateurs en Tunisie", "حقوق المستهلك في تونس"),
    // placeholder
    ("Posez votre question...", "أكتب سؤالك هنا..."),
    // language selection
    ("Détection automatique", "كشف تلقائي للغة"),
    ("Dialecte tunisien", "اللهجة التونسية"),
    ("Français", "الفرنسية"),
];

/// Looks up the Tunisian wording of a French UI string.
pub fn translate_tunisian(french: &str) -> Option<&'static str> {
    TUNISIAN_TRANSLATIONS
        .iter()
        .find(|(key, _)| *key == french)
        .map(|(_, value)| *value)
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UiText {
    Title,
    Subtitle,
    Welcome,
    WelcomeHint,
    SuggestionsTitle,
    UserRole,
    AssistantRole,
    Placeholder,
    SearchPlaceholder,
    Send,
    Sending,
    Export,
    Rate,
    RateTitle,
    CommentPlaceholder,
    Cancel,
    FeedbackThanks,
    UploadDocument,
    UploadTitle,
    UploadInProgress,
    UploadSucceeded,
    UploadFailed,
    DocumentAnalyzed,
    FileSize,
    CommunicationError,
    TimeoutError,
    ServerError,
    SwitchLanguage,
}

impl UiText {
    fn pair(self) -> (&'static str, &'static str) {
        use UiText::*;

        match self {
            Title => ("Assistant Juridique Tunisien", "المساعد القانوني التونسي"),
            Subtitle => (
                "Répond à vos questions juridiques en français et en arabe",
                "يجيب على أسئلتك القانونية باللغتين العربية والفرنسية",
            ),
            Welcome => (
                "Bienvenue sur l'Assistant Juridique Tunisien",
                "مرحبًا بك في المساعد القانوني التونسي",
            ),
            WelcomeHint => (
                "Je peux vous aider à comprendre les lois et réglementations tunisiennes. Posez une question sur le droit tunisien.",
                "يمكنني مساعدتك في فهم القوانين واللوائح التونسية. اطرح سؤالًا حول القانون التونسي.",
            ),
            SuggestionsTitle => ("Suggestions de questions :", "اقتراحات الأسئلة:"),
            UserRole => ("Vous", "أنت"),
            AssistantRole => ("Assistant", "المساعد"),
            Placeholder => (
                "Posez votre question juridique ici...",
                "اطرح سؤالك القانوني هنا...",
            ),
            SearchPlaceholder => ("Rechercher...", "بحث..."),
            Send => ("Envoyer", "إرسال"),
            Sending => ("Envoi...", "جاري الإرسال..."),
            Export => ("Exporter", "تصدير"),
            Rate => ("Évaluer", "تقييم"),
            RateTitle => ("Évaluez cette réponse", "قيم هذه الإجابة"),
            CommentPlaceholder => (
                "Commentaires additionnels (optionnel)",
                "تعليقات إضافية (اختياري)",
            ),
            Cancel => ("Annuler", "إلغاء"),
            FeedbackThanks => ("Merci pour votre feedback !", "شكرا على ملاحظاتك!"),
            UploadDocument => ("Uploader un document", "رفع مستند"),
            UploadTitle => ("Uploader un document pour analyse", "رفع مستند للتحليل"),
            UploadInProgress => ("Upload en cours...", "جاري الرفع..."),
            UploadSucceeded => ("Document uploadé avec succès!", "تم رفع المستند بنجاح!"),
            UploadFailed => (
                "Erreur lors de l'upload du document",
                "حدث خطأ أثناء رفع المستند",
            ),
            DocumentAnalyzed => ("Document analysé avec succès:", "تم تحليل المستند بنجاح:"),
            FileSize => ("Taille du fichier:", "حجم الملف:"),
            CommunicationError => (
                "Une erreur s'est produite lors de la communication avec le serveur.",
                "حدث خطأ أثناء الاتصال بالخادم.",
            ),
            TimeoutError => (
                "La requête a expiré (timeout).",
                "تم إلغاء الطلب بسبب تجاوز المهلة.",
            ),
            ServerError => ("Erreur serveur", "خطأ في الخادم"),
            // labels the other language.
            SwitchLanguage => ("العربية", "Français"),
        }
    }

    pub fn localize(self, language: Language) -> &'static str {
        let (fr, ar) = self.pair();
        match language {
            Language::French => fr,
            Language::Arabic => ar,
        }
    }

    /// Like [UiText::localize] but prefers the Tunisian wording for Arabic when requested and
    /// available.
    pub fn localize_with(self, language: Language, dialect: Dialect) -> &'static str {
        match (language, dialect) {
            (Language::Arabic, Dialect::Tunisian) => {
                translate_tunisian(self.pair().0).unwrap_or_else(|| self.localize(language))
            }
            _ => self.localize(language),
        }
    }
}

const SUGGESTIONS_FR: [&str; 5] = [
    "Quels sont mes droits en tant que salarié ?",
    "Comment créer une entreprise en Tunisie ?",
    "Procédure de divorce en Tunisie",
    "Lois sur la propriété immobilière",
    "Droits des consommateurs en Tunisie",
];

const SUGGESTIONS_AR: [&str; 5] = [
    "ما هي حقوقي كموظف؟",
    "كيفية إنشاء شركة في تونس؟",
    "إجراءات الطلاق في تونس",
    "قوانين الملكية العقارية",
    "حقوق المستهلك في تونس",
];

/// Suggested first questions.
pub fn suggestions(language: Language, dialect: Dialect) -> Vec<&'static str> {
    match (language, dialect) {
        (Language::French, _) => SUGGESTIONS_FR.to_vec(),
        (Language::Arabic, Dialect::Standard) => SUGGESTIONS_AR.to_vec(),
        (Language::Arabic, Dialect::Tunisian) => SUGGESTIONS_FR
            .iter()
            .zip(SUGGESTIONS_AR)
            .map(|(fr, ar)| translate_tunisian(fr).unwrap_or(ar))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tunisian_table_lookup() {
        assert_eq!(Some("أنت"), translate_tunisian("Vous"));
        assert_eq!(Some("أبعث"), translate_tunisian("Envoyer"));
        assert_eq!(None, translate_tunisian("Annuler"));
    }

    #[test]
    fn tunisian_table_has_unique_keys() {
        let mut keys = TUNISIAN_TRANSLATIONS
            .iter()
            .map(|(key, _)| *key)
            .collect::<Vec<_>>();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(TUNISIAN_TRANSLATIONS.len(), keys.len());
    }

    #[test]
    fn localize() {
        assert_eq!("Vous", UiText::UserRole.localize(Language::French));
        assert_eq!("المساعد", UiText::AssistantRole.localize(Language::Arabic));
    }

    #[test]
    fn localize_with_dialect() {
        assert_eq!(
            "المستشار",
            UiText::AssistantRole.localize_with(Language::Arabic, Dialect::Tunisian),
        );
        assert_eq!(
            "المساعد",
            UiText::AssistantRole.localize_with(Language::Arabic, Dialect::Standard),
        );
        // French is never affected by the dialect.
        assert_eq!(
            "Assistant",
            UiText::AssistantRole.localize_with(Language::French, Dialect::Tunisian),
        );
        // falls back when the table has no entry.
        assert_eq!(
            "إلغاء",
            UiText::Cancel.localize_with(Language::Arabic, Dialect::Tunisian),
        );
    }

    #[test]
    fn suggestions_per_language() {
        assert_eq!(5, suggestions(Language::French, Dialect::Standard).len());
        assert_eq!(
            "ما هي حقوقي كموظف؟",
            suggestions(Language::Arabic, Dialect::Standard)[0],
        );
        assert_eq!(
            "شنية حقوقي كخدّام؟",
            suggestions(Language::Arabic, Dialect::Tunisian)[0],
        );
    }
}
