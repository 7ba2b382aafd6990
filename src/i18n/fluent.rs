// SPDX-License-Identifier: MPL-2.0
use crate::config::Config;
use crate::notifications::{ArgValue, Notification};
use fluent_bundle::{FluentArgs, FluentBundle, FluentResource, FluentValue};
use rust_embed::RustEmbed;
use std::collections::HashMap;
use unic_langid::LanguageIdentifier;

#[derive(RustEmbed)]
#[folder = "assets/i18n/"]
struct Asset;

/// Locale used when nothing else matches, and for keys a locale lacks.
pub const DEFAULT_LOCALE: &str = "en-US";

/// Notification argument whose value is itself a message key.
pub const REASON_ARG: &str = "reason";

pub struct I18n {
    bundles: HashMap<LanguageIdentifier, FluentBundle<FluentResource>>,
    pub available_locales: Vec<LanguageIdentifier>,
    current_locale: LanguageIdentifier,
    default_locale: LanguageIdentifier,
}

impl std::fmt::Debug for I18n {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("I18n")
            .field("available_locales", &self.available_locales)
            .field("current_locale", &self.current_locale)
            .finish_non_exhaustive()
    }
}

impl Default for I18n {
    fn default() -> Self {
        Self::new(None, &Config::default())
    }
}

impl I18n {
    pub fn new(cli_lang: Option<String>, config: &Config) -> Self {
        let mut bundles = HashMap::new();
        let mut available_locales = Vec::new();

        for file in Asset::iter() {
            let filename = file.as_ref();
            let Some(locale_str) = filename.strip_suffix(".ftl") else {
                continue;
            };
            let Ok(locale) = locale_str.parse::<LanguageIdentifier>() else {
                log::warn!("skipping translation file with bad locale: {filename}");
                continue;
            };
            let Some(content) = Asset::get(filename) else {
                continue;
            };

            let source = String::from_utf8_lossy(content.data.as_ref()).to_string();
            let resource = FluentResource::try_new(source).unwrap_or_else(|(partial, errors)| {
                log::warn!("{} syntax error(s) in {filename}", errors.len());
                partial
            });
            let mut bundle = FluentBundle::new(vec![locale.clone()]);
            bundle.set_use_isolating(false);
            if let Err(errors) = bundle.add_resource(resource) {
                log::warn!("{} duplicate message(s) in {filename}", errors.len());
            }
            bundles.insert(locale.clone(), bundle);
            available_locales.push(locale);
        }
        available_locales.sort_by_key(ToString::to_string);

        let default_locale: LanguageIdentifier = DEFAULT_LOCALE.parse().unwrap_or_default();
        let current_locale = resolve_locale(cli_lang, config, &available_locales)
            .unwrap_or_else(|| default_locale.clone());

        Self {
            bundles,
            available_locales,
            current_locale,
            default_locale,
        }
    }

    pub fn set_locale(&mut self, locale: LanguageIdentifier) {
        if self.bundles.contains_key(&locale) {
            self.current_locale = locale;
        }
    }

    #[must_use]
    pub fn current_locale(&self) -> &LanguageIdentifier {
        &self.current_locale
    }

    pub fn tr(&self, key: &str) -> String {
        self.format(key, None)
    }

    /// Translates `key`, interpolating `args`.
    ///
    /// Counts become Fluent numbers so plural selectors work; text is passed
    /// through untouched.
    pub fn tr_args(&self, key: &str, args: &[(String, ArgValue)]) -> String {
        let mut fluent_args = FluentArgs::new();
        for (name, value) in args {
            let value = match value {
                ArgValue::Count(count) => FluentValue::from(*count),
                ArgValue::Text(text) => FluentValue::from(text.as_str()),
            };
            fluent_args.set(name.as_str(), value);
        }
        self.format(key, Some(&fluent_args))
    }

    /// Renders a notification.
    ///
    /// The [`REASON_ARG`] argument holds a message key and is translated
    /// before interpolation.
    pub fn render(&self, notification: &Notification) -> String {
        let args: Vec<(String, ArgValue)> = notification
            .message_args()
            .iter()
            .map(|(name, value)| match value {
                ArgValue::Text(key) if name == REASON_ARG => {
                    (name.clone(), ArgValue::Text(self.tr(key)))
                }
                other => (name.clone(), other.clone()),
            })
            .collect();
        self.tr_args(notification.message_key(), &args)
    }

    fn format(&self, key: &str, args: Option<&FluentArgs<'_>>) -> String {
        for locale in [&self.current_locale, &self.default_locale] {
            let Some(bundle) = self.bundles.get(locale) else {
                continue;
            };
            let Some(pattern) = bundle.get_message(key).and_then(|msg| msg.value()) else {
                continue;
            };
            let mut errors = vec![];
            let value = bundle.format_pattern(pattern, args, &mut errors);
            if errors.is_empty() {
                return value.to_string();
            }
            log::debug!("formatting {key} in {locale}: {errors:?}");
        }
        format!("MISSING: {}", key)
    }
}

fn resolve_locale(
    cli_lang: Option<String>,
    config: &Config,
    available: &[LanguageIdentifier],
) -> Option<LanguageIdentifier> {
    let os_locale = sys_locale::get_locale();
    let resolved = [
        cli_lang.as_deref(),
        config.general.language.as_deref(),
        os_locale.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter_map(|lang| lang.parse::<LanguageIdentifier>().ok())
    .find_map(|lang| match_available(&lang, available));
    resolved
}

/// Exact match first, then a locale with the same language (`fr-CA` -> `fr`).
fn match_available(
    wanted: &LanguageIdentifier,
    available: &[LanguageIdentifier],
) -> Option<LanguageIdentifier> {
    available
        .iter()
        .find(|candidate| *candidate == wanted)
        .or_else(|| {
            available
                .iter()
                .find(|candidate| candidate.language == wanted.language)
        })
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneralConfig;

    fn available() -> Vec<LanguageIdentifier> {
        vec!["en-US".parse().unwrap(), "fr".parse().unwrap()]
    }

    #[test]
    fn resolve_locale_prefers_cli() {
        let lang = resolve_locale(Some("fr".to_string()), &Config::default(), &available());
        assert_eq!(lang, Some("fr".parse().unwrap()));
    }

    #[test]
    fn resolve_locale_uses_config() {
        let config = Config {
            general: GeneralConfig {
                language: Some("fr".to_string()),
            },
            ..Config::default()
        };
        let lang = resolve_locale(None, &config, &available());
        assert_eq!(lang, Some("fr".parse().unwrap()));
    }

    #[test]
    fn regional_variant_falls_back_to_language() {
        let lang = resolve_locale(Some("fr-CA".to_string()), &Config::default(), &available());
        assert_eq!(lang, Some("fr".parse().unwrap()));
    }

    #[test]
    fn bundled_locales_are_loaded() {
        let i18n = I18n::new(Some("en-US".to_string()), &Config::default());
        assert!(i18n.available_locales.len() >= 2);
        assert_eq!(i18n.current_locale().to_string(), "en-US");
    }

    #[test]
    fn tr_args_interpolates() {
        let i18n = I18n::new(Some("en-US".to_string()), &Config::default());
        let text = i18n.tr_args(
            "notification-upload-partial",
            &[
                ("failed".to_string(), ArgValue::Count(1)),
                ("total".to_string(), ArgValue::Count(3)),
            ],
        );
        assert!(text.contains('1'));
        assert!(text.contains('3'));
        assert!(!text.starts_with("MISSING"));
    }

    #[test]
    fn render_translates_reason() {
        let i18n = I18n::new(Some("en-US".to_string()), &Config::default());
        let notification = Notification::error("notification-metadata-save-failed")
            .with_arg(REASON_ARG, "error-api-unreachable");
        let text = i18n.render(&notification);
        assert!(!text.contains("error-api-unreachable"));
        assert!(!text.contains("MISSING"));
    }

    #[test]
    fn numeric_looking_text_renders_verbatim() {
        let i18n = I18n::new(Some("en-US".to_string()), &Config::default());
        for name in ["007", "12e45678", "1e3"] {
            let notification =
                Notification::success("notification-item-created").with_arg("name", name);
            assert_eq!(i18n.render(&notification), format!("Created {name}."));
        }
    }

    #[test]
    fn counts_select_plural_forms() {
        let i18n = I18n::new(Some("en-US".to_string()), &Config::default());
        let one = Notification::success("notification-upload-success").with_arg("count", 1usize);
        let many = Notification::success("notification-upload-success").with_arg("count", 4usize);
        assert_eq!(i18n.render(&one), "Uploaded 1 photo.");
        assert_eq!(i18n.render(&many), "Uploaded 4 photos.");
    }

    #[test]
    fn missing_key_is_marked() {
        let i18n = I18n::default();
        assert_eq!(i18n.tr("no-such-key"), "MISSING: no-such-key");
    }
}
