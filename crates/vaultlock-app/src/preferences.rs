//! User preferences consumed when a screen is created.
//!
//! Theme and locale must be applied before a screen shows any content, and
//! the secure-window flag before the first frame is drawn, so the coordinator
//! emits them ahead of everything else on creation.

use std::fmt;

/// Theme preference as configured by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    /// Always light.
    Light,
    /// Always dark.
    Dark,
    /// Always pure black.
    Amoled,
    /// Follow the system night mode (light or dark).
    #[default]
    System,
    /// Follow the system night mode (light or pure black).
    SystemAmoled,
}

/// Theme a screen is actually drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConcreteTheme {
    /// Light palette.
    Light,
    /// Dark palette.
    Dark,
    /// Pure black palette.
    Amoled,
}

/// Resolves a theme preference against the system night mode.
pub trait ThemeResolver {
    /// Concrete theme for `preference` given the system's dark mode.
    fn resolve(&self, preference: Theme, system_is_dark: bool) -> ConcreteTheme;
}

/// Default resolver: system themes follow night mode, fixed themes map to
/// themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemThemeResolver;

impl ThemeResolver for SystemThemeResolver {
    fn resolve(&self, preference: Theme, system_is_dark: bool) -> ConcreteTheme {
        match preference {
            Theme::Light => ConcreteTheme::Light,
            Theme::Dark => ConcreteTheme::Dark,
            Theme::Amoled => ConcreteTheme::Amoled,
            Theme::System if system_is_dark => ConcreteTheme::Dark,
            Theme::SystemAmoled if system_is_dark => ConcreteTheme::Amoled,
            Theme::System | Theme::SystemAmoled => ConcreteTheme::Light,
        }
    }
}

/// Language tag of the user interface (e.g. `en`, `pt-BR`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale(String);

impl Locale {
    /// Wrap a language tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Language tag.
    pub fn tag(&self) -> &str {
        &self.0
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::new("en")
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of the configured locale.
pub trait LocaleStore {
    /// Locale to apply to a screen being created.
    fn get(&self) -> Locale;
}

/// User preferences relevant to screen creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    /// Theme preference.
    pub theme: Theme,
    /// Interface locale.
    pub locale: Locale,
    /// Block screenshots of every screen.
    pub secure_screen: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self { theme: Theme::default(), locale: Locale::default(), secure_screen: true }
    }
}

impl LocaleStore for Preferences {
    fn get(&self) -> Locale {
        self.locale.clone()
    }
}

/// Everything a coordinator applies to its screen before registering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenSetup {
    /// Resolved theme.
    pub theme: ConcreteTheme,
    /// Locale to apply.
    pub locale: Locale,
    /// Set the secure-window flag.
    pub secure_screen: bool,
}

impl Default for ScreenSetup {
    fn default() -> Self {
        Self { theme: ConcreteTheme::Light, locale: Locale::default(), secure_screen: true }
    }
}

impl ScreenSetup {
    /// Resolve preferences into a concrete setup for one screen.
    pub fn resolve(
        preferences: &Preferences,
        resolver: &dyn ThemeResolver,
        locales: &dyn LocaleStore,
        system_is_dark: bool,
    ) -> Self {
        Self {
            theme: resolver.resolve(preferences.theme, system_is_dark),
            locale: locales.get(),
            secure_screen: preferences.secure_screen,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_themes_follow_night_mode() {
        let resolver = SystemThemeResolver;

        assert_eq!(resolver.resolve(Theme::System, true), ConcreteTheme::Dark);
        assert_eq!(resolver.resolve(Theme::System, false), ConcreteTheme::Light);
        assert_eq!(resolver.resolve(Theme::SystemAmoled, true), ConcreteTheme::Amoled);
        assert_eq!(resolver.resolve(Theme::SystemAmoled, false), ConcreteTheme::Light);
    }

    #[test]
    fn fixed_themes_ignore_night_mode() {
        let resolver = SystemThemeResolver;

        for dark in [false, true] {
            assert_eq!(resolver.resolve(Theme::Light, dark), ConcreteTheme::Light);
            assert_eq!(resolver.resolve(Theme::Dark, dark), ConcreteTheme::Dark);
            assert_eq!(resolver.resolve(Theme::Amoled, dark), ConcreteTheme::Amoled);
        }
    }

    #[test]
    fn setup_uses_locale_store() {
        struct Fixed;
        impl LocaleStore for Fixed {
            fn get(&self) -> Locale {
                Locale::new("nl")
            }
        }

        let preferences = Preferences { secure_screen: false, ..Preferences::default() };
        let setup = ScreenSetup::resolve(&preferences, &SystemThemeResolver, &Fixed, true);

        assert_eq!(setup, ScreenSetup {
            theme: ConcreteTheme::Dark,
            locale: Locale::new("nl"),
            secure_screen: false,
        });
    }
}
