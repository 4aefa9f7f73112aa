//! Theme preference and visual mode resolution

use std::fmt;
use std::str::FromStr;

use super::store::Store;

/// Stored user choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemePreference {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemePreference {
    pub const ALL: [ThemePreference; 3] = [Self::Light, Self::Dark, Self::System];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }

    /// Next value of the three-way toggle
    pub fn cycle(self) -> Self {
        match self {
            Self::System => Self::Light,
            Self::Light => Self::Dark,
            Self::Dark => Self::System,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Light => "\u{2600} Light",
            Self::Dark => "\u{1F319} Dark",
            Self::System => "\u{1F5A5} System",
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            other => Err(format!("unknown theme preference: {}", other)),
        }
    }
}

/// Resolved light/dark rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualMode {
    Light,
    Dark,
}

impl VisualMode {
    pub fn from_prefers_dark(dark: bool) -> Self {
        if dark {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

/// Tracks the preference, the latest OS signal and the applied mode
#[derive(Clone)]
pub struct ThemeResolver {
    store: Store,
    preference: ThemePreference,
    system: Option<VisualMode>,
    applied: VisualMode,
}

impl ThemeResolver {
    /// Load the persisted preference, defaulting to `system`
    pub fn load(store: Store, system: Option<VisualMode>) -> Self {
        let preference = store.read_theme_preference().unwrap_or_default();
        tracing::info!("Theme preference: {}", preference);
        let mut resolver = Self {
            store,
            preference,
            system,
            applied: VisualMode::Dark,
        };
        resolver.applied = resolver.resolve();
        resolver
    }

    pub fn preference(&self) -> ThemePreference {
        self.preference
    }

    pub fn applied(&self) -> VisualMode {
        self.applied
    }

    /// Persist a new preference and return the mode to apply
    pub fn set_preference(&mut self, preference: ThemePreference) -> VisualMode {
        self.preference = preference;
        if let Err(e) = self.store.write_theme_preference(preference) {
            tracing::error!("Failed to persist theme preference: {}", e);
        }
        self.applied = self.resolve();
        tracing::info!("Theme set to {} (applied {:?})", preference, self.applied);
        self.applied
    }

    /// Record the OS-level signal; returns the new mode if it changed
    ///
    /// The signal only affects the applied mode while the preference is
    /// `system`.
    pub fn observe_system(&mut self, system: Option<VisualMode>) -> Option<VisualMode> {
        if self.system == system {
            return None;
        }
        self.system = system;

        let resolved = self.resolve();
        if resolved == self.applied {
            return None;
        }
        tracing::debug!("System theme changed, applying {:?}", resolved);
        self.applied = resolved;
        Some(resolved)
    }

    fn resolve(&self) -> VisualMode {
        match self.preference {
            ThemePreference::Light => VisualMode::Light,
            ThemePreference::Dark => VisualMode::Dark,
            // Unknown OS preference falls back to dark
            ThemePreference::System => self.system.unwrap_or(VisualMode::Dark),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_system() {
        let resolver = ThemeResolver::load(Store::in_memory(), Some(VisualMode::Light));
        assert_eq!(resolver.preference(), ThemePreference::System);
        assert_eq!(resolver.applied(), VisualMode::Light);
    }

    #[test]
    fn test_loads_persisted_preference() {
        let store = Store::in_memory();
        store.write_theme_preference(ThemePreference::Light).unwrap();
        let resolver = ThemeResolver::load(store, Some(VisualMode::Dark));
        assert_eq!(resolver.preference(), ThemePreference::Light);
        assert_eq!(resolver.applied(), VisualMode::Light);
    }

    #[test]
    fn test_system_follows_os_signal() {
        let mut resolver = ThemeResolver::load(Store::in_memory(), Some(VisualMode::Dark));
        assert_eq!(resolver.applied(), VisualMode::Dark);

        assert_eq!(
            resolver.observe_system(Some(VisualMode::Light)),
            Some(VisualMode::Light)
        );
        assert_eq!(resolver.applied(), VisualMode::Light);

        // Same signal again is not a change
        assert_eq!(resolver.observe_system(Some(VisualMode::Light)), None);
    }

    #[test]
    fn test_explicit_preference_ignores_os_signal() {
        let mut resolver = ThemeResolver::load(Store::in_memory(), Some(VisualMode::Dark));
        assert_eq!(resolver.set_preference(ThemePreference::Light), VisualMode::Light);

        assert_eq!(resolver.observe_system(Some(VisualMode::Light)), None);
        assert_eq!(resolver.observe_system(Some(VisualMode::Dark)), None);
        assert_eq!(resolver.applied(), VisualMode::Light);
    }

    #[test]
    fn test_returning_to_system_uses_latest_signal() {
        let mut resolver = ThemeResolver::load(Store::in_memory(), Some(VisualMode::Light));
        resolver.set_preference(ThemePreference::Dark);
        resolver.observe_system(Some(VisualMode::Dark));
        resolver.observe_system(Some(VisualMode::Light));

        assert_eq!(resolver.set_preference(ThemePreference::System), VisualMode::Light);
    }

    #[test]
    fn test_set_preference_persists() {
        let store = Store::in_memory();
        let mut resolver = ThemeResolver::load(store.clone(), None);
        resolver.set_preference(ThemePreference::Dark);
        assert_eq!(store.read_theme_preference(), Some(ThemePreference::Dark));
    }

    #[test]
    fn test_cycle_visits_all_states() {
        let mut pref = ThemePreference::System;
        let mut seen = Vec::new();
        for _ in 0..3 {
            pref = pref.cycle();
            seen.push(pref);
        }
        assert_eq!(
            seen,
            vec![ThemePreference::Light, ThemePreference::Dark, ThemePreference::System]
        );
    }

    #[test]
    fn test_parse_round_trip() {
        for pref in ThemePreference::ALL {
            assert_eq!(pref.as_str().parse::<ThemePreference>(), Ok(pref));
        }
        assert!("auto".parse::<ThemePreference>().is_err());
    }
}
