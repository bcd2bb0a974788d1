//! Theme preferences.
//!
//! Only persistence lives here; how a scheme or accent is drawn is up to the
//! front end. Bad stored values fall back to the defaults.

use crate::store::{CounterStore, StoreError, THEME_ACCENT_KEY, THEME_SCHEME_KEY};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_ACCENT: &str = "#4f46e5";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    #[default]
    Light,
    Dark,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Light => "light",
            Scheme::Dark => "dark",
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ThemeError {
    #[error("Unknown color scheme {0:?}, expected light or dark")]
    UnknownScheme(String),

    #[error("Accent {0:?} is not a #rrggbb color")]
    InvalidAccent(String),
}

impl FromStr for Scheme {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Scheme::Light),
            "dark" => Ok(Scheme::Dark),
            _ => Err(ThemeError::UnknownScheme(s.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub scheme: Scheme,
    /// Lowercase `#rrggbb`.
    pub accent: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            scheme: Scheme::default(),
            accent: DEFAULT_ACCENT.to_string(),
        }
    }
}

/// Normalize an accent color to lowercase `#rrggbb`.
pub fn parse_accent(raw: &str) -> Result<String, ThemeError> {
    let hex = raw.trim().strip_prefix('#').unwrap_or(raw.trim());
    if hex.len() == 6 && hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        Ok(format!("#{}", hex.to_ascii_lowercase()))
    } else {
        Err(ThemeError::InvalidAccent(raw.to_string()))
    }
}

impl Theme {
    pub fn new(scheme: Scheme, accent: &str) -> Result<Self, ThemeError> {
        Ok(Self {
            scheme,
            accent: parse_accent(accent)?,
        })
    }

    pub fn load<S: CounterStore + ?Sized>(store: &S) -> Self {
        let defaults = Theme::default();

        let scheme = match store.get(THEME_SCHEME_KEY) {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|err: ThemeError| {
                warn!(error = %err, "stored scheme ignored");
                defaults.scheme
            }),
            _ => defaults.scheme,
        };
        let accent = match store.get(THEME_ACCENT_KEY) {
            Ok(Some(raw)) => parse_accent(&raw).unwrap_or_else(|err| {
                warn!(error = %err, "stored accent ignored");
                defaults.accent.clone()
            }),
            _ => defaults.accent.clone(),
        };

        Self { scheme, accent }
    }

    pub fn save<S: CounterStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        store.set(THEME_SCHEME_KEY, self.scheme.as_str())?;
        store.set(THEME_ACCENT_KEY, &self.accent)
    }
}
