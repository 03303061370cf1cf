//! Colour theme chosen by the visitor, kept in the cookie session.

use actix_session::Session;
use serde::{Deserialize, Serialize};

const THEME_SESSION_KEY: &str = "theme";

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Theme stored in `session`, or the default when unset or unreadable.
    pub fn from_session(session: &Session) -> Self {
        match session.get::<Theme>(THEME_SESSION_KEY) {
            Ok(theme) => theme.unwrap_or_default(),
            Err(err) => {
                log::warn!("Ignoring unreadable theme in session: {err}");
                Theme::default()
            }
        }
    }

    pub fn store(self, session: &Session) {
        if let Err(err) = session.insert(THEME_SESSION_KEY, self) {
            log::error!("Failed to store theme in session: {err}");
        }
    }
}
