//! Status enums shared by banners, alerts and notifications.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Severity of a message shown to the visitor.
///
/// The content backend stores it as the lowercase `type` field of info
/// banners; alerts and notifications use the same four levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    /// Lowercase name, also used as the CSS modifier (`banner--warning`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    /// Icon name rendered next to the message.
    #[must_use]
    pub const fn icon(&self) -> &'static str {
        match self {
            Self::Info => "i-lucide-info",
            Self::Success => "i-lucide-check-circle",
            Self::Warning => "i-lucide-alert-triangle",
            Self::Error => "i-lucide-x-circle",
        }
    }

    /// Whether screen readers should announce the message assertively.
    #[must_use]
    pub const fn is_urgent(&self) -> bool {
        matches!(self, Self::Warning | Self::Error)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Self::Info),
            "success" => Ok(Self::Success),
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            _ => Err(format!("invalid severity: {s}")),
        }
    }
}
