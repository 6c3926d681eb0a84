use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::codegen::ParseError;

/// Cosmetic color theme for the web UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Theme {
    #[default]
    Neon,
    Cyberpunk,
    Solarized,
    Dracula,
    Monokai,
}

/// Colors used to render a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub background: &'static str,
}

impl Theme {
    pub const ALL: [Theme; 5] = [
        Theme::Neon,
        Theme::Cyberpunk,
        Theme::Solarized,
        Theme::Dracula,
        Theme::Monokai,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Theme::Neon => "Neon",
            Theme::Cyberpunk => "Cyberpunk",
            Theme::Solarized => "Solarized",
            Theme::Dracula => "Dracula",
            Theme::Monokai => "Monokai",
        }
    }

    pub fn palette(&self) -> Palette {
        match self {
            Theme::Neon => Palette {
                primary: "#4fffb0",
                secondary: "#ff4fd8",
                background: "#1a1a2e",
            },
            Theme::Cyberpunk => Palette {
                primary: "#ff2a6d",
                secondary: "#05d9e8",
                background: "#1a1a2e",
            },
            Theme::Solarized => Palette {
                primary: "#268bd2",
                secondary: "#d33682",
                background: "#fdf6e3",
            },
            Theme::Dracula => Palette {
                primary: "#bd93f9",
                secondary: "#ff79c6",
                background: "#282a36",
            },
            Theme::Monokai => Palette {
                primary: "#a6e22e",
                secondary: "#fd971f",
                background: "#272822",
            },
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(Theme::name).collect()
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Theme {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|theme| theme.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseError {
                kind: "theme",
                value: s.to_string(),
                expected: Self::names().join(", "),
            })
    }
}
