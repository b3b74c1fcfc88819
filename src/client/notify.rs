use std::fmt;

use console::style;

use crate::ui::icons::{CHECK, CROSS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Default,
    Destructive,
}

/// Transient message shown after a submission settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notification {
    pub title: &'static str,
    pub description: &'static str,
    pub variant: Variant,
}

pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

impl Notification {
    pub const fn success(title: &'static str, description: &'static str) -> Self {
        Self {
            title,
            description,
            variant: Variant::Default,
        }
    }

    pub const fn failure(title: &'static str) -> Self {
        Self {
            title,
            description: GENERIC_FAILURE,
            variant: Variant::Destructive,
        }
    }

    pub fn is_destructive(&self) -> bool {
        self.variant == Variant::Destructive
    }

    /// Styled two-line rendering for the terminal.
    pub fn render(&self) -> String {
        match self.variant {
            Variant::Default => format!(
                "{}{}\n   {}",
                CHECK,
                style(self.title).green().bold(),
                self.description
            ),
            Variant::Destructive => format!(
                "{}{}\n   {}",
                CROSS,
                style(self.title).red().bold(),
                self.description
            ),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}
