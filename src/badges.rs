//! Labels and colour tones for the enumerated fields shown as badges.

use devfolio_blog::PostStatus;
use devfolio_portfolio::{Platform, SkillCategory};
use devfolio_projects::ProjectStatus;

/// Colour family of a badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    Blue,
    Green,
    Purple,
    Yellow,
    Red,
    Pink,
    Gray,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Blue => "blue",
            Tone::Green => "green",
            Tone::Purple => "purple",
            Tone::Yellow => "yellow",
            Tone::Red => "red",
            Tone::Pink => "pink",
            Tone::Gray => "gray",
        }
    }
}

pub trait Badge {
    /// Raw server value
    fn value(&self) -> &'static str;

    fn tone(&self) -> Tone;

    /// Capitalised value with underscores shown as spaces
    fn label(&self) -> String {
        humanize(self.value())
    }
}

/// `in_progress` -> `In progress`
pub fn humanize(value: &str) -> String {
    let spaced = value.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl Badge for SkillCategory {
    fn value(&self) -> &'static str {
        self.as_str()
    }

    fn tone(&self) -> Tone {
        match self {
            SkillCategory::Frontend => Tone::Blue,
            SkillCategory::Backend => Tone::Green,
            SkillCategory::Mobile => Tone::Purple,
            SkillCategory::Database => Tone::Yellow,
            SkillCategory::DevOps => Tone::Red,
            SkillCategory::Design => Tone::Pink,
            SkillCategory::Other | SkillCategory::Unknown => Tone::Gray,
        }
    }
}

impl Badge for PostStatus {
    fn value(&self) -> &'static str {
        self.as_str()
    }

    fn tone(&self) -> Tone {
        match self {
            PostStatus::Published => Tone::Green,
            PostStatus::Archived => Tone::Red,
            PostStatus::Draft | PostStatus::Unknown => Tone::Gray,
        }
    }
}

impl Badge for ProjectStatus {
    fn value(&self) -> &'static str {
        self.as_str()
    }

    fn tone(&self) -> Tone {
        match self {
            ProjectStatus::Completed => Tone::Green,
            ProjectStatus::InProgress => Tone::Yellow,
            ProjectStatus::Planned => Tone::Blue,
            ProjectStatus::Unknown => Tone::Gray,
        }
    }
}

impl Badge for Platform {
    fn value(&self) -> &'static str {
        self.as_str()
    }

    fn tone(&self) -> Tone {
        match self {
            Platform::LinkedIn | Platform::Twitter | Platform::Facebook | Platform::Behance => {
                Tone::Blue
            }
            Platform::Instagram | Platform::Dribbble => Tone::Pink,
            Platform::YouTube => Tone::Red,
            Platform::StackOverflow => Tone::Yellow,
            Platform::GitHub
            | Platform::Medium
            | Platform::Dev
            | Platform::Other
            | Platform::Unknown => Tone::Gray,
        }
    }

    fn label(&self) -> String {
        self.display_name().to_string()
    }
}
