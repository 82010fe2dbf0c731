use chrono::{DateTime, NaiveDate, Utc};
use devfolio_auth::Resource;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "My Portfolio";
pub const DEFAULT_PRIMARY_COLOR: &str = "#3B82F6";
pub const DEFAULT_SECONDARY_COLOR: &str = "#1E40AF";
pub const DEFAULT_FONT_FAMILY: &str = "Inter";
pub const DEFAULT_PROFICIENCY: u8 = 50;

/// Layout template of the public page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    #[default]
    Modern,
    Minimal,
    Creative,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    GitHub,
    LinkedIn,
    Twitter,
    Instagram,
    Facebook,
    YouTube,
    Dribbble,
    Behance,
    Medium,
    Dev,
    StackOverflow,
    Other,
    #[serde(other)]
    Unknown,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::GitHub => "github",
            Platform::LinkedIn => "linkedin",
            Platform::Twitter => "twitter",
            Platform::Instagram => "instagram",
            Platform::Facebook => "facebook",
            Platform::YouTube => "youtube",
            Platform::Dribbble => "dribbble",
            Platform::Behance => "behance",
            Platform::Medium => "medium",
            Platform::Dev => "dev",
            Platform::StackOverflow => "stackoverflow",
            Platform::Other => "other",
            Platform::Unknown => "unknown",
        }
    }

    /// Name as the platform brands itself
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::GitHub => "GitHub",
            Platform::LinkedIn => "LinkedIn",
            Platform::Twitter => "Twitter",
            Platform::Instagram => "Instagram",
            Platform::Facebook => "Facebook",
            Platform::YouTube => "YouTube",
            Platform::Dribbble => "Dribbble",
            Platform::Behance => "Behance",
            Platform::Medium => "Medium",
            Platform::Dev => "Dev.to",
            Platform::StackOverflow => "Stack Overflow",
            Platform::Other => "Other",
            Platform::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    Frontend,
    Backend,
    Mobile,
    Database,
    DevOps,
    Design,
    Other,
    #[serde(other)]
    Unknown,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 7] = [
        SkillCategory::Frontend,
        SkillCategory::Backend,
        SkillCategory::Mobile,
        SkillCategory::Database,
        SkillCategory::DevOps,
        SkillCategory::Design,
        SkillCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::Frontend => "frontend",
            SkillCategory::Backend => "backend",
            SkillCategory::Mobile => "mobile",
            SkillCategory::Database => "database",
            SkillCategory::DevOps => "devops",
            SkillCategory::Design => "design",
            SkillCategory::Other => "other",
            SkillCategory::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    pub id: i64,
    pub platform: Platform,
    pub url: String,
    #[serde(default)]
    pub display_order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLinkForm {
    pub platform: Platform,
    pub url: String,
    pub display_order: i32,
}

impl From<&SocialLink> for SocialLinkForm {
    fn from(link: &SocialLink) -> Self {
        Self {
            platform: link.platform,
            url: link.url.clone(),
            display_order: link.display_order,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: i64,
    pub name: String,
    pub category: SkillCategory,
    #[serde(default = "default_proficiency")]
    pub proficiency: u8,
    #[serde(default)]
    pub display_order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillForm {
    pub name: String,
    pub category: SkillCategory,
    pub proficiency: u8,
    pub display_order: i32,
}

impl SkillForm {
    pub fn new(name: &str, category: SkillCategory) -> Self {
        Self {
            name: name.to_string(),
            category,
            proficiency: DEFAULT_PROFICIENCY,
            display_order: 0,
        }
    }

    /// Set the proficiency, capped at 100.
    pub fn with_proficiency(mut self, proficiency: u8) -> Self {
        self.proficiency = proficiency.min(100);
        self
    }
}

impl From<&Skill> for SkillForm {
    fn from(skill: &Skill) -> Self {
        Self {
            name: skill.name.clone(),
            category: skill.category,
            proficiency: skill.proficiency,
            display_order: skill.display_order,
        }
    }
}

fn default_proficiency() -> u8 {
    DEFAULT_PROFICIENCY
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub id: i64,
    pub company: String,
    pub position: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    pub start_date: NaiveDate,
    /// `None` while the position is held.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub display_order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceForm {
    pub company: String,
    pub position: String,
    pub location: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_current: bool,
    pub display_order: i32,
}

impl ExperienceForm {
    pub fn new(company: &str, position: &str, start_date: NaiveDate) -> Self {
        Self {
            company: company.to_string(),
            position: position.to_string(),
            location: String::new(),
            description: String::new(),
            start_date,
            end_date: None,
            is_current: false,
            display_order: 0,
        }
    }

    /// Mark as the current position; any end date is dropped.
    pub fn current(mut self) -> Self {
        self.is_current = true;
        self.end_date = None;
        self
    }
}

impl From<&Experience> for ExperienceForm {
    fn from(exp: &Experience) -> Self {
        Self {
            company: exp.company.clone(),
            position: exp.position.clone(),
            location: exp.location.clone(),
            description: exp.description.clone(),
            start_date: exp.start_date,
            end_date: exp.end_date,
            is_current: exp.is_current,
            display_order: exp.display_order,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub id: i64,
    pub institution: String,
    pub degree: String,
    pub field_of_study: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub grade: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub display_order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationForm {
    pub institution: String,
    pub degree: String,
    pub field_of_study: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub grade: String,
    pub description: String,
    pub display_order: i32,
}

impl EducationForm {
    pub fn new(institution: &str, degree: &str, field_of_study: &str, start_date: NaiveDate) -> Self {
        Self {
            institution: institution.to_string(),
            degree: degree.to_string(),
            field_of_study: field_of_study.to_string(),
            start_date,
            end_date: None,
            grade: String::new(),
            description: String::new(),
            display_order: 0,
        }
    }
}

impl From<&Education> for EducationForm {
    fn from(edu: &Education) -> Self {
        Self {
            institution: edu.institution.clone(),
            degree: edu.degree.clone(),
            field_of_study: edu.field_of_study.clone(),
            start_date: edu.start_date,
            end_date: edu.end_date,
            grade: edu.grade.clone(),
            description: edu.description.clone(),
            display_order: edu.display_order,
        }
    }
}

/// A user's portfolio with its nested sections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub id: i64,
    pub user: i64,
    pub username: String,
    pub title: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub template: Template,
    pub primary_color: String,
    pub secondary_color: String,
    pub font_family: String,
    #[serde(default)]
    pub subdomain: String,
    #[serde(default)]
    pub custom_domain: String,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub meta_description: String,
    #[serde(default)]
    pub meta_keywords: String,
    #[serde(default)]
    pub social_links: Vec<SocialLink>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub experiences: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Writable portfolio fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioForm {
    pub title: String,
    pub tagline: String,
    pub bio: String,
    pub template: Template,
    pub primary_color: String,
    pub secondary_color: String,
    pub font_family: String,
    pub custom_domain: String,
    pub is_published: bool,
    pub meta_description: String,
    pub meta_keywords: String,
}

impl Default for PortfolioForm {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            tagline: String::new(),
            bio: String::new(),
            template: Template::Modern,
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
            secondary_color: DEFAULT_SECONDARY_COLOR.to_string(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            custom_domain: String::new(),
            is_published: false,
            meta_description: String::new(),
            meta_keywords: String::new(),
        }
    }
}

impl From<&Portfolio> for PortfolioForm {
    fn from(portfolio: &Portfolio) -> Self {
        Self {
            title: portfolio.title.clone(),
            tagline: portfolio.tagline.clone(),
            bio: portfolio.bio.clone(),
            template: portfolio.template,
            primary_color: portfolio.primary_color.clone(),
            secondary_color: portfolio.secondary_color.clone(),
            font_family: portfolio.font_family.clone(),
            custom_domain: portfolio.custom_domain.clone(),
            is_published: portfolio.is_published,
            meta_description: portfolio.meta_description.clone(),
            meta_keywords: portfolio.meta_keywords.clone(),
        }
    }
}

impl Resource for SocialLink {
    type Form = SocialLinkForm;
    type Key = i64;
    const PATH: &'static str = "/portfolios/social-links/";

    fn key(&self) -> i64 {
        self.id
    }
}

impl Resource for Skill {
    type Form = SkillForm;
    type Key = i64;
    const PATH: &'static str = "/portfolios/skills/";

    fn key(&self) -> i64 {
        self.id
    }
}

impl Resource for Experience {
    type Form = ExperienceForm;
    type Key = i64;
    const PATH: &'static str = "/portfolios/experiences/";

    fn key(&self) -> i64 {
        self.id
    }
}

impl Resource for Education {
    type Form = EducationForm;
    type Key = i64;
    const PATH: &'static str = "/portfolios/education/";

    fn key(&self) -> i64 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_enum_values_do_not_fail() {
        let skill: Skill = serde_json::from_str(
            r#"{"id": 1, "name": "Elm", "category": "functional", "proficiency": 70, "display_order": 0}"#,
        )
        .unwrap();
        assert_eq!(skill.category, SkillCategory::Unknown);

        let link: SocialLink =
            serde_json::from_str(r#"{"id": 2, "platform": "mastodon", "url": "https://x.y"}"#).unwrap();
        assert_eq!(link.platform, Platform::Unknown);
    }

    #[test]
    fn platforms_use_server_values() {
        assert_eq!(serde_json::to_string(&Platform::StackOverflow).unwrap(), "\"stackoverflow\"");
        assert_eq!(serde_json::to_string(&SkillCategory::DevOps).unwrap(), "\"devops\"");
        let dev: Platform = serde_json::from_str("\"dev\"").unwrap();
        assert_eq!(dev.display_name(), "Dev.to");
    }

    #[test]
    fn skill_form_defaults_and_caps_proficiency() {
        let form = SkillForm::new("Rust", SkillCategory::Backend);
        assert_eq!(form.proficiency, 50);
        assert_eq!(form.with_proficiency(250).proficiency, 100);
    }

    #[test]
    fn portfolio_form_defaults() {
        let form = PortfolioForm::default();
        assert_eq!(form.title, "My Portfolio");
        assert_eq!(form.template, Template::Modern);
        assert_eq!(form.primary_color, "#3B82F6");
        assert_eq!(form.secondary_color, "#1E40AF");
        assert_eq!(form.font_family, "Inter");
    }

    #[test]
    fn current_experience_serializes_null_end_date() {
        let start = NaiveDate::from_ymd_opt(2022, 5, 1).unwrap();
        let form = ExperienceForm::new("Acme", "Engineer", start).current();
        let value = serde_json::to_value(&form).unwrap();
        assert_eq!(value["start_date"], "2022-05-01");
        assert!(value["end_date"].is_null());
        assert_eq!(value["is_current"], true);
    }
}
