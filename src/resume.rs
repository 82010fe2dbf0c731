//! Downloadable HTML resume.
//!
//! The document is rendered by handlebars from a [`ResumeSnapshot`], which
//! takes care of escaping every value.

use chrono::{Datelike, NaiveDate};
use handlebars::Handlebars;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::profile::ProfileData;

pub const CONTENT_TYPE: &str = "text/html";
/// Projects listed on the resume
pub const MAX_PROJECTS: usize = 5;

const TEMPLATE_NAME: &str = "resume";

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{{title}} - Resume</title>
  <style>
    body { font-family: Arial, sans-serif; max-width: 800px; margin: 0 auto; padding: 40px; }
    h1 { color: {{primary_color}}; margin-bottom: 5px; }
    h2 { color: {{primary_color}}; border-bottom: 2px solid {{primary_color}}; padding-bottom: 5px; margin-top: 30px; }
    .tagline { color: #666; font-size: 18px; margin-bottom: 20px; }
    .section { margin-bottom: 20px; }
    .item { margin-bottom: 15px; }
    .item-title { font-weight: bold; }
    .item-subtitle { color: #666; font-style: italic; }
    .skills { display: flex; flex-wrap: wrap; gap: 10px; }
    .skill-tag { background: {{primary_color}}20; color: {{primary_color}}; padding: 5px 10px; border-radius: 5px; }
  </style>
</head>
<body>
  <h1>{{title}}</h1>
  <p class="tagline">{{tagline}}</p>
  <p>{{bio}}</p>

  <h2>Skills</h2>
  <div class="skills">
    {{#each skills}}<span class="skill-tag">{{this}}</span>{{/each}}
  </div>

  <h2>Experience</h2>
{{#each experiences}}
  <div class="item">
    <div class="item-title">{{position}} at {{company}}</div>
    <div class="item-subtitle">{{location}} | {{period}}</div>
    <p>{{description}}</p>
  </div>
{{/each}}

  <h2>Projects</h2>
{{#each projects}}
  <div class="item">
    <div class="item-title">{{title}}</div>
    <p>{{summary}}</p>
    <p><strong>Tech:</strong> {{tech}}</p>
  </div>
{{/each}}

  <h2>Education</h2>
{{#each education}}
  <div class="item">
    <div class="item-title">{{degree}} in {{field_of_study}}</div>
    <div class="item-subtitle">{{institution}} | {{period}}</div>
  </div>
{{/each}}
</body>
</html>
"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResumeExperience {
    pub position: String,
    pub company: String,
    pub location: String,
    pub period: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResumeProject {
    pub title: String,
    pub summary: String,
    pub tech: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResumeEducation {
    pub degree: String,
    pub field_of_study: String,
    pub institution: String,
    pub period: String,
}

/// Everything that goes on the resume, already formatted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResumeSnapshot {
    pub username: String,
    pub title: String,
    pub tagline: String,
    pub bio: String,
    pub primary_color: String,
    pub skills: Vec<String>,
    pub experiences: Vec<ResumeExperience>,
    pub projects: Vec<ResumeProject>,
    pub education: Vec<ResumeEducation>,
}

/// `2019 - 2022`, or `2019 - Present` while ongoing.
fn period(start: NaiveDate, end: Option<NaiveDate>, current: bool) -> String {
    match end {
        Some(end) if !current => format!("{} - {}", start.year(), end.year()),
        _ => format!("{} - Present", start.year()),
    }
}

impl From<&ProfileData> for ResumeSnapshot {
    fn from(data: &ProfileData) -> Self {
        let portfolio = &data.portfolio;
        Self {
            username: portfolio.username.clone(),
            title: portfolio.title.clone(),
            tagline: portfolio.tagline.clone(),
            bio: portfolio.bio.clone(),
            primary_color: portfolio.primary_color.clone(),
            skills: portfolio.skills.iter().map(|s| s.name.clone()).collect(),
            experiences: portfolio
                .experiences
                .iter()
                .map(|e| ResumeExperience {
                    position: e.position.clone(),
                    company: e.company.clone(),
                    location: e.location.clone(),
                    period: period(e.start_date, e.end_date, e.is_current),
                    description: e.description.clone(),
                })
                .collect(),
            projects: data
                .projects
                .iter()
                .take(MAX_PROJECTS)
                .map(|p| ResumeProject {
                    title: p.title.clone(),
                    summary: p.summary().to_string(),
                    tech: p.tech_stack.join(", "),
                })
                .collect(),
            education: portfolio
                .education
                .iter()
                .map(|e| ResumeEducation {
                    degree: e.degree.clone(),
                    field_of_study: e.field_of_study.clone(),
                    institution: e.institution.clone(),
                    period: period(e.start_date, e.end_date, false),
                })
                .collect(),
        }
    }
}

/// A rendered resume
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeDocument {
    pub file_name: String,
    pub content_type: &'static str,
    pub html: String,
}

impl ResumeDocument {
    /// Write the document into `dir` and return the file path.
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.html)?;
        Ok(path)
    }
}

pub fn render(snapshot: &ResumeSnapshot) -> Result<ResumeDocument> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(false);
    registry.register_template_string(TEMPLATE_NAME, TEMPLATE)?;
    let html = registry.render(TEMPLATE_NAME, snapshot)?;

    Ok(ResumeDocument {
        file_name: format!("{}_resume.html", snapshot.username),
        content_type: CONTENT_TYPE,
        html,
    })
}
