use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One addressable field of the resume form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResumeField {
    Name,
    Email,
    Phone,
    Summary,
    Experience,
    Education,
    Skills,
    JobDescription,
}

impl fmt::Display for ResumeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResumeField::Name => "name",
            ResumeField::Email => "email",
            ResumeField::Phone => "phone",
            ResumeField::Summary => "summary",
            ResumeField::Experience => "experience",
            ResumeField::Education => "education",
            ResumeField::Skills => "skills",
            ResumeField::JobDescription => "jobDescription",
        };
        f.write_str(name)
    }
}

/// The user-entered, unoptimized resume. Every field is free-form text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub summary: String,
    pub experience: String,
    pub education: String,
    pub skills: String,
    pub job_description: String,
}

/// Raised when a draft is submitted without its required fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Please fill in at least your name and experience")]
pub struct ValidationError {
    pub missing: Vec<ResumeField>,
}

impl ResumeDraft {
    /// Fields that must be non-blank before the draft can be optimized.
    pub const REQUIRED: [ResumeField; 2] = [ResumeField::Name, ResumeField::Experience];

    pub fn get(&self, field: ResumeField) -> &str {
        match field {
            ResumeField::Name => &self.name,
            ResumeField::Email => &self.email,
            ResumeField::Phone => &self.phone,
            ResumeField::Summary => &self.summary,
            ResumeField::Experience => &self.experience,
            ResumeField::Education => &self.education,
            ResumeField::Skills => &self.skills,
            ResumeField::JobDescription => &self.job_description,
        }
    }

    /// Replaces one field's value. No validation happens here.
    pub fn set(&mut self, field: ResumeField, value: String) {
        let slot = match field {
            ResumeField::Name => &mut self.name,
            ResumeField::Email => &mut self.email,
            ResumeField::Phone => &mut self.phone,
            ResumeField::Summary => &mut self.summary,
            ResumeField::Experience => &mut self.experience,
            ResumeField::Education => &mut self.education,
            ResumeField::Skills => &mut self.skills,
            ResumeField::JobDescription => &mut self.job_description,
        };
        *slot = value;
    }

    pub fn has_job_description(&self) -> bool {
        !self.job_description.trim().is_empty()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let missing: Vec<ResumeField> = Self::REQUIRED
            .into_iter()
            .filter(|&f| self.get(f).trim().is_empty())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { missing })
        }
    }
}

/// Structured output of one successful optimization.
///
/// Deserialized strictly from model output: every key is required.
/// The ATS score range is checked by the optimizer after parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    pub summary: String,
    pub experience: Vec<String>,
    pub skills: Vec<String>,
    pub ats_score: u8,
    pub improvements: Vec<String>,
}

impl OptimizationResult {
    pub const MAX_ATS_SCORE: u8 = 100;
}
