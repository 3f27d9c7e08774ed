//! Data models and structures
//!
//! Defines the core data structures for resume analysis, outreach content,
//! bot configuration, and history records exchanged with the generation
//! backend and the key-value store.

use crate::schema::Schema;
use serde::{Deserialize, Serialize};

/// Default sampling temperature applied when no override is persisted.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Which persisted bot personality a generation or chat use case runs under.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BotRole {
    Outreach,
    Interview,
}

/// User-editable generation parameters for one bot role.
///
/// Persisted wholesale, at most one record per role. Merging an edit onto the
/// previous record happens in memory before save.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BotConfig {
    #[serde(rename = "type")]
    pub role: BotRole,
    pub system_prompt: String,
    pub temperature: f32,
}

/// Normalized representation of an uploaded document, ready for transmission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContentUnit {
    /// Base64 payload passed through for backend-side document understanding.
    Binary { mime_type: String, data: String },
    /// Extracted plain text.
    Text { value: String },
}

impl ContentUnit {
    pub fn text(value: impl Into<String>) -> Self {
        ContentUnit::Text {
            value: value.into(),
        }
    }

    /// Text content, if this unit carries any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentUnit::Text { value } => Some(value),
            ContentUnit::Binary { .. } => None,
        }
    }
}

/// One fully-assembled backend call. Built fresh per call, never mutated
/// after dispatch. A present `schema` switches the backend into
/// structured-output mode.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub system_instruction: String,
    pub temperature: Option<f32>,
    pub schema: Option<Schema>,
    pub document: ContentUnit,
    pub context: String,
}

/// Session-wide parameters, fixed for a chat session's lifetime.
#[derive(Debug, Clone)]
pub struct ChatParams {
    pub system_instruction: String,
    pub temperature: Option<f32>,
}

impl From<&BotConfig> for ChatParams {
    fn from(config: &BotConfig) -> Self {
        Self {
            system_instruction: config.system_prompt.clone(),
            temperature: Some(config.temperature),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One wire-history entry of a chat session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub parts: Vec<ContentUnit>,
}

impl Turn {
    pub fn user(parts: Vec<ContentUnit>) -> Self {
        Self {
            role: Role::User,
            parts,
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![ContentUnit::text(text)],
        }
    }

    /// Concatenated text parts; binary parts are skipped.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(ContentUnit::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Structured resume analysis returned by the backend.
///
/// All fields are required. A payload missing any of them is rejected as a
/// whole, never partially accepted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub job_title_detected: String,
    pub match_score: u8,
    pub found_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub suggested_resume: StructuredSuggestions,
    pub removals: Vec<Removal>,
    pub executive_summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StructuredSuggestions {
    pub personal_summary: String,
    pub summary_extension_points: Vec<String>,
    pub core_skills: Vec<SkillCategory>,
    pub experience: Vec<ExperienceImprovement>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SkillCategory {
    pub category: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceImprovement {
    pub company_and_role: String,
    pub suggested_bullet_points: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Removal {
    pub text: String,
    pub reason: String,
}

/// Generated recruiter outreach copy. Same all-or-nothing validity rule as
/// [`AnalysisResult`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutreachContent {
    pub email_subject: String,
    pub email_body: String,
    pub linkedin_message: String,
}

/// One completed analysis, recorded for the history view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: String,
    pub user_id: String,
    pub date: String,
    pub job_title: String,
    pub job_description_summary: String,
    pub full_job_description: String,
    pub result: AnalysisResult,
}

const SUMMARY_CHARS: usize = 100;

impl HistoryItem {
    pub fn new(
        user_id: impl Into<String>,
        job_title: impl Into<String>,
        job_description: &str,
        result: AnalysisResult,
    ) -> Self {
        let summary: String = job_description.chars().take(SUMMARY_CHARS).collect();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            date: chrono::Utc::now().to_rfc3339(),
            job_title: job_title.into(),
            job_description_summary: format!("{}...", summary),
            full_job_description: job_description.to_string(),
            result,
        }
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub model: String,
    pub storage_dir: std::path::PathBuf,
}

const DEFAULT_MODEL: &str = "gemini-2.5-flash";

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .map_err(|_| crate::Error::Config("GEMINI_API_KEY not set".to_string()))?,
            model: std::env::var("ATS_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            storage_dir: std::env::var("ATS_STORAGE_DIR")
                .unwrap_or_else(|_| "storage".to_string())
                .into(),
        })
    }
}
