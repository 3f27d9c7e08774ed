//! Structured-output schemas for backend generation calls.
//!
//! Mirrors the Gemini `responseSchema` shape. A schema attached to a request
//! constrains the backend to emit conforming JSON; the validator still
//! re-checks the payload on the way back in.

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchemaType {
    Object,
    Array,
    String,
    Integer,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

impl Schema {
    pub fn string() -> Self {
        Self::of(SchemaType::String)
    }

    pub fn integer() -> Self {
        Self::of(SchemaType::Integer)
    }

    pub fn array(items: Schema) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::of(SchemaType::Array)
        }
    }

    pub fn object(properties: Vec<(&str, Schema)>, required: &[&str]) -> Self {
        Self {
            properties: Some(
                properties
                    .into_iter()
                    .map(|(name, schema)| (name.to_string(), schema))
                    .collect(),
            ),
            required: if required.is_empty() {
                None
            } else {
                Some(required.iter().map(|r| r.to_string()).collect())
            },
            ..Self::of(SchemaType::Object)
        }
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    fn of(schema_type: SchemaType) -> Self {
        Self {
            schema_type,
            description: None,
            properties: None,
            items: None,
            required: None,
        }
    }
}

/// Schema for the one-shot resume analysis. Every top-level field is
/// required; nested objects are left open the way the backend expects.
pub fn analysis_schema() -> Schema {
    Schema::object(
        vec![
            (
                "jobTitleDetected",
                Schema::string().describe("The likely job title from the JD"),
            ),
            ("matchScore", Schema::integer()),
            ("foundKeywords", Schema::array(Schema::string())),
            ("missingKeywords", Schema::array(Schema::string())),
            (
                "suggestedResume",
                Schema::object(
                    vec![
                        ("personalSummary", Schema::string()),
                        (
                            "summaryExtensionPoints",
                            Schema::array(Schema::string())
                                .describe("10 extra summary bullet points"),
                        ),
                        (
                            "coreSkills",
                            Schema::array(Schema::object(
                                vec![
                                    ("category", Schema::string()),
                                    ("skills", Schema::array(Schema::string())),
                                ],
                                &[],
                            )),
                        ),
                        (
                            "experience",
                            Schema::array(Schema::object(
                                vec![
                                    ("companyAndRole", Schema::string()),
                                    (
                                        "suggestedBulletPoints",
                                        Schema::array(Schema::string())
                                            .describe("15+ optimized bullet points"),
                                    ),
                                ],
                                &[],
                            )),
                        ),
                    ],
                    &[],
                ),
            ),
            (
                "removals",
                Schema::array(Schema::object(
                    vec![("text", Schema::string()), ("reason", Schema::string())],
                    &[],
                )),
            ),
            ("executiveSummary", Schema::string()),
        ],
        &[
            "jobTitleDetected",
            "matchScore",
            "foundKeywords",
            "missingKeywords",
            "suggestedResume",
            "removals",
            "executiveSummary",
        ],
    )
}

/// Schema for recruiter outreach copy.
pub fn outreach_schema() -> Schema {
    Schema::object(
        vec![
            ("emailSubject", Schema::string()),
            ("emailBody", Schema::string()),
            ("linkedinMessage", Schema::string()),
        ],
        &[],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_types_serialize_uppercase() {
        let json = serde_json::to_value(Schema::array(Schema::string())).unwrap();
        assert_eq!(json["type"], "ARRAY");
        assert_eq!(json["items"]["type"], "STRING");
    }

    #[test]
    fn test_analysis_schema_requires_every_top_level_field() {
        let json = serde_json::to_value(analysis_schema()).unwrap();

        let required: Vec<&str> = json["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert!(required.contains(&"matchScore"));
        assert!(required.contains(&"suggestedResume"));
        assert_eq!(required.len(), 7);

        assert_eq!(json["properties"]["matchScore"]["type"], "INTEGER");
        assert_eq!(
            json["properties"]["suggestedResume"]["properties"]["coreSkills"]["type"],
            "ARRAY"
        );
    }

    #[test]
    fn test_outreach_schema_has_no_required_list() {
        let json = serde_json::to_value(outreach_schema()).unwrap();
        assert!(json.get("required").is_none());
        assert_eq!(json["properties"]["emailSubject"]["type"], "STRING");
    }

    #[test]
    fn test_empty_fields_are_omitted_from_the_wire() {
        let json = serde_json::to_string(&Schema::string()).unwrap();
        assert_eq!(json, "{\"type\":\"STRING\"}");
    }
}
