// src/entity/analysis.rs
//
// Structured outputs from the AI provider layer. These are stored inline
// on items (`AiAnalysis`) or returned directly to the CLI (`ReviewResult`,
// `Summary`), so they all carry the same camelCase wire format.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Cached per-item analysis, written back onto the item after `analyze`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAnalysis {
    pub summary: String,
    #[serde(default)]
    pub related_problems: Vec<String>,
    #[serde(default)]
    pub suggested_solutions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub analyzed_at: DateTime<Utc>,
    #[serde(default)]
    pub cached: bool,
}

/// Filters for the `review` operation.
#[derive(Debug, Clone, Default)]
pub struct ReviewOptions {
    pub all: bool,
    pub last: Option<u32>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub topic: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pattern {
    pub name: String,
    pub count: u32,
    #[serde(default)]
    pub problems: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Cross-problem review: recurring patterns plus what to do about them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResult {
    #[serde(default)]
    pub patterns: Vec<Pattern>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryOverview {
    pub total_problems: u32,
    #[serde(default)]
    pub categories: HashMap<String, u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub most_active_time: Option<String>,
}

/// Periodic digest over a window of problems.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub period: String,
    pub overview: SummaryOverview,
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub trends: Vec<String>,
    #[serde(default)]
    pub meta_learning: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_result_tolerates_missing_fields() {
        let r: ReviewResult = serde_json::from_str(r#"{"patterns": []}"#).unwrap();
        assert!(r.suggestions.is_empty());
        assert!(r.resources.is_empty());
    }

    #[test]
    fn analysis_round_trips_camel_case() {
        let a = AiAnalysis {
            summary: "recurring build breakage".to_string(),
            related_problems: vec!["flaky CI".to_string()],
            suggested_solutions: vec![],
            category: Some("tooling".to_string()),
            analyzed_at: Utc::now(),
            cached: false,
        };
        let json = serde_json::to_value(&a).unwrap();
        assert!(json.get("relatedProblems").is_some());
        assert!(json.get("analyzedAt").is_some());
    }
}
