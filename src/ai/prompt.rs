// src/ai/prompt.rs
//
// Prompt construction and lenient response parsing shared by all
// backends. Models are asked for JSON but do not always comply cleanly;
// parsing strips markdown fences and defaults any missing field rather
// than failing the whole call.
use chrono::Utc;
use serde::Deserialize;
use std::collections::HashMap;

use crate::entity::{
    AiAnalysis, Item, Pattern, Resource, ReviewOptions, ReviewResult, Summary, SummaryOverview,
};
use crate::error::{LifelogError, Result};

pub(super) fn analyze_prompt(item: &Item, context: &[Item]) -> String {
    let context_text = if context.is_empty() {
        String::new()
    } else {
        let lines: Vec<String> = context
            .iter()
            .take(5)
            .map(|p| format!("- {}", p.title))
            .collect();
        format!("\n\nRecent problems for context:\n{}", lines.join("\n"))
    };

    format!(
        "You are a problem-solving assistant. Analyze this problem and provide insights.\n\n\
         Problem: \"{}\"{}\n\n\
         Provide a JSON response with:\n\
         1. summary: Brief analysis of the problem (1-2 sentences)\n\
         2. relatedProblems: Array of indices of related problems from context (if any)\n\
         3. suggestedSolutions: Array of 2-3 potential solutions or approaches\n\
         4. category: Single category (e.g., \"Frontend\", \"Backend\", \"DevOps\", \"Algorithm\", \"Design\")\n\n\
         Keep it concise and actionable. Respond ONLY with valid JSON.",
        item.title, context_text
    )
}

pub(super) fn review_prompt(items: &[Item], options: &ReviewOptions) -> String {
    let problems_text: Vec<String> = items
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{}. {}", i + 1, p.title))
        .collect();
    let topic_line = options
        .topic
        .as_deref()
        .map(|t| format!("\nFocus the review on the topic: \"{}\".", t))
        .unwrap_or_default();

    format!(
        "You are a problem-solving coach. Analyze these problems and identify patterns.{}\n\n\
         Problems:\n{}\n\n\
         Provide a JSON response with:\n\
         1. patterns: Array of pattern objects with:\n\
            - name: Pattern name\n\
            - count: Number of problems in this pattern\n\
            - problems: Array of problem indices (1-based)\n\
            - description: What this pattern means\n\
         2. suggestions: Array of 3-5 actionable suggestions\n\
         3. resources: Array of 2-3 helpful resources with title, url, description\n\n\
         Focus on meta-learning and skill development. Respond ONLY with valid JSON.",
        topic_line,
        problems_text.join("\n")
    )
}

pub(super) fn summary_prompt(items: &[Item], period: &str) -> String {
    let problems_text: Vec<String> = items
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{}. {} ({})", i + 1, p.title, p.created_at.to_rfc3339()))
        .collect();

    format!(
        "You are a learning analytics expert. Analyze these {} problems and provide insights.\n\n\
         Problems ({} total):\n{}\n\n\
         Provide a JSON response with:\n\
         1. overview: Object with:\n\
            - totalProblems: number\n\
            - categories: Object mapping category names to counts\n\
            - mostActiveTime: string (e.g., \"mornings\", \"afternoons\")\n\
         2. patterns: Array of 2-4 observed pattern strings\n\
         3. trends: Array of 1-3 trend strings\n\
         4. metaLearning: Array of 2-3 meta-learning insights\n\
         5. recommendations: Array of 2-3 actionable recommendations\n\n\
         Respond ONLY with valid JSON.",
        period,
        items.len(),
        problems_text.join("\n")
    )
}

/// Strip a markdown code fence if the model wrapped its JSON in one.
fn extract_json(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn parse_body<'a, T: Deserialize<'a>>(content: &'a str) -> Result<T> {
    serde_json::from_str(extract_json(content))
        .map_err(|e| LifelogError::Provider(format!("model returned invalid JSON: {}", e)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnalysis {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    related_problems: Vec<serde_json::Value>,
    #[serde(default)]
    suggested_solutions: Vec<String>,
    #[serde(default)]
    category: Option<String>,
}

/// Map 0-based context indices from the model back to item ids; anything
/// out of range is dropped.
pub(super) fn parse_analysis(content: &str, context: &[Item]) -> Result<AiAnalysis> {
    let raw: RawAnalysis = parse_body(content)?;
    let related_problems = raw
        .related_problems
        .iter()
        .filter_map(|v| v.as_u64())
        .filter_map(|idx| context.get(idx as usize))
        .map(|p| p.id.to_string())
        .collect();

    Ok(AiAnalysis {
        summary: raw.summary.unwrap_or_else(|| "No summary available".to_string()),
        related_problems,
        suggested_solutions: raw.suggested_solutions,
        category: raw.category,
        analyzed_at: Utc::now(),
        cached: false,
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPattern {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    count: Option<u32>,
    #[serde(default)]
    problems: Vec<serde_json::Value>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReview {
    #[serde(default)]
    patterns: Vec<RawPattern>,
    #[serde(default)]
    suggestions: Vec<String>,
    #[serde(default)]
    resources: Vec<RawResource>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResource {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// The review prompt numbers problems from 1; map those back to ids.
pub(super) fn parse_review(content: &str, items: &[Item]) -> Result<ReviewResult> {
    let raw: RawReview = parse_body(content)?;
    let patterns = raw
        .patterns
        .into_iter()
        .map(|p| Pattern {
            name: p.name.unwrap_or_else(|| "Unknown Pattern".to_string()),
            count: p.count.unwrap_or(0),
            problems: p
                .problems
                .iter()
                .filter_map(|v| v.as_u64())
                .filter_map(|idx| (idx as usize).checked_sub(1))
                .filter_map(|idx| items.get(idx))
                .map(|i| i.id.to_string())
                .collect(),
            description: p.description,
        })
        .collect();
    let resources = raw
        .resources
        .into_iter()
        .map(|r| Resource {
            title: r.title.unwrap_or_default(),
            url: r.url.unwrap_or_else(|| "#".to_string()),
            description: r.description,
        })
        .collect();

    Ok(ReviewResult {
        patterns,
        suggestions: raw.suggestions,
        resources,
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOverview {
    #[serde(default)]
    total_problems: Option<u32>,
    #[serde(default)]
    categories: HashMap<String, u32>,
    #[serde(default)]
    most_active_time: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSummary {
    #[serde(default)]
    overview: Option<RawOverview>,
    #[serde(default)]
    patterns: Vec<String>,
    #[serde(default)]
    trends: Vec<String>,
    #[serde(default)]
    meta_learning: Vec<String>,
    #[serde(default)]
    recommendations: Vec<String>,
}

pub(super) fn parse_summary(content: &str, period: &str, total: usize) -> Result<Summary> {
    let raw: RawSummary = parse_body(content)?;
    let overview = raw.overview.unwrap_or(RawOverview {
        total_problems: None,
        categories: HashMap::new(),
        most_active_time: None,
    });

    Ok(Summary {
        period: period.to_string(),
        overview: SummaryOverview {
            total_problems: overview.total_problems.unwrap_or(total as u32),
            categories: overview.categories,
            most_active_time: overview.most_active_time,
        },
        patterns: raw.patterns,
        trends: raw.trends,
        meta_learning: raw.meta_learning,
        recommendations: raw.recommendations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(titles: &[&str]) -> Vec<Item> {
        titles
            .iter()
            .map(|t| Item::new(t.to_string(), None, 0))
            .collect()
    }

    #[test]
    fn test_extract_json_strips_fences() {
        assert_eq!(extract_json("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(extract_json("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(extract_json("```\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn test_parse_analysis_maps_context_indices() {
        let context = items(&["one", "two"]);
        let analysis = parse_analysis(
            r#"{"summary": "s", "relatedProblems": [1, 9], "suggestedSolutions": ["try x"]}"#,
            &context,
        )
        .unwrap();
        assert_eq!(analysis.summary, "s");
        assert_eq!(analysis.related_problems, vec![context[1].id.to_string()]);
        assert_eq!(analysis.suggested_solutions, vec!["try x".to_string()]);
        assert!(!analysis.cached);
    }

    #[test]
    fn test_parse_analysis_defaults_missing_fields() {
        let analysis = parse_analysis("{}", &[]).unwrap();
        assert_eq!(analysis.summary, "No summary available");
        assert!(analysis.related_problems.is_empty());
    }

    #[test]
    fn test_parse_review_maps_one_based_indices() {
        let all = items(&["a", "b", "c"]);
        let review = parse_review(
            r#"{"patterns": [{"name": "time sinks", "count": 2, "problems": [1, 3]}],
                "suggestions": ["batch them"]}"#,
            &all,
        )
        .unwrap();
        assert_eq!(review.patterns.len(), 1);
        assert_eq!(
            review.patterns[0].problems,
            vec![all[0].id.to_string(), all[2].id.to_string()]
        );
        assert_eq!(review.suggestions, vec!["batch them".to_string()]);
    }

    #[test]
    fn test_parse_summary_fills_total() {
        let summary = parse_summary(r#"{"trends": ["up"]}"#, "weekly", 7).unwrap();
        assert_eq!(summary.period, "weekly");
        assert_eq!(summary.overview.total_problems, 7);
        assert_eq!(summary.trends, vec!["up".to_string()]);
    }

    #[test]
    fn test_non_json_body_is_a_provider_error() {
        let err = parse_analysis("I cannot help with that.", &[]).unwrap_err();
        assert!(matches!(err, LifelogError::Provider(_)));
    }
}
