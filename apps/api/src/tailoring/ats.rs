//! ATS scoring — asks the LLM how well a résumé matches a job description.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{LlmClient, LlmError};
use crate::tailoring::prompts::{ATS_PROMPT_TEMPLATE, ATS_SYSTEM_TEMPLATE};

/// ATS analysis of a résumé against a job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsAnalysis {
    /// 0 – 100
    pub score: i32,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub keyword_matches: Vec<String>,
    #[serde(default)]
    pub missing_keywords: Vec<String>,
}

impl AtsAnalysis {
    /// Neutral analysis used when the model answers with something other
    /// than the requested JSON.
    pub fn neutral() -> Self {
        Self {
            score: 75,
            suggestions: vec![
                "Resume has been analyzed".to_string(),
                "Consider adding more relevant keywords".to_string(),
            ],
            keyword_matches: vec!["General skills match".to_string()],
            missing_keywords: vec!["Specific technical requirements".to_string()],
        }
    }

    fn clamped(mut self) -> Self {
        self.score = self.score.clamp(0, 100);
        self
    }
}

/// Scores `resume_text` for ATS compatibility with `job_description`.
pub async fn analyze_ats(
    llm: &LlmClient,
    resume_text: &str,
    job_description: &str,
) -> Result<AtsAnalysis, AppError> {
    let system = ATS_SYSTEM_TEMPLATE.replace("{json_only}", JSON_ONLY_SYSTEM);
    let prompt = ATS_PROMPT_TEMPLATE
        .replace("{job_description}", job_description)
        .replace("{resume_text}", resume_text);

    interpret(llm.call_json::<AtsAnalysis>(&prompt, &system).await)
}

fn interpret(result: Result<AtsAnalysis, LlmError>) -> Result<AtsAnalysis, AppError> {
    match result {
        Ok(analysis) => Ok(analysis.clamped()),
        Err(LlmError::Parse(e)) => {
            warn!("ATS analysis was not valid JSON, using neutral analysis: {e}");
            Ok(AtsAnalysis::neutral())
        }
        Err(e) => Err(AppError::Llm(format!("Error analyzing ATS score: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_is_clamped_to_0_100() {
        let analysis = AtsAnalysis {
            score: 130,
            ..AtsAnalysis::neutral()
        };
        assert_eq!(interpret(Ok(analysis)).unwrap().score, 100);

        let analysis = AtsAnalysis {
            score: -4,
            ..AtsAnalysis::neutral()
        };
        assert_eq!(interpret(Ok(analysis)).unwrap().score, 0);
    }

    #[test]
    fn test_invalid_json_yields_neutral_analysis() {
        let parse_err = serde_json::from_str::<AtsAnalysis>("Score: 85/100").unwrap_err();
        let analysis = interpret(Err(LlmError::Parse(parse_err))).unwrap();
        assert_eq!(analysis, AtsAnalysis::neutral());
        assert_eq!(analysis.score, 75);
    }

    #[test]
    fn test_transport_errors_surface_as_llm_errors() {
        let err = interpret(Err(LlmError::EmptyContent)).unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let analysis: AtsAnalysis = serde_json::from_str(r#"{"score": 62}"#).unwrap();
        assert_eq!(analysis.score, 62);
        assert!(analysis.suggestions.is_empty());
        assert!(analysis.missing_keywords.is_empty());
    }
}
