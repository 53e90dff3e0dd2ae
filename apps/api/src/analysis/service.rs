//! Single-candidate analysis flows. Each action builds exactly one prompt
//! (two for the portfolio) and returns the model's text.

use serde::Serialize;
use tracing::info;

use crate::analysis::portfolio::{render_portfolio, PortfolioPage, ProjectDetails};
use crate::analysis::prompts::{
    build_analysis_prompt, build_career_path_prompt, build_interview_prompt,
    build_portfolio_prompts, build_skill_gap_prompt, AnalysisMode, InterviewType,
};
use crate::errors::AppError;
use crate::llm_client::GenerativeModel;

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResponse {
    pub action: String,
    pub response: String,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioResponse {
    pub enhanced_description: String,
    pub best_features: String,
    pub file_name: String,
    pub html: String,
    pub warnings: Vec<String>,
}

pub async fn analyze_resume(
    model: &dyn GenerativeModel,
    job_description: &str,
    resume_text: &str,
    mode: &AnalysisMode,
) -> Result<String, AppError> {
    info!("Running resume analysis ({})", mode.label());
    let prompt = build_analysis_prompt(job_description, resume_text, mode);
    Ok(model.generate(&prompt).await?)
}

pub async fn analyze_skill_gap(
    model: &dyn GenerativeModel,
    job_description: &str,
    current_skills: &str,
    resume_text: &str,
) -> Result<String, AppError> {
    let prompt = build_skill_gap_prompt(job_description, current_skills, resume_text);
    Ok(model.generate(&prompt).await?)
}

pub async fn prepare_interview(
    model: &dyn GenerativeModel,
    job_description: &str,
    resume_text: &str,
    interview_type: InterviewType,
) -> Result<String, AppError> {
    info!("Generating {interview_type} interview preparation");
    let prompt = build_interview_prompt(job_description, resume_text, interview_type);
    Ok(model.generate(&prompt).await?)
}

pub async fn plan_career_path(
    model: &dyn GenerativeModel,
    job_description: &str,
    resume_text: &str,
    years_experience: u8,
) -> Result<String, AppError> {
    let prompt = build_career_path_prompt(job_description, resume_text, years_experience);
    Ok(model.generate(&prompt).await?)
}

/// Two model calls (enhanced description, best features), then the HTML page.
pub async fn build_portfolio(
    model: &dyn GenerativeModel,
    job_description: &str,
    project_description: &str,
    resume_text: &str,
    details: &ProjectDetails,
) -> Result<(String, String, PortfolioPage), AppError> {
    let (enhance_prompt, features_prompt) =
        build_portfolio_prompts(job_description, project_description, resume_text);

    let enhanced = model.generate(&enhance_prompt).await?;
    let features = model.generate(&features_prompt).await?;

    let page = render_portfolio(details, &enhanced, &features)?;
    info!("Rendered portfolio page {}", page.file_name);
    Ok((enhanced, features, page))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct EchoModel {
        prompts: Mutex<Vec<String>>,
        fail: bool,
    }

    impl EchoModel {
        fn new(fail: bool) -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
                fail,
            }
        }
    }

    #[async_trait]
    impl GenerativeModel for EchoModel {
        fn model_name(&self) -> &str {
            "echo"
        }

        async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            if self.fail {
                return Err(LlmError::EmptyContent);
            }
            Ok(format!("reply #{}", self.prompts.lock().unwrap().len()))
        }
    }

    #[tokio::test]
    async fn test_analysis_sends_one_prompt_for_the_mode() {
        let model = EchoModel::new(false);
        let reply = analyze_resume(&model, "jd", "cv", &AnalysisMode::MissingKeywords)
            .await
            .unwrap();
        assert_eq!(reply, "reply #1");
        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("missing keywords"));
    }

    #[tokio::test]
    async fn test_model_failure_surfaces_as_llm_error() {
        let model = EchoModel::new(true);
        let err = plan_career_path(&model, "jd", "cv", 3).await.unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));
    }

    #[tokio::test]
    async fn test_portfolio_makes_two_calls_and_renders_page() {
        let model = EchoModel::new(false);
        let details = ProjectDetails {
            name: "Ledger".to_string(),
            technologies: "Rust".to_string(),
            ..Default::default()
        };
        let (enhanced, features, page) =
            build_portfolio(&model, "jd", "double-entry ledger", "cv", &details)
                .await
                .unwrap();

        assert_eq!(enhanced, "reply #1");
        assert_eq!(features, "reply #2");
        assert_eq!(page.file_name, "ledger_portfolio.html");
        assert!(page.html.contains("<p>reply #1</p>"));
        assert!(page.html.contains("<li>reply #2</li>"));
    }
}
