// All LLM prompt templates for the single-candidate analysis flows.
// Each builder is a pure function of its inputs; exactly one template is used per action.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::template::render;

/// Wraps any instruction with the job description and resume text.
/// Replace: {instruction}, {job_description}, {resume_text}
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"{instruction}

JOB DESCRIPTION:
{job_description}

RESUME:
{resume_text}"#;

pub const OVERVIEW_INSTRUCTION: &str = "You are an experienced Technical Human Resource Manager. \
    Your task is to review the provided resume against the job description. \
    Please share your professional evaluation on whether the candidate's profile aligns with the role. \
    Highlight the strengths and weaknesses of the applicant in relation to the specified job requirements.";

pub const IMPROVE_SKILLS_INSTRUCTION: &str = "You are a Technical Human Resource Manager with expertise in data science. \
    Your role is to scrutinize the resume in light of the job description provided. \
    Share your insights on the candidate's suitability for the role from an HR perspective. \
    Additionally, offer advice on enhancing the candidate's skills and identify areas where improvement is needed.";

pub const MISSING_KEYWORDS_INSTRUCTION: &str = "You are a skilled ATS (Applicant Tracking System) scanner \
    with a deep understanding of data science and ATS functionality. \
    Your task is to evaluate the resume against the provided job description. \
    Assess the compatibility of the resume with the role. \
    Provide the missing keywords and recommendations for enhancing the candidate's skills, \
    and identify areas for improvement.";

pub const PERCENTAGE_MATCH_INSTRUCTION: &str = "You are a skilled ATS (Applicant Tracking System) scanner \
    with expertise in data science and ATS functionality. \
    Your task is to evaluate the resume against the provided job description. \
    Provide the percentage match between the resume and the job description. \
    First, display the percentage match, then list the missing keywords, and finally share your overall evaluation.";

pub const SKILL_GAP_INSTRUCTION: &str = r#"Analyze the gap between the candidate's current skills and the job requirements.
Provide a detailed analysis including:
1. Missing skills that are crucial for this role
2. Resources to learn these skills (free and paid)
3. Estimated time to acquire each skill
4. Priority order for learning
5. How to highlight transferable skills
6. Action plan for skill development"#;

/// Replace: {interview_type}
pub const INTERVIEW_PREP_INSTRUCTION: &str = r#"Generate comprehensive interview preparation for {interview_type} interviews based on the job description and resume.
Include:
1. 5 relevant interview questions
2. What the interviewer is looking for in each question
3. Sample answers
4. Key points to cover
5. Common mistakes to avoid
6. Follow-up questions to expect
7. Tips for answering effectively"#;

pub const PORTFOLIO_ENHANCE_INSTRUCTION: &str = r#"Enhance this project description to make it more impactful for the job application.
Include:
1. Business impact and value created
2. Technical challenges overcome
3. Key achievements and results
4. Skills demonstrated
5. Metrics and quantifiable outcomes
6. Team collaboration aspects
7. Learning outcomes
8. STAR format (Situation, Task, Action, Result)"#;

pub const PORTFOLIO_FEATURES_INSTRUCTION: &str = r#"List the best features and highlights of this project in bullet points.
Focus on:
1. Technical innovations
2. User experience improvements
3. Performance optimizations
4. Unique solutions
5. Scalability aspects"#;

pub const CAREER_PATH_INSTRUCTION: &str = r#"Create a comprehensive 5-year career development plan including:
1. Short-term goals (6 months)
2. Medium-term goals (1-2 years)
3. Long-term goals (3-5 years)
4. Required skills and certifications
5. Potential career transitions
6. Salary progression
7. Industry trends to watch
8. Networking opportunities
9. Professional development resources
10. Risk factors and mitigation strategies"#;

/// Resume review actions offered by the analysis endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisMode {
    Overview,
    ImproveSkills,
    MissingKeywords,
    PercentageMatch,
    /// Free-form question; the operator's text is the instruction.
    Query(String),
}

impl AnalysisMode {
    /// Parses the `mode` form field. `query` needs the accompanying question text.
    pub fn parse(mode: &str, query: Option<&str>) -> Result<Self, String> {
        match mode.trim().to_lowercase().as_str() {
            "overview" => Ok(Self::Overview),
            "improve_skills" => Ok(Self::ImproveSkills),
            "missing_keywords" => Ok(Self::MissingKeywords),
            "percentage_match" => Ok(Self::PercentageMatch),
            "query" => query
                .map(|q| Self::Query(q.to_string()))
                .ok_or_else(|| "'query' is required when mode is 'query'".to_string()),
            other => Err(format!(
                "Unknown mode '{other}'; expected overview, improve_skills, missing_keywords, percentage_match or query"
            )),
        }
    }

    pub fn instruction(&self) -> &str {
        match self {
            Self::Overview => OVERVIEW_INSTRUCTION,
            Self::ImproveSkills => IMPROVE_SKILLS_INSTRUCTION,
            Self::MissingKeywords => MISSING_KEYWORDS_INSTRUCTION,
            Self::PercentageMatch => PERCENTAGE_MATCH_INSTRUCTION,
            Self::Query(q) => q,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::ImproveSkills => "improve_skills",
            Self::MissingKeywords => "missing_keywords",
            Self::PercentageMatch => "percentage_match",
            Self::Query(_) => "query",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewType {
    Technical,
    Behavioral,
    SystemDesign,
    CaseStudy,
    #[default]
    AllTypes,
}

impl fmt::Display for InterviewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Technical => "Technical",
            Self::Behavioral => "Behavioral",
            Self::SystemDesign => "System Design",
            Self::CaseStudy => "Case Study",
            Self::AllTypes => "All Types",
        })
    }
}

impl FromStr for InterviewType {
    type Err = String;

    /// Accepts both `system_design` and `System Design` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c })
            .collect();
        match normalized.as_str() {
            "technical" => Ok(Self::Technical),
            "behavioral" => Ok(Self::Behavioral),
            "system_design" => Ok(Self::SystemDesign),
            "case_study" => Ok(Self::CaseStudy),
            "all_types" | "all" => Ok(Self::AllTypes),
            _ => Err(format!("Unknown interview type '{s}'")),
        }
    }
}

/// The Prompt Builder: instruction, job description and resume text in one prompt.
pub fn build_prompt(job_description: &str, resume_text: &str, instruction: &str) -> String {
    render(
        ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("instruction", instruction.trim()),
            ("job_description", job_description),
            ("resume_text", resume_text),
        ],
    )
}

pub fn build_analysis_prompt(job_description: &str, resume_text: &str, mode: &AnalysisMode) -> String {
    build_prompt(job_description, resume_text, mode.instruction())
}

pub fn build_skill_gap_prompt(job_description: &str, current_skills: &str, resume_text: &str) -> String {
    let candidate = format!("Current Skills: {current_skills}\nResume: {resume_text}");
    build_prompt(job_description, &candidate, SKILL_GAP_INSTRUCTION)
}

pub fn build_interview_prompt(
    job_description: &str,
    resume_text: &str,
    interview_type: InterviewType,
) -> String {
    let label = interview_type.to_string();
    let instruction = render(INTERVIEW_PREP_INSTRUCTION, &[("interview_type", label.as_str())]);
    build_prompt(job_description, resume_text, &instruction)
}

pub fn build_portfolio_prompts(
    job_description: &str,
    project_description: &str,
    resume_text: &str,
) -> (String, String) {
    let context = format!("Project: {project_description}\nResume: {resume_text}");
    (
        build_prompt(job_description, &context, PORTFOLIO_ENHANCE_INSTRUCTION),
        build_prompt(job_description, &context, PORTFOLIO_FEATURES_INSTRUCTION),
    )
}

pub fn build_career_path_prompt(job_description: &str, resume_text: &str, years_experience: u8) -> String {
    let context = format!("Resume: {resume_text}\nExperience: {years_experience} years");
    build_prompt(job_description, &context, CAREER_PATH_INSTRUCTION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prompt_layout() {
        let prompt = build_prompt("JD text", "Resume text", "  Evaluate.  ");
        assert_eq!(prompt, "Evaluate.\n\nJOB DESCRIPTION:\nJD text\n\nRESUME:\nResume text");
    }

    #[test]
    fn test_each_mode_selects_its_own_template() {
        let modes = [
            AnalysisMode::Overview,
            AnalysisMode::ImproveSkills,
            AnalysisMode::MissingKeywords,
            AnalysisMode::PercentageMatch,
        ];
        for (i, a) in modes.iter().enumerate() {
            for b in modes.iter().skip(i + 1) {
                assert_ne!(a.instruction(), b.instruction());
            }
        }
        assert!(build_analysis_prompt("jd", "cv", &AnalysisMode::PercentageMatch)
            .starts_with(PERCENTAGE_MATCH_INSTRUCTION));
    }

    #[test]
    fn test_query_mode_uses_operator_text() {
        let mode = AnalysisMode::parse("query", Some("Is this person senior?")).unwrap();
        assert!(build_analysis_prompt("jd", "cv", &mode).starts_with("Is this person senior?"));
    }

    #[test]
    fn test_query_mode_requires_text() {
        assert!(AnalysisMode::parse("query", None).is_err());
        assert!(AnalysisMode::parse("horoscope", None).is_err());
        assert_eq!(
            AnalysisMode::parse(" Missing_Keywords ", None).unwrap(),
            AnalysisMode::MissingKeywords
        );
    }

    #[test]
    fn test_interview_type_parsing_and_prompt() {
        assert_eq!("System Design".parse::<InterviewType>().unwrap(), InterviewType::SystemDesign);
        assert_eq!("case_study".parse::<InterviewType>().unwrap(), InterviewType::CaseStudy);
        assert!("pairing".parse::<InterviewType>().is_err());

        let prompt = build_interview_prompt("jd", "cv", InterviewType::Behavioral);
        assert!(prompt.contains("for Behavioral interviews"));
    }

    #[test]
    fn test_skill_gap_and_career_context() {
        let prompt = build_skill_gap_prompt("jd", "Rust, SQL", "cv");
        assert!(prompt.contains("RESUME:\nCurrent Skills: Rust, SQL\nResume: cv"));

        let prompt = build_career_path_prompt("jd", "cv", 4);
        assert!(prompt.contains("Experience: 4 years"));
    }

    #[test]
    fn test_portfolio_prompts_share_context() {
        let (enhance, features) = build_portfolio_prompts("jd", "A chat app", "cv");
        assert!(enhance.contains("STAR format"));
        assert!(features.contains("Scalability aspects"));
        assert!(enhance.contains("Project: A chat app"));
        assert!(features.contains("Project: A chat app"));
    }
}
