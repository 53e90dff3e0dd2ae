// LLM prompt template for bulk screening.
// The reply is parsed by `screening::normalizer`; keep the key names in sync.

use crate::template::render;

/// Screening evaluation prompt. Replace: {query}, {job_description}, {resume_text}
pub const SCREENING_PROMPT_TEMPLATE: &str = r#"You are an expert recruiter. Evaluate the resume based solely on the following query:
"{query}"

Ignore all other details.

Given the job description:
{job_description}

And the resume content:
{resume_text}

Based on the above, please:
- Calculate the ATS match score as a numeric percentage (0 to 100).
- Determine if the resume meets the criteria (return "Yes" if it does, otherwise "No").
- Identify the candidate's College.
- Extract the candidate's CGPA.
- List any Certifications.
- Provide the candidate's Email.

Return your answer strictly in JSON format with only these keys:
- "Match": "Yes" or "No"
- "ATS Score": (numeric percentage or "N/A")
- "College": (the name of the college or "N/A")
- "CGPA": (numeric value or "N/A")
- "Certifications": (a list of certifications or "N/A")
- "Candidate Email": (the candidate's email or "N/A")

Ensure the JSON is valid."#;

pub fn build_screening_prompt(query: &str, job_description: &str, resume_text: &str) -> String {
    render(
        SCREENING_PROMPT_TEMPLATE,
        &[
            ("query", query),
            ("job_description", job_description),
            ("resume_text", resume_text),
        ],
    )
}
