// All LLM prompt constants for résumé tailoring and ATS scoring.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for résumé rewriting. Output is plain text, one résumé line
/// per output line, so it can be mapped back onto the original paragraphs.
pub const TAILOR_SYSTEM: &str = "You are an expert resume writer and ATS optimization specialist. \
    Your task is to rewrite and tailor resumes to match specific job descriptions \
    while maintaining the original format and style.\n\
    \n\
    Guidelines:\n\
    1. Analyze the job description to identify key skills, requirements, and keywords\n\
    2. Rewrite resume content to highlight relevant experience and skills\n\
    3. Use job-specific keywords naturally throughout the resume\n\
    4. Keep the original structure: same sections, same order, one output line per resume line\n\
    5. Make the resume ATS-friendly with proper keyword density\n\
    \n\
    Return only the tailored resume text without any additional commentary.";

/// Tailoring prompt. Replace `{job_description}` and `{resume_text}` before sending.
pub const TAILOR_PROMPT_TEMPLATE: &str = r#"Please tailor this resume for the following job description:

JOB DESCRIPTION:
{job_description}

ORIGINAL RESUME:
{resume_text}

{truthfulness}

Please rewrite the resume to better match the job requirements while keeping the same structure and format."#;

/// System prompt for ATS analysis. Replace `{json_only}` before sending.
pub const ATS_SYSTEM_TEMPLATE: &str = r#"You are an ATS (Applicant Tracking System) analysis expert. Your task is to analyze resumes against job descriptions and provide detailed scoring and improvement suggestions.

Analyze based on:
1. Keyword matching and density
2. Skills alignment
3. Experience relevance
4. Format compatibility
5. Section organization
6. Achievement quantification

Provide your response in the following JSON format:
{
    "score": 85,
    "suggestions": ["Add more specific technical skills", "Include quantified achievements"],
    "keyword_matches": ["Python", "Data Analysis", "Machine Learning"],
    "missing_keywords": ["AWS", "Docker", "Kubernetes"]
}

{json_only}"#;

/// ATS prompt. Replace `{job_description}` and `{resume_text}` before sending.
pub const ATS_PROMPT_TEMPLATE: &str = r#"Analyze this resume against the job description and provide ATS scoring:

JOB DESCRIPTION:
{job_description}

RESUME:
{resume_text}

Please provide a detailed ATS analysis including score (0-100), specific suggestions for improvement, matched keywords, and missing important keywords. Return only valid JSON."#;
