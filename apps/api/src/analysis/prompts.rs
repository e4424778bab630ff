// Prompt constants for resume analysis.

/// Role line for the analysis system prompt.
pub const RESUME_ANALYSIS_ROLE: &str =
    "You are an expert resume analyzer and career counselor. \
    Provide detailed, accurate analysis in the requested JSON format.";

pub const RESUME_ANALYSIS_TEMPERATURE: f32 = 0.3;
pub const RESUME_ANALYSIS_MAX_TOKENS: u32 = 2000;

/// Resume analysis prompt. Replace `{resume_text}` before sending.
pub const RESUME_ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze the following resume and return a comprehensive analysis.

Resume Text:
{resume_text}

Return a JSON object with this EXACT schema:
{
  "technicalSkills": [
    {
      "name": "skill name",
      "category": "Frontend|Backend|Database|DevOps|AI/ML|Mobile|Design|Other",
      "proficiency": "Beginner|Intermediate|Advanced|Expert",
      "yearsOfExperience": 0
    }
  ],
  "softSkills": ["skill"],
  "experience": {
    "totalYears": 0,
    "level": "Entry|Mid|Senior|Lead|Executive",
    "roles": ["role"],
    "companies": ["company"]
  },
  "education": [
    {"degree": "degree name", "institution": "institution name", "year": "year", "field": "field of study"}
  ],
  "jobRoles": ["role"],
  "overallScore": 0,
  "atsScore": 0,
  "suggestions": ["suggestion"],
  "strengths": ["strength"],
  "weaknesses": ["weakness"],
  "keywordDensity": {"keyword": 0}
}

Rules:
- overallScore and atsScore are integers from 0 to 100.
- Extract every technical and soft skill that the text supports; do not invent skills.
- Compute years of experience from dates and stated tenure.
- Suggestions must be concrete, actionable improvements, including ATS optimization.
"#;

pub fn build_resume_analysis_prompt(resume_text: &str) -> String {
    RESUME_ANALYSIS_PROMPT_TEMPLATE.replace("{resume_text}", resume_text)
}
