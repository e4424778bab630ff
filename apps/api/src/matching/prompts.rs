// Prompt constants for job-description matching.

pub const JOB_MATCH_ROLE: &str = "You are an expert recruiter and job matching specialist. \
    Provide accurate, detailed job-resume matching analysis.";

pub const JOB_MATCH_TEMPERATURE: f32 = 0.2;
pub const JOB_MATCH_MAX_TOKENS: u32 = 1500;

/// Replace `{resume_analysis}` and `{job_description}` before sending.
pub const JOB_MATCH_PROMPT_TEMPLATE: &str = r#"Compare this resume with the job description and provide a detailed match analysis.

Resume Analysis:
{resume_analysis}

Job Description:
{job_description}

Return a JSON object with this EXACT schema:
{
  "matchScore": 0,
  "strengths": ["strength"],
  "weaknesses": ["weakness"],
  "missingSkills": [
    {"skill": "skill name", "category": "category", "importance": "Low|Medium|High"}
  ],
  "matchedSkills": [
    {"skill": "skill name", "category": "category", "proficiency": "Beginner|Intermediate|Advanced|Expert"}
  ],
  "recommendations": ["recommendation"],
  "experienceMatch": {"required": 0, "candidate": 0, "score": 0}
}

Focus on:
1. Precise skill matching
2. Experience level alignment
3. Identifying critical gaps
4. Actionable improvement recommendations
5. A realistic match percentage (integer 0-100)
"#;

pub fn build_job_match_prompt(resume_analysis_json: &str, job_description: &str) -> String {
    JOB_MATCH_PROMPT_TEMPLATE
        .replace("{resume_analysis}", resume_analysis_json)
        .replace("{job_description}", job_description)
}
