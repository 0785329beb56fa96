// Prompt constants for resume optimization.
// Reuses the cross-cutting JSON instruction from llm_client::prompts.

/// Optimization prompt template.
/// Replace: {name}, {email}, {phone}, {summary}, {experience}, {education},
///          {skills}, {job_block}, {json_instruction}
pub const OPTIMIZE_PROMPT_TEMPLATE: &str = r#"You are an expert resume writer. Optimize this resume to be ATS-friendly and impactful.

RESUME DATA:
Name: {name}
Email: {email}
Phone: {phone}
Summary: {summary}
Experience: {experience}
Education: {education}
Skills: {skills}

{job_block}

{json_instruction}
{
  "summary": "2-3 sentence optimized professional summary",
  "experience": ["bullet point 1", "bullet point 2", "bullet point 3"],
  "skills": ["skill1", "skill2", "skill3"],
  "atsScore": 85,
  "improvements": ["improvement 1", "improvement 2"]
}"#;

/// Tailoring block, only included when a job description was supplied.
/// Replace: {job_description}
pub const JOB_TAILORING_TEMPLATE: &str = "TARGET JOB DESCRIPTION:
{job_description}

Customize the resume to match this job.";
