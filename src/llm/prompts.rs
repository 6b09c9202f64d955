//! Prompt constants for the resume extraction call.

/// System prompt — enforces JSON-only output.
pub const RESUME_EXTRACT_SYSTEM: &str =
    "You are an expert resume parser for nursing and healthcare resumes, \
    covering Philippine and US formats. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Extraction prompt template. Replace `{resume_text}` before sending.
pub const RESUME_EXTRACT_PROMPT_TEMPLATE: &str = r#"Extract structured information from the resume text below.

Return a JSON object with this EXACT schema (omit fields you cannot find; no extra fields):
{
  "summary": "professional summary or objective text",
  "address": "candidate address line",
  "graduation_year": 2016,
  "years_of_experience": 5,
  "salary": "PHP 50,000",
  "hospitals": ["St. Luke's Medical Center"],
  "skills": ["IV Therapy", "Triage"],
  "certifications": [
    {"type": "NCLEX", "number": "RN1234567"},
    {"type": "IELTS", "score": "7.5"}
  ],
  "experience": [
    {
      "employer": "Cedars-Sinai Medical Center",
      "position": "Senior ICU Registered Nurse",
      "type": "employment",
      "department": "Pain Management",
      "start_date": "Jan 2020",
      "end_date": "Present",
      "description": "• Managed a 24-bed intensive care unit",
      "location": "Los Angeles, California"
    }
  ],
  "education": [
    {
      "institution": "University of the Philippines",
      "degree": "Bachelor of Science in Nursing",
      "field_of_study": "Nursing",
      "year": 2016,
      "institution_location": "Manila",
      "status": "Graduated"
    }
  ]
}

Rules:
1. Some extractors strip spaces between words ("StaffNurse atMakati"). Repair the spacing before extracting.
2. Dates must be "Month Year" (e.g. "Jan 2020") or "Present".
3. Each description line must start with "• " and lines are joined with newlines.
4. Keep the department separate from the employer: "Staff Nurse - Medical Oncology" is position "Staff Nurse", department "Medical Oncology".
5. Include clinical placements, OJT, internships, and volunteer experience as experience entries with "type" set to "clinical_placement", "ojt", or "volunteer". Paid roles are "employment".
6. Include ALL education levels present, not only the highest.
7. Extract US state RN license numbers such as "CA-RN-492817" as a certification of type "RN License".
8. Split "Facility | City, State" lines into "employer" and "location".

RESUME TEXT:
{resume_text}"#;
