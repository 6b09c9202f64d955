//! Whole-resume fixtures driven through the rule-based extraction path.

use chrono::{Datelike, NaiveDate};

use nightingale::extract::{self, dates};
use nightingale::models::record::ExperienceType;
use nightingale::postprocess;
use nightingale::scoring;

fn fixed_now() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

const PH_RESUME: &str = "\
MARIA CLARA SANTOS, RN
123 Mabini Street, Quezon City, Philippines
maria.santos@example.com | +63 917 555 0000

PROFESSIONAL SUMMARY
Dedicated medical-surgical nurse with six years of bedside experience in
tertiary hospitals, focused on safe medication practice and patient education.

PROFESSIONAL EXPERIENCE
Staff Nurse June 2018 - Present
Makati Medical Center
\u{2022} Administered medications and IV therapy for a 40-bed ward
\u{2022} Precepted six newly hired nurses on charting standards

Staff Nurse \u{2013} Emergency Department
Quezon City General Hospital
July 2016 - May 2018
\u{2022} Performed triage for an average of 80 patients per shift

CLINICAL INTERNSHIP
Student Nurse June 2013 - March 2014
Philippine General Hospital

EDUCATIONAL BACKGROUND
Bachelor of Science in Nursing
University of Santo Tomas, Manila
2010 - 2014
Graduated: April 2014

LICENSES & CERTIFICATIONS
PRC License No. 0834921
IELTS overall band 7.5
BLS and ACLS provider

SEMINARS AND TRAININGS ATTENDED
March 15, 2018 \"Advanced Wound Care Workshop\"
May 3, 2019 \"Infection Control Updates\"

SKILLS
Triage, IV Therapy, Wound Care
Languages: English, Filipino
";

const US_RESUME: &str = "\
JANE DOE, RN, CCRN
Los Angeles, California

SUMMARY
Critical care nurse with a decade of ICU leadership in high-acuity settings,
credentialed in adult critical care and stroke response.

EXPERIENCE
Senior ICU Registered Nurse  Jan 2020 - Present
Pain Management
Cedars-Sinai Medical Center \u{2022} Los Angeles, California
\u{2022} Managed a 24-bed intensive care unit with full acuity mix
\u{2022} Led daily interdisciplinary rounds and family conferences

Travel Nurse (AMN Healthcare Services Inc.)
March 2017 to December 2019
\u{2022} Completed eight ICU contracts across four states

EDUCATION
Bachelor of Science in Nursing
University of California Los Angeles School of Nursing
Graduated: June 2012

CERTIFICATIONS
California RN License CA-RN-492817
CCRN #2291043
NIH Stroke Scale certified, TNCC, CEN
";

#[test]
fn test_philippine_resume_extraction() {
    let record = extract::extract_record_at(PH_RESUME, fixed_now());

    assert_eq!(
        record.address.as_deref(),
        Some("123 Mabini Street, Quezon City, Philippines")
    );
    let summary = record.summary.as_deref().unwrap();
    assert!(summary.starts_with("Dedicated medical-surgical nurse"));

    // Two employment entries; the clinical internship region is masked.
    assert_eq!(record.experience.len(), 2);
    let first = &record.experience[0];
    assert_eq!(first.position.as_deref(), Some("Staff Nurse"));
    assert_eq!(first.employer.as_deref(), Some("Makati Medical Center"));
    assert_eq!(first.start_date.as_deref(), Some("June 2018"));
    assert_eq!(first.end_date.as_deref(), Some("Present"));
    assert!(first.description.as_deref().unwrap().contains("IV therapy"));

    let second = &record.experience[1];
    assert_eq!(second.position.as_deref(), Some("Staff Nurse"));
    assert_eq!(second.department.as_deref(), Some("Emergency Department"));
    assert_eq!(
        second.employer.as_deref(),
        Some("Quezon City General Hospital")
    );

    // Seminar rows never became entries.
    assert!(!record
        .experience
        .iter()
        .any(|e| e.description.as_deref().unwrap_or("").contains("Wound Care Workshop")));

    let education = &record.education[0];
    assert_eq!(
        education.degree.as_deref(),
        Some("Bachelor of Science in Nursing")
    );
    assert_eq!(
        education.institution.as_deref(),
        Some("University of Santo Tomas")
    );
    assert_eq!(education.institution_location.as_deref(), Some("Manila"));
    assert_eq!(education.year, Some(2014));

    assert_eq!(record.graduation_year, Some(2014));

    let cert_kinds: Vec<&str> = record.certifications.iter().map(|c| c.kind.as_str()).collect();
    assert!(cert_kinds.contains(&"PRC License"));
    assert!(cert_kinds.contains(&"IELTS"));
    assert!(cert_kinds.contains(&"BLS"));
    assert!(cert_kinds.contains(&"ACLS"));
    let prc = record
        .certifications
        .iter()
        .find(|c| c.kind == "PRC License")
        .unwrap();
    assert_eq!(prc.number.as_deref(), Some("0834921"));

    assert!(record.skills.iter().any(|s| s == "Triage"));
    assert!(record.skills.iter().any(|s| s == "English"));

    // June 2018 → June 2025 is 84 months; July 2016 → May 2018 is 22.
    assert_eq!(record.years_of_experience, Some(8));

    assert!(record.hospitals.contains(&"Makati Medical Center".to_string()));
    assert!(record
        .hospitals
        .contains(&"Philippine General Hospital".to_string()));
}

#[test]
fn test_us_resume_extraction() {
    let record = extract::extract_record_at(US_RESUME, fixed_now());

    let first = &record.experience[0];
    assert_eq!(first.position.as_deref(), Some("Senior ICU Registered Nurse"));
    assert_eq!(first.department.as_deref(), Some("Pain Management"));
    assert_eq!(first.employer.as_deref(), Some("Cedars-Sinai Medical Center"));
    assert_eq!(first.location.as_deref(), Some("Los Angeles, California"));
    assert_eq!(first.end_date.as_deref(), Some("Present"));

    let second = &record.experience[1];
    assert_eq!(second.position.as_deref(), Some("Travel Nurse"));
    assert_eq!(
        second.employer.as_deref(),
        Some("AMN Healthcare Services Inc.")
    );
    assert_eq!(second.start_date.as_deref(), Some("March 2017"));
    assert_eq!(second.end_date.as_deref(), Some("December 2019"));

    let rn = record
        .certifications
        .iter()
        .find(|c| c.kind == "RN License")
        .unwrap();
    assert_eq!(rn.number.as_deref(), Some("CA-RN-492817"));
    let ccrn = record
        .certifications
        .iter()
        .find(|c| c.kind == "CCRN")
        .unwrap();
    assert_eq!(ccrn.number.as_deref(), Some("2291043"));
    let kinds: Vec<&str> = record.certifications.iter().map(|c| c.kind.as_str()).collect();
    assert!(kinds.contains(&"NIH Stroke Scale"));
    assert!(kinds.contains(&"TNCC"));
    assert!(kinds.contains(&"CEN"));

    assert!(record
        .hospitals
        .contains(&"Cedars-Sinai Medical Center".to_string()));
}

#[test]
fn test_rule_score_is_confident_for_clean_resumes() {
    let record = extract::extract_record_at(PH_RESUME, fixed_now());
    assert!(scoring::score(&record, Some(PH_RESUME)) >= 55);
    let record = extract::extract_record_at(US_RESUME, fixed_now());
    assert!(scoring::score(&record, Some(US_RESUME)) >= 55);
}

#[test]
fn test_postprocessing_upholds_description_invariants() {
    let mut record = extract::extract_record_at(US_RESUME, fixed_now());
    postprocess::run(&mut record, US_RESUME);

    for entry in &record.experience {
        let Some(employer) = entry.employer.as_deref() else {
            continue;
        };
        let Some(description) = entry.description.as_deref() else {
            continue;
        };
        for bullet in description.lines() {
            let text = bullet.trim_start_matches('\u{2022}').trim();
            assert!(
                !(text.len() < 120 && text.to_lowercase().contains(&employer.to_lowercase())),
                "description bullet echoes employer: {text}"
            );
        }
    }
}

#[test]
fn test_no_case_insensitive_duplicates_in_lists() {
    for text in [PH_RESUME, US_RESUME] {
        let record = extract::extract_record_at(text, fixed_now());
        for list in [&record.skills, &record.hospitals] {
            let mut lowered: Vec<String> = list.iter().map(|s| s.to_lowercase()).collect();
            lowered.sort();
            let before = lowered.len();
            lowered.dedup();
            assert_eq!(before, lowered.len());
        }
        let mut kinds: Vec<String> = record
            .certifications
            .iter()
            .map(|c| c.kind.to_lowercase())
            .collect();
        kinds.sort();
        let before = kinds.len();
        kinds.dedup();
        assert_eq!(before, kinds.len());
    }
}

#[test]
fn test_every_entry_has_start_date_and_ordered_range() {
    for text in [PH_RESUME, US_RESUME] {
        let record = extract::extract_record_at(text, fixed_now());
        assert!(!record.experience.is_empty());
        for entry in &record.experience {
            let start = entry.start_date.as_deref().expect("entry without start date");
            let end = entry.end_date.as_deref().expect("range grammar always has an end");
            if dates::is_present(end) {
                continue;
            }
            let start = dates::parse_flexible_date(start).unwrap();
            let end = dates::parse_flexible_date(end).unwrap();
            assert!(end >= start, "end before start");
        }
    }
}

#[test]
fn test_experience_type_inference_from_sections() {
    let text = "\
WORK EXPERIENCE
Staff Nurse Jan 2020 - Present
Makati Medical Center

VOLUNTEER EXPERIENCE
Relief Nurse June 2019 - August 2019
Philippine Red Cross
";
    let mut record = extract::extract_record_at(text, fixed_now());
    postprocess::run(&mut record, text);

    let staff = record
        .experience
        .iter()
        .find(|e| e.employer.as_deref() == Some("Makati Medical Center"))
        .unwrap();
    assert_eq!(staff.kind, ExperienceType::Employment);

    let relief = record
        .experience
        .iter()
        .find(|e| e.employer.as_deref() == Some("Philippine Red Cross"))
        .unwrap();
    assert_eq!(relief.kind, ExperienceType::Volunteer);
}

#[test]
fn test_education_year_band_invariant() {
    for text in [PH_RESUME, US_RESUME] {
        let record = extract::extract_record_at(text, fixed_now());
        for entry in &record.education {
            if let Some(year) = entry.year {
                assert!((1960..=fixed_now().year() + 6).contains(&year));
            }
        }
    }
}
