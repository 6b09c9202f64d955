//! Curated lexicons driving the heuristic extractors.
//!
//! These tables are contract, not implementation detail: regressions in
//! them are regressions in behaviour. Matching is case-insensitive against
//! the canonical display form given here; display casing is preserved on
//! output.

/// Known healthcare facilities, Philippine systems first, then major US
/// systems. Employer candidates that hit this set get the strongest score
/// boost, and hospital mentions are canonicalised to these spellings.
pub const KNOWN_FACILITIES: &[&str] = &[
    // Philippines
    "Philippine General Hospital",
    "St. Luke's Medical Center",
    "Makati Medical Center",
    "The Medical City",
    "Asian Hospital and Medical Center",
    "Cardinal Santos Medical Center",
    "Manila Doctors Hospital",
    "Chinese General Hospital",
    "University of Santo Tomas Hospital",
    "Quezon City General Hospital",
    "Jose R. Reyes Memorial Medical Center",
    "East Avenue Medical Center",
    "Lung Center of the Philippines",
    "National Kidney and Transplant Institute",
    "Philippine Heart Center",
    "Philippine Children's Medical Center",
    "Veterans Memorial Medical Center",
    "Rizal Medical Center",
    "Ospital ng Maynila Medical Center",
    "San Lazaro Hospital",
    "Vicente Sotto Memorial Medical Center",
    "Cebu Doctors' University Hospital",
    "Chong Hua Hospital",
    "Southern Philippines Medical Center",
    "Davao Doctors Hospital",
    "Baguio General Hospital and Medical Center",
    "Batangas Medical Center",
    "Bicol Medical Center",
    "Western Visayas Medical Center",
    "Amang Rodriguez Memorial Medical Center",
    "Dr. Jose Fabella Memorial Hospital",
    "Las Piñas General Hospital",
    "Pasig City General Hospital",
    "Taguig-Pateros District Hospital",
    "Mary Mediatrix Medical Center",
    // United States
    "Cedars-Sinai Medical Center",
    "Mayo Clinic",
    "Cleveland Clinic",
    "Johns Hopkins Hospital",
    "Massachusetts General Hospital",
    "NewYork-Presbyterian Hospital",
    "Mount Sinai Hospital",
    "NYU Langone Health",
    "UCLA Medical Center",
    "UCSF Medical Center",
    "Houston Methodist Hospital",
    "Texas Medical Center",
    "Kaiser Permanente",
    "HCA Healthcare",
    "Ascension Health",
    "AdventHealth Orlando",
    "Northwestern Memorial Hospital",
    "Stanford Health Care",
    "Duke University Hospital",
    "Barnes-Jewish Hospital",
];

/// Curated nursing skills matched by case-insensitive substring (DOC
/// extractors sometimes strip inter-word spaces, so word boundaries are
/// not assumed).
pub const NURSING_SKILLS: &[&str] = &[
    "Patient Care",
    "Patient Assessment",
    "Patient Education",
    "Patient Advocacy",
    "Patient Safety",
    "Vital Signs Monitoring",
    "Medication Administration",
    "IV Therapy",
    "IV Insertion",
    "Phlebotomy",
    "Venipuncture",
    "Wound Care",
    "Wound Dressing",
    "Catheterization",
    "Foley Catheter Insertion",
    "Nasogastric Tube Insertion",
    "Tracheostomy Care",
    "Ostomy Care",
    "Suctioning",
    "Oxygen Therapy",
    "Nebulization",
    "Cardiac Monitoring",
    "Telemetry",
    "ECG Interpretation",
    "EKG",
    "Defibrillation",
    "CPR",
    "Basic Life Support",
    "Advanced Cardiac Life Support",
    "First Aid",
    "Triage",
    "Emergency Response",
    "Critical Care",
    "Intensive Care",
    "Post-Anesthesia Care",
    "Perioperative Nursing",
    "Operating Room Assistance",
    "Surgical Asepsis",
    "Sterile Technique",
    "Infection Control",
    "Isolation Precautions",
    "Hand Hygiene Compliance",
    "Blood Transfusion",
    "Chemotherapy Administration",
    "Pain Management",
    "Palliative Care",
    "Hospice Care",
    "Geriatric Care",
    "Pediatric Care",
    "Neonatal Care",
    "Maternal and Child Health",
    "Labor and Delivery",
    "Postpartum Care",
    "Newborn Screening",
    "Immunization",
    "Health Teaching",
    "Health Promotion",
    "Community Health Nursing",
    "Home Health Care",
    "Case Management",
    "Care Planning",
    "Nursing Documentation",
    "Charting",
    "Electronic Medical Records",
    "Epic",
    "Cerner",
    "Meditech",
    "HIPAA Compliance",
    "Quality Improvement",
    "Discharge Planning",
    "Glucose Monitoring",
    "Insulin Administration",
    "Enteral Feeding",
    "Specimen Collection",
    "Restraint Management",
    "Fall Prevention",
];

/// Occupational nouns whose presence marks a line as a plausible position
/// title.
pub const POSITION_KEYWORDS: &[&str] = &[
    "Nurse",
    "RN",
    "LPN",
    "LVN",
    "Nursing Aide",
    "Nursing Assistant",
    "Caregiver",
    "Midwife",
    "Volunteer",
    "Intern",
    "Trainee",
    "Preceptor",
    "Manager",
    "Director",
    "Supervisor",
    "Coordinator",
    "Administrator",
    "Officer",
    "Specialist",
    "Consultant",
    "Practitioner",
    "Clinician",
    "Therapist",
    "Technician",
    "Technologist",
    "Engineer",
    "Analyst",
    "Assistant",
    "Associate",
    "Clerk",
    "Staff",
    "Lead",
    "Head",
    "Charge",
    "Instructor",
    "Educator",
    "Representative",
    "Agent",
];

/// Organisation-shaped tokens. Lines carrying one of these read as a
/// company/facility rather than a person's title.
pub const COMPANY_KEYWORDS: &[&str] = &[
    "Hospital",
    "Medical Center",
    "Medical Centre",
    "Health Center",
    "Healthcare",
    "Health System",
    "Health Services",
    "Clinic",
    "Infirmary",
    "Sanitarium",
    "Nursing Home",
    "Home Care",
    "Hospice",
    "Laboratory",
    "Pharmaceutical",
    "Inc",
    "Inc.",
    "LLC",
    "Ltd",
    "Ltd.",
    "Corp",
    "Corp.",
    "Corporation",
    "Company",
    "Co.",
    "Group",
    "Agency",
    "Foundation",
    "Institute",
    "University",
    "College",
    "Department of Health",
    "City Health Office",
    "Red Cross",
];

/// Regional keywords accepted as evidence that a line is an address or a
/// `City, Region` location. Philippine entries first, then US.
pub const REGION_KEYWORDS: &[&str] = &[
    "Philippines",
    "Metro Manila",
    "Manila",
    "Quezon City",
    "Makati",
    "Pasig",
    "Taguig",
    "Mandaluyong",
    "Parañaque",
    "Las Piñas",
    "Muntinlupa",
    "Caloocan",
    "Pasay",
    "Marikina",
    "Valenzuela",
    "Antipolo",
    "Cavite",
    "Laguna",
    "Batangas",
    "Bulacan",
    "Pampanga",
    "Rizal",
    "Cebu",
    "Davao",
    "Iloilo",
    "Bacolod",
    "Baguio",
    "Cagayan de Oro",
    "Zamboanga",
    "NCR",
    "Luzon",
    "Visayas",
    "Mindanao",
    "USA",
    "United States",
    "California",
    "Texas",
    "New York",
    "Florida",
    "Illinois",
    "Arizona",
    "Nevada",
    "Washington",
    "Oregon",
    "New Jersey",
    "Massachusetts",
    "Maryland",
    "Virginia",
    "Georgia",
    "Ohio",
    "Michigan",
    "Pennsylvania",
    "Hawaii",
    "Guam",
];

/// Returns the canonical facility name when `text` contains one,
/// case-insensitively. First table hit wins.
pub fn match_known_facility(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    KNOWN_FACILITIES
        .iter()
        .find(|f| lower.contains(&f.to_lowercase()))
        .copied()
}

pub fn contains_position_keyword(text: &str) -> bool {
    let lower = text.to_lowercase();
    POSITION_KEYWORDS.iter().any(|kw| {
        let kw_lower = kw.to_lowercase();
        // Short abbreviations need word boundaries; "RN" must not fire on
        // "internship".
        if kw.len() <= 3 {
            lower
                .split(|c: char| !c.is_alphanumeric())
                .any(|tok| tok == kw_lower)
        } else {
            lower.contains(&kw_lower)
        }
    })
}

pub fn contains_company_keyword(text: &str) -> bool {
    let lower = text.to_lowercase();
    COMPANY_KEYWORDS.iter().any(|kw| {
        let kw_lower = kw.to_lowercase();
        if kw.len() <= 5 {
            let kw_trim = kw_lower.trim_end_matches('.');
            lower
                .split(|c: char| !c.is_alphanumeric() && c != '.')
                .any(|tok| tok.trim_end_matches('.') == kw_trim)
        } else {
            lower.contains(&kw_lower)
        }
    })
}

pub fn contains_region_keyword(text: &str) -> bool {
    let lower = text.to_lowercase();
    REGION_KEYWORDS
        .iter()
        .any(|kw| lower.contains(&kw.to_lowercase()))
}
