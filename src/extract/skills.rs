//! Skill extraction: curated nursing set, SKILLS-section line splitting,
//! and a small global scan for technical skills.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::extract::sections::{find_section_lines, is_all_caps_header, HEADER_MIN_LEN};
use crate::lexicons::NURSING_SKILLS;

static SKILLS_HEADERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^\s*TECHNICAL\s+SKILLS",
        r"^\s*PROFESSIONAL\s+SKILLS",
        r"^\s*CLINICAL\s+SKILLS",
        r"^\s*KEY\s+SKILLS",
        r"^\s*SKILLS",
        r"^\s*CORE\s+COMPETENCIES",
        r"^\s*COMPETENCIES",
        r"^\s*EXPERTISE",
        r"^\s*PROFICIENCIES",
        r"^\s*TECHNOLOGIES",
    ]
    .iter()
    .map(|p| Regex::new(&format!(r"(?i){p}")).expect("invalid skills header regex"))
    .collect()
});

/// Technical skills worth catching outside any section.
static TECH_SKILLS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)\bMicrosoft Office\b", "Microsoft Office"),
        (r"(?i)\bMS Excel\b|\bMicrosoft Excel\b", "Microsoft Excel"),
        (r"(?i)\bMS Word\b|\bMicrosoft Word\b", "Microsoft Word"),
        (r"(?i)\bPowerPoint\b", "PowerPoint"),
        (r"(?i)\bGoogle Workspace\b", "Google Workspace"),
        (r"\bSQL\b", "SQL"),
        (r"\bPython\b", "Python"),
        (r"(?i)\bJavaScript\b", "JavaScript"),
        (r"(?i)\bTelehealth\b", "Telehealth"),
        (r"(?i)\bData Entry\b", "Data Entry"),
    ]
    .iter()
    .map(|(p, name)| (Regex::new(p).expect("invalid tech skill regex"), *name))
    .collect()
});

const MAX_SECTION_SKILL_TOKENS: usize = 6;

fn push_unique(out: &mut Vec<String>, seen: &mut HashSet<String>, skill: &str) {
    let trimmed = skill.trim().trim_matches(|c| c == '.' || c == ';');
    if trimmed.len() < 2 {
        return;
    }
    if seen.insert(trimmed.to_lowercase()) {
        out.push(trimmed.to_string());
    }
}

/// Ordered, case-insensitively de-duplicated skill list. First-seen casing
/// is preserved: curated entries surface with lexicon casing, section
/// entries as written in the resume.
pub fn extract_skills(text: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let lower = text.to_lowercase();

    // Pass 1: curated nursing set. Substring membership, not word
    // boundaries: DOC extractors sometimes strip inter-word spaces.
    for skill in NURSING_SKILLS {
        if lower.contains(&skill.to_lowercase()) {
            push_unique(&mut out, &mut seen, skill);
        }
    }

    // Pass 2: SKILLS-like section, split on list separators.
    let header_refs: Vec<&Regex> = SKILLS_HEADERS.iter().collect();
    if let Some(body) = find_section_lines(text, &header_refs, HEADER_MIN_LEN) {
        for line in body {
            let trimmed = line.trim();
            if trimmed.is_empty() || is_all_caps_header(trimmed, HEADER_MIN_LEN) {
                continue;
            }
            // `Label: v1, v2` keeps only the value side.
            let value_side = match trimmed.split_once(':') {
                Some((_, values)) if !values.trim().is_empty() => values,
                _ => trimmed,
            };
            for piece in value_side.split(|c| c == ',' || c == ';' || c == '|') {
                let piece = piece
                    .trim()
                    .trim_start_matches(['\u{2022}', '-', '*'])
                    .trim();
                if piece.is_empty() {
                    continue;
                }
                if piece.split_whitespace().count() > MAX_SECTION_SKILL_TOKENS {
                    continue;
                }
                push_unique(&mut out, &mut seen, piece);
            }
        }
    }

    // Pass 3: global technical-skill scan.
    for (re, name) in TECH_SKILLS.iter() {
        if re.is_match(text) {
            push_unique(&mut out, &mut seen, name);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curated_skills_found_anywhere() {
        let text = "Administered IV therapy and wound care on a surgical ward.";
        let skills = extract_skills(text);
        assert!(skills.contains(&"IV Therapy".to_string()));
        assert!(skills.contains(&"Wound Care".to_string()));
    }

    #[test]
    fn test_concatenated_words_still_match() {
        // DOC extraction pathology: stripped inter-word spaces
        let text = "proficient inIV Therapyand medication administration";
        let skills = extract_skills(text);
        assert!(skills.contains(&"IV Therapy".to_string()));
        assert!(skills.contains(&"Medication Administration".to_string()));
    }

    #[test]
    fn test_section_lines_split_on_separators() {
        let text = "SKILLS\nTriage; Telemetry | Health Teaching\nLanguages: English, Filipino";
        let skills = extract_skills(text);
        assert!(skills.contains(&"English".to_string()));
        assert!(skills.contains(&"Filipino".to_string()));
        assert!(skills.contains(&"Triage".to_string()));
        assert!(skills.contains(&"Telemetry".to_string()));
    }

    #[test]
    fn test_section_discards_long_prose_lines() {
        let text = "CORE COMPETENCIES\nThis line is a full sentence about how great the candidate is at nursing";
        let skills = extract_skills(text);
        assert!(skills.is_empty());
    }

    #[test]
    fn test_dedup_preserves_first_seen_casing() {
        let text = "SKILLS\ntriage, TRIAGE, Triage";
        let skills = extract_skills(text);
        let triage: Vec<&String> = skills
            .iter()
            .filter(|s| s.eq_ignore_ascii_case("triage"))
            .collect();
        assert_eq!(triage.len(), 1);
        // curated pass saw "Triage" first (lexicon casing)
        assert_eq!(triage[0], "Triage");
    }

    #[test]
    fn test_tech_skill_global_scan() {
        let text = "Comfortable with Microsoft Office and basic SQL queries.";
        let skills = extract_skills(text);
        assert!(skills.contains(&"Microsoft Office".to_string()));
        assert!(skills.contains(&"SQL".to_string()));
    }

    #[test]
    fn test_sql_requires_uppercase() {
        let skills = extract_skills("wrote sequels to the report");
        assert!(!skills.contains(&"SQL".to_string()));
    }
}
