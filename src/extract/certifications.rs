//! License and certification extraction.
//!
//! Each canonical credential is emitted at most once. Numbers and scores
//! are captured only from contexts anchored to the credential mention —
//! never from a global digit scan, which on a resume full of years and
//! phone numbers would be noise.

use regex::Regex;
use std::sync::LazyLock;

use crate::models::record::Certification;

struct CredentialRule {
    kind: &'static str,
    detect: &'static LazyLock<Regex>,
    number: Option<&'static LazyLock<Regex>>,
    score: Option<&'static LazyLock<Regex>>,
}

macro_rules! credential_regex {
    ($name:ident, $pattern:expr) => {
        static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($pattern).expect("invalid credential regex"));
    };
}

// Short acronyms stay case-sensitive: `(?i)cen` would fire on "center",
// `(?i)nle` on "unless".
credential_regex!(DETECT_NCLEX, r"\bNCLEX(?:-RN)?\b");
credential_regex!(NUMBER_NCLEX, r"NCLEX-RN[\s:,\u{2013}-]*(?:Licen[sc]e\s*(?:No\.?|Number|#)?[\s:#]*)?([A-Z]{0,3}\d{5,10})\b");
credential_regex!(DETECT_IELTS, r"\bIELTS\b");
credential_regex!(SCORE_IELTS, r"IELTS[^\n]{0,40}?(\d\.\d|\d)\b");
credential_regex!(DETECT_PRC, r"\bPRC\b");
credential_regex!(NUMBER_PRC, r"PRC[^\n]{0,40}?(?:No\.?|Number|#|Registration|Licen[sc]e)[\s:#.]*(\d{5,8})\b");
credential_regex!(DETECT_BLS, r"\bBLS\b|(?i)Basic Life Support");
credential_regex!(DETECT_ACLS, r"\bACLS\b|(?i)Advanced Cardiac Life Support");
credential_regex!(DETECT_OSCE, r"\bOSCE\b");
credential_regex!(DETECT_NLE, r"\bNLE\b|(?i)Nurse Licensure Exam");
credential_regex!(DETECT_PALS, r"\bPALS\b|(?i)Pediatric Advanced Life Support");
credential_regex!(DETECT_TNCC, r"\bTNCC\b|(?i)Trauma Nursing Core Course");
credential_regex!(DETECT_CCRN, r"\bCCRN\b");
credential_regex!(NUMBER_CCRN, r"CCRN[^\n]{0,30}?(\d{5,10})\b");
credential_regex!(DETECT_NIHSS, r"(?i)NIH\s*Stroke\s*Scale|\bNIHSS\b");
credential_regex!(DETECT_CHEMO, r"(?i)Chemotherapy\s*(?:&|and)\s*Biotherapy(?:\s+Provider)?");
credential_regex!(DETECT_RN_LICENSE, r"(?i)\bRN\s*Licen[sc]e\b|\b[A-Z]{2}-RN-\d{4,9}\b");
credential_regex!(NUMBER_RN_LICENSE, r"\b([A-Z]{2}-RN-\d{4,9})\b");
credential_regex!(DETECT_ENPC, r"\bENPC\b");
credential_regex!(DETECT_CEN, r"\bCEN\b");

static RULES: &[CredentialRule] = &[
    CredentialRule {
        kind: "NCLEX",
        detect: &DETECT_NCLEX,
        number: Some(&NUMBER_NCLEX),
        score: None,
    },
    CredentialRule {
        kind: "IELTS",
        detect: &DETECT_IELTS,
        number: None,
        score: Some(&SCORE_IELTS),
    },
    CredentialRule {
        kind: "PRC License",
        detect: &DETECT_PRC,
        number: Some(&NUMBER_PRC),
        score: None,
    },
    CredentialRule {
        kind: "BLS",
        detect: &DETECT_BLS,
        number: None,
        score: None,
    },
    CredentialRule {
        kind: "ACLS",
        detect: &DETECT_ACLS,
        number: None,
        score: None,
    },
    CredentialRule {
        kind: "OSCE",
        detect: &DETECT_OSCE,
        number: None,
        score: None,
    },
    CredentialRule {
        kind: "NLE",
        detect: &DETECT_NLE,
        number: None,
        score: None,
    },
    CredentialRule {
        kind: "PALS",
        detect: &DETECT_PALS,
        number: None,
        score: None,
    },
    CredentialRule {
        kind: "TNCC",
        detect: &DETECT_TNCC,
        number: None,
        score: None,
    },
    CredentialRule {
        kind: "CCRN",
        detect: &DETECT_CCRN,
        number: Some(&NUMBER_CCRN),
        score: None,
    },
    CredentialRule {
        kind: "NIH Stroke Scale",
        detect: &DETECT_NIHSS,
        number: None,
        score: None,
    },
    CredentialRule {
        kind: "Chemotherapy & Biotherapy Provider",
        detect: &DETECT_CHEMO,
        number: None,
        score: None,
    },
    CredentialRule {
        kind: "RN License",
        detect: &DETECT_RN_LICENSE,
        number: Some(&NUMBER_RN_LICENSE),
        score: None,
    },
    CredentialRule {
        kind: "ENPC",
        detect: &DETECT_ENPC,
        number: None,
        score: None,
    },
    CredentialRule {
        kind: "CEN",
        detect: &DETECT_CEN,
        number: None,
        score: None,
    },
];

/// Scans the body for every canonical credential, anchored numbers and
/// scores included.
pub fn extract_certifications(text: &str) -> Vec<Certification> {
    let mut found = Vec::new();
    for rule in RULES {
        if !rule.detect.is_match(text) {
            continue;
        }
        let number = rule
            .number
            .and_then(|re| re.captures(text))
            .map(|caps| caps[1].to_string());
        let score = rule
            .score
            .and_then(|re| re.captures(text))
            .map(|caps| caps[1].to_string());
        found.push(Certification {
            kind: rule.kind.to_string(),
            number,
            score,
        });
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(certs: &[Certification]) -> Vec<&str> {
        certs.iter().map(|c| c.kind.as_str()).collect()
    }

    #[test]
    fn test_nclex_with_license_number() {
        let certs = extract_certifications("NCLEX-RN License No. RN7654321, passed 2019");
        // "RN License" also legitimately fires on the same phrase
        assert_eq!(kinds(&certs), vec!["NCLEX", "RN License"]);
        assert_eq!(certs[0].number.as_deref(), Some("RN7654321"));
    }

    #[test]
    fn test_ielts_score_anchored() {
        let certs = extract_certifications("IELTS overall band score 7.5 (2021)");
        assert_eq!(certs[0].kind, "IELTS");
        assert_eq!(certs[0].score.as_deref(), Some("7.5"));
    }

    #[test]
    fn test_prc_registration_number() {
        let certs =
            extract_certifications("PRC Registration No. 0123456 issued in Manila");
        assert_eq!(certs[0].kind, "PRC License");
        assert_eq!(certs[0].number.as_deref(), Some("0123456"));
    }

    #[test]
    fn test_prc_without_number_still_detected() {
        let certs = extract_certifications("PRC licensed nurse");
        assert_eq!(certs[0].kind, "PRC License");
        assert_eq!(certs[0].number, None);
    }

    #[test]
    fn test_state_prefixed_rn_license() {
        let certs = extract_certifications("California RN License CA-RN-492817");
        let rn = certs.iter().find(|c| c.kind == "RN License").unwrap();
        assert_eq!(rn.number.as_deref(), Some("CA-RN-492817"));
    }

    #[test]
    fn test_acronym_battery() {
        let text = "Certifications: BLS, ACLS, PALS, TNCC, ENPC, CEN, OSCE, NLE, NIHSS";
        let certs = extract_certifications(text);
        let kinds = kinds(&certs);
        for expected in [
            "BLS",
            "ACLS",
            "OSCE",
            "NLE",
            "PALS",
            "TNCC",
            "NIH Stroke Scale",
            "ENPC",
            "CEN",
        ] {
            assert!(kinds.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn test_cen_does_not_fire_on_center() {
        let certs = extract_certifications("Worked at Makati Medical CENTER");
        assert!(kinds(&certs).is_empty());
    }

    #[test]
    fn test_long_form_names() {
        let text = "Basic Life Support provider; Advanced Cardiac Life Support; Chemotherapy and Biotherapy Provider; NIH Stroke Scale certified";
        let certs = extract_certifications(text);
        let k = kinds(&certs);
        assert!(k.contains(&"BLS"));
        assert!(k.contains(&"ACLS"));
        assert!(k.contains(&"Chemotherapy & Biotherapy Provider"));
        assert!(k.contains(&"NIH Stroke Scale"));
    }

    #[test]
    fn test_ccrn_number() {
        let certs = extract_certifications("CCRN #1234567 since 2018");
        assert_eq!(certs[0].kind, "CCRN");
        assert_eq!(certs[0].number.as_deref(), Some("1234567"));
    }

    #[test]
    fn test_each_kind_emitted_once() {
        let certs = extract_certifications("BLS BLS BLS and more BLS");
        assert_eq!(certs.len(), 1);
    }
}
