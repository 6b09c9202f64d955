//! The hybrid orchestrator: rule-based extraction first, LLM fallback when
//! confidence is low, higher score wins, post-processors run on the
//! winner.

use std::sync::Arc;

use tracing::{debug, info};

use crate::extract;
use crate::llm::LlmExtractor;
use crate::models::record::ParsedRecord;
use crate::postprocess;
use crate::scoring::{self, RULE_CONFIDENCE_FLOOR};

pub struct HybridExtractor {
    llm: Arc<dyn LlmExtractor>,
}

impl HybridExtractor {
    pub fn new(llm: Arc<dyn LlmExtractor>) -> Self {
        Self { llm }
    }

    /// Parses `text` into the final record.
    ///
    /// The LLM is consulted only when the rule-based score falls below
    /// [`RULE_CONFIDENCE_FLOOR`], and its record is adopted only when it
    /// strictly outscores the rules. An unavailable LLM therefore leaves
    /// the rule-based result standing with no error surfaced.
    pub async fn extract(&self, text: &str) -> ParsedRecord {
        let rules = extract::extract_record(text);
        let rule_score = scoring::score(&rules, Some(text));

        let mut chosen = if rule_score >= RULE_CONFIDENCE_FLOOR {
            debug!(rule_score, "rule-based extraction accepted");
            rules
        } else {
            let llm_record = self.llm.extract(text).await;
            // The raw-text penalties judge what the rules missed; they do
            // not apply to the LLM's reading.
            let llm_score = scoring::score(&llm_record, None);
            if llm_score > rule_score {
                info!(rule_score, llm_score, "LLM extraction outscored rules");
                llm_record
            } else {
                debug!(rule_score, llm_score, "keeping rule-based extraction");
                rules
            }
        };

        postprocess::run(&mut chosen, text);
        chosen
    }
}
