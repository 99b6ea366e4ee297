//! Simulated backend
//!
//! Stands in for a real answer service: every question gets the same answer
//! and the same single citation after a fixed delay. It never fails.

use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;

use super::AnswerBackend;
use crate::core::{Answer, BackendError, Citation};

const SAMPLE_QUERY: &str = "In a motor accident claim where the deceased was self-employed and aged 54–55 years at the time of death, is the claimant entitled to an addition towards future prospects?";

static CANNED_ANSWER: Lazy<Answer> = Lazy::new(|| {
    Answer::new(
        "Yes, in a motor accident claim under Section 166 of the Motor Vehicles Act, 1988, where the deceased was self-employed and aged 54–55 years at the time of death, the claimant is entitled to an addition towards future prospects. In Dani Devi v. Pritam Singh (FAO No. 4353 of 2012), the Punjab and Haryana High Court held that 10% of annual income should have been awarded on account of future prospects.",
        vec![Citation {
            id: 1,
            text: "as the age of the deceased at the time of accident was held to be about 54-55 years by the learned Tribunal, being self-employed, as such, 10% of annual income should have been awarded on account of future prospects.".to_string(),
            source: "Dani Devi v. Pritam Singh (P&H)".to_string(),
            paragraph: "Para 7".to_string(),
            link: "https://lexisingapore-my.sharepoint.com/:b:/g/personal/harshit_lexi_sg/EdOegeiR_gdBvQxdyW4xE6oBCDgj5E4Bo5wjvhPHpqgIuQ?e=TEu4vz".to_string(),
            preceding: Some("7. Having heard the arguments advanced by learned counsel for both the parties and gone through the paper-book, I am of the considered view that".to_string()),
            following: Some("8. Besides this, with respect to the compensation awarded under the other conventional heads as well as multiplier, applying the principles of law laid down by Hon'ble Supreme Court in Pranay Sethi's case(supra) and in Smt. Sarla Verma...".to_string()),
        }],
    )
});

/// The example question offered on the welcome screen
pub fn sample_query() -> &'static str {
    SAMPLE_QUERY
}

/// Canned-answer backend with a fixed latency
#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    delay: Duration,
}

impl SimulatedBackend {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// The answer every question receives
    pub fn canned_answer() -> Answer {
        CANNED_ANSWER.clone()
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new(Duration::from_millis(1500))
    }
}

#[async_trait]
impl AnswerBackend for SimulatedBackend {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn answer(&self, question: &str) -> Result<Answer, BackendError> {
        tracing::debug!(
            question_len = question.len(),
            delay_ms = self.delay.as_millis() as u64,
            "simulated answer scheduled"
        );
        tokio::time::sleep(self.delay).await;
        Ok(Self::canned_answer())
    }
}
