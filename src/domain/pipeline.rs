use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::lead::LeadStatus;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    #[default]
    Week,
    Month,
    Quarter,
}

impl Timeframe {
    pub fn window(&self) -> Duration {
        match self {
            Timeframe::Week => Duration::days(7),
            Timeframe::Month => Duration::days(30),
            Timeframe::Quarter => Duration::days(90),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStage {
    pub status: LeadStatus,
    pub count: usize,
    pub total_value: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PipelineSummary {
    pub timeframe: Timeframe,
    /// One entry per status, in pipeline order.
    pub stages: Vec<PipelineStage>,
    pub total_leads: usize,
    pub total_value: f64,
}

impl PipelineSummary {
    pub fn stage(&self, status: LeadStatus) -> Option<&PipelineStage> {
        self.stages.iter().find(|s| s.status == status)
    }
}
