//! Data types for run reports and per-turn analysis.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of analyzing one captured screen, whether freshly prompted or
/// replayed from the plan cache. This is also the cached payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScreenAnalysis {
    /// Model's description of the visible screen.
    pub screen_description: String,

    /// Model's rationale for the chosen action.
    pub thoughts: String,

    /// The chosen next action, in natural language.
    pub action: String,

    /// True iff the model emitted a goal summary this turn.
    pub goal_achieved: bool,

    /// Goal summary, present exactly when `goal_achieved`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Review sections recovered this turn.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reviews: Vec<ReviewReport>,
}

/// One review section recovered from a turn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReviewReport {
    /// Section name as configured by the caller.
    pub section: String,
    /// Required summary text.
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub findings: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
}

/// One reported turn of a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepReport {
    pub screen_description: String,
    pub action: String,
    /// Whether this turn replayed a cached analysis instead of prompting.
    pub cached: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reviews: Vec<ReviewReport>,
}

/// Terminal artifact of one run; immutable once returned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunReport {
    pub goal: String,
    pub status: RunStatus,
    pub steps: Vec<StepReport>,
    /// Goal summary from the final turn, when the goal was achieved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Review commentary from the final turn.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub review: Vec<ReviewReport>,
    /// Total execution time in milliseconds.
    pub total_time_ms: u64,
}

impl RunReport {
    pub fn is_goal_achieved(&self) -> bool {
        matches!(self.status, RunStatus::GoalAchieved)
    }
}

/// How a run ended. Aborts surface as errors, not as a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// The model reported the goal achieved.
    GoalAchieved,
    /// The step budget ran out without goal completion.
    LimitReached,
}

/// One performed action, replayed into later code prompts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerformedStep {
    /// The natural-language action this code realized.
    pub step: String,
    /// The command program that ran.
    pub code: String,
    /// The program's result value.
    pub result: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_round_trips_through_json() {
        let analysis = ScreenAnalysis {
            screen_description: "Settings screen".to_string(),
            thoughts: "The toggle is visible".to_string(),
            action: "Tap the dark-mode toggle".to_string(),
            goal_achieved: false,
            summary: None,
            reviews: vec![ReviewReport {
                section: "ux".to_string(),
                summary: "Consistent layout".to_string(),
                findings: None,
                score: Some("8/10".to_string()),
            }],
        };

        let value = serde_json::to_value(&analysis).unwrap();
        let back: ScreenAnalysis = serde_json::from_value(value).unwrap();
        assert_eq!(back, analysis);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&RunStatus::LimitReached).unwrap(),
            "\"limit_reached\""
        );
    }
}
