//! Prompt templates for the exploration loop.
//!
//! Two prompts exist: the analysis prompt asked on every cache miss, and the
//! action-code prompt the performer uses to turn a chosen action into a
//! command program.

use pilot_core_types::StepRecord;
use tag_extractor::section_tag;

use crate::config::ReviewSectionConfig;
use crate::types::PerformedStep;

/// Instructions heading every analysis prompt.
pub const ANALYSIS_SYSTEM_PROMPT: &str = r#"You are an autonomous UI exploration agent driving a mobile application toward a stated goal, one step at a time.

Each turn you receive the current view hierarchy (and a screenshot when available), the goal, and the history of previous steps. Decide the single best next action.

Respond in plain text containing exactly these tagged sections:

<SCREENDESCRIPTION>
One or two sentences describing what the current screen shows.
</SCREENDESCRIPTION>
<THOUGHTS>
Your reasoning about the state of the task and why the next action is right.
</THOUGHTS>
<ACTION>
The single next action to perform, in one imperative sentence (e.g. "Tap the Login button").
</ACTION>

Only when the goal is already fully achieved on this screen, ALSO include:

<GOALSUMMARY>
A short summary of how the goal was accomplished.
</GOALSUMMARY>

Never emit <GOALSUMMARY> otherwise. Tags are case-sensitive; text outside tags is ignored.
"#;

/// Instructions heading every action-code prompt.
pub const ACTION_CODE_SYSTEM_PROMPT: &str = r#"You translate one UI action into a command program.

A program is JSON: a single invocation {"call": "<capability>", "args": [...]} or an array of invocations executed in order. Only the listed capabilities are callable.

Respond with:

<CODE>
the JSON program
</CODE>

Optionally, include a predicate describing when this screen state makes the cached program valid to replay:

<CACHE_VALIDATION_MATCHER>
the predicate
</CACHE_VALIDATION_MATCHER>
"#;

/// Build the analysis prompt for one turn.
pub fn format_analysis_prompt(
    goal: &str,
    view_hierarchy: &str,
    image_attached: bool,
    history: &[StepRecord],
    sections: &[ReviewSectionConfig],
) -> String {
    let mut prompt = String::from(ANALYSIS_SYSTEM_PROMPT);

    if !sections.is_empty() {
        prompt.push_str("\nAdditionally report these review sections, each wrapped in its own tag and containing <SUMMARY> (required if you report the section), and optionally <FINDINGS> and <SCORE>:\n");
        for section in sections {
            let tag = section_tag(&section.name);
            match &section.guidance {
                Some(guidance) => {
                    prompt.push_str(&format!("- <{tag}>...</{tag}>: {guidance}\n"));
                }
                None => prompt.push_str(&format!("- <{tag}>...</{tag}>\n")),
            }
        }
    }

    prompt.push_str("\n## Goal\n");
    prompt.push_str(goal);
    prompt.push('\n');

    if !history.is_empty() {
        prompt.push_str("\n## Previous Steps\n");
        for (index, step) in history.iter().enumerate() {
            prompt.push_str(&format!(
                "{}. Screen: {} | Action: {}",
                index + 1,
                step.screen_description,
                step.action
            ));
            if let Some(error) = &step.error {
                prompt.push_str(&format!(" | Error: {error}"));
            }
            prompt.push('\n');
        }
    }

    prompt.push_str("\n## Current View Hierarchy\n");
    prompt.push_str(view_hierarchy);
    prompt.push('\n');

    if image_attached {
        prompt.push_str("\nA screenshot of the current screen is attached.\n");
    }

    prompt
}

/// Build the action-code prompt for one chosen action.
pub fn format_action_code_prompt(
    action: &str,
    view_hierarchy: &str,
    capabilities: &[&str],
    performed: &[PerformedStep],
) -> String {
    let mut prompt = String::from(ACTION_CODE_SYSTEM_PROMPT);

    prompt.push_str("\n## Available Capabilities\n");
    for name in capabilities {
        prompt.push_str(&format!("- {name}\n"));
    }

    if !performed.is_empty() {
        prompt.push_str("\n## Previously Performed Steps\n");
        for step in performed {
            prompt.push_str(&format!(
                "- Step: {} | Code: {} | Result: {}\n",
                step.step, step.code, step.result
            ));
        }
    }

    prompt.push_str("\n## Current View Hierarchy (with interaction highlights)\n");
    prompt.push_str(view_hierarchy);
    prompt.push('\n');

    prompt.push_str("\n## Action to Perform\n");
    prompt.push_str(action);
    prompt.push('\n');

    prompt
}
