//! The run loop: capture, cache lookup, analysis, action, record.

use std::sync::Arc;
use std::time::Instant;

use action_eval::Bindings;
use pilot_core_types::{CapturedSnapshot, StepRecord};
use plan_cache::{CacheCoordinator, CacheEntry, CacheStore};
use snapshot_hash::{HashRegistry, SnapshotHashSet};
use tag_extractor::{extract, FieldSchema};
use tracing::{debug, info, warn};

use crate::config::PilotConfig;
use crate::driver::AppDriver;
use crate::errors::PilotError;
use crate::performer::ActionPerformer;
use crate::prompt;
use crate::prompt_service::PromptService;
use crate::types::{ReviewReport, RunReport, RunStatus, ScreenAnalysis, StepReport};

/// Drives one application toward one goal at a time.
///
/// Single-threaded and cooperatively scheduled: one turn runs at a time,
/// and within a turn the only concurrency is joining the driver's image and
/// hierarchy captures.
pub struct Pilot {
    driver: Arc<dyn AppDriver>,
    prompt_service: Arc<dyn PromptService>,
    registry: Arc<HashRegistry>,
    cache: CacheCoordinator,
    performer: ActionPerformer,
    config: PilotConfig,
}

impl Pilot {
    pub fn new(
        driver: Arc<dyn AppDriver>,
        prompt_service: Arc<dyn PromptService>,
        cache_store: Arc<dyn CacheStore>,
        bindings: Bindings,
        config: PilotConfig,
    ) -> Self {
        let registry = Arc::new(HashRegistry::default());
        let cache = CacheCoordinator::new(cache_store, Arc::clone(&registry))
            .with_enabled(config.cache_enabled);
        Self {
            driver,
            prompt_service,
            registry,
            cache,
            performer: ActionPerformer::new(bindings),
            config,
        }
    }

    pub fn config(&self) -> &PilotConfig {
        &self.config
    }

    /// Actions performed so far in this pilot's lifetime.
    pub fn performer(&self) -> &ActionPerformer {
        &self.performer
    }

    /// Hand the run-scoped cache entries to the host for promotion into the
    /// persistent store.
    pub fn drain_cache_entries(&self) -> Vec<CacheEntry> {
        self.cache.drain_temporary()
    }

    /// Run the loop until the goal is achieved, the step budget runs out,
    /// or a turn fails fatally.
    pub async fn run(&mut self, goal: &str) -> Result<RunReport, PilotError> {
        let started = Instant::now();
        let mut history: Vec<StepRecord> = Vec::new();
        let mut steps: Vec<StepReport> = Vec::new();

        info!(goal, max_steps = self.config.max_steps, "starting exploration run");

        for step_number in 1..=self.config.max_steps {
            let snapshot = self.capture(false).await?;
            let fingerprint = self.cache.generate_cache_key(goal, &history);
            let current_hashes = self.registry.generate_hashes(&snapshot);

            let (analysis, cached) = match self
                .lookup_cached(&fingerprint, &current_hashes)
                .await?
            {
                Some(analysis) => {
                    debug!(step_number, "replaying cached analysis");
                    (analysis, true)
                }
                None => {
                    let analysis = self.analyze_with_retries(goal, &snapshot, &history).await?;
                    if self.cache.is_enabled() {
                        self.commit_to_cache(&fingerprint, &analysis, current_hashes);
                    }
                    (analysis, false)
                }
            };

            steps.push(StepReport {
                screen_description: analysis.screen_description.clone(),
                action: analysis.action.clone(),
                cached,
                reviews: analysis.reviews.clone(),
            });

            if analysis.goal_achieved {
                info!(steps = step_number, "goal achieved");
                return Ok(RunReport {
                    goal: goal.to_string(),
                    status: RunStatus::GoalAchieved,
                    steps,
                    summary: analysis.summary.clone(),
                    review: analysis.reviews.clone(),
                    total_time_ms: started.elapsed().as_millis() as u64,
                });
            }

            let highlighted = self.capture(true).await?;
            self.performer
                .perform(
                    self.prompt_service.as_ref(),
                    &analysis.action,
                    &highlighted,
                    self.config.max_attempts_per_turn,
                )
                .await?;

            history.push(StepRecord::new(
                analysis.screen_description,
                analysis.action,
            ));
        }

        info!(max_steps = self.config.max_steps, "step budget reached");
        Ok(RunReport {
            goal: goal.to_string(),
            status: RunStatus::LimitReached,
            steps,
            summary: None,
            review: Vec::new(),
            total_time_ms: started.elapsed().as_millis() as u64,
        })
    }

    /// Capture one snapshot, joining image and hierarchy capture when the
    /// driver supports images.
    async fn capture(&self, with_highlights: bool) -> Result<CapturedSnapshot, PilotError> {
        if self.driver.is_snapshot_image_supported() {
            let (image, hierarchy) = tokio::join!(
                self.driver.capture_snapshot_image(with_highlights),
                self.driver.capture_view_hierarchy()
            );
            Ok(CapturedSnapshot::new(image?, Some(hierarchy?)))
        } else {
            let hierarchy = self.driver.capture_view_hierarchy().await?;
            Ok(CapturedSnapshot::from_hierarchy(hierarchy))
        }
    }

    async fn lookup_cached(
        &self,
        fingerprint: &str,
        current: &SnapshotHashSet,
    ) -> Result<Option<ScreenAnalysis>, PilotError> {
        if !self.cache.is_enabled() {
            return Ok(None);
        }
        match self.cache.find_matching(fingerprint, current).await? {
            Some(value) => match serde_json::from_value(value) {
                Ok(analysis) => Ok(Some(analysis)),
                Err(err) => {
                    warn!(error = %err, "cached analysis failed to decode, treating as miss");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    fn commit_to_cache(
        &self,
        fingerprint: &str,
        analysis: &ScreenAnalysis,
        hashes: SnapshotHashSet,
    ) {
        match serde_json::to_value(analysis) {
            Ok(value) => self.cache.record(fingerprint, value, hashes),
            Err(err) => warn!(error = %err, "analysis not cacheable"),
        }
    }

    /// Ask the model to analyze the screen, retrying prompt/extraction
    /// failures within the turn's attempt budget. Failed attempts are
    /// appended as synthetic history entries visible to the next attempt.
    async fn analyze_with_retries(
        &self,
        goal: &str,
        snapshot: &CapturedSnapshot,
        history: &[StepRecord],
    ) -> Result<ScreenAnalysis, PilotError> {
        let attempts = self.config.max_attempts_per_turn.max(1);
        let mut attempt_history = history.to_vec();
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match self.analyze_once(goal, snapshot, &attempt_history).await {
                Ok(analysis) => return Ok(analysis),
                Err(err) if err.is_retryable() => {
                    warn!(attempt, error = %err, "analysis attempt failed");
                    let (screen, action) = attempt_history
                        .last()
                        .map(|s| (s.screen_description.clone(), s.action.clone()))
                        .unwrap_or_else(|| ("Unknown".to_string(), "None".to_string()));
                    attempt_history.push(StepRecord::with_error(screen, action, err.to_string()));
                    last_error = err.to_string();
                }
                Err(err) => return Err(err),
            }
        }

        Err(PilotError::AttemptsExhausted {
            attempts,
            last_error,
        })
    }

    async fn analyze_once(
        &self,
        goal: &str,
        snapshot: &CapturedSnapshot,
        history: &[StepRecord],
    ) -> Result<ScreenAnalysis, PilotError> {
        let hierarchy = snapshot.view_hierarchy.as_deref().unwrap_or_default();
        let prompt = prompt::format_analysis_prompt(
            goal,
            hierarchy,
            snapshot.has_image(),
            history,
            &self.config.review_sections,
        );

        let response = self
            .prompt_service
            .run_prompt(&prompt, snapshot.image.as_deref())
            .await?;

        let schema = FieldSchema::pilot_step_with_sections(
            self.config.review_sections.iter().map(|s| s.name.as_str()),
        );
        let fields = extract(&response, &schema)?;

        let mut reviews = Vec::new();
        for section in &self.config.review_sections {
            let body = fields.required(&section.name)?;
            let sub = extract(body, &FieldSchema::review())?;
            match sub.get("summary") {
                Some(summary) => reviews.push(ReviewReport {
                    section: section.name.clone(),
                    summary: summary.to_string(),
                    findings: sub.get("findings").map(str::to_string),
                    score: sub.get("score").map(str::to_string),
                }),
                None => {
                    warn!(section = %section.name, "review section lacks a summary, dropping it");
                }
            }
        }

        Ok(ScreenAnalysis {
            screen_description: fields.required("screen_description")?.to_string(),
            thoughts: fields.required("thoughts")?.to_string(),
            action: fields.required("action")?.to_string(),
            goal_achieved: fields.is_present("goal_summary"),
            summary: fields.get("goal_summary").map(str::to_string),
            reviews,
        })
    }
}
