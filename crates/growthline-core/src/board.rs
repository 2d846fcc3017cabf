//! Presentation state for one user session.
//!
//! The [`Board`] ties the generator and the record manager together and holds
//! what a front end shows: the current timeline, the history list, a loading
//! flag and a single error message. Which parts of the workflow are available
//! is decided by [`Features`]: the basic preset only generates and saves, the
//! full preset adds history, completion tracking, delete confirmation and live
//! updates.
//!
//! Every failing operation both returns its error and leaves a user-facing
//! message in [`Board::error`] until the next operation or
//! [`Board::dismiss_error`].

use std::sync::Arc;

use log::{debug, info};

use crate::{
    context::{require_context, AppContext},
    error::{Result, TimelineError},
    generator::TimelineGenerator,
    models::{RecordId, Timeline, TimelineRecord},
    params::GenerateTimeline,
    records::{RecordStream, TimelineRecords},
};

/// Optional capabilities of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Features {
    /// Saved timelines can be listed, loaded and deleted
    pub history: bool,
    /// Phases can be marked completed
    pub completion_tracking: bool,
    /// Deletes wait for an explicit confirmation
    pub delete_confirmation: bool,
    /// The history follows store changes
    pub live_updates: bool,
}

impl Features {
    /// Generate and save only.
    pub const fn basic() -> Self {
        Self {
            history: false,
            completion_tracking: false,
            delete_confirmation: false,
            live_updates: false,
        }
    }

    /// Everything switched on.
    pub const fn full() -> Self {
        Self {
            history: true,
            completion_tracking: true,
            delete_confirmation: true,
            live_updates: true,
        }
    }
}

impl Default for Features {
    fn default() -> Self {
        Self::full()
    }
}

/// Result of a successful generation.
#[derive(Debug, Clone)]
pub struct Generated {
    pub timeline: Timeline,
    /// Id of the saved record; `None` when saving failed
    pub saved: Option<RecordId>,
}

/// Outcome of a delete request.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    /// The delete waits for [`Board::confirm_delete`]
    NeedsConfirmation(RecordId),
    /// The record was removed
    Deleted(TimelineRecord),
    /// The record was not in the history; nothing happened
    NotLoaded(RecordId),
    /// [`Board::confirm_delete`] was called without a pending request
    NothingPending,
}

/// Holds the loading flag up until dropped, including when the generate
/// future is cancelled.
struct LoadingFlag<'a>(&'a mut bool);

impl<'a> LoadingFlag<'a> {
    fn raise(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for LoadingFlag<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

/// Session state shown by a front end.
pub struct Board {
    generator: Arc<dyn TimelineGenerator>,
    features: Features,
    context: Option<AppContext>,
    records: Option<TimelineRecords>,
    current: Option<Timeline>,
    current_id: Option<RecordId>,
    loading: bool,
    error: Option<String>,
    pending_delete: Option<RecordId>,
}

impl Board {
    pub fn new(generator: Arc<dyn TimelineGenerator>, features: Features) -> Self {
        Self {
            generator,
            features,
            context: None,
            records: None,
            current: None,
            current_id: None,
            loading: false,
            error: None,
            pending_delete: None,
        }
    }

    /// Makes the board ready once identity and store are initialized.
    pub fn attach(&mut self, context: AppContext) {
        debug!(
            "Board attached (namespace {}, signed in: {})",
            context.namespace(),
            context.owner().is_some()
        );
        self.records = Some(TimelineRecords::new(
            context.store(),
            context.namespace().clone(),
        ));
        self.context = Some(context);
    }

    pub fn features(&self) -> Features {
        self.features
    }

    pub fn is_ready(&self) -> bool {
        self.context.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the generate action is available.
    pub fn can_generate(&self) -> bool {
        self.is_ready() && !self.loading
    }

    /// The timeline currently on screen.
    pub fn current(&self) -> Option<&Timeline> {
        self.current.as_ref()
    }

    /// Record id of the timeline on screen, when it has been saved.
    pub fn current_id(&self) -> Option<&RecordId> {
        self.current_id.as_ref()
    }

    /// Record waiting for delete confirmation.
    pub fn pending_delete(&self) -> Option<&RecordId> {
        self.pending_delete.as_ref()
    }

    /// The message describing the last failure.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// The history list as last seen.
    pub async fn history(&self) -> Vec<TimelineRecord> {
        match &self.records {
            Some(records) => records.records().await,
            None => Vec::new(),
        }
    }

    fn ready(&self) -> Result<(&AppContext, &TimelineRecords)> {
        let context = require_context(self.context.as_ref())?;
        let records = self
            .records
            .as_ref()
            .ok_or_else(|| TimelineError::not_ready("Database"))?;
        Ok((context, records))
    }

    fn require(&self, enabled: bool, feature: &str) -> Result<()> {
        if enabled {
            Ok(())
        } else {
            Err(TimelineError::FeatureDisabled {
                feature: feature.to_string(),
            })
        }
    }

    /// Records the user-facing message of a failed action and passes the
    /// result through.
    fn report<T>(&mut self, action: &str, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            self.error = Some(e.user_message(action));
        }
        result
    }

    /// Generates a timeline and saves it.
    ///
    /// Inputs are validated before anything else. When saving fails the
    /// generated timeline is still kept and shown, and the save failure is
    /// left in [`Self::error`].
    pub async fn generate(&mut self, request: &GenerateTimeline) -> Result<Generated> {
        self.error = None;
        let result = self.generate_inner(request).await;
        self.report("generate timeline", result)
    }

    async fn generate_inner(&mut self, request: &GenerateTimeline) -> Result<Generated> {
        request.validate()?;
        self.ready()?;
        if self.loading {
            return Err(TimelineError::not_ready("Timeline generation"));
        }

        self.current = None;
        self.current_id = None;
        let generator = Arc::clone(&self.generator);
        info!("Generating timeline with {}", generator.name());
        let generated = {
            let _loading = LoadingFlag::raise(&mut self.loading);
            generator.generate(request).await
        };
        let timeline = generated?;
        self.current = Some(timeline.clone());

        let (context, records) = self.ready()?;
        let saved = records
            .save(context.owner(), &request.inputs(), &timeline)
            .await;
        let saved = match saved {
            Ok(id) => {
                self.current_id = Some(id.clone());
                Some(id)
            }
            Err(e) => {
                self.error = Some(e.user_message("save timeline"));
                None
            }
        };

        Ok(Generated { timeline, saved })
    }

    /// Reloads the history from the store.
    pub async fn refresh_history(&mut self) -> Result<Vec<TimelineRecord>> {
        let result = async {
            self.require(self.features.history, "history")?;
            let (context, records) = self.ready()?;
            records.list(context.owner()).await
        }
        .await;
        self.report("load saved timelines", result)
    }

    /// Shows a saved record as the current timeline.
    pub async fn load_saved(&mut self, id: &RecordId) -> Result<TimelineRecord> {
        let result = async {
            self.require(self.features.history, "history")?;
            let (context, records) = self.ready()?;
            match records.cached(id).await {
                Some(record) => Ok(record),
                None => records.get(context.owner(), id).await,
            }
        }
        .await;
        let record = self.report("load timeline", result)?;
        self.current = Some(record.timeline.clone());
        self.current_id = Some(record.id.clone());
        self.error = None;
        Ok(record)
    }

    /// Flips one phase's completion flag and returns the updated record.
    pub async fn toggle_phase(
        &mut self,
        id: &RecordId,
        phase_index: usize,
    ) -> Result<TimelineRecord> {
        let result = async {
            self.require(self.features.completion_tracking, "completion tracking")?;
            let (context, records) = self.ready()?;
            if records.cached(id).await.is_none() {
                records.get(context.owner(), id).await?;
            }
            records
                .set_phase_completion(context.owner(), id, phase_index)
                .await?;
            records
                .cached(id)
                .await
                .ok_or_else(|| TimelineError::RecordNotFound { id: id.to_string() })
        }
        .await;

        // Keep the view in step with the in-memory copy, reverted or not.
        if self.current_id.as_ref() == Some(id) {
            if let Some(records) = &self.records {
                if let Some(record) = records.cached(id).await {
                    self.current = Some(record.timeline);
                }
            }
        }
        self.report("update phase status", result)
    }

    /// Starts deleting a record. With delete confirmation on, the record is
    /// only marked and [`Self::confirm_delete`] performs the delete.
    pub async fn request_delete(&mut self, id: &RecordId) -> Result<DeleteOutcome> {
        if let Err(e) = self.require(self.features.history, "history") {
            return self.report("delete timeline", Err(e));
        }
        if self.features.delete_confirmation {
            if let Err(e) = self.ready() {
                return self.report("delete timeline", Err(e));
            }
            self.pending_delete = Some(id.clone());
            return Ok(DeleteOutcome::NeedsConfirmation(id.clone()));
        }
        self.delete_now(id.clone()).await
    }

    /// Performs the pending delete.
    pub async fn confirm_delete(&mut self) -> Result<DeleteOutcome> {
        match self.pending_delete.take() {
            Some(id) => self.delete_now(id).await,
            None => Ok(DeleteOutcome::NothingPending),
        }
    }

    /// Drops the pending delete.
    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    async fn delete_now(&mut self, id: RecordId) -> Result<DeleteOutcome> {
        let result = async {
            let (context, records) = self.ready()?;
            let record = records.cached(&id).await;
            let deleted = records.delete(context.owner(), &id).await?;
            Ok::<_, TimelineError>(match (deleted, record) {
                (true, Some(record)) => DeleteOutcome::Deleted(record),
                _ => DeleteOutcome::NotLoaded(id.clone()),
            })
        }
        .await;

        if matches!(result, Ok(DeleteOutcome::Deleted(_))) && self.current_id.as_ref() == Some(&id)
        {
            self.current = None;
            self.current_id = None;
        }
        self.report("delete timeline", result)
    }

    /// Subscribes to store changes of the signed-in user's history.
    pub async fn watch(&mut self) -> Result<RecordStream> {
        let result = async {
            self.require(self.features.live_updates, "live updates")?;
            let (context, records) = self.ready()?;
            records.watch(context.owner()).await
        }
        .await;
        self.report("subscribe to saved timelines", result)
    }

    /// Applies a snapshot pushed by [`Self::watch`] and returns the new
    /// history.
    pub async fn apply_snapshot(
        &mut self,
        snapshot: Result<Vec<TimelineRecord>>,
    ) -> Result<Vec<TimelineRecord>> {
        let result = async {
            let snapshot = snapshot?;
            let (context, records) = self.ready()?;
            Ok::<_, TimelineError>(records.apply_snapshot(context.owner(), snapshot).await)
        }
        .await;
        let history = self.report("load saved timelines", result)?;

        if let Some(id) = &self.current_id {
            if let Some(record) = history.iter().find(|r| &r.id == id) {
                self.current = Some(record.timeline.clone());
            }
        }
        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;

    struct Unreachable;

    #[async_trait]
    impl TimelineGenerator for Unreachable {
        async fn generate(&self, _params: &GenerateTimeline) -> Result<Timeline> {
            panic!("generator must not be called");
        }

        fn name(&self) -> &str {
            "unreachable"
        }
    }

    fn request() -> GenerateTimeline {
        GenerateTimeline {
            business_type: "Local bakery".to_string(),
            business_position: "1 year old, 2 employees".to_string(),
            growth_goals: "Open second location in 18 months".to_string(),
            api_key: None,
        }
    }

    #[test]
    fn test_feature_presets() {
        assert_eq!(Features::default(), Features::full());
        assert!(!Features::basic().history);
        assert!(Features::full().delete_confirmation);
    }

    #[tokio::test]
    async fn test_generate_before_attach_is_not_ready() {
        let mut board = Board::new(Arc::new(Unreachable), Features::full());
        assert!(!board.can_generate());

        let err = board.generate(&request()).await.unwrap_err();
        assert!(matches!(err, TimelineError::NotReady { .. }));
        assert!(board.error().unwrap().contains("not ready"));
    }

    #[tokio::test]
    async fn test_empty_input_fails_validation_without_calling_generator() {
        let mut board = Board::new(Arc::new(Unreachable), Features::full());
        let mut params = request();
        params.growth_goals = "   ".to_string();

        let err = board.generate(&params).await.unwrap_err();
        assert!(matches!(err, TimelineError::Validation { .. }));
        assert!(board.error().unwrap().contains("Please fill in all fields"));

        board.dismiss_error();
        assert!(board.error().is_none());
    }

    #[tokio::test]
    async fn test_disabled_feature_is_reported() {
        let mut board = Board::new(Arc::new(Unreachable), Features::basic());
        let err = board.refresh_history().await.unwrap_err();
        assert!(matches!(err, TimelineError::FeatureDisabled { .. }));
    }

    #[tokio::test]
    async fn test_confirm_without_request_does_nothing() {
        let mut board = Board::new(Arc::new(Unreachable), Features::full());
        assert_eq!(
            board.confirm_delete().await.unwrap(),
            DeleteOutcome::NothingPending
        );
    }
}
