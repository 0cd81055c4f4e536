use serde::Serialize;
use std::time::{Duration, Instant};
use utoipa::ToSchema;

use crate::admin::forms::Form;
use crate::admin::list_view::ListView;
use crate::admin::upload::{SelectedFile, StoredFile, UploadJob, UploadResult, UploadTracker};
use crate::backend::Backend;
use crate::error::{AppError, AppResult};
use crate::repositories::Repository;

/// How long a success notice stays visible
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

pub const UPLOADED_NOTICE: &str = "File uploaded! Remember to save changes.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState<K> {
    Closed,
    EditingNew,
    EditingExisting(K),
}

/// Auto-dismissing success message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Notice {
    pub text: String,
    #[serde(skip)]
    expires_at: Option<Instant>,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            expires_at: Instant::now().checked_add(NOTICE_TTL),
        }
    }

    pub fn is_visible_at(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |deadline| now < deadline)
    }
}

/// A submit that has been dispatched; carries the draft as it was at dispatch
#[derive(Debug, Clone)]
pub struct Submission<F: Form> {
    generation: u64,
    key: Option<F::Key>,
    draft: F,
}

impl<F: Form> Submission<F> {
    /// Exactly one repository write: update for an existing record, insert otherwise
    pub async fn dispatch(&self, backend: &dyn Backend) -> AppResult<F::Record> {
        match &self.key {
            Some(key) => self.draft.update(backend, key).await,
            None => self.draft.create(backend).await,
        }
    }
}

#[derive(Debug)]
pub enum SubmitOutcome<R> {
    Saved(R),
    Failed(AppError),
    /// The session was closed or reopened while the write was in flight
    Discarded,
}

/// Working copy of one entity being created or edited
#[derive(Debug, Clone)]
pub struct EditSession<F: Form> {
    state: SessionState<F::Key>,
    draft: Option<F>,
    in_flight: bool,
    generation: u64,
    error: Option<String>,
    notice: Option<Notice>,
    uploads: UploadTracker,
}

impl<F: Form> Default for EditSession<F> {
    fn default() -> Self {
        Self {
            state: SessionState::Closed,
            draft: None,
            in_flight: false,
            generation: 0,
            error: None,
            notice: None,
            uploads: UploadTracker::default(),
        }
    }
}

impl<F: Form> EditSession<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start editing `draft`; `None` targets a new record
    pub fn open(&mut self, key: Option<F::Key>, draft: F) {
        self.reset();
        self.state = match key {
            Some(key) => SessionState::EditingExisting(key),
            None => SessionState::EditingNew,
        };
        self.draft = Some(draft);
    }

    pub fn open_new(&mut self, draft: F) {
        self.open(None, draft);
    }

    pub fn open_existing(&mut self, record: &F::Record) {
        self.open(Some(F::key_of(record)), F::from_record(record));
    }

    /// Discard the draft unconditionally
    pub fn cancel(&mut self) {
        self.reset();
        self.notice = None;
    }

    /// Invalidate anything still in flight for the previous draft
    fn reset(&mut self) {
        self.generation += 1;
        self.state = SessionState::Closed;
        self.draft = None;
        self.in_flight = false;
        self.error = None;
        self.uploads.clear();
    }

    pub fn state(&self) -> &SessionState<F::Key> {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != SessionState::Closed
    }

    pub fn draft(&self) -> Option<&F> {
        self.draft.as_ref()
    }

    pub fn draft_mut(&mut self) -> Option<&mut F> {
        self.draft.as_mut()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice
            .as_ref()
            .filter(|n| n.is_visible_at(Instant::now()))
    }

    pub fn is_uploading(&self, field: &str) -> bool {
        self.uploads.is_uploading(field)
    }

    pub fn hints(&self) -> Vec<String> {
        self.draft.as_ref().map(F::hints).unwrap_or_default()
    }

    fn closed() -> AppError {
        AppError::Validation("Nothing is being edited".to_string())
    }

    /// Validate and mark the session in flight.
    /// Validation failures stay inline and never reach the backend.
    pub fn begin_submit(&mut self) -> AppResult<Submission<F>> {
        let key = match &self.state {
            SessionState::Closed => return Err(Self::closed()),
            SessionState::EditingNew => None,
            SessionState::EditingExisting(key) => Some(key.clone()),
        };
        if self.in_flight {
            return Err(AppError::Busy("Save".to_string()));
        }
        let draft = self.draft.clone().ok_or_else(Self::closed)?;

        if let Err(e) = draft.validate() {
            self.error = Some(e.inline_message());
            return Err(e);
        }

        self.in_flight = true;
        self.error = None;
        self.notice = None;
        Ok(Submission {
            generation: self.generation,
            key,
            draft,
        })
    }

    /// Apply a dispatched submit's result unless the session moved on
    pub fn finish_submit(
        &mut self,
        submission: &Submission<F>,
        result: AppResult<F::Record>,
    ) -> SubmitOutcome<F::Record> {
        if submission.generation != self.generation {
            tracing::debug!("Discarding result of a submit for a closed session");
            return SubmitOutcome::Discarded;
        }
        self.in_flight = false;

        match result {
            Ok(record) => {
                self.reset();
                self.notice = Some(Notice::success(F::SAVED_NOTICE));
                SubmitOutcome::Saved(record)
            }
            Err(e) => {
                self.error = Some(e.inline_message());
                SubmitOutcome::Failed(e)
            }
        }
    }

    /// Validate, write, and close on success. On failure the draft stays open.
    pub async fn submit(&mut self, backend: &dyn Backend) -> AppResult<F::Record> {
        let submission = self.begin_submit()?;
        let result = submission.dispatch(backend).await;
        match self.finish_submit(&submission, result) {
            SubmitOutcome::Saved(record) => Ok(record),
            SubmitOutcome::Failed(e) => Err(e),
            SubmitOutcome::Discarded => Err(Self::closed()),
        }
    }

    /// `submit`, then refetch the list the record belongs to
    pub async fn submit_and_refresh<R>(
        &mut self,
        backend: &dyn Backend,
        view: &mut ListView<R>,
    ) -> AppResult<F::Record>
    where
        R: Repository<Record = F::Record>,
    {
        let record = self.submit(backend).await?;
        // a failed refetch keeps the old snapshot and reports on the view
        let _ = view.refresh(backend).await;
        Ok(record)
    }

    /// Reserve `field` for an upload and describe where the file goes
    pub fn begin_upload(
        &mut self,
        field: &str,
        file: SelectedFile,
        default_bucket: &str,
    ) -> AppResult<UploadJob> {
        let draft = self.draft.as_ref().ok_or_else(Self::closed)?;
        let bucket = draft
            .upload_bucket(field)?
            .unwrap_or_else(|| default_bucket.to_string());
        let mut job = UploadJob::new(field, &bucket, file)?;

        self.uploads.begin(field)?;
        job.generation = self.generation;
        self.error = None;
        Ok(job)
    }

    /// Apply a finished upload to the draft. Nothing is saved.
    /// Returns `None` when the session moved on in the meantime.
    pub fn finish_upload(&mut self, result: UploadResult) -> AppResult<Option<StoredFile>> {
        if result.generation != self.generation {
            return Ok(None);
        }
        self.uploads.finish(&result.field);

        match result.outcome {
            Ok(stored) => {
                let draft = self.draft.as_mut().ok_or_else(Self::closed)?;
                if let Err(e) = draft.apply_upload(&result.field, &stored.url) {
                    self.error = Some(format!("Upload failed: {}", e.inline_message()));
                    return Err(e);
                }
                self.notice = Some(Notice::success(UPLOADED_NOTICE));
                Ok(Some(stored))
            }
            Err(e) => {
                self.error = Some(format!("Upload failed: {}", e.inline_message()));
                Err(e)
            }
        }
    }

    pub async fn upload(
        &mut self,
        backend: &dyn Backend,
        field: &str,
        file: SelectedFile,
        default_bucket: &str,
    ) -> AppResult<Option<StoredFile>> {
        let job = self.begin_upload(field, file, default_bucket)?;
        let result = job.run(backend).await;
        self.finish_upload(result)
    }
}
