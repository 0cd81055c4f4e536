use std::marker::PhantomData;

use crate::admin::confirm::Confirm;
use crate::backend::Backend;
use crate::error::{AppError, AppResult};
use crate::models::{ExperienceItem, Project, SocialItem};
use crate::repositories::Repository;

/// Records the list search box can match against
pub trait Searchable {
    /// `needle` is already lowercased and non-empty
    fn matches(&self, needle: &str) -> bool;
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

impl Searchable for Project {
    fn matches(&self, needle: &str) -> bool {
        contains(&self.title, needle) || contains(&self.category, needle)
    }
}

impl Searchable for ExperienceItem {
    fn matches(&self, needle: &str) -> bool {
        contains(&self.title, needle) || contains(&self.company, needle)
    }
}

impl Searchable for SocialItem {
    fn matches(&self, needle: &str) -> bool {
        contains(&self.platform, needle) || contains(&self.url, needle)
    }
}

/// Case-insensitive substring filter; a blank term keeps everything
pub fn filter_items<'a, T: Searchable>(items: &'a [T], term: &str) -> Vec<&'a T> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return items.iter().collect();
    }
    items.iter().filter(|item| item.matches(&needle)).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

/// Last confirmed snapshot of one collection
#[derive(Debug, Clone)]
pub struct ListView<R: Repository> {
    items: Vec<R::Record>,
    loaded: bool,
    error: Option<String>,
    deleting: Option<i64>,
    _repository: PhantomData<R>,
}

impl<R: Repository> Default for ListView<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loaded: false,
            error: None,
            deleting: None,
            _repository: PhantomData,
        }
    }
}

impl<R: Repository> ListView<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[R::Record] {
        &self.items
    }

    /// False until the first successful fetch
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_deleting(&self, id: i64) -> bool {
        self.deleting == Some(id)
    }

    /// Refetch; a failure keeps the previous snapshot
    pub async fn refresh(&mut self, backend: &dyn Backend) -> AppResult<()> {
        match R::list(backend).await {
            Ok(items) => {
                self.items = items;
                self.loaded = true;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to fetch {} list: {}", R::RESOURCE, e);
                self.error = Some(e.inline_message());
                Err(e)
            }
        }
    }

    /// The visible subset; the snapshot itself is never touched
    pub fn filtered(&self, term: &str) -> Vec<&R::Record>
    where
        R::Record: Searchable,
    {
        filter_items(&self.items, term)
    }

    pub fn delete_prompt() -> String {
        format!(
            "Are you sure you want to delete this {}?",
            R::RESOURCE.to_lowercase()
        )
    }

    /// Delete after confirmation, then refetch. Nothing is removed locally.
    pub async fn delete(
        &mut self,
        backend: &dyn Backend,
        id: i64,
        confirm: &mut impl Confirm,
    ) -> AppResult<DeleteOutcome> {
        if self.deleting.is_some() {
            return Err(AppError::Busy("Delete".to_string()));
        }
        if !confirm.confirm(&Self::delete_prompt()) {
            return Ok(DeleteOutcome::Cancelled);
        }

        self.deleting = Some(id);
        let removed = R::remove(backend, id).await;
        self.deleting = None;

        if let Err(e) = removed {
            self.error = Some(format!("Delete failed: {}", e.inline_message()));
            return Err(e);
        }
        // the row is gone even if the refetch fails; the view keeps reporting it
        let _ = self.refresh(backend).await;
        Ok(DeleteOutcome::Deleted)
    }
}
