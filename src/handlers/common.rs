use serde::Deserialize;
use utoipa::IntoParams;

use crate::admin::{DeleteOutcome, EditSession, Form, ListView, Searchable};
use crate::backend::Backend;
use crate::error::{AppError, AppResult};
use crate::repositories::Repository;

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Case-insensitive substring filter
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ConfirmParams {
    /// Answer to the confirmation prompt
    #[serde(default)]
    #[param(default = false)]
    pub confirm: bool,
}

/// Fresh snapshot filtered by the search term
pub(crate) async fn search_list<R>(
    backend: &dyn Backend,
    search: Option<&str>,
) -> AppResult<Vec<R::Record>>
where
    R: Repository,
    R::Record: Searchable,
{
    let mut view = ListView::<R>::new();
    view.refresh(backend).await?;
    Ok(view
        .filtered(search.unwrap_or_default())
        .into_iter()
        .cloned()
        .collect())
}

/// Draft loaded from the stored record with the given id
pub(crate) async fn edit_draft<R, F>(backend: &dyn Backend, id: i64) -> AppResult<F>
where
    R: Repository,
    F: Form<Record = R::Record>,
{
    let record = R::find(backend, id)
        .await?
        .ok_or_else(|| AppError::NotFound(R::RESOURCE.to_string()))?;
    Ok(F::from_record(&record))
}

pub(crate) struct Submitted<T> {
    pub record: T,
    pub hints: Vec<String>,
    pub notice: Option<String>,
}

/// Run one edit session to completion: open, validate, write
pub(crate) async fn submit_draft<F: Form>(
    backend: &dyn Backend,
    key: Option<F::Key>,
    draft: F,
) -> AppResult<Submitted<F::Record>> {
    let mut session = EditSession::new();
    session.open(key, draft);
    let hints = session.hints();
    let record = session.submit(backend).await?;

    Ok(Submitted {
        record,
        hints,
        notice: session.notice().map(|n| n.text.clone()),
    })
}

/// Confirmed delete followed by a refetch; returns the refreshed list
/// and the refetch error, if any
pub(crate) async fn confirmed_delete<R: Repository>(
    backend: &dyn Backend,
    id: i64,
    mut confirm: bool,
) -> AppResult<(Vec<R::Record>, Option<String>)> {
    let mut view = ListView::<R>::new();
    match view.delete(backend, id, &mut confirm).await? {
        DeleteOutcome::Cancelled => Err(AppError::ConfirmationRequired(
            ListView::<R>::delete_prompt(),
        )),
        DeleteOutcome::Deleted => Ok((
            view.items().to_vec(),
            view.error().map(str::to_string),
        )),
    }
}
