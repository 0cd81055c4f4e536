use async_trait::async_trait;

use crate::backend::{tables, Backend, Direction, Query};
use crate::error::AppResult;
use crate::models::{ExperienceInput, ExperienceItem};
use crate::repositories::{find_row, insert_row, list_rows, remove_row, update_row, Repository};

/// Experience repository.
/// Listed by `year` descending using plain string comparison, so
/// "2024 - Present" sorts above "2024" and "9" above "10".
pub struct ExperienceRepository;

#[async_trait]
impl Repository for ExperienceRepository {
    type Record = ExperienceItem;
    type Input = ExperienceInput;

    const RESOURCE: &'static str = "Experience";

    async fn list(backend: &dyn Backend) -> AppResult<Vec<ExperienceItem>> {
        let query = Query::new().order_by("year", Direction::Descending);
        list_rows(backend, tables::EXPERIENCE, &query).await
    }

    async fn find(backend: &dyn Backend, id: i64) -> AppResult<Option<ExperienceItem>> {
        find_row(backend, tables::EXPERIENCE, id).await
    }

    async fn insert(backend: &dyn Backend, input: &ExperienceInput) -> AppResult<ExperienceItem> {
        let item: ExperienceItem =
            insert_row(backend, tables::EXPERIENCE, input, Self::RESOURCE).await?;
        tracing::info!(id = item.id, "Experience created: {}", item.title);
        Ok(item)
    }

    async fn update(
        backend: &dyn Backend,
        id: i64,
        input: &ExperienceInput,
    ) -> AppResult<ExperienceItem> {
        let item = update_row(backend, tables::EXPERIENCE, id, input, Self::RESOURCE).await?;
        tracing::info!(id, "Experience updated");
        Ok(item)
    }

    async fn remove(backend: &dyn Backend, id: i64) -> AppResult<()> {
        remove_row(backend, tables::EXPERIENCE, id).await?;
        tracing::info!(id, "Experience deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryBackend;
    use crate::models::ExperienceType;

    fn input(year: &str, title: &str) -> ExperienceInput {
        ExperienceInput {
            year: year.to_string(),
            title: title.to_string(),
            company: "Acme".to_string(),
            kind: ExperienceType::Work,
            description: "Built things".to_string(),
            skills: vec!["Rust".to_string()],
        }
    }

    #[tokio::test]
    async fn test_list_orders_year_as_string() {
        let backend = InMemoryBackend::new();
        for (year, title) in [("2020", "A"), ("2024 - Present", "B"), ("2022", "C")] {
            ExperienceRepository::insert(&backend, &input(year, title))
                .await
                .unwrap();
        }

        let years: Vec<String> = ExperienceRepository::list(&backend)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.year)
            .collect();
        assert_eq!(years, vec!["2024 - Present", "2022", "2020"]);
    }

    #[tokio::test]
    async fn test_sequential_updates_last_write_wins() {
        let backend = InMemoryBackend::new();
        let item = ExperienceRepository::insert(&backend, &input("2021", "Engineer"))
            .await
            .unwrap();

        let mut first = input("2021", "Senior Engineer");
        first.company = "First Co".to_string();
        let mut second = input("2021", "Staff Engineer");
        second.company = "Second Co".to_string();

        ExperienceRepository::update(&backend, item.id, &first)
            .await
            .unwrap();
        ExperienceRepository::update(&backend, item.id, &second)
            .await
            .unwrap();

        let stored = ExperienceRepository::list(&backend).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].title, "Staff Engineer");
        assert_eq!(stored[0].company, "Second Co");
    }
}
