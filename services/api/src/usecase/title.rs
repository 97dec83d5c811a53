use yamdb_core::time::current_year;
use yamdb_domain::pagination::{Page, PageRequest};
use yamdb_domain::validation::FieldErrors;

use crate::domain::repository::{TermRepository, TitleRepository};
use crate::domain::types::{
    DESCRIPTION_MAX, TITLE_NAME_MAX, Title, TitleFilter, TitleInput, TitleRecord,
};
use crate::domain::validate;
use crate::error::ApiError;

/// Merge `input` over `base` (the stored title, if any) and resolve genre and
/// category slugs to ids.
///
/// `name` is required unless `partial`; any other missing field keeps the
/// stored value, or its default on create (current year, blank description,
/// no genres, no category).
async fn resolve<G, C>(
    input: TitleInput,
    base: Option<&Title>,
    partial: bool,
    genres: &G,
    categories: &C,
) -> Result<TitleRecord, ApiError>
where
    G: TermRepository,
    C: TermRepository,
{
    let mut errors = FieldErrors::new();

    let name = match (input.name, base) {
        (Some(name), _) => {
            validate::required(&mut errors, "name", &name);
            validate::max_len(&mut errors, "name", &name, TITLE_NAME_MAX);
            name
        }
        (None, Some(title)) if partial => title.name.clone(),
        (None, _) => {
            errors.add("name", "this field is required");
            String::new()
        }
    };

    let year = input
        .year
        .or(base.map(|t| t.year))
        .unwrap_or_else(current_year);
    validate::year(&mut errors, year, current_year());

    let description = input
        .description
        .or_else(|| base.map(|t| t.description.clone()))
        .unwrap_or_default();
    validate::max_len(&mut errors, "description", &description, DESCRIPTION_MAX);

    let mut genre_ids: Vec<i32> = match input.genre {
        Some(slugs) => {
            let found = genres.find_by_slugs(&slugs).await?;
            for slug in &slugs {
                if !found.iter().any(|g| &g.slug == slug) {
                    errors.add("genre", format!("genre with slug {slug} does not exist"));
                }
            }
            found.into_iter().map(|g| g.id).collect()
        }
        None => base
            .map(|t| t.genres.iter().map(|g| g.id).collect())
            .unwrap_or_default(),
    };
    genre_ids.sort_unstable();
    genre_ids.dedup();

    let category_id = match input.category {
        Some(Some(slug)) => match categories.find_by_slug(&slug).await? {
            Some(category) => Some(category.id),
            None => {
                errors.add("category", format!("category with slug {slug} does not exist"));
                None
            }
        },
        Some(None) => None,
        None => base.and_then(|t| t.category.as_ref().map(|c| c.id)),
    };

    errors.into_result()?;
    Ok(TitleRecord {
        name,
        year,
        description,
        genre_ids,
        category_id,
    })
}

// ── ListTitles ───────────────────────────────────────────────────────────────

pub struct ListTitlesUseCase<T: TitleRepository> {
    pub titles: T,
}

impl<T: TitleRepository> ListTitlesUseCase<T> {
    pub async fn execute(
        &self,
        filter: &TitleFilter,
        page: PageRequest,
        uri: &str,
    ) -> Result<Page<Title>, ApiError> {
        let (titles, count) = self.titles.list(filter, page).await?;
        Ok(Page::new(titles, count, page, uri))
    }
}

// ── GetTitle ─────────────────────────────────────────────────────────────────

pub struct GetTitleUseCase<T: TitleRepository> {
    pub titles: T,
}

impl<T: TitleRepository> GetTitleUseCase<T> {
    pub async fn execute(&self, id: i32) -> Result<Title, ApiError> {
        self.titles
            .find(id)
            .await?
            .ok_or(ApiError::TitleNotFound)
    }
}

// ── CreateTitle ──────────────────────────────────────────────────────────────

pub struct CreateTitleUseCase<T, G, C>
where
    T: TitleRepository,
    G: TermRepository,
    C: TermRepository,
{
    pub titles: T,
    pub genres: G,
    pub categories: C,
}

impl<T, G, C> CreateTitleUseCase<T, G, C>
where
    T: TitleRepository,
    G: TermRepository,
    C: TermRepository,
{
    pub async fn execute(&self, input: TitleInput) -> Result<Title, ApiError> {
        let record = resolve(input, None, false, &self.genres, &self.categories).await?;
        self.titles.create(&record).await
    }
}

// ── UpdateTitle ──────────────────────────────────────────────────────────────

pub struct UpdateTitleUseCase<T, G, C>
where
    T: TitleRepository,
    G: TermRepository,
    C: TermRepository,
{
    pub titles: T,
    pub genres: G,
    pub categories: C,
}

impl<T, G, C> UpdateTitleUseCase<T, G, C>
where
    T: TitleRepository,
    G: TermRepository,
    C: TermRepository,
{
    /// `partial` is PATCH semantics; PUT requires `name`.
    pub async fn execute(
        &self,
        id: i32,
        input: TitleInput,
        partial: bool,
    ) -> Result<Title, ApiError> {
        let current = self
            .titles
            .find(id)
            .await?
            .ok_or(ApiError::TitleNotFound)?;
        let record = resolve(
            input,
            Some(&current),
            partial,
            &self.genres,
            &self.categories,
        )
        .await?;
        self.titles.update(id, &record).await
    }
}

// ── DeleteTitle ──────────────────────────────────────────────────────────────

pub struct DeleteTitleUseCase<T: TitleRepository> {
    pub titles: T,
}

impl<T: TitleRepository> DeleteTitleUseCase<T> {
    pub async fn execute(&self, id: i32) -> Result<(), ApiError> {
        if self.titles.delete(id).await? {
            Ok(())
        } else {
            Err(ApiError::TitleNotFound)
        }
    }
}
