//! Genres and categories: create, list with search, delete by slug.

use yamdb_domain::pagination::{Page, PageRequest};
use yamdb_domain::validation::FieldErrors;

use crate::domain::repository::TermRepository;
use crate::domain::types::{NewTerm, Term, TermKind};
use crate::domain::validate;
use crate::error::ApiError;

fn not_found(kind: TermKind) -> ApiError {
    match kind {
        TermKind::Genre => ApiError::GenreNotFound,
        TermKind::Category => ApiError::CategoryNotFound,
    }
}

pub(crate) fn slug_taken() -> FieldErrors {
    FieldErrors::single("slug", "an entry with this slug already exists")
}

// ── ListTerms ────────────────────────────────────────────────────────────────

pub struct ListTermsUseCase<T: TermRepository> {
    pub terms: T,
}

impl<T: TermRepository> ListTermsUseCase<T> {
    pub async fn execute(
        &self,
        search: Option<&str>,
        page: PageRequest,
        uri: &str,
    ) -> Result<Page<Term>, ApiError> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        let (terms, count) = self.terms.list(search, page).await?;
        Ok(Page::new(terms, count, page, uri))
    }
}

// ── CreateTerm ───────────────────────────────────────────────────────────────

pub struct CreateTermUseCase<T: TermRepository> {
    pub terms: T,
}

impl<T: TermRepository> CreateTermUseCase<T> {
    pub async fn execute(&self, input: NewTerm) -> Result<Term, ApiError> {
        let mut errors = FieldErrors::new();
        validate::required(&mut errors, "name", &input.name);
        validate::max_len(&mut errors, "name", &input.name, self.terms.kind().name_max_len());
        validate::slug(&mut errors, &input.slug);
        errors.into_result()?;

        if self.terms.find_by_slug(&input.slug).await?.is_some() {
            return Err(slug_taken().into());
        }
        self.terms.create(&input).await
    }
}

// ── DeleteTerm ───────────────────────────────────────────────────────────────

pub struct DeleteTermUseCase<T: TermRepository> {
    pub terms: T,
}

impl<T: TermRepository> DeleteTermUseCase<T> {
    pub async fn execute(&self, slug: &str) -> Result<(), ApiError> {
        if self.terms.delete(slug).await? {
            Ok(())
        } else {
            Err(not_found(self.terms.kind()))
        }
    }
}
