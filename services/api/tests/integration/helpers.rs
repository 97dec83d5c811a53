use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use yamdb_api::domain::repository::{
    CommentRepository, ReviewRepository, TermRepository, TitleRepository, UserRepository,
};
use yamdb_api::domain::types::{
    Comment, NewComment, NewReview, NewTerm, OutboxEvent, Review, Term, TermKind, Title,
    TitleFilter, TitleRecord, User,
};
use yamdb_api::error::ApiError;
use yamdb_domain::pagination::PageRequest;
use yamdb_domain::user::UserRole;

pub const TEST_JWT_SECRET: &str = "test-secret";

fn page_of<T: Clone>(items: &[T], page: PageRequest) -> (Vec<T>, u64) {
    let per_page = page.per_page as usize;
    let start = page.index() as usize * per_page;
    let slice = items.iter().skip(start).take(per_page).cloned().collect();
    (slice, items.len() as u64)
}

pub fn test_user(username: &str, role: UserRole) -> User {
    let mut user = User::new(username.to_owned(), format!("{username}@example.com"));
    user.role = role;
    user
}

pub fn term(id: i32, name: &str, slug: &str) -> Term {
    Term {
        id,
        name: name.to_owned(),
        slug: slug.to_owned(),
    }
}

pub fn test_title(id: i32, name: &str) -> Title {
    Title {
        id,
        name: name.to_owned(),
        year: 1965,
        description: String::new(),
        genres: vec![],
        category: None,
        rating: None,
    }
}

pub fn test_review(id: i32, title_id: i32, author_id: Uuid, score: i16) -> Review {
    Review {
        id,
        title_id,
        author_id: Some(author_id),
        author: None,
        text: format!("review {id}"),
        score,
        pub_date: Utc::now(),
    }
}

pub fn test_comment(id: i32, review_id: i32, author_id: Uuid) -> Comment {
    Comment {
        id,
        review_id,
        author_id: Some(author_id),
        author: None,
        text: format!("comment {id}"),
        pub_date: Utc::now(),
    }
}

// ── MockUserRepo ─────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
    pub events: Arc<Mutex<Vec<OutboxEvent>>>,
}

impl MockUserRepo {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
            events: Arc::default(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns a shared handle to the stored users for post-execution inspection.
    pub fn users_handle(&self) -> Arc<Mutex<Vec<User>>> {
        Arc::clone(&self.users)
    }

    pub fn events_handle(&self) -> Arc<Mutex<Vec<OutboxEvent>>> {
        Arc::clone(&self.events)
    }

    fn find(&self, pred: impl Fn(&User) -> bool) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| pred(u)).cloned()
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        Ok(self.find(|u| u.id == id))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError> {
        Ok(self.find(|u| u.username == username))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        Ok(self.find(|u| u.email == email))
    }

    async fn list(&self, page: PageRequest) -> Result<(Vec<User>, u64), ApiError> {
        let mut users = self.users.lock().unwrap().clone();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(page_of(&users, page))
    }

    async fn create(&self, user: &User) -> Result<(), ApiError> {
        self.users.lock().unwrap().push(user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), ApiError> {
        let mut users = self.users.lock().unwrap();
        if let Some(stored) = users.iter_mut().find(|u| u.id == user.id) {
            *stored = user.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() < before)
    }

    async fn create_with_outbox(&self, user: &User, event: &OutboxEvent) -> Result<(), ApiError> {
        self.users.lock().unwrap().push(user.clone());
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn store_confirmation_code(
        &self,
        user_id: Uuid,
        code: &str,
        event: &OutboxEvent,
    ) -> Result<(), ApiError> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == user_id) {
            user.confirmation_code = Some(code.to_owned());
        }
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn consume_confirmation_code(
        &self,
        email: &str,
        code: &str,
    ) -> Result<Option<User>, ApiError> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users
            .iter_mut()
            .find(|u| u.email == email && u.confirmation_code.as_deref() == Some(code))
        else {
            return Ok(None);
        };
        user.email_confirmed = true;
        user.confirmation_code = None;
        Ok(Some(user.clone()))
    }
}

// ── MockTermRepo ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockTermRepo {
    pub kind: TermKind,
    pub terms: Arc<Mutex<Vec<Term>>>,
    /// Slugs that titles still reference.
    pub in_use: Vec<String>,
}

impl MockTermRepo {
    pub fn new(kind: TermKind, terms: Vec<Term>) -> Self {
        Self {
            kind,
            terms: Arc::new(Mutex::new(terms)),
            in_use: vec![],
        }
    }

    pub fn genres(terms: Vec<Term>) -> Self {
        Self::new(TermKind::Genre, terms)
    }

    pub fn categories(terms: Vec<Term>) -> Self {
        Self::new(TermKind::Category, terms)
    }

    pub fn terms_handle(&self) -> Arc<Mutex<Vec<Term>>> {
        Arc::clone(&self.terms)
    }
}

impl TermRepository for MockTermRepo {
    fn kind(&self) -> TermKind {
        self.kind
    }

    async fn list(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<(Vec<Term>, u64), ApiError> {
        let mut terms: Vec<Term> = self
            .terms
            .lock()
            .unwrap()
            .iter()
            .filter(|t| search.is_none_or(|s| t.name.to_lowercase().contains(&s.to_lowercase())))
            .cloned()
            .collect();
        terms.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(page_of(&terms, page))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Term>, ApiError> {
        Ok(self
            .terms
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.slug == slug)
            .cloned())
    }

    async fn find_by_slugs(&self, slugs: &[String]) -> Result<Vec<Term>, ApiError> {
        Ok(self
            .terms
            .lock()
            .unwrap()
            .iter()
            .filter(|t| slugs.contains(&t.slug))
            .cloned()
            .collect())
    }

    async fn create(&self, term: &NewTerm) -> Result<Term, ApiError> {
        let mut terms = self.terms.lock().unwrap();
        let created = Term {
            id: terms.iter().map(|t| t.id).max().unwrap_or(0) + 1,
            name: term.name.clone(),
            slug: term.slug.clone(),
        };
        terms.push(created.clone());
        Ok(created)
    }

    async fn delete(&self, slug: &str) -> Result<bool, ApiError> {
        if self.in_use.iter().any(|s| s == slug) {
            return Err(ApiError::CategoryInUse);
        }
        let mut terms = self.terms.lock().unwrap();
        let before = terms.len();
        terms.retain(|t| t.slug != slug);
        Ok(terms.len() < before)
    }
}

// ── MockTitleRepo ────────────────────────────────────────────────────────────

/// Hydrates written records from its own genre and category lists.
#[derive(Clone, Default)]
pub struct MockTitleRepo {
    pub titles: Arc<Mutex<Vec<Title>>>,
    pub genres: Vec<Term>,
    pub categories: Vec<Term>,
}

impl MockTitleRepo {
    pub fn new(titles: Vec<Title>) -> Self {
        Self {
            titles: Arc::new(Mutex::new(titles)),
            ..Default::default()
        }
    }

    pub fn with_terms(mut self, genres: Vec<Term>, categories: Vec<Term>) -> Self {
        self.genres = genres;
        self.categories = categories;
        self
    }

    pub fn titles_handle(&self) -> Arc<Mutex<Vec<Title>>> {
        Arc::clone(&self.titles)
    }

    fn hydrate(&self, id: i32, record: &TitleRecord) -> Title {
        Title {
            id,
            name: record.name.clone(),
            year: record.year,
            description: record.description.clone(),
            genres: self
                .genres
                .iter()
                .filter(|g| record.genre_ids.contains(&g.id))
                .cloned()
                .collect(),
            category: record
                .category_id
                .and_then(|id| self.categories.iter().find(|c| c.id == id).cloned()),
            rating: None,
        }
    }
}

impl TitleRepository for MockTitleRepo {
    async fn list(
        &self,
        filter: &TitleFilter,
        page: PageRequest,
    ) -> Result<(Vec<Title>, u64), ApiError> {
        let titles: Vec<Title> = self
            .titles
            .lock()
            .unwrap()
            .iter()
            .filter(|t| {
                filter
                    .name
                    .as_ref()
                    .is_none_or(|n| t.name.to_lowercase().contains(&n.to_lowercase()))
            })
            .filter(|t| filter.year.is_none_or(|y| t.year == y))
            .filter(|t| {
                filter
                    .genre
                    .as_ref()
                    .is_none_or(|slug| t.genres.iter().any(|g| &g.slug == slug))
            })
            .filter(|t| {
                filter
                    .category
                    .as_ref()
                    .is_none_or(|slug| t.category.as_ref().is_some_and(|c| &c.slug == slug))
            })
            .cloned()
            .collect();
        Ok(page_of(&titles, page))
    }

    async fn find(&self, id: i32) -> Result<Option<Title>, ApiError> {
        Ok(self
            .titles
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned())
    }

    async fn exists(&self, id: i32) -> Result<bool, ApiError> {
        Ok(self.titles.lock().unwrap().iter().any(|t| t.id == id))
    }

    async fn create(&self, record: &TitleRecord) -> Result<Title, ApiError> {
        let mut titles = self.titles.lock().unwrap();
        let id = titles.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        let title = self.hydrate(id, record);
        titles.push(title.clone());
        Ok(title)
    }

    async fn update(&self, id: i32, record: &TitleRecord) -> Result<Title, ApiError> {
        let title = self.hydrate(id, record);
        let mut titles = self.titles.lock().unwrap();
        if let Some(stored) = titles.iter_mut().find(|t| t.id == id) {
            *stored = title.clone();
        }
        Ok(title)
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let mut titles = self.titles.lock().unwrap();
        let before = titles.len();
        titles.retain(|t| t.id != id);
        Ok(titles.len() < before)
    }
}

// ── MockReviewRepo ───────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockReviewRepo {
    pub reviews: Arc<Mutex<Vec<Review>>>,
}

impl MockReviewRepo {
    pub fn new(reviews: Vec<Review>) -> Self {
        Self {
            reviews: Arc::new(Mutex::new(reviews)),
        }
    }

    pub fn reviews_handle(&self) -> Arc<Mutex<Vec<Review>>> {
        Arc::clone(&self.reviews)
    }
}

impl ReviewRepository for MockReviewRepo {
    async fn list(
        &self,
        title_id: i32,
        page: PageRequest,
    ) -> Result<(Vec<Review>, u64), ApiError> {
        let reviews: Vec<Review> = self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.title_id == title_id)
            .cloned()
            .collect();
        Ok(page_of(&reviews, page))
    }

    async fn find(&self, title_id: i32, id: i32) -> Result<Option<Review>, ApiError> {
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.title_id == title_id && r.id == id)
            .cloned())
    }

    async fn exists_by_author(&self, title_id: i32, author_id: Uuid) -> Result<bool, ApiError> {
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .any(|r| r.title_id == title_id && r.author_id == Some(author_id)))
    }

    async fn create(&self, review: &NewReview) -> Result<Review, ApiError> {
        let mut reviews = self.reviews.lock().unwrap();
        let created = Review {
            id: reviews.iter().map(|r| r.id).max().unwrap_or(0) + 1,
            title_id: review.title_id,
            author_id: Some(review.author_id),
            author: None,
            text: review.text.clone(),
            score: review.score,
            pub_date: Utc::now(),
        };
        reviews.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: i32, text: &str, score: i16) -> Result<Review, ApiError> {
        let mut reviews = self.reviews.lock().unwrap();
        let review = reviews
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(ApiError::ReviewNotFound)?;
        review.text = text.to_owned();
        review.score = score;
        Ok(review.clone())
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let mut reviews = self.reviews.lock().unwrap();
        let before = reviews.len();
        reviews.retain(|r| r.id != id);
        Ok(reviews.len() < before)
    }
}

// ── MockCommentRepo ──────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockCommentRepo {
    pub comments: Arc<Mutex<Vec<Comment>>>,
}

impl MockCommentRepo {
    pub fn new(comments: Vec<Comment>) -> Self {
        Self {
            comments: Arc::new(Mutex::new(comments)),
        }
    }

    pub fn comments_handle(&self) -> Arc<Mutex<Vec<Comment>>> {
        Arc::clone(&self.comments)
    }
}

impl CommentRepository for MockCommentRepo {
    async fn list(
        &self,
        review_id: i32,
        page: PageRequest,
    ) -> Result<(Vec<Comment>, u64), ApiError> {
        let comments: Vec<Comment> = self
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.review_id == review_id)
            .cloned()
            .collect();
        Ok(page_of(&comments, page))
    }

    async fn find(&self, review_id: i32, id: i32) -> Result<Option<Comment>, ApiError> {
        Ok(self
            .comments
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.review_id == review_id && c.id == id)
            .cloned())
    }

    async fn create(&self, comment: &NewComment) -> Result<Comment, ApiError> {
        let mut comments = self.comments.lock().unwrap();
        let created = Comment {
            id: comments.iter().map(|c| c.id).max().unwrap_or(0) + 1,
            review_id: comment.review_id,
            author_id: Some(comment.author_id),
            author: None,
            text: comment.text.clone(),
            pub_date: Utc::now(),
        };
        comments.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: i32, text: &str) -> Result<Comment, ApiError> {
        let mut comments = self.comments.lock().unwrap();
        let comment = comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(ApiError::CommentNotFound)?;
        comment.text = text.to_owned();
        Ok(comment.clone())
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let mut comments = self.comments.lock().unwrap();
        let before = comments.len();
        comments.retain(|c| c.id != id);
        Ok(comments.len() < before)
    }
}
