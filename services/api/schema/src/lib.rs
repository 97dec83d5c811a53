//! sea-orm entities for the YaMDb API database.

pub mod categories;
pub mod comments;
pub mod genres;
pub mod mail_outbox;
pub mod reviews;
pub mod title_genres;
pub mod titles;
pub mod users;
