pub mod auth;
pub mod comment;
pub mod review;
pub mod taxonomy;
pub mod title;
pub mod token;
pub mod user;
