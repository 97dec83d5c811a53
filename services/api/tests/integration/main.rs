mod helpers;

mod auth_test;
mod comment_test;
mod user_test;
