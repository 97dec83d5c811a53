use yamdb_api::error::ApiError;
use yamdb_api::usecase::comment::CommentUseCase;
use yamdb_domain::pagination::PageRequest;
use yamdb_testing::auth::MockAuth;

use crate::helpers::{
    MockCommentRepo, MockReviewRepo, MockTitleRepo, test_comment, test_review, test_title,
};

type Comments = CommentUseCase<MockTitleRepo, MockReviewRepo, MockCommentRepo>;

/// Title 1 with review 10; title 2 with review 20; comment 100 on review 10.
fn usecase(author: &MockAuth) -> (Comments, MockCommentRepo) {
    let comments = MockCommentRepo::new(vec![test_comment(100, 10, author.user_id)]);
    let usecase = CommentUseCase {
        titles: MockTitleRepo::new(vec![test_title(1, "Dune"), test_title(2, "Solaris")]),
        reviews: MockReviewRepo::new(vec![
            test_review(10, 1, author.user_id, 7),
            test_review(20, 2, author.user_id, 4),
        ]),
        comments: comments.clone(),
    };
    (usecase, comments)
}

#[tokio::test]
async fn should_create_comment_for_authenticated_user() {
    let alice = MockAuth::user();
    let bob = MockAuth::user();
    let (usecase, comments) = usecase(&alice);

    let comment = usecase
        .create(Some(&bob.identity()), 1, 10, Some("Agreed".to_owned()))
        .await
        .unwrap();

    assert_eq!(comment.review_id, 10);
    assert_eq!(comment.author_id, Some(bob.user_id));
    assert_eq!(comments.comments_handle().lock().unwrap().len(), 2);
}

#[tokio::test]
async fn should_allow_many_comments_by_same_author() {
    let alice = MockAuth::user();
    let (usecase, _) = usecase(&alice);

    for text in ["one", "two"] {
        usecase
            .create(Some(&alice.identity()), 1, 10, Some(text.to_owned()))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn should_reject_anonymous_comment() {
    let alice = MockAuth::user();
    let (usecase, _) = usecase(&alice);

    let result = usecase.create(None, 1, 10, Some("hi".to_owned())).await;

    assert!(matches!(result, Err(ApiError::NotAuthenticated)));
}

#[tokio::test]
async fn should_reject_blank_or_missing_text() {
    let alice = MockAuth::user();
    let (usecase, _) = usecase(&alice);

    for text in [None, Some("   ".to_owned())] {
        let result = usecase.create(Some(&alice.identity()), 1, 10, text).await;
        assert!(matches!(&result, Err(ApiError::Validation(f)) if f.get("text").is_some()));
    }
}

#[tokio::test]
async fn review_must_belong_to_title() {
    let alice = MockAuth::user();
    let (usecase, _) = usecase(&alice);

    let result = usecase
        .create(Some(&alice.identity()), 1, 20, Some("hi".to_owned()))
        .await;

    assert!(matches!(result, Err(ApiError::ReviewNotFound)));
}

#[tokio::test]
async fn comment_must_belong_to_review() {
    let alice = MockAuth::user();
    let (usecase, _) = usecase(&alice);

    assert!(matches!(
        usecase.get(2, 20, 100).await,
        Err(ApiError::CommentNotFound)
    ));
    assert_eq!(usecase.get(1, 10, 100).await.unwrap().id, 100);
}

#[tokio::test]
async fn patch_without_text_keeps_it() {
    let alice = MockAuth::user();
    let (usecase, _) = usecase(&alice);

    let comment = usecase
        .update(Some(&alice.identity()), (1, 10, 100), None, true)
        .await
        .unwrap();

    assert_eq!(comment.text, "comment 100");
}

#[tokio::test]
async fn other_user_cannot_edit_or_delete_comment() {
    let alice = MockAuth::user();
    let bob = MockAuth::user();
    let (usecase, _) = usecase(&alice);

    let edit = usecase
        .update(Some(&bob.identity()), (1, 10, 100), Some("x".to_owned()), false)
        .await;
    let delete = usecase.delete(Some(&bob.identity()), (1, 10, 100)).await;

    assert!(matches!(edit, Err(ApiError::Forbidden)));
    assert!(matches!(delete, Err(ApiError::Forbidden)));
}

#[tokio::test]
async fn moderator_can_delete_any_comment() {
    let alice = MockAuth::user();
    let (usecase, comments) = usecase(&alice);

    usecase
        .delete(Some(&MockAuth::moderator().identity()), (1, 10, 100))
        .await
        .unwrap();

    assert!(comments.comments_handle().lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_list_comments_of_review() {
    let alice = MockAuth::user();
    let (usecase, _) = usecase(&alice);

    let page = usecase
        .list(1, 10, PageRequest::default(), "/titles/1/reviews/10/comments/")
        .await
        .unwrap();

    assert_eq!(page.count, 1);
    assert_eq!(page.results[0].id, 100);

    let missing = usecase
        .list(3, 10, PageRequest::default(), "/titles/3/reviews/10/comments/")
        .await;
    assert!(matches!(missing, Err(ApiError::TitleNotFound)));
}
