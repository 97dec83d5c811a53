use yamdb_api::domain::types::UserPatch;
use yamdb_api::error::ApiError;
use yamdb_api::usecase::user::{
    AuthenticateUseCase, CreateUserUseCase, DeleteUserUseCase, GetUserUseCase, ListUsersUseCase, UpdateMeUseCase,
    UpdateUserUseCase,
};
use yamdb_domain::pagination::PageRequest;
use yamdb_domain::user::UserRole;
use yamdb_testing::auth::MockAuth;

use crate::helpers::{MockUserRepo, test_user};

fn patch_role(role: UserRole) -> UserPatch {
    UserPatch {
        role: Some(role),
        ..Default::default()
    }
}

#[tokio::test]
async fn should_create_user_with_role() {
    let usecase = CreateUserUseCase {
        users: MockUserRepo::empty(),
    };
    let patch = UserPatch {
        username: Some("mod".to_owned()),
        email: Some("mod@x.com".to_owned()),
        role: Some(UserRole::Moderator),
        bio: Some("keeps order".to_owned()),
        ..Default::default()
    };

    let user = usecase.execute(patch).await.unwrap();

    assert_eq!(user.role, UserRole::Moderator);
    assert_eq!(user.bio, "keeps order");
    assert!(!user.is_staff);
}

#[tokio::test]
async fn should_require_username_and_email_on_create() {
    let usecase = CreateUserUseCase {
        users: MockUserRepo::empty(),
    };

    let result = usecase.execute(UserPatch::default()).await;

    match result {
        Err(ApiError::Validation(fields)) => {
            assert!(fields.get("username").is_some());
            assert!(fields.get("email").is_some());
        }
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[tokio::test]
async fn should_reject_taken_username_and_email() {
    let alice = test_user("alice", UserRole::User);
    let usecase = CreateUserUseCase {
        users: MockUserRepo::new(vec![alice.clone()]),
    };
    let patch = UserPatch {
        username: Some(alice.username.clone()),
        email: Some(alice.email.clone()),
        ..Default::default()
    };

    let result = usecase.execute(patch).await;

    match result {
        Err(ApiError::Validation(fields)) => {
            assert!(fields.get("username").is_some());
            assert!(fields.get("email").is_some());
        }
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[tokio::test]
async fn should_patch_user_by_username() {
    let repo = MockUserRepo::new(vec![test_user("alice", UserRole::User)]);
    let users = repo.users_handle();
    let usecase = UpdateUserUseCase { users: repo };

    let user = usecase
        .execute("alice", patch_role(UserRole::Moderator), true)
        .await
        .unwrap();

    assert_eq!(user.role, UserRole::Moderator);
    assert_eq!(users.lock().unwrap()[0].role, UserRole::Moderator);
}

#[tokio::test]
async fn put_requires_username_and_email() {
    let usecase = UpdateUserUseCase {
        users: MockUserRepo::new(vec![test_user("alice", UserRole::User)]),
    };

    let result = usecase
        .execute("alice", patch_role(UserRole::Admin), false)
        .await;

    assert!(matches!(result, Err(ApiError::Validation(_))));
}

#[tokio::test]
async fn keeping_own_username_is_not_a_conflict() {
    let alice = test_user("alice", UserRole::User);
    let usecase = UpdateUserUseCase {
        users: MockUserRepo::new(vec![alice.clone()]),
    };
    let patch = UserPatch {
        username: Some(alice.username.clone()),
        email: Some(alice.email.clone()),
        first_name: Some("Alice".to_owned()),
        ..Default::default()
    };

    let user = usecase.execute("alice", patch, false).await.unwrap();

    assert_eq!(user.first_name, "Alice");
}

#[tokio::test]
async fn should_report_missing_user() {
    let users = MockUserRepo::empty();
    let update = UpdateUserUseCase {
        users: users.clone(),
    };
    let delete = DeleteUserUseCase {
        users: users.clone(),
    };
    let get = GetUserUseCase { users };

    assert!(matches!(
        update.execute("ghost", UserPatch::default(), true).await,
        Err(ApiError::UserNotFound)
    ));
    assert!(matches!(
        delete.execute("ghost").await,
        Err(ApiError::UserNotFound)
    ));
    assert!(matches!(
        get.by_username("ghost").await,
        Err(ApiError::UserNotFound)
    ));
}

#[tokio::test]
async fn should_delete_user() {
    let repo = MockUserRepo::new(vec![test_user("alice", UserRole::User)]);
    let users = repo.users_handle();
    let usecase = DeleteUserUseCase { users: repo };

    usecase.execute("alice").await.unwrap();

    assert!(users.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_list_users_by_username() {
    let usecase = ListUsersUseCase {
        users: MockUserRepo::new(vec![
            test_user("carol", UserRole::User),
            test_user("alice", UserRole::Admin),
            test_user("bob", UserRole::Moderator),
        ]),
    };

    let page = usecase
        .execute(PageRequest { per_page: 2, page: 2 }, "/users/?per-page=2&page=2")
        .await
        .unwrap();

    assert_eq!(page.count, 3);
    assert_eq!(page.results[0].username, "carol");
    assert_eq!(page.next, None);
    assert_eq!(page.previous.as_deref(), Some("/users/?per-page=2"));
}

// ── UpdateMeUseCase ──────────────────────────────────────────────────────────

#[tokio::test]
async fn plain_user_cannot_change_own_role() {
    let alice = test_user("alice", UserRole::User);
    let actor = MockAuth::new(alice.id, UserRole::User);
    let usecase = UpdateMeUseCase {
        users: MockUserRepo::new(vec![alice]),
    };
    let patch = UserPatch {
        bio: Some("hello".to_owned()),
        role: Some(UserRole::Admin),
        ..Default::default()
    };

    let user = usecase.execute(&actor.identity(), patch).await.unwrap();

    assert_eq!(user.role, UserRole::User);
    assert_eq!(user.bio, "hello");
}

#[tokio::test]
async fn admin_and_staff_can_change_own_role() {
    for (role, staff) in [(UserRole::Admin, false), (UserRole::User, true)] {
        let me = test_user("boss", role);
        let mut actor = MockAuth::new(me.id, role);
        actor.is_staff = staff;
        let usecase = UpdateMeUseCase {
            users: MockUserRepo::new(vec![me]),
        };

        let user = usecase
            .execute(&actor.identity(), patch_role(UserRole::Moderator))
            .await
            .unwrap();

        assert_eq!(user.role, UserRole::Moderator);
    }
}

#[tokio::test]
async fn me_for_deleted_account_is_not_found() {
    let usecase = UpdateMeUseCase {
        users: MockUserRepo::empty(),
    };

    let result = usecase
        .execute(&MockAuth::user().identity(), UserPatch::default())
        .await;

    assert!(matches!(result, Err(ApiError::UserNotFound)));
}

// ── AuthenticateUseCase ──────────────────────────────────────────────────────

#[tokio::test]
async fn authenticate_uses_stored_role_over_token_claims() {
    let demoted = test_user("former-admin", UserRole::User);
    let mut claims = MockAuth::new(demoted.id, UserRole::Admin);
    claims.is_staff = true;
    let usecase = AuthenticateUseCase {
        users: MockUserRepo::new(vec![demoted.clone()]),
    };

    let actor = usecase.execute(claims.identity()).await.unwrap();

    assert_eq!(actor.user_id, demoted.id);
    assert_eq!(actor.role, UserRole::User);
    assert!(!actor.is_staff);
}

#[tokio::test]
async fn authenticate_picks_up_promotion() {
    let mut promoted = test_user("newmod", UserRole::Moderator);
    promoted.is_staff = true;
    let usecase = AuthenticateUseCase {
        users: MockUserRepo::new(vec![promoted.clone()]),
    };

    let actor = usecase
        .execute(MockAuth::new(promoted.id, UserRole::User).identity())
        .await
        .unwrap();

    assert_eq!(actor.role, UserRole::Moderator);
    assert!(actor.is_staff);
}

#[tokio::test]
async fn authenticate_rejects_token_of_deleted_account() {
    let usecase = AuthenticateUseCase {
        users: MockUserRepo::empty(),
    };

    let result = usecase.execute(MockAuth::admin().identity()).await;

    assert!(matches!(result, Err(ApiError::NotAuthenticated)));
}
