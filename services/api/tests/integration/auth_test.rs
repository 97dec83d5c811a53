use yamdb_api::domain::types::{CONFIRMATION_CODE_EVENT, CONFIRMATION_CODE_LEN};
use yamdb_api::error::ApiError;
use yamdb_api::usecase::auth::{
    ConfirmEmailInput, ConfirmEmailUseCase, SignupInput, SignupUseCase,
};
use yamdb_api::usecase::token::{
    ObtainTokenInput, ObtainTokenUseCase, RefreshTokenUseCase, issue_token_pair,
};
use yamdb_api::usecase::user::{CreateSuperuserInput, CreateSuperuserUseCase};
use yamdb_auth_types::token::{validate_access_token, validate_refresh_token};
use yamdb_domain::user::UserRole;

use crate::helpers::{MockUserRepo, TEST_JWT_SECRET, test_user};

fn signup(email: &str, username: &str) -> SignupInput {
    SignupInput {
        email: email.to_owned(),
        username: username.to_owned(),
    }
}

// ── SignupUseCase ────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_user_with_code_and_outbox_event() {
    let repo = MockUserRepo::empty();
    let users = repo.users_handle();
    let events = repo.events_handle();
    let usecase = SignupUseCase { users: repo };

    let out = usecase.execute(signup("a@x.com", "alice")).await.unwrap();

    assert_eq!(out.email, "a@x.com");
    assert_eq!(out.username, "alice");

    let users = users.lock().unwrap();
    assert_eq!(users.len(), 1);
    let code = users[0].confirmation_code.clone().unwrap();
    assert_eq!(code.len(), CONFIRMATION_CODE_LEN);
    assert!(!users[0].email_confirmed);
    assert_eq!(users[0].role, UserRole::User);

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, CONFIRMATION_CODE_EVENT);
    assert_eq!(events[0].payload["confirmation_code"], code.as_str());
}

#[tokio::test]
async fn should_reissue_code_when_email_and_username_match() {
    let mut existing = test_user("alice", UserRole::User);
    existing.confirmation_code = Some("old".to_owned());
    let email = existing.email.clone();
    let repo = MockUserRepo::new(vec![existing]);
    let users = repo.users_handle();
    let events = repo.events_handle();
    let usecase = SignupUseCase { users: repo };

    usecase.execute(signup(&email, "alice")).await.unwrap();

    let users = users.lock().unwrap();
    assert_eq!(users.len(), 1);
    assert_ne!(users[0].confirmation_code.as_deref(), Some("old"));
    assert_eq!(events.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_signup_with_taken_email() {
    let existing = test_user("alice", UserRole::User);
    let email = existing.email.clone();
    let usecase = SignupUseCase {
        users: MockUserRepo::new(vec![existing]),
    };

    let result = usecase.execute(signup(&email, "bob")).await;

    match result {
        Err(ApiError::Validation(fields)) => {
            assert!(fields.get("email").is_some());
            assert!(fields.get("username").is_none());
        }
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[tokio::test]
async fn should_reject_signup_with_reserved_username() {
    let usecase = SignupUseCase {
        users: MockUserRepo::empty(),
    };

    let result = usecase.execute(signup("me@x.com", "me")).await;

    assert!(
        matches!(&result, Err(ApiError::Validation(f)) if f.get("username").is_some()),
        "expected username error, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_signup_with_invalid_email() {
    let usecase = SignupUseCase {
        users: MockUserRepo::empty(),
    };

    let result = usecase.execute(signup("not-an-email", "alice")).await;

    assert!(
        matches!(&result, Err(ApiError::Validation(f)) if f.get("email").is_some()),
        "expected email error, got {result:?}"
    );
}

// ── ConfirmEmailUseCase ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_confirm_email_and_issue_token_pair() {
    let repo = MockUserRepo::empty();
    let users = repo.users_handle();
    SignupUseCase {
        users: repo.clone(),
    }
    .execute(signup("a@x.com", "alice"))
    .await
    .unwrap();
    let code = users.lock().unwrap()[0].confirmation_code.clone().unwrap();

    let usecase = ConfirmEmailUseCase {
        users: repo,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let pair = usecase
        .execute(ConfirmEmailInput {
            email: "a@x.com".to_owned(),
            confirmation_code: code,
        })
        .await
        .unwrap();

    let user = users.lock().unwrap()[0].clone();
    assert!(user.email_confirmed);
    assert_eq!(user.confirmation_code, None);

    let access = validate_access_token(&pair.access, TEST_JWT_SECRET).unwrap();
    assert_eq!(access.user_id, user.id);
    assert_eq!(access.role, UserRole::User);
    let refresh = validate_refresh_token(&pair.refresh, TEST_JWT_SECRET).unwrap();
    assert_eq!(refresh.user_id, user.id);
}

#[tokio::test]
async fn should_reject_wrong_confirmation_code() {
    let mut user = test_user("alice", UserRole::User);
    user.confirmation_code = Some("right".to_owned());
    let email = user.email.clone();
    let repo = MockUserRepo::new(vec![user]);
    let users = repo.users_handle();
    let usecase = ConfirmEmailUseCase {
        users: repo,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = usecase
        .execute(ConfirmEmailInput {
            email,
            confirmation_code: "wrong".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(ApiError::InvalidConfirmationCode)),
        "expected InvalidConfirmationCode, got {result:?}"
    );
    assert!(!users.lock().unwrap()[0].email_confirmed);
}

#[tokio::test]
async fn should_not_accept_a_code_twice() {
    let mut user = test_user("alice", UserRole::User);
    user.confirmation_code = Some("once".to_owned());
    let email = user.email.clone();
    let usecase = ConfirmEmailUseCase {
        users: MockUserRepo::new(vec![user]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let input = || ConfirmEmailInput {
        email: email.clone(),
        confirmation_code: "once".to_owned(),
    };

    usecase.execute(input()).await.unwrap();
    let second = usecase.execute(input()).await;

    assert!(matches!(second, Err(ApiError::InvalidConfirmationCode)));
}

#[tokio::test]
async fn concurrent_confirmations_accept_the_code_once() {
    let mut user = test_user("alice", UserRole::User);
    user.confirmation_code = Some("once".to_owned());
    let email = user.email.clone();
    let usecase = ConfirmEmailUseCase {
        users: MockUserRepo::new(vec![user]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let input = || ConfirmEmailInput {
        email: email.clone(),
        confirmation_code: "once".to_owned(),
    };

    let (first, second) = tokio::join!(usecase.execute(input()), usecase.execute(input()));

    let accepted = [&first, &second].iter().filter(|r| r.is_ok()).count();
    assert_eq!(accepted, 1, "got {first:?} and {second:?}");
    assert!(
        matches!(first, Err(ApiError::InvalidConfirmationCode))
            || matches!(second, Err(ApiError::InvalidConfirmationCode))
    );
}

#[tokio::test]
async fn code_of_another_account_is_rejected() {
    let mut alice = test_user("alice", UserRole::User);
    alice.confirmation_code = Some("alice-code".to_owned());
    let mut bob = test_user("bob", UserRole::User);
    bob.confirmation_code = Some("bob-code".to_owned());
    let bob_email = bob.email.clone();
    let repo = MockUserRepo::new(vec![alice, bob]);
    let users = repo.users_handle();
    let usecase = ConfirmEmailUseCase {
        users: repo,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = usecase
        .execute(ConfirmEmailInput {
            email: bob_email,
            confirmation_code: "alice-code".to_owned(),
        })
        .await;

    assert!(matches!(result, Err(ApiError::InvalidConfirmationCode)));
    let users = users.lock().unwrap();
    assert!(users.iter().all(|u| !u.email_confirmed));
    assert_eq!(users[0].confirmation_code.as_deref(), Some("alice-code"));
}

#[tokio::test]
async fn should_reject_code_for_unknown_email() {
    let usecase = ConfirmEmailUseCase {
        users: MockUserRepo::empty(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = usecase
        .execute(ConfirmEmailInput {
            email: "ghost@x.com".to_owned(),
            confirmation_code: "x".to_owned(),
        })
        .await;

    assert!(matches!(result, Err(ApiError::InvalidConfirmationCode)));
}

// ── ObtainTokenUseCase / CreateSuperuserUseCase ──────────────────────────────

#[tokio::test]
async fn superuser_can_obtain_tokens_with_password() {
    let repo = MockUserRepo::empty();
    let admin = CreateSuperuserUseCase { users: repo.clone() }
        .execute(CreateSuperuserInput {
            username: "root".to_owned(),
            email: "root@x.com".to_owned(),
            password: "hunter22".to_owned(),
        })
        .await
        .unwrap();
    assert_eq!(admin.role, UserRole::Admin);
    assert!(admin.is_staff);
    assert!(admin.email_confirmed);
    assert_ne!(admin.password_hash.as_deref(), Some("hunter22"));

    let usecase = ObtainTokenUseCase {
        users: repo,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let pair = usecase
        .execute(ObtainTokenInput {
            username: "root".to_owned(),
            password: "hunter22".to_owned(),
        })
        .await
        .unwrap();

    let info = validate_access_token(&pair.access, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.user_id, admin.id);
    assert_eq!(info.role, UserRole::Admin);
    assert!(info.is_staff);
}

#[tokio::test]
async fn should_reject_wrong_password() {
    let repo = MockUserRepo::empty();
    CreateSuperuserUseCase { users: repo.clone() }
        .execute(CreateSuperuserInput {
            username: "root".to_owned(),
            email: "root@x.com".to_owned(),
            password: "hunter22".to_owned(),
        })
        .await
        .unwrap();
    let usecase = ObtainTokenUseCase {
        users: repo,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = usecase
        .execute(ObtainTokenInput {
            username: "root".to_owned(),
            password: "hunter2".to_owned(),
        })
        .await;

    assert!(matches!(result, Err(ApiError::InvalidCredentials)));
}

#[tokio::test]
async fn should_reject_password_login_for_code_only_account() {
    let usecase = ObtainTokenUseCase {
        users: MockUserRepo::new(vec![test_user("alice", UserRole::User)]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = usecase
        .execute(ObtainTokenInput {
            username: "alice".to_owned(),
            password: "anything".to_owned(),
        })
        .await;

    assert!(matches!(result, Err(ApiError::InvalidCredentials)));
}

#[tokio::test]
async fn should_reject_superuser_without_password() {
    let usecase = CreateSuperuserUseCase {
        users: MockUserRepo::empty(),
    };

    let result = usecase
        .execute(CreateSuperuserInput {
            username: "root".to_owned(),
            email: "root@x.com".to_owned(),
            password: String::new(),
        })
        .await;

    assert!(matches!(&result, Err(ApiError::Validation(f)) if f.get("password").is_some()));
}

// ── RefreshTokenUseCase ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_refresh_access_token_with_current_role() {
    let mut user = test_user("alice", UserRole::User);
    let pair = issue_token_pair(&user, TEST_JWT_SECRET).unwrap();
    user.role = UserRole::Moderator;
    let user_id = user.id;

    let usecase = RefreshTokenUseCase {
        users: MockUserRepo::new(vec![user]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let out = usecase.execute(&pair.refresh).await.unwrap();

    let info = validate_access_token(&out.access, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.user_id, user_id);
    assert_eq!(info.role, UserRole::Moderator);
}

#[tokio::test]
async fn should_not_refresh_with_access_token() {
    let user = test_user("alice", UserRole::User);
    let pair = issue_token_pair(&user, TEST_JWT_SECRET).unwrap();
    let usecase = RefreshTokenUseCase {
        users: MockUserRepo::new(vec![user]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = usecase.execute(&pair.access).await;

    assert!(matches!(result, Err(ApiError::InvalidToken)));
}

#[tokio::test]
async fn should_not_refresh_for_deleted_user() {
    let user = test_user("alice", UserRole::User);
    let pair = issue_token_pair(&user, TEST_JWT_SECRET).unwrap();
    let usecase = RefreshTokenUseCase {
        users: MockUserRepo::empty(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = usecase.execute(&pair.refresh).await;

    assert!(matches!(result, Err(ApiError::InvalidToken)));
}
