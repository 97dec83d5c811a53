use uuid::Uuid;
use yamdb_auth_types::identity::Identity;
use yamdb_domain::pagination::{Page, PageRequest};
use yamdb_domain::user::UserRole;
use yamdb_domain::validation::FieldErrors;

use crate::domain::repository::UserRepository;
use crate::domain::types::{BIO_MAX, PERSON_NAME_MAX, User, UserPatch};
use crate::domain::validate;
use crate::error::ApiError;
use crate::infra::password::hash_password;

/// Validate `patch`, apply it to `user` and check that a changed username or
/// email is still free.
async fn apply_patch<U: UserRepository>(
    users: &U,
    user: &mut User,
    patch: UserPatch,
) -> Result<(), ApiError> {
    let mut errors = FieldErrors::new();

    if let Some(username) = patch.username {
        validate::username(&mut errors, &username);
        if username != user.username {
            let taken = users.find_by_username(&username).await?;
            if taken.is_some_and(|other| other.id != user.id) {
                errors.add("username", "user with this username already exists");
            }
        }
        user.username = username;
    }
    if let Some(email) = patch.email {
        validate::email(&mut errors, &email);
        if email != user.email {
            let taken = users.find_by_email(&email).await?;
            if taken.is_some_and(|other| other.id != user.id) {
                errors.add("email", "user with this email already exists");
            }
        }
        user.email = email;
    }
    if let Some(first_name) = patch.first_name {
        validate::max_len(&mut errors, "first_name", &first_name, PERSON_NAME_MAX);
        user.first_name = first_name;
    }
    if let Some(last_name) = patch.last_name {
        validate::max_len(&mut errors, "last_name", &last_name, PERSON_NAME_MAX);
        user.last_name = last_name;
    }
    if let Some(bio) = patch.bio {
        validate::max_len(&mut errors, "bio", &bio, BIO_MAX);
        user.bio = bio;
    }
    if let Some(role) = patch.role {
        user.role = role;
    }

    errors.into_result().map_err(ApiError::from)
}

fn require_identity_fields(patch: &UserPatch) -> Result<(), ApiError> {
    let mut errors = FieldErrors::new();
    if patch.username.is_none() {
        errors.add("username", "this field is required");
    }
    if patch.email.is_none() {
        errors.add("email", "this field is required");
    }
    errors.into_result().map_err(ApiError::from)
}

// ── Authenticate ─────────────────────────────────────────────────────────────

pub struct AuthenticateUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> AuthenticateUseCase<U> {
    /// Rebuild the caller from the stored account named by a verified token.
    /// Role and staff flag come from the row, not the claims; an account
    /// deleted since the token was issued is no longer authenticated.
    pub async fn execute(&self, claimed: Identity) -> Result<Identity, ApiError> {
        let user = self
            .users
            .find_by_id(claimed.user_id)
            .await?
            .ok_or(ApiError::NotAuthenticated)?;
        Ok(Identity {
            user_id: user.id,
            role: user.role,
            is_staff: user.is_staff,
        })
    }
}

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> ListUsersUseCase<U> {
    pub async fn execute(&self, page: PageRequest, uri: &str) -> Result<Page<User>, ApiError> {
        let (users, count) = self.users.list(page).await?;
        Ok(Page::new(users, count, page, uri))
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> GetUserUseCase<U> {
    pub async fn by_username(&self, username: &str) -> Result<User, ApiError> {
        self.users
            .find_by_username(username)
            .await?
            .ok_or(ApiError::UserNotFound)
    }

    pub async fn by_id(&self, id: Uuid) -> Result<User, ApiError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(ApiError::UserNotFound)
    }
}

// ── CreateUser ───────────────────────────────────────────────────────────────

pub struct CreateUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> CreateUserUseCase<U> {
    /// `username` and `email` are required; everything else defaults.
    pub async fn execute(&self, patch: UserPatch) -> Result<User, ApiError> {
        require_identity_fields(&patch)?;
        let mut user = User::new(String::new(), String::new());
        apply_patch(&self.users, &mut user, patch).await?;
        self.users.create(&user).await?;
        Ok(user)
    }
}

// ── CreateSuperuser ──────────────────────────────────────────────────────────

pub struct CreateSuperuserInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub struct CreateSuperuserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> CreateSuperuserUseCase<U> {
    /// Admin with staff flag, confirmed email and a password for the token
    /// endpoint.
    pub async fn execute(&self, input: CreateSuperuserInput) -> Result<User, ApiError> {
        if input.password.is_empty() {
            return Err(FieldErrors::single("password", "this field may not be blank").into());
        }
        let mut user = User::new(String::new(), String::new());
        let patch = UserPatch {
            username: Some(input.username),
            email: Some(input.email),
            role: Some(UserRole::Admin),
            ..Default::default()
        };
        apply_patch(&self.users, &mut user, patch).await?;
        user.is_staff = true;
        user.email_confirmed = true;
        user.password_hash = Some(hash_password(&input.password)?);
        self.users.create(&user).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "superuser created");
        Ok(user)
    }
}

// ── UpdateUser ───────────────────────────────────────────────────────────────

pub struct UpdateUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> UpdateUserUseCase<U> {
    /// `partial` is PATCH semantics; PUT requires `username` and `email`.
    pub async fn execute(
        &self,
        username: &str,
        patch: UserPatch,
        partial: bool,
    ) -> Result<User, ApiError> {
        let mut user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        if !partial {
            require_identity_fields(&patch)?;
        }
        apply_patch(&self.users, &mut user, patch).await?;
        self.users.update(&user).await?;
        Ok(user)
    }
}

// ── DeleteUser ───────────────────────────────────────────────────────────────

pub struct DeleteUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> DeleteUserUseCase<U> {
    pub async fn execute(&self, username: &str) -> Result<(), ApiError> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        self.users.delete(user.id).await?;
        Ok(())
    }
}

// ── UpdateMe ─────────────────────────────────────────────────────────────────

pub struct UpdateMeUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> UpdateMeUseCase<U> {
    /// Partial update of the caller's own profile. Only staff and admins may
    /// change their role; for everyone else `role` is ignored.
    pub async fn execute(&self, actor: &Identity, mut patch: UserPatch) -> Result<User, ApiError> {
        let mut user = self
            .users
            .find_by_id(actor.user_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        if !(actor.is_staff || actor.role == UserRole::Admin) {
            patch.role = None;
        }
        apply_patch(&self.users, &mut user, patch).await?;
        self.users.update(&user).await?;
        Ok(user)
    }
}
