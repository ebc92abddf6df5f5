//! User accounts: registration, login and account management.

use std::sync::Arc;

use gamestore_auth::TokenService;
use gamestore_core::auth::{can_act_on, hash_password, verify_password, Principal};
use gamestore_core::service::{Result, ServiceError};
use gamestore_core::storage::{
    PageParameters, PaginatedList, QuerySpec, Repository, RepositoryError,
};
use gamestore_core::store::{
    validate_email, validate_password, validate_username, User, UserRole,
};

use super::pictures::{PictureStore, PictureUpload, USER_PICTURES};

/// Input for a new account.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub struct UserService {
    users: Arc<dyn Repository<User>>,
    pictures: Arc<dyn PictureStore>,
    tokens: TokenService,
}

impl UserService {
    pub fn new(
        users: Arc<dyn Repository<User>>,
        pictures: Arc<dyn PictureStore>,
        tokens: TokenService,
    ) -> Self {
        Self {
            users,
            pictures,
            tokens,
        }
    }

    /// Creates an account with the `User` role.
    ///
    /// The profile picture is stored under the user's email.
    pub async fn register(
        &self,
        registration: Registration,
        picture: Option<PictureUpload>,
    ) -> Result<User> {
        validate_username(&registration.username)?;
        validate_email(&registration.email)?;
        validate_password(&registration.password)?;

        let digest = hash_password(&registration.password)?;
        let user = User::new(
            registration.username,
            registration.email,
            digest.hash,
            digest.salt,
        )
        .with_role(UserRole::User);

        let mut created = self
            .users
            .create(&user)
            .await
            .map_err(|err| self.write_failed(err, &user))?;

        if let Some(link) = self
            .pictures
            .upload(picture.as_ref(), USER_PICTURES, created.id, &created.email)
            .await?
        {
            created.profile_picture = Some(link);
            self.users.update(&created).await?;
        }

        tracing::info!(user_id = created.id, username = %created.username, "Registered user");
        Ok(created)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<User> {
        match self.users.get_by_id(id).await? {
            Some(user) => {
                tracing::info!(user_id = id, "Retrieved user");
                Ok(user)
            }
            None => {
                tracing::warn!(user_id = id, "User not found");
                Err(ServiceError::NotFound {
                    entity_type: "User",
                    id,
                })
            }
        }
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let mut found = self
            .users
            .find(&QuerySpec::where_eq("email", email))
            .await?;
        Ok(found.pop())
    }

    pub async fn get_all(&self, page: PageParameters) -> Result<PaginatedList<User>> {
        let users = self.users.get_page(page, &QuerySpec::all()).await?;
        tracing::info!(page_number = page.page_number, total = users.total_count, "Retrieved users");
        Ok(users)
    }

    /// Checks credentials and issues a token.
    ///
    /// An unknown email and a wrong password fail the same way.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String)> {
        let Some(user) = self.get_by_email(email).await? else {
            tracing::warn!(email, "Login for unknown email");
            return Err(ServiceError::InvalidCredentials);
        };

        if let Err(err) = verify_password(password, &user.password_hash, &user.password_salt) {
            tracing::warn!(user_id = user.id, "Login with wrong password");
            return Err(err.into());
        }

        let token = self.issue_token(&user)?;
        tracing::info!(user_id = user.id, "User logged in");
        Ok((user, token))
    }

    /// Changes the username and, when a new one is uploaded, the profile picture.
    pub async fn update(
        &self,
        id: i64,
        username: String,
        picture: Option<PictureUpload>,
        caller: &Principal,
    ) -> Result<()> {
        let mut user = self.get_by_id(id).await?;
        self.verify_access_rights(&user, caller)?;
        validate_username(&username)?;

        user.username = username;
        self.users
            .update(&user)
            .await
            .map_err(|err| self.write_failed(err, &user))?;

        if let Some(link) = self
            .pictures
            .upload(picture.as_ref(), USER_PICTURES, user.id, &user.email)
            .await?
        {
            if let Some(old) = user.profile_picture.replace(link.clone()) {
                if old != link {
                    self.pictures.delete(&old).await?;
                }
            }
            self.users.update(&user).await?;
        }

        tracing::info!(user_id = id, "Updated user");
        Ok(())
    }

    /// Sets a new password and returns a fresh token for the account.
    pub async fn change_password(
        &self,
        id: i64,
        password: &str,
        caller: &Principal,
    ) -> Result<String> {
        let mut user = self.get_by_id(id).await?;
        self.verify_access_rights(&user, caller)?;
        validate_password(password)?;

        let digest = hash_password(password)?;
        user.password_hash = digest.hash;
        user.password_salt = digest.salt;
        self.users.update(&user).await?;

        tracing::info!(user_id = id, "Changed password");
        self.issue_token(&user)
    }

    /// Sets a user's role. Callers are expected to be admins.
    pub async fn change_role(&self, id: i64, role: UserRole) -> Result<()> {
        let mut user = self.get_by_id(id).await?;
        user.role = role;
        self.users.update(&user).await?;

        tracing::info!(user_id = id, role = %role, "Changed role");
        Ok(())
    }

    /// Deletes an account and its profile picture.
    pub async fn delete(&self, id: i64, caller: &Principal) -> Result<()> {
        let user = self.get_by_id(id).await?;
        self.verify_access_rights(&user, caller)?;

        self.users.delete(id).await?;
        if let Some(link) = &user.profile_picture {
            self.pictures.delete(link).await?;
        }

        tracing::info!(user_id = id, "Deleted user");
        Ok(())
    }

    /// Allows the account owner and any admin.
    pub fn verify_access_rights(&self, target: &User, caller: &Principal) -> Result<()> {
        if can_act_on(target.id, caller) {
            return Ok(());
        }

        tracing::warn!(
            caller = %caller.username,
            target_id = target.id,
            "Not enough rights for user operation"
        );
        Err(ServiceError::NotEnoughRights)
    }

    fn issue_token(&self, user: &User) -> Result<String> {
        self.tokens
            .issue(&Principal::from(user))
            .map_err(|e| ServiceError::Internal(e.to_string()))
    }

    fn write_failed(&self, err: RepositoryError, user: &User) -> ServiceError {
        let err = ServiceError::from_write(err, user);
        if let ServiceError::NameNotUnique { field, value, .. } = &err {
            tracing::warn!(field = %field, value = %value, "User is not unique");
        }
        err
    }
}
