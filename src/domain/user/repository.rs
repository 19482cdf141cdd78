use async_trait::async_trait;
use uuid::Uuid;

use super::User;
use crate::domain::DomainResult;
use crate::shared::{PageRequest, PaginatedResult};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user_by_id(&self, id: Uuid) -> DomainResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    async fn find_user_by_login(&self, login: &str) -> DomainResult<Option<User>>;

    /// Insert when `user.id` is `None`, otherwise update the stored row.
    async fn save_user(&self, user: User) -> DomainResult<User>;
    async fn delete_user_by_id(&self, id: Uuid) -> DomainResult<()>;

    /// Substring match on the first name, case-insensitive for ASCII letters only.
    async fn search_users_by_first_name(
        &self,
        first_name: Option<&str>,
        page: PageRequest,
    ) -> DomainResult<PaginatedResult<User>>;
}
