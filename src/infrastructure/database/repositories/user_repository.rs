use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::storage::{contains_ignore_case, db_err, parse_id, SeaOrmStorage};
use crate::domain::{DomainError, DomainResult, User, UserRepository};
use crate::infrastructure::database::entities::user;
use crate::shared::{normalize_filter, PageRequest, PaginatedResult};

// ── Conversion helpers ──────────────────────────────────────────

fn user_model_to_domain(model: user::Model) -> DomainResult<User> {
    Ok(User {
        id: Some(parse_id(&model.id)?),
        first_name: model.first_name,
        last_name: model.last_name,
        email: model.email,
        login: model.login,
        password_hash: model.password_hash,
        birthday: model.birthday,
        phone: model.phone,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn user_to_active_model(id: Uuid, user: User) -> user::ActiveModel {
    user::ActiveModel {
        id: Set(id.to_string()),
        first_name: Set(user.first_name),
        last_name: Set(user.last_name),
        email: Set(user.email),
        login: Set(user.login),
        password_hash: Set(user.password_hash),
        birthday: Set(user.birthday),
        phone: Set(user.phone),
        created_at: Set(user.created_at),
        updated_at: Set(user.updated_at),
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl<C> UserRepository for SeaOrmStorage<C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn find_user_by_id(&self, id: Uuid) -> DomainResult<Option<User>> {
        user::Entity::find_by_id(id.to_string())
            .one(&self.conn)
            .await
            .map_err(db_err)?
            .map(user_model_to_domain)
            .transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .map_err(db_err)?
            .map(user_model_to_domain)
            .transpose()
    }

    async fn find_user_by_login(&self, login: &str) -> DomainResult<Option<User>> {
        user::Entity::find()
            .filter(user::Column::Login.eq(login))
            .one(&self.conn)
            .await
            .map_err(db_err)?
            .map(user_model_to_domain)
            .transpose()
    }

    async fn save_user(&self, user: User) -> DomainResult<User> {
        let model = match user.id {
            None => user_to_active_model(Uuid::new_v4(), user)
                .insert(&self.conn)
                .await
                .map_err(db_err)?,
            Some(id) => user_to_active_model(id, user)
                .update(&self.conn)
                .await
                .map_err(|e| match e {
                    DbErr::RecordNotUpdated => DomainError::user_not_found(id),
                    other => db_err(other),
                })?,
        };

        user_model_to_domain(model)
    }

    async fn delete_user_by_id(&self, id: Uuid) -> DomainResult<()> {
        let result = user::Entity::delete_by_id(id.to_string())
            .exec(&self.conn)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::user_not_found(id));
        }
        Ok(())
    }

    async fn search_users_by_first_name(
        &self,
        first_name: Option<&str>,
        page: PageRequest,
    ) -> DomainResult<PaginatedResult<User>> {
        let mut query = user::Entity::find();

        if let Some(needle) = normalize_filter(first_name) {
            query = query.filter(contains_ignore_case(user::Column::FirstName, &needle));
        }

        let query = query
            .order_by_asc(user::Column::FirstName)
            .order_by_asc(user::Column::Id);

        let total = query.clone().count(&self.conn).await.map_err(db_err)?;

        let models = query
            .offset(page.offset())
            .limit(page.limit)
            .all(&self.conn)
            .await
            .map_err(db_err)?;

        let items = models
            .into_iter()
            .map(user_model_to_domain)
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(PaginatedResult::new(items, total, page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Car, CarRepository, SaveCarDto, Storage, UnitOfWork};
    use crate::infrastructure::database::migrator::Migrator;
    use chrono::{NaiveDate, Utc};
    use sea_orm::{ConnectOptions, Database, DatabaseConnection};
    use sea_orm_migration::MigratorTrait;

    async fn storage() -> SeaOrmStorage<DatabaseConnection> {
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opts).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        SeaOrmStorage::new(db)
    }

    fn user(email: &str, login: &str) -> User {
        let now = Utc::now();
        User {
            id: None,
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: email.into(),
            login: login.into(),
            password_hash: "$2b$04$hash".into(),
            birthday: NaiveDate::from_ymd_opt(1815, 12, 10),
            phone: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn save_and_lookup_by_each_key() {
        let storage = storage().await;
        let saved = storage.save_user(user("ada@x.com", "ada")).await.unwrap();
        let id = saved.id.unwrap();

        assert_eq!(storage.find_user_by_id(id).await.unwrap(), Some(saved.clone()));
        assert_eq!(
            storage.find_user_by_email("ada@x.com").await.unwrap(),
            Some(saved.clone())
        );
        assert_eq!(storage.find_user_by_login("ada").await.unwrap(), Some(saved));
        assert!(storage.find_user_by_login("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn email_and_login_unique_in_schema() {
        let storage = storage().await;
        storage.save_user(user("ada@x.com", "ada")).await.unwrap();

        assert!(matches!(
            storage.save_user(user("ada@x.com", "other")).await,
            Err(DomainError::Storage(_))
        ));
        assert!(matches!(
            storage.save_user(user("other@x.com", "ada")).await,
            Err(DomainError::Storage(_))
        ));
    }

    #[tokio::test]
    async fn deleting_a_user_nulls_car_owner() {
        let storage = storage().await;
        let saved = storage.save_user(user("ada@x.com", "ada")).await.unwrap();
        let user_id = saved.id.unwrap();

        let mut car = Car::new(SaveCarDto {
            year: 1843,
            license_plate: "ENGINE".into(),
            model: "Analytical".into(),
            color: "Brass".into(),
        });
        car.attach_to(user_id);
        let car = storage.save_car(car).await.unwrap();
        assert_eq!(storage.find_cars_by_owner(user_id).await.unwrap().len(), 1);

        storage.delete_user_by_id(user_id).await.unwrap();

        let orphan = storage.find_car_by_id(car.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(orphan.user_id, None);
    }

    #[tokio::test]
    async fn committed_unit_is_visible() {
        let storage = storage().await;

        let uow = storage.begin().await.unwrap();
        uow.save_user(user("ada@x.com", "ada")).await.unwrap();
        uow.commit().await.unwrap();

        let page = storage
            .search_users_by_first_name(Some("AD"), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].login, "ada");
    }
}
