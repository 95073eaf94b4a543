//! Root for all SeaORM entity modules.

pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::user::Entity as User;
}

#[cfg(test)]
mod test {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, DbErr, EntityTrait,
        QueryFilter, QueryOrder, Set,
    };

    use super::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        let db = Database::connect("sqlite::memory:").await?;
        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    fn new_user(email: &str, name: &str) -> user::ActiveModel {
        user::ActiveModel {
            email: Set(email.to_string()),
            name: Set(name.to_string()),
            is_active: Set(true),
            is_staff: Set(false),
            is_superuser: Set(false),
            password: Set("!unusable".to_string()),
            last_login: Set(None),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_user_round_trip() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let created = new_user("ada@example.com", "Ada").insert(&db).await?;
        assert!(created.id > 0);

        let found = User::find_by_id(created.id)
            .one(&db)
            .await?
            .expect("user should exist");
        assert_eq!(found, created);
        assert_eq!(found.to_string(), "ada@example.com");
        assert!(found.last_login.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_email_column_is_unique() -> Result<(), DbErr> {
        let db = setup_db().await?;

        new_user("dup@example.com", "First").insert(&db).await?;
        let err = new_user("dup@example.com", "Second")
            .insert(&db)
            .await
            .expect_err("duplicate email must be rejected");
        assert!(matches!(
            err.sql_err(),
            Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
        ));

        let users = User::find()
            .filter(user::Column::Email.eq("dup@example.com"))
            .order_by_asc(user::Column::Id)
            .all(&db)
            .await?;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "First");

        Ok(())
    }

    #[tokio::test]
    async fn test_flag_defaults_from_schema() -> Result<(), DbErr> {
        let db = setup_db().await?;

        // Only the required columns are set; the flags come from column defaults.
        let created = user::ActiveModel {
            email: Set("defaults@example.com".to_string()),
            password: Set("!unusable".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        assert_eq!(created.name, "");
        assert!(created.is_active);
        assert!(!created.is_staff);
        assert!(!created.is_superuser);

        Ok(())
    }
}
