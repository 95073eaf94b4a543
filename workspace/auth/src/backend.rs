use chrono::Utc;
use model::entities::user;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};
use tracing::{debug, info, instrument, trace};

use crate::error::Result;
use crate::manager::UserManager;
use crate::password::{CredentialHasher, PasswordHashable};
use crate::permissions::Permissioned;

/// Verifies an email/password pair.
///
/// Returns `None` for unknown emails, wrong passwords and inactive accounts.
/// Unknown emails and accounts without a usable password still pay for one
/// hash so the response time does not reveal either case.
#[instrument(skip(db, hasher, password))]
pub async fn authenticate<C: ConnectionTrait>(
    db: &C,
    hasher: &dyn CredentialHasher,
    email: &str,
    password: &str,
) -> Result<Option<user::Model>> {
    trace!("Entering authenticate");

    let manager = UserManager::new(db, hasher);
    let Some(user) = manager.get_by_email(email).await? else {
        debug!("No user found for email");
        hasher.hash(password)?;
        return Ok(None);
    };

    if !user.has_usable_password() {
        debug!("User ID {} has no usable password", user.id);
        hasher.hash(password)?;
        return Ok(None);
    }

    if !user.check_password(hasher, password) {
        debug!("Password mismatch for user ID: {}", user.id);
        return Ok(None);
    }

    if !user.is_active() {
        debug!("User ID {} is inactive", user.id);
        return Ok(None);
    }

    Ok(Some(user))
}

/// Stamps `last_login` with the current time.
#[instrument(skip(db, user), fields(user_id = user.id))]
pub async fn update_last_login<C: ConnectionTrait>(db: &C, user: user::Model) -> Result<user::Model> {
    let mut active: user::ActiveModel = user.into();
    active.last_login = Set(Some(Utc::now()));
    let updated = active.update(db).await?;
    info!("Recorded login for user ID: {}", updated.id);
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::ExtraFields;
    use crate::password::Argon2Hasher;
    use crate::testing::{setup_db, test_hasher};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts how often the wrapped hasher is asked to hash.
    #[derive(Debug)]
    struct CountingHasher {
        inner: Argon2Hasher,
        hashes: AtomicUsize,
    }

    impl CountingHasher {
        fn new() -> Self {
            Self {
                inner: test_hasher(),
                hashes: AtomicUsize::new(0),
            }
        }

        fn hashes(&self) -> usize {
            self.hashes.load(Ordering::SeqCst)
        }
    }

    impl CredentialHasher for CountingHasher {
        fn hash(&self, raw: &str) -> Result<String> {
            self.hashes.fetch_add(1, Ordering::SeqCst);
            self.inner.hash(raw)
        }

        fn verify(&self, raw: &str, encoded: &str) -> bool {
            self.inner.verify(raw, encoded)
        }
    }

    #[tokio::test]
    async fn test_authenticate_with_valid_credentials() {
        let db = setup_db().await;
        let hasher = test_hasher();
        let created = UserManager::new(&db, &hasher)
            .create_user("login@Example.com", Some("pass123"), ExtraFields::default())
            .await
            .unwrap();

        let user = authenticate(&db, &hasher, "login@EXAMPLE.com", "pass123")
            .await
            .unwrap();
        assert_eq!(user, Some(created));
    }

    #[tokio::test]
    async fn test_authenticate_rejects_wrong_password_and_unknown_email() {
        let db = setup_db().await;
        let hasher = test_hasher();
        UserManager::new(&db, &hasher)
            .create_user("login@example.com", Some("pass123"), ExtraFields::default())
            .await
            .unwrap();

        assert!(authenticate(&db, &hasher, "login@example.com", "wrong")
            .await
            .unwrap()
            .is_none());
        assert!(authenticate(&db, &hasher, "nobody@example.com", "pass123")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_authenticate_rejects_inactive_user() {
        let db = setup_db().await;
        let hasher = test_hasher();
        UserManager::new(&db, &hasher)
            .create_user(
                "disabled@example.com",
                Some("pass123"),
                ExtraFields::default().with_active(false),
            )
            .await
            .unwrap();

        assert!(authenticate(&db, &hasher, "disabled@example.com", "pass123")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_authenticate_rejects_unusable_password() {
        let db = setup_db().await;
        let hasher = test_hasher();
        let created = UserManager::new(&db, &hasher)
            .create_user("nopass@example.com", None, ExtraFields::default())
            .await
            .unwrap();

        assert!(authenticate(&db, &hasher, "nopass@example.com", "")
            .await
            .unwrap()
            .is_none());
        assert!(authenticate(&db, &hasher, "nopass@example.com", &created.password)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_unknown_email_and_unusable_password_both_hash_once() {
        let db = setup_db().await;
        let hasher = CountingHasher::new();
        UserManager::new(&db, &hasher)
            .create_user("nopass@example.com", None, ExtraFields::default())
            .await
            .unwrap();
        let baseline = hasher.hashes();

        assert!(authenticate(&db, &hasher, "nopass@example.com", "guess")
            .await
            .unwrap()
            .is_none());
        assert_eq!(hasher.hashes(), baseline + 1);

        assert!(authenticate(&db, &hasher, "nobody@example.com", "guess")
            .await
            .unwrap()
            .is_none());
        assert_eq!(hasher.hashes(), baseline + 2);
    }

    #[tokio::test]
    async fn test_update_last_login() {
        let db = setup_db().await;
        let hasher = test_hasher();
        let manager = UserManager::new(&db, &hasher);
        let created = manager
            .create_user("stamp@example.com", Some("pw"), ExtraFields::default())
            .await
            .unwrap();
        assert!(created.last_login.is_none());

        let before = Utc::now();
        let updated = update_last_login(&db, created.clone()).await.unwrap();
        let last_login = updated.last_login.expect("last_login should be set");
        assert!(last_login >= before - chrono::Duration::seconds(1));

        let stored = manager.get(created.id).await.unwrap().unwrap();
        assert_eq!(stored.last_login, updated.last_login);
        assert_eq!(stored.email, created.email);
    }
}
