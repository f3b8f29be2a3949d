use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::*;

use crate::error::AppResult;
use crate::models::{password_recover, users};
use crate::repositories::{Account, AccountDirectory, RecoverToken, RecoverTokenStore};

/// Comptes + tokens de récupération sur PostgreSQL
pub struct SeaOrmAuthRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmAuthRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<password_recover::Model> for RecoverToken {
    fn from(model: password_recover::Model) -> Self {
        Self {
            token: model.token,
            email: model.email,
            expires_at: model.expiration,
        }
    }
}

#[async_trait]
impl AccountDirectory for SeaOrmAuthRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await?;

        Ok(user.map(|user| Account {
            id: user.id,
            email: user.email,
        }))
    }
}

#[async_trait]
impl RecoverTokenStore for SeaOrmAuthRepository {
    async fn upsert_active_token(&self, token: &RecoverToken) -> AppResult<()> {
        let model = password_recover::ActiveModel {
            token: Set(token.token.clone()),
            email: Set(token.email.clone()),
            expiration: Set(token.expires_at),
            ..Default::default()
        };

        // UNIQUE(email) : le nouveau token écrase l'ancien
        password_recover::Entity::insert(model)
            .on_conflict(
                OnConflict::column(password_recover::Column::Email)
                    .update_columns([
                        password_recover::Column::Token,
                        password_recover::Column::Expiration,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await?;

        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<RecoverToken>> {
        let record = password_recover::Entity::find()
            .filter(password_recover::Column::Token.eq(token))
            .one(self.db.as_ref())
            .await?;

        Ok(record.map(RecoverToken::from))
    }

    async fn redeem(
        &self,
        token: &str,
        account_id: i64,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        // Si on sort avec ? la transaction est abandonnée (rollback au drop)
        let txn = self.db.begin().await?;

        // 1. DELETE conditionnel : une seule requête concurrente peut gagner
        let consumed = password_recover::Entity::delete_many()
            .filter(password_recover::Column::Token.eq(token))
            .filter(password_recover::Column::Expiration.gt(now))
            .exec(&txn)
            .await?;

        if consumed.rows_affected != 1 {
            txn.rollback().await?;
            return Ok(false);
        }

        // 2. Nouveau hash du compte
        let updated = users::Entity::update_many()
            .col_expr(users::Column::Password, Expr::value(password_hash))
            .filter(users::Column::Id.eq(account_id))
            .exec(&txn)
            .await?;

        if updated.rows_affected != 1 {
            txn.rollback().await?;
            return Ok(false);
        }

        txn.commit().await?;
        Ok(true)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = password_recover::Entity::delete_many()
            .filter(password_recover::Column::Expiration.lte(now))
            .exec(self.db.as_ref())
            .await?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_redeem_commits_when_token_consumed() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(1), exec(1)])
            .into_connection();
        let repository = SeaOrmAuthRepository::new(Arc::new(db));

        let redeemed = repository.redeem("tok", 1, "pbkdf2:sha256:1$a$b", now()).await.unwrap();
        assert!(redeemed);
    }

    #[tokio::test]
    async fn test_redeem_fails_when_token_already_consumed() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(0)])
            .into_connection();
        let repository = SeaOrmAuthRepository::new(Arc::new(db));

        let redeemed = repository.redeem("tok", 1, "pbkdf2:sha256:1$a$b", now()).await.unwrap();
        assert!(!redeemed);
    }

    #[tokio::test]
    async fn test_redeem_rolls_back_when_account_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(1), exec(0)])
            .into_connection();
        let repository = SeaOrmAuthRepository::new(Arc::new(db));

        let redeemed = repository.redeem("tok", 42, "pbkdf2:sha256:1$a$b", now()).await.unwrap();
        assert!(!redeemed);
    }

    #[tokio::test]
    async fn test_find_by_token_maps_record() {
        let expiration = now() + Duration::minutes(30);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![password_recover::Model {
                id: 1,
                token: "tok".to_string(),
                email: "maria@gmail.com".to_string(),
                expiration,
            }]])
            .into_connection();
        let repository = SeaOrmAuthRepository::new(Arc::new(db));

        let record = repository.find_by_token("tok").await.unwrap().unwrap();
        assert_eq!(record.email, "maria@gmail.com");
        assert_eq!(record.expires_at, expiration);
        assert!(record.is_valid_at(now()));
        assert!(!record.is_valid_at(expiration));
    }
}
