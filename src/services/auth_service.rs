// ============================================================================
// SERVICE : RÉCUPÉRATION DE MOT DE PASSE
// ============================================================================
//
// Workflow:
//   1. create_recover_token(email)
//        - compte inconnu → succès silencieux, aucun token créé
//        - sinon token aléatoire (256 bits), expire à now + fenêtre
//        - UPSERT : remplace le token précédent du même compte
//        - envoi par email ; un échec d'envoi ne supprime PAS le token
//   2. save_new_password(token, nouveau password)
//        - token absent → TokenNotFound ; expiré → TokenExpired
//        - hash PBKDF2 (hors event loop)
//        - consommation du token + écriture du hash dans UNE transaction
//
// Points d'attention:
//   - Le token n'est jamais retourné à l'appelant ni loggé
//   - Deux soumissions concurrentes du même token : une seule gagne,
//     l'autre reçoit TokenNotFound (redeem retourne false)
//
// ============================================================================

use std::sync::Arc;

use chrono::Duration;

use crate::error::{AppError, AppResult};
use crate::repositories::{AccountDirectory, RecoverToken, RecoverTokenStore};
use crate::services::notifier::Notifier;
use crate::utils::clock::Clock;
use crate::utils::{password, token};

/// Résultat interne de create_recover_token.
/// La route répond 204 dans TOUS les cas pour ne pas révéler les emails inscrits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverTokenOutcome {
    Sent,
    /// Token enregistré et valide, mais l'email n'est pas parti
    NotificationFailed,
    UnknownEmail,
}

pub struct AuthService {
    accounts: Arc<dyn AccountDirectory>,
    tokens: Arc<dyn RecoverTokenStore>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    recover_window: Duration,
    hash_iterations: u32,
}

impl AuthService {
    pub fn new(
        accounts: Arc<dyn AccountDirectory>,
        tokens: Arc<dyn RecoverTokenStore>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        recover_window: Duration,
        hash_iterations: u32,
    ) -> Self {
        Self {
            accounts,
            tokens,
            notifier,
            clock,
            recover_window,
            hash_iterations,
        }
    }

    pub async fn create_recover_token(&self, email: &str) -> AppResult<RecoverTokenOutcome> {
        let account = match self.accounts.find_by_email(email).await? {
            Some(account) => account,
            None => {
                tracing::info!("recover token requested for an unknown email");
                return Ok(RecoverTokenOutcome::UnknownEmail);
            }
        };

        let record = RecoverToken {
            token: token::generate_recover_token(),
            email: account.email.clone(),
            expires_at: self.clock.now() + self.recover_window,
        };
        self.tokens.upsert_active_token(&record).await?;

        match self.notifier.send_recover_token(&record.email, &record.token).await {
            Ok(()) => {
                tracing::info!(account_id = account.id, "recover token issued and sent");
                Ok(RecoverTokenOutcome::Sent)
            }
            Err(e) => {
                tracing::warn!(
                    account_id = account.id,
                    error = %e,
                    "recover token issued but notification failed"
                );
                Ok(RecoverTokenOutcome::NotificationFailed)
            }
        }
    }

    pub async fn save_new_password(&self, token: &str, new_password: &str) -> AppResult<()> {
        // 1. Le token doit exister et être encore valide
        let record = self
            .tokens
            .find_by_token(token)
            .await?
            .ok_or(AppError::TokenNotFound)?;

        if !record.is_valid_at(self.clock.now()) {
            return Err(AppError::TokenExpired);
        }

        let account = self
            .accounts
            .find_by_email(&record.email)
            .await?
            .ok_or(AppError::TokenNotFound)?;

        // 2. Hash lent, hors des workers HTTP
        let new_password = new_password.to_owned();
        let iterations = self.hash_iterations;
        let password_hash =
            tokio::task::spawn_blocking(move || password::hash_password(&new_password, iterations))
                .await
                .map_err(|e| AppError::Hashing(e.to_string()))??;

        // 3. Consommation + mise à jour atomiques
        let now = self.clock.now();
        if !self.tokens.redeem(token, account.id, &password_hash, now).await? {
            if !record.is_valid_at(now) {
                return Err(AppError::TokenExpired);
            }
            return Err(AppError::TokenNotFound);
        }

        tracing::info!(account_id = account.id, "password updated with recover token");
        Ok(())
    }

    /// Ménage : les tokens expirés sont déjà refusés par save_new_password
    pub async fn purge_expired_tokens(&self) -> AppResult<u64> {
        let purged = self.tokens.purge_expired(self.clock.now()).await?;
        if purged > 0 {
            tracing::info!(purged, "expired recover tokens purged");
        }
        Ok(purged)
    }
}
