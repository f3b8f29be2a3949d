// ============================================================================
// REPOSITORIES - COLLABORATEURS DES SERVICES
// ============================================================================
//
// Description:
//   Traits utilisés par les services (annuaire des comptes, stockage des
//   tokens, source des requêtes produits) + implémentations SeaORM.
//   Les services ne voient jamais DatabaseConnection directement, ce qui
//   permet de les tester avec les implémentations en mémoire (memory).
//
// ============================================================================

pub mod auth_repository;
pub mod product_repository;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::AppResult;
use crate::models::dto::{ProductDto, ProductProjection};

/// Compte utilisateur tel que vu par la récupération de mot de passe.
/// Le hash courant n'est jamais lu : redeem l'écrase.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: i64,
    pub email: String,
}

/// Token de récupération persisté (jamais renvoyé au client HTTP)
#[derive(Debug, Clone, PartialEq)]
pub struct RecoverToken {
    pub token: String,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

impl RecoverToken {
    /// Valide seulement strictement avant expires_at
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

#[async_trait]
pub trait AccountDirectory: Send + Sync {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>>;
}

#[async_trait]
pub trait RecoverTokenStore: Send + Sync {
    /// Insère le token, ou remplace celui déjà émis pour le même email
    async fn upsert_active_token(&self, token: &RecoverToken) -> AppResult<()>;

    async fn find_by_token(&self, token: &str) -> AppResult<Option<RecoverToken>>;

    /// Consomme le token (s'il est encore valide à `now`) et écrit le nouveau
    /// hash du compte, les deux ou aucun.
    /// Retourne false si le token n'a pas pu être consommé (déjà utilisé par
    /// une autre requête, expiré, ou compte disparu).
    async fn redeem(
        &self,
        token: &str,
        account_id: i64,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Supprime les tokens dont l'expiration est <= now
    async fn purge_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    /// Vide = toutes les catégories
    pub category_ids: Vec<i64>,
    /// Sous-chaîne, insensible à la casse
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Name,
    Price,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductSort {
    pub field: SortField,
    pub descending: bool,
}

impl Default for ProductSort {
    fn default() -> Self {
        Self {
            field: SortField::Name,
            descending: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Numéro de page, commence à 0
    pub page: u64,
    pub size: u64,
    pub sort: ProductSort,
}

#[derive(Debug, Clone)]
pub struct ProjectionPage {
    pub items: Vec<ProductProjection>,
    pub total_elements: u64,
}

#[async_trait]
pub trait ProductQuerySource: Send + Sync {
    /// Requête légère, paginée et triée : fait foi pour l'ordre et les ids
    async fn fetch_ordered_projection(
        &self,
        filter: &ProductFilter,
        page: &PageRequest,
    ) -> AppResult<ProjectionPage>;

    /// Produits complets avec leurs catégories, ordre NON garanti
    async fn fetch_full_by_ids(&self, ids: &[i64]) -> AppResult<Vec<ProductDto>>;
}
