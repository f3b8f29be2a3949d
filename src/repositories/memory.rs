// Implémentations en mémoire des repositories, pour les tests

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::AppResult;
use crate::models::dto::{ProductDto, ProductProjection};
use crate::repositories::{
    Account, AccountDirectory, PageRequest, ProductFilter, ProductQuerySource, ProjectionPage,
    RecoverToken, RecoverTokenStore, SortField,
};

#[derive(Default)]
struct AuthState {
    accounts: HashMap<String, Account>,
    /// hash courant de chaque compte, clé = id
    hashes: HashMap<i64, String>,
    /// clé = email : au plus un token par compte
    tokens: HashMap<String, RecoverToken>,
}

/// Comptes + tokens derrière un seul Mutex : redeem est atomique
#[derive(Default)]
pub struct MemoryAuthStore {
    state: Mutex<AuthState>,
}

impl MemoryAuthStore {
    pub fn with_account(self, id: i64, email: &str, password_hash: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.accounts.insert(
                email.to_string(),
                Account {
                    id,
                    email: email.to_string(),
                },
            );
            state.hashes.insert(id, password_hash.to_string());
        }
        self
    }

    pub fn password_hash_of(&self, email: &str) -> Option<String> {
        let state = self.state.lock().unwrap();
        let account = state.accounts.get(email)?;
        state.hashes.get(&account.id).cloned()
    }

    pub fn token_count(&self) -> usize {
        self.state.lock().unwrap().tokens.len()
    }

    pub fn token_of(&self, email: &str) -> Option<RecoverToken> {
        self.state.lock().unwrap().tokens.get(email).cloned()
    }
}

#[async_trait]
impl AccountDirectory for MemoryAuthStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        Ok(self.state.lock().unwrap().accounts.get(email).cloned())
    }
}

#[async_trait]
impl RecoverTokenStore for MemoryAuthStore {
    async fn upsert_active_token(&self, token: &RecoverToken) -> AppResult<()> {
        let mut state = self.state.lock().unwrap();
        state.tokens.insert(token.email.clone(), token.clone());
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<RecoverToken>> {
        let state = self.state.lock().unwrap();
        Ok(state.tokens.values().find(|t| t.token == token).cloned())
    }

    async fn redeem(
        &self,
        token: &str,
        account_id: i64,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut state = self.state.lock().unwrap();

        let email = match state
            .tokens
            .values()
            .find(|t| t.token == token && t.is_valid_at(now))
        {
            Some(t) => t.email.clone(),
            None => return Ok(false),
        };

        match state.hashes.get_mut(&account_id) {
            Some(hash) => *hash = password_hash.to_string(),
            None => return Ok(false),
        }
        state.tokens.remove(&email);

        Ok(true)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut state = self.state.lock().unwrap();
        let before = state.tokens.len();
        state.tokens.retain(|_, t| t.is_valid_at(now));
        Ok((before - state.tokens.len()) as u64)
    }
}

/// Catalogue en mémoire. fetch_full_by_ids renvoie volontairement les produits
/// dans l'ordre inverse des ids demandés (comme un JOIN qui mélange l'ordre).
#[derive(Default)]
pub struct MemoryProductSource {
    products: Vec<ProductDto>,
    /// ids "oubliés" par la seconde requête (simule un contrat cassé)
    dropped_ids: Vec<i64>,
}

impl MemoryProductSource {
    pub fn new(products: Vec<ProductDto>) -> Self {
        Self {
            products,
            dropped_ids: Vec::new(),
        }
    }

    pub fn dropping(mut self, id: i64) -> Self {
        self.dropped_ids.push(id);
        self
    }
}

#[async_trait]
impl ProductQuerySource for MemoryProductSource {
    async fn fetch_ordered_projection(
        &self,
        filter: &ProductFilter,
        page: &PageRequest,
    ) -> AppResult<ProjectionPage> {
        let name = filter.name.to_lowercase();
        let mut matching: Vec<&ProductDto> = self
            .products
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&name))
            .filter(|p| {
                filter.category_ids.is_empty()
                    || p.categories.iter().any(|c| filter.category_ids.contains(&c.id))
            })
            .collect();

        matching.sort_by(|a, b| {
            let ordering = match page.sort.field {
                SortField::Id => a.id.cmp(&b.id),
                SortField::Name => a.name.cmp(&b.name).then(a.id.cmp(&b.id)),
                SortField::Price => a.price.cmp(&b.price).then(a.id.cmp(&b.id)),
            };
            if page.sort.descending { ordering.reverse() } else { ordering }
        });

        let total_elements = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.page.saturating_mul(page.size) as usize)
            .take(page.size as usize)
            .map(|p| ProductProjection {
                id: p.id,
                name: p.name.clone(),
                price: p.price,
            })
            .collect();

        Ok(ProjectionPage {
            items,
            total_elements,
        })
    }

    async fn fetch_full_by_ids(&self, ids: &[i64]) -> AppResult<Vec<ProductDto>> {
        Ok(ids
            .iter()
            .rev()
            .filter(|id| !self.dropped_ids.contains(*id))
            .filter_map(|id| self.products.iter().find(|p| p.id == *id).cloned())
            .collect())
    }
}
