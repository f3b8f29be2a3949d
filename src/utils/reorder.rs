// ============================================================================
// RÉORDONNANCEMENT PROJECTION -> ENTITÉS COMPLÈTES
// ============================================================================
//
// Description:
//   La liste paginée se fait en deux requêtes:
//     1. projection légère (id + colonnes de tri), paginée et triée
//     2. entités complètes avec leurs relations (IN ids), ordre quelconque
//   replace() remet les entités de (2) dans l'ordre de (1).
//
// Points d'attention:
//   - O(n) : une passe pour la HashMap, une passe pour l'ordre
//   - Les deux listes DOIVENT avoir le même ensemble d'ids. Sinon c'est un
//     bug des requêtes: on retourne ContractViolation, jamais une liste
//     tronquée ou trouée
//
// ============================================================================

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::{AppError, AppResult};

/// Enregistrement identifié par une clé (l'id de la table)
pub trait Keyed {
    type Key: Eq + Hash + Debug;

    fn key(&self) -> Self::Key;
}

pub fn replace<P, T>(ordered: &[P], unordered: Vec<T>) -> AppResult<Vec<T>>
where
    P: Keyed,
    T: Keyed<Key = P::Key>,
{
    let mut by_key: HashMap<P::Key, T> = HashMap::with_capacity(unordered.len());
    let mut unexpected = Vec::new();

    for record in unordered {
        let key = record.key();
        if by_key.contains_key(&key) {
            unexpected.push(format!("{:?}", key));
            continue;
        }
        by_key.insert(key, record);
    }

    let mut result = Vec::with_capacity(ordered.len());
    let mut missing = Vec::new();

    for projection in ordered {
        let key = projection.key();
        match by_key.remove(&key) {
            Some(record) => result.push(record),
            // absent, ou id répété dans la projection
            None => missing.push(format!("{:?}", key)),
        }
    }

    unexpected.extend(by_key.keys().map(|key| format!("{:?}", key)));

    if !missing.is_empty() || !unexpected.is_empty() {
        tracing::error!(
            ?missing,
            ?unexpected,
            "projection and full records disagree on result membership"
        );
        return Err(AppError::ContractViolation { missing, unexpected });
    }

    Ok(result)
}
