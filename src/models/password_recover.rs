// ============================================================================
// MODÈLE : PASSWORD RECOVER
// ============================================================================
//
// Description:
//   Modèle de la table tb_password_recover. Une ligne = LE token de
//   récupération actif d'un compte.
//
// Colonnes de la table tb_password_recover:
//   - id (BIGINT, PRIMARY KEY, SERIAL)
//   - token (VARCHAR, UNIQUE, NOT NULL) - 32 octets aléatoires en base64 URL-safe
//   - email (VARCHAR, UNIQUE, NOT NULL) - compte visé
//   - expiration (TIMESTAMPTZ, NOT NULL) - création + RECOVER_TOKEN_MINUTES
//
// Workflow:
//   1. User demande un token via POST /api/auth/recover-token
//   2. Backend fait un UPSERT sur email (l'ancien token est remplacé)
//   3. Backend envoie email avec lien contenant le token
//   4. Frontend envoie PUT /api/auth/new-password avec token + nouveau password
//   5. Backend supprime la ligne ET change le password dans UNE transaction
//
// Points d'attention:
//   - UNIQUE(email) : au plus un token actif par compte
//   - Pas de colonne "used" : un token consommé est supprimé
//   - Token valide seulement si now < expiration
//
// ============================================================================

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tb_password_recover")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(unique)]
    pub token: String,

    #[sea_orm(unique)]
    pub email: String,

    pub expiration: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
