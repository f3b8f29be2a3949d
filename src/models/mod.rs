// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Point d'entrée pour tous les modèles de données.
//   Chaque entité correspond à une table PostgreSQL avec SeaORM.
//
// Liste des modules:
//   - health : Health check API
//   - users : Comptes utilisateurs (email + hash du mot de passe)
//   - password_recover : Token de récupération actif par compte
//   - product : Produits du catalogue
//   - category : Catégories
//   - product_category : Jointure many-to-many produit <-> catégorie
//   - dto : Data Transfer Objects pour les requêtes/réponses API
//
// Points d'attention:
//   - Tous les modèles utilisent SeaORM (pas de SQL brut)
//   - Les tables ont le préfixe "tb_" (schéma existant du catalogue)
//
// ============================================================================

pub mod health;
pub mod users;
pub mod password_recover;
pub mod product;
pub mod category;
pub mod product_category;
pub mod dto;
