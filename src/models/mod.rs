// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Point d'entrée pour tous les modèles de données.
//   Chaque entité correspond à une table SeaORM (Postgres ou SQLite).
//
// Liste des modules:
//   - health : Health check API
//   - users : Utilisateurs (profil, hash du mot de passe, last_seen)
//   - posts : Messages courts (140 caractères max)
//   - followers : Table d'association follower_id -> followed_id
//   - dto : Formulaires et réponses de l'API
//
// Points d'attention:
//   - Le token de reset password n'est PAS une table: c'est un JWT signé
//     (voir utils::jwt)
//   - Une relation "follow" est une simple paire, clé primaire composite
//
// ============================================================================

pub mod health;
pub mod users;
pub mod posts;
pub mod followers;
pub mod dto;
