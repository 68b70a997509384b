// ============================================================================
// LazyFX - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;       // Client API Frankfurter
pub mod models;    // Structures de données (devises, taux, conversion)
pub mod app;       // État de l'application (contrôleur unique)
pub mod config;    // Configuration (URL de l'API, dossier des logs)
pub mod worker;    // Worker thread pour les appels réseau
pub mod ui;        // Interface utilisateur
