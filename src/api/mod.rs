// ============================================================================
// Module : api
// ============================================================================
// Ce module contient le client de l'API de taux de change (Frankfurter)
// ============================================================================

pub mod frankfurter;  // Client API Frankfurter

// Re-export des éléments principaux
pub use frankfurter::{FrankfurterClient, DEFAULT_BASE_URL};
