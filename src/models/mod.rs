// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données de l'application
// ============================================================================

pub mod currency;   // Catalogue des devises supportées
pub mod rates;      // Table des taux en direct
pub mod conversion; // État du convertisseur et tendance

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use lazyfx::models::currency::Catalog;
// On peut faire : use lazyfx::models::Catalog;
pub use currency::Catalog;
pub use rates::{format_rate, RateTable, TARGET_CURRENCIES};
pub use conversion::{format_amount, trend_reference_date, Conversion, Trend};
