// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
// ============================================================================

pub mod events;     // Gestion des événements clavier
pub mod dashboard;  // Rendu de la page (routing, header, footer)
pub mod converter;  // Carte du convertisseur
pub mod live_rates; // Carte des taux en direct

// Re-exports pour simplifier les imports
pub use events::{Event, EventHandler};
pub use dashboard::render;
