// ============================================================================
// Structure : Catalog
// ============================================================================
// Liste des devises supportées par l'API (code ISO → nom complet)
//
// CONCEPTS RUST :
// 1. BTreeMap : map triée par clé (ordre alphabétique des codes garanti)
// 2. Itérateurs : position(), nth(), last() pour naviguer dans la liste
// 3. Option<&str> : retourne une référence sans copier la String
// ============================================================================

use std::collections::BTreeMap;

/// Catalogue des devises supportées
///
/// Chargé une seule fois au démarrage, il sert à valider les sélections
/// et à faire défiler les sélecteurs de devises.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    /// Code (ex: "USD") → nom (ex: "United States Dollar")
    currencies: BTreeMap<String, String>,
}

impl Catalog {
    /// Crée un catalogue à partir de la map renvoyée par l'API
    pub fn new(currencies: BTreeMap<String, String>) -> Self {
        Self { currencies }
    }

    /// Nombre de devises
    pub fn len(&self) -> usize {
        self.currencies.len()
    }

    /// Vérifie si le catalogue est vide
    pub fn is_empty(&self) -> bool {
        self.currencies.is_empty()
    }

    /// Vérifie si un code fait partie du catalogue
    pub fn contains(&self, code: &str) -> bool {
        self.currencies.contains_key(code)
    }

    /// Nom complet d'une devise (None si inconnue)
    pub fn name(&self, code: &str) -> Option<&str> {
        self.currencies.get(code).map(String::as_str)
    }

    /// Itère sur les codes dans l'ordre alphabétique
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.currencies.keys().map(String::as_str)
    }

    /// Code suivant dans la liste (boucle à la fin)
    ///
    /// CONCEPT : Cycle d'états
    /// - AUD → BGN → ... → ZAR → AUD
    /// - Un code inconnu renvoie le premier code du catalogue
    pub fn next_after(&self, code: &str) -> Option<&str> {
        let position = self.codes().position(|c| c == code);
        match position {
            Some(index) => self
                .codes()
                .nth(index + 1)
                .or_else(|| self.codes().next()),
            None => self.codes().next(),
        }
    }

    /// Code précédent dans la liste (boucle au début)
    pub fn previous_before(&self, code: &str) -> Option<&str> {
        let position = self.codes().position(|c| c == code);
        match position {
            Some(0) | None => self.codes().last(),
            Some(index) => self.codes().nth(index - 1),
        }
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> Catalog {
        let mut map = BTreeMap::new();
        map.insert("USD".to_string(), "United States Dollar".to_string());
        map.insert("EUR".to_string(), "Euro".to_string());
        map.insert("GBP".to_string(), "British Pound".to_string());
        Catalog::new(map)
    }

    #[test]
    fn test_catalog_membership() {
        let catalog = sample_catalog();
        assert_eq!(catalog.len(), 3);
        assert!(catalog.contains("EUR"));
        assert!(!catalog.contains("XYZ"));
        assert_eq!(catalog.name("EUR"), Some("Euro"));
        assert_eq!(catalog.name("XYZ"), None);
    }

    #[test]
    fn test_codes_are_sorted() {
        let catalog = sample_catalog();
        let codes: Vec<&str> = catalog.codes().collect();
        assert_eq!(codes, vec!["EUR", "GBP", "USD"]);
    }

    #[test]
    fn test_next_after_wraps() {
        let catalog = sample_catalog();
        assert_eq!(catalog.next_after("EUR"), Some("GBP"));
        assert_eq!(catalog.next_after("USD"), Some("EUR")); // Boucle
        assert_eq!(catalog.next_after("XYZ"), Some("EUR"));
    }

    #[test]
    fn test_previous_before_wraps() {
        let catalog = sample_catalog();
        assert_eq!(catalog.previous_before("GBP"), Some("EUR"));
        assert_eq!(catalog.previous_before("EUR"), Some("USD")); // Boucle
    }

    #[test]
    fn test_empty_catalog_cycles_to_nothing() {
        let catalog = Catalog::default();
        assert!(catalog.is_empty());
        assert_eq!(catalog.next_after("USD"), None);
        assert_eq!(catalog.previous_before("USD"), None);
    }
}
