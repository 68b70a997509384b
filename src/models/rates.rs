// ============================================================================
// Structure : RateTable
// ============================================================================
// Taux de change de plusieurs devises relatifs à une devise de base
//
// La table est remplacée en entier à chaque chargement (pas de mise à jour
// incrémentale). Elle ne contient jamais sa propre devise de base.
// ============================================================================

use std::collections::BTreeMap;

/// Devises affichées dans le tableau des taux en direct
pub const TARGET_CURRENCIES: [&str; 10] = [
    "EUR", "GBP", "JPY", "AUD", "CAD", "CHF", "CNY", "SEK", "NZD", "MXN",
];

/// Table de taux relative à une devise de base
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTable {
    /// Devise de base (ex: "USD")
    pub base: String,

    /// Code → multiplicateur (1 base = X code)
    rates: BTreeMap<String, f64>,
}

impl RateTable {
    /// Crée une table et retire l'entrée de la devise de base
    ///
    /// CONCEPT : Invariant garanti à la construction
    /// - Un taux base → base (toujours 1) n'a pas de sens dans le tableau
    /// - On le retire ici, l'appelant n'a pas à y penser
    pub fn new(base: impl Into<String>, mut rates: BTreeMap<String, f64>) -> Self {
        let base = base.into();
        rates.remove(&base);
        Self { base, rates }
    }

    /// Taux pour une devise
    pub fn get(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.rates.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Itère sur (code, taux) dans l'ordre alphabétique
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.rates.iter().map(|(code, rate)| (code.as_str(), *rate))
    }
}

/// Formatte un taux unitaire avec 4 décimales (ex: "0.9123")
pub fn format_rate(rate: f64) -> String {
    format!("{:.4}", rate)
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rates(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(c, r)| (c.to_string(), *r)).collect()
    }

    #[test]
    fn test_new_removes_base() {
        let table = RateTable::new("EUR", rates(&[("EUR", 1.0), ("GBP", 0.85), ("JPY", 160.2)]));
        assert_eq!(table.base, "EUR");
        assert!(!table.contains("EUR"));
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("GBP"), Some(0.85));
    }

    #[test]
    fn test_new_without_base_entry_keeps_everything() {
        let table = RateTable::new("USD", rates(&[("EUR", 0.9), ("GBP", 0.78)]));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_iter_is_sorted() {
        let table = RateTable::new("USD", rates(&[("MXN", 17.1), ("AUD", 1.5)]));
        let codes: Vec<&str> = table.iter().map(|(code, _)| code).collect();
        assert_eq!(codes, vec!["AUD", "MXN"]);
    }

    #[test]
    fn test_targets_do_not_repeat() {
        let mut targets = TARGET_CURRENCIES.to_vec();
        targets.sort();
        targets.dedup();
        assert_eq!(targets.len(), TARGET_CURRENCIES.len());
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(0.9), "0.9000");
        assert_eq!(format_rate(160.123456), "160.1235");
    }
}
