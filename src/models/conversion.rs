// ============================================================================
// Structure : Conversion
// ============================================================================
// État du convertisseur : montant, paire de devises, taux unitaire, tendance
//
// CONCEPTS RUST :
// 1. Option<f64> : le taux est absent pendant le chargement
// 2. Valeur dérivée : le montant converti est calculé, jamais stocké
// 3. Enum Copy : Trend est petit, on le copie au lieu de l'emprunter
// ============================================================================

use chrono::{Duration, NaiveDate};

/// Nombre de jours entre le taux actuel et le taux de référence de la tendance
pub const TREND_LOOKBACK_DAYS: i64 = 2;

/// Direction du taux par rapport au taux d'il y a deux jours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    /// Le taux actuel est strictement supérieur
    Up,
    /// Le taux actuel est strictement inférieur
    Down,
    /// Égalité (ou comparaison impossible)
    Neutral,
}

impl Trend {
    /// Compare le taux actuel au taux historique
    ///
    /// CONCEPT : Comparaison stricte
    /// - current > historical → Up
    /// - current < historical → Down
    /// - sinon (égalité, NaN) → Neutral
    pub fn between(current: f64, historical: f64) -> Self {
        if current > historical {
            Trend::Up
        } else if current < historical {
            Trend::Down
        } else {
            Trend::Neutral
        }
    }

    /// Label affiché dans le badge de tendance
    pub fn label(&self) -> &str {
        match self {
            Trend::Up => "Trending Up ↗",
            Trend::Down => "Trending Down ↘",
            Trend::Neutral => "Stable -",
        }
    }
}

/// Date du taux de référence pour la tendance (aujourd'hui - 2 jours)
pub fn trend_reference_date(today: NaiveDate) -> NaiveDate {
    today - Duration::days(TREND_LOOKBACK_DAYS)
}

/// Formatte un montant avec 2 décimales (ex: "90.00")
pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

/// État courant du convertisseur
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    /// Montant saisi (en devise source)
    pub amount: f64,

    /// Devise source (ex: "USD")
    pub from: String,

    /// Devise destination (ex: "EUR")
    pub to: String,

    /// Taux unitaire : 1 from = rate to
    /// - None pendant le chargement d'une nouvelle paire
    pub rate: Option<f64>,

    /// Tendance (None tant que les deux taux ne sont pas connus)
    pub trend: Option<Trend>,

    /// Indique qu'une requête de taux est en cours pour la paire
    pub converting: bool,
}

impl Conversion {
    /// Crée un convertisseur sans taux
    pub fn new(amount: f64, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            amount,
            from: from.into(),
            to: to.into(),
            rate: None,
            trend: None,
            converting: false,
        }
    }

    /// Vérifie si la paire est identique (ex: USD → USD)
    pub fn is_identity(&self) -> bool {
        self.from == self.to
    }

    /// Montant converti : amount × rate (None si pas de taux)
    pub fn converted_amount(&self) -> Option<f64> {
        self.rate.map(|rate| self.amount * rate)
    }

    /// Montant converti formatté pour l'affichage ("0.00" sans taux)
    pub fn display_converted(&self) -> String {
        format_amount(self.converted_amount().unwrap_or(0.0))
    }

    /// Applique la paire identique : taux 1, tendance neutre
    pub fn settle_identity(&mut self) {
        self.rate = Some(1.0);
        self.trend = Some(Trend::Neutral);
        self.converting = false;
    }

    /// Démarre le chargement d'une nouvelle paire
    ///
    /// Efface le taux précédent pour ne jamais afficher un montant
    /// calculé avec le taux d'une autre paire.
    pub fn begin_fetch(&mut self) {
        self.converting = true;
        self.rate = None;
        self.trend = None;
    }

    /// Enregistre le taux et la tendance reçus
    pub fn settle(&mut self, rate: f64, trend: Trend) {
        self.rate = Some(rate);
        self.trend = Some(trend);
        self.converting = false;
    }

    /// Termine le chargement sans résultat (erreur réseau, etc.)
    pub fn abandon_fetch(&mut self) {
        self.converting = false;
    }
}

impl Default for Conversion {
    fn default() -> Self {
        Self::new(1.0, "USD", "EUR")
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_between() {
        assert_eq!(Trend::between(1.1, 1.0), Trend::Up);
        assert_eq!(Trend::between(0.90, 0.95), Trend::Down);
        assert_eq!(Trend::between(0.95, 0.95), Trend::Neutral);
        assert_eq!(Trend::between(f64::NAN, 0.95), Trend::Neutral);
    }

    #[test]
    fn test_trend_labels() {
        assert_eq!(Trend::Up.label(), "Trending Up ↗");
        assert_eq!(Trend::Down.label(), "Trending Down ↘");
        assert_eq!(Trend::Neutral.label(), "Stable -");
    }

    #[test]
    fn test_trend_reference_date() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let expected = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        assert_eq!(trend_reference_date(today), expected);
    }

    #[test]
    fn test_converted_amount_follows_rate() {
        let mut conversion = Conversion::new(250.0, "USD", "EUR");
        assert_eq!(conversion.converted_amount(), None);
        assert_eq!(conversion.display_converted(), "0.00");

        conversion.settle(0.9, Trend::Down);
        assert_eq!(conversion.display_converted(), "225.00");

        conversion.amount = 12.345;
        assert_eq!(conversion.display_converted(), format!("{:.2}", 12.345 * 0.9));
    }

    #[test]
    fn test_display_rounds_to_two_decimals() {
        for (amount, rate) in [(1.0, 0.91234), (3.333, 1.5), (0.0, 160.0), (1e6, 0.0001)] {
            let mut conversion = Conversion::new(amount, "USD", "JPY");
            conversion.settle(rate, Trend::Neutral);
            assert_eq!(conversion.display_converted(), format!("{:.2}", amount * rate));
        }
    }

    #[test]
    fn test_begin_fetch_clears_rate_and_trend() {
        let mut conversion = Conversion::default();
        conversion.settle(0.9, Trend::Up);

        conversion.begin_fetch();
        assert!(conversion.converting);
        assert!(conversion.rate.is_none());
        assert!(conversion.trend.is_none());

        conversion.abandon_fetch();
        assert!(!conversion.converting);
        assert!(conversion.rate.is_none());
    }

    #[test]
    fn test_settle_identity() {
        let mut conversion = Conversion::new(5.0, "CHF", "CHF");
        assert!(conversion.is_identity());
        conversion.settle_identity();
        assert_eq!(conversion.rate, Some(1.0));
        assert_eq!(conversion.trend, Some(Trend::Neutral));
        assert_eq!(conversion.display_converted(), "5.00");
    }
}
