// ============================================================================
// API Client : Frankfurter
// ============================================================================
// Récupère les devises et les taux de change depuis api.frankfurter.app
// (taux publiés chaque jour par la Banque Centrale Européenne)
//
// Endpoints utilisés :
// - GET /currencies                          → catalogue des devises
// - GET /latest?amount=1&from=USD&to=EUR     → taux unitaire actuel
// - GET /2024-02-28?amount=1&from=USD&to=EUR → taux unitaire historique
// - GET /latest?from=USD&to=EUR,GBP,...      → taux pour plusieurs devises
// ============================================================================

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

use crate::models::{Catalog, RateTable};

/// URL publique de l'API
pub const DEFAULT_BASE_URL: &str = "https://api.frankfurter.app";

// ============================================================================
// Structures pour parser la réponse JSON de Frankfurter
// ============================================================================

/// Réponse commune à /latest et /{date}
///
/// Exemple :
/// {"amount":1.0,"base":"USD","date":"2024-02-28","rates":{"EUR":0.9245}}
#[derive(Debug, Deserialize)]
struct RatesResponse {
    base: String,
    date: NaiveDate,
    rates: BTreeMap<String, f64>,
}

// ============================================================================
// Client
// ============================================================================

/// Client HTTP pour l'API Frankfurter
///
/// CONCEPT RUST : Clone bon marché
/// - reqwest::Client partage son pool de connexions en interne (Arc)
/// - Cloner le client pour chaque tâche async ne recrée pas de connexions
#[derive(Debug, Clone)]
pub struct FrankfurterClient {
    base_url: String,
    http: reqwest::Client,
}

impl FrankfurterClient {
    /// Crée un client pointant vers `base_url` (sans slash final)
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("lazyfx/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Échec de la création du client HTTP")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// URL de base utilisée par le client
    #[cfg(test)]
    fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Récupère le catalogue complet des devises supportées
    #[instrument(skip(self))]
    pub async fn fetch_currencies(&self) -> Result<Catalog> {
        let currencies: BTreeMap<String, String> = self.get_json("/currencies", &[]).await?;
        info!(count = currencies.len(), "Currency catalog fetched");
        Ok(Catalog::new(currencies))
    }

    /// Taux unitaire actuel : 1 `from` = X `to`
    #[instrument(skip(self))]
    pub async fn fetch_latest_rate(&self, from: &str, to: &str) -> Result<f64> {
        self.fetch_unit_rate("/latest", from, to).await
    }

    /// Taux unitaire à une date donnée
    #[instrument(skip(self))]
    pub async fn fetch_historical_rate(&self, date: NaiveDate, from: &str, to: &str) -> Result<f64> {
        let path = format!("/{}", date.format("%Y-%m-%d"));
        self.fetch_unit_rate(&path, from, to).await
    }

    /// Taux actuels de plusieurs devises relatifs à `base`
    ///
    /// La devise de base est retirée du résultat si l'API la renvoie.
    #[instrument(skip(self, targets), fields(targets = targets.len()))]
    pub async fn fetch_rates(&self, base: &str, targets: &[&str]) -> Result<RateTable> {
        let to = targets.join(",");
        let response: RatesResponse = self
            .get_json("/latest", &[("from", base), ("to", to.as_str())])
            .await?;

        debug!(base = %response.base, date = %response.date, count = response.rates.len(), "Received rate table");
        Ok(RateTable::new(base, response.rates))
    }

    /// Requête commune aux taux unitaires (amount=1)
    async fn fetch_unit_rate(&self, path: &str, from: &str, to: &str) -> Result<f64> {
        let response: RatesResponse = self
            .get_json(path, &[("amount", "1"), ("from", from), ("to", to)])
            .await?;

        let rate = response
            .rates
            .get(to)
            .copied()
            .with_context(|| format!("Taux {} absent de la réponse ({} au {})", to, response.base, response.date))?;

        debug!(from = %from, to = %to, rate, date = %response.date, "Unit rate fetched");
        Ok(rate)
    }

    /// Envoie un GET et désérialise la réponse JSON
    ///
    /// CONCEPT RUST : Générique avec trait bound
    /// - T: DeserializeOwned : n'importe quel type désérialisable sans emprunt
    /// - Le type est choisi par l'appelant (annotation de la variable)
    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, ?query, "Sending HTTP request to Frankfurter");

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .context("Échec de la requête HTTP vers Frankfurter")?;

        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        // Vérifie que la réponse est un succès HTTP (200-299)
        if !status.is_success() {
            error!(status = %status, url = %url, "Frankfurter returned error status");
            anyhow::bail!("Frankfurter a retourné une erreur : HTTP {}", status);
        }

        let body = response
            .text()
            .await
            .context("Échec de la lecture de la réponse Frankfurter")?;

        // Parse à la main pour pouvoir logger le corps reçu en cas d'erreur
        match serde_json::from_str::<T>(&body) {
            Ok(data) => Ok(data),
            Err(e) => {
                error!(error = ?e, response = %body, "Failed to parse Frankfurter response");
                Err(e).context("Échec du parsing JSON de la réponse Frankfurter")
            }
        }
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
// Les tests utilisent un faux serveur HTTP (wiremock) : pas de réseau
// ============================================================================
