// ============================================================================
// Background Worker
// ============================================================================
// CONCEPT RUST : Background async worker avec channels
// - Thread séparé qui possède un runtime tokio
// - Reçoit des AppCommand via un channel (command_rx)
// - Lance une tâche async par commande (les requêtes se chevauchent)
// - Renvoie un AppResult par commande via un autre channel (result_tx)
// - L'UI ne bloque jamais sur le réseau
//
// Chaque commande de taux porte un numéro de requête (RequestId).
// Le worker le renvoie tel quel : c'est App qui décide si le résultat
// est encore d'actualité.
// ============================================================================

use std::sync::mpsc;
use std::thread::JoinHandle;

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use tracing::{debug, error, info, warn};

use crate::api::FrankfurterClient;
use crate::models::{trend_reference_date, Catalog, RateTable, Trend, TARGET_CURRENCIES};

/// Numéro de génération d'une requête
pub type RequestId = u64;

/// Commandes envoyées au worker thread
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Charger le catalogue des devises (une seule fois au démarrage)
    LoadCatalog,

    /// Charger le taux unitaire actuel et celui d'il y a deux jours
    FetchConversion {
        request: RequestId,
        from: String,
        to: String,
    },

    /// Charger la table des taux pour une devise de base
    FetchRates { request: RequestId, base: String },
}

/// Résultats renvoyés par le worker thread
#[derive(Debug, Clone, PartialEq)]
pub enum AppResult {
    /// Catalogue chargé
    CatalogLoaded { catalog: Catalog },

    /// Échec du chargement du catalogue (bloquant pour l'UI)
    CatalogFailed { error: String },

    /// Taux et tendance chargés pour une paire
    ConversionLoaded {
        request: RequestId,
        from: String,
        to: String,
        rate: f64,
        trend: Trend,
    },

    /// Échec du chargement du taux ou du taux historique
    ConversionFailed {
        request: RequestId,
        from: String,
        to: String,
        error: String,
    },

    /// Table des taux chargée
    RatesLoaded { request: RequestId, table: RateTable },

    /// Échec du chargement de la table
    RatesFailed {
        request: RequestId,
        base: String,
        error: String,
    },
}

/// Lance le worker thread
///
/// Le thread s'arrête quand tous les `Sender<AppCommand>` sont droppés.
///
/// # Arguments
/// * `client` - Client Frankfurter (cloné pour chaque tâche)
/// * `command_rx` - Receiver pour recevoir les commandes
/// * `result_tx` - Sender pour envoyer les résultats
pub fn spawn_background_worker(
    client: FrankfurterClient,
    command_rx: mpsc::Receiver<AppCommand>,
    result_tx: mpsc::Sender<AppResult>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        // Runtime multi-thread : plusieurs requêtes peuvent être en vol
        let runtime = match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime,
            Err(e) => {
                error!(error = ?e, "Failed to create tokio runtime, worker not started");
                return;
            }
        };

        // CONCEPT : while let sur recv()
        // - Ok(command) : traite la commande
        // - Err(_) : channel fermé, on sort de la boucle
        while let Ok(command) = command_rx.recv() {
            info!(?command, "Worker received command");

            let client = client.clone();
            let result_tx = result_tx.clone();
            runtime.spawn(async move {
                let today = Utc::now().date_naive();
                let result = execute(&client, command, today).await;
                if result_tx.send(result).is_err() {
                    debug!("Result channel closed, dropping result");
                }
            });
        }

        info!("Worker thread exiting (channel closed)");
        runtime.shutdown_background();
    })
}

/// Exécute une commande et la transforme en résultat
///
/// `today` est passé en paramètre pour que la date historique soit
/// déterministe dans les tests.
pub async fn execute(client: &FrankfurterClient, command: AppCommand, today: NaiveDate) -> AppResult {
    match command {
        AppCommand::LoadCatalog => match client.fetch_currencies().await {
            Ok(catalog) => AppResult::CatalogLoaded { catalog },
            Err(e) => {
                error!(error = ?e, "Failed to load currency catalog");
                AppResult::CatalogFailed {
                    error: format!("{:#}", e),
                }
            }
        },

        AppCommand::FetchConversion { request, from, to } => {
            match fetch_conversion(client, &from, &to, today).await {
                Ok((rate, trend)) => {
                    info!(request, from = %from, to = %to, rate, ?trend, "Conversion rate loaded");
                    AppResult::ConversionLoaded {
                        request,
                        from,
                        to,
                        rate,
                        trend,
                    }
                }
                Err(e) => {
                    warn!(request, from = %from, to = %to, error = ?e, "Conversion error");
                    AppResult::ConversionFailed {
                        request,
                        from,
                        to,
                        error: format!("{:#}", e),
                    }
                }
            }
        }

        AppCommand::FetchRates { request, base } => {
            match client.fetch_rates(&base, &TARGET_CURRENCIES).await {
                Ok(table) => {
                    info!(request, base = %base, count = table.len(), "Rate table loaded");
                    AppResult::RatesLoaded { request, table }
                }
                Err(e) => {
                    warn!(request, base = %base, error = ?e, "Rates fetch error");
                    AppResult::RatesFailed {
                        request,
                        base,
                        error: format!("{:#}", e),
                    }
                }
            }
        }
    }
}

/// Charge le taux actuel puis le taux historique et calcule la tendance
async fn fetch_conversion(
    client: &FrankfurterClient,
    from: &str,
    to: &str,
    today: NaiveDate,
) -> Result<(f64, Trend)> {
    let current = client.fetch_latest_rate(from, to).await?;

    let reference_date = trend_reference_date(today);
    let historical = client.fetch_historical_rate(reference_date, from, to).await?;

    let trend = Trend::between(current, historical);
    debug!(current, historical, %reference_date, ?trend, "Computed trend");
    Ok((current, trend))
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn unit_rate_json(base: &str, to: &str, rate: f64) -> String {
        format!(
            r#"{{"amount":1.0,"base":"{}","date":"2024-03-01","rates":{{"{}":{}}}}}"#,
            base, to, rate
        )
    }

    async fn mount_pair(server: &MockServer, current: f64, historical: f64) {
        Mock::given(method("GET"))
            .and(path("/latest"))
            .and(query_param("from", "USD"))
            .and(query_param("to", "EUR"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(unit_rate_json("USD", "EUR", current), "application/json"))
            .mount(server)
            .await;

        Mock::given(method("GET"))
            .and(path("/2024-02-28"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(unit_rate_json("USD", "EUR", historical), "application/json"))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_conversion_trend_down() {
        let server = MockServer::start().await;
        mount_pair(&server, 0.90, 0.95).await;
        let client = FrankfurterClient::new(&server.uri()).unwrap();

        let command = AppCommand::FetchConversion {
            request: 7,
            from: "USD".to_string(),
            to: "EUR".to_string(),
        };

        let result = execute(&client, command, today()).await;
        assert_eq!(
            result,
            AppResult::ConversionLoaded {
                request: 7,
                from: "USD".to_string(),
                to: "EUR".to_string(),
                rate: 0.90,
                trend: Trend::Down,
            }
        );
    }

    #[tokio::test]
    async fn test_conversion_trend_up() {
        let server = MockServer::start().await;
        mount_pair(&server, 0.97, 0.95).await;
        let client = FrankfurterClient::new(&server.uri()).unwrap();

        let command = AppCommand::FetchConversion {
            request: 1,
            from: "USD".to_string(),
            to: "EUR".to_string(),
        };

        match execute(&client, command, today()).await {
            AppResult::ConversionLoaded { trend, .. } => assert_eq!(trend, Trend::Up),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_conversion_fails_without_historical_rate() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latest"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(unit_rate_json("USD", "EUR", 0.9), "application/json"))
            .mount(&server)
            .await;
        let client = FrankfurterClient::new(&server.uri()).unwrap();

        let command = AppCommand::FetchConversion {
            request: 3,
            from: "USD".to_string(),
            to: "EUR".to_string(),
        };

        match execute(&client, command, today()).await {
            AppResult::ConversionFailed { request, .. } => assert_eq!(request, 3),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_rates_for_usd_base() {
        let server = MockServer::start().await;
        let rates: Vec<String> = TARGET_CURRENCIES
            .iter()
            .enumerate()
            .map(|(i, code)| format!(r#""{}":{}"#, code, 1.0 + i as f64 / 10.0))
            .collect();
        let body = format!(
            r#"{{"amount":1.0,"base":"USD","date":"2024-03-01","rates":{{{}}}}}"#,
            rates.join(",")
        );
        Mock::given(method("GET"))
            .and(path("/latest"))
            .and(query_param("from", "USD"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
            .mount(&server)
            .await;
        let client = FrankfurterClient::new(&server.uri()).unwrap();

        let command = AppCommand::FetchRates {
            request: 2,
            base: "USD".to_string(),
        };

        match execute(&client, command, today()).await {
            AppResult::RatesLoaded { request, table } => {
                assert_eq!(request, 2);
                assert_eq!(table.len(), TARGET_CURRENCIES.len());
                assert!(!table.contains("USD"));
                for code in TARGET_CURRENCIES {
                    assert!(table.contains(code), "missing {}", code);
                }
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_catalog_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/currencies"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        let client = FrankfurterClient::new(&server.uri()).unwrap();

        let result = execute(&client, AppCommand::LoadCatalog, today()).await;
        assert!(matches!(result, AppResult::CatalogFailed { .. }));
    }

    #[tokio::test]
    async fn test_background_worker_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/currencies"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"EUR":"Euro","USD":"United States Dollar"}"#, "application/json"))
            .mount(&server)
            .await;
        let client = FrankfurterClient::new(&server.uri()).unwrap();

        let (command_tx, command_rx) = mpsc::channel();
        let (result_tx, result_rx) = mpsc::channel();
        let handle = spawn_background_worker(client, command_rx, result_tx);

        command_tx.send(AppCommand::LoadCatalog).unwrap();

        // Attente non bloquante pour laisser tourner le runtime du test
        let mut received = None;
        for _ in 0..500 {
            if let Ok(result) = result_rx.try_recv() {
                received = Some(result);
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        match received {
            Some(AppResult::CatalogLoaded { catalog }) => assert_eq!(catalog.len(), 2),
            other => panic!("unexpected result: {:?}", other),
        }

        drop(command_tx);
        handle.join().unwrap();
    }
}
