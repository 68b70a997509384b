// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état global de l'application TUI
//
// CONCEPTS RUST :
// 1. State Management : centraliser l'état dans une seule structure
// 2. Mutabilité contrôlée : &mut self pour modifier l'état
// 3. Commandes en retour : les méthodes renvoient l'AppCommand à envoyer
//    au worker au lieu de faire le réseau elles-mêmes
//
// PATTERN : "Application State"
// - Tous les composants de l'UI lisent depuis App
// - Toutes les modifications passent par les méthodes de App
// - App est possédée par la boucle d'événements (pas de Mutex)
//
// Requêtes périmées :
// - Chaque requête de taux reçoit un numéro de génération
// - Un résultat dont le numéro n'est plus le dernier émis est ignoré
// - Un changement rapide de paire ne peut donc pas être écrasé par une
//   réponse plus ancienne arrivée en retard
// ============================================================================

use std::sync::mpsc;

use tracing::{debug, error, info, warn};

use crate::models::{Catalog, Conversion, RateTable};
use crate::worker::{AppCommand, AppResult, RequestId};

/// Message affiché quand le catalogue ne peut pas être chargé
pub const CATALOG_ERROR_MESSAGE: &str = "Failed to load currency data.";

/// Longueur maximale du montant saisi (au-delà, f64 perd toute précision)
pub const MAX_AMOUNT_LEN: usize = 15;

// ============================================================================
// Enum : Phase
// ============================================================================
// CONCEPT RUST : Enums pour state machines
// - Loading : catalogue en cours de chargement
// - Ready : dashboard complet
// - Failed : message d'erreur seul (pas de retry)
// ============================================================================

/// Phase globale de la page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Catalogue en cours de chargement
    Loading,

    /// Catalogue chargé : convertisseur et tableau affichés
    Ready,

    /// Échec du catalogue : seul le message est affiché
    Failed(String),
}

/// Champ qui reçoit les touches clavier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Saisie du montant
    Amount,
    /// Sélecteur de devise source
    From,
    /// Sélecteur de devise destination
    To,
    /// Sélecteur de devise de base (tableau des taux)
    Base,
}

impl Focus {
    /// Champ suivant (Tab)
    pub fn next(self) -> Self {
        match self {
            Focus::Amount => Focus::From,
            Focus::From => Focus::To,
            Focus::To => Focus::Base,
            Focus::Base => Focus::Amount,
        }
    }

    /// Champ précédent (Shift-Tab)
    pub fn previous(self) -> Self {
        match self {
            Focus::Amount => Focus::Base,
            Focus::From => Focus::Amount,
            Focus::To => Focus::From,
            Focus::Base => Focus::To,
        }
    }
}

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Phase de la page (chargement, prête, erreur)
    pub phase: Phase,

    /// Devises supportées (vide tant que le catalogue n'est pas chargé)
    pub catalog: Catalog,

    /// Champ actif
    pub focus: Focus,

    /// Texte saisi pour le montant (ex: "12.5")
    pub amount_input: String,

    /// Montant, paire, taux unitaire et tendance
    pub conversion: Conversion,

    /// Devise de base du tableau des taux
    pub base_currency: String,

    /// Dernière table de taux chargée
    pub rates: RateTable,

    /// Indique que la table est en cours de chargement
    pub rates_loading: bool,

    /// Indique si l'utilisateur a demandé à quitter (attend confirmation)
    /// - Première pression de 'q' : confirm_quit = true
    /// - Deuxième pression de 'q' : running = false
    /// - N'importe quelle autre touche : annulation
    pub confirm_quit: bool,

    /// Compteur de ticks, fait tourner les spinners
    pub tick_count: u64,

    /// Dernière génération émise pour la conversion
    conversion_request: RequestId,

    /// Dernière génération émise pour la table des taux
    rates_request: RequestId,
}

impl App {
    /// Crée l'application avec les valeurs initiales : 1 USD → EUR, base USD
    pub fn new() -> Self {
        let conversion = Conversion::default();
        Self {
            running: true,
            phase: Phase::Loading,
            catalog: Catalog::default(),
            focus: Focus::Amount,
            amount_input: format_input(conversion.amount),
            conversion,
            base_currency: "USD".to_string(),
            rates: RateTable::default(),
            rates_loading: false,
            confirm_quit: false,
            tick_count: 0,
            conversion_request: 0,
            rates_request: 0,
        }
    }

    /// Crée une App avec un catalogue déjà chargé
    pub fn with_catalog(catalog: Catalog) -> Self {
        let mut app = Self::new();
        app.catalog = catalog;
        app.phase = Phase::Ready;
        app
    }

    /// Commandes à envoyer au démarrage
    ///
    /// Le catalogue, le taux de la paire initiale et la table partent en
    /// même temps : ils ne dépendent pas les uns des autres.
    pub fn start(&mut self) -> Vec<AppCommand> {
        let mut commands = vec![AppCommand::LoadCatalog];
        commands.extend(self.refresh_conversion());
        commands.push(self.refresh_rates());
        commands
    }

    // ========================================================================
    // Cycle de vie
    // ========================================================================

    /// Quitte l'application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Vérifie si l'application doit continuer
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Tick : appelé à chaque itération de la boucle (anime les spinners)
    pub fn tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
    }

    /// Vérifie si le dashboard complet est affiché
    pub fn is_ready(&self) -> bool {
        self.phase == Phase::Ready
    }

    /// Demande la confirmation de quitter
    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    /// Annule la demande de quit
    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    /// Vérifie si on attend la confirmation de quit
    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    // ========================================================================
    // Focus
    // ========================================================================

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    // ========================================================================
    // Montant
    // ========================================================================
    // Le montant ne déclenche jamais de requête : le montant converti est
    // recalculé à partir du taux déjà connu.
    // ========================================================================

    /// Définit le montant
    pub fn set_amount(&mut self, amount: f64) {
        self.conversion.amount = amount;
        self.amount_input = format_input(amount);
    }

    /// Ajoute un caractère au montant saisi (chiffres et un seul '.')
    pub fn append_amount_char(&mut self, c: char) {
        let accepted = c.is_ascii_digit() || (c == '.' && !self.amount_input.contains('.'));
        if !accepted || self.amount_input.len() >= MAX_AMOUNT_LEN {
            return;
        }
        self.amount_input.push(c);
        self.conversion.amount = parse_amount(&self.amount_input);
    }

    /// Supprime le dernier caractère du montant saisi
    pub fn amount_backspace(&mut self) {
        self.amount_input.pop();
        self.conversion.amount = parse_amount(&self.amount_input);
    }

    // ========================================================================
    // Sélection des devises
    // ========================================================================

    /// Change la devise source
    pub fn set_from(&mut self, code: &str) -> Option<AppCommand> {
        if !self.accepts(code) || self.conversion.from == code {
            return None;
        }
        info!(from = %code, "User changed source currency");
        self.conversion.from = code.to_string();
        self.refresh_conversion()
    }

    /// Change la devise destination
    pub fn set_to(&mut self, code: &str) -> Option<AppCommand> {
        if !self.accepts(code) || self.conversion.to == code {
            return None;
        }
        info!(to = %code, "User changed destination currency");
        self.conversion.to = code.to_string();
        self.refresh_conversion()
    }

    /// Change la devise de base du tableau
    ///
    /// Ignoré pendant le chargement de la table (sélecteur désactivé).
    pub fn set_base(&mut self, code: &str) -> Option<AppCommand> {
        if self.rates_loading {
            debug!(base = %code, "Base selector disabled while rates are loading");
            return None;
        }
        if !self.accepts(code) || self.base_currency == code {
            return None;
        }
        info!(base = %code, "User changed base currency");
        self.base_currency = code.to_string();
        Some(self.refresh_rates())
    }

    /// Passe à la devise suivante dans le sélecteur actif
    pub fn select_next(&mut self) -> Option<AppCommand> {
        let current = self.focused_code()?;
        let code = self.catalog.next_after(&current)?.to_string();
        self.select_focused(&code)
    }

    /// Passe à la devise précédente dans le sélecteur actif
    pub fn select_previous(&mut self) -> Option<AppCommand> {
        let current = self.focused_code()?;
        let code = self.catalog.previous_before(&current)?.to_string();
        self.select_focused(&code)
    }

    /// Code sélectionné dans le sélecteur actif (None pour le montant)
    fn focused_code(&self) -> Option<String> {
        match self.focus {
            Focus::Amount => None,
            Focus::From => Some(self.conversion.from.clone()),
            Focus::To => Some(self.conversion.to.clone()),
            Focus::Base => Some(self.base_currency.clone()),
        }
    }

    fn select_focused(&mut self, code: &str) -> Option<AppCommand> {
        match self.focus {
            Focus::Amount => None,
            Focus::From => self.set_from(code),
            Focus::To => self.set_to(code),
            Focus::Base => self.set_base(code),
        }
    }

    /// Un code n'est accepté que s'il fait partie du catalogue
    fn accepts(&self, code: &str) -> bool {
        if self.catalog.contains(code) {
            true
        } else {
            warn!(code = %code, "Ignoring currency missing from catalog");
            false
        }
    }

    // ========================================================================
    // Requêtes
    // ========================================================================

    /// Prépare la requête de taux pour la paire courante
    ///
    /// - Paire identique : taux 1, tendance neutre, pas de requête
    /// - Sinon : converting = true, taux effacé, nouvelle génération
    ///
    /// La génération est incrémentée dans les deux cas pour invalider une
    /// requête encore en vol.
    pub fn refresh_conversion(&mut self) -> Option<AppCommand> {
        self.conversion_request += 1;

        if self.conversion.is_identity() {
            debug!(currency = %self.conversion.from, "Identity pair, rate is 1");
            self.conversion.settle_identity();
            return None;
        }

        self.conversion.begin_fetch();
        Some(AppCommand::FetchConversion {
            request: self.conversion_request,
            from: self.conversion.from.clone(),
            to: self.conversion.to.clone(),
        })
    }

    /// Prépare la requête de la table pour la devise de base courante
    pub fn refresh_rates(&mut self) -> AppCommand {
        self.rates_request += 1;
        self.rates_loading = true;
        AppCommand::FetchRates {
            request: self.rates_request,
            base: self.base_currency.clone(),
        }
    }

    // ========================================================================
    // Résultats du worker
    // ========================================================================

    /// Applique tous les résultats arrivés depuis la dernière frame
    ///
    /// CONCEPT : try_recv() ne bloque pas
    /// - Empty : rien de nouveau
    /// - Disconnected : worker mort, voir `worker_lost`
    ///
    /// Renvoie false quand le worker a disparu : inutile de relire le channel.
    pub fn apply_pending(&mut self, results: &mpsc::Receiver<AppResult>) -> bool {
        loop {
            match results.try_recv() {
                Ok(result) => self.apply(result),
                Err(mpsc::TryRecvError::Empty) => return true,
                Err(mpsc::TryRecvError::Disconnected) => {
                    self.worker_lost();
                    return false;
                }
            }
        }
    }

    /// Le worker ne répondra plus : plus aucun chargement ne peut aboutir
    ///
    /// - Catalogue pas encore chargé : page d'erreur
    /// - Spinners arrêtés, l'état déjà affiché est conservé
    pub fn worker_lost(&mut self) {
        error!("Worker thread disconnected");
        if self.phase == Phase::Loading {
            self.apply(AppResult::CatalogFailed {
                error: "worker thread stopped".to_string(),
            });
        }
        self.conversion.abandon_fetch();
        self.rates_loading = false;
    }

    /// Lignes du tableau à afficher
    ///
    /// Après un échec de changement de base, `rates` est encore exprimée dans
    /// l'ancienne base : la base sélectionnée en est retirée.
    pub fn visible_rates(&self) -> impl Iterator<Item = (&str, f64)> {
        self.rates
            .iter()
            .filter(move |(code, _)| *code != self.base_currency)
    }

    /// Applique un résultat renvoyé par le worker
    ///
    /// CONCEPT RUST : Pattern matching avec guards
    /// - Les résultats d'une génération dépassée sont ignorés
    pub fn apply(&mut self, result: AppResult) {
        match result {
            AppResult::CatalogLoaded { catalog } => {
                info!(count = catalog.len(), "Currency catalog ready");
                self.catalog = catalog;
                self.phase = Phase::Ready;
            }

            AppResult::CatalogFailed { error } => {
                warn!(error = %error, "Currency catalog unavailable");
                self.phase = Phase::Failed(CATALOG_ERROR_MESSAGE.to_string());
            }

            AppResult::ConversionLoaded { request, from, to, .. }
            | AppResult::ConversionFailed { request, from, to, .. }
                if request != self.conversion_request =>
            {
                debug!(request, latest = self.conversion_request, from = %from, to = %to, "Discarding stale conversion result");
            }

            AppResult::ConversionLoaded { rate, trend, .. } => {
                self.conversion.settle(rate, trend);
            }

            AppResult::ConversionFailed { error, .. } => {
                warn!(error = %error, "Keeping previous conversion state after error");
                self.conversion.abandon_fetch();
            }

            AppResult::RatesLoaded { request, table } if request != self.rates_request => {
                debug!(request, latest = self.rates_request, base = %table.base, "Discarding stale rate table");
            }

            AppResult::RatesFailed { request, base, .. } if request != self.rates_request => {
                debug!(request, latest = self.rates_request, base = %base, "Discarding stale rate table error");
            }

            AppResult::RatesLoaded { table, .. } => {
                // La table est déjà sans sa base, on la remplace en entier
                self.rates = table;
                self.rates_loading = false;
            }

            AppResult::RatesFailed { error, .. } => {
                warn!(error = %error, "Keeping previous rate table after error");
                self.rates_loading = false;
            }
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Convertit la saisie en montant (vide ou invalide → 0)
pub fn parse_amount(input: &str) -> f64 {
    input.trim().parse::<f64>().unwrap_or(0.0)
}

/// Texte initial du champ montant (ex: 1.0 → "1", 2.5 → "2.5")
fn format_input(amount: f64) -> String {
    format!("{}", amount)
}

// ============================================================================
// Tests unitaires
// ============================================================================
