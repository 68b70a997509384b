// ============================================================================
// LazyFX - Convertisseur de devises et taux en direct
// ============================================================================
// Programme TUI avec un convertisseur (montant, paire de devises, tendance)
// et un tableau de taux relatifs à une devise de base.
// Les données viennent de l'API Frankfurter (taux BCE).
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle infinie qui gère événements et rendering
// 3. Worker thread : les appels réseau ne bloquent jamais l'UI
// 4. Channels mpsc : commandes vers le worker, résultats vers l'UI
// ============================================================================

use std::io;
use std::sync::mpsc;

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info};

use lazyfx::api::FrankfurterClient;
use lazyfx::app::App;
use lazyfx::config::Config;
use lazyfx::ui::{events::EventHandler, render};
use lazyfx::worker::{spawn_background_worker, AppCommand, AppResult};

// ============================================================================
// Initialisation du logging
// ============================================================================
// CONCEPT : Logging dans une app TUI
// - Les println! ne fonctionnent pas une fois le TUI lancé
// - On log vers un fichier à la place, avec rotation quotidienne
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// # Utilisation
/// ```bash
/// # Voir les logs en temps réel
/// tail -f ~/.local/share/lazyfx/logs/lazyfx.log.*
///
/// # Contrôler le niveau de log
/// RUST_LOG=debug cargo run
/// RUST_LOG=lazyfx=trace cargo run
/// ```
fn init_logging(config: &Config) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = config.log_dir.clone();

    // Crée le répertoire s'il n'existe pas
    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    // Nouveau fichier chaque jour (lazyfx.log.2024-03-01)
    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "lazyfx.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender) // Écrit dans le fichier
                .with_ansi(false) // Pas de codes couleur dans le fichier
                .with_target(true) // Inclut le module (ex: lazyfx::api::frankfurter)
                .with_thread_ids(true) // UI et worker sont sur des threads différents
                .with_line_number(true),
        )
        .with(
            // Par défaut : debug pour lazyfx, info pour les dépendances
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lazyfx=debug,info".into()),
        )
        .try_init()
        .context("Échec de l'initialisation du subscriber tracing")?;

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    let config = Config::from_env();

    // Si l'init échoue, on affiche l'erreur et on continue sans logs
    init_logging(&config).unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {:#}", e);
        eprintln!("   Continuing without logging...");
    });

    info!(api_url = %config.api_url, "LazyFX starting up");

    let client = FrankfurterClient::new(&config.api_url)?;

    // Channels pour communiquer avec le worker
    // - command_tx/rx : commandes vers le worker
    // - result_tx/rx : résultats vers l'event loop
    let (command_tx, command_rx) = mpsc::channel::<AppCommand>();
    let (result_tx, result_rx) = mpsc::channel::<AppResult>();

    info!("Spawning background worker thread");
    let worker = spawn_background_worker(client, command_rx, result_tx);

    // État initial : catalogue, paire USD → EUR et table en base USD
    let mut app = App::new();
    for command in app.start() {
        send_command(&mut app, &command_tx, command);
    }

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, &mut app, &events, &command_tx, &result_rx);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    // Ferme le channel : le worker sort de sa boucle
    drop(command_tx);
    if worker.join().is_err() {
        error!("Worker thread panicked");
    }

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Event Loop Principal
// ============================================================================
// À chaque itération :
//   0. Appliquer les résultats du worker
//   1. Dessiner l'interface (render)
//   2. Traiter les événements (input)
//   3. Mettre à jour l'état (tick)
// ============================================================================

/// Exécute la boucle principale de l'application
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    command_tx: &mpsc::Sender<AppCommand>,
    result_rx: &mpsc::Receiver<AppResult>,
) -> Result<()> {
    let mut worker_alive = true;

    while app.is_running() {
        // 0. RÉSULTATS : tous ceux arrivés depuis la dernière frame
        // Une fois le worker disparu, le channel n'est plus relu
        if worker_alive {
            worker_alive = app.apply_pending(result_rx);
        }

        // 1. RENDER
        terminal.draw(|frame| render(frame, app))?;

        // 2. INPUT
        match events.next() {
            Ok(event) => handle_event(app, event, command_tx),
            Err(e) => debug!(error = ?e, "Failed to read terminal event"),
        }

        // 3. UPDATE
        app.tick();
    }

    Ok(())
}

// ============================================================================
// Gestion des événements
// ============================================================================

/// Traite un événement et met à jour l'état de l'application
///
/// CONCEPT RUST : Pattern matching avec guards
/// - Guard clauses (if) pour filtrer les événements
/// - Les méthodes de App renvoient la commande éventuelle à envoyer
fn handle_event(app: &mut App, event: lazyfx::ui::events::Event, command_tx: &mpsc::Sender<AppCommand>) {
    use lazyfx::app::Focus;
    use lazyfx::ui::events::{
        get_char_from_event, is_amount_char_event, is_backspace_event, is_down_event,
        is_next_field_event, is_previous_field_event, is_quit_event, is_up_event, Event,
    };

    match event {
        Event::Key(_) if is_quit_event(&event) => {
            // Two-step quit : première pression = confirmation
            if app.is_awaiting_quit_confirmation() {
                info!("User confirmed quit");
                app.quit();
            } else {
                info!("User requested quit (awaiting confirmation)");
                app.request_quit();
            }
        }

        // Tant que le catalogue n'est pas chargé (ou en erreur),
        // seule la touche 'q' est active
        Event::Key(_) if !app.is_ready() => {
            app.cancel_quit();
        }

        Event::Key(_) if is_next_field_event(&event) => {
            app.cancel_quit();
            app.focus_next();
            debug!(focus = ?app.focus, "User moved to next field");
        }
        Event::Key(_) if is_previous_field_event(&event) => {
            app.cancel_quit();
            app.focus_previous();
            debug!(focus = ?app.focus, "User moved to previous field");
        }

        // Saisie du montant : jamais de requête réseau
        Event::Key(_) if is_amount_char_event(&event) && app.focus == Focus::Amount => {
            app.cancel_quit();
            if let Some(c) = get_char_from_event(&event) {
                app.append_amount_char(c);
            }
        }
        Event::Key(_) if is_backspace_event(&event) && app.focus == Focus::Amount => {
            app.cancel_quit();
            app.amount_backspace();
        }

        // Sélecteurs de devises
        Event::Key(_) if is_up_event(&event) => {
            app.cancel_quit();
            if let Some(command) = app.select_previous() {
                send_command(app, command_tx, command);
            }
        }
        Event::Key(_) if is_down_event(&event) => {
            app.cancel_quit();
            if let Some(command) = app.select_next() {
                send_command(app, command_tx, command);
            }
        }

        Event::Key(_) => {
            // Toute autre touche : annule la confirmation de quit
            app.cancel_quit();
        }

        Event::Tick => {}
    }
}

/// Envoie une commande au worker
///
/// Si le worker est mort, la requête n'aboutira jamais : App arrête ses spinners.
fn send_command(app: &mut App, command_tx: &mpsc::Sender<AppCommand>, command: AppCommand) {
    debug!(?command, "Sending command to worker");
    if command_tx.send(command).is_err() {
        error!("Worker channel closed, command dropped");
        app.worker_lost();
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================
// IMPORTANT : Toujours restaurer le terminal avant de quitter !
// ============================================================================

/// Configure le terminal en mode TUI (raw mode + alternate screen)
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
