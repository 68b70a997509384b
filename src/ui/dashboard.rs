// ============================================================================
// Dashboard - Rendu de la page principale
// ============================================================================
// Dessine l'interface TUI en utilisant les widgets de ratatui
//
// CONCEPTS RATATUI :
// 1. Frame : surface de dessin
// 2. Widgets : composants UI (Block, Paragraph, Table, etc.)
// 3. Layout : découpage de l'espace en zones
// 4. Style : couleurs et attributs de texte
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, Phase};
use crate::ui::converter::render_converter;
use crate::ui::live_rates::render_live_rates;

/// Images du spinner (une par tick)
const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Image courante du spinner
pub fn spinner(app: &App) -> &'static str {
    SPINNER_FRAMES[(app.tick_count % SPINNER_FRAMES.len() as u64) as usize]
}

/// Dessine l'interface complète
///
/// CONCEPT RUST : Routing avec match sur enum
/// - Loading : spinner plein écran
/// - Failed : message d'erreur seul (ni convertisseur, ni tableau)
/// - Ready : dashboard complet
pub fn render(frame: &mut Frame, app: &App) {
    match &app.phase {
        Phase::Loading => render_loading(frame, app),
        Phase::Failed(message) => render_error(frame, message),
        Phase::Ready => render_dashboard(frame, app),
    }
}

/// Dessine le dashboard : header, deux cartes côte à côte, footer
fn render_dashboard(frame: &mut Frame, app: &App) {
    let size = frame.size();
    let chunks = create_layout(size);

    render_header(frame, chunks[0]);

    // Contenu : convertisseur à gauche, taux en direct à droite
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    render_converter(frame, app, cards[0]);
    render_live_rates(frame, app, cards[1]);

    render_footer(frame, app, chunks[2]);
}

/// Crée le layout principal (header, content, footer)
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header : titre + sous-titre
            Constraint::Min(0),    // Content : tout le reste
            Constraint::Length(3), // Footer : raccourcis
        ])
        .split(area)
        .to_vec()
}

/// Dessine le header avec le titre
fn render_header(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" LazyFX ")
        .title_alignment(Alignment::Center);

    let text = vec![
        Line::from(Span::styled(
            "Exchange Dashboard",
            Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Real-time rates & smart conversion",
            Style::default().fg(Color::Gray),
        )),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Dessine le footer avec les raccourcis clavier
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let key_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);

    let shortcuts = if app.is_awaiting_quit_confirmation() {
        // CONCEPT : Style avec BLINK pour attirer l'attention
        Line::from(vec![
            Span::styled(
                "⚠  Appuyez sur ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "[q]",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " à nouveau pour quitter, ou n'importe quelle autre touche pour annuler ⚠",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ])
    } else {
        Line::from(vec![
            Span::styled("[q]", key_style),
            Span::raw(" Quit  "),
            Span::styled("[Tab]", key_style),
            Span::raw(" Next field  "),
            Span::styled("[↑↓ / j k]", key_style),
            Span::raw(" Change currency  "),
            Span::styled("[0-9 .]", key_style),
            Span::raw(" Amount"),
        ])
    };

    let paragraph = Paragraph::new(vec![shortcuts])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Écran de chargement du catalogue
fn render_loading(frame: &mut Frame, app: &App) {
    let area = centered_line(frame.size());
    let line = Line::from(vec![
        Span::styled(format!("{} ", spinner(app)), Style::default().fg(Color::LightRed)),
        Span::styled("Loading currencies...", Style::default().fg(Color::Gray)),
    ]);

    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

/// Écran d'erreur : uniquement le message
fn render_error(frame: &mut Frame, message: &str) {
    let area = centered_line(frame.size());
    let line = Line::from(Span::styled(
        message.to_string(),
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    ));

    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

/// Une ligne centrée verticalement dans la zone
fn centered_line(area: Rect) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(50),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);
    chunks[1]
}

// ============================================================================
// Tests unitaires
// ============================================================================
// CONCEPT RATATUI : TestBackend
// - Terminal en mémoire, on lit le Buffer pour vérifier le rendu
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Catalog, RateTable, Trend, TARGET_CURRENCIES};
    use crate::worker::{AppCommand, AppResult};
    use ratatui::{backend::TestBackend, Terminal};
    use std::collections::BTreeMap;

    /// Rend l'app et renvoie chaque ligne de l'écran
    fn draw(app: &App) -> Vec<String> {
        let backend = TestBackend::new(120, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();

        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer.get(x, y).symbol().to_string())
                    .collect::<String>()
            })
            .collect()
    }

    fn screen_contains(lines: &[String], needle: &str) -> bool {
        lines.iter().any(|line| line.contains(needle))
    }

    fn catalog() -> Catalog {
        let mut map = BTreeMap::new();
        for code in ["EUR", "GBP", "JPY", "USD"] {
            map.insert(code.to_string(), format!("{} currency", code));
        }
        Catalog::new(map)
    }

    fn request_of(command: &AppCommand) -> u64 {
        match command {
            AppCommand::FetchConversion { request, .. } | AppCommand::FetchRates { request, .. } => *request,
            AppCommand::LoadCatalog => 0,
        }
    }

    #[test]
    fn test_catalog_failure_shows_only_error() {
        let mut app = App::new();
        app.apply(AppResult::CatalogFailed { error: "offline".to_string() });

        let screen = draw(&app);
        assert!(screen_contains(&screen, "Failed to load currency data."));
        assert!(!screen_contains(&screen, "Currency Converter"));
        assert!(!screen_contains(&screen, "Live Rates"));
    }

    #[test]
    fn test_loading_screen() {
        let app = App::new();
        let screen = draw(&app);
        assert!(screen_contains(&screen, "Loading currencies..."));
        assert!(!screen_contains(&screen, "Currency Converter"));
    }

    #[test]
    fn test_dashboard_shows_conversion_and_trend() {
        let mut app = App::with_catalog(catalog());
        app.set_amount(100.0);
        let command = app.refresh_conversion().expect("request expected");
        app.apply(AppResult::ConversionLoaded {
            request: request_of(&command),
            from: "USD".to_string(),
            to: "EUR".to_string(),
            rate: 0.90,
            trend: Trend::Down,
        });

        let screen = draw(&app);
        assert!(screen_contains(&screen, "Currency Converter"));
        assert!(screen_contains(&screen, "90.00 EUR"));
        assert!(screen_contains(&screen, "1 USD = 0.9000 EUR"));
        assert!(screen_contains(&screen, "Trending Down"));
    }

    #[test]
    fn test_converting_shows_spinner_text() {
        let mut app = App::with_catalog(catalog());
        app.set_to("GBP");

        let screen = draw(&app);
        assert!(screen_contains(&screen, "Updating rates..."));
    }

    #[test]
    fn test_rate_table_for_usd_base() {
        let mut app = App::with_catalog(catalog());
        let command = app.refresh_rates();
        let rates: BTreeMap<String, f64> = TARGET_CURRENCIES
            .iter()
            .enumerate()
            .map(|(i, code)| (code.to_string(), 2.0 + i as f64 / 8.0))
            .chain(std::iter::once(("USD".to_string(), 1.0)))
            .collect();
        app.apply(AppResult::RatesLoaded {
            request: request_of(&command),
            table: RateTable::new("USD", rates),
        });

        let screen = draw(&app);
        assert!(screen_contains(&screen, "Rate (1 USD)"));
        for (i, code) in TARGET_CURRENCIES.iter().enumerate() {
            let rate = format!("{:.4}", 2.0 + i as f64 / 8.0);
            assert!(
                screen.iter().any(|line| line.contains(code) && line.contains(&rate)),
                "missing row for {}",
                code
            );
        }

        // Aucune ligne du tableau pour la base (la base n'apparaît qu'en en-tête,
        // dans le sélecteur et dans le convertisseur)
        assert!(!screen.iter().any(|line| line.contains("USD") && line.contains("1.0000")));
    }

    #[test]
    fn test_failed_base_change_keeps_table_labelled_with_its_base() {
        let mut app = App::with_catalog(catalog());
        let command = app.refresh_rates();
        let rates: BTreeMap<String, f64> = TARGET_CURRENCIES
            .iter()
            .map(|code| (code.to_string(), 0.7777))
            .collect();
        app.apply(AppResult::RatesLoaded {
            request: request_of(&command),
            table: RateTable::new("USD", rates),
        });

        let command = app.set_base("GBP").expect("request expected");
        app.apply(AppResult::RatesFailed {
            request: request_of(&command),
            base: "GBP".to_string(),
            error: "offline".to_string(),
        });

        let screen = draw(&app);
        assert!(screen_contains(&screen, "Rate (1 USD)"));
        assert!(!screen_contains(&screen, "Rate (1 GBP)"));
        assert!(!screen.iter().any(|line| line.contains("GBP") && line.contains("0.7777")));
        assert!(screen.iter().any(|line| line.contains("EUR") && line.contains("0.7777")));
    }

    #[test]
    fn test_rates_loading_hides_table() {
        let mut app = App::with_catalog(catalog());
        app.refresh_rates();

        let screen = draw(&app);
        assert!(screen_contains(&screen, "Loading new rates..."));
        assert!(!screen_contains(&screen, "Rate (1 USD)"));
    }

    #[test]
    fn test_spinner_cycles() {
        let mut app = App::new();
        let first = spinner(&app);
        app.tick();
        assert_ne!(first, spinner(&app));
    }
}
