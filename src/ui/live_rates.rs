// ============================================================================
// Carte : Live Rates
// ============================================================================
// Sélecteur de devise de base + tableau des taux relatifs à la base
//
// CONCEPT RATATUI : Table widget
// - Row : une ligne du tableau, composée de Cells
// - widths : contraintes de largeur par colonne
// - header : ligne d'en-tête stylée
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::{App, Focus};
use crate::models::format_rate;
use crate::ui::dashboard::spinner;

/// Dessine la carte des taux en direct
pub fn render_live_rates(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Live Rates ");

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Sélecteur de base
            Constraint::Min(0),    // Tableau
            Constraint::Length(1), // Note de bas de carte
        ])
        .split(inner);

    render_base_selector(frame, app, chunks[0]);

    if app.rates_loading {
        render_loading(frame, app, chunks[1]);
    } else {
        render_table(frame, app, chunks[1]);
    }

    let footnote = Paragraph::new(Line::from(Span::styled(
        "Rates updated daily by European Central Bank",
        Style::default().fg(Color::DarkGray),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(footnote, chunks[2]);
}

/// Sélecteur de base (grisé pendant le chargement)
fn render_base_selector(frame: &mut Frame, app: &App, area: Rect) {
    let value_style = if app.rates_loading {
        Style::default().fg(Color::DarkGray)
    } else if app.focus == Focus::Base {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::REVERSED)
    } else {
        Style::default().fg(Color::White)
    };

    let line = Line::from(vec![
        Span::styled(" Base Rate ", Style::default().fg(Color::Gray)),
        Span::styled(format!(" {} ", app.base_currency), value_style),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Message de chargement à la place du tableau
fn render_loading(frame: &mut Frame, app: &App, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("{} ", spinner(app)), Style::default().fg(Color::Blue)),
            Span::styled("Loading new rates...", Style::default().fg(Color::Gray)),
        ]),
    ];

    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), area);
}

/// Tableau Currency | Rate (1 BASE), taux avec 4 décimales
///
/// L'en-tête porte la base de la table chargée, qui peut différer de la base
/// sélectionnée si son chargement a échoué.
fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    // Aucune table chargée : on affiche la base sélectionnée
    let base = if app.rates.base.is_empty() {
        &app.base_currency
    } else {
        &app.rates.base
    };

    let header = Row::new(vec![
        Cell::from("Currency"),
        Cell::from(Line::from(format!("Rate (1 {})", base)).alignment(Alignment::Right)),
    ])
    .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD))
    .bottom_margin(1);

    // CONCEPT RUST : Iterator chaining
    // - Ni la base de la table (RateTable::new) ni la base sélectionnée
    let rows: Vec<Row> = app
        .visible_rates()
        .map(|(code, rate)| {
            Row::new(vec![
                Cell::from(Span::styled(
                    code.to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Cell::from(Line::from(format_rate(rate)).alignment(Alignment::Right)),
            ])
        })
        .collect();

    let table = Table::new(rows, [Constraint::Percentage(50), Constraint::Percentage(50)])
        .header(header)
        .column_spacing(1);

    frame.render_widget(table, area);
}
