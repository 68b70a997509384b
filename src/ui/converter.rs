// ============================================================================
// Carte : Currency Converter
// ============================================================================
// Montant, devises source/destination et panneau de résultat
//
// Ne lit que l'état de App : aucun appel réseau, aucun état propre.
// ============================================================================

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, Focus};
use crate::models::{format_rate, Trend};
use crate::ui::dashboard::spinner;

/// Dessine la carte du convertisseur
pub fn render_converter(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Currency Converter ");

    let mut lines = vec![
        Line::from(""),
        field_line("Amount", amount_value(app), app.focus == Focus::Amount),
        Line::from(""),
        field_line("From", currency_value(app, &app.conversion.from), app.focus == Focus::From),
        field_line("To", currency_value(app, &app.conversion.to), app.focus == Focus::To),
        Line::from(""),
        Line::from(Span::styled(
            "Converted Amount",
            Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD),
        )),
    ];

    lines.extend(result_lines(app));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, area);
}

/// Ligne "Label : valeur", inversée quand le champ a le focus
fn field_line(label: &str, value: String, focused: bool) -> Line<'static> {
    let value_style = if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::REVERSED)
    } else {
        Style::default().fg(Color::White)
    };

    Line::from(vec![
        Span::styled(format!(" {:<8}", label), Style::default().fg(Color::Gray)),
        Span::styled(value, value_style),
    ])
}

/// Montant saisi, avec un curseur quand le champ a le focus
fn amount_value(app: &App) -> String {
    if app.focus == Focus::Amount {
        format!(" {}█ ", app.amount_input)
    } else if app.amount_input.is_empty() {
        " 0 ".to_string()
    } else {
        format!(" {} ", app.amount_input)
    }
}

/// Code + nom de la devise (ex: "USD  United States Dollar")
fn currency_value(app: &App, code: &str) -> String {
    match app.catalog.name(code) {
        Some(name) => format!(" {}  {} ", code, name),
        None => format!(" {} ", code),
    }
}

/// Panneau de résultat
///
/// - Pendant le chargement d'une paire : spinner "Updating rates..."
/// - Sinon : montant converti (2 décimales), puis taux unitaire
///   (4 décimales) et badge de tendance si la paire n'est pas identique
fn result_lines(app: &App) -> Vec<Line<'static>> {
    let conversion = &app.conversion;

    if conversion.converting {
        return vec![Line::from(vec![
            Span::styled(format!(" {} ", spinner(app)), Style::default().fg(Color::LightRed)),
            Span::styled("Updating rates...", Style::default().fg(Color::Gray)),
        ])];
    }

    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!(" {}", conversion.display_converted()),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {}", conversion.to), Style::default().fg(Color::Gray)),
    ])];

    if conversion.is_identity() {
        return lines;
    }

    if let Some(rate) = conversion.rate {
        let mut spans = vec![Span::styled(
            format!(" 1 {} = {} {}  ", conversion.from, format_rate(rate), conversion.to),
            Style::default().fg(Color::Gray),
        )];
        if let Some(trend) = conversion.trend {
            spans.push(trend_badge(trend));
        }
        lines.push(Line::from(spans));
    }

    lines
}

/// Badge coloré de la tendance
fn trend_badge(trend: Trend) -> Span<'static> {
    let color = match trend {
        Trend::Up => Color::Green,
        Trend::Down => Color::Red,
        Trend::Neutral => Color::Gray,
    };
    Span::styled(
        format!(" {} ", trend.label()),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}
