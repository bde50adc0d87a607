use crate::cards::Card;
use crate::render::{face_or_placeholder, CardFace, CardRenderer};
use crate::round::{Outcome, RoundResult, RoundState};
use crate::tui::app::AppState;
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::layout::{card_slots, centered_rect, inner};

const CARD_SLOT_WIDTH: u16 = 8;

pub(super) fn draw_table(f: &mut Frame, app: &AppState) {
    let size = f.area();
    let table = app.table();
    let renderer = app.card_style.renderer();
    let status_height: u16 = 3 + 2; // content + borders

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),             // header
            Constraint::Min(5),                // dealer
            Constraint::Min(5),                // player
            Constraint::Length(status_height), // status bar
        ])
        .split(size);

    // Header
    let stats = table.statistics();
    let header_lines = vec![
        Line::from(format!(
            "Round {}   {}",
            app.engine.round_number(),
            table.round_state().label()
        )),
        Line::from(vec![
            Span::styled(format!("Wins: {}", stats.wins()), Style::default().fg(Color::Green)),
            Span::raw("   "),
            Span::styled(format!("Losses: {}", stats.losses()), Style::default().fg(Color::Red)),
            Span::raw("   "),
            Span::styled(format!("Ties: {}", stats.ties()), Style::default().fg(Color::Yellow)),
        ]),
    ];
    let header = Paragraph::new(header_lines)
        .block(Block::default().title("blackjack-rs").borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    // Dealer
    let dealer_cards = table.dealer_cards();
    let shown = app.visible_dealer_cards();
    let dealer_visible = &dealer_cards[..shown];
    let dealer_title = if dealer_visible.is_empty() {
        String::from("Dealer")
    } else {
        // while cards are still face down, total only what is face up
        let total = if shown == dealer_cards.len() {
            table.dealer_total()
        } else {
            crate::hand::calculate_hand_total(dealer_visible)
        };
        format!("Dealer: {total}")
    };
    let hidden_slots = usize::from(app.dealer_hole_hidden());
    draw_hand(
        f,
        chunks[1],
        &dealer_title,
        dealer_visible,
        hidden_slots,
        renderer.as_ref(),
        hand_border(app, false),
    );

    // Player
    let player_cards = table.player_cards();
    let player_title = if player_cards.is_empty() {
        String::from("You")
    } else {
        let value = app.engine.player_hand().value();
        let soft = if value.soft && value.total < 21 { " (soft)" } else { "" };
        format!("You: {}{soft}", value.total)
    };
    draw_hand(
        f,
        chunks[2],
        &player_title,
        player_cards,
        0,
        renderer.as_ref(),
        hand_border(app, true),
    );

    // Status bar: split horizontally for info vs keys
    let status_area = chunks[3];
    f.render_widget(Block::default().borders(Borders::ALL).title("Status"), status_area);
    let status_inner = inner(status_area);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(status_inner);

    let mut left_info = match (table.round_state(), app.visible_outcome()) {
        (RoundState::NotStarted, _) => vec![Line::from("Press Space to deal.")],
        (RoundState::PlayerTurn, _) => vec![Line::from("Hit or stand?")],
        (_, Some(msg)) => vec![Line::from(Span::styled(
            msg,
            outcome_style(table.outcome()).add_modifier(Modifier::BOLD),
        ))],
        _ => vec![Line::from("Dealer is playing...")],
    };

    let action_style = |enabled: bool| {
        if enabled {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        }
    };
    left_info.push(Line::from(vec![
        Span::raw("Actions: "),
        Span::styled("Space deal", action_style(app.can_deal())),
        Span::raw(" • "),
        Span::styled("H hit", action_style(app.can_act())),
        Span::raw(" • "),
        Span::styled("S stand", action_style(app.can_act())),
    ]));

    if let Some(err) = app.action_error() {
        left_info.push(Line::from(Span::styled(
            format!("Error: {err}"),
            Style::default().fg(Color::Red),
        )));
    }

    let right_keys = vec![Line::from(""), Line::from("? help • L log • M menu • Q quit")];
    let left_para = Paragraph::new(left_info).wrap(Wrap { trim: true });
    let right_para =
        Paragraph::new(right_keys).wrap(Wrap { trim: true }).alignment(Alignment::Right);
    f.render_widget(left_para, cols[0]);
    f.render_widget(right_para, cols[1]);

    if app.help_open() {
        draw_help(f);
    } else if app.log_open() {
        draw_log(f, app);
    }
}

fn hand_border(app: &AppState, player: bool) -> Option<Color> {
    let table = app.table();
    match table.round_state() {
        RoundState::PlayerTurn if player => Some(Color::Yellow),
        RoundState::Settled if !app.revealing() => {
            let result = table.outcome().map(Outcome::result);
            match (result, player) {
                (Some(RoundResult::Win), true) | (Some(RoundResult::Loss), false) => {
                    Some(Color::Green)
                }
                (Some(RoundResult::Tie), _) => Some(Color::Yellow),
                _ => Some(Color::DarkGray),
            }
        }
        _ => None,
    }
}

fn outcome_style(outcome: Option<Outcome>) -> Style {
    match outcome.map(Outcome::result) {
        Some(RoundResult::Win) => Style::default().fg(Color::Green),
        Some(RoundResult::Loss) => Style::default().fg(Color::Red),
        Some(RoundResult::Tie) => Style::default().fg(Color::Yellow),
        None => Style::default(),
    }
}

fn draw_hand(
    f: &mut Frame,
    area: Rect,
    title: &str,
    cards: &[Card],
    hidden: usize,
    renderer: &dyn CardRenderer,
    border: Option<Color>,
) {
    let mut block = Block::default().title(title.to_string()).borders(Borders::ALL);
    if let Some(color) = border {
        block = block.border_style(Style::default().fg(color));
    }
    f.render_widget(block, area);
    let slots_area = inner(area);
    let slots_area = Rect { height: slots_area.height.min(3), ..slots_area };
    let faces = cards
        .iter()
        .map(|&c| face_or_placeholder(renderer, c))
        .chain(std::iter::repeat_with(CardFace::hidden).take(hidden))
        .collect::<Vec<_>>();
    let slots = card_slots(slots_area, faces.len(), CARD_SLOT_WIDTH);
    for (face, slot) in faces.iter().zip(slots) {
        render_card_widget(f, slot, face);
    }
}

fn render_card_widget(f: &mut Frame, area: Rect, face: &CardFace) {
    let color = if face.red { Color::Red } else { Color::White };
    let block = Block::default().borders(Borders::ALL).border_style(Style::default().fg(color));
    let inner = inner(area);
    f.render_widget(block, area);
    let content = Line::from(Span::styled(face.label.clone(), Style::default().fg(color)));
    let para = Paragraph::new(content).alignment(Alignment::Center);
    f.render_widget(para, inner);
}

fn draw_help(f: &mut Frame) {
    let area = centered_rect(60, 70, f.area());
    let block = Block::default().title("Help").borders(Borders::ALL);
    let lines = vec![
        Line::from(Span::styled("Table:", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("- Space / Enter: deal a new round"),
        Line::from("- H: hit"),
        Line::from("- S: stand"),
        Line::from("- L: round log"),
        Line::from("- Q: quit"),
        Line::from(""),
        Line::from(Span::styled("Rules:", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("- Two cards to you, one to the dealer"),
        Line::from("- 21 on the deal wins immediately"),
        Line::from("- Dealer draws until matching your total"),
        Line::from(""),
        Line::from(Span::styled("Menu:", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("- M: open / close menu"),
        Line::from("- Up / Down: move selection"),
        Line::from("- + / -: adjust value"),
        Line::from("- Enter: apply"),
        Line::from("- Esc: cancel"),
        Line::from(""),
        Line::from("Close help: ? or Esc"),
    ];
    let para = Paragraph::new(lines).wrap(Wrap { trim: true });
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    f.render_widget(para, inner(area));
}

fn draw_log(f: &mut Frame, app: &AppState) {
    let area = centered_rect(70, 80, f.area());
    let block = Block::default().title("Round Log").borders(Borders::ALL);
    let mut lines: Vec<Line> = Vec::new();
    let records = app.engine.history_recent_offset(AppState::LOG_PAGE_SIZE, app.log_offset());
    if records.is_empty() {
        lines.push(Line::from("No rounds played yet."));
    } else {
        for rec in records {
            let line = format!(
                "#{:<3} you {:>2} [{}]  dealer {:>2} [{}]  {}",
                rec.round,
                rec.player_total,
                join_cards(&rec.player_cards),
                rec.dealer_total,
                join_cards(&rec.dealer_cards),
                rec.outcome.message()
            );
            lines.push(Line::from(Span::styled(line, outcome_style(Some(rec.outcome)))));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Up/Down scroll • Close: L or Esc",
        Style::default().add_modifier(Modifier::DIM),
    )));
    let para = Paragraph::new(lines).wrap(Wrap { trim: true });
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    f.render_widget(para, inner(area));
}

fn join_cards(cards: &[Card]) -> String {
    cards.iter().map(Card::to_string).collect::<Vec<_>>().join(" ")
}
