use ratatui::layout::Constraint;
use ratatui::prelude::{Direction, Layout, Rect};

pub(super) fn inner(area: Rect) -> Rect {
    Rect {
        x: area.x.saturating_add(1),
        y: area.y.saturating_add(1),
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    }
}

pub(super) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    let area = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1]);
    area[1]
}

/// Left-aligned row of fixed-width card slots that fit in `area`.
pub(super) fn card_slots(area: Rect, count: usize, slot_width: u16) -> Vec<Rect> {
    let fit = (area.width / slot_width.max(1)) as usize;
    (0..count.min(fit))
        .map(|i| Rect {
            x: area.x + i as u16 * slot_width,
            y: area.y,
            width: slot_width,
            height: area.height,
        })
        .collect()
}
