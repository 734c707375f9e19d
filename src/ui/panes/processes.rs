//! Processes pane rendering
//!
//! One section per process: coloured name (struck through once eliminated),
//! its current ip, and the nearby-instruction window centred on that ip.

use crate::stepper::{LifeStatus, Stepper};
use crate::ui::theme::{ProcessPalette, DEFAULT_THEME};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding},
    Frame,
};

/// Render the processes pane
pub fn render_processes_pane(
    frame: &mut Frame,
    area: Rect,
    stepper: &Stepper,
    palette: &ProcessPalette,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Processes ")
        .borders(Borders::ALL)
        .border_style(border_style)
        .padding(Padding::new(1, 0, 0, 0));

    let mut all_items = Vec::new();
    for pid in 0..stepper.process_count() {
        let status = stepper.life_status(pid);
        let mut name_style = Style::default()
            .fg(palette.color(pid))
            .add_modifier(Modifier::BOLD);
        if status == LifeStatus::Dead {
            name_style = name_style.add_modifier(Modifier::CROSSED_OUT);
        }

        let ip_text = stepper
            .current_ip(pid)
            .map_or_else(|| "ip ---".to_string(), |ip| format!("ip {:>5}", ip));

        all_items.push(ListItem::new(Line::from(vec![
            Span::styled(stepper.process_name(pid), name_style),
            Span::raw(" "),
            Span::styled(ip_text, Style::default().fg(DEFAULT_THEME.comment)),
            Span::raw(if status == LifeStatus::Dead { " 💀" } else { "" }),
        ])));

        let window = stepper.instruction_window(pid);
        let centre = window.len() / 2;
        for (i, (address, value)) in window.into_iter().enumerate() {
            let address_text = address.map_or_else(|| "    ?".to_string(), |a| format!("{:>5}", a));
            let (arrow, style) = if i == centre {
                (
                    "▶ ",
                    Style::default()
                        .fg(DEFAULT_THEME.fg)
                        .bg(DEFAULT_THEME.current_line_bg)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                ("  ", Style::default().fg(DEFAULT_THEME.comment))
            };
            all_items.push(ListItem::new(Line::from(vec![
                Span::styled(arrow, style),
                Span::styled(address_text, Style::default().fg(DEFAULT_THEME.primary)),
                Span::raw("  "),
                Span::styled(value.to_string(), style),
            ])));
        }
        all_items.push(ListItem::new(""));
    }

    // Calculate visible range for scrolling
    let total_items = all_items.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    if total_items > visible_height {
        *scroll_offset = (*scroll_offset).min(total_items - visible_height);
    } else {
        *scroll_offset = 0;
    }

    let visible_items: Vec<ListItem> = all_items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}
