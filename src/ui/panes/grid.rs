//! Core pane rendering
//!
//! Draws the whole circular memory as a grid, one character per cell:
//! - background: colour of the process that owns the cell's current value
//! - `◆`: an instruction pointer is here; coloured by the most recent arrival
//! - `•`: the cell changed during the last navigation step

use crate::stepper::Stepper;
use crate::trace::Address;
use crate::ui::theme::{ProcessPalette, DEFAULT_THEME};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the core grid
pub fn render_core_pane(
    frame: &mut Frame,
    area: Rect,
    stepper: &Stepper,
    palette: &ProcessPalette,
    changed_cells: &[Address],
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
        .title(format!(" Core ({} cells) ", stepper.memory_length()))
        .borders(Borders::ALL)
        .border_style(border_style);

    let columns = area.width.saturating_sub(2).max(1) as usize; // borders
    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    let total_rows = stepper.memory_length().div_ceil(columns);

    // Clamp scroll offset only if content exceeds visible area
    if total_rows > visible_height {
        *scroll_offset = (*scroll_offset).min(total_rows - visible_height);
    } else {
        *scroll_offset = 0;
    }

    let lines: Vec<Line> = (*scroll_offset..total_rows.min(*scroll_offset + visible_height))
        .map(|row| {
            let start = row * columns;
            let end = (start + columns).min(stepper.memory_length());
            Line::from(
                (start..end)
                    .map(|address| cell_span(stepper, palette, changed_cells, address))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn cell_span(
    stepper: &Stepper,
    palette: &ProcessPalette,
    changed_cells: &[Address],
    address: Address,
) -> Span<'static> {
    let owner = stepper.cell_owner(address);
    let bg = owner.map_or(DEFAULT_THEME.empty_cell, |pid| palette.color(pid));
    let style = Style::default().bg(bg);

    match stepper.marker(address) {
        Some(pid) => {
            // Same colour on same colour would hide the marker
            let fg = if owner == Some(pid) {
                Color::Black
            } else {
                palette.color(pid)
            };
            Span::styled("◆", style.fg(fg).add_modifier(Modifier::BOLD))
        }
        None if changed_cells.contains(&address) => {
            Span::styled("•", style.fg(DEFAULT_THEME.changed_cell))
        }
        None => Span::styled(" ", style),
    }
}
