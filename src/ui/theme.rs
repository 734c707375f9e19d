use crate::trace::ProcessId;
use ratatui::style::Color;
use std::str::FromStr;

pub struct Theme {
    pub fg: Color,
    pub primary: Color,   // Blue
    pub secondary: Color, // Orange
    pub comment: Color,   // Grey
    pub success: Color,   // Green
    pub error: Color,     // Red
    pub border_focused: Color,
    pub border_normal: Color,
    pub current_line_bg: Color,
    pub empty_cell: Color, // Unowned core cell
    pub changed_cell: Color,
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(205, 214, 244),
    primary: Color::Rgb(137, 180, 250),   // Blue
    secondary: Color::Rgb(250, 179, 135), // Orange
    comment: Color::Rgb(108, 112, 134),
    success: Color::Rgb(166, 227, 161),
    error: Color::Rgb(243, 139, 168),
    border_focused: Color::Rgb(249, 226, 175), // Yellow border for focus
    border_normal: Color::Rgb(108, 112, 134),  // Grey border for normal
    current_line_bg: Color::Rgb(50, 50, 70),   // Slightly lighter BG for current line
    empty_cell: Color::Rgb(69, 71, 90),
    changed_cell: Color::Rgb(245, 194, 231), // Pink outline for last-step changes
};

/// Colours cycled through when no palette is configured
const DEFAULT_PROCESS_COLORS: [Color; 6] = [
    Color::Rgb(243, 139, 168), // Red
    Color::Rgb(137, 180, 250), // Blue
    Color::Rgb(166, 227, 161), // Green
    Color::Rgb(249, 226, 175), // Yellow
    Color::Rgb(203, 166, 247), // Mauve
    Color::Rgb(148, 226, 213), // Teal
];

/// Per-process colour assignment
#[derive(Debug, Clone)]
pub struct ProcessPalette {
    colors: Vec<Color>,
}

impl ProcessPalette {
    /// Build a palette from colour names; unparseable names are skipped
    pub fn from_names(names: &[String]) -> Self {
        let colors: Vec<Color> = names
            .iter()
            .filter_map(|name| match Color::from_str(name) {
                Ok(color) => Some(color),
                Err(_) => {
                    tracing::warn!(color = %name, "ignoring unknown process colour");
                    None
                }
            })
            .collect();

        if colors.is_empty() {
            ProcessPalette {
                colors: DEFAULT_PROCESS_COLORS.to_vec(),
            }
        } else {
            ProcessPalette { colors }
        }
    }

    pub fn color(&self, pid: ProcessId) -> Color {
        self.colors[pid % self.colors.len()]
    }
}
