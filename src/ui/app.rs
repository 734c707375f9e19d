//! Main TUI application state and logic

use crate::config::Config;
use crate::stepper::{LifeStatus, ReplayEvent, Stepper};
use crate::trace::Address;
use crate::ui::theme::ProcessPalette;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Constraint, Direction, Layout},
};
use std::io;
use std::time::{Duration, Instant};

/// How long the event loop waits for input before checking auto-play
const INPUT_POLL: Duration = Duration::from_millis(50);

/// Space presses closer together than this are key repeat, not a new toggle
const PLAY_TOGGLE_REPEAT: Duration = Duration::from_millis(200);

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Core,
    Processes,
}

impl FocusedPane {
    /// Move focus to the other pane
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Core => FocusedPane::Processes,
            FocusedPane::Processes => FocusedPane::Core,
        }
    }
}

/// The main application state
pub struct App {
    /// The replay engine
    pub stepper: Stepper,

    /// Colour per process
    pub palette: ProcessPalette,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets (rows)
    pub core_scroll: usize,
    pub processes_scroll: usize,

    /// Cells touched by the most recent navigation step
    pub changed_cells: Vec<Address>,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Delay between automatic steps
    pub play_interval: Duration,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    /// Create a new app around a stepper
    pub fn new(stepper: Stepper, config: &Config) -> Self {
        App {
            stepper,
            palette: ProcessPalette::from_names(&config.process_colors),
            focused_pane: FocusedPane::Core,
            core_scroll: 0,
            processes_scroll: 0,
            changed_cells: Vec::new(),
            should_quit: false,
            status_message: String::from("Ready!"),
            is_playing: false,
            play_interval: Duration::from_millis(config.play_interval_ms),
            last_play_time: Instant::now(),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or(Instant::now()),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing && self.last_play_time.elapsed() >= self.play_interval {
                self.play_turn();
            }

            if event::poll(INPUT_POLL)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Two panes side by side, plus status bar at bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(main_chunks[0]);

        super::panes::render_core_pane(
            frame,
            columns[0],
            &self.stepper,
            &self.palette,
            &self.changed_cells,
            self.focused_pane == FocusedPane::Core,
            &mut self.core_scroll,
        );

        super::panes::render_processes_pane(
            frame,
            columns[1],
            &self.stepper,
            &self.palette,
            self.focused_pane == FocusedPane::Processes,
            &mut self.processes_scroll,
        );

        super::panes::render_status_bar(
            frame,
            main_chunks[1],
            super::panes::StatusRenderData {
                message: &self.status_message,
                cursor: self.stepper.current_cursor(),
                total_moves: self.stepper.total_moves(),
                alive: self.stepper.alive_count(),
                processes: self.stepper.process_count(),
                is_playing: self.is_playing,
            },
        );
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                self.step_many(c.to_digit(10).unwrap_or(1) as usize);
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Left => {
                self.is_playing = false;
                self.step_backward();
            }
            KeyCode::Right => {
                self.is_playing = false;
                self.step_forward();
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Core => self.core_scroll = self.core_scroll.saturating_sub(1),
                FocusedPane::Processes => {
                    self.processes_scroll = self.processes_scroll.saturating_sub(1)
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Core => self.core_scroll = self.core_scroll.saturating_add(1),
                FocusedPane::Processes => {
                    self.processes_scroll = self.processes_scroll.saturating_add(1)
                }
            },
            KeyCode::Char(' ') => {
                if self.last_space_press.elapsed() >= PLAY_TOGGLE_REPEAT {
                    self.last_space_press = Instant::now();
                    self.toggle_play();
                }
            }
            KeyCode::Enter | KeyCode::End => {
                self.is_playing = false;
                if self.stepper.is_at_end() {
                    self.status_message = "Already at the end of the battle".to_string();
                } else {
                    let steps = self.stepper.jump_to_end();
                    self.changed_cells.clear();
                    self.status_message = format!("Jumped to end ({} steps)", steps);
                }
            }
            KeyCode::Backspace | KeyCode::Home => {
                self.is_playing = false;
                if self.stepper.is_at_start() {
                    self.status_message = "Already at the start of the battle".to_string();
                } else {
                    let steps = self.stepper.jump_to_start();
                    self.changed_cells.clear();
                    self.status_message = format!("Jumped to start ({} steps)", steps);
                }
            }
            _ => {}
        }
    }

    /// One auto-play tick; stops playback once the last turn is shown
    fn play_turn(&mut self) {
        if self.stepper.is_at_end() {
            self.is_playing = false;
            self.status_message = "Playback complete".to_string();
        } else {
            let events = self.stepper.step_forward();
            self.absorb(&events);
            self.status_message = self.describe(&events, "Playing...");
        }
        self.last_play_time = Instant::now();
    }

    /// Start or pause playback; starting takes the first turn on the next tick
    fn toggle_play(&mut self) {
        self.is_playing = !self.is_playing;
        if self.is_playing {
            self.last_play_time = Instant::now()
                .checked_sub(self.play_interval)
                .unwrap_or(Instant::now());
            self.status_message = "Playing...".to_string();
        } else {
            self.status_message = "Paused".to_string();
        }
    }

    /// Take up to `count` forward steps, highlighting every cell they touch
    fn step_many(&mut self, count: usize) {
        self.changed_cells.clear();
        let mut stepped = 0;
        while stepped < count && !self.stepper.is_at_end() {
            let events = self.stepper.step_forward();
            self.absorb_more(&events);
            stepped += 1;
        }
        self.status_message = format!("Stepped forward {} turn(s)", stepped);
    }

    /// Step forward in the replay
    fn step_forward(&mut self) {
        let events = self.stepper.step_forward();
        if events.is_empty() && self.stepper.is_at_end() {
            self.status_message = "Cannot step forward: end of battle".to_string();
            return;
        }
        self.absorb(&events);
        self.status_message = self.describe(&events, "Stepped forward");
    }

    /// Step backward in the replay
    fn step_backward(&mut self) {
        let events = self.stepper.step_backward();
        if events.is_empty() && self.stepper.is_at_start() {
            self.status_message = "Cannot step backward: start of battle".to_string();
            return;
        }
        self.absorb(&events);
        self.status_message = self.describe(&events, "Stepped backward");
    }

    /// Replace the highlighted cells with those touched by `events`
    fn absorb(&mut self, events: &[ReplayEvent]) {
        self.changed_cells.clear();
        self.absorb_more(events);
    }

    fn absorb_more(&mut self, events: &[ReplayEvent]) {
        for event in events {
            let effect = match event {
                ReplayEvent::Applied(effect) | ReplayEvent::Reverted(effect) => effect,
                ReplayEvent::LifeChanged { .. } => continue,
            };
            let touched = effect
                .vacated
                .map(|change| change.address)
                .into_iter()
                .chain(effect.arrived.map(|change| change.address))
                .chain(effect.written.as_ref().map(|change| change.address));
            for address in touched {
                if !self.changed_cells.contains(&address) {
                    self.changed_cells.push(address);
                }
            }
        }
    }

    /// Status line for a step, mentioning deaths and revivals
    fn describe(&self, events: &[ReplayEvent], default: &str) -> String {
        let flips: Vec<String> = events
            .iter()
            .filter_map(|event| match event {
                ReplayEvent::LifeChanged { pid, status } => Some(match status {
                    LifeStatus::Dead => format!("{} died", self.stepper.process_name(*pid)),
                    LifeStatus::Alive => format!("{} is alive", self.stepper.process_name(*pid)),
                }),
                _ => None,
            })
            .collect();

        if flips.is_empty() {
            default.to_string()
        } else {
            format!("{}: {}", default, flips.join(", "))
        }
    }
}
