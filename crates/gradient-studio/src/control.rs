//! Keyboard-driven control panel.
//!
//! Owns the editable state (stops, selection, export settings) and maps key
//! presses onto edits. File and window operations come back as [`Command`]s so
//! this module never performs I/O; the window title shows [`ControlSurface::status_line`].

use gradient_core::{ExportSettings, Rgb, Stop, StopCollection, StopId};
use gradient_engine::input::{Key, KeyPress};

/// Percentage given to stops created from the panel.
pub const NEW_STOP_PERCENTAGE: f32 = 50.0;
pub const NEW_STOP_COLOR: Rgb = Rgb::WHITE;

const PERCENT_STEP: f32 = 1.0;
const PERCENT_STEP_LARGE: f32 = 10.0;
const CHANNEL_STEP: f32 = 0.05;
const QUALITY_STEP: f32 = 0.05;

/// Color channel edited by `Up`/`Down`.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum Channel {
    #[default]
    Red,
    Green,
    Blue,
}

impl Channel {
    fn label(self) -> char {
        match self {
            Channel::Red => 'R',
            Channel::Green => 'G',
            Channel::Blue => 'B',
        }
    }

    fn get(self, c: Rgb) -> f32 {
        match self {
            Channel::Red => c.r,
            Channel::Green => c.g,
            Channel::Blue => c.b,
        }
    }

    fn with(self, mut c: Rgb, v: f32) -> Rgb {
        match self {
            Channel::Red => c.r = v,
            Channel::Green => c.g = v,
            Channel::Blue => c.b = v,
        }
        c
    }
}

/// Operations the panel requests but does not perform itself.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Command {
    Save,
    Load,
    Export,
    Quit,
}

pub struct ControlSurface {
    stops: StopCollection,
    selected: Option<StopId>,
    channel: Channel,
    export: ExportSettings,
}

impl ControlSurface {
    /// Starts from the default blue-to-red collection with the first stop selected.
    pub fn new(export: ExportSettings) -> Self {
        let stops = StopCollection::with_defaults();
        let selected = stops.sorted().first().map(|s| s.id);
        Self {
            stops,
            selected,
            channel: Channel::default(),
            export,
        }
    }

    /// Forwards to [`StopCollection::set_listener`].
    pub fn set_listener(&mut self, listener: impl FnMut(&StopCollection) + 'static) {
        self.stops.set_listener(listener);
    }

    pub fn stops(&self) -> &StopCollection {
        &self.stops
    }

    pub fn selected(&self) -> Option<StopId> {
        self.selected
    }

    pub fn selected_stop(&self) -> Option<&Stop> {
        self.selected.and_then(|id| self.stops.get(id))
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn export_settings(&self) -> ExportSettings {
        self.export
    }

    // ── edits ─────────────────────────────────────────────────────────────

    /// Adds a white stop at 50% and selects it. `None` when no identity is free.
    pub fn add_stop(&mut self) -> Option<StopId> {
        let id = self.stops.add(NEW_STOP_PERCENTAGE, NEW_STOP_COLOR)?;
        self.selected = Some(id);
        Some(id)
    }

    /// Deletes the selected stop; the selection moves to its canonical successor,
    /// or its predecessor when it was last.
    pub fn delete_selected(&mut self) -> Option<Stop> {
        let id = self.selected?;
        let order = self.order();
        let pos = order.iter().position(|&s| s == id)?;
        let neighbor = order
            .get(pos + 1)
            .or_else(|| pos.checked_sub(1).and_then(|p| order.get(p)))
            .copied();

        let removed = self.stops.remove(id)?;
        self.selected = neighbor;
        Some(removed)
    }

    pub fn set_percentage(&mut self, id: StopId, percentage: f32) -> bool {
        self.stops.set_percentage(id, percentage)
    }

    pub fn set_color(&mut self, id: StopId, color: Rgb) -> bool {
        self.stops.set_color(id, color)
    }

    pub fn select(&mut self, id: StopId) -> bool {
        if !self.stops.contains(id) {
            return false;
        }
        self.selected = Some(id);
        true
    }

    pub fn select_next(&mut self) {
        self.step_selection(1);
    }

    pub fn select_previous(&mut self) {
        self.step_selection(-1);
    }

    /// Load path: replaces every stop and selects the first in canonical order.
    pub fn replace_stops(&mut self, stops: Vec<Stop>) {
        self.stops.replace_all(stops);
        self.selected = self.order().first().copied();
    }

    fn nudge_percentage(&mut self, delta: f32) {
        let Some(stop) = self.selected_stop().copied() else {
            return;
        };
        self.stops.set_percentage(stop.id, stop.percentage + delta);
    }

    fn nudge_channel(&mut self, delta: f32) {
        let Some(stop) = self.selected_stop().copied() else {
            return;
        };
        let value = (self.channel.get(stop.color) + delta).clamp(0.0, 1.0);
        self.stops.set_color(stop.id, self.channel.with(stop.color, value));
    }

    fn step_selection(&mut self, step: isize) {
        let order = self.order();
        if order.is_empty() {
            self.selected = None;
            return;
        }
        let len = order.len() as isize;
        let next = match self.selected.and_then(|id| order.iter().position(|&s| s == id)) {
            Some(pos) => (pos as isize + step).rem_euclid(len),
            None if step < 0 => len - 1,
            None => 0,
        };
        self.selected = Some(order[next as usize]);
    }

    fn order(&self) -> Vec<StopId> {
        self.stops.sorted().iter().map(|s| s.id).collect()
    }

    // ── keys ──────────────────────────────────────────────────────────────

    /// Applies `press` to the panel state. Returns a command when the key maps
    /// to an operation the caller must run.
    pub fn handle_key(&mut self, press: KeyPress) -> Option<Command> {
        let mods = press.modifiers;

        if mods.command() {
            return match press.key {
                Key::S => Some(Command::Save),
                Key::O => Some(Command::Load),
                Key::E => Some(Command::Export),
                _ => None,
            };
        }

        match press.key {
            Key::Escape => return Some(Command::Quit),

            Key::Tab if mods.shift => self.select_previous(),
            Key::Tab => self.select_next(),

            Key::A | Key::Insert => {
                self.add_stop();
            }
            Key::Delete | Key::Backspace => {
                self.delete_selected();
            }

            Key::ArrowLeft | Key::ArrowRight => {
                let step = if mods.shift {
                    PERCENT_STEP_LARGE
                } else {
                    PERCENT_STEP
                };
                let sign = if press.key == Key::ArrowLeft {
                    -1.0
                } else {
                    1.0
                };
                self.nudge_percentage(sign * step);
            }

            Key::R => self.channel = Channel::Red,
            Key::G => self.channel = Channel::Green,
            Key::B => self.channel = Channel::Blue,
            Key::ArrowUp => self.nudge_channel(CHANNEL_STEP),
            Key::ArrowDown => self.nudge_channel(-CHANNEL_STEP),

            Key::PageUp => self.export.set_width(self.export.width().saturating_mul(2)),
            Key::PageDown => self.export.set_width(self.export.width() / 2),
            Key::Home => self.export.set_height(self.export.height().saturating_mul(2)),
            Key::End => self.export.set_height(self.export.height() / 2),

            Key::Q if mods.shift => self.export.set_quality(self.export.quality() - QUALITY_STEP),
            Key::Q => self.export.set_quality(self.export.quality() + QUALITY_STEP),

            _ => {}
        }
        None
    }

    /// One-line summary of the panel, shown in the window title.
    pub fn status_line(&self) -> String {
        let selection = match self.selected_stop() {
            Some(s) => format!(
                "stop {} at {:.1}% rgb({:.2}, {:.2}, {:.2}) [{}]",
                s.id,
                s.percentage,
                s.color.r,
                s.color.g,
                s.color.b,
                self.channel.label()
            ),
            None => "no stop selected".to_string(),
        };
        format!(
            "Color Gradient Editor | {selection} | {} stops | export {}x{} q{:.2}",
            self.stops.len(),
            self.export.width(),
            self.export.height(),
            self.export.quality()
        )
    }
}
