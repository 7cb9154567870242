//! Deterministic color assignment for multi-source output.

use std::collections::HashMap;

use colored::Color;

/// ColorBrewer-ish qualitative palette: visually distinct hues that stay
/// readable on both dark and light terminals.
const PALETTE: [Color; 9] = [
    Color::TrueColor { r: 228, g: 26, b: 28 },   // red
    Color::TrueColor { r: 55, g: 126, b: 184 },  // blue
    Color::TrueColor { r: 77, g: 175, b: 74 },   // green
    Color::TrueColor { r: 152, g: 78, b: 163 },  // purple
    Color::TrueColor { r: 255, g: 127, b: 0 },   // orange
    Color::TrueColor { r: 255, g: 255, b: 51 },  // yellow
    Color::TrueColor { r: 166, g: 86, b: 40 },   // brown
    Color::TrueColor { r: 247, g: 129, b: 191 }, // pink
    Color::TrueColor { r: 153, g: 153, b: 153 }, // grey
];

/// Assigns each name a stable color on first sight, in palette order. With
/// more names than palette entries, colors repeat.
#[derive(Default)]
pub struct ColorMap {
    assigned: HashMap<String, Color>,
}

impl ColorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color_for(&mut self, name: &str) -> Color {
        let next = PALETTE[self.assigned.len() % PALETTE.len()];
        *self
            .assigned
            .entry(name.to_string())
            .or_insert(next)
    }
}
