//! Presentation mapping - how engine values look to the player
//!
//! Colors are identity tokens in the engine. This module is the one place that
//! turns them into display tokens and share-text emoji.

use crate::core::ColorPattern;
use crate::types::ColorId;

/// Emoji for an empty cell in share text
pub const EMPTY_EMOJI: char = '⬛';

/// CSS custom property the host styles the color with
///
/// ```
/// use box_puzzle_engine::presentation::display_token;
/// use box_puzzle_engine::types::ColorId;
///
/// assert_eq!(display_token(ColorId::Red), "var(--color-1)");
/// assert_eq!(display_token(ColorId::Purple), "var(--color-5)");
/// ```
pub fn display_token(color: ColorId) -> String {
    format!("var(--color-{})", color.index() + 1)
}

/// Share-text emoji for a cell
pub fn emoji(color: Option<ColorId>) -> char {
    match color {
        Some(ColorId::Red) => '🟥',
        Some(ColorId::Yellow) => '🟨',
        Some(ColorId::Green) => '🟩',
        Some(ColorId::Blue) => '🟦',
        Some(ColorId::Purple) => '🟪',
        None => EMPTY_EMOJI,
    }
}

/// One line of emoji per pattern row
pub fn emoji_grid(pattern: &ColorPattern) -> String {
    pattern
        .iter_rows()
        .map(|row| row.iter().map(|&c| emoji(c)).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// `MM:SS`, minutes uncapped
pub fn format_elapsed(elapsed_ms: u64) -> String {
    let total_secs = elapsed_ms / 1000;
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}
