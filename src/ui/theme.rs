// Unilog - ui/theme.rs
//
// Colour scheme, style/severity colour mapping, and icon glyphs.
// No dependencies on app state or business logic.

use crate::core::model::{Severity, Style};
use egui::Color32;

/// Accent colour for a visual style.
pub fn style_colour(style: Style) -> Color32 {
    match style {
        Style::Danger => Color32::from_rgb(220, 38, 38),   // Red 600
        Style::Warning => Color32::from_rgb(217, 119, 6),  // Amber 600
        Style::Info => Color32::from_rgb(59, 130, 246),    // Blue 500
        Style::Success => Color32::from_rgb(22, 163, 74),  // Green 600
        Style::Primary => Color32::from_rgb(107, 114, 128), // Gray 500
    }
}

/// Colour for a severity badge in the viewer.
pub fn severity_colour(severity: &Severity) -> Color32 {
    match severity {
        Severity::Critical => Color32::from_rgb(220, 38, 38), // Red 600
        Severity::Error => Color32::from_rgb(185, 28, 28),    // Red 800
        Severity::Warning => Color32::from_rgb(217, 119, 6),  // Amber 600
        Severity::Info => Color32::from_rgb(209, 213, 219),   // Gray 300
        Severity::Debug => Color32::from_rgb(107, 114, 128),  // Gray 500
    }
}

/// High-contrast foreground for row text.
pub fn row_text_colour(dark_mode: bool) -> Color32 {
    if dark_mode {
        Color32::from_rgb(255, 255, 255)
    } else {
        Color32::from_rgb(17, 24, 39) // Gray 900
    }
}

/// Unicode stand-ins for the classifier's Font Awesome icon names.
pub fn icon_glyph(icon: &str) -> &'static str {
    match icon {
        "times-circle" => "\u{2716}",         // heavy multiplication x
        "exclamation-triangle" => "\u{26A0}", // warning sign
        "info-circle" => "\u{2139}",          // information source
        "check-circle" => "\u{2714}",         // heavy check mark
        "cogs" => "\u{2699}",                 // gear
        "user" => "\u{263A}",                 // smiling face
        "bug" => "\u{2692}",                  // hammer and pick
        "sitemap" => "\u{2387}",              // alternative key symbol (network-ish)
        "shield-alt" => "\u{26E8}",           // black cross on shield
        _ => "\u{1F4AC}",                     // speech balloon ("comment")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_classifier_icon_has_a_glyph() {
        for icon in [
            "times-circle",
            "exclamation-triangle",
            "info-circle",
            "check-circle",
            "cogs",
            "user",
            "bug",
            "sitemap",
            "shield-alt",
            "comment",
        ] {
            assert!(!icon_glyph(icon).is_empty());
        }
    }
}
