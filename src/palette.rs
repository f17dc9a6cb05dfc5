//! Note and string color palettes.
//!
//! Cards and links store palette keys; the renderer resolves them to CSS
//! classes and hex colors here. Unknown keys fall back to the first entry.

#[cfg(test)]
#[path = "palette_test.rs"]
mod palette_test;

pub const DEFAULT_NOTE_COLOR: &str = "yellow";
pub const DEFAULT_STRING_COLOR: &str = "red";

/// One palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swatch {
    pub key: &'static str,
    pub label: &'static str,
    pub hex: &'static str,
}

pub const NOTE_COLORS: [Swatch; 12] = [
    Swatch { key: "yellow", label: "Yellow", hex: "#fff59d" },
    Swatch { key: "pink", label: "Pink", hex: "#f8bbd9" },
    Swatch { key: "blue", label: "Blue", hex: "#b3e5fc" },
    Swatch { key: "green", label: "Green", hex: "#c8e6c9" },
    Swatch { key: "orange", label: "Orange", hex: "#ffcc80" },
    Swatch { key: "purple", label: "Purple", hex: "#d1c4e9" },
    Swatch { key: "coral", label: "Coral", hex: "#ffab91" },
    Swatch { key: "mint", label: "Mint", hex: "#b2dfdb" },
    Swatch { key: "lavender", label: "Lavender", hex: "#e1bee7" },
    Swatch { key: "peach", label: "Peach", hex: "#ffe0b2" },
    Swatch { key: "sky", label: "Sky", hex: "#b2ebf2" },
    Swatch { key: "lime", label: "Lime", hex: "#dcedc8" },
];

pub const STRING_COLORS: [Swatch; 8] = [
    Swatch { key: "red", label: "Red", hex: "#8b0000" },
    Swatch { key: "blue", label: "Blue", hex: "#1a237e" },
    Swatch { key: "green", label: "Green", hex: "#1b5e20" },
    Swatch { key: "yellow", label: "Yellow", hex: "#f57f17" },
    Swatch { key: "white", label: "White", hex: "#e0e0e0" },
    Swatch { key: "orange", label: "Orange", hex: "#e65100" },
    Swatch { key: "purple", label: "Purple", hex: "#4a148c" },
    Swatch { key: "black", label: "Black", hex: "#1a1a1a" },
];

fn find(table: &'static [Swatch], key: &str) -> Swatch {
    table.iter().copied().find(|s| s.key == key).unwrap_or(table[0])
}

/// Note swatch for `key`, yellow when unknown.
#[must_use]
pub fn note_swatch(key: &str) -> Swatch {
    find(&NOTE_COLORS, key)
}

/// CSS class for a note color, e.g. `sticky-pink`.
#[must_use]
pub fn note_class(key: &str) -> String {
    format!("sticky-{}", note_swatch(key).key)
}

/// Hex color for a link string, dark red when unknown.
#[must_use]
pub fn string_hex(key: &str) -> &'static str {
    find(&STRING_COLORS, key).hex
}

#[must_use]
pub fn is_note_color(key: &str) -> bool {
    NOTE_COLORS.iter().any(|s| s.key == key)
}

#[must_use]
pub fn is_string_color(key: &str) -> bool {
    STRING_COLORS.iter().any(|s| s.key == key)
}
