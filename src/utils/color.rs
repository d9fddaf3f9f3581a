use egui::Color32;

pub trait ColorExt {
    fn from_hex(hex: &str) -> Option<Self>
    where
        Self: Sized;
}

impl ColorExt for Color32 {
    fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

        Some(Color32::from_rgb(r, g, b))
    }
}

/// Accent used for progress bars and links, falling back when the configured
/// value is not `#rrggbb`.
pub fn accent_or_default(hex: &str) -> Color32 {
    Color32::from_hex(hex).unwrap_or_else(|| {
        log::warn!("Invalid accent color '{}', using default", hex);
        Color32::from_rgb(91, 141, 239)
    })
}
