use eframe::egui::Color32;

pub const DEFAULT_ACCENT: Color32 = Color32::from_rgb(161, 89, 225);
pub const SUCCESS: Color32 = Color32::from_rgb(0, 180, 0);
pub const ERROR: Color32 = Color32::from_rgb(220, 50, 50);
pub const MUTED: Color32 = Color32::from_rgb(150, 150, 150);

pub trait ColorExt {
    fn from_hex(hex: &str) -> Option<Self>
    where
        Self: Sized;
}

impl ColorExt for Color32 {
    /// Accepts `#RRGGBB` or the short `#RGB` form.
    fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();

        match hex.len() {
            6 => Some(Color32::from_rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let r = channel(&hex[0..1])?;
                let g = channel(&hex[1..2])?;
                let b = channel(&hex[2..3])?;
                Some(Color32::from_rgb(r * 17, g * 17, b * 17))
            }
            _ => None,
        }
    }
}

pub fn accent_from_settings(hex: &str) -> Color32 {
    Color32::from_hex(hex).unwrap_or(DEFAULT_ACCENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_forms() {
        assert_eq!(Color32::from_hex("#A159E1"), Some(DEFAULT_ACCENT));
        assert_eq!(Color32::from_hex("fff"), Some(Color32::from_rgb(255, 255, 255)));
        assert_eq!(Color32::from_hex("#12345"), None);
        assert_eq!(Color32::from_hex("#GG0000"), None);
    }

    #[test]
    fn bad_setting_falls_back_to_default_accent() {
        assert_eq!(accent_from_settings("purple"), DEFAULT_ACCENT);
    }

    #[test]
    fn non_ascii_setting_falls_back_to_default_accent() {
        assert_eq!(Color32::from_hex("éa"), None);
        assert_eq!(accent_from_settings("#aé€"), DEFAULT_ACCENT);
    }
}
