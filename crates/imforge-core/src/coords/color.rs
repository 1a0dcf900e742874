/// Packed straight-alpha RGBA colour, the unit the immediate-mode toolkit
/// stores style colours in.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Color32 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color32 {
    pub const TRANSPARENT: Color32 = Color32::rgba(0, 0, 0, 0);
    pub const WHITE: Color32 = Color32::rgba(255, 255, 255, 255);
    pub const BLACK: Color32 = Color32::rgba(0, 0, 0, 255);

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parses `#rrggbb` or `#rrggbbaa` (the `#` is optional).
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if !(hex.len() == 6 || hex.len() == 8) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        let a = if hex.len() == 8 { byte(6)? } else { 255 };
        Some(Self::rgba(byte(0)?, byte(2)?, byte(4)?, a))
    }

    /// `#rrggbbaa`, lower-case.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_six_digits_is_opaque() {
        assert_eq!(Color32::from_hex("#102030"), Some(Color32::rgba(16, 32, 48, 255)));
    }

    #[test]
    fn hex_round_trip() {
        let c = Color32::rgba(1, 2, 254, 128);
        assert_eq!(Color32::from_hex(&c.to_hex()), Some(c));
    }

    #[test]
    fn hex_rejects_bad_digits() {
        assert_eq!(Color32::from_hex("#xyz123"), None);
        assert_eq!(Color32::from_hex("#12345"), None);
    }
}
