use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

/// Linear RGB color with channels in [0, 1]
///
/// Deserializes from either a `"#rrggbb"` string or a `0xRRGGBB` integer,
/// and always serializes back to the string form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ColorRepr", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Hex(u32),
    Text(String),
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    pub const RED: Color = Color::new(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::new(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::new(0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Color from a packed 24-bit `0xRRGGBB` value; upper bits are ignored
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::new(channel(16), channel(8), channel(0))
    }

    /// Packed 24-bit `0xRRGGBB` value, channels clamped to [0, 1]
    pub fn to_hex(&self) -> u32 {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    /// Parse `"#rrggbb"`, `"0xrrggbb"` or bare `"rrggbb"`
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let trimmed = text.trim();
        let digits = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix("0x"))
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if digits.len() != 6 {
            bail!("color '{}' must have exactly 6 hex digits", text);
        }
        let hex = u32::from_str_radix(digits, 16)
            .with_context(|| format!("parsing color '{}'", text))?;
        Ok(Self::from_hex(hex))
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:06x}", self.to_hex())
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_string()
    }
}

impl TryFrom<ColorRepr> for Color {
    type Error = anyhow::Error;

    fn try_from(value: ColorRepr) -> Result<Self, Self::Error> {
        match value {
            ColorRepr::Hex(hex) => Ok(Color::from_hex(hex)),
            ColorRepr::Text(text) => Color::parse(&text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_conversion() {
        let c = Color::from_hex(0x00ff00);
        assert_eq!(c, Color::GREEN);
        assert_eq!(c.to_hex(), 0x00ff00);
        assert_eq!(Color::from_hex(0x336699).to_hex(), 0x336699);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Color::parse("#ff0000").unwrap(), Color::RED);
        assert_eq!(Color::parse("0x0000ff").unwrap(), Color::BLUE);
        assert_eq!(Color::parse(" ffffff ").unwrap(), Color::WHITE);
        assert!(Color::parse("#fff").is_err());
        assert!(Color::parse("#gg0000").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Color::from_hex(0x0a0b0c).to_string(), "#0a0b0c");
    }

    #[test]
    fn test_serde_forms() {
        let from_text: Color = serde_json::from_str("\"#00ff00\"").unwrap();
        let from_int: Color = serde_json::from_str("65280").unwrap();
        assert_eq!(from_text, Color::GREEN);
        assert_eq!(from_int, Color::GREEN);
        assert_eq!(serde_json::to_string(&Color::RED).unwrap(), "\"#ff0000\"");
    }
}
