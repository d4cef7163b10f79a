//! Color values and HSL/RGB conversion.
//!
//! Internal RGB channels are 16-bit scaled (`0..=0xffff`); an 8-bit
//! channel `v` maps to `v * 0x101`. HSL components are normalized floats
//! in `[0, 1]`. Conversions are pure functions; callers are responsible
//! for keeping arguments inside the declared domains.

use std::fmt;

/// Scale factor between 8-bit and 16-bit channel representations.
const CHANNEL_SCALE: u32 = 0x101;

/// A color value in one of the supported representations.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Color {
    /// Hex literal: `#abc`, `#aabbcc`. Channels are 8-bit.
    Hex {
        r: u8,
        g: u8,
        b: u8,
        a: Option<u8>,
    },
    /// `rgb()` with 16-bit scaled channels.
    Rgb { r: u32, g: u32, b: u32 },
    /// `rgba()` with 16-bit scaled channels and a normalized alpha.
    Rgba { r: u32, g: u32, b: u32, a: f64 },
    /// `hsl()` with normalized components.
    Hsl { h: f64, s: f64, l: f64 },
    /// `hsla()` with normalized components.
    Hsla { h: f64, s: f64, l: f64, a: f64 },
}

/// Piecewise hue fold used by [`hsl_to_rgb`].
///
/// `t` is wrapped into `[0, 1)` by adding or subtracting 1, then mapped
/// through four regions: rising edge below 1/6, plateau below 1/2,
/// falling edge below 2/3, floor otherwise.
pub fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
    let mut t = t;
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 0.5 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

/// Convert normalized HSL components to 8-bit RGB channels.
///
/// Achromatic inputs (`s == 0`) short-circuit to a gray level. Channels
/// round half-up.
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    let (fr, fg, fb) = if s == 0.0 {
        (l, l, l)
    } else {
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - s * l };
        let p = 2.0 * l - q;
        (
            hue_to_rgb(p, q, h + 1.0 / 3.0),
            hue_to_rgb(p, q, h),
            hue_to_rgb(p, q, h - 1.0 / 3.0),
        )
    };
    (
        (fr * 255.0 + 0.5) as u8,
        (fg * 255.0 + 0.5) as u8,
        (fb * 255.0 + 0.5) as u8,
    )
}

/// Convert 8-bit RGB channels to normalized HSL components.
///
/// Inverse of [`hsl_to_rgb`] up to the rounding of the 8-bit channel
/// representation: a round trip reproduces each channel within ±1.
pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let fr = f64::from(r) / 255.0;
    let fg = f64::from(g) / 255.0;
    let fb = f64::from(b) / 255.0;
    let max = fr.max(fg).max(fb);
    let min = fr.min(fg).min(fb);
    let l = (max + min) / 2.0;

    if max == min {
        // Achromatic.
        return (0.0, 0.0, l);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let mut h = if max == fr {
        let mut h = (fg - fb) / d;
        if fg < fb {
            h += 6.0;
        }
        h
    } else if max == fg {
        (fb - fr) / d + 2.0
    } else {
        (fr - fg) / d + 4.0
    };
    h /= 6.0;
    (h, s, l)
}

impl Color {
    /// Parse a hex color literal (with or without the leading `#`).
    ///
    /// Accepts 3- and 6-digit forms; 3-digit nibbles are doubled
    /// (`#abc` == `#aabbcc`). Returns `None` for any other shape.
    pub fn from_hex_str(text: &str) -> Option<Color> {
        let digits = text.strip_prefix('#').unwrap_or(text);
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        match digits.len() {
            3 => {
                let nibble = |i: usize| u8::from_str_radix(&digits[i..=i], 16).ok();
                let (r, g, b) = (nibble(0)?, nibble(1)?, nibble(2)?);
                Some(Color::Hex {
                    r: r << 4 | r,
                    g: g << 4 | g,
                    b: b << 4 | b,
                    a: None,
                })
            }
            6 => {
                let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
                Some(Color::Hex {
                    r: byte(0)?,
                    g: byte(2)?,
                    b: byte(4)?,
                    a: None,
                })
            }
            _ => None,
        }
    }

    /// 8-bit RGB channels of this color, converting through HSL where
    /// needed. Alpha is discarded.
    pub fn channels(&self) -> (u8, u8, u8) {
        match *self {
            Color::Hex { r, g, b, .. } => (r, g, b),
            Color::Rgb { r, g, b } | Color::Rgba { r, g, b, .. } => (
                (r / CHANNEL_SCALE) as u8,
                (g / CHANNEL_SCALE) as u8,
                (b / CHANNEL_SCALE) as u8,
            ),
            Color::Hsl { h, s, l } | Color::Hsla { h, s, l, .. } => hsl_to_rgb(h, s, l),
        }
    }

    /// Alpha component, if this representation carries one.
    pub fn alpha(&self) -> Option<f64> {
        match *self {
            Color::Hex { a, .. } => a.map(|a| f64::from(a) / 255.0),
            Color::Rgba { a, .. } | Color::Hsla { a, .. } => Some(a),
            Color::Rgb { .. } | Color::Hsl { .. } => None,
        }
    }

    /// Convert to the `Rgb` representation (16-bit scaled channels).
    pub fn to_rgb(&self) -> Color {
        let (r, g, b) = self.channels();
        Color::Rgb {
            r: u32::from(r) * CHANNEL_SCALE,
            g: u32::from(g) * CHANNEL_SCALE,
            b: u32::from(b) * CHANNEL_SCALE,
        }
    }

    /// Convert to the `Rgba` representation; colors without an alpha get 1.
    pub fn to_rgba(&self) -> Color {
        let (r, g, b) = self.channels();
        Color::Rgba {
            r: u32::from(r) * CHANNEL_SCALE,
            g: u32::from(g) * CHANNEL_SCALE,
            b: u32::from(b) * CHANNEL_SCALE,
            a: self.alpha().unwrap_or(1.0),
        }
    }

    /// Convert to the `Hsl` representation.
    pub fn to_hsl(&self) -> Color {
        match *self {
            hsl @ Color::Hsl { .. } => hsl,
            Color::Hsla { h, s, l, .. } => Color::Hsl { h, s, l },
            _ => {
                let (r, g, b) = self.channels();
                let (h, s, l) = rgb_to_hsl(r, g, b);
                Color::Hsl { h, s, l }
            }
        }
    }

    /// Convert to the `Hsla` representation; colors without an alpha get 1.
    pub fn to_hsla(&self) -> Color {
        match *self {
            Color::Hsla { .. } => *self,
            Color::Hsl { h, s, l } => Color::Hsla { h, s, l, a: 1.0 },
            _ => {
                let (r, g, b) = self.channels();
                let (h, s, l) = rgb_to_hsl(r, g, b);
                Color::Hsla {
                    h,
                    s,
                    l,
                    a: self.alpha().unwrap_or(1.0),
                }
            }
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Color::Hex { r, g, b, a: None } => write!(f, "#{r:02x}{g:02x}{b:02x}"),
            Color::Hex {
                r,
                g,
                b,
                a: Some(a),
            } => write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}"),
            Color::Rgb { .. } => {
                let (r, g, b) = self.channels();
                write!(f, "rgb({r}, {g}, {b})")
            }
            Color::Rgba { a, .. } => {
                let (r, g, b) = self.channels();
                write!(f, "rgba({r}, {g}, {b}, {a})")
            }
            Color::Hsl { h, s, l } => write!(f, "hsl({h}, {s}, {l})"),
            Color::Hsla { h, s, l, a } => write!(f, "hsla({h}, {s}, {l}, {a})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn achromatic_short_circuit() {
        for l in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let expected = (l * 255.0 + 0.5) as u8;
            assert_eq!(hsl_to_rgb(0.0, 0.0, l), (expected, expected, expected));
            // Hue is irrelevant when saturation is zero.
            assert_eq!(hsl_to_rgb(0.7, 0.0, l), (expected, expected, expected));
        }
    }

    #[test]
    fn primary_colors() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), (255, 0, 0));
        assert_eq!(hsl_to_rgb(1.0 / 3.0, 1.0, 0.5), (0, 255, 0));
        assert_eq!(hsl_to_rgb(2.0 / 3.0, 1.0, 0.5), (0, 0, 255));
    }

    #[test]
    fn rgb_to_hsl_achromatic() {
        let (h, s, l) = rgb_to_hsl(128, 128, 128);
        assert_eq!(h, 0.0);
        assert_eq!(s, 0.0);
        assert!((l - 128.0 / 255.0).abs() < 1e-9);
    }

    #[test]
    fn rgb_to_hsl_pure_red() {
        let (h, s, l) = rgb_to_hsl(255, 0, 0);
        assert_eq!(h, 0.0);
        assert_eq!(s, 1.0);
        assert_eq!(l, 0.5);
    }

    #[test]
    fn hex_parse_three_digit_expands() {
        let color = Color::from_hex_str("#abc").unwrap();
        assert_eq!(
            color,
            Color::Hex {
                r: 0xaa,
                g: 0xbb,
                b: 0xcc,
                a: None
            }
        );
    }

    #[test]
    fn hex_parse_six_digit() {
        let color = Color::from_hex_str("#aabbcc").unwrap();
        assert_eq!(color.channels(), (0xaa, 0xbb, 0xcc));
    }

    #[test]
    fn hex_parse_rejects_bad_input() {
        assert_eq!(Color::from_hex_str("#ab"), None);
        assert_eq!(Color::from_hex_str("#abcd"), None);
        assert_eq!(Color::from_hex_str("#myId"), None);
    }

    #[test]
    fn conversions_are_pure() {
        let color = Color::Hex {
            r: 0x12,
            g: 0x34,
            b: 0x56,
            a: None,
        };
        let _ = color.to_hsl();
        let _ = color.to_rgba();
        // The source value is untouched by conversion.
        assert_eq!(color.channels(), (0x12, 0x34, 0x56));
    }

    #[test]
    fn hex_to_rgb_scales_channels() {
        let color = Color::from_hex_str("#ffffff").unwrap();
        assert_eq!(
            color.to_rgb(),
            Color::Rgb {
                r: 0xffff,
                g: 0xffff,
                b: 0xffff
            }
        );
    }

    #[test]
    fn display_hex() {
        let color = Color::from_hex_str("#0a0b0c").unwrap();
        assert_eq!(color.to_string(), "#0a0b0c");
    }

    proptest! {
        /// Round trip through HSL reproduces each channel within ±1.
        #[test]
        fn round_trip_within_one(r: u8, g: u8, b: u8) {
            let (h, s, l) = rgb_to_hsl(r, g, b);
            let (r2, g2, b2) = hsl_to_rgb(h, s, l);
            prop_assert!(i16::from(r).abs_diff(i16::from(r2)) <= 1);
            prop_assert!(i16::from(g).abs_diff(i16::from(g2)) <= 1);
            prop_assert!(i16::from(b).abs_diff(i16::from(b2)) <= 1);
        }

        /// HSL components coming out of `rgb_to_hsl` stay normalized.
        #[test]
        fn hsl_components_normalized(r: u8, g: u8, b: u8) {
            let (h, s, l) = rgb_to_hsl(r, g, b);
            prop_assert!((0.0..=1.0).contains(&h));
            prop_assert!((0.0..=1.0).contains(&s));
            prop_assert!((0.0..=1.0).contains(&l));
        }
    }
}
