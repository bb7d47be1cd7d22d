//! Sequential color ramp for tile intensities.

use serde::Serialize;

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Nine-step light-to-dark green ramp.
const GREENS: [Rgb; 9] = [
    Rgb(0xf7, 0xfc, 0xf5),
    Rgb(0xe5, 0xf5, 0xe0),
    Rgb(0xc7, 0xe9, 0xc0),
    Rgb(0xa1, 0xd9, 0x9b),
    Rgb(0x74, 0xc4, 0x76),
    Rgb(0x41, 0xab, 0x5d),
    Rgb(0x23, 0x8b, 0x45),
    Rgb(0x00, 0x6d, 0x2c),
    Rgb(0x00, 0x44, 0x1b),
];

/// Piecewise-linear color scale over `[0, 1]`.
#[derive(Debug, Clone)]
pub struct ColorScale {
    stops: Vec<Rgb>,
}

impl ColorScale {
    pub fn greens() -> Self {
        Self {
            stops: GREENS.to_vec(),
        }
    }

    /// Scale through the given stops; a single stop is a constant color.
    pub fn from_stops(stops: Vec<Rgb>) -> Option<Self> {
        if stops.is_empty() {
            return None;
        }
        Some(Self { stops })
    }

    /// Color at `t`, clamped to `[0, 1]`.
    pub fn at(&self, t: f64) -> Rgb {
        if self.stops.len() == 1 {
            return self.stops[0];
        }
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let segments = (self.stops.len() - 1) as f64;
        let pos = t * segments;
        let i = (pos.floor() as usize).min(self.stops.len() - 2);
        let frac = pos - i as f64;
        let (a, b) = (self.stops[i], self.stops[i + 1]);
        let lerp = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * frac).round() as u8;
        Rgb(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
    }
}

impl Default for ColorScale {
    fn default() -> Self {
        Self::greens()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        let scale = ColorScale::greens();
        assert_eq!(scale.at(0.0), Rgb(0xf7, 0xfc, 0xf5));
        assert_eq!(scale.at(1.0), Rgb(0x00, 0x44, 0x1b));
        assert_eq!(scale.at(2.0), scale.at(1.0));
        assert_eq!(scale.at(-1.0), scale.at(0.0));
    }

    #[test]
    fn test_midpoint_is_a_stop() {
        let scale = ColorScale::greens();
        assert_eq!(scale.at(0.5), Rgb(0x74, 0xc4, 0x76));
    }

    #[test]
    fn test_darkens_monotonically() {
        let scale = ColorScale::greens();
        let g: Vec<u8> = (0..=10).map(|i| scale.at(i as f64 / 10.0).1).collect();
        assert!(g.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_hex() {
        assert_eq!(Rgb(0, 0x44, 0x1b).hex(), "#00441b");
    }

    #[test]
    fn test_single_stop() {
        let scale = ColorScale::from_stops(vec![Rgb(1, 2, 3)]).unwrap();
        assert_eq!(scale.at(0.7), Rgb(1, 2, 3));
        assert!(ColorScale::from_stops(Vec::new()).is_none());
    }
}
