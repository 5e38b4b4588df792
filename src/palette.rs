use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArcColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ArcColor {
    pub fn css(&self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// Yellow/gold/brown tones, one per player arc. Red is drawn from 90..225,
/// green trails it by 10, blue is red divided by a random 1..4.
pub fn arc_colors<R: Rng>(count: usize, rng: &mut R) -> Vec<ArcColor> {
    (0..count)
        .map(|_| {
            let r: u8 = rng.gen_range(90..225);
            let g = r - 10;
            let divisor = rng.gen_range(1.0..4.0_f64);
            let b = (f64::from(r) / divisor).floor() as u8;
            ArcColor { r, g, b }
        })
        .collect()
}

pub fn arc_colors_seeded(count: usize, seed: Option<u64>) -> Vec<ArcColor> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    arc_colors(count, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_stay_in_gold_range() {
        let colors = arc_colors_seeded(64, Some(7));
        assert_eq!(colors.len(), 64);
        for c in colors {
            assert!((90..225).contains(&c.r));
            assert_eq!(c.g, c.r - 10);
            assert!(c.b <= c.r);
            assert!((u16::from(c.b) + 1) * 4 > u16::from(c.r));
        }
    }

    #[test]
    fn seed_is_reproducible() {
        assert_eq!(arc_colors_seeded(5, Some(42)), arc_colors_seeded(5, Some(42)));
    }

    #[test]
    fn css_format() {
        let c = ArcColor { r: 200, g: 190, b: 80 };
        assert_eq!(c.css(), "rgb(200,190,80)");
    }
}
