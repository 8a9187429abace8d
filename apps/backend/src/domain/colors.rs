//! Drawing color allocation.
//!
//! Colors come from a fixed palette in random order. Once the palette is
//! exhausted the allocator synthesizes candidates by averaging every distinct
//! k-combination of base colors for growing k, until an unused color turns up
//! or k exceeds the palette size.

use std::collections::HashSet;

use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::errors::domain::{DomainError, ValidationKind};

pub const DRAWING_COLORS: [&str; 9] = [
    "#4A466D", // blue
    "#99454D", // red
    "#69536D", // purple
    "#3F8F8D", // green
    "#855419", // orange
    "#877241", // yellow
    "#6E4C4E", // pink
    "#451e3e", // dark purple
    "#7d5d54", // brown
];

pub fn pick_color<R: Rng>(used: &HashSet<String>, rng: &mut R) -> Result<String, DomainError> {
    pick_color_from(&DRAWING_COLORS, used, rng)
}

pub fn pick_color_from<R: Rng>(
    palette: &[&str],
    used: &HashSet<String>,
    rng: &mut R,
) -> Result<String, DomainError> {
    let mut pool: Vec<String> = palette.iter().map(|c| c.to_lowercase()).collect();
    pool.shuffle(rng);

    let mut mixer_stage = 1usize;
    loop {
        while let Some(color) = pool.pop() {
            if !used.contains(&color) {
                return Ok(color);
            }
        }

        mixer_stage += 1;
        if mixer_stage > palette.len() {
            return Err(DomainError::validation(
                ValidationKind::Other("too_many_players".into()),
                "number of players is greater than number of drawing colors",
            ));
        }

        pool = palette
            .iter()
            .combinations(mixer_stage)
            .map(|combo| mix(&combo))
            .collect();
        pool.shuffle(rng);
    }
}

/// Average the 24-bit values of the component colors.
fn mix(colors: &[&&str]) -> String {
    let sum: u32 = colors
        .iter()
        .map(|c| u32::from_str_radix(&c[1..], 16).unwrap_or(0))
        .sum();
    format!("#{:06x}", sum / colors.len() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    #[test]
    fn base_palette_colors_are_pairwise_distinct() {
        let mut rng = rand::rng();
        let mut used = HashSet::new();
        for _ in 0..DRAWING_COLORS.len() {
            let color = pick_color(&used, &mut rng).unwrap();
            assert!(used.insert(color));
        }
    }

    #[test]
    fn mixing_extends_the_palette_past_its_size() {
        let mut rng = rand::rng();
        let mut used = HashSet::new();
        // Twice the palette size still succeeds via mixed candidates.
        for _ in 0..DRAWING_COLORS.len() * 2 {
            let color = pick_color(&used, &mut rng).unwrap();
            assert!(used.insert(color), "allocator returned a used color");
        }
    }

    #[test]
    fn allocation_fails_once_capacity_is_exhausted() {
        let palette = ["#000000", "#000002"];
        let mut rng = rand::rng();
        let mut used = HashSet::new();
        used.insert("#000000".to_string());
        used.insert("#000002".to_string());
        // Only remaining candidate is the k=2 average.
        let mixed = pick_color_from(&palette, &used, &mut rng).unwrap();
        assert_eq!(mixed, "#000001");
        used.insert(mixed);

        let err = pick_color_from(&palette, &used, &mut rng);
        assert!(err.is_err());
    }

    proptest! {
        #[test]
        fn allocated_colors_stay_distinct(n in 1usize..=24) {
            let mut rng = rand::rng();
            let mut used = HashSet::new();
            for _ in 0..n {
                let color = pick_color(&used, &mut rng).unwrap();
                prop_assert!(used.insert(color));
            }
        }
    }
}
