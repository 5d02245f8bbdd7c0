use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub fn display_name(first: &str, last: &str) -> String {
    let first = first.trim();
    let last = last.trim();
    match (first.is_empty(), last.is_empty()) {
        (false, false) => format!("{first} {last}"),
        (false, true) => first.to_owned(),
        (true, false) => last.to_owned(),
        (true, true) => String::new(),
    }
}

/// Two values in [0, 1), stable for a given (seed, id) pair. The seed is
/// drawn once per app session so unplaced cards land differently between
/// launches but stay put across snapshot refreshes within one.
pub fn seeded_pair(seed: u64, id: &str) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / (u32::MAX as f64 + 1.0)) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / (u32::MAX as f64 + 1.0)) as f32;
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_combines_and_trims() {
        assert_eq!(display_name(" Ada ", "Quist"), "Ada Quist");
        assert_eq!(display_name("Ada", ""), "Ada");
        assert_eq!(display_name("", " Quist"), "Quist");
        assert_eq!(display_name("  ", ""), "");
    }

    #[test]
    fn seeded_pair_is_stable_per_seed_and_varies_across_seeds() {
        assert_eq!(seeded_pair(7, "m1"), seeded_pair(7, "m1"));
        assert_ne!(seeded_pair(7, "m1"), seeded_pair(8, "m1"));

        let (x, y) = seeded_pair(7, "m1");
        assert!((0.0..1.0).contains(&x));
        assert!((0.0..1.0).contains(&y));
    }
}
