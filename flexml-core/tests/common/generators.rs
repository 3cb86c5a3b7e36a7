//! Stochastic content generators for test variations
//!
//! Uses seeded RNG for reproducibility. Print seed on failure for replay.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded generator for reproducible stochastic tests
pub struct Gen {
    pub rng: StdRng,
    pub seed: u64,
}

impl Gen {
    /// Create with specific seed (for reproduction)
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create from environment or random seed
    pub fn from_env_or_random() -> Self {
        let seed = std::env::var("FLEXML_TEST_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(rand::random);
        Self::new(seed)
    }

    /// Geometric distribution: count until rand > alpha
    /// Returns 0, 1, 2, ... with decreasing probability
    pub fn geometric(&mut self, alpha: f64) -> usize {
        let mut n = 0;
        while self.rng.gen::<f64>() < alpha {
            n += 1;
        }
        n
    }

    /// Random boolean with probability p
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.gen::<f64>() < p
    }

    /// Random element or attribute name
    pub fn name(&mut self) -> String {
        let len = 1 + self.geometric(0.6);
        let mut name = String::with_capacity(len);
        name.push(self.rng.gen_range(b'a'..=b'z') as char);
        let chars = b"abcdefghijklmnopqrstuvwxyz0123456789-_.";
        for _ in 1..len {
            name.push(chars[self.rng.gen_range(0..chars.len())] as char);
        }
        name
    }

    /// Non-empty text run with no markup characters
    pub fn text(&mut self) -> String {
        let len = 1 + self.geometric(0.85);
        let chars = b"abcdefghijklmnopqrstuvwxyz ABC0123456789.,;:!?\n\t";
        (0..len)
            .map(|_| chars[self.rng.gen_range(0..chars.len())] as char)
            .collect()
    }

    /// Attribute value, possibly empty, never containing a quote
    pub fn attribute_value(&mut self) -> String {
        let len = self.geometric(0.7);
        let chars = b"abcdefghijklmnopqrstuvwxyz0123456789 _./";
        (0..len)
            .map(|_| chars[self.rng.gen_range(0..chars.len())] as char)
            .collect()
    }

    /// Well-formed fragment: a sequence of top-level nodes with no two
    /// text runs adjacent, so re-parsing never merges them.
    pub fn fragment(&mut self) -> String {
        let mut out = String::new();
        let count = 1 + self.geometric(0.6);
        self.children(&mut out, count, 0);
        out
    }

    fn children(&mut self, out: &mut String, count: usize, depth: usize) {
        let mut last_was_text = false;
        for _ in 0..count {
            if !last_was_text && self.chance(0.35) {
                out.push_str(&self.text());
                last_was_text = true;
                continue;
            }
            last_was_text = false;
            match self.rng.gen_range(0..10) {
                0 => {
                    let body = self.attribute_value();
                    out.push_str(&format!("<!--{body}-->"));
                }
                1 => {
                    let target = self.name();
                    let data = self.attribute_value();
                    out.push_str(&format!("<?pi-{target} {}?>", data.trim()));
                }
                _ => self.element(out, depth),
            }
        }
    }

    fn element(&mut self, out: &mut String, depth: usize) {
        let name = self.name();
        out.push('<');
        out.push_str(&name);

        let mut seen = Vec::new();
        for _ in 0..self.geometric(0.4) {
            let key = self.name();
            if seen.contains(&key) {
                continue;
            }
            let value = self.attribute_value();
            let quote = if self.chance(0.5) { '"' } else { '\'' };
            out.push_str(&format!(" {key}={quote}{value}{quote}"));
            seen.push(key);
        }

        if depth > 4 || self.chance(0.2) {
            out.push_str("/>");
            return;
        }
        out.push('>');
        let count = self.geometric(0.6);
        self.children(out, count, depth + 1);
        out.push_str(&format!("</{name}>"));
    }

    /// Sorted, deduplicated split points strictly inside `0..len`
    pub fn cuts(&mut self, len: usize) -> Vec<usize> {
        if len < 2 {
            return Vec::new();
        }
        let mut cuts: Vec<usize> = (0..self.geometric(0.8))
            .map(|_| self.rng.gen_range(1..len))
            .collect();
        cuts.sort_unstable();
        cuts.dedup();
        cuts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reproducibility() {
        let mut g1 = Gen::new(42);
        let mut g2 = Gen::new(42);

        for _ in 0..10 {
            assert_eq!(g1.fragment(), g2.fragment());
            assert_eq!(g1.geometric(0.9), g2.geometric(0.9));
        }
    }

    #[test]
    fn test_cuts_in_range() {
        let mut gen = Gen::new(7);
        for len in 0..50 {
            for cut in gen.cuts(len) {
                assert!(cut > 0 && cut < len);
            }
        }
    }
}
