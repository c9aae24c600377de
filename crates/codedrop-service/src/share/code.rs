//! Share code generation.

use rand::Rng;

use codedrop_core::types::{CodeFormat, ShareCode};

/// Draws candidate share codes uniformly from a [`CodeFormat`]'s range.
///
/// Stateless: every call is independent, and uniqueness is left to the
/// record store. Not suitable where codes must be unguessable.
#[derive(Debug, Clone, Copy)]
pub struct CodeGenerator {
    format: CodeFormat,
}

impl CodeGenerator {
    /// Creates a generator for the given code format.
    pub fn new(format: CodeFormat) -> Self {
        Self { format }
    }

    /// The format codes are drawn from.
    pub fn format(&self) -> CodeFormat {
        self.format
    }

    /// Generates a candidate code.
    pub fn generate(&self) -> ShareCode {
        ShareCode(rand::rng().random_range(self.format.bounds()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_stay_in_range() {
        for width in 1..=9 {
            let generator = CodeGenerator::new(CodeFormat::new(width).unwrap());
            for _ in 0..1_000 {
                let code = generator.generate();
                assert!(generator.format().contains(code), "{code} outside width {width}");
            }
        }
    }

    #[test]
    fn test_distribution_is_uniform() {
        // Width 2 gives 90 buckets; 90k draws puts ~1000 in each. The
        // chi-square statistic has 89 degrees of freedom (mean 89, sd ~13),
        // so 200 is far outside what a uniform source produces.
        let format = CodeFormat::new(2).unwrap();
        let generator = CodeGenerator::new(format);
        let draws = 90_000usize;
        let mut counts = [0usize; 90];
        for _ in 0..draws {
            let code = generator.generate();
            counts[(code.value() - 10) as usize] += 1;
        }

        let expected = draws as f64 / counts.len() as f64;
        let chi_square: f64 = counts
            .iter()
            .map(|&observed| {
                let diff = observed as f64 - expected;
                diff * diff / expected
            })
            .sum();

        assert!(counts.iter().all(|&c| c > 0));
        assert!(chi_square < 200.0, "chi-square {chi_square} suggests bias");
    }
}
