//! Phrase matching: evolve a fixed-length symbol sequence toward a target string.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::compute::evolution::Domain;
use crate::schema::EvolutionConfig;

/// Space, `A-Z`, `a-z`.
pub const DEFAULT_ALPHABET: &[u8] = b" ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Errors raised by the phrase domain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PhraseError {
    #[error("Target phrase is empty")]
    EmptyTarget,
    #[error("Target symbol {symbol:?} at position {position} is not in the alphabet")]
    UnknownSymbol { symbol: char, position: usize },
    #[error("Genome has {actual} symbols, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Domain whose genomes are byte strings the length of the target.
///
/// Cost is the sum of per-position absolute differences between genome and
/// target bytes, so an exact match scores `0`.
#[derive(Debug, Clone)]
pub struct PhraseDomain {
    target: Vec<u8>,
    alphabet: Vec<u8>,
}

impl PhraseDomain {
    /// Phrase domain over [`DEFAULT_ALPHABET`].
    pub fn new(target: impl AsRef<[u8]>) -> Result<Self, PhraseError> {
        Self::with_alphabet(target, DEFAULT_ALPHABET)
    }

    /// Phrase domain drawing random symbols from `alphabet`.
    ///
    /// Every target symbol must be reachable from the alphabet.
    pub fn with_alphabet(
        target: impl AsRef<[u8]>,
        alphabet: impl AsRef<[u8]>,
    ) -> Result<Self, PhraseError> {
        let target = target.as_ref().to_vec();
        let alphabet = alphabet.as_ref().to_vec();

        if target.is_empty() {
            return Err(PhraseError::EmptyTarget);
        }
        if let Some((position, &symbol)) = target
            .iter()
            .enumerate()
            .find(|&(_, s)| !alphabet.contains(s))
        {
            return Err(PhraseError::UnknownSymbol {
                symbol: symbol as char,
                position,
            });
        }

        Ok(Self { target, alphabet })
    }

    pub fn target(&self) -> &[u8] {
        &self.target
    }

    pub fn alphabet(&self) -> &[u8] {
        &self.alphabet
    }

    /// Render a genome as text.
    pub fn decode(genome: &[u8]) -> String {
        String::from_utf8_lossy(genome).into_owned()
    }

    fn random_symbol<R: Rng + ?Sized>(&self, rng: &mut R) -> u8 {
        // Non-empty: the target is non-empty and drawn from the alphabet.
        self.alphabet[rng.gen_range(0..self.alphabet.len())]
    }

    fn check_length(&self, genome: &[u8]) -> Result<(), PhraseError> {
        if genome.len() != self.target.len() {
            return Err(PhraseError::LengthMismatch {
                expected: self.target.len(),
                actual: genome.len(),
            });
        }
        Ok(())
    }
}

impl Domain for PhraseDomain {
    type Genome = Vec<u8>;
    type Error = PhraseError;

    fn random_genome<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<u8>, PhraseError> {
        Ok((0..self.target.len()).map(|_| self.random_symbol(rng)).collect())
    }

    fn score(&self, genome: &Vec<u8>) -> Result<f64, PhraseError> {
        self.check_length(genome)?;

        let distance: u64 = genome
            .iter()
            .zip(&self.target)
            .map(|(&g, &t)| u64::from(g.abs_diff(t)))
            .sum();
        Ok(distance as f64)
    }

    fn crossover<R: Rng + ?Sized>(
        &self,
        first: &Vec<u8>,
        second: &Vec<u8>,
        rng: &mut R,
    ) -> Result<Vec<u8>, PhraseError> {
        self.check_length(first)?;
        self.check_length(second)?;

        let split = self.target.len() / 2;
        let (head, tail) = if rng.gen_bool(0.5) {
            (first, second)
        } else {
            (second, first)
        };

        let mut child = Vec::with_capacity(self.target.len());
        child.extend_from_slice(&head[..split]);
        child.extend_from_slice(&tail[split..]);
        Ok(child)
    }

    fn mutate<R: Rng + ?Sized>(&self, genome: &Vec<u8>, rng: &mut R) -> Result<Vec<u8>, PhraseError> {
        self.check_length(genome)?;

        let mut mutated = genome.clone();
        let index = rng.gen_range(0..mutated.len());
        mutated[index] = self.random_symbol(rng);
        Ok(mutated)
    }
}

/// Run file for the phrase CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhraseConfig {
    /// Phrase to evolve toward.
    #[serde(default = "default_target")]
    pub target: String,
    /// Alphabet random symbols are drawn from.
    #[serde(default = "default_alphabet")]
    pub alphabet: String,
    #[serde(default)]
    pub evolution: EvolutionConfig,
}

fn default_target() -> String {
    "Hello World".to_string()
}

fn default_alphabet() -> String {
    String::from_utf8_lossy(DEFAULT_ALPHABET).into_owned()
}

impl Default for PhraseConfig {
    fn default() -> Self {
        Self {
            target: default_target(),
            alphabet: default_alphabet(),
            evolution: EvolutionConfig::default(),
        }
    }
}

impl PhraseConfig {
    /// Build the domain described by this run file.
    pub fn domain(&self) -> Result<PhraseDomain, PhraseError> {
        PhraseDomain::with_alphabet(&self.target, &self.alphabet)
    }
}
