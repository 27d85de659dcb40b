//! Overwrite pattern policy and per-pass byte sources.
//!
//! [`patterns_for`] decides *which* pattern each pass uses; [`PatternSource`]
//! produces the actual bytes for one pass. Random passes draw from a
//! ChaCha-based CSPRNG seeded by the operating system, with a fresh seed per
//! pass, so no two passes (or files) ever share a stream.

use crate::PassCount;
use crate::Result;
use crate::ShredError;
use rand::RngCore;
use rand::SeedableRng;
use rand::TryRngCore;
use rand::rngs::OsRng;
use rand::rngs::StdRng;
use std::fmt;
use std::io;
use zeroize::Zeroizing;

/// Pattern written by a single pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// Every byte `0x00`.
    Zeros,
    /// Every byte `0xFF`.
    Ones,
    /// Fresh cryptographically secure random bytes.
    Random,
    /// Bitwise complement of whatever the previous pass wrote.
    Complement,
}

impl Pattern {
    /// Returns `true` for the fixed-byte patterns.
    #[must_use]
    pub const fn is_constant(self) -> bool {
        matches!(self, Self::Zeros | Self::Ones)
    }

    /// Short name used in logs and reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Zeros => "zeros",
            Self::Ones => "ones",
            Self::Random => "random",
            Self::Complement => "complement",
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered list of patterns, one per pass.
///
/// # Examples
///
/// ```
/// use wipeout_core::PassCount;
/// use wipeout_core::pattern::Pattern;
/// use wipeout_core::pattern::patterns_for;
///
/// let spec = patterns_for(PassCount::new(4)?);
/// assert_eq!(
///     spec.patterns(),
///     &[Pattern::Random, Pattern::Zeros, Pattern::Ones, Pattern::Random]
/// );
/// # Ok::<(), wipeout_core::ShredError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassSpec {
    patterns: Vec<Pattern>,
}

impl PassSpec {
    /// Builds a custom pass sequence.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPassSpec` if the sequence is empty or starts with
    /// [`Pattern::Complement`], which has no previous pass to invert.
    pub fn from_patterns(patterns: Vec<Pattern>) -> Result<Self> {
        match patterns.first() {
            None => Err(ShredError::InvalidPassSpec {
                reason: "at least one pass is required".into(),
            }),
            Some(Pattern::Complement) => Err(ShredError::InvalidPassSpec {
                reason: "the first pass cannot be a complement".into(),
            }),
            Some(_) => Ok(Self { patterns }),
        }
    }

    /// The patterns in pass order.
    #[must_use]
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Number of passes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Always `false`: a spec has at least one pass.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Iterates over the patterns in pass order.
    pub fn iter(&self) -> impl Iterator<Item = Pattern> + '_ {
        self.patterns.iter().copied()
    }

    /// Returns `true` if at least one pass writes non-constant data.
    #[must_use]
    pub fn has_random_pass(&self) -> bool {
        self.patterns.contains(&Pattern::Random)
    }
}

/// Pattern used by pass `index` (0-based) of a `passes`-pass sequence.
///
/// The first and last passes are random; the passes between alternate
/// zeros and ones, starting with zeros. An out-of-range index is treated as
/// the final pass.
#[must_use]
pub fn pattern_at(passes: PassCount, index: usize) -> Pattern {
    let last = passes.get() - 1;
    if index == 0 || index >= last {
        Pattern::Random
    } else if index % 2 == 1 {
        Pattern::Zeros
    } else {
        Pattern::Ones
    }
}

/// Builds the pass sequence for `passes` passes.
#[must_use]
pub fn patterns_for(passes: PassCount) -> PassSpec {
    PassSpec {
        patterns: (0..passes.get()).map(|i| pattern_at(passes, i)).collect(),
    }
}

type Seed = <StdRng as SeedableRng>::Seed;

enum SourceKind {
    Fixed(u8),
    Stream {
        rng: StdRng,
        seed: Zeroizing<Seed>,
        invert: bool,
    },
}

/// Byte producer for one pass.
///
/// A random source keeps its seed (wiped on drop) so that a following
/// [`Pattern::Complement`] pass can regenerate and invert the exact stream.
/// Regeneration is byte-exact only when both passes fill buffers of the same
/// sizes in the same order, which the engine guarantees by using one chunk
/// size per file.
pub struct PatternSource {
    kind: SourceKind,
}

impl PatternSource {
    /// Creates the source for a pass.
    ///
    /// # Errors
    ///
    /// Fails if the operating system cannot supply randomness, or if a
    /// complement pass has no previous pass.
    pub fn for_pass(pattern: Pattern, previous: Option<&Self>) -> io::Result<Self> {
        let kind = match pattern {
            Pattern::Zeros => SourceKind::Fixed(0x00),
            Pattern::Ones => SourceKind::Fixed(0xFF),
            Pattern::Random => {
                let mut seed = Zeroizing::new(Seed::default());
                OsRng.try_fill_bytes(&mut *seed).map_err(io::Error::other)?;
                SourceKind::Stream {
                    rng: StdRng::from_seed(*seed),
                    seed,
                    invert: false,
                }
            }
            Pattern::Complement => match previous.map(|p| &p.kind) {
                Some(SourceKind::Fixed(byte)) => SourceKind::Fixed(!byte),
                Some(SourceKind::Stream { seed, invert, .. }) => SourceKind::Stream {
                    rng: StdRng::from_seed(**seed),
                    seed: seed.clone(),
                    invert: !invert,
                },
                None => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        "complement pass without a previous pass",
                    ));
                }
            },
        };
        Ok(Self { kind })
    }

    /// Fills `buf` with the next bytes of this pass.
    pub fn fill(&mut self, buf: &mut [u8]) {
        match &mut self.kind {
            SourceKind::Fixed(byte) => buf.fill(*byte),
            SourceKind::Stream { rng, invert, .. } => {
                rng.fill_bytes(buf);
                if *invert {
                    for byte in buf.iter_mut() {
                        *byte = !*byte;
                    }
                }
            }
        }
    }
}

impl fmt::Debug for PatternSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            SourceKind::Fixed(_) => "fixed",
            SourceKind::Stream { invert: false, .. } => "random",
            SourceKind::Stream { invert: true, .. } => "inverted-random",
        };
        f.debug_struct("PatternSource").field("kind", &kind).finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn passes(n: usize) -> PassCount {
        PassCount::new(n).unwrap()
    }

    #[test]
    fn test_single_pass_is_random() {
        assert_eq!(patterns_for(passes(1)).patterns(), &[Pattern::Random]);
    }

    #[test]
    fn test_two_passes_are_random() {
        assert_eq!(
            patterns_for(passes(2)).patterns(),
            &[Pattern::Random, Pattern::Random]
        );
    }

    #[test]
    fn test_standard_policy() {
        use Pattern::{Ones, Random, Zeros};
        assert_eq!(
            patterns_for(PassCount::STANDARD).patterns(),
            &[Random, Zeros, Ones, Zeros, Ones, Zeros, Random]
        );
    }

    #[test]
    fn test_paranoid_policy_shape() {
        let spec = patterns_for(PassCount::PARANOID);
        assert_eq!(spec.len(), 35);
        assert_eq!(spec.patterns()[0], Pattern::Random);
        assert_eq!(spec.patterns()[34], Pattern::Random);
        assert!(spec.patterns()[1..34].iter().all(|p| p.is_constant()));
    }

    #[test]
    fn test_pattern_at_matches_patterns_for() {
        let count = passes(9);
        let spec = patterns_for(count);
        for (i, pattern) in spec.iter().enumerate() {
            assert_eq!(pattern_at(count, i), pattern);
        }
        assert_eq!(pattern_at(count, 100), Pattern::Random);
    }

    #[test]
    fn test_custom_spec_validation() {
        assert!(PassSpec::from_patterns(vec![]).is_err());
        assert!(PassSpec::from_patterns(vec![Pattern::Complement]).is_err());

        let spec = PassSpec::from_patterns(vec![Pattern::Ones, Pattern::Complement]).unwrap();
        assert_eq!(spec.len(), 2);
        assert!(!spec.has_random_pass());
    }

    #[test]
    fn test_fixed_sources() {
        let mut buf = [0xAAu8; 16];
        PatternSource::for_pass(Pattern::Zeros, None)
            .unwrap()
            .fill(&mut buf);
        assert!(buf.iter().all(|&b| b == 0x00));

        let mut ones = PatternSource::for_pass(Pattern::Ones, None).unwrap();
        ones.fill(&mut buf);
        assert!(buf.iter().all(|&b| b == 0xFF));

        let mut complement = PatternSource::for_pass(Pattern::Complement, Some(&ones)).unwrap();
        complement.fill(&mut buf);
        assert!(buf.iter().all(|&b| b == 0x00));
    }

    #[test]
    fn test_random_sources_differ() {
        let mut a = [0u8; 4096];
        let mut b = [0u8; 4096];
        PatternSource::for_pass(Pattern::Random, None)
            .unwrap()
            .fill(&mut a);
        PatternSource::for_pass(Pattern::Random, None)
            .unwrap()
            .fill(&mut b);
        assert_ne!(a, b, "each random pass must use a fresh stream");
    }

    #[test]
    fn test_complement_of_random_inverts_stream() {
        let mut random = PatternSource::for_pass(Pattern::Random, None).unwrap();
        let mut complement =
            PatternSource::for_pass(Pattern::Complement, Some(&random)).unwrap();

        let mut first = vec![0u8; 3000];
        let mut second = vec![0u8; 3000];
        for (a, b) in first.chunks_mut(1000).zip(second.chunks_mut(1000)) {
            random.fill(a);
            complement.fill(b);
        }

        assert!(first.iter().zip(&second).all(|(a, b)| *a == !*b));
    }

    #[test]
    fn test_complement_without_previous_fails() {
        let err = PatternSource::for_pass(Pattern::Complement, None).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_debug_does_not_expose_seed() {
        let source = PatternSource::for_pass(Pattern::Random, None).unwrap();
        let debug = format!("{source:?}");
        assert_eq!(debug, "PatternSource { kind: \"random\" }");
    }
}
