use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Decides how many characters the next reveal tick exposes
pub trait ChunkStrategy: Send {
    /// Characters to reveal next, in `1..=remaining` (0 only when nothing remains)
    fn next_chunk(&mut self, remaining: usize) -> usize;

    /// Independent strategy for one reveal; seeded strategies stay reproducible
    /// across consecutive reveals.
    fn fork(&mut self) -> Box<dyn ChunkStrategy>;
}

/// Uniform chunk sizes in `min..=max`
#[derive(Debug, Clone)]
pub struct RandomChunks {
    min: usize,
    max: usize,
    rng: StdRng,
}

impl RandomChunks {
    /// A zero `min` is raised to 1 and `max` is raised to `min`.
    pub fn new(min: usize, max: usize, seed: Option<u64>) -> Self {
        let min = min.max(1);
        let max = max.max(min);
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { min, max, rng }
    }

    /// 1 to 4 characters per tick
    pub fn typing(seed: Option<u64>) -> Self {
        Self::new(1, 4, seed)
    }
}

impl ChunkStrategy for RandomChunks {
    fn next_chunk(&mut self, remaining: usize) -> usize {
        if remaining == 0 {
            return 0;
        }
        self.rng.gen_range(self.min..=self.max).min(remaining)
    }

    fn fork(&mut self) -> Box<dyn ChunkStrategy> {
        let seed = self.rng.next_u64();
        Box::new(Self { min: self.min, max: self.max, rng: StdRng::seed_from_u64(seed) })
    }
}

/// Always the same chunk size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedChunks(pub usize);

impl ChunkStrategy for FixedChunks {
    fn next_chunk(&mut self, remaining: usize) -> usize {
        self.0.max(1).min(remaining)
    }

    fn fork(&mut self) -> Box<dyn ChunkStrategy> {
        Box::new(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_chunks_stay_in_bounds() {
        let mut chunks = RandomChunks::typing(Some(7));
        for _ in 0..500 {
            let n = chunks.next_chunk(100);
            assert!((1..=4).contains(&n));
        }
    }

    #[test]
    fn test_random_chunks_clip_to_remaining() {
        let mut chunks = RandomChunks::new(3, 3, Some(1));
        assert_eq!(chunks.next_chunk(2), 2);
        assert_eq!(chunks.next_chunk(0), 0);
    }

    #[test]
    fn test_seeded_chunks_are_reproducible() {
        let sample = |seed| {
            let mut chunks = RandomChunks::typing(Some(seed));
            (0..32).map(|_| chunks.next_chunk(usize::MAX)).collect::<Vec<_>>()
        };
        assert_eq!(sample(42), sample(42));

        let mut a = RandomChunks::typing(Some(9));
        let mut b = RandomChunks::typing(Some(9));
        let mut fa = a.fork();
        let mut fb = b.fork();
        let xs: Vec<usize> = (0..16).map(|_| fa.next_chunk(10)).collect();
        let ys: Vec<usize> = (0..16).map(|_| fb.next_chunk(10)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_degenerate_range_is_normalized() {
        let mut chunks = RandomChunks::new(0, 0, Some(3));
        assert_eq!(chunks.next_chunk(10), 1);

        let mut chunks = RandomChunks::new(5, 2, Some(3));
        assert_eq!(chunks.next_chunk(10), 5);
    }

    #[test]
    fn test_fixed_chunks() {
        let mut chunks = FixedChunks(3);
        assert_eq!(chunks.next_chunk(10), 3);
        assert_eq!(chunks.next_chunk(2), 2);
        assert_eq!(FixedChunks(0).next_chunk(5), 1);
        assert_eq!(chunks.fork().next_chunk(10), 3);
    }
}
