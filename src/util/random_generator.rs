use rand::{SeedableRng, RngCore};
use rand_chacha::ChaCha20Rng;
use crate::util::basic::HE_PRNG_SEED_BYTES;

#[derive(Copy, Clone, PartialEq, Eq)]
pub struct PRNGSeed(pub [u8; HE_PRNG_SEED_BYTES]);

impl Default for PRNGSeed {
    fn default() -> Self {
        PRNGSeed([0; HE_PRNG_SEED_BYTES])
    }
}

impl std::fmt::Debug for PRNGSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PRNGSeed(..)")
    }
}

impl AsMut<[u8]> for PRNGSeed {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

impl AsRef<[u8]> for PRNGSeed {
    fn as_ref(self: &PRNGSeed) -> &[u8] {&self.0}
}

impl PRNGSeed {
    /// A fresh seed drawn from the operating system.
    pub fn random() -> Self {
        let mut seed = [0; HE_PRNG_SEED_BYTES];
        ChaCha20Rng::from_entropy().fill_bytes(&mut seed);
        PRNGSeed(seed)
    }
}

pub struct BlakeRNGFactory {
    use_random_seed: bool,
    seed: PRNGSeed,
}

impl Default for BlakeRNGFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl BlakeRNGFactory {
    pub fn new() -> Self {
        Self {
            use_random_seed: true,
            seed: PRNGSeed::default(),
        }
    }

    pub fn from_seed(seed: PRNGSeed) -> Self {
        Self {
            use_random_seed: false,
            seed,
        }
    }

    pub fn get_rng(&self) -> BlakeRNG {
        if self.use_random_seed {
            BlakeRNG::from_seed(PRNGSeed::random())
        } else {
            BlakeRNG::from_seed(self.seed)
        }
    }
}

const BUFFER_SIZE: usize = 4096;

pub struct BlakeRNG {
    buffer: [u8; BUFFER_SIZE],
    seed: PRNGSeed,
    counter: u64,
    buffer_current: usize,
}

impl SeedableRng for BlakeRNG {
    type Seed = PRNGSeed;

    fn from_seed(seed: Self::Seed) -> Self {
        Self {
            seed,
            counter: 0,
            buffer: [0; BUFFER_SIZE],
            buffer_current: BUFFER_SIZE,
        }
    }

}

impl BlakeRNG {

    fn refill_buffer(&mut self) {
        let mut hash = blake3::Hasher::new();
        hash.update(self.seed.as_ref());
        hash.update(&self.counter.to_le_bytes());
        hash.finalize_xof().fill(&mut self.buffer);
        self.buffer_current = 0;
        self.counter = self.counter.wrapping_add(1);
    }

    fn take<const N: usize>(&mut self) -> [u8; N] {
        if self.buffer_current + N > BUFFER_SIZE {
            self.refill_buffer();
        }
        let mut bytes = [0; N];
        bytes.copy_from_slice(&self.buffer[self.buffer_current..self.buffer_current + N]);
        self.buffer_current += N;
        bytes
    }

}

impl RngCore for BlakeRNG {

    fn next_u32(&mut self) -> u32 {
        u32::from_le_bytes(self.take::<4>())
    }

    fn next_u64(&mut self) -> u64 {
        u64::from_le_bytes(self.take::<8>())
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut i = 0;
        while i < dest.len() {
            if self.buffer_current >= BUFFER_SIZE {
                self.refill_buffer();
            }
            let len = std::cmp::min(dest.len() - i, BUFFER_SIZE - self.buffer_current);
            dest[i..i+len].copy_from_slice(&self.buffer[self.buffer_current..self.buffer_current+len]);
            i += len;
            self.buffer_current += len;
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blake_rng() {
        let mut rng = BlakeRNG::from_seed(PRNGSeed([1; 64]));
        let mut rng2 = BlakeRNG::from_seed(PRNGSeed([1; 64]));
        for _ in 0..1000 {
            assert_eq!(rng.next_u32(), rng2.next_u32());
            assert_eq!(rng.next_u64(), rng2.next_u64());
        }
    }

    #[test]
    fn test_blake_rng_factory() {
        let factory = BlakeRNGFactory::from_seed(PRNGSeed([1; 64]));
        let mut rng = factory.get_rng();
        let mut rng2 = factory.get_rng();
        let mut a = [0u8; 5000];
        let mut b = [0u8; 5000];
        rng.fill_bytes(&mut a);
        rng2.fill_bytes(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_blake_rng_factory_randomized() {
        let factory = BlakeRNGFactory::new();
        let mut rng = factory.get_rng();
        let mut rng2 = factory.get_rng();
        let a: Vec<u64> = (0..4).map(|_| rng.next_u64()).collect();
        let b: Vec<u64> = (0..4).map(|_| rng2.next_u64()).collect();
        assert_ne!(a, b);
    }

}
