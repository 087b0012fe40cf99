//! Scripted random source for pinning exact probability branches in tests

use rand::RngCore;

/// Replays a fixed list of uniform `f32` samples, cycling when exhausted
pub struct ScriptedRng {
    samples: Vec<f32>,
    next: usize,
    pub draws: usize,
}

impl ScriptedRng {
    pub fn new(samples: &[f32]) -> Self {
        assert!(!samples.is_empty());
        Self {
            samples: samples.to_vec(),
            next: 0,
            draws: 0,
        }
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        let sample = self.samples[self.next % self.samples.len()];
        self.next += 1;
        self.draws += 1;
        // `random::<f32>()` takes the top 24 bits of a u32
        ((sample.clamp(0.0, 0.999_999) * (1u32 << 24) as f32) as u32) << 8
    }

    fn next_u64(&mut self) -> u64 {
        u64::from(self.next_u32()) << 32
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let value = self.next_u32().to_le_bytes();
        for (idx, byte) in dest.iter_mut().enumerate() {
            *byte = value[idx % value.len()];
        }
    }
}
