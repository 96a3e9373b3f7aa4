//! 进度增量来源

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 每次刷新时的进度增量
pub trait ProgressSource: Send {
    /// 返回本次增量（百分点）
    fn next_increment(&mut self) -> f64;
}

/// 在 `[0, max)` 内均匀随机取值
#[derive(Debug, Clone)]
pub struct RandomIncrement {
    rng: StdRng,
    max: f64,
}

impl RandomIncrement {
    pub fn new(max: f64) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            max,
        }
    }

    /// 固定种子，结果可复现
    pub fn seeded(seed: u64, max: f64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            max,
        }
    }
}

impl ProgressSource for RandomIncrement {
    fn next_increment(&mut self) -> f64 {
        if !self.max.is_finite() || self.max <= 0.0 {
            return 0.0;
        }
        self.rng.gen_range(0.0..self.max)
    }
}

/// 固定增量
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedIncrement(pub f64);

impl ProgressSource for FixedIncrement {
    fn next_increment(&mut self) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_increment_range() {
        let mut source = RandomIncrement::seeded(7, 10.0);
        for _ in 0..1000 {
            let inc = source.next_increment();
            assert!((0.0..10.0).contains(&inc), "increment {}", inc);
        }
    }

    #[test]
    fn test_random_increment_seeded_is_reproducible() {
        let mut a = RandomIncrement::seeded(42, 10.0);
        let mut b = RandomIncrement::seeded(42, 10.0);
        for _ in 0..16 {
            assert_eq!(a.next_increment(), b.next_increment());
        }
    }

    #[test]
    fn test_non_positive_max_yields_zero() {
        assert_eq!(RandomIncrement::seeded(1, 0.0).next_increment(), 0.0);
        assert_eq!(RandomIncrement::seeded(1, -3.0).next_increment(), 0.0);
    }
}
