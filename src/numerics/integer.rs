/// `a + b` with two's-complement wraparound on overflow.
#[inline]
pub fn add_scalars(a: i32, b: i32) -> i32 {
    a.wrapping_add(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    #[test]
    fn test_small_values() {
        assert_eq!(add_scalars(2, 3), 5);
        assert_eq!(add_scalars(-7, 7), 0);
        assert_eq!(add_scalars(0, 0), 0);
    }

    #[test]
    fn test_wraps_at_the_edges() {
        assert_eq!(add_scalars(i32::MAX, 1), i32::MIN);
        assert_eq!(add_scalars(2147483647, 1), -2147483648);
        assert_eq!(add_scalars(i32::MIN, -1), i32::MAX);
    }

    #[test]
    fn test_matches_widened_sum_truncated() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let a: i32 = rng.random();
            let b: i32 = rng.random();
            assert_eq!(add_scalars(a, b), (a as i64 + b as i64) as i32);
        }
    }
}
