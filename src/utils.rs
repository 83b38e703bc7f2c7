/// Number of unordered pairs among `n` items, `C(n, 2)`.
pub fn num_pairs(n: u32) -> u32 {
    n * n.saturating_sub(1) / 2
}

/// Index of the pair `(j, k)`, `j < k < n`, in nested-loop order.
///
/// ```text
/// for j in 0..n { for k in j+1..n { index += 1 } }
/// ```
///
/// For `n = 4` the pairs `(0,1) (0,2) (0,3) (1,2) (1,3) (2,3)` get indices `0..6`.
pub fn pair_index(j: u32, k: u32, n: u32) -> u32 {
    debug_assert!(j < k && k < n);
    // Pairs starting before `j`: (n-1) + (n-2) + ... + (n-j).
    j * (2 * n - j - 1) / 2 + (k - j - 1)
}

/// Binomial coefficient `C(n, k)`.
pub fn binomial(n: u64, k: u64) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}

/// Returns true if `x` is a power of two (zero is not).
pub fn is_power_of_two(x: u32) -> bool {
    x != 0 && x & (x - 1) == 0
}

/// Number of bits needed to tell `x` values apart, `⌈log₂ x⌉`.
pub fn ceil_log2(x: u32) -> u32 {
    if x <= 1 {
        0
    } else {
        32 - (x - 1).leading_zeros()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_num_pairs() {
        assert_eq!(num_pairs(0), 0);
        assert_eq!(num_pairs(1), 0);
        assert_eq!(num_pairs(2), 1);
        assert_eq!(num_pairs(4), 6);
        assert_eq!(num_pairs(16), 120);
    }

    #[test]
    fn test_pair_index_nested_order() {
        for n in 2..=16 {
            let mut expected = 0;
            for j in 0..n {
                for k in j + 1..n {
                    assert_eq!(pair_index(j, k, n), expected, "n={} j={} k={}", n, j, k);
                    expected += 1;
                }
            }
            assert_eq!(expected, num_pairs(n));
        }
    }

    #[test]
    fn test_binomial() {
        // n\k  0  1  2  3
        // ---------------
        // 3    1  3  3  1
        // 7    1  7 21 35
        assert_eq!(binomial(3, 0), 1);
        assert_eq!(binomial(3, 2), 3);
        assert_eq!(binomial(7, 3), 35);
        assert_eq!(binomial(15, 7), 6435);
        assert_eq!(binomial(2, 5), 0);
    }

    #[test]
    fn test_ceil_log2() {
        assert_eq!(ceil_log2(1), 0);
        assert_eq!(ceil_log2(2), 1);
        assert_eq!(ceil_log2(3), 2);
        assert_eq!(ceil_log2(4), 2);
        assert_eq!(ceil_log2(5), 3);
        assert_eq!(ceil_log2(16), 4);
        assert!(is_power_of_two(8));
        assert!(!is_power_of_two(6));
        assert!(!is_power_of_two(0));
    }
}
