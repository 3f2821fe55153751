//! Lexicographic k-subset enumeration

/// Iterator over every `k`-element subset of a slice, in lexicographic order
/// of positions.
///
/// `k == 0` yields a single empty subset; `k > pool.len()` yields nothing.
/// The iterator is finite and restartable by calling [`combinations`] again.
#[derive(Debug, Clone)]
pub struct Combinations<'a, T> {
    pool: &'a [T],
    indices: Vec<usize>,
    started: bool,
    exhausted: bool,
}

/// Enumerate the `k`-subsets of `pool`.
#[must_use]
pub fn combinations<T: Copy>(pool: &[T], k: usize) -> Combinations<'_, T> {
    Combinations {
        pool,
        indices: (0..k).collect(),
        started: false,
        exhausted: k > pool.len(),
    }
}

impl<T: Copy> Combinations<'_, T> {
    fn current(&self) -> Vec<T> {
        self.indices.iter().map(|&idx| self.pool[idx]).collect()
    }

    /// Step `indices` to the next position tuple; false when none is left.
    fn advance(&mut self) -> bool {
        let n = self.pool.len();
        let k = self.indices.len();

        // Rightmost slot that can still move right
        let Some(slot) = (0..k).rev().find(|&i| self.indices[i] < n - k + i) else {
            return false;
        };

        self.indices[slot] += 1;
        for i in slot + 1..k {
            self.indices[i] = self.indices[i - 1] + 1;
        }
        true
    }
}

impl<T: Copy> Iterator for Combinations<'_, T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        if self.started {
            if !self.advance() {
                self.exhausted = true;
                return None;
            }
        } else {
            self.started = true;
        }
        Some(self.current())
    }
}

/// Number of `k`-subsets of an `n`-set, saturating at `u128::MAX`.
#[must_use]
pub fn binomial(n: usize, k: usize) -> u128 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        // acc * (n - i) / (i + 1) stays integral at every step
        acc = match acc.checked_mul((n - i) as u128) {
            Some(v) => v / (i as u128 + 1),
            None => return u128::MAX,
        };
    }
    acc
}
