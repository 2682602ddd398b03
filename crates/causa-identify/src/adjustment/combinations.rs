//! Size-ordered subset enumeration with superset pruning.

use std::collections::BTreeSet;

use causa_core::VarId;

/// All `k`-subsets of `0..n` as ascending index vectors, in lexicographic order.
#[derive(Debug, Clone)]
pub struct Combinations {
    n: usize,
    next: Option<Vec<usize>>,
}

impl Combinations {
    pub fn new(n: usize, k: usize) -> Self {
        let next = (k <= n).then(|| (0..k).collect());
        Self { n, next }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        let current = self.next.take()?;
        let k = current.len();
        let mut succ = current.clone();
        // Rightmost position that can still move right.
        if let Some(i) = (0..k).rev().find(|i| succ[*i] < self.n - k + i) {
            succ[i] += 1;
            for j in i + 1..k {
                succ[j] = succ[j - 1] + 1;
            }
            self.next = Some(succ);
        }
        Some(current)
    }
}

/// Walks the subsets of a candidate pool by increasing size, skipping every
/// superset of a subset already accepted.
#[derive(Debug, Clone)]
pub struct SubsetSearch {
    pool: Vec<VarId>,
    max_size: usize,
    size: usize,
    combinations: Combinations,
    accepted: Vec<BTreeSet<VarId>>,
}

impl SubsetSearch {
    /// `pool` is searched in id order; sets never exceed `max_size` members.
    pub fn new(pool: BTreeSet<VarId>, min_size: usize, max_size: Option<usize>) -> Self {
        let pool: Vec<VarId> = pool.into_iter().collect();
        let max_size = max_size.map_or(pool.len(), |m| m.min(pool.len()));
        Self {
            combinations: Combinations::new(pool.len(), min_size),
            size: min_size,
            pool,
            max_size,
            accepted: Vec::new(),
        }
    }

    pub fn pool(&self) -> &[VarId] {
        &self.pool
    }

    /// The next subset that contains no accepted subset.
    pub fn next_candidate(&mut self) -> Option<BTreeSet<VarId>> {
        loop {
            if self.size > self.max_size {
                return None;
            }
            match self.combinations.next() {
                Some(indices) => {
                    let candidate: BTreeSet<VarId> = indices.iter().map(|i| self.pool[*i]).collect();
                    if !self.accepted.iter().any(|a| a.is_subset(&candidate)) {
                        return Some(candidate);
                    }
                }
                None => {
                    self.size += 1;
                    self.combinations = Combinations::new(self.pool.len(), self.size);
                }
            }
        }
    }

    /// Record `set` so its supersets are pruned from now on.
    pub fn accept(&mut self, set: BTreeSet<VarId>) {
        self.accepted.push(set);
    }

    pub fn restart(&mut self, min_size: usize) {
        self.size = min_size;
        self.combinations = Combinations::new(self.pool.len(), min_size);
        self.accepted.clear();
    }
}
