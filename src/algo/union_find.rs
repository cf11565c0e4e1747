//! Disjoint-set forest with union by rank and path halving.

/// A disjoint-set forest over `0..len`.
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
    sets: usize,
}

impl DisjointSet {
    /// Create `len` singleton sets.
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
            sets: len,
        }
    }

    /// Number of disjoint sets.
    pub fn set_count(&self) -> usize {
        self.sets
    }

    /// Representative of the set containing `x`.
    pub fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            let grandparent = self.parent[self.parent[x]];
            self.parent[x] = grandparent;
            x = grandparent;
        }
        x
    }

    /// Merge the sets containing `a` and `b`. Returns `false` if they were already merged.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }

        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        self.sets -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singletons() {
        let mut ds = DisjointSet::new(4);
        assert_eq!(ds.set_count(), 4);
        assert_eq!(ds.find(3), 3);
    }

    #[test]
    fn test_union_merges_once() {
        let mut ds = DisjointSet::new(5);
        assert!(ds.union(0, 1));
        assert!(ds.union(3, 4));
        assert!(ds.union(1, 4));
        assert!(!ds.union(0, 3));
        assert_eq!(ds.set_count(), 2);
        assert_eq!(ds.find(0), ds.find(4));
        assert_ne!(ds.find(0), ds.find(2));
    }

    #[test]
    fn test_long_chain() {
        let n = 10_000;
        let mut ds = DisjointSet::new(n);
        for i in 1..n {
            ds.union(i - 1, i);
        }
        assert_eq!(ds.set_count(), 1);
        let root = ds.find(0);
        assert!((0..n).all(|i| ds.find(i) == root));
    }

    #[test]
    fn test_empty() {
        let ds = DisjointSet::new(0);
        assert_eq!(ds.set_count(), 0);
    }
}
