/// Every ordering of `0..n`, in lexicographic order.
///
/// `n == 0` yields a single empty ordering.
#[derive(Debug, Clone)]
pub struct Permutations {
    next: Option<Vec<usize>>,
}

impl Permutations {
    pub fn new(n: usize) -> Self {
        Self {
            next: Some((0..n).collect()),
        }
    }

    /// Number of orderings of `n` items, or `None` on overflow.
    pub fn count_for(n: usize) -> Option<usize> {
        (1..=n).try_fold(1usize, |acc, k| acc.checked_mul(k))
    }
}

impl Iterator for Permutations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        let current = self.next.take()?;
        let mut following = current.clone();
        if advance(&mut following) {
            self.next = Some(following);
        }
        Some(current)
    }
}

/// Rearrange `v` into its lexicographic successor. Returns `false` when `v`
/// is already the last ordering.
fn advance(v: &mut [usize]) -> bool {
    if v.len() < 2 {
        return false;
    }
    let mut i = v.len() - 1;
    while i > 0 && v[i - 1] >= v[i] {
        i -= 1;
    }
    if i == 0 {
        return false;
    }
    let mut j = v.len() - 1;
    while v[j] <= v[i - 1] {
        j -= 1;
    }
    v.swap(i - 1, j);
    v[i..].reverse();
    true
}
