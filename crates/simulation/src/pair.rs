//! Ordered pair helper used for two-ended topology elements.

/// Two values in a fixed order.
///
/// A pair whose elements are equal is "degenerate"; connections use that to
/// represent a dead end (the same subsection referenced on both sides).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pair<T> {
    pub first: T,
    pub second: T,
}

impl<T> Pair<T> {
    pub fn new(first: T, second: T) -> Self {
        Self { first, second }
    }

    pub fn reversed(self) -> Self {
        Self {
            first: self.second,
            second: self.first,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        [&self.first, &self.second].into_iter()
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Pair<U> {
        Pair {
            first: f(self.first),
            second: f(self.second),
        }
    }
}

impl<T: PartialEq> Pair<T> {
    pub fn contains(&self, value: &T) -> bool {
        self.first == *value || self.second == *value
    }

    /// The element opposite to `value`, or `None` if `value` is not in the pair.
    pub fn other(&self, value: &T) -> Option<&T> {
        if self.first == *value {
            Some(&self.second)
        } else if self.second == *value {
            Some(&self.first)
        } else {
            None
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.first == self.second
    }

    /// Whether both pairs hold the same two elements, in either order.
    pub fn same_ends(&self, other: &Pair<T>) -> bool {
        (self.first == other.first && self.second == other.second)
            || (self.first == other.second && self.second == other.first)
    }
}

impl<T: Copy> Pair<T> {
    pub fn both(value: T) -> Self {
        Self {
            first: value,
            second: value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_returns_opposite_end() {
        let pair = Pair::new(1, 2);
        assert_eq!(pair.other(&1), Some(&2));
        assert_eq!(pair.other(&2), Some(&1));
        assert_eq!(pair.other(&3), None);
    }

    #[test]
    fn test_degenerate_pair() {
        let dead_end = Pair::both(5);
        assert!(dead_end.is_degenerate());
        assert_eq!(dead_end.other(&5), Some(&5));
        assert!(!Pair::new(5, 6).is_degenerate());
    }

    #[test]
    fn test_same_ends_ignores_order() {
        assert!(Pair::new(1, 2).same_ends(&Pair::new(2, 1)));
        assert!(!Pair::new(1, 2).same_ends(&Pair::new(1, 3)));
    }

    #[test]
    fn test_reversed_and_map() {
        let pair = Pair::new(1, 2).reversed().map(|v| v * 10);
        assert_eq!(pair, Pair::new(20, 10));
        assert_eq!(pair.iter().copied().collect::<Vec<_>>(), vec![20, 10]);
    }
}
