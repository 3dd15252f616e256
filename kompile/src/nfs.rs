//! Sets of argument positions known to be in normal form.

use crate::Arity;
use core::fmt;

/// Largest arity for which argument positions can be tracked.
pub const MAX_ARITY: Arity = 64;

/// Fixed-size boolean vector over argument positions.
///
/// Bit `i` is set if argument `i` is known to be in normal form
/// (or, in a strategy, has been forced to normal form).
///
/// ~~~
/// # use kompile::Nfs;
/// let nfs = Nfs::empty().with(0).with(2);
/// assert!(nfs.get(0) && !nfs.get(1) && nfs.get(2));
/// assert!(Nfs::empty().with(2).is_subset(nfs));
/// assert_eq!(nfs.iter().collect::<Vec<_>>(), vec![0, 2]);
/// assert_eq!(nfs.to_string(), "{0, 2}");
/// ~~~
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Nfs(u64);

impl Nfs {
    pub fn empty() -> Self {
        Self(0)
    }

    /// All positions below the given arity.
    pub fn full(arity: Arity) -> Self {
        assert!(arity <= MAX_ARITY);
        match arity {
            MAX_ARITY => Self(u64::MAX),
            _ => Self((1 << arity) - 1),
        }
    }

    pub fn get(self, i: usize) -> bool {
        i < MAX_ARITY && self.0 & (1 << i) != 0
    }

    pub fn set(&mut self, i: usize) {
        assert!(i < MAX_ARITY);
        self.0 |= 1 << i
    }

    pub fn with(mut self, i: usize) -> Self {
        self.set(i);
        self
    }

    pub fn intersect(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    pub fn is_subset(self, other: Self) -> bool {
        self.0 & !other.0 == 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Positions contained in the set, in ascending order.
    pub fn iter(self) -> impl Iterator<Item = usize> {
        (0..MAX_ARITY).filter(move |i| self.get(*i))
    }
}

impl fmt::Display for Nfs {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;
        let mut iter = self.iter().peekable();
        while let Some(i) = iter.next() {
            write!(f, "{}", i)?;
            iter.peek().iter().try_for_each(|_| write!(f, ", "))?;
        }
        write!(f, "}}")
    }
}

#[test]
fn full() {
    assert_eq!(Nfs::full(0), Nfs::empty());
    assert_eq!(Nfs::full(3), Nfs::empty().with(0).with(1).with(2));
    assert_eq!(Nfs::full(MAX_ARITY).len(), MAX_ARITY);
    assert!(!Nfs::full(3).get(MAX_ARITY));
}
