use core::fmt;
use core::str::FromStr;

use crate::Error;

/// The order in which a traversal visits the entries of a map.
///
/// The order is chosen per traversal, not per map: the same map can be walked in any
/// order, any number of times.
///
/// # Examples
///
/// ```
/// use avl_dict::{AvlMap, TraversalOrder};
///
/// let map = AvlMap::from([(2, "b"), (1, "a"), (3, "c")]);
///
/// let keys: Vec<_> = map.iter_in(TraversalOrder::Descending).map(|(k, _)| *k).collect();
/// assert_eq!(keys, [3, 2, 1]);
///
/// let order: TraversalOrder = "breadth".parse().unwrap();
/// let keys: Vec<_> = map.iter_in(order).map(|(k, _)| *k).collect();
/// assert_eq!(keys, [2, 1, 3]);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(rename_all = "lowercase"))]
pub enum TraversalOrder {
    /// In-order: left subtree, node, right subtree. Keys ascend.
    #[default]
    Ascending,
    /// Reverse in-order: right subtree, node, left subtree. Keys descend.
    Descending,
    /// Level order, top to bottom and left to right within a level.
    Breadth,
}

impl TraversalOrder {
    /// All orders, in declaration order.
    pub const ALL: [TraversalOrder; 3] = [TraversalOrder::Ascending, TraversalOrder::Descending, TraversalOrder::Breadth];

    /// Returns the lowercase name accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TraversalOrder::Ascending => "ascending",
            TraversalOrder::Descending => "descending",
            TraversalOrder::Breadth => "breadth",
        }
    }

    /// Returns `true` for the orders that follow key order and can therefore move both ways.
    #[must_use]
    pub const fn is_sorted(self) -> bool {
        !matches!(self, TraversalOrder::Breadth)
    }
}

impl fmt::Display for TraversalOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TraversalOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ascending" => Ok(TraversalOrder::Ascending),
            "descending" => Ok(TraversalOrder::Descending),
            "breadth" => Ok(TraversalOrder::Breadth),
            _ => Err(Error::UnknownTraversalOrder),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn parse_round_trip() {
        for order in TraversalOrder::ALL {
            assert_eq!(order.to_string().parse::<TraversalOrder>(), Ok(order));
        }
    }

    #[test]
    fn parse_rejects_unknown_names() {
        assert_eq!("Ascending".parse::<TraversalOrder>(), Err(Error::UnknownTraversalOrder));
        assert_eq!("".parse::<TraversalOrder>(), Err(Error::UnknownTraversalOrder));
        assert_eq!("level".parse::<TraversalOrder>(), Err(Error::UnknownTraversalOrder));
    }
}
