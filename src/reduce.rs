//! Visitors that fold a map's entries into a summary.
//!
//! These are meant to be driven by [`AvlMap::try_traverse`](crate::AvlMap::try_traverse),
//! which stops at the first error a visitor reports.

use alloc::string::String;

use num_traits::{CheckedAdd, Zero};

use crate::Error;

/// Sums the keys of the visited entries and joins their values with single spaces.
///
/// The sum uses checked arithmetic. A key that would overflow it is rejected with
/// [`Error::ArithmeticOverflow`] and neither the sum nor the joined values change.
///
/// # Examples
///
/// ```
/// use avl_dict::{AvlMap, Error, TraversalOrder};
/// use avl_dict::reduce::KeyValueSum;
///
/// let map = AvlMap::from([(100u8, "x"), (200, "y")]);
///
/// let mut sum = KeyValueSum::new();
/// let result = map.try_traverse(TraversalOrder::Ascending, |k, v| sum.visit(k, v));
/// assert_eq!(result.err(), Some(Error::ArithmeticOverflow));
/// assert_eq!(sum.key_sum(), &100);
/// assert_eq!(sum.values(), "x");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyValueSum<T> {
    key_sum: T,
    values: String,
}

impl<T: Zero> KeyValueSum<T> {
    /// Creates a reducer with a zero sum and no values.
    #[must_use]
    pub fn new() -> Self {
        KeyValueSum {
            key_sum: T::zero(),
            values: String::new(),
        }
    }
}

impl<T: Zero> Default for KeyValueSum<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: CheckedAdd> KeyValueSum<T> {
    /// Adds `key` to the sum and appends `value` to the joined values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArithmeticOverflow`] if the sum would overflow. The reducer is
    /// left as it was before the call.
    pub fn visit<S>(&mut self, key: &T, value: &S) -> Result<(), Error>
    where
        S: AsRef<str> + ?Sized,
    {
        let Some(sum) = self.key_sum.checked_add(key) else {
            log::debug!("key sum overflowed after {} bytes of values", self.values.len());
            return Err(Error::ArithmeticOverflow);
        };
        self.key_sum = sum;
        if !self.values.is_empty() {
            self.values.push(' ');
        }
        self.values.push_str(value.as_ref());
        Ok(())
    }
}

impl<T> KeyValueSum<T> {
    /// The sum of the keys visited so far.
    #[must_use]
    pub const fn key_sum(&self) -> &T {
        &self.key_sum
    }

    /// The values visited so far, separated by single spaces.
    #[must_use]
    pub fn values(&self) -> &str {
        &self.values
    }

    /// Returns the sum and the joined values.
    #[must_use]
    pub fn into_parts(self) -> (T, String) {
        (self.key_sum, self.values)
    }
}
