use std::cmp::{Ordering, Reverse};

use ordered_float::OrderedFloat;

/// Heaviest first. `NaN` weights sort after every number so the order stays
/// total.
#[must_use]
pub fn weight_descending(a: f64, b: f64) -> Ordering {
    (a.is_nan(), Reverse(OrderedFloat(a))).cmp(&(b.is_nan(), Reverse(OrderedFloat(b))))
}

/// Lightest first, `NaN` last.
#[must_use]
pub fn weight_ascending(a: f64, b: f64) -> Ordering {
    (a.is_nan(), OrderedFloat(a)).cmp(&(b.is_nan(), OrderedFloat(b)))
}

/// Largest non-`NaN` value, if any.
#[must_use]
pub fn max_weight(weights: impl IntoIterator<Item = f64>) -> Option<f64> {
    weights
        .into_iter()
        .filter(|weight| !weight.is_nan())
        .map(OrderedFloat)
        .max()
        .map(OrderedFloat::into_inner)
}
