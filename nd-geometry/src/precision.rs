use super::*;

/// Returns true if `norm(left - right)` is strictly below `precision`, or below the space's
/// default precision when `precision` is `None`.
pub fn equals_vector<V, S>(space: &S, left: &V, right: &V, precision: Option<S::Distance>) -> bool
where
    S: GeometrySpace<V>,
{
    let precision = precision.unwrap_or_else(|| space.default_precision());
    space.norm(&space.difference(left, right)) < precision
}

/// Returns true if both endpoints of the segments are equal within `precision`.
pub fn equals_line<V, S>(
    space: &S,
    left: &LineSegment<V>,
    right: &LineSegment<V>,
    precision: Option<S::Distance>,
) -> bool
where
    S: GeometrySpace<V>,
{
    equals_vector(space, &left.begin, &right.begin, precision)
        && equals_vector(space, &left.end, &right.end, precision)
}
