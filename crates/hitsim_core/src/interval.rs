//! Gap intervals between successive hit positions.

/// Converts ascending hit positions into consumption gaps.
///
/// The first gap is the first position itself (counted from zero); every
/// later gap is the difference from the previous position. Output length
/// always equals input length. Gaps saturate at the `i64` bounds; the
/// normalizer rejects plans that would reach them.
pub fn intervals(positions: &[i64]) -> Vec<i64> {
    let mut out = Vec::with_capacity(positions.len());
    let mut previous = 0;
    for &position in positions {
        out.push(position.saturating_sub(previous));
        previous = position;
    }
    out
}

/// Skip consumption owed before a hit that follows a gap of `interval`.
/// Zero or negative means nothing is drawn.
pub fn skip_amount(interval: i64) -> i64 {
    interval.saturating_sub(1).saturating_mul(crate::HIT_COST)
}
