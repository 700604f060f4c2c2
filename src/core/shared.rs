pub trait ConfigType {
    fn default()-> Self;
}

/// Returns the exclusive end of `start..start + count`, or `None` on overflow.
#[inline]
pub(crate) fn range_end(start: usize, count: usize) -> Option<usize> {
    start.checked_add(count)
}
