//! Unit conversion constants.

pub const EMUS_PER_PT: i64 = 12_700;
pub const EMUS_PER_HALF_PT: i64 = EMUS_PER_PT / 2;
