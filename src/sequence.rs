//! Wrapping sequence-number ordering.
//!
//! Sequence numbers are 8 bits and roll over from 255 to 0. A pending backlog is
//! assumed to be small (well under 50 messages per device) and to advance in small
//! steps, so a value in the high band (above 200) is older than one in the low band
//! (below 50). Backlogs that violate either assumption may pop out of order.

/// Values below this are the post-rollover band.
pub const WRAP_LOW: u8 = 50;
/// Values above this are the pre-rollover band.
pub const WRAP_HIGH: u8 = 200;

/// Returns true if `candidate` should replace `saved` as the earliest sequence.
#[inline]
pub fn is_better(saved: u8, candidate: u8) -> bool {
    if saved > WRAP_HIGH && candidate < WRAP_LOW {
        return false;
    }
    if saved < WRAP_LOW && candidate > WRAP_HIGH {
        return true;
    }
    candidate < saved
}

/// Index of the earliest sequence in `sequences`, scanning in order.
///
/// Ties keep the first occurrence.
pub fn earliest_index<I>(sequences: I) -> Option<usize>
where
    I: IntoIterator<Item = u8>,
{
    let mut best: Option<(usize, u8)> = None;
    for (idx, seq) in sequences.into_iter().enumerate() {
        match best {
            Some((_, saved)) if !is_better(saved, seq) => {}
            _ => best = Some((idx, seq)),
        }
    }
    best.map(|(idx, _)| idx)
}
