use super::errors::{CheckError, RejectReason};
use crate::tape::{Segment, TapeDescriptor};

fn mismatch(detail: String) -> CheckError {
    CheckError::new(RejectReason::SegmentMismatch, detail)
}

/// Checks that `segment` is a faithful window of `td` around its head, which
/// must sit on `walls[wall]`.
///
/// Returns the absolute coordinate of the first cell of the window.
pub fn check_segment(
    td: &TapeDescriptor,
    segment: &Segment,
    wall: usize,
) -> Result<i64, CheckError> {
    if td.head_wall as usize != wall {
        return Err(mismatch(format!(
            "head is on wall {} but the transition rewrites wall {wall}",
            td.head_wall
        )));
    }
    if td.state != segment.state {
        return Err(mismatch(format!(
            "descriptor state {} but segment state {}",
            td.state, segment.state
        )));
    }
    let anchor = td.head_abs() - i64::from(segment.head);
    let cells = td.read_window(anchor, segment.len());
    if let Some(index) = cells.iter().zip(&segment.tape).position(|(a, b)| a != b) {
        return Err(mismatch(format!(
            "segment cell {index} differs from the descriptor at {}",
            anchor + index as i64
        )));
    }
    Ok(anchor)
}

/// Checks that `next.initial` is consistent with `prev.final`: same state, and
/// equal cells wherever the two windows overlap once their heads are aligned.
pub fn check_follow_on(prev: &Segment, next: &Segment) -> Result<(), CheckError> {
    if prev.state != next.state {
        return Err(CheckError::new(
            RejectReason::FollowOnMismatch,
            format!("state {} is followed by state {}", prev.state, next.state),
        ));
    }
    let shift = i64::from(prev.head) - i64::from(next.head);
    for index in 0..next.len() as i64 {
        let Some(before) = prev.cell(index + shift) else {
            continue;
        };
        if next.cell(index) != Some(before) {
            return Err(CheckError::new(
                RejectReason::FollowOnMismatch,
                format!("overlapping cell {index} of the next window differs"),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> TapeDescriptor {
        TapeDescriptor {
            walls: vec![vec![0], vec![0]],
            repeaters: vec![vec![1]],
            counts: vec![2],
            state: 3,
            leftmost: -1,
            rightmost: 2,
            head_wall: 0,
            head_offset: 0,
        }
    }

    #[test]
    fn window_around_the_head_matches() {
        let td = descriptor();
        let anchor = check_segment(&td, &Segment::new(vec![0, 0, 1], 3, 1), 0).unwrap();
        assert_eq!(anchor, -2);
    }

    #[test]
    fn wrong_wall_state_or_cells_are_rejected() {
        let td = descriptor();
        let segment = Segment::new(vec![0, 1], 3, 0);
        assert_eq!(
            check_segment(&td, &segment, 1).unwrap_err().reason,
            RejectReason::SegmentMismatch
        );
        let other_state = Segment::new(vec![0, 1], 2, 0);
        assert!(check_segment(&td, &other_state, 0).is_err());
        let wrong_cells = Segment::new(vec![0, 0], 3, 0);
        assert!(check_segment(&td, &wrong_cells, 0).is_err());
    }

    #[test]
    fn follow_on_compares_the_overlap() {
        let prev = Segment::new(vec![0, 1], 2, 1);
        assert_eq!(check_follow_on(&prev, &Segment::new(vec![1], 2, 0)), Ok(()));
        assert_eq!(check_follow_on(&prev, &Segment::new(vec![1, 0, 0], 2, 0)), Ok(()));
        let err = check_follow_on(&prev, &Segment::new(vec![0, 0], 2, 0)).unwrap_err();
        assert_eq!(err.reason, RejectReason::FollowOnMismatch);
        let err = check_follow_on(&prev, &Segment::new(vec![1], 3, 0)).unwrap_err();
        assert_eq!(err.reason, RejectReason::FollowOnMismatch);
    }
}
