//! TE/RoI overlap length.
//!
//! Both intervals are closed. The four cases are tested in a fixed order and
//! the first one that holds decides the overlap.

use crate::types::Interval;

/// Overlap in bp between a TE interval and a RoI interval.
pub fn overlap_length(te: Interval, roi: Interval) -> i64 {
    let start_in_roi = roi.contains(te.start);
    let end_in_roi = roi.contains(te.end);
    let te_contains_roi = te.start <= roi.start && roi.start <= roi.end && roi.end <= te.end;

    if te_contains_roi {
        // Case 1: TE covers the whole RoI
        //   TE  <------------------->
        //   RoI      |--------|
        roi.end - roi.start
    } else if start_in_roi && end_in_roi {
        // Case 2: TE inside the RoI
        //   TE       <------>
        //   RoI  |----------------|
        te.end - te.start
    } else if start_in_roi {
        // Case 3: TE starts inside and runs past the RoI end
        //   TE           <------------>
        //   RoI  |----------------|
        roi.end - te.start
    } else if end_in_roi {
        // Case 4: TE starts before the RoI and ends inside it
        //   TE  <------------>
        //   RoI       |----------------|
        te.end - roi.start
    } else {
        0
    }
}

/// Sum of [`overlap_length`] against every RoI on the chromosome.
pub fn total_overlap(te: Interval, rois: &[Interval]) -> i64 {
    rois.iter().map(|roi| overlap_length(te, *roi)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(start: i64, end: i64) -> Interval {
        Interval::new(start, end)
    }

    #[test]
    fn test_te_contains_roi() {
        assert_eq!(overlap_length(iv(100, 400), iv(150, 250)), 100);
    }

    #[test]
    fn test_te_inside_roi() {
        assert_eq!(overlap_length(iv(160, 200), iv(150, 250)), 40);
    }

    #[test]
    fn test_te_start_inside() {
        assert_eq!(overlap_length(iv(200, 300), iv(150, 250)), 50);
    }

    #[test]
    fn test_te_end_inside() {
        assert_eq!(overlap_length(iv(100, 200), iv(150, 250)), 50);
    }

    #[test]
    fn test_disjoint() {
        assert_eq!(overlap_length(iv(10, 20), iv(150, 250)), 0);
        assert_eq!(overlap_length(iv(300, 400), iv(150, 250)), 0);
    }

    #[test]
    fn test_touching_bounds_are_inside_but_zero_length() {
        // TE end equals RoI start: end is "inside" but the overlap is 0 bp.
        assert_eq!(overlap_length(iv(100, 150), iv(150, 250)), 0);
        assert_eq!(overlap_length(iv(250, 300), iv(150, 250)), 0);
    }

    #[test]
    fn test_identical_intervals() {
        assert_eq!(overlap_length(iv(150, 250), iv(150, 250)), 100);
    }

    #[test]
    fn test_matches_intersection_length() {
        for ts in 0..12 {
            for te in ts..12 {
                for rs in 0..12 {
                    for re in rs..12 {
                        let expected = (te.min(re) - ts.max(rs)).max(0);
                        assert_eq!(
                            overlap_length(iv(ts, te), iv(rs, re)),
                            expected,
                            "TE [{ts},{te}] RoI [{rs},{re}]"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_total_overlap_sums_rois() {
        let rois = [iv(0, 50), iv(150, 250), iv(900, 1000)];
        assert_eq!(total_overlap(iv(25, 200), &rois), 25 + 50);
        assert_eq!(total_overlap(iv(500, 600), &rois), 0);
        assert_eq!(total_overlap(iv(500, 600), &[]), 0);
    }
}
