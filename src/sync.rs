use crate::types::TimeMatch;

const NS_PER_MS: f64 = 1_000_000.0;

/// Finds the pose timestamp closest to `reference_ns`, scanning forward from `cursor`.
///
/// The scan stops as soon as the time difference starts to grow again, so the
/// previous sample is the local minimum. Equal consecutive differences keep
/// advancing. The returned `index` is that minimum and should be passed back as
/// the cursor for the next, later reference timestamp, whether or not the match
/// was within `tolerance_ms`.
///
/// `times` must be sorted ascending. Unsorted input is not detected and gives
/// wrong or missed matches.
///
/// If the table runs out before the difference grows, the last sample is taken
/// as the minimum and judged against the tolerance like any other.
pub fn match_timestamp(
    reference_ns: i64,
    times: &[i64],
    cursor: usize,
    tolerance_ms: f64,
) -> TimeMatch {
    if cursor >= times.len() {
        return TimeMatch {
            time_ns: reference_ns,
            index: cursor,
            found: false,
        };
    }
    let tolerance_ns = tolerance_ms * NS_PER_MS;

    let mut diff_prev = reference_ns.abs_diff(times[cursor]);
    let mut index = times.len() - 1;
    for (i, t) in times.iter().enumerate().skip(cursor + 1) {
        let diff = reference_ns.abs_diff(*t);
        if diff > diff_prev {
            index = i - 1;
            break;
        }
        diff_prev = diff;
    }

    TimeMatch {
        time_ns: reference_ns,
        index,
        found: (diff_prev as f64) < tolerance_ns,
    }
}

/// Matches every image timestamp in order, threading the cursor between calls.
///
/// Runs in O(images + poses) when both lists are sorted.
pub fn associate(image_times: &[i64], pose_times: &[i64], tolerance_ms: f64) -> Vec<TimeMatch> {
    let mut cursor = 0;
    image_times
        .iter()
        .map(|&t| {
            let m = match_timestamp(t, pose_times, cursor, tolerance_ms);
            cursor = m.index;
            m
        })
        .collect()
}
