/// Largest drift of a finished curve total from 100% that callers may rely on
pub const CURVE_TOLERANCE: f64 = 0.01;

/// Drift below this is float noise and leaves a curve untouched
pub const RESCALE_EPSILON: f64 = 1e-9;

/// Smallest share any paid position can hold in a tail tier
pub const MIN_SHARE: f64 = 0.01;

/// Absorbs float representation error before an amount is floored
pub const FLOOR_EPSILON: f64 = 1e-7;

/// Cumulative percentage paid through position 10 on a registered major curve
pub const MAJOR_TOP10_TARGET: f64 = 50.0;

/// Percentage paid to positions 11-25 on a registered major curve
pub const MAJOR_MID_TIER_SHARE: f64 = 20.0;

/// Percentage paid to positions 26 and beyond on a registered major curve
pub const MAJOR_TAIL_SHARE: f64 = 30.0;

/// How the non-winner part of the top 10 is split on a registered major
/// curve, positions 2 through 10. Sums to 1.0.
pub const MAJOR_RUNNER_UP_WEIGHTS: [f64; 9] =
    [0.20, 0.14, 0.115, 0.10, 0.095, 0.09, 0.0875, 0.0865, 0.086];

/// Winner shares for tournaments paid on the registered major curve
pub const MAJOR_WINNER_SHARES: [(&str, f64); 2] =
    [("The Masters", 20.0), ("PGA Championship", 18.0)];

/// Top-10 anchors for ordinary tour events
pub const STANDARD_ANCHORS: [f64; 10] =
    [18.0, 10.9, 6.9, 4.9, 4.1, 3.625, 3.35, 3.1, 2.9, 2.7];

/// Cumulative percentage through position 15 on the standard curve
pub const STANDARD_TOP15_TARGET: f64 = 70.0;

/// Cumulative percentage through position 25 on the standard curve
pub const STANDARD_TOP25_TARGET: f64 = 85.0;

/// Weight of the last position of a linearly declining tier, relative to
/// the first position of that tier
pub const TIER_DECLINE_RATIO: f64 = 0.8;

/// A bespoke three-tier curve registered for one tournament.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NamedCurve {
    pub tournament: &'static str,
    pub anchors: [f64; 10],
    pub top15_target: f64,
    pub top25_target: f64,
}

/// Named curves for high-prestige events without a registered winner share
pub const NAMED_CURVES: [NamedCurve; 3] = [
    NamedCurve {
        tournament: "U.S. Open",
        anchors: [18.0, 10.8, 6.8, 4.8, 4.0, 3.6, 3.35, 3.1, 2.9, 2.7],
        top15_target: 70.0,
        top25_target: 82.0,
    },
    NamedCurve {
        tournament: "The Open Championship",
        anchors: [16.0, 9.5, 6.0, 4.5, 3.7, 3.2, 2.9, 2.6, 2.4, 2.2],
        top15_target: 62.0,
        top25_target: 75.0,
    },
    NamedCurve {
        tournament: "The Players Championship",
        anchors: [18.0, 10.9, 6.9, 4.9, 4.1, 3.625, 3.375, 3.125, 2.925, 2.725],
        top15_target: 71.0,
        top25_target: 84.0,
    },
];

/// Anchor positions and their fixed shares on the generic curve
pub const GENERIC_ANCHORS: [(u32, f64); 8] = [
    (1, 16.0),
    (2, 9.6),
    (3, 6.0),
    (5, 4.0),
    (10, 2.4),
    (15, 1.6),
    (20, 1.2),
    (25, 0.9),
];

/// First non-anchor position on the generic curve gets this multiple of the even share
pub const GENERIC_LEAD_FACTOR: f64 = 1.2;

/// Each later non-anchor position gets this multiple of the previous one
pub const GENERIC_DECAY: f64 = 0.98;

/// Number of rungs in a granular points table
pub const POINTS_RUNGS: usize = 85;

/// Winner points the standard ladder is expressed in
pub const LADDER_WINNER_POINTS: f64 = 500.0;

/// Standard granular points ladder, positions 1 through 85
pub const STANDARD_POINTS_LADDER: [f64; POINTS_RUNGS] = [
    500.0, 300.0, 190.0, 135.0, 110.0, 100.0, 90.0, 85.0, 80.0, 75.0, // 1-10
    70.0, 65.0, 60.0, 57.0, 56.0, 55.0, 54.0, 53.0, 52.0, 51.0, // 11-20
    50.0, 49.0, 48.0, 47.0, 46.0, 45.0, 44.0, 43.0, 42.0, 41.0, // 21-30
    40.25, 39.5, 38.75, 38.0, 37.25, 36.5, 35.75, 35.0, 34.25, 33.5, // 31-40
    32.75, 32.0, 31.25, 30.5, 29.75, 29.0, 28.25, 27.5, 26.75, 26.0, // 41-50
    25.25, 24.5, 23.75, 23.0, 22.25, 21.5, 20.75, 20.0, 19.25, 18.5, // 51-60
    17.75, 17.0, 16.25, 15.5, 14.75, 14.0, 13.25, 12.5, 11.75, 11.0, // 61-70
    10.5, 10.0, 9.5, 9.0, 8.5, 8.0, 7.5, 7.0, 6.5, 6.0, // 71-80
    5.8, 5.6, 5.4, 5.2, 5.0, // 81-85
];

/// Standard ladder scaled so position 1 pays `winner_points`
pub fn scaled_ladder(winner_points: f64) -> [f64; POINTS_RUNGS] {
    let scale = winner_points / LADDER_WINNER_POINTS;
    let mut rungs = [0.0; POINTS_RUNGS];
    for (i, &points) in STANDARD_POINTS_LADDER.iter().enumerate() {
        rungs[i] = points * scale;
    }
    rungs
}
