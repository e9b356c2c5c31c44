//! Task demand functions for use by [Perception](super::Perception) implementations.

/// The demand of following a leader at the given time headway in s,
/// decaying exponentially with headway scale `h_exp` in s.
pub fn car_following_demand(headway: Option<f64>, h_exp: f64) -> f64 {
    match headway {
        Some(headway) => (-f64::max(headway, 0.0) / h_exp).exp(),
        None => 0.0,
    }
}

/// The demand of considering a lane change, given the desire to the left and right.
pub fn lane_change_demand(desire_left: f64, desire_right: f64) -> f64 {
    desire_left.max(desire_right).max(0.0)
}
