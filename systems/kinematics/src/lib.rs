#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Jump-kinematics estimation for clearable gap lengths.
//!
//! The medium gap class is the only computed one: it is the horizontal
//! distance covered during a full jump's airtime, scaled by an empirical
//! safety factor so the runner clears it with margin. Shortest and longest
//! come straight from host configuration.

use ridgeline_core::JumpProfile;

/// Gap length classes the sequencer selects between.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GapClass {
    /// Host-configured minimum hop.
    Shortest,
    /// Kinematically derived full-jump distance.
    Medium,
    /// Host-configured maximum; read by host policies, never auto-selected.
    Longest,
}

/// Time in seconds a full jump spends airborne.
///
/// Launch velocity follows from the apex height (`v = sqrt(2 g h)`), and a
/// symmetric rise and fall doubles the time to apex; the host's release
/// buffer extends the window.
#[must_use]
pub fn flight_time(jump: &JumpProfile) -> f32 {
    2.0 * (2.0 * jump.apex_height / jump.gravity).sqrt() + jump.release_buffer
}

/// Horizontal distance a full jump reliably clears at the given speed.
#[must_use]
pub fn estimate_gap_distance(
    jump: &JumpProfile,
    forward_speed: f32,
    speed_multiplier: f32,
    safety_factor: f32,
) -> f32 {
    flight_time(jump) * forward_speed * speed_multiplier * safety_factor
}

/// Cached gap lengths, refreshed whenever speed or difficulty changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GapTable {
    shortest: f32,
    medium: f32,
    longest: f32,
}

impl GapTable {
    /// Creates a table from the two configured classes; the medium class is
    /// zero until the first [`GapTable::refresh`].
    #[must_use]
    pub const fn new(shortest: f32, longest: f32) -> Self {
        Self {
            shortest,
            medium: 0.0,
            longest,
        }
    }

    /// Recomputes the medium class from current jump and speed parameters.
    pub fn refresh(
        &mut self,
        jump: &JumpProfile,
        forward_speed: f32,
        speed_multiplier: f32,
        safety_factor: f32,
    ) {
        self.medium = estimate_gap_distance(jump, forward_speed, speed_multiplier, safety_factor);
    }

    /// Length of the requested gap class.
    #[must_use]
    pub const fn length(&self, class: GapClass) -> f32 {
        match class {
            GapClass::Shortest => self.shortest,
            GapClass::Medium => self.medium,
            GapClass::Longest => self.longest,
        }
    }

    /// Host-configured minimum hop length.
    #[must_use]
    pub const fn shortest(&self) -> f32 {
        self.shortest
    }

    /// Kinematically derived full-jump length.
    #[must_use]
    pub const fn medium(&self) -> f32 {
        self.medium
    }

    /// Host-configured maximum gap length.
    #[must_use]
    pub const fn longest(&self) -> f32 {
        self.longest
    }
}

#[cfg(test)]
mod tests {
    use super::{estimate_gap_distance, flight_time, GapClass, GapTable};
    use ridgeline_core::JumpProfile;

    fn square_jump() -> JumpProfile {
        JumpProfile {
            apex_height: 2.0,
            gravity: 16.0,
            release_buffer: 0.0,
        }
    }

    #[test]
    fn flight_time_matches_closed_form() {
        // v = sqrt(2 * 16 * 2) = 8, rise + fall = 2 * 8 / 16 = 1s
        assert!((flight_time(&square_jump()) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn release_buffer_extends_flight_time() {
        let jump = JumpProfile {
            release_buffer: 0.25,
            ..square_jump()
        };
        assert!((flight_time(&jump) - 1.25).abs() < f32::EPSILON);
    }

    #[test]
    fn gap_estimate_scales_with_speed_and_safety() {
        let gap = estimate_gap_distance(&square_jump(), 10.0, 1.0, 0.7);
        assert!((gap - 7.0).abs() < 1e-5);

        let doubled = estimate_gap_distance(&square_jump(), 10.0, 2.0, 0.7);
        assert!((doubled - 14.0).abs() < 1e-5);
    }

    #[test]
    fn refresh_touches_only_the_medium_class() {
        let mut table = GapTable::new(2.0, 9.0);
        assert_eq!(table.medium(), 0.0);

        table.refresh(&square_jump(), 10.0, 1.0, 0.7);
        assert!((table.length(GapClass::Medium) - 7.0).abs() < 1e-5);
        assert_eq!(table.length(GapClass::Shortest), 2.0);
        assert_eq!(table.length(GapClass::Longest), 9.0);

        table.refresh(&square_jump(), 20.0, 1.0, 0.7);
        assert!((table.medium() - 14.0).abs() < 1e-5);
    }
}
