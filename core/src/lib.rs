#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Ridgeline engine.
//!
//! This crate defines the surface that connects a host game loop to the
//! segment sequencer. Hosts register immutable [`SegmentDefinition`] values
//! and a validated [`GeneratorConfig`] at startup, feed a [`TickContext`]
//! once per frame, and receive [`Event`] values describing which segment to
//! activate and where to place it. The engine never touches rendering,
//! physics, or pooling; segments are opaque handles with a handful of
//! numeric properties.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Label for the RNG stream that draws segment categories.
pub const RNG_STREAM_CATEGORY: &str = "category";
/// Prefix for the per-category RNG streams that draw concrete segments.
pub const RNG_STREAM_SEGMENT_PREFIX: &str = "segment";
/// Label for the RNG stream that draws transition pieces.
pub const RNG_STREAM_TRANSITION: &str = "transition";
/// Label for the RNG stream that draws height deltas.
pub const RNG_STREAM_HEIGHT: &str = "height";
/// Label for the RNG stream that resolves gap coin-flips and chance rolls.
pub const RNG_STREAM_GAP: &str = "gap";

/// Unique identifier naming a registered segment definition.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SegmentId(String);

impl SegmentId {
    /// Creates a new segment identifier from the provided name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrows the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Gameplay role a segment fulfils within a generated run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentCategory {
    /// Ordinary runnable terrain.
    Ground,
    /// Ramp piece bridging two height levels; only inserted between others.
    Transition,
    /// Gap-heavy piece requiring a jump to traverse.
    Jumper,
}

/// One-based index into the configured stack of height levels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HeightIndex(u32);

impl HeightIndex {
    /// Creates a new height index wrapper.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying one-based level.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Applies a signed delta, saturating at one.
    #[must_use]
    pub fn offset(self, delta: i32) -> Self {
        let value = i64::from(self.0) + i64::from(delta);
        Self(u32::try_from(value.max(1)).unwrap_or(1))
    }
}

/// Height change classes a transition piece can bridge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeightDeltaClass {
    /// One level downward.
    Minus1,
    /// No height change.
    Neutral,
    /// One level upward.
    Plus1,
    /// Two levels upward.
    Plus2,
}

impl HeightDeltaClass {
    /// Classifies a signed height delta, if it falls in the supported range.
    #[must_use]
    pub const fn from_delta(delta: i32) -> Option<Self> {
        match delta {
            -1 => Some(Self::Minus1),
            0 => Some(Self::Neutral),
            1 => Some(Self::Plus1),
            2 => Some(Self::Plus2),
            _ => None,
        }
    }

    /// Signed height delta represented by the class.
    #[must_use]
    pub const fn delta(self) -> i32 {
        match self {
            Self::Minus1 => -1,
            Self::Neutral => 0,
            Self::Plus1 => 1,
            Self::Plus2 => 2,
        }
    }
}

/// Height-delta classes a transition-category segment is authored to bridge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionSupport {
    /// Whether the piece bridges a flat continuation.
    #[serde(default)]
    pub neutral: bool,
    /// Whether the piece bridges one level upward.
    #[serde(default)]
    pub plus_one: bool,
    /// Whether the piece bridges two levels upward.
    #[serde(default)]
    pub plus_two: bool,
    /// Whether the piece bridges one level downward.
    #[serde(default)]
    pub minus_one: bool,
}

impl TransitionSupport {
    /// Reports whether the given delta class is supported.
    #[must_use]
    pub const fn supports(&self, class: HeightDeltaClass) -> bool {
        match class {
            HeightDeltaClass::Neutral => self.neutral,
            HeightDeltaClass::Plus1 => self.plus_one,
            HeightDeltaClass::Plus2 => self.plus_two,
            HeightDeltaClass::Minus1 => self.minus_one,
        }
    }

    /// Reports whether the piece bridges at least one delta class.
    #[must_use]
    pub const fn any(&self) -> bool {
        self.neutral || self.plus_one || self.plus_two || self.minus_one
    }
}

/// Authored geometry of a segment relative to its anchor point.
///
/// The sequencer computes placement transforms purely from these offsets,
/// so the host never needs to expose its spatial representation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentExtents {
    /// Signed offset from the anchor to the left connectable edge.
    pub anchor_to_left: f32,
    /// Signed offset from the anchor to the right connectable edge.
    pub anchor_to_right: f32,
    /// Vertical offset from the anchor to the connectable surface.
    pub y_offset: f32,
}

impl SegmentExtents {
    /// Creates a new extents descriptor.
    #[must_use]
    pub const fn new(anchor_to_left: f32, anchor_to_right: f32, y_offset: f32) -> Self {
        Self {
            anchor_to_left,
            anchor_to_right,
            y_offset,
        }
    }

    /// Distance between the two connectable edges.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.anchor_to_right - self.anchor_to_left
    }
}

/// Immutable metadata describing one registered segment.
///
/// Definitions are registered once during initialization and never mutated
/// afterwards; hosts typically deserialize them from a content file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentDefinition {
    id: SegmentId,
    category: SegmentCategory,
    initial_weight: u32,
    #[serde(default)]
    starting_difficulty: u32,
    #[serde(default)]
    fixed_height: Option<HeightIndex>,
    #[serde(default)]
    transition_support: TransitionSupport,
    extents: SegmentExtents,
}

impl SegmentDefinition {
    /// Creates a new definition with no fixed height and no transition support.
    #[must_use]
    pub fn new(
        id: SegmentId,
        category: SegmentCategory,
        initial_weight: u32,
        starting_difficulty: u32,
        extents: SegmentExtents,
    ) -> Self {
        Self {
            id,
            category,
            initial_weight,
            starting_difficulty,
            fixed_height: None,
            transition_support: TransitionSupport::default(),
            extents,
        }
    }

    /// Pins the segment to a fixed height level.
    #[must_use]
    pub fn with_fixed_height(mut self, height: HeightIndex) -> Self {
        self.fixed_height = Some(height);
        self
    }

    /// Declares the delta classes a transition piece bridges.
    #[must_use]
    pub fn with_transition_support(mut self, support: TransitionSupport) -> Self {
        self.transition_support = support;
        self
    }

    /// Identifier naming the definition.
    #[must_use]
    pub fn id(&self) -> &SegmentId {
        &self.id
    }

    /// Category the segment belongs to.
    #[must_use]
    pub const fn category(&self) -> SegmentCategory {
        self.category
    }

    /// Weight the segment enters draw pools with; zero keeps it out entirely.
    #[must_use]
    pub const fn initial_weight(&self) -> u32 {
        self.initial_weight
    }

    /// Difficulty at which the segment becomes eligible for random draws.
    #[must_use]
    pub const fn starting_difficulty(&self) -> u32 {
        self.starting_difficulty
    }

    /// Height level the segment is pinned to, if any.
    #[must_use]
    pub const fn fixed_height(&self) -> Option<HeightIndex> {
        self.fixed_height
    }

    /// Delta classes bridged by a transition piece.
    #[must_use]
    pub const fn transition_support(&self) -> &TransitionSupport {
        &self.transition_support
    }

    /// Authored geometry of the segment.
    #[must_use]
    pub const fn extents(&self) -> &SegmentExtents {
        &self.extents
    }
}

/// Two-dimensional position expressed in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPosition {
    /// Horizontal coordinate along the direction of travel.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl WorldPosition {
    /// Creates a new world position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Opaque handle describing a live, placed segment.
///
/// The sequencer constructs one per placement; the host owns the actual
/// pooled content and reports recycling back through the sequencer's
/// notification methods.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentInstanceRef {
    definition_id: SegmentId,
    category: SegmentCategory,
    anchor: WorldPosition,
    left_bound_x: f32,
    right_bound_x: f32,
    y_offset: f32,
    stored_height_delta: Option<i32>,
}

impl SegmentInstanceRef {
    /// Creates a handle for a definition placed with the given anchor.
    #[must_use]
    pub fn new(definition: &SegmentDefinition, anchor: WorldPosition) -> Self {
        let extents = definition.extents();
        Self {
            definition_id: definition.id().clone(),
            category: definition.category(),
            anchor,
            left_bound_x: anchor.x + extents.anchor_to_left,
            right_bound_x: anchor.x + extents.anchor_to_right,
            y_offset: extents.y_offset,
            stored_height_delta: None,
        }
    }

    /// Identifier of the definition this instance was placed from.
    #[must_use]
    pub fn definition_id(&self) -> &SegmentId {
        &self.definition_id
    }

    /// Category of the placed segment.
    #[must_use]
    pub const fn category(&self) -> SegmentCategory {
        self.category
    }

    /// Anchor position the instance was placed with.
    #[must_use]
    pub const fn anchor(&self) -> WorldPosition {
        self.anchor
    }

    /// World-space X of the left connectable edge.
    #[must_use]
    pub const fn left_bound_x(&self) -> f32 {
        self.left_bound_x
    }

    /// World-space X of the right connectable edge.
    #[must_use]
    pub const fn right_bound_x(&self) -> f32 {
        self.right_bound_x
    }

    /// Vertical offset from the anchor to the connectable surface.
    #[must_use]
    pub const fn y_offset(&self) -> f32 {
        self.y_offset
    }

    /// Height delta a transition instance was inserted to bridge.
    #[must_use]
    pub const fn stored_height_delta(&self) -> Option<i32> {
        self.stored_height_delta
    }

    /// Records the height delta a transition instance bridges.
    pub fn set_stored_height_delta(&mut self, delta: i32) {
        self.stored_height_delta = Some(delta);
    }
}

/// Stage counter, starting at one and incremented on each stage boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Stage(u32);

impl Stage {
    /// Creates a new stage wrapper.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying stage number.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns the following stage.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Global difficulty counter; monotonically non-decreasing within a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Difficulty(u32);

impl Difficulty {
    /// Creates a new difficulty wrapper.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying difficulty value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns the next difficulty step.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Per-frame input gathered by the host before polling the sequencer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickContext {
    /// Whether the game is in its in-progress state; nothing spawns otherwise.
    pub in_progress: bool,
    /// Current forward speed of the runner in distance units per second.
    pub forward_speed: f32,
    /// Host speed multiplier applied on top of the forward speed.
    pub speed_multiplier: f32,
    /// Distance travelled since the previous tick.
    pub distance_delta: f32,
    /// Current X position of the player.
    pub player_x: f32,
    /// X position of the host's forward recycle boundary.
    pub recycle_boundary_x: f32,
}

/// Events emitted by the sequencer after processing a tick.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Instructs the host to activate a pooled segment at a position.
    SegmentPlaced {
        /// Definition the host should fetch an instance of.
        id: SegmentId,
        /// Category of the placed segment.
        category: SegmentCategory,
        /// Anchor position to apply to the instance.
        position: WorldPosition,
        /// Height delta applied relative to the previous segment.
        height_delta: i32,
        /// Gap length left between this segment and the previous one.
        gap: f32,
    },
    /// Announces that the run crossed a stage boundary.
    StageAdvanced {
        /// Stage that became active.
        stage: Stage,
        /// Difficulty after the boundary increment.
        difficulty: Difficulty,
        /// Length of the newly entered stage.
        stage_length: f32,
    },
    /// Reports that a spawn attempt was abandoned this tick.
    SpawnAborted {
        /// Recoverable condition that ended the attempt.
        reason: SelectionError,
    },
}

/// Content registration errors; fatal at initialization time.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A definition with the same identifier was already registered.
    #[error("segment id '{0}' is already registered")]
    DuplicateId(SegmentId),
    /// No definition with the requested identifier exists.
    #[error("segment id '{0}' is not registered")]
    UnknownSegment(SegmentId),
}

/// Recoverable selection failures; the current spawn attempt is abandoned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// A weighted draw was attempted on a pool with no entries.
    #[error("weighted draw attempted on an empty pool")]
    EmptyPool,
    /// Rejection sampling failed to find a height-compatible segment.
    #[error("no height-compatible segment found within {attempts} attempts")]
    SelectionExhausted {
        /// Number of draws made before giving up.
        attempts: u32,
    },
}

/// Configuration validation failures; fatal at initialization time.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// `number_of_heights` must be at least one.
    #[error("number_of_heights must be at least 1")]
    NoHeights,
    /// `height_interval` must be positive.
    #[error("height_interval must be positive, got {0}")]
    NonPositiveHeightInterval(f32),
    /// `base_stage_length` must be positive.
    #[error("base_stage_length must be positive, got {0}")]
    NonPositiveStageLength(f32),
    /// `stage_length_growth` must be positive.
    #[error("stage_length_growth must be positive, got {0}")]
    NonPositiveStageGrowth(f32),
    /// `max_active_segments` must be at least one.
    #[error("max_active_segments must be at least 1")]
    ZeroActiveSegmentCap,
    /// `transition_chance` must stay within the unit interval.
    #[error("transition_chance must be within [0, 1], got {0}")]
    TransitionChanceOutOfRange(f32),
    /// Gap lengths must not be negative.
    #[error("gap lengths must not be negative, got {0}")]
    NegativeGap(f32),
    /// `spawn_safety_margin` must not be negative.
    #[error("spawn_safety_margin must not be negative, got {0}")]
    NegativeSafetyMargin(f32),
    /// `gap_safety_factor` must be positive.
    #[error("gap_safety_factor must be positive, got {0}")]
    NonPositiveSafetyFactor(f32),
    /// `initial_height` must fall within the configured height range.
    #[error("initial_height {actual} outside [1, {heights}]")]
    InitialHeightOutOfRange {
        /// Height the configuration requested.
        actual: u32,
        /// Number of configured height levels.
        heights: u32,
    },
    /// Jump apex height must be positive.
    #[error("jump apex_height must be positive, got {0}")]
    NonPositiveJumpApex(f32),
    /// Gravity must be positive.
    #[error("jump gravity must be positive, got {0}")]
    NonPositiveGravity(f32),
    /// The jump release buffer must not be negative.
    #[error("jump release_buffer must not be negative, got {0}")]
    NegativeReleaseBuffer(f32),
}

/// Failures that prevent the sequencer from being constructed.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum BuildError {
    /// The configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A referenced segment id is unknown or registered twice.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Jump parameters the medium gap length is derived from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct JumpProfile {
    /// Peak height of a full jump in world units.
    pub apex_height: f32,
    /// Downward acceleration in world units per second squared.
    pub gravity: f32,
    /// Extra airtime granted by the host's release buffer, in seconds.
    pub release_buffer: f32,
}

impl Default for JumpProfile {
    fn default() -> Self {
        Self {
            apex_height: 2.0,
            gravity: 20.0,
            release_buffer: 0.05,
        }
    }
}

/// Draw weights for the category pool.
///
/// Transition segments never participate in the category draw; they enter
/// runs exclusively through the sequencer's insertion roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryWeights {
    /// Weight of the ground category.
    pub ground: u32,
    /// Weight of the jumper category.
    pub jumper: u32,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            ground: 70,
            jumper: 30,
        }
    }
}

/// Debug overrides that bypass random selection for curation and testing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DebugOverrides {
    /// Ordered segment ids consumed instead of random draws, wrapping at the end.
    #[serde(default)]
    pub forced_sequence: Vec<SegmentId>,
    /// Forces every selected gap to the shortest class.
    #[serde(default)]
    pub force_shortest_gap: bool,
    /// Forces transition insertions to use this segment when it supports the
    /// required delta class; insertion is skipped otherwise.
    #[serde(default)]
    pub forced_transition: Option<SegmentId>,
}

/// Global tunables the host supplies at initialization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of discrete height levels available to the run.
    pub number_of_heights: u32,
    /// Vertical distance between adjacent height levels.
    pub height_interval: f32,
    /// Length of the first stage in distance units.
    pub base_stage_length: f32,
    /// Multiplier applied per stage when recomputing the stage length.
    pub stage_length_growth: f32,
    /// Maximum number of simultaneously active segments.
    pub max_active_segments: u32,
    /// Probability of inserting a transition piece ahead of a chosen segment.
    pub transition_chance: f32,
    /// Shortest selectable gap length, supplied rather than computed.
    pub shortest_gap: f32,
    /// Longest gap length carried in the gap table for host policies.
    pub longest_gap: f32,
    /// Minimum clearance kept between the newest segment and the recycle boundary.
    pub spawn_safety_margin: f32,
    /// Anchor position applied to the very first placed segment.
    pub spawn_anchor: WorldPosition,
    /// Height level the run starts at.
    pub initial_height: u32,
    /// Empirical margin applied to the kinematic gap estimate.
    pub gap_safety_factor: f32,
    /// Jump parameters the medium gap is derived from.
    pub jump: JumpProfile,
    /// Category draw weights.
    pub category_weights: CategoryWeights,
    /// Seed every RNG stream in the engine is derived from.
    pub seed: u64,
    /// Segment inserted at stage boundaries; `None` suppresses the insert.
    pub stage_break_segment: Option<SegmentId>,
    /// Weight subtracted from a category on repeated draws; off by default.
    pub category_weight_decay: Option<u32>,
    /// Weight added to every pool entry per difficulty step; off by default.
    pub difficulty_weight_bonus: Option<u32>,
    /// Deterministic overrides used by tests and content curation.
    pub debug: DebugOverrides,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            number_of_heights: 3,
            height_interval: 2.5,
            base_stage_length: 500.0,
            stage_length_growth: 1.75,
            max_active_segments: 10,
            transition_chance: 0.5,
            shortest_gap: 2.0,
            longest_gap: 6.0,
            spawn_safety_margin: 30.0,
            spawn_anchor: WorldPosition::new(0.0, 0.0),
            initial_height: 1,
            gap_safety_factor: 0.7,
            jump: JumpProfile::default(),
            category_weights: CategoryWeights::default(),
            seed: 0,
            stage_break_segment: None,
            category_weight_decay: None,
            difficulty_weight_bonus: None,
            debug: DebugOverrides::default(),
        }
    }
}

impl GeneratorConfig {
    /// Validates every tunable, rejecting out-of-range values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.number_of_heights == 0 {
            return Err(ConfigError::NoHeights);
        }
        if self.height_interval <= 0.0 {
            return Err(ConfigError::NonPositiveHeightInterval(self.height_interval));
        }
        if self.base_stage_length <= 0.0 {
            return Err(ConfigError::NonPositiveStageLength(self.base_stage_length));
        }
        if self.stage_length_growth <= 0.0 {
            return Err(ConfigError::NonPositiveStageGrowth(self.stage_length_growth));
        }
        if self.max_active_segments == 0 {
            return Err(ConfigError::ZeroActiveSegmentCap);
        }
        if !(0.0..=1.0).contains(&self.transition_chance) {
            return Err(ConfigError::TransitionChanceOutOfRange(
                self.transition_chance,
            ));
        }
        if self.shortest_gap < 0.0 {
            return Err(ConfigError::NegativeGap(self.shortest_gap));
        }
        if self.longest_gap < 0.0 {
            return Err(ConfigError::NegativeGap(self.longest_gap));
        }
        if self.spawn_safety_margin < 0.0 {
            return Err(ConfigError::NegativeSafetyMargin(self.spawn_safety_margin));
        }
        if self.gap_safety_factor <= 0.0 {
            return Err(ConfigError::NonPositiveSafetyFactor(self.gap_safety_factor));
        }
        if self.initial_height == 0 || self.initial_height > self.number_of_heights {
            return Err(ConfigError::InitialHeightOutOfRange {
                actual: self.initial_height,
                heights: self.number_of_heights,
            });
        }
        if self.jump.apex_height <= 0.0 {
            return Err(ConfigError::NonPositiveJumpApex(self.jump.apex_height));
        }
        if self.jump.gravity <= 0.0 {
            return Err(ConfigError::NonPositiveGravity(self.jump.gravity));
        }
        if self.jump.release_buffer < 0.0 {
            return Err(ConfigError::NegativeReleaseBuffer(self.jump.release_buffer));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ConfigError, GeneratorConfig, HeightDeltaClass, HeightIndex, SegmentCategory,
        SegmentDefinition, SegmentExtents, SegmentId, SegmentInstanceRef, TransitionSupport,
        WorldPosition,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    fn ground_definition(name: &str) -> SegmentDefinition {
        SegmentDefinition::new(
            SegmentId::new(name),
            SegmentCategory::Ground,
            10,
            0,
            SegmentExtents::new(-4.0, 4.0, 0.5),
        )
    }

    #[test]
    fn segment_definition_round_trips_through_bincode() {
        let definition = ground_definition("plain").with_fixed_height(HeightIndex::new(2));
        assert_round_trip(&definition);
    }

    #[test]
    fn generator_config_round_trips_through_bincode() {
        assert_round_trip(&GeneratorConfig::default());
    }

    #[test]
    fn delta_classes_map_to_signed_deltas() {
        for class in [
            HeightDeltaClass::Minus1,
            HeightDeltaClass::Neutral,
            HeightDeltaClass::Plus1,
            HeightDeltaClass::Plus2,
        ] {
            assert_eq!(HeightDeltaClass::from_delta(class.delta()), Some(class));
        }
        assert_eq!(HeightDeltaClass::from_delta(-2), None);
        assert_eq!(HeightDeltaClass::from_delta(3), None);
    }

    #[test]
    fn transition_support_answers_per_class() {
        let support = TransitionSupport {
            neutral: true,
            plus_one: false,
            plus_two: true,
            minus_one: false,
        };
        assert!(support.supports(HeightDeltaClass::Neutral));
        assert!(!support.supports(HeightDeltaClass::Plus1));
        assert!(support.supports(HeightDeltaClass::Plus2));
        assert!(!support.supports(HeightDeltaClass::Minus1));
        assert!(support.any());
        assert!(!TransitionSupport::default().any());
    }

    #[test]
    fn instance_bounds_follow_anchor_and_extents() {
        let definition = ground_definition("plain");
        let instance = SegmentInstanceRef::new(&definition, WorldPosition::new(100.0, 5.0));
        assert_eq!(instance.left_bound_x(), 96.0);
        assert_eq!(instance.right_bound_x(), 104.0);
        assert_eq!(instance.y_offset(), 0.5);
        assert_eq!(instance.stored_height_delta(), None);
    }

    #[test]
    fn height_offset_saturates_at_one() {
        assert_eq!(HeightIndex::new(2).offset(-5).get(), 1);
        assert_eq!(HeightIndex::new(2).offset(1).get(), 3);
    }

    #[test]
    fn default_config_passes_validation() {
        GeneratorConfig::default().validate().expect("valid default");
    }

    #[test]
    fn config_rejects_zero_heights() {
        let config = GeneratorConfig {
            number_of_heights: 0,
            ..GeneratorConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoHeights));
    }

    #[test]
    fn config_rejects_out_of_range_transition_chance() {
        let config = GeneratorConfig {
            transition_chance: 1.5,
            ..GeneratorConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::TransitionChanceOutOfRange(1.5))
        );
    }

    #[test]
    fn config_rejects_initial_height_above_range() {
        let config = GeneratorConfig {
            initial_height: 4,
            ..GeneratorConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InitialHeightOutOfRange {
                actual: 4,
                heights: 3,
            })
        );
    }
}
