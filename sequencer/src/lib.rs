#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative segment sequencing for Ridgeline.
//!
//! The [`Sequencer`] owns all generation state and implements the per-tick
//! decision procedure: whether a new segment is due, which category and
//! concrete segment to pick, whether to slot a transition piece in front of
//! it, which height delta and gap length to apply, and where the resulting
//! instance lands in world space. Hosts poll [`Sequencer::tick`] once per
//! frame while the run is in progress and react to the emitted
//! [`Event`] values; everything the host must report back flows through
//! explicit notification methods.
//!
//! Every random decision draws from its own SplitMix64 stream derived from
//! the configured seed by hashing a stream label, so identical seeds and
//! identical tick inputs replay an identical run.

use ridgeline_catalog::SegmentCatalog;
use ridgeline_core::{
    BuildError, Difficulty, Event, GeneratorConfig, HeightDeltaClass, HeightIndex,
    SegmentCategory, SegmentDefinition, SegmentId, SegmentInstanceRef, SelectionError, Stage,
    TickContext, WorldPosition, RNG_STREAM_CATEGORY, RNG_STREAM_GAP, RNG_STREAM_HEIGHT,
    RNG_STREAM_SEGMENT_PREFIX, RNG_STREAM_TRANSITION,
};
use ridgeline_system_kinematics::GapTable;
use ridgeline_system_selection::{SplitMix64, WeightedPool};
use sha2::{Digest, Sha256};

/// Upper bound on height-constrained rejection sampling before giving up.
const MAX_DRAW_ATTEMPTS: u32 = 16;

/// Lifecycle phases governing internal branching; never exposed to hosts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Seeding,
    Running,
    StageBreak,
}

#[derive(Clone, Debug)]
struct GenerationState {
    phase: Phase,
    previous: Option<SegmentInstanceRef>,
    current: Option<SegmentInstanceRef>,
    lookahead: Option<SegmentId>,
    last_category: Option<SegmentCategory>,
    current_height: HeightIndex,
    stage: Stage,
    difficulty: Difficulty,
    stage_length: f32,
    distance_into_stage: f32,
    active_segments: u32,
    block_spawning: bool,
    sequence_cursor: usize,
}

impl GenerationState {
    fn new(config: &GeneratorConfig) -> Self {
        Self {
            phase: Phase::Idle,
            previous: None,
            current: None,
            lookahead: None,
            last_category: None,
            current_height: HeightIndex::new(config.initial_height),
            stage: Stage::new(1),
            difficulty: Difficulty::new(0),
            stage_length: config.base_stage_length,
            distance_into_stage: 0.0,
            active_segments: 0,
            block_spawning: false,
            sequence_cursor: 0,
        }
    }
}

#[derive(Clone, Debug)]
struct Streams {
    category: SplitMix64,
    segment_ground: SplitMix64,
    segment_jumper: SplitMix64,
    transition: SplitMix64,
    height: SplitMix64,
    gap: SplitMix64,
}

impl Streams {
    fn derive(seed: u64) -> Self {
        Self {
            category: SplitMix64::new(derive_labeled_seed(seed, RNG_STREAM_CATEGORY)),
            segment_ground: SplitMix64::new(derive_segment_seed(seed, "ground")),
            segment_jumper: SplitMix64::new(derive_segment_seed(seed, "jumper")),
            transition: SplitMix64::new(derive_labeled_seed(seed, RNG_STREAM_TRANSITION)),
            height: SplitMix64::new(derive_labeled_seed(seed, RNG_STREAM_HEIGHT)),
            gap: SplitMix64::new(derive_labeled_seed(seed, RNG_STREAM_GAP)),
        }
    }
}

#[derive(Clone, Debug, Default)]
struct TransitionPools {
    minus_one: WeightedPool<SegmentId>,
    neutral: WeightedPool<SegmentId>,
    plus_one: WeightedPool<SegmentId>,
    plus_two: WeightedPool<SegmentId>,
}

impl TransitionPools {
    fn for_class(&self, class: HeightDeltaClass) -> &WeightedPool<SegmentId> {
        match class {
            HeightDeltaClass::Minus1 => &self.minus_one,
            HeightDeltaClass::Neutral => &self.neutral,
            HeightDeltaClass::Plus1 => &self.plus_one,
            HeightDeltaClass::Plus2 => &self.plus_two,
        }
    }

    fn add_supported(&mut self, definition: &SegmentDefinition) {
        let support = definition.transition_support();
        let weight = definition.initial_weight();
        if support.minus_one && !self.minus_one.contains(definition.id()) {
            self.minus_one.add(definition.id().clone(), weight);
        }
        if support.neutral && !self.neutral.contains(definition.id()) {
            self.neutral.add(definition.id().clone(), weight);
        }
        if support.plus_one && !self.plus_one.contains(definition.id()) {
            self.plus_one.add(definition.id().clone(), weight);
        }
        if support.plus_two && !self.plus_two.contains(definition.id()) {
            self.plus_two.add(definition.id().clone(), weight);
        }
    }

    fn any_configured(&self) -> bool {
        !self.minus_one.is_empty()
            || !self.neutral.is_empty()
            || !self.plus_one.is_empty()
            || !self.plus_two.is_empty()
    }
}

/// What the current tick is about to place.
#[derive(Clone, Debug)]
enum Pick {
    Ordinary(SegmentId),
    Transition { id: SegmentId, bridged_delta: i32 },
}

/// Deterministic segment sequencing engine.
///
/// Constructed once per run from an immutable catalog and validated
/// configuration; mutated exclusively through [`Sequencer::tick`] and the
/// host notification methods.
#[derive(Clone, Debug)]
pub struct Sequencer {
    config: GeneratorConfig,
    catalog: SegmentCatalog,
    category_pool: WeightedPool<SegmentCategory>,
    ground_pool: WeightedPool<SegmentId>,
    jumper_pool: WeightedPool<SegmentId>,
    transition_pools: TransitionPools,
    gap_table: GapTable,
    streams: Streams,
    state: GenerationState,
}

impl Sequencer {
    /// Builds a sequencer, validating configuration and referenced content.
    ///
    /// Fails before the run starts on invalid tunables or on any segment id
    /// referenced by the configuration that the catalog does not know.
    pub fn new(config: GeneratorConfig, catalog: SegmentCatalog) -> Result<Self, BuildError> {
        config.validate()?;
        for id in &config.debug.forced_sequence {
            let _ = catalog.get(id)?;
        }
        if let Some(id) = &config.debug.forced_transition {
            let _ = catalog.get(id)?;
        }
        if let Some(id) = &config.stage_break_segment {
            let _ = catalog.get(id)?;
        }

        let state = GenerationState::new(&config);
        let mut sequencer = Self {
            category_pool: WeightedPool::new(),
            ground_pool: WeightedPool::new(),
            jumper_pool: WeightedPool::new(),
            transition_pools: TransitionPools::default(),
            gap_table: GapTable::new(config.shortest_gap, config.longest_gap),
            streams: Streams::derive(config.seed),
            state,
            config,
            catalog,
        };
        sequencer.build_pools();
        Ok(sequencer)
    }

    /// Returns the run to its idle state with freshly derived RNG streams.
    ///
    /// The next in-progress tick seeds a new run; pools regain their
    /// initial weights and difficulty-zero eligibility.
    pub fn reset(&mut self) {
        self.state = GenerationState::new(&self.config);
        self.streams = Streams::derive(self.config.seed);
        self.category_pool = WeightedPool::new();
        self.ground_pool = WeightedPool::new();
        self.jumper_pool = WeightedPool::new();
        self.transition_pools = TransitionPools::default();
        self.gap_table = GapTable::new(self.config.shortest_gap, self.config.longest_gap);
        self.build_pools();
    }

    /// Advances the sequencer by one host frame.
    ///
    /// Emits [`Event::SegmentPlaced`] when a segment is due,
    /// [`Event::StageAdvanced`] on stage boundaries, and
    /// [`Event::SpawnAborted`] when a recoverable selection failure ends the
    /// attempt. The worst case is that nothing spawns this frame.
    pub fn tick(&mut self, ctx: &TickContext, out: &mut Vec<Event>) {
        if !ctx.in_progress || self.state.block_spawning {
            return;
        }
        if self.state.phase == Phase::Idle {
            self.state.phase = Phase::Seeding;
        }

        self.state.distance_into_stage += ctx.distance_delta;

        if self.state.active_segments >= self.config.max_active_segments {
            return;
        }
        if let Some(current) = &self.state.current {
            if ctx.recycle_boundary_x - current.right_bound_x() < self.config.spawn_safety_margin {
                return;
            }
        }

        if self.state.phase == Phase::Seeding {
            self.gap_table.refresh(
                &self.config.jump,
                ctx.forward_speed,
                ctx.speed_multiplier,
                self.config.gap_safety_factor,
            );
            self.place_seed(out);
            return;
        }

        if self.stage_boundary_reached(ctx) {
            self.advance_stage(ctx, out);
            if let Some(id) = self.config.stage_break_segment.clone() {
                self.place_stage_break(&id, out);
                self.state.block_spawning = true;
                self.state.phase = Phase::StageBreak;
                return;
            }
        }

        let candidate = match self.choose_candidate() {
            Ok(id) => id,
            Err(reason) => {
                out.push(Event::SpawnAborted { reason });
                return;
            }
        };

        let pick = self.maybe_insert_transition(candidate);
        self.place_pick(pick, out);
    }

    /// Notifies the sequencer that the host recycled one segment instance.
    pub fn segment_recycled(&mut self) {
        self.state.active_segments = self.state.active_segments.saturating_sub(1);
    }

    /// Blocks spawning while the player occupies a special zone such as a shop.
    pub fn enter_special_zone(&mut self) {
        self.state.block_spawning = true;
    }

    /// Resumes spawning after the player leaves a special zone.
    pub fn leave_special_zone(&mut self) {
        self.state.block_spawning = false;
        if self.state.phase == Phase::StageBreak {
            self.state.phase = Phase::Running;
        }
    }

    /// Raises difficulty by one step and refreshes derived values.
    ///
    /// Newly eligible segments join their pools; the medium gap is
    /// recomputed from the tick's speed values; the optional per-difficulty
    /// weight bonus is applied across every pool.
    pub fn increment_difficulty(&mut self, ctx: &TickContext) {
        self.state.difficulty = self.state.difficulty.next();
        self.gap_table.refresh(
            &self.config.jump,
            ctx.forward_speed,
            ctx.speed_multiplier,
            self.config.gap_safety_factor,
        );
        self.build_pools();
        if let Some(bonus) = self.config.difficulty_weight_bonus {
            raise_weights(&mut self.ground_pool, bonus);
            raise_weights(&mut self.jumper_pool, bonus);
            raise_weights(&mut self.transition_pools.minus_one, bonus);
            raise_weights(&mut self.transition_pools.neutral, bonus);
            raise_weights(&mut self.transition_pools.plus_one, bonus);
            raise_weights(&mut self.transition_pools.plus_two, bonus);
        }
    }

    fn build_pools(&mut self) {
        let difficulty = self.state.difficulty.get();

        if self.category_pool.is_empty() {
            self.category_pool
                .add(SegmentCategory::Ground, self.config.category_weights.ground);
            self.category_pool
                .add(SegmentCategory::Jumper, self.config.category_weights.jumper);
        }

        for definition in self.catalog.iter() {
            if definition.initial_weight() == 0 || definition.starting_difficulty() > difficulty {
                continue;
            }
            match definition.category() {
                SegmentCategory::Ground => {
                    if !self.ground_pool.contains(definition.id()) {
                        self.ground_pool
                            .add(definition.id().clone(), definition.initial_weight());
                    }
                }
                SegmentCategory::Jumper => {
                    if !self.jumper_pool.contains(definition.id()) {
                        self.jumper_pool
                            .add(definition.id().clone(), definition.initial_weight());
                    }
                }
                SegmentCategory::Transition => {
                    self.transition_pools.add_supported(definition);
                }
            }
        }
    }

    fn stage_boundary_reached(&self, ctx: &TickContext) -> bool {
        let Some(current) = &self.state.current else {
            return false;
        };
        let remaining = (current.right_bound_x() - ctx.player_x).max(0.0);
        self.state.distance_into_stage + remaining >= self.state.stage_length
    }

    fn advance_stage(&mut self, ctx: &TickContext, out: &mut Vec<Event>) {
        self.state.stage = self.state.stage.next();
        self.increment_difficulty(ctx);
        let exponent = self.state.stage.get().saturating_sub(1);
        self.state.stage_length =
            self.config.base_stage_length * self.config.stage_length_growth.powi(exponent as i32);
        self.state.distance_into_stage = 0.0;
        out.push(Event::StageAdvanced {
            stage: self.state.stage,
            difficulty: self.state.difficulty,
            stage_length: self.state.stage_length,
        });
    }

    fn choose_candidate(&mut self) -> Result<SegmentId, SelectionError> {
        if !self.config.debug.forced_sequence.is_empty() {
            let sequence = &self.config.debug.forced_sequence;
            let id = sequence[self.state.sequence_cursor % sequence.len()].clone();
            self.state.sequence_cursor = (self.state.sequence_cursor + 1) % sequence.len();
            return Ok(id);
        }

        if let Some(id) = self.state.lookahead.take() {
            return Ok(id);
        }

        let drawn = self.category_pool.draw(&mut self.streams.category)?;
        if let Some(last) = self.state.last_category {
            if last != drawn {
                self.category_pool.reset_weight(&last);
            } else if let Some(step) = self.config.category_weight_decay {
                let weight = self.category_pool.weight(&drawn).unwrap_or(1);
                self.category_pool
                    .set_weight(&drawn, weight.saturating_sub(step));
            }
        }
        self.state.last_category = Some(drawn);

        match drawn {
            SegmentCategory::Ground => draw_height_checked(
                &self.ground_pool,
                &mut self.streams.segment_ground,
                &self.catalog,
                self.config.number_of_heights,
            ),
            SegmentCategory::Jumper => draw_height_checked(
                &self.jumper_pool,
                &mut self.streams.segment_jumper,
                &self.catalog,
                self.config.number_of_heights,
            ),
            // the category pool is built without transitions
            SegmentCategory::Transition => Err(SelectionError::EmptyPool),
        }
    }

    fn maybe_insert_transition(&mut self, candidate: SegmentId) -> Pick {
        if !self.config.debug.forced_sequence.is_empty() {
            return Pick::Ordinary(candidate);
        }
        if self.config.transition_chance <= 0.0 || !self.transition_pools.any_configured() {
            return Pick::Ordinary(candidate);
        }
        let Some(previous) = &self.state.current else {
            return Pick::Ordinary(candidate);
        };
        if previous.category() == SegmentCategory::Transition {
            return Pick::Ordinary(candidate);
        }

        let candidate_definition = self
            .catalog
            .get(&candidate)
            .expect("candidate ids originate from the catalog");
        if previous.category() == SegmentCategory::Jumper
            && candidate_definition.category() == SegmentCategory::Jumper
        {
            return Pick::Ordinary(candidate);
        }

        if self.streams.gap.next_unit() >= f64::from(self.config.transition_chance) {
            return Pick::Ordinary(candidate);
        }

        let bridged_delta = match candidate_definition.fixed_height() {
            Some(fixed) => fixed.get() as i32 - self.state.current_height.get() as i32,
            None => draw_biased_delta(&mut self.streams.height),
        };
        let bridged_delta = clamp_delta(
            bridged_delta,
            self.state.current_height,
            self.config.number_of_heights,
        );
        // fixed-height candidates can demand drops or climbs no transition
        // piece bridges; those placements stay ordinary
        let Some(class) = HeightDeltaClass::from_delta(bridged_delta) else {
            return Pick::Ordinary(candidate);
        };

        if let Some(forced) = &self.config.debug.forced_transition {
            let forced_definition = self
                .catalog
                .get(forced)
                .expect("forced transition id validated at construction");
            if forced_definition.transition_support().supports(class) {
                self.state.lookahead = Some(candidate);
                return Pick::Transition {
                    id: forced.clone(),
                    bridged_delta,
                };
            }
            return Pick::Ordinary(candidate);
        }

        match self
            .transition_pools
            .for_class(class)
            .draw(&mut self.streams.transition)
        {
            Ok(id) => {
                self.state.lookahead = Some(candidate);
                Pick::Transition { id, bridged_delta }
            }
            // no piece bridges this delta; keep the original choice
            Err(_) => Pick::Ordinary(candidate),
        }
    }

    fn place_pick(&mut self, pick: Pick, out: &mut Vec<Event>) {
        match pick {
            Pick::Transition { id, bridged_delta } => {
                // transitions connect flush and defer their delta to the
                // lookahead segment
                let gap = self.select_gap(&id);
                self.place_segment(&id, gap, 0, Some(bridged_delta), out);
            }
            Pick::Ordinary(id) => {
                let gap = self.select_gap(&id);
                let delta = self.resolve_height_delta(&id, gap);
                self.place_segment(&id, gap, delta, None, out);
            }
        }
    }

    fn select_gap(&mut self, id: &SegmentId) -> f32 {
        let definition = self
            .catalog
            .get(id)
            .expect("placement ids originate from the catalog");
        let previous_category = self
            .state
            .current
            .as_ref()
            .map(SegmentInstanceRef::category);

        if self.config.debug.force_shortest_gap {
            return self.gap_table.shortest();
        }
        if previous_category == Some(SegmentCategory::Jumper)
            || definition.category() == SegmentCategory::Jumper
        {
            return self.gap_table.medium();
        }
        if previous_category == Some(SegmentCategory::Transition)
            || definition.category() == SegmentCategory::Transition
        {
            return 0.0;
        }
        if self.streams.gap.next_bool() {
            self.gap_table.medium()
        } else {
            0.0
        }
    }

    fn resolve_height_delta(&mut self, id: &SegmentId, gap: f32) -> i32 {
        let definition = self
            .catalog
            .get(id)
            .expect("placement ids originate from the catalog");
        let previous = self
            .state
            .current
            .as_ref()
            .expect("running phase always has a current segment");

        // a transition predecessor dictates the delta it was built for
        if let Some(stored) = previous.stored_height_delta() {
            return stored;
        }

        let raw = if let Some(fixed) = definition.fixed_height() {
            fixed.get() as i32 - self.state.current_height.get() as i32
        } else if previous.category() == SegmentCategory::Ground
            && definition.category() == SegmentCategory::Ground
            && gap == 0.0
        {
            0
        } else {
            draw_biased_delta(&mut self.streams.height)
        };

        clamp_delta(raw, self.state.current_height, self.config.number_of_heights)
    }

    fn place_seed(&mut self, out: &mut Vec<Event>) {
        let id = match self.choose_candidate() {
            Ok(id) => id,
            Err(reason) => {
                out.push(Event::SpawnAborted { reason });
                return;
            }
        };
        let definition = self
            .catalog
            .get(&id)
            .expect("candidate ids originate from the catalog");

        if let Some(fixed) = definition.fixed_height() {
            let clamped = fixed.get().clamp(1, self.config.number_of_heights);
            self.state.current_height = HeightIndex::new(clamped);
        }

        let instance = SegmentInstanceRef::new(definition, self.config.spawn_anchor);
        let category = definition.category();
        self.state.current = Some(instance);
        self.state.active_segments = self.state.active_segments.saturating_add(1);
        self.state.phase = Phase::Running;
        out.push(Event::SegmentPlaced {
            id,
            category,
            position: self.config.spawn_anchor,
            height_delta: 0,
            gap: 0.0,
        });
    }

    fn place_stage_break(&mut self, id: &SegmentId, out: &mut Vec<Event>) {
        let definition = self
            .catalog
            .get(id)
            .expect("stage break id validated at construction");
        let delta = match definition.fixed_height() {
            Some(fixed) => clamp_delta(
                fixed.get() as i32 - self.state.current_height.get() as i32,
                self.state.current_height,
                self.config.number_of_heights,
            ),
            None => 0,
        };
        self.place_segment(id, 0.0, delta, None, out);
    }

    fn place_segment(
        &mut self,
        id: &SegmentId,
        gap: f32,
        delta: i32,
        stored_delta: Option<i32>,
        out: &mut Vec<Event>,
    ) {
        let definition = self
            .catalog
            .get(id)
            .expect("placement ids originate from the catalog");
        let previous = self
            .state
            .current
            .as_ref()
            .expect("running phase always has a current segment");

        let extents = definition.extents();
        let anchor_x = previous.right_bound_x() + gap - extents.anchor_to_left;
        let anchor_y = previous.anchor().y + previous.y_offset() - extents.y_offset
            + delta as f32 * self.config.height_interval;
        let anchor = WorldPosition::new(anchor_x, anchor_y);

        let mut instance = SegmentInstanceRef::new(definition, anchor);
        if let Some(stored) = stored_delta {
            instance.set_stored_height_delta(stored);
        }
        let category = definition.category();

        let next_height = (i64::from(self.state.current_height.get()) + i64::from(delta))
            .clamp(1, i64::from(self.config.number_of_heights));
        self.state.current_height = HeightIndex::new(next_height as u32);
        debug_assert!(
            self.state.current_height.get() >= 1
                && self.state.current_height.get() <= self.config.number_of_heights,
            "height index left its configured bounds"
        );

        self.state.previous = self.state.current.take();
        self.state.current = Some(instance);
        self.state.active_segments = self.state.active_segments.saturating_add(1);

        out.push(Event::SegmentPlaced {
            id: id.clone(),
            category,
            position: anchor,
            height_delta: delta,
            gap,
        });
    }
}

/// Query functions that provide read-only access to the generation state.
pub mod query {
    use super::Sequencer;
    use ridgeline_core::{Difficulty, HeightIndex, SegmentInstanceRef, Stage};

    /// Current stage of the run.
    #[must_use]
    pub fn stage(sequencer: &Sequencer) -> Stage {
        sequencer.state.stage
    }

    /// Current global difficulty.
    #[must_use]
    pub fn difficulty(sequencer: &Sequencer) -> Difficulty {
        sequencer.state.difficulty
    }

    /// Height level the next ordinary segment connects at.
    #[must_use]
    pub fn height_index(sequencer: &Sequencer) -> HeightIndex {
        sequencer.state.current_height
    }

    /// Length of the stage currently being generated.
    #[must_use]
    pub fn stage_length(sequencer: &Sequencer) -> f32 {
        sequencer.state.stage_length
    }

    /// Distance generated into the current stage so far.
    #[must_use]
    pub fn distance_into_stage(sequencer: &Sequencer) -> f32 {
        sequencer.state.distance_into_stage
    }

    /// Number of segment instances the host currently holds active.
    #[must_use]
    pub fn active_segments(sequencer: &Sequencer) -> u32 {
        sequencer.state.active_segments
    }

    /// Whether spawning is blocked by a special zone.
    #[must_use]
    pub fn spawning_blocked(sequencer: &Sequencer) -> bool {
        sequencer.state.block_spawning
    }

    /// Most recently placed segment, if any.
    #[must_use]
    pub fn current_segment(sequencer: &Sequencer) -> Option<&SegmentInstanceRef> {
        sequencer.state.current.as_ref()
    }

    /// Segment placed before the current one, if any.
    #[must_use]
    pub fn previous_segment(sequencer: &Sequencer) -> Option<&SegmentInstanceRef> {
        sequencer.state.previous.as_ref()
    }

    /// Kinematically derived medium gap length currently in effect.
    #[must_use]
    pub fn medium_gap(sequencer: &Sequencer) -> f32 {
        sequencer.gap_table.medium()
    }
}

fn raise_weights(pool: &mut WeightedPool<SegmentId>, bonus: u32) {
    let keys: Vec<(SegmentId, u32)> = pool
        .iter()
        .map(|(key, weight)| (key.clone(), weight))
        .collect();
    for (key, weight) in keys {
        pool.set_weight(&key, weight.saturating_add(bonus));
    }
}

fn draw_height_checked(
    pool: &WeightedPool<SegmentId>,
    rng: &mut SplitMix64,
    catalog: &SegmentCatalog,
    number_of_heights: u32,
) -> Result<SegmentId, SelectionError> {
    for _ in 0..MAX_DRAW_ATTEMPTS {
        let id = pool.draw(rng)?;
        let definition = catalog
            .get(&id)
            .expect("pool ids originate from the catalog");
        let fits = definition
            .fixed_height()
            .map_or(true, |height| height.get() <= number_of_heights);
        if fits {
            return Ok(id);
        }
    }
    Err(SelectionError::SelectionExhausted {
        attempts: MAX_DRAW_ATTEMPTS,
    })
}

/// Uniform draw over `[-2, 3)` with the illegal `-2` collapsed onto `-1`,
/// giving the single-step descent double representation.
fn draw_biased_delta(rng: &mut SplitMix64) -> i32 {
    let raw = rng.next_bounded(5) as i32 - 2;
    if raw == -2 {
        -1
    } else {
        raw
    }
}

fn clamp_delta(delta: i32, current: HeightIndex, number_of_heights: u32) -> i32 {
    let floor = 1 - current.get() as i32;
    let ceiling = number_of_heights as i32 - current.get() as i32;
    delta.clamp(floor, ceiling)
}

fn derive_labeled_seed(base: u64, label: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(base.to_le_bytes());
    hasher.update(label.as_bytes());
    finalize_seed(hasher)
}

fn derive_segment_seed(base: u64, category_label: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(base.to_le_bytes());
    hasher.update(RNG_STREAM_SEGMENT_PREFIX.as_bytes());
    hasher.update(category_label.as_bytes());
    finalize_seed(hasher)
}

fn finalize_seed(hasher: Sha256) -> u64 {
    let digest = hasher.finalize();
    let bytes: [u8; 8] = digest[0..8].try_into().expect("sha256 digest slice length");
    u64::from_le_bytes(bytes)
}
