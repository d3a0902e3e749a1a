use ridgeline_catalog::SegmentCatalog;
use ridgeline_core::{
    Event, GeneratorConfig, HeightIndex, SegmentCategory, SegmentDefinition, SegmentExtents,
    SegmentId, TickContext, TransitionSupport, WorldPosition,
};
use ridgeline_sequencer::{query, Sequencer};

const FRAME: f32 = 1.0 / 60.0;
const SPEED: f32 = 12.0;
const VIEW_AHEAD: f32 = 150.0;
const VIEW_BEHIND: f32 = 40.0;
const TICKS: u32 = 6_000;

#[test]
fn height_index_stays_within_bounds() {
    let mut host = SyntheticHost::new(0x0bad_5eed);
    for _ in 0..TICKS {
        let _ = host.step();
        let height = query::height_index(&host.sequencer).get();
        assert!(
            (1..=3).contains(&height),
            "height index {height} left [1, 3]"
        );
    }
    assert!(host.placements > 50, "run generated too little to judge");
}

#[test]
fn active_count_balances_placements_and_recycles() {
    let mut host = SyntheticHost::new(0x0bad_5eed);
    for _ in 0..TICKS {
        let _ = host.step();
        let active = query::active_segments(&host.sequencer);
        assert_eq!(
            active,
            host.placements - host.recycles,
            "active count drifted from placements minus recycles"
        );
    }
    assert!(host.recycles > 30, "run recycled too little to judge");
}

#[test]
fn jumper_endpoints_always_get_the_medium_gap() {
    let mut host = SyntheticHost::new(0x0bad_5eed);
    let mut previous_category: Option<SegmentCategory> = None;
    let mut jumper_pairs = 0u32;

    for _ in 0..TICKS {
        let events = host.step().to_vec();
        let medium = query::medium_gap(&host.sequencer);
        for event in &events {
            let Event::SegmentPlaced {
                id, category, gap, ..
            } = event
            else {
                continue;
            };
            // the stage-break depot bypasses the ordinary gap policy
            if id.as_str() == "depot" {
                previous_category = Some(*category);
                continue;
            }
            if let Some(previous) = previous_category {
                if previous == SegmentCategory::Jumper || *category == SegmentCategory::Jumper {
                    jumper_pairs += 1;
                    assert!(
                        (*gap - medium).abs() < 1e-4,
                        "jumper endpoint got gap {gap}, expected medium {medium}"
                    );
                }
            }
            previous_category = Some(*category);
        }
    }

    assert!(jumper_pairs > 10, "run exercised too few jumper endpoints");
}

#[test]
fn transitions_are_never_adjacent() {
    let mut host = SyntheticHost::new(0x0bad_5eed);
    let mut previous_category: Option<SegmentCategory> = None;
    let mut transitions = 0u32;

    for _ in 0..TICKS {
        let events = host.step().to_vec();
        for event in &events {
            let Event::SegmentPlaced { category, .. } = event else {
                continue;
            };
            if *category == SegmentCategory::Transition {
                transitions += 1;
                assert_ne!(
                    previous_category,
                    Some(SegmentCategory::Transition),
                    "two transition pieces were placed back to back"
                );
            }
            previous_category = Some(*category);
        }
    }

    assert!(transitions > 5, "run inserted too few transitions to judge");
}

#[test]
fn boundary_heights_only_admit_inward_deltas() {
    let mut host = SyntheticHost::new(0x0bad_5eed);
    let mut checked = 0u32;

    for _ in 0..TICKS {
        let before = query::height_index(&host.sequencer).get();
        let events = host.step().to_vec();
        for event in &events {
            let Event::SegmentPlaced { height_delta, .. } = event else {
                continue;
            };
            if before == 3 {
                checked += 1;
                assert!(
                    *height_delta <= 0,
                    "delta {height_delta} ascends past the max height"
                );
            }
            if before == 1 {
                checked += 1;
                assert!(
                    *height_delta >= 0,
                    "delta {height_delta} descends below the min height"
                );
            }
        }
    }

    assert!(checked > 20, "run visited boundary heights too rarely");
}

#[test]
fn stage_lengths_follow_geometric_growth() {
    let mut host = SyntheticHost::new(0x0bad_5eed);
    let mut advances = 0u32;

    for _ in 0..TICKS {
        let events = host.step().to_vec();
        for event in &events {
            let Event::StageAdvanced {
                stage,
                difficulty,
                stage_length,
            } = event
            else {
                continue;
            };
            advances += 1;
            let expected = 400.0_f32 * 1.75_f32.powi(stage.get() as i32 - 1);
            assert!(
                (*stage_length - expected).abs() < 1e-2,
                "stage {} length {stage_length} drifted from {expected}",
                stage.get()
            );
            assert_eq!(
                difficulty.get(),
                stage.get() - 1,
                "difficulty tracks stage increments in this run"
            );
        }
    }

    assert!(advances >= 1, "run never crossed a stage boundary");
}

struct SyntheticHost {
    sequencer: Sequencer,
    player_x: f32,
    right_bounds: Vec<f32>,
    events: Vec<Event>,
    placements: u32,
    recycles: u32,
}

impl SyntheticHost {
    fn new(seed: u64) -> Self {
        Self {
            sequencer: Sequencer::new(config(seed), content()).expect("sequencer builds"),
            player_x: 0.0,
            right_bounds: Vec::new(),
            events: Vec::new(),
            placements: 0,
            recycles: 0,
        }
    }

    fn step(&mut self) -> &[Event] {
        self.player_x += SPEED * FRAME;
        let ctx = TickContext {
            in_progress: true,
            forward_speed: SPEED,
            speed_multiplier: 1.0,
            distance_delta: SPEED * FRAME,
            player_x: self.player_x,
            recycle_boundary_x: self.player_x + VIEW_AHEAD,
        };

        self.events.clear();
        self.sequencer.tick(&ctx, &mut self.events);

        for event in &self.events {
            if matches!(event, Event::SegmentPlaced { .. }) {
                self.placements += 1;
                let right = query::current_segment(&self.sequencer)
                    .expect("placement leaves a current segment")
                    .right_bound_x();
                self.right_bounds.push(right);
            }
        }

        // the depot is traversed instantly in this synthetic run
        if query::spawning_blocked(&self.sequencer) {
            self.sequencer.leave_special_zone();
        }

        while self
            .right_bounds
            .first()
            .is_some_and(|right| *right < self.player_x - VIEW_BEHIND)
        {
            let _ = self.right_bounds.remove(0);
            self.sequencer.segment_recycled();
            self.recycles += 1;
        }

        &self.events
    }
}

fn config(seed: u64) -> GeneratorConfig {
    GeneratorConfig {
        number_of_heights: 3,
        base_stage_length: 400.0,
        max_active_segments: 12,
        spawn_anchor: WorldPosition::new(0.0, 0.0),
        seed,
        stage_break_segment: Some(SegmentId::new("depot")),
        ..GeneratorConfig::default()
    }
}

fn content() -> SegmentCatalog {
    SegmentCatalog::from_definitions([
        SegmentDefinition::new(
            SegmentId::new("meadow"),
            SegmentCategory::Ground,
            10,
            0,
            SegmentExtents::new(-6.0, 6.0, 0.0),
        ),
        SegmentDefinition::new(
            SegmentId::new("mesa"),
            SegmentCategory::Ground,
            6,
            0,
            SegmentExtents::new(-6.0, 6.0, 0.5),
        )
        .with_fixed_height(HeightIndex::new(2)),
        SegmentDefinition::new(
            SegmentId::new("ledges"),
            SegmentCategory::Jumper,
            8,
            0,
            SegmentExtents::new(-8.0, 8.0, 0.0),
        ),
        SegmentDefinition::new(
            SegmentId::new("gorge"),
            SegmentCategory::Jumper,
            3,
            1,
            SegmentExtents::new(-8.0, 8.0, 0.0),
        ),
        SegmentDefinition::new(
            SegmentId::new("ramp-up"),
            SegmentCategory::Transition,
            5,
            0,
            SegmentExtents::new(-5.0, 5.0, 0.0),
        )
        .with_transition_support(TransitionSupport {
            neutral: true,
            plus_one: true,
            plus_two: true,
            minus_one: false,
        }),
        SegmentDefinition::new(
            SegmentId::new("ramp-down"),
            SegmentCategory::Transition,
            5,
            0,
            SegmentExtents::new(-5.0, 5.0, 0.0),
        )
        .with_transition_support(TransitionSupport {
            neutral: true,
            plus_one: false,
            plus_two: false,
            minus_one: true,
        }),
        SegmentDefinition::new(
            SegmentId::new("depot"),
            SegmentCategory::Ground,
            0,
            0,
            SegmentExtents::new(-10.0, 10.0, 0.0),
        ),
    ])
    .expect("property catalog builds")
}
