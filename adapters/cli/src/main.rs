#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line driver for the Ridgeline sequencing engine.
//!
//! Loads a JSON content document (or falls back to a built-in demo set),
//! drives the sequencer with a synthetic host loop, and prints the placement
//! transcript. Runs can be shared as recipe strings and replayed elsewhere.

mod run_transfer;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use ridgeline_catalog::SegmentCatalog;
use ridgeline_core::{
    Event, GeneratorConfig, HeightIndex, SegmentCategory, SegmentDefinition, SegmentExtents,
    SegmentId, TickContext, TransitionSupport, WorldPosition,
};
use ridgeline_sequencer::{query, Sequencer};
use run_transfer::RunRecipe;
use serde::{Deserialize, Serialize};

const FRAME: f32 = 1.0 / 60.0;
const SPEED: f32 = 12.0;
const VIEW_AHEAD: f32 = 150.0;
const VIEW_BEHIND: f32 = 40.0;

/// Command-line arguments accepted by the driver.
#[derive(Debug, Parser)]
#[command(name = "ridgeline", about = "Deterministic endless-runner segment sequencing")]
struct Args {
    /// Path to a JSON content document holding tunables and segments.
    #[arg(long)]
    content: Option<PathBuf>,
    /// Number of host frames to simulate.
    #[arg(long, default_value_t = 600)]
    ticks: u32,
    /// Seed override; a random seed is invented when the configuration
    /// leaves it zero and no recipe is supplied.
    #[arg(long)]
    seed: Option<u64>,
    /// Run recipe string replacing the generator tunables and seed.
    #[arg(long)]
    recipe: Option<String>,
    /// Print the shareable recipe for this run before the transcript.
    #[arg(long)]
    emit_recipe: bool,
}

/// Content document hosts feed the engine: tunables plus segment lists.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct ContentConfig {
    #[serde(default)]
    generator: GeneratorConfig,
    segments: Vec<SegmentDefinition>,
}

/// Entry point for the Ridgeline command-line driver.
fn main() -> Result<()> {
    let args = Args::parse();

    let mut content = match &args.content {
        Some(path) => load_content(path)?,
        None => demo_content(),
    };

    if let Some(encoded) = &args.recipe {
        let recipe = RunRecipe::decode(encoded).context("could not decode run recipe")?;
        content.generator = recipe.generator;
        content.generator.seed = recipe.seed;
    }
    if let Some(seed) = args.seed {
        content.generator.seed = seed;
    } else if content.generator.seed == 0 && args.recipe.is_none() {
        content.generator.seed = rand::random();
    }

    if args.emit_recipe {
        let recipe = RunRecipe {
            seed: content.generator.seed,
            generator: content.generator.clone(),
        };
        println!("recipe: {}", recipe.encode());
    }

    let catalog = SegmentCatalog::from_definitions(content.segments.clone())
        .context("segment registration failed")?;
    let sequencer = Sequencer::new(content.generator.clone(), catalog)
        .context("sequencer construction failed")?;

    println!(
        "seed {:016x}, {} segments registered",
        content.generator.seed,
        content.segments.len()
    );
    run(sequencer, args.ticks);
    Ok(())
}

fn load_content(path: &PathBuf) -> Result<ContentConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("could not read content file '{}'", path.display()))?;
    let content: ContentConfig = serde_json::from_str(&text)
        .with_context(|| format!("could not parse content file '{}'", path.display()))?;
    Ok(content)
}

fn run(mut sequencer: Sequencer, ticks: u32) {
    let mut player_x = 0.0_f32;
    let mut right_bounds: Vec<f32> = Vec::new();
    let mut events = Vec::new();
    let mut placements = 0u32;
    let mut recycles = 0u32;

    for tick in 0..ticks {
        player_x += SPEED * FRAME;
        let ctx = TickContext {
            in_progress: true,
            forward_speed: SPEED,
            speed_multiplier: 1.0,
            distance_delta: SPEED * FRAME,
            player_x,
            recycle_boundary_x: player_x + VIEW_AHEAD,
        };

        events.clear();
        sequencer.tick(&ctx, &mut events);

        for event in &events {
            match event {
                Event::SegmentPlaced {
                    id,
                    category,
                    position,
                    height_delta,
                    gap,
                } => {
                    placements += 1;
                    let right = query::current_segment(&sequencer)
                        .expect("placement leaves a current segment")
                        .right_bound_x();
                    right_bounds.push(right);
                    println!(
                        "[{tick:5}] + {id:<12} {:<10} x={:>8.2} y={:>6.2} delta={height_delta:+} gap={gap:.2}",
                        category_label(*category),
                        position.x,
                        position.y,
                    );
                }
                Event::StageAdvanced {
                    stage,
                    difficulty,
                    stage_length,
                } => {
                    println!(
                        "[{tick:5}] * stage {} (difficulty {}, length {stage_length:.1})",
                        stage.get(),
                        difficulty.get(),
                    );
                }
                Event::SpawnAborted { reason } => {
                    println!("[{tick:5}] ! spawn aborted: {reason}");
                }
            }
        }

        // the shop zone is traversed instantly in this synthetic run
        if query::spawning_blocked(&sequencer) {
            sequencer.leave_special_zone();
        }

        while right_bounds
            .first()
            .is_some_and(|right| *right < player_x - VIEW_BEHIND)
        {
            let _ = right_bounds.remove(0);
            sequencer.segment_recycled();
            recycles += 1;
        }
    }

    println!(
        "done: {placements} placed, {recycles} recycled, stage {}, difficulty {}, height {}",
        query::stage(&sequencer).get(),
        query::difficulty(&sequencer).get(),
        query::height_index(&sequencer).get(),
    );
}

fn category_label(category: SegmentCategory) -> &'static str {
    match category {
        SegmentCategory::Ground => "ground",
        SegmentCategory::Transition => "transition",
        SegmentCategory::Jumper => "jumper",
    }
}

fn demo_content() -> ContentConfig {
    let generator = GeneratorConfig {
        number_of_heights: 3,
        base_stage_length: 400.0,
        max_active_segments: 12,
        spawn_anchor: WorldPosition::new(0.0, 0.0),
        stage_break_segment: Some(SegmentId::new("depot")),
        ..GeneratorConfig::default()
    };

    let segments = vec![
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
    ];

    ContentConfig {
        generator,
        segments,
    }
}
