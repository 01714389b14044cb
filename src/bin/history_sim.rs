//! World history simulation binary
//!
//! Runs only the nation expansion phase and prints the final territories.

use clap::Parser;
use election_tactics::core::config::SimulationConfig;
use election_tactics::core::error::Result;
use election_tactics::history::WorldSimulation;
use election_tactics::map::generate_map;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[derive(Parser, Debug)]
#[command(name = "history_sim")]
#[command(about = "Let nations expand over a generated map")]
struct Args {
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    #[arg(long, default_value_t = 5)]
    nations: u32,

    #[arg(long, default_value_t = 200)]
    ticks: u32,

    /// Print every history event
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("election_tactics=warn")
        .init();

    let args = Args::parse();
    let mut config = SimulationConfig::default();
    config.map.seed = args.seed;

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let map = generate_map(&config.map, &mut rng)?;
    println!(
        "Map: {} land regions on {} landmasses, {} water bodies",
        map.num_land_regions(),
        map.num_landmasses(),
        map.num_water_bodies()
    );

    let mut sim = WorldSimulation::new(map, rng);
    sim.seed_nations(args.nations)?;
    let active = sim.run(args.ticks)?;
    println!("{} of {} ticks changed the map\n", active, sim.world.tick);

    if args.verbose {
        for event in &sim.history.events {
            println!("[{:>4}] {}", event.tick, event.message);
        }
        println!();
    }

    let mut nations: Vec<_> = sim.world.nations.iter().collect();
    nations.sort_by(|a, b| b.size().cmp(&a.size()).then(a.id.cmp(&b.id)));
    for nation in nations {
        println!(
            "{:<14} {:>3} regions  area {:>6.2}  {} cluster(s)",
            nation.name,
            nation.size(),
            nation.area,
            nation.clusters.len()
        );
    }

    Ok(())
}
