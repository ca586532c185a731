use anyhow::{Context, Result};
use clap::Parser;
use detective_quest::{ConsoleDetective, Scenario, play};
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "detective-quest")]
#[command(about = "Explore the mansion, collect clues and accuse the culprit", long_about = None)]
struct Args {
    /// Scenario JSON file (defaults to the built-in mansion)
    #[arg(short, long, env = "DETECTIVE_SCENARIO")]
    scenario: Option<PathBuf>,

    /// Override the number of buckets of the clue -> suspect index
    #[arg(long)]
    buckets: Option<usize>,

    /// Validate the scenario and print a summary without playing
    #[arg(long)]
    check: bool,

    /// Start right away instead of waiting for ENTER
    #[arg(long)]
    skip_intro: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut scenario = match &args.scenario {
        Some(path) => Scenario::load(path)
            .with_context(|| format!("Failed to load scenario {}", path.display()))?,
        None => Scenario::mansion().context("Built-in scenario is invalid")?,
    };
    if let Some(buckets) = args.buckets {
        scenario.bucket_count = buckets;
    }
    let case = scenario
        .into_case()
        .context("Scenario failed validation")?;
    info!("Loaded case '{}'", case.title);

    if args.check {
        println!("Case: {}", case.title);
        println!("Rooms: {} (depth {})", case.graph.len(), case.graph.depth());
        for id in case.graph.iter() {
            match case.clue_at(id) {
                Some(clue) => println!("  {} -> {}", case.graph.name(id), clue),
                None => println!("  {}", case.graph.name(id)),
            }
        }
        println!("Suspects: {}", case.suspects.join(", "));
        println!(
            "Index: {} entries in {} buckets",
            case.index.len(),
            case.index.bucket_count()
        );
        for bucket in 0..case.index.bucket_count() {
            println!("  bucket {}: {}", bucket, case.index.chain_len(bucket));
        }
        println!("Testimony:");
        for (clue, suspect) in case.index.entries() {
            println!("  {} -> {}", clue, suspect);
        }
        return Ok(());
    }

    {
        let mut detective = ConsoleDetective::new(io::stdin().lock(), io::stdout().lock());
        if args.skip_intro {
            detective = detective.skip_intro();
        }
        play(&case, &mut detective)?;
    }

    println!("\n========================================");
    println!("Thanks for playing Detective Quest!");
    println!("========================================");

    Ok(())
}
