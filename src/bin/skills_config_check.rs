use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;

use skill_balls::GameConfig;

#[derive(Parser, Debug)]
#[command(about = "Load the layered skill board config and report problems", version)]
struct Args {
    /// Config layers, later files override earlier ones.
    #[arg(long = "config", default_values = ["assets/config/game.ron", "assets/config/game.local.ron"])]
    configs: Vec<PathBuf>,
    /// Treat validation warnings as errors.
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let (cfg, used, errors) = GameConfig::load_layered(args.configs.iter());
    for u in &used {
        println!("used: {u}");
    }
    for e in &errors {
        println!("error: {e}");
    }
    let warnings = cfg.validate();
    for w in &warnings {
        println!("warning: {w}");
    }
    println!(
        "skills={} window={}x{} radius={} gesture.drag_threshold={}",
        cfg.skills.len(),
        cfg.window.width,
        cfg.window.height,
        cfg.balls.radius,
        cfg.gesture.drag_threshold
    );
    if used.is_empty() {
        bail!("no readable config layer among {:?}", args.configs);
    }
    // a missing local override is normal; unreadable base or broken RON is not
    let hard: Vec<&String> = errors.iter().filter(|e| !e.contains("read error")).collect();
    if !hard.is_empty() {
        bail!("{} config error(s)", hard.len());
    }
    if args.strict && !warnings.is_empty() {
        bail!("{} validation warning(s) in strict mode", warnings.len());
    }
    Ok(())
}
