//! Scene viewer
//!
//! Usage: `kelpie [scene.json] [--config engine.toml]`

use std::path::PathBuf;

use anyhow::Context;
use clap::{value_parser, Arg, ArgMatches, Command};
use kelpie::{Config, EngineConfig, KelpieApp};

fn cli() -> Command {
    Command::new("kelpie")
        .about("Load a JSON scene and explore it in a window")
        .arg(
            Arg::new("scene")
                .value_name("SCENE")
                .help("Scene description to load")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .help("Engine settings (.toml or .json)")
                .value_parser(value_parser!(PathBuf)),
        )
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<EngineConfig> {
    match matches.get_one::<PathBuf>("config") {
        Some(path) => EngineConfig::load_from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    let config = load_config(&matches)?;
    let scene_path = matches.get_one::<PathBuf>("scene").cloned();

    KelpieApp::new(config, scene_path).run()
}
