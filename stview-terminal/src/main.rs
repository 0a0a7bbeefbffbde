/// stview Terminal - structural model preview
///
/// Renders a node/member dataset as ASCII art in the terminal.
/// Controls:
///   - Arrow Keys / left drag: Orbit
///   - WASD / right drag: Pan
///   - +/- / mouse wheel: Zoom
///   - R: Reset camera
///   - Q/ESC: Quit

use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use stview_core::{StructuralModel, ViewerConfig};
use stview_terminal::TerminalApp;

#[derive(Debug, Parser)]
#[command(version, about = "ASCII preview of a structural node/member model")]
struct Cli {
    /// JSON array of node records (`Node`, `X`, `Y`, `Z`)
    #[arg(long, default_value = "data/nodes.json")]
    nodes: PathBuf,

    /// JSON array of member records (`Start Node`, `End Node`)
    #[arg(long, default_value = "data/members.json")]
    members: PathBuf,

    /// Viewer configuration overrides (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Target frames per second
    #[arg(long, default_value_t = 30)]
    fps: u32,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ViewerConfig::from_file(path)?,
        None => ViewerConfig::default(),
    };
    let model = StructuralModel::from_files(&cli.nodes, &cli.members)?;

    let mut app = TerminalApp::new(&model, &config, cli.fps)?;
    app.run()?;
    Ok(())
}
