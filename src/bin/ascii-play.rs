use std::io::Write as _;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use ascii_frame_player::{DirectorySource, FramePlayer, PlayerConfig, PlayerStatus, PlayerView};
use clap::Parser;

/// Play an ASCII frame set in the terminal.
#[derive(Parser, Debug)]
#[command(name = "ascii-play", version)]
struct Cli {
    /// Directory holding frame sets.
    root: PathBuf,

    /// Frame set under the root (e.g. "colored").
    #[arg(long)]
    source: Option<String>,

    /// Number of frames; counted from the directory when omitted.
    #[arg(long)]
    frames: Option<usize>,

    /// Playback rate in frames per second.
    #[arg(long)]
    fps: Option<u32>,

    /// Player config TOML.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop after this many seconds.
    #[arg(long)]
    seconds: Option<f64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let local = tokio::task::LocalSet::new();
    local.block_on(&rt, run(cli))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let text = match &cli.config {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?,
        ),
        None => None,
    };
    let (mut config, count_from_disk) =
        merge_config(text.as_deref(), cli.source, cli.frames, cli.fps)?;

    let source = DirectorySource::new(&cli.root);
    if count_from_disk {
        match source.count_frames(&config.source).await {
            Ok(n) if n > 0 => config.frame_count = n,
            _ => {}
        }
    }

    let mut player = FramePlayer::create(config)?;
    tokio::task::spawn_local(player.load(source));

    let deadline = cli
        .seconds
        .map(|s| Instant::now() + Duration::from_secs_f64(s.max(0.0)));
    let mut ticker = tokio::time::interval(Duration::from_millis(16));
    let mut ctrl_c = std::pin::pin!(tokio::signal::ctrl_c());

    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            _ = ticker.tick() => {}
        }

        let now = Instant::now();
        if player.tick(now) {
            draw(&player.view())?;
        }
        if player.status() == PlayerStatus::Error {
            let view = player.view();
            let error = view.error.map(|e| e.to_string()).unwrap_or_default();
            anyhow::bail!("{error} (path: {}/{})", cli.root.display(), view.source);
        }
        if deadline.is_some_and(|d| now >= d) {
            break;
        }
    }

    player.dispose();
    Ok(())
}

/// Merge the config file with command-line overrides.
///
/// The returned flag is true when neither `--frames` nor the file set a
/// frame count, so the count should come from the directory.
fn merge_config(
    text: Option<&str>,
    source: Option<String>,
    frames: Option<usize>,
    fps: Option<u32>,
) -> anyhow::Result<(PlayerConfig, bool)> {
    let (mut config, file_sets_count) = match text {
        Some(text) => {
            let table: toml::Table = text.parse().context("parsing config")?;
            (PlayerConfig::from_toml_str(text)?, table.contains_key("frame_count"))
        }
        None => (PlayerConfig::default(), false),
    };
    if let Some(source) = source {
        config.source = source;
    }
    if let Some(fps) = fps {
        config.fps = fps;
    }
    if let Some(frames) = frames {
        config.frame_count = frames;
    }
    Ok((config, frames.is_none() && !file_sets_count))
}

fn draw(view: &PlayerView<'_>) -> std::io::Result<()> {
    let mut out = std::io::stdout().lock();
    write!(out, "\x1b[H\x1b[2J")?;
    match view.status {
        PlayerStatus::Loading => writeln!(out, "Loading frames... {}", view.loading_message())?,
        _ => {
            out.write_all(view.frame.as_bytes())?;
            if view.show_controls {
                writeln!(out, "\n[{}] {}", view.play_label(), view.position_label())?;
            }
        }
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_file_frame_count_is_kept() {
        let (config, count_from_disk) =
            merge_config(Some("source = \"m\"\nframe_count = 50"), None, None, None).unwrap();
        assert_eq!(config.frame_count, 50);
        assert_eq!(config.source, "m");
        assert!(!count_from_disk);
    }

    #[test]
    fn flag_overrides_config_file() {
        let (config, count_from_disk) =
            merge_config(Some("frame_count = 50\nfps = 12"), Some("c".into()), Some(10), Some(30)).unwrap();
        assert_eq!(config.frame_count, 10);
        assert_eq!(config.fps, 30);
        assert_eq!(config.source, "c");
        assert!(!count_from_disk);
    }

    #[test]
    fn count_from_disk_when_unset() {
        let (_, count_from_disk) = merge_config(Some("fps = 48"), None, None, None).unwrap();
        assert!(count_from_disk);

        let (config, count_from_disk) = merge_config(None, None, None, None).unwrap();
        assert_eq!(config.frame_count, 161);
        assert!(count_from_disk);
    }
}
