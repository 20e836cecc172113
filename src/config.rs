use anyhow::{Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use life_braille::{DotLayout, SpeedLevel};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub(crate) speed_level: SpeedLevel,
    pub(crate) cursor_step: u16,
    pub(crate) status_rows: u16,
    pub(crate) dot_layout: DotLayout,
    pub(crate) cursor_glyph: char,
    pub(crate) enable_color: bool,
    pub(crate) seed_density: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speed_level: SpeedLevel::default(),
            cursor_step: 5,
            status_rows: 7,
            dot_layout: DotLayout::Unicode,
            cursor_glyph: '■',
            enable_color: true,
            seed_density: 0.0,
        }
    }
}

#[derive(Parser, Debug, Default)]
#[command(about = "Conway's Game of Life on a braille dot-matrix canvas")]
pub(crate) struct Args {
    /// speed level, 1 (450 ms per generation) to 9 (50 ms)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=9))]
    pub(crate) speed: Option<u8>,

    /// logical cells the cursor moves per arrow press
    #[arg(long)]
    pub(crate) step: Option<u16>,

    /// terminal rows reserved for the status bar
    #[arg(long)]
    pub(crate) status_rows: Option<u16>,

    /// pack dots in row-major bit order instead of braille numbering
    #[arg(long)]
    pub(crate) row_major: bool,

    #[arg(long)]
    pub(crate) no_color: bool,

    /// fraction of cells alive at startup (0 = empty grid)
    #[arg(long)]
    pub(crate) seed_density: Option<f64>,

    /// where log output goes; defaults to the data directory
    #[arg(long)]
    pub(crate) log_file: Option<PathBuf>,
}

impl Settings {
    /// Settings for this run: the stored values with CLI flags on top.
    pub(crate) fn with_args(&self, args: &Args) -> Settings {
        let mut s = self.clone();
        if let Some(level) = args.speed {
            s.speed_level = SpeedLevel::clamped(level);
        }
        if let Some(step) = args.step {
            s.cursor_step = step;
        }
        if let Some(rows) = args.status_rows {
            s.status_rows = rows;
        }
        if args.row_major {
            s.dot_layout = DotLayout::RowMajor;
        }
        if args.no_color {
            s.enable_color = false;
        }
        if let Some(p) = args.seed_density {
            s.seed_density = p;
        }
        s.cursor_step = s.cursor_step.max(1);
        s.seed_density = s.seed_density.clamp(0.0, 1.0);
        s
    }
}

pub(crate) struct Paths {
    pub(crate) settings_path: PathBuf,
    pub(crate) log_path: PathBuf,
}

pub(crate) fn project_paths() -> Result<Paths> {
    let proj = ProjectDirs::from("com", "life-braille", "LifeBraille")
        .context("could not resolve project directories")?;
    let dir = proj.data_local_dir().to_path_buf();
    fs::create_dir_all(&dir).ok();
    Ok(Paths {
        settings_path: dir.join("settings.json"),
        log_path: dir.join("life-braille.log"),
    })
}

pub(crate) fn load_settings(path: &Path) -> Settings {
    if let Ok(s) = fs::read_to_string(path) {
        if let Ok(v) = serde_json::from_str::<Settings>(&s) {
            return v;
        }
        log::warn!("ignoring unreadable settings at {}", path.display());
    }
    Settings::default()
}

pub(crate) fn save_settings_atomic(path: &Path, s: &Settings) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(s)?;
    fs::write(&tmp, data).with_context(|| format!("writing {}", tmp.display()))?;
    atomic_rename(&tmp, path)?;
    Ok(())
}

fn atomic_rename(from: &Path, to: &Path) -> Result<()> {
    if to.exists() {
        let _ = fs::remove_file(to);
    }
    fs::rename(from, to)?;
    Ok(())
}

/// Route `log` output to a file; the terminal belongs to the UI.
pub(crate) fn init_logging(path: &Path) -> Result<()> {
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.speed_level.period().as_millis(), 100);
        assert_eq!(s.cursor_step, 5);
        assert_eq!(s.status_rows, 7);
        assert_eq!(s.dot_layout, DotLayout::Unicode);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let s: Settings = serde_json::from_str(r#"{"speed_level": 3, "dot_layout": "row_major"}"#)
            .unwrap();
        assert_eq!(s.speed_level, SpeedLevel::new(3).unwrap());
        assert_eq!(s.dot_layout, DotLayout::RowMajor);
        assert_eq!(s.cursor_step, 5);
    }

    #[test]
    fn bad_speed_in_file_is_rejected() {
        assert!(serde_json::from_str::<Settings>(r#"{"speed_level": 0}"#).is_err());
    }

    #[test]
    fn args_override_settings() {
        let args = Args::parse_from([
            "life-braille",
            "--speed",
            "2",
            "--step",
            "0",
            "--row-major",
            "--no-color",
            "--seed-density",
            "3.5",
        ]);
        let s = Settings::default().with_args(&args);
        assert_eq!(s.speed_level, SpeedLevel::new(2).unwrap());
        assert_eq!(s.cursor_step, 1);
        assert_eq!(s.dot_layout, DotLayout::RowMajor);
        assert!(!s.enable_color);
        assert_eq!(s.seed_density, 1.0);
    }

    #[test]
    fn speed_flag_range_checked() {
        assert!(Args::try_parse_from(["life-braille", "--speed", "10"]).is_err());
    }

    #[test]
    fn settings_round_trip_through_disk() {
        let dir = std::env::temp_dir().join(format!("life-braille-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.json");
        let s = Settings {
            cursor_step: 9,
            ..Settings::default()
        };
        save_settings_atomic(&path, &s).unwrap();
        assert_eq!(load_settings(&path), s);
        fs::remove_dir_all(&dir).ok();
    }
}
