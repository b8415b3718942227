use crate::frame::FrameOptions;
use crate::model::MoodState;
use anyhow::{Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub(crate) fps_cap: u32,
    pub(crate) enable_color: bool,
    pub(crate) enable_weather: bool,
    pub(crate) enable_timeline: bool,
    /// Particle seed; 0 picks one from the clock at startup.
    pub(crate) seed: u64,
    pub(crate) defaults: MoodState,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps_cap: 60,
            enable_color: true,
            enable_weather: true,
            enable_timeline: true,
            seed: 0,
            defaults: MoodState::default(),
        }
    }
}

impl Settings {
    pub(crate) fn frame_options(&self) -> FrameOptions {
        FrameOptions {
            weather: self.enable_weather,
            timeline: self.enable_timeline,
        }
    }
}

#[derive(Parser, Debug, Default)]
#[command(name = "moodbloom", version, about = "A flower that grows with your mood")]
pub(crate) struct Cli {
    /// frames per second (10-240)
    #[arg(long)]
    pub(crate) fps: Option<u32>,

    /// seed for rain and petal placement
    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// grayscale output for terminals without truecolor
    #[arg(long)]
    pub(crate) mono: bool,

    #[arg(long)]
    pub(crate) no_weather: bool,

    #[arg(long)]
    pub(crate) no_timeline: bool,

    /// starting motivation (0-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub(crate) motivation: Option<u8>,

    /// starting focus (0-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub(crate) focus: Option<u8>,

    /// starting stress (0-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub(crate) stress: Option<u8>,
}

impl Cli {
    /// Flags win over the saved settings for this run only.
    pub(crate) fn apply(&self, s: &mut Settings) {
        if let Some(fps) = self.fps {
            s.fps_cap = fps;
        }
        if let Some(seed) = self.seed {
            s.seed = seed;
        }
        if self.mono {
            s.enable_color = false;
        }
        if self.no_weather {
            s.enable_weather = false;
        }
        if self.no_timeline {
            s.enable_timeline = false;
        }
        if let Some(v) = self.motivation {
            s.defaults.motivation = v;
        }
        if let Some(v) = self.focus {
            s.defaults.focus = v;
        }
        if let Some(v) = self.stress {
            s.defaults.stress = v;
        }
    }
}

pub(crate) struct Paths {
    pub(crate) history_path: PathBuf,
    pub(crate) settings_path: PathBuf,
    pub(crate) log_path: PathBuf,
}

pub(crate) fn project_paths() -> Result<Paths> {
    let proj = ProjectDirs::from("com", "moodbloom", "Moodbloom")
        .context("could not resolve project directories")?;
    let dir = proj.data_local_dir().to_path_buf();
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    Ok(Paths {
        history_path: dir.join("history.json"),
        settings_path: dir.join("settings.json"),
        log_path: dir.join("moodbloom.log"),
    })
}

pub(crate) fn load_settings(path: &Path) -> Settings {
    match fs::read_to_string(path) {
        Ok(s) => match serde_json::from_str::<Settings>(&s) {
            Ok(mut v) => {
                v.defaults = v.defaults.clamped();
                v
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable settings");
                Settings::default()
            }
        },
        Err(_) => Settings::default(),
    }
}

pub(crate) fn save_settings_atomic(path: &Path, s: &Settings) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(s)?;
    fs::write(&tmp, data).with_context(|| format!("writing {}", tmp.display()))?;
    atomic_rename(&tmp, path)?;
    Ok(())
}

pub(crate) fn atomic_rename(from: &Path, to: &Path) -> Result<()> {
    // rename over an existing file fails on Windows
    if cfg!(windows) && to.exists() {
        let _ = fs::remove_file(to);
    }
    fs::rename(from, to).with_context(|| format!("replacing {}", to.display()))?;
    Ok(())
}
