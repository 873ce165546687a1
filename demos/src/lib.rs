//! Shared setup code of the `trifle` demo programs.
//!
//! Every demo renders a single frame and writes it to a PPM file. The
//! image size, thread count, multisampling mode and output path are read
//! from the TOML file named by the `TRIFLE_CONFIG` environment variable,
//! or from `trifle.toml` in the working directory if it exists.
//! Missing settings get their default values.
//!
//! ```toml
//! width = 800
//! height = 600
//! threads = 4
//! msaa = "rotated4"
//! output = "frame.ppm"
//! ```

use std::error::Error;
use std::path::{Path, PathBuf};
use std::{env, fs};

use log::{debug, info};
use serde::Deserialize;

use re::math::Color4f;
use re::render::{Context, Framebuf, Msaa, Stats, present_with};
use re::util::{buf::Buf2, pnm::save_ppm};

/// Name of the environment variable giving the path of the config file.
pub const CONFIG_VAR: &str = "TRIFLE_CONFIG";

/// Config file read if `CONFIG_VAR` is not set.
pub const DEFAULT_CONFIG: &str = "trifle.toml";

/// Demo settings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Number of rasterizer worker threads.
    pub threads: usize,
    /// Multisampling pattern.
    pub msaa: MsaaMode,
    /// Path of the output image.
    pub output: Option<PathBuf>,
}

/// Multisampling pattern names accepted in config files.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MsaaMode {
    #[default]
    Off,
    Grid2x2,
    Rotated4,
}

/// The color and depth buffers the demos render into.
pub type Frame = Framebuf<Buf2<Color4f>, Buf2<f32>>;

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            threads: std::thread::available_parallelism()
                .map_or(1, |n| n.get()),
            msaa: MsaaMode::Off,
            output: None,
        }
    }
}

impl DemoConfig {
    /// Loads the config from the file given by [`CONFIG_VAR`], or from
    /// [`DEFAULT_CONFIG`] if it exists. Otherwise returns the defaults.
    ///
    /// # Errors
    /// If the config file cannot be read or is not valid.
    pub fn load() -> Result<Self, Box<dyn Error>> {
        match env::var_os(CONFIG_VAR) {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG).exists() => {
                Self::from_file(DEFAULT_CONFIG)
            }
            None => {
                debug!("no config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Reads the config from the TOML file at `path`.
    ///
    /// # Errors
    /// If the file cannot be read or is not valid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let path = path.as_ref();
        debug!("reading config from {}", path.display());
        let cfg = Self::parse(&fs::read_to_string(path)?)?;
        Ok(cfg)
    }

    /// Parses the config from a TOML string.
    ///
    /// # Errors
    /// If `s` is not valid TOML or contains unknown or mistyped settings.
    pub fn parse(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Returns the output path, or `default` if none is configured.
    pub fn output_or(&self, default: &str) -> PathBuf {
        self.output.clone().unwrap_or_else(|| default.into())
    }

    /// Returns the aspect ratio of the image.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Returns a render context set up according to `self`.
    pub fn context(&self) -> Context {
        Context {
            threads: self.threads,
            msaa: self.msaa.into(),
            ..Context::default()
        }
    }

    /// Returns a new frame of the configured size.
    pub fn frame(&self) -> Frame {
        let (w, h) = (self.width as usize, self.height as usize);
        Framebuf {
            color_buf: Buf2::new_default(w, h),
            depth_buf: Buf2::new_default(w, h),
        }
    }
}

impl From<MsaaMode> for Msaa {
    fn from(m: MsaaMode) -> Self {
        match m {
            MsaaMode::Off => Msaa::Off,
            MsaaMode::Grid2x2 => Msaa::Grid2x2,
            MsaaMode::Rotated4 => Msaa::Rotated4,
        }
    }
}

/// Initializes logging and loads the demo config.
///
/// Logs at `info` level unless overridden with `RUST_LOG`.
///
/// # Errors
/// See [`DemoConfig::load`].
pub fn init() -> Result<DemoConfig, Box<dyn Error>> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let cfg = DemoConfig::load()?;
    info!(
        "{}x{}, {} threads, msaa {:?}",
        cfg.width, cfg.height, cfg.threads, cfg.msaa
    );
    Ok(cfg)
}

/// Gamma-corrects the color buffer of `frame` and writes it to `path`
/// as a PPM image, then logs the statistics collected in `ctx`.
///
/// # Errors
/// If writing the file fails.
pub fn save(
    frame: &Frame,
    path: impl AsRef<Path>,
    ctx: &Context,
) -> Result<(), Box<dyn Error>> {
    let path = path.as_ref();
    let src = &frame.color_buf;
    let mut out = Buf2::new_default(src.width(), src.height());
    present_with(src, &mut out, ctx.threads, |c| {
        c.to_srgb().to_rgb().to_color3()
    });
    save_ppm(path, out)?;

    let mut stats: Stats = ctx.stats.take();
    stats.frames = 1;
    info!("wrote {}\n{stats}", path.display());
    Ok(())
}
