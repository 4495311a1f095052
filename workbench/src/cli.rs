use anyhow::anyhow;
use clap::Parser;
use point_cloud_viewer::navigation::orbit_navigation::ZoomMode;
use point_cloud_viewer::renderer::settings::RenderMode;
use std::path::PathBuf;
use std::str::FromStr;

/// Viewer for point clouds stored as `x y z [r g b]` text files.
#[derive(Debug, Parser)]
pub struct AppOptions {
    /// Verbosity of the command line output.
    #[clap(long, default_value = "info")]
    pub log_level: log::Level,

    /// The multisampling level used during rendering.
    /// Must be a power of 2. A value of `0` disables multisampling.
    #[clap(long, default_value = "2")]
    pub multisampling: u16,

    /// Zoom behaviour of the camera: 'linear' or 'log'.
    /// Defaults to the value from the settings file.
    #[clap(long)]
    pub zoom: Option<ZoomArg>,

    /// How the points are colored: 'elevation' or 'rgb'.
    /// Defaults to the value from the settings file.
    #[clap(long)]
    pub render_mode: Option<RenderModeArg>,

    /// Settings file to use instead of the one in the user config directory.
    #[clap(long)]
    pub settings: Option<PathBuf>,

    /// Prints the machine code, that is needed to request an activation code, and exits.
    #[clap(long)]
    pub machine_code: bool,

    /// User name of the activation.
    #[clap(long, requires = "activate_code")]
    pub activate_user: Option<String>,

    /// Activation code for the user and this machine.
    #[clap(long, requires = "activate_user")]
    pub activate_code: Option<String>,

    /// Activates the license for one year, instead of permanently.
    #[clap(long, requires = "activate_user")]
    pub activate_per_year: bool,

    /// Point file to open. Files ending with `.dcpro` are opened as a project.
    #[clap()]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ZoomArg {
    Linear,
    Log,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RenderModeArg {
    Elevation,
    Rgb,
}

impl FromStr for ZoomArg {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linear" => Ok(ZoomArg::Linear),
            "log" => Ok(ZoomArg::Log),
            _ => Err(anyhow!("Invalid value. Must be either 'linear' or 'log'.")),
        }
    }
}

impl FromStr for RenderModeArg {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "elevation" => Ok(RenderModeArg::Elevation),
            "rgb" => Ok(RenderModeArg::Rgb),
            _ => Err(anyhow!(
                "Invalid value. Must be either 'elevation' or 'rgb'."
            )),
        }
    }
}

impl From<ZoomArg> for ZoomMode {
    fn from(arg: ZoomArg) -> Self {
        match arg {
            ZoomArg::Linear => ZoomMode::linear(),
            ZoomArg::Log => ZoomMode::logarithmic(),
        }
    }
}

impl From<RenderModeArg> for RenderMode {
    fn from(arg: RenderModeArg) -> Self {
        match arg {
            RenderModeArg::Elevation => RenderMode::Elevation,
            RenderModeArg::Rgb => RenderMode::Rgb,
        }
    }
}
