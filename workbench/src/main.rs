use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::Parser;
use cli::AppOptions;
use human_panic::setup_panic;
use license_manager::{ActivationMode, LicenseManager, LicenseState};
use log::{debug, error, info, warn};
use plugins::HelpModule;
use point_cloud_viewer::modules::{ModuleRegistry, ViewModule};
use point_cloud_viewer::renderer::backends::glium::GliumRenderOptions;
use point_cloud_viewer::renderer::settings::BaseRenderSettings;
use point_cloud_viewer::renderer::viewer_command::ViewerCommand;
use project::{is_project_file, Project};
use settings::{default_settings_file, WorkbenchSettings};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

mod cli;
mod plugins;
mod project;
mod settings;

const ORGANIZATION: &str = "DCLW";
const APPLICATION: &str = "Point Cloud Workbench";
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> ExitCode {
    setup_panic!();

    // arg parsing
    let args = AppOptions::parse();

    // logger
    if let Err(e) = simple_logger::init_with_level(args.log_level) {
        eprintln!("Could not initialize logging: {e}");
    }

    // run
    if let Err(e) = run(args) {
        error!("{e}");
        debug!("{e:?}");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run(args: AppOptions) -> Result<()> {
    let license = LicenseManager::new(&license_directory(), ORGANIZATION, APPLICATION, VERSION);
    if args.machine_code {
        println!("{}", license.machine_code());
        return Ok(());
    }
    if let (Some(user), Some(code)) = (&args.activate_user, &args.activate_code) {
        return activate(&license, user, code, args.activate_per_year);
    }
    check_license(&license)?;

    // settings
    let settings_file = args.settings.clone().or_else(default_settings_file);
    let mut settings = WorkbenchSettings::load_or_default(settings_file.as_deref());

    // modules
    let mut registry = ModuleRegistry::new();
    registry.register(&ViewModule)?;
    registry.register(&HelpModule)?;

    // initial viewers
    let startup = startup_commands(args.file.as_deref())?;

    let options = GliumRenderOptions {
        multisampling: args.multisampling,
        zoom_mode: args.zoom.map(Into::into).unwrap_or(settings.zoom_mode),
        render_settings: BaseRenderSettings {
            render_mode: args.render_mode.map(Into::into).unwrap_or(settings.render_mode),
            ..Default::default()
        },
        window_geometry: settings.window,
        menu_style: settings.menu_style,
    };
    info!("Starting {} {}", APPLICATION, VERSION);
    options.run(registry, startup, move |session| {
        settings.update_from_session(&session);
        if let Some(file) = settings_file {
            save_settings(&settings, &file);
        }
    })
}

/// Opens a project, a single point file, or an empty viewer.
fn startup_commands(file: Option<&Path>) -> Result<Vec<ViewerCommand>> {
    let commands = match file {
        Some(file) if is_project_file(file) => Project::load_from_file(file)
            .with_context(|| format!("Could not open project {}", file.display()))?
            .to_commands(),
        Some(file) => vec![ViewerCommand::OpenViewer {
            file: Some(file.to_owned()),
        }],
        None => vec![ViewerCommand::OpenViewer { file: None }],
    };
    Ok(commands)
}

fn license_directory() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join(ORGANIZATION))
        .unwrap_or_else(std::env::temp_dir)
}

fn activate(license: &LicenseManager, user: &str, code: &str, per_year: bool) -> Result<()> {
    let mode = if per_year {
        ActivationMode::PerYear
    } else {
        ActivationMode::OneTime
    };
    let record = license.activate(user, code, mode, Local::now().date_naive())?;
    match license_manager::date_of_day(record.expiry_day) {
        Some(date) if mode == ActivationMode::PerYear => {
            println!("License activated for {user} until {date}.")
        }
        _ => println!("License activated for {user}."),
    }
    Ok(())
}

fn check_license(license: &LicenseManager) -> Result<()> {
    let state = match license.state() {
        Ok(state) => state,
        Err(e) => {
            warn!("Could not check the license: {e}");
            LicenseState::Invalid
        }
    };
    match state {
        LicenseState::Activated => info!("License: activated"),
        LicenseState::Trial => {
            let days = license.remaining_days()?;
            info!("License: trial, {days} days remaining");
        }
        LicenseState::Invalid => {
            let machine_code = license.machine_code();
            if cfg!(feature = "require-license") {
                bail!("No valid license. Request an activation code for the machine code {machine_code}.");
            }
            warn!("No valid license. Request an activation code for the machine code {machine_code}.");
        }
    }
    Ok(())
}

fn save_settings(settings: &WorkbenchSettings, file: &Path) {
    match settings.save_to_file(file) {
        Ok(()) => debug!("Saved settings to {}", file.display()),
        Err(e) => warn!("Could not save settings to {}: {}", file.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::startup_commands;
    use point_cloud_viewer::renderer::viewer_command::ViewerCommand;
    use std::path::{Path, PathBuf};

    #[test]
    fn test_startup_without_file_opens_empty_viewer() {
        assert_eq!(
            startup_commands(None).unwrap(),
            vec![ViewerCommand::OpenViewer { file: None }]
        );
    }

    #[test]
    fn test_startup_with_point_file() {
        assert_eq!(
            startup_commands(Some(Path::new("scan.txt"))).unwrap(),
            vec![ViewerCommand::OpenViewer {
                file: Some(PathBuf::from("scan.txt"))
            }]
        );
    }

    #[test]
    fn test_startup_with_project() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("Site.DCPRO");
        std::fs::write(&file, r#"{"viewers": [{"files": ["a.txt"]}, {}]}"#).unwrap();
        assert_eq!(
            startup_commands(Some(&file)).unwrap(),
            vec![
                ViewerCommand::OpenViewer {
                    file: Some(dir.path().join("a.txt"))
                },
                ViewerCommand::OpenViewer { file: None },
            ]
        );
        assert!(startup_commands(Some(&dir.path().join("missing.dcpro"))).is_err());
    }
}
