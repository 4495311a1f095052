//! Modules of the workbench application.

use point_cloud_viewer::modules::{Action, Key, Module, ModuleMenu, Shortcut};
use point_cloud_viewer::renderer::viewer_command::ViewerCommand;

pub struct HelpModule;

impl Module for HelpModule {
    fn name(&self) -> &str {
        "Help"
    }

    fn menus(&self) -> Vec<ModuleMenu> {
        vec![ModuleMenu {
            title: "Help".to_string(),
            actions: vec![Action::new(
                "Show menu",
                Some(Shortcut::key(Key::F(1))),
                ViewerCommand::ShowMenu,
            )],
        }]
    }
}
