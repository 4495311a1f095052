//! Extension modules.
//!
//! A module contributes menus of actions. Each action executes a [ViewerCommand] and can be bound
//! to a keyboard shortcut. Modules are registered at compile time with a [ModuleRegistry].

use crate::renderer::settings::RenderMode;
use crate::renderer::viewer_command::ViewerCommand;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Keys, that shortcuts can be bound to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Key {
    /// A letter or digit. Letters are always lowercase.
    Char(char),

    /// A function key, F1 to F12.
    F(u8),
    Home,
    Escape,
    Delete,
}

/// A key, optionally combined with the control key.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Shortcut {
    pub key: Key,
    pub ctrl: bool,
}

impl Shortcut {
    pub const fn key(key: Key) -> Self {
        Shortcut { key, ctrl: false }
    }

    pub const fn ctrl(key: Key) -> Self {
        Shortcut { key, ctrl: true }
    }
}

impl Display for Shortcut {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.ctrl {
            write!(f, "Ctrl+")?;
        }
        match self.key {
            Key::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
            Key::F(n) => write!(f, "F{}", n),
            Key::Home => write!(f, "Home"),
            Key::Escape => write!(f, "Esc"),
            Key::Delete => write!(f, "Del"),
        }
    }
}

/// A single menu entry.
#[derive(Clone, Debug, PartialEq)]
pub struct Action {
    pub title: String,
    pub shortcut: Option<Shortcut>,
    pub command: ViewerCommand,
}

impl Action {
    pub fn new(title: &str, shortcut: Option<Shortcut>, command: ViewerCommand) -> Self {
        Action {
            title: title.to_string(),
            shortcut,
            command,
        }
    }
}

/// A menu contributed by a module.
#[derive(Clone, Debug, PartialEq)]
pub struct ModuleMenu {
    pub title: String,
    pub actions: Vec<Action>,
}

/// An extension of the workbench.
pub trait Module {
    /// Name of the module. Modules with an empty name never get a menu of their own.
    fn name(&self) -> &str;

    fn menus(&self) -> Vec<ModuleMenu>;
}

/// Defines, how the menus of the modules are arranged in the menu bar.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize, Default)]
pub enum MenuStyle {
    /// Every module menu is a top level menu.
    #[default]
    Expand,

    /// The menus of each module are grouped in one top level menu, titled with the module name.
    Nested,
}

/// An entry of the menu bar.
#[derive(Clone, Debug, PartialEq)]
pub enum MenuItem {
    Submenu { title: String, items: Vec<MenuItem> },
    Action(Action),
}

#[derive(Debug, Error)]
pub enum ModuleError {
    #[error("The shortcut {shortcut} of module `{module}` is already used by `{used_by}`.")]
    ShortcutConflict {
        shortcut: Shortcut,
        module: String,
        used_by: String,
    },
}

struct RegisteredModule {
    name: String,
    menus: Vec<ModuleMenu>,
}

/// All modules of the application.
#[derive(Default)]
pub struct ModuleRegistry {
    modules: Vec<RegisteredModule>,
    shortcuts: HashMap<Shortcut, (String, ViewerCommand)>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a module.
    ///
    /// Fails without registering anything, if one of its shortcuts is already bound.
    pub fn register<M: Module>(&mut self, module: &M) -> Result<(), ModuleError> {
        let name = module.name().to_string();
        let menus = module.menus();

        let mut new_shortcuts = HashMap::new();
        for action in menus.iter().flat_map(|m| &m.actions) {
            if let Some(shortcut) = action.shortcut {
                let used_by = self
                    .shortcuts
                    .get(&shortcut)
                    .map(|(module, _)| module.clone())
                    .or_else(|| new_shortcuts.get(&shortcut).map(|_| name.clone()));
                if let Some(used_by) = used_by {
                    return Err(ModuleError::ShortcutConflict {
                        shortcut,
                        module: name,
                        used_by,
                    });
                }
                new_shortcuts.insert(shortcut, (name.clone(), action.command.clone()));
            }
        }

        self.shortcuts.extend(new_shortcuts);
        self.modules.push(RegisteredModule { name, menus });
        Ok(())
    }

    /// The command bound to the given shortcut.
    pub fn command_for(&self, shortcut: Shortcut) -> Option<&ViewerCommand> {
        self.shortcuts.get(&shortcut).map(|(_, command)| command)
    }

    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().map(|m| m.name.as_str())
    }

    /// Builds the menu bar.
    pub fn menu_bar(&self, style: MenuStyle) -> Vec<MenuItem> {
        let mut bar = Vec::new();
        for module in &self.modules {
            let submenus = module.menus.iter().map(|menu| MenuItem::Submenu {
                title: menu.title.clone(),
                items: menu.actions.iter().cloned().map(MenuItem::Action).collect(),
            });
            if style == MenuStyle::Nested && !module.name.is_empty() {
                bar.push(MenuItem::Submenu {
                    title: module.name.clone(),
                    items: submenus.collect(),
                });
            } else {
                bar.extend(submenus);
            }
        }
        bar
    }

    /// Renders the menu bar as indented text.
    pub fn describe_menu_bar(&self, style: MenuStyle) -> String {
        fn describe(item: &MenuItem, depth: usize, out: &mut String) {
            let indent = "  ".repeat(depth);
            match item {
                MenuItem::Submenu { title, items } => {
                    out.push_str(&format!("{}{}\n", indent, title));
                    for child in items {
                        describe(child, depth + 1, out);
                    }
                }
                MenuItem::Action(action) => match action.shortcut {
                    Some(shortcut) => {
                        out.push_str(&format!("{}{} [{}]\n", indent, action.title, shortcut))
                    }
                    None => out.push_str(&format!("{}{}\n", indent, action.title)),
                },
            }
        }

        let mut out = String::new();
        for item in self.menu_bar(style) {
            describe(&item, 0, &mut out);
        }
        out
    }
}

/// The built-in actions of the viewer.
pub struct ViewModule;

impl Module for ViewModule {
    fn name(&self) -> &str {
        ""
    }

    fn menus(&self) -> Vec<ModuleMenu> {
        vec![
            ModuleMenu {
                title: "File".to_string(),
                actions: vec![
                    Action::new(
                        "New viewer",
                        Some(Shortcut::key(Key::Char('n'))),
                        ViewerCommand::OpenViewer { file: None },
                    ),
                    Action::new(
                        "Close viewer",
                        Some(Shortcut::key(Key::Char('w'))),
                        ViewerCommand::CloseActiveViewer,
                    ),
                    Action::new(
                        "Quit",
                        Some(Shortcut::ctrl(Key::Char('q'))),
                        ViewerCommand::Terminate,
                    ),
                ],
            },
            ModuleMenu {
                title: "View".to_string(),
                actions: vec![
                    Action::new(
                        "Elevation colors",
                        Some(Shortcut::key(Key::Char('e'))),
                        ViewerCommand::SetRenderMode(RenderMode::Elevation),
                    ),
                    Action::new(
                        "RGB colors",
                        Some(Shortcut::key(Key::Char('r'))),
                        ViewerCommand::SetRenderMode(RenderMode::Rgb),
                    ),
                    Action::new(
                        "Reset view",
                        Some(Shortcut::key(Key::Home)),
                        ViewerCommand::ResetView,
                    ),
                    Action::new(
                        "Color bar",
                        Some(Shortcut::key(Key::Char('c'))),
                        ViewerCommand::ToggleColorBar,
                    ),
                    Action::new(
                        "Bounding box",
                        Some(Shortcut::key(Key::Char('b'))),
                        ViewerCommand::ToggleBoundingBox,
                    ),
                    Action::new(
                        "Axis",
                        Some(Shortcut::key(Key::Char('x'))),
                        ViewerCommand::ToggleAxis,
                    ),
                    Action::new(
                        "Axis placement",
                        Some(Shortcut::key(Key::Char('a'))),
                        ViewerCommand::CycleAxisAnchor,
                    ),
                ],
            },
            ModuleMenu {
                title: "Window".to_string(),
                actions: vec![Action::new(
                    "Cascade",
                    Some(Shortcut::key(Key::Char('k'))),
                    ViewerCommand::Cascade,
                )],
            },
        ]
    }
}
