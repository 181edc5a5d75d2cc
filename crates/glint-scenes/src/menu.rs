use glint_engine::render::Renderer;

use crate::{Scene, SceneError, SceneFactory};

/// Label of the button that returns from a scene to the menu.
pub const BACK_LABEL: &str = "<-";

struct ActiveScene {
    name: String,
    scene: Box<dyn Scene>,
}

enum MenuAction {
    Activate(String),
    Back,
}

/// Root scene: a registry of named factories plus at most one active scene.
///
/// While no scene is active the menu itself is current and its GUI lists one
/// button per registered scene. Activating drops the previous scene before the
/// new one is built, so GPU resources never overlap across a switch.
#[derive(Default)]
pub struct SceneMenu {
    entries: Vec<(String, SceneFactory)>,
    active: Option<ActiveScene>,
    pending: Option<MenuAction>,
}

impl SceneMenu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a factory under `name`. Registering a name again replaces its
    /// factory and keeps its position.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> anyhow::Result<Box<dyn Scene>> + 'static,
    {
        let name = name.into();
        let factory: SceneFactory = Box::new(factory);
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => {
                log::debug!("scene '{name}' re-registered");
                entry.1 = factory;
            }
            None => {
                log::debug!("scene '{name}' registered");
                self.entries.push((name, factory));
            }
        }
    }

    /// Makes a fresh instance of `name` current.
    ///
    /// Any active scene is released first. If the factory fails the menu is
    /// left current.
    pub fn activate(&mut self, name: &str) -> Result<(), SceneError> {
        let index = self
            .entries
            .iter()
            .position(|(n, _)| n == name)
            .ok_or_else(|| SceneError::UnknownScene(name.to_string()))?;

        self.go_back();

        let (name, factory) = &self.entries[index];
        match factory() {
            Ok(scene) => {
                log::info!("scene '{name}' activated");
                self.active = Some(ActiveScene {
                    name: name.clone(),
                    scene,
                });
                Ok(())
            }
            Err(source) => {
                log::error!("failed to build scene '{name}': {source:#}");
                Err(SceneError::Build {
                    name: name.clone(),
                    source,
                })
            }
        }
    }

    /// Releases the active scene and makes the menu current.
    ///
    /// Returns `false` (and does nothing) if the menu is already current.
    pub fn go_back(&mut self) -> bool {
        match self.active.take() {
            Some(active) => {
                let ActiveScene { name, scene } = active;
                drop(scene);
                log::info!("scene '{name}' released");
                true
            }
            None => false,
        }
    }

    /// Name of the active scene; `None` while the menu is current.
    pub fn current_name(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.name.as_str())
    }

    pub fn is_menu_current(&self) -> bool {
        self.active.is_none()
    }

    /// Registered names in display order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    fn apply_pending(&mut self) {
        match self.pending.take() {
            Some(MenuAction::Activate(name)) => {
                // Already logged; the menu stays current on failure.
                let _ = self.activate(&name);
            }
            Some(MenuAction::Back) => {
                self.go_back();
            }
            None => {}
        }
    }
}

impl Scene for SceneMenu {
    fn on_update(&mut self, dt: f32) {
        if let Some(active) = &mut self.active {
            active.scene.on_update(dt);
        }
    }

    fn on_render(&mut self, renderer: &Renderer) {
        if let Some(active) = &mut self.active {
            active.scene.on_render(renderer);
        }
    }

    /// Menu buttons, or the back button followed by the active scene's GUI.
    /// Clicks take effect once the whole GUI pass is done.
    fn on_gui_render(&mut self, ui: &mut egui::Ui) {
        match &mut self.active {
            None => {
                for (name, _) in &self.entries {
                    if ui.button(name.as_str()).clicked() {
                        self.pending = Some(MenuAction::Activate(name.clone()));
                    }
                }
            }
            Some(active) => {
                if ui.button(BACK_LABEL).clicked() {
                    self.pending = Some(MenuAction::Back);
                }
                active.scene.on_gui_render(ui);
            }
        }

        self.apply_pending();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use glint_engine::device::{Gl, HeadlessApi};

    use super::*;

    type Journal = Rc<RefCell<Vec<String>>>;

    /// Records every callback and flags its own drop.
    struct Probe {
        tag: &'static str,
        journal: Journal,
        dropped: Rc<Cell<bool>>,
    }

    impl Scene for Probe {
        fn on_update(&mut self, dt: f32) {
            self.journal.borrow_mut().push(format!("{}:update:{dt}", self.tag));
        }

        fn on_render(&mut self, _renderer: &Renderer) {
            self.journal.borrow_mut().push(format!("{}:render", self.tag));
        }

        fn on_gui_render(&mut self, _ui: &mut egui::Ui) {
            self.journal.borrow_mut().push(format!("{}:gui", self.tag));
        }
    }

    impl Drop for Probe {
        fn drop(&mut self) {
            self.dropped.set(true);
            self.journal.borrow_mut().push(format!("{}:drop", self.tag));
        }
    }

    fn probe_factory(
        tag: &'static str,
        journal: &Journal,
        dropped: &Rc<Cell<bool>>,
    ) -> impl Fn() -> anyhow::Result<Box<dyn Scene>> + 'static {
        let journal = journal.clone();
        let dropped = dropped.clone();
        move || {
            dropped.set(false);
            journal.borrow_mut().push(format!("{tag}:build"));
            Ok(Box::new(Probe {
                tag,
                journal: journal.clone(),
                dropped: dropped.clone(),
            }) as Box<dyn Scene>)
        }
    }

    fn renderer() -> Renderer {
        let gl: Gl = Rc::new(HeadlessApi::new());
        Renderer::new(&gl)
    }

    fn run_gui(menu: &mut SceneMenu) {
        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| menu.on_gui_render(ui));
        });
    }

    #[test]
    fn registration_keeps_order_and_replaces_in_place() {
        let mut menu = SceneMenu::new();
        menu.register("Clear Color", || anyhow::bail!("first"));
        menu.register("Texture 2D", || anyhow::bail!("second"));
        menu.register("Clear Color", || anyhow::bail!("replaced"));

        assert_eq!(menu.names().collect::<Vec<_>>(), vec!["Clear Color", "Texture 2D"]);

        let err = menu.activate("Clear Color").unwrap_err();
        let SceneError::Build { source, .. } = err else {
            panic!("expected build error");
        };
        assert_eq!(source.to_string(), "replaced");
    }

    #[test]
    fn activate_then_go_back_releases_the_scene() {
        let journal = Journal::default();
        let a_dropped = Rc::new(Cell::new(false));
        let b_dropped = Rc::new(Cell::new(false));

        let mut menu = SceneMenu::new();
        menu.register("A", probe_factory("a", &journal, &a_dropped));
        menu.register("B", probe_factory("b", &journal, &b_dropped));
        assert!(menu.is_menu_current());

        menu.activate("A").unwrap();
        assert_eq!(menu.current_name(), Some("A"));

        let renderer = renderer();
        menu.on_update(0.5);
        menu.on_render(&renderer);

        assert!(menu.go_back());
        assert!(menu.is_menu_current());
        assert!(a_dropped.get());

        // No further callbacks reach the released scene.
        menu.on_update(1.0);
        menu.on_render(&renderer);
        assert_eq!(
            *journal.borrow(),
            vec!["a:build", "a:update:0.5", "a:render", "a:drop"]
        );
        assert!(!b_dropped.get());
    }

    #[test]
    fn switching_drops_old_scene_before_building_new_one() {
        let journal = Journal::default();
        let dropped = Rc::new(Cell::new(false));

        let mut menu = SceneMenu::new();
        menu.register("A", probe_factory("a", &journal, &dropped));
        menu.register("B", probe_factory("b", &journal, &Rc::new(Cell::new(false))));

        menu.activate("A").unwrap();
        menu.activate("B").unwrap();

        assert_eq!(menu.current_name(), Some("B"));
        assert_eq!(*journal.borrow(), vec!["a:build", "a:drop", "b:build"]);
    }

    #[test]
    fn go_back_on_menu_is_a_no_op() {
        let mut menu = SceneMenu::new();
        assert!(!menu.go_back());
        assert!(menu.is_menu_current());
    }

    #[test]
    fn unknown_name_leaves_state_untouched() {
        let journal = Journal::default();
        let dropped = Rc::new(Cell::new(false));
        let mut menu = SceneMenu::new();
        menu.register("A", probe_factory("a", &journal, &dropped));
        menu.activate("A").unwrap();

        let err = menu.activate("Missing").unwrap_err();
        assert!(matches!(err, SceneError::UnknownScene(ref n) if n == "Missing"));
        assert_eq!(menu.current_name(), Some("A"));
        assert!(!dropped.get());
    }

    #[test]
    fn failing_factory_leaves_menu_current() {
        let journal = Journal::default();
        let dropped = Rc::new(Cell::new(false));
        let mut menu = SceneMenu::new();
        menu.register("A", probe_factory("a", &journal, &dropped));
        menu.register("Broken", || anyhow::bail!("shader missing"));

        menu.activate("A").unwrap();
        let err = menu.activate("Broken").unwrap_err();

        assert!(matches!(err, SceneError::Build { ref name, .. } if name == "Broken"));
        assert!(menu.is_menu_current());
        assert!(dropped.get());
    }

    #[test]
    fn gui_pass_reaches_active_scene_only() {
        let journal = Journal::default();
        let dropped = Rc::new(Cell::new(false));
        let mut menu = SceneMenu::new();
        menu.register("A", probe_factory("a", &journal, &dropped));

        run_gui(&mut menu);
        assert_eq!(journal.borrow().len(), 0);

        menu.activate("A").unwrap();
        run_gui(&mut menu);
        assert_eq!(journal.borrow().last().map(String::as_str), Some("a:gui"));
        assert_eq!(menu.current_name(), Some("A"));
    }

    #[test]
    fn drop_of_menu_releases_active_scene() {
        let journal = Journal::default();
        let dropped = Rc::new(Cell::new(false));
        {
            let mut menu = SceneMenu::new();
            menu.register("A", probe_factory("a", &journal, &dropped));
            menu.activate("A").unwrap();
        }
        assert!(dropped.get());
    }
}
