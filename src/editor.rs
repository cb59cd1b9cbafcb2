//! Editor facade
//!
//! Owns the scene, the primitive builder and the selection controller and
//! wires them together the way a host UI drives them: load a layout, feed
//! pointer events, tick once per frame, export.

use std::path::Path;

use anyhow::Context;

use crate::config::BuildConfig;
use crate::error::{BuildError, LayoutError};
use crate::interaction::{
    Gizmo, InteractionState, PickCamera, PointerEvent, SelectionController, SelectionSink, Target,
};
use crate::layout::{default_layout, export_json, LayoutModel};
use crate::scene::{BuildSummary, DrawList, LayerId, PrimitiveBuilder, Scene};

#[derive(Debug)]
pub struct Editor<G: Gizmo, S: SelectionSink> {
    scene: Scene,
    builder: PrimitiveBuilder,
    controller: SelectionController<G, S>,
}

impl<G: Gizmo, S: SelectionSink> Editor<G, S> {
    /// Empty editor; nothing is built until a layout is loaded
    pub fn new(config: BuildConfig, gizmo: G, sink: S) -> Self {
        let mut scene = Scene::new();
        let controller = SelectionController::new(&mut scene, gizmo, sink);
        Self {
            scene,
            builder: PrimitiveBuilder::new(config),
            controller,
        }
    }

    /// Editor with the bundled demo board already built
    pub fn with_default_layout(config: BuildConfig, gizmo: G, sink: S) -> Result<Self, BuildError> {
        let mut editor = Self::new(config, gizmo, sink);
        editor.load(&default_layout())?;
        Ok(editor)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn builder(&self) -> &PrimitiveBuilder {
        &self.builder
    }

    pub fn controller(&self) -> &SelectionController<G, S> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut SelectionController<G, S> {
        &mut self.controller
    }

    pub fn state(&self) -> InteractionState {
        self.controller.state()
    }

    /// Rebuild from `model` and retarget the controller. On error the
    /// previous scene and targets stay live.
    pub fn load(&mut self, model: &LayoutModel) -> Result<BuildSummary, BuildError> {
        let summary = self.builder.build(&mut self.scene, model)?;
        self.controller.set_targets(&mut self.scene, self.builder.targets());
        Ok(summary)
    }

    pub fn load_from_json(&mut self, json: &str) -> Result<BuildSummary, BuildError> {
        let summary = self.builder.load_from_json(&mut self.scene, json)?;
        self.controller.set_targets(&mut self.scene, self.builder.targets());
        Ok(summary)
    }

    /// Read a layout file and load it
    pub fn load_from_path<P: AsRef<Path>>(&mut self, path: P) -> anyhow::Result<BuildSummary> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read layout file {}", path.display()))?;
        self.load_from_json(&json)
            .with_context(|| format!("failed to load layout from {}", path.display()))
    }

    pub fn pointer_move(
        &mut self,
        camera: &impl PickCamera,
        event: PointerEvent,
    ) -> Option<Target> {
        self.controller.pointer_move(&mut self.scene, camera, event)
    }

    pub fn pointer_down(&mut self, camera: &impl PickCamera, event: PointerEvent) {
        self.controller.pointer_down(&mut self.scene, camera, event)
    }

    /// Per-frame tick: gizmo write-back first, then shader time
    pub fn update(&mut self, elapsed_seconds: f32) {
        self.controller.update(&mut self.scene);
        self.builder.update_time(&mut self.scene, elapsed_seconds);
    }

    pub fn set_layer_visible(&mut self, layer: LayerId, visible: bool) -> bool {
        self.builder.set_layer_visible(&mut self.scene, layer, visible)
    }

    /// Current layout, including pad edits still pending on the proxy
    pub fn export_snapshot(&mut self) -> LayoutModel {
        self.controller.update(&mut self.scene);
        self.builder.export_snapshot(&self.scene)
    }

    pub fn export_json(&mut self) -> Result<String, LayoutError> {
        export_json(&self.export_snapshot())
    }

    pub fn draw_list(&self) -> DrawList {
        self.scene.draw_list()
    }

    /// Release every scene object the editor created
    pub fn dispose(&mut self) {
        self.controller.dispose(&mut self.scene);
        self.builder.teardown(&mut self.scene);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::SelectionStore;
    use crate::scene::NodeId;

    #[derive(Debug, Default)]
    struct NoGizmo;

    impl Gizmo for NoGizmo {
        fn attach(&mut self, _proxy: NodeId, _locked_y: f32) {}
        fn detach(&mut self) {}
        fn is_dragging(&self) -> bool {
            false
        }
        fn is_hot(&self) -> bool {
            false
        }
    }

    fn editor() -> Editor<NoGizmo, SelectionStore> {
        Editor::with_default_layout(BuildConfig::default(), NoGizmo, SelectionStore::new()).unwrap()
    }

    #[test]
    fn test_update_advances_pad_time() {
        let mut editor = editor();
        editor.update(1.25);
        let group = editor.builder().targets().pads[0];
        assert_eq!(editor.scene().instanced(group).unwrap().shader.time, 1.25);
    }

    #[test]
    fn test_failed_load_keeps_previous_scene() {
        let mut editor = editor();
        let before = editor.scene().len();
        let one_point =
            r#"{"traces":[{"layer":"TOP_COPPER","width":0.1,"points":[{"x":0,"z":0}]}]}"#;
        let err = editor.load_from_json(one_point).unwrap_err();
        assert!(matches!(err, BuildError::Trace { index: 0, .. }));
        assert_eq!(editor.scene().len(), before);
        assert!(editor.builder().is_built());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let mut editor = editor();
        let err = editor.load_from_path("/nonexistent/layout.json").unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/layout.json"));
    }

    #[test]
    fn test_dispose_empties_scene() {
        let mut editor = editor();
        editor.dispose();
        assert!(editor.scene().is_empty());
    }
}
