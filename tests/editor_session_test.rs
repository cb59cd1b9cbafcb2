// Editor sessions: pad placement, selection lifecycle, drag export and rebuilds
use nalgebra::{Point2, Point3, Vector3};
use pcb_layout_engine::draw::geometry::{Ray, Transform};
use pcb_layout_engine::interaction::{
    Gizmo, InteractionState, PickCamera, PointerEvent, SelectionStore, Target,
};
use pcb_layout_engine::layout::{default_layout, LayoutModel, PadAttribute, PadGroup};
use pcb_layout_engine::scene::NodeId;
use pcb_layout_engine::{BuildConfig, Editor};

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct RecordingGizmo {
        attached: Option<(NodeId, f32)>,
        dragging: bool,
    }

    impl Gizmo for RecordingGizmo {
        fn attach(&mut self, proxy: NodeId, locked_y: f32) {
            self.attached = Some((proxy, locked_y));
        }
        fn detach(&mut self) {
            self.attached = None;
        }
        fn is_dragging(&self) -> bool {
            self.dragging
        }
        fn is_hot(&self) -> bool {
            false
        }
    }

    /// Orthographic top view of the 6 x 4 board
    struct TopView;

    impl PickCamera for TopView {
        fn ray_from_ndc(&self, ndc: Point2<f32>) -> Ray {
            Ray::new(Point3::new(ndc.x * 3.0, 10.0, -ndc.y * 2.0), Vector3::new(0.0, -1.0, 0.0))
        }
    }

    fn click(x: f32, z: f32) -> PointerEvent {
        PointerEvent::primary(Point2::new(x / 3.0, -z / 2.0))
    }

    fn two_pad_model() -> LayoutModel {
        let attr = |x: f64, z: f64| PadAttribute {
            name: None,
            position: [x, z],
            size: Some([2.0, 2.0]),
            radius: None,
        };
        LayoutModel {
            pads: vec![PadGroup {
                pad_attributes: vec![attr(0.3, -0.4), attr(-0.5, 0.5)],
                ..PadGroup::default()
            }],
            ..LayoutModel::default()
        }
    }

    fn new_editor() -> Editor<RecordingGizmo, SelectionStore> {
        let _ = env_logger::builder().is_test(true).try_init();
        Editor::new(BuildConfig::default(), RecordingGizmo::default(), SelectionStore::new())
    }

    #[test]
    fn test_pad_placement_inverts_on_export() {
        let mut editor = new_editor();
        editor.load(&two_pad_model()).expect("Pads must build");

        let group = editor.builder().targets().pads[0];
        let t = editor.scene().instanced(group).unwrap().transform(0).unwrap();
        assert!((t.position.x - 0.3 * 3.0 * 0.95).abs() < 1e-5);
        assert!((t.position.z - -0.4 * 2.0 * 0.95).abs() < 1e-5);

        let decomposed = Transform::decompose(&t.to_matrix());
        assert!((decomposed.scale - Vector3::new(2.0, 1.0, 2.0)).norm() < 1e-5);

        let snapshot = editor.export_snapshot();
        let [x, z] = snapshot.pads[0].pad_attributes[0].position;
        assert!((x - 0.3).abs() < 1e-5);
        assert!((z + 0.4).abs() < 1e-5);
    }

    #[test]
    fn test_selection_moves_between_pads_and_resets_on_reload() {
        let mut editor = new_editor();
        editor.load(&two_pad_model()).unwrap();
        let group = editor.builder().targets().pads[0];

        editor.pointer_down(&TopView, click(0.855, -0.76));
        assert_eq!(editor.state(), InteractionState::Selected(Target::Pad { group, instance: 0 }));

        editor.pointer_down(&TopView, click(-1.425, 0.95));
        let shader = editor.scene().instanced(group).unwrap().shader;
        assert_eq!(shader.selected_id, Some(1));
        assert_eq!(editor.state(), InteractionState::Selected(Target::Pad { group, instance: 1 }));

        editor.pointer_move(&TopView, click(-1.425, 0.95));
        editor.load(&two_pad_model()).unwrap();
        assert_eq!(editor.state(), InteractionState::Idle);
        assert!(editor.controller().sink().state().is_none());
        assert!(editor.controller().gizmo().attached.is_none());

        let fresh = editor.builder().targets().pads[0];
        assert_ne!(fresh, group);
        let shader = editor.scene().instanced(fresh).unwrap().shader;
        assert_eq!(shader.selected_id, None);
        assert_eq!(shader.hovered_id, None);
    }

    #[test]
    fn test_dragged_pad_is_exported() {
        let mut editor = new_editor();
        editor.load(&two_pad_model()).unwrap();

        editor.pointer_down(&TopView, click(0.855, -0.76));
        let (proxy, locked_y) = editor.controller().gizmo().attached.expect("gizmo attached");
        editor.controller_mut().gizmo_mut().dragging = true;

        // the gizmo moves the proxy; its height must not leak into the pad
        let proxy_node = editor.scene_mut().get_mut(proxy).unwrap();
        proxy_node.transform.position = Vector3::new(1.425, 0.5, 0.0);
        let snapshot = editor.export_snapshot();

        let [x, z] = snapshot.pads[0].pad_attributes[0].position;
        assert!((x - 0.5).abs() < 1e-5);
        assert!(z.abs() < 1e-5);

        let group = editor.builder().targets().pads[0];
        let t = editor.scene().instanced(group).unwrap().transform(0).unwrap();
        assert!((t.position.y - locked_y).abs() < 1e-6);
    }

    #[test]
    fn test_rebuild_does_not_accumulate() {
        let mut editor = new_editor();
        editor.load(&default_layout()).unwrap();
        let nodes = editor.scene().len();
        let items = editor.draw_list().items.len();

        editor.load(&default_layout()).unwrap();
        assert_eq!(editor.scene().len(), nodes);
        assert_eq!(editor.draw_list().items.len(), items);
    }

    #[test]
    fn test_failed_rebuild_keeps_last_good_scene() {
        let mut editor = new_editor();
        editor.load(&default_layout()).unwrap();
        let nodes = editor.scene().len();
        let targets = editor.builder().targets();

        let mut broken = default_layout();
        broken.traces[1].points.truncate(1);
        assert!(editor.load(&broken).is_err());

        assert_eq!(editor.scene().len(), nodes);
        assert_eq!(editor.builder().targets(), targets);
        assert_eq!(editor.builder().model(), &default_layout());
    }
}
