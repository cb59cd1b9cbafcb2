//! PCB layout engine
//!
//! Turns a persisted board layout (board outline, drill holes, SMD pad groups
//! and copper traces) into a retained 3D scene, lets a host UI hover, select
//! and drag pads in that scene, and exports the edited layout back to JSON.
//!
//! # Modules
//! - `draw` - Geometry kernel: meshes, outlines, extrusion and trace ribbons
//! - `layout` - Layout model and its JSON codec
//! - `scene` - Scene graph, layer registry, primitive builder and picking
//! - `interaction` - Selection and drag controller with its collaborators
//! - `editor` - Facade tying load, pointer input, frame updates and export
//!
//! # Example
//! ```ignore
//! let mut editor = Editor::new(BuildConfig::default(), gizmo, SelectionStore::new());
//! editor.load_from_path("board.json")?;
//! editor.pointer_down(&camera, PointerEvent::primary(viewport.to_ndc(x, y)));
//! editor.update(elapsed_seconds);
//! let json = editor.export_json()?;
//! ```

pub mod config;
pub mod draw;
pub mod editor;
pub mod error;
pub mod interaction;
pub mod layout;
pub mod scene;

pub use config::BuildConfig;
pub use editor::Editor;
pub use error::{BuildError, GeometryError, LayoutError};
pub use layout::LayoutModel;
