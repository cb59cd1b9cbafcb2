//! Layout model for the board editor
//!
//! # Submodules
//! - `model` - Serializable board/hole/pad/trace types and defaulting rules
//! - `defaults` - Built-in reference layout
//! - `codec` - JSON text import/export

mod model;
mod defaults;
mod codec;

pub use model::{
    Board,
    CopperSide,
    Hole,
    LayoutModel,
    PadAttribute,
    PadGroup,
    PadShape,
    Trace,
    TracePoint,
    LAYOUT_VERSION,
};

pub use defaults::default_layout;

pub use codec::{
    import_json,
    export_json,
    export_value,
};
