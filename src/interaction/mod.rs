//! Pointer interaction for the board editor
//!
//! # Submodules
//! - `collaborators` - Gizmo, selection sink and camera traits plus pointer types
//! - `store` - Observable selection store implementing the sink
//! - `controller` - Hover/selection state machine and pad drag write-back

mod collaborators;
mod store;
mod controller;

pub use collaborators::{
    Gizmo,
    SelectionSink,
    SelectionSummary,
    PickCamera,
    PerspectiveCamera,
    Viewport,
    PointerButton,
    PointerEvent,
};

pub use store::{
    SelectionStore,
    SubscriptionId,
};

pub use controller::{
    Target,
    InteractionState,
    SelectionController,
    PROXY_NODE_NAME,
};
