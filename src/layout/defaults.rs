//! Seed layout used when no input is supplied

use super::model::{
    Board, CopperSide, Hole, LayoutModel, PadAttribute, PadGroup, PadShape, Trace, TracePoint,
    LAYOUT_VERSION,
};

fn rect_pad(name: &str, size: f64, x: f64, z: f64) -> PadAttribute {
    PadAttribute {
        name: Some(name.to_string()),
        position: [x, z],
        size: Some([size, size]),
        radius: None,
    }
}

fn circle_pad(name: &str, radius: f64, x: f64, z: f64) -> PadAttribute {
    PadAttribute {
        name: Some(name.to_string()),
        position: [x, z],
        size: None,
        radius: Some(radius),
    }
}

fn rect_group(layer: CopperSide) -> PadGroup {
    PadGroup {
        shape: PadShape::Rectangle,
        layer,
        name: "SMD_PADS_RECTANGLE".to_string(),
        pad_attributes: vec![
            rect_pad("SMD_PAD_1", 2.0, -1.0, 0.9),
            rect_pad("SMD_PAD_2", 3.0, -0.5, 0.5),
            rect_pad("SMD_PAD_3", 2.0, 0.0, 0.0),
            rect_pad("SMD_PAD_4", 2.0, 1.0, -0.7),
            rect_pad("SMD_PAD_5", 3.0, 0.5, -0.7),
            rect_pad("SMD_PAD_6", 2.5, 0.5, 0.9),
            rect_pad("SMD_PAD_7", 4.0, 0.8, 0.8),
            rect_pad("SMD_PAD_8", 3.0, 0.3, 0.3),
        ],
        ..PadGroup::default()
    }
}

fn circle_group(layer: CopperSide) -> PadGroup {
    PadGroup {
        shape: PadShape::Circle,
        layer,
        name: "SMD_PADS_CIRCLE".to_string(),
        pad_attributes: vec![
            circle_pad("SMD_PAD_1", 2.0, 0.7, 0.34),
            circle_pad("SMD_PAD_2", 2.0, 0.0, 0.5),
            circle_pad("SMD_PAD_3", 2.0, 0.0, -0.5),
            circle_pad("SMD_PAD_4", 2.0, 0.5, 0.0),
            circle_pad("SMD_PAD_5", 2.0, -0.5, 0.0),
        ],
        ..PadGroup::default()
    }
}

fn trace(layer: CopperSide, points: &[(f64, f64)]) -> Trace {
    Trace {
        layer,
        width: Some(0.03),
        points: points.iter().map(|&(x, z)| TracePoint { x, z }).collect(),
    }
}

/// Reference board: 6 x 4 blank, eleven holes, rectangle and circle pad
/// groups on both sides and three traces.
pub fn default_layout() -> LayoutModel {
    let holes = [
        (0.5, 0.5),
        (0.2, 0.7),
        (-0.2, 0.7),
        (0.2, -0.7),
        (-0.5, 0.5),
        (-1.0, 0.9),
        (-0.2, -0.7),
        (0.57, -0.9),
        (-0.5, -0.5),
        (0.5, 0.9),
        (-0.5, 0.5),
    ]
    .iter()
    .map(|&(x, z)| Hole { x, z, r: 0.03 })
    .collect();

    let square = [(0.0, 0.0), (0.5, 0.0), (0.5, 0.5), (0.0, 0.5)];

    LayoutModel {
        version: LAYOUT_VERSION,
        board: Board { width: 6.0, height: 0.10, depth: 4.0 },
        holes,
        pads: vec![
            rect_group(CopperSide::Top),
            circle_group(CopperSide::Top),
            circle_group(CopperSide::Bottom),
            rect_group(CopperSide::Bottom),
        ],
        traces: vec![
            trace(CopperSide::Top, &square),
            trace(CopperSide::Bottom, &square),
            trace(
                CopperSide::Bottom,
                &[(-0.7, -0.7), (-0.7, -0.5), (0.8, -0.5), (0.8, 0.5)],
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_contents() {
        let model = default_layout();
        assert_eq!(model.holes.len(), 11);
        assert_eq!(model.pads.len(), 4);
        assert_eq!(model.traces.len(), 3);
        assert!(model.holes.iter().all(|h| h.is_valid()));
        assert_eq!(model.pads[0].pad_attributes.len(), 8);
        assert_eq!(model.pads[1].pad_attributes.len(), 5);
    }
}
