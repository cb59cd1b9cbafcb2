//! JSON import/export for the persisted layout

use crate::error::LayoutError;

use super::model::LayoutModel;

/// Decode layout JSON text, applying all defaults
pub fn import_json(json: &str) -> Result<LayoutModel, LayoutError> {
    LayoutModel::from_json_str(json)
}

/// Encode a layout as pretty-printed JSON
pub fn export_json(model: &LayoutModel) -> Result<String, LayoutError> {
    Ok(serde_json::to_string_pretty(model)?)
}

/// Encode a layout as a JSON value
pub fn export_value(model: &LayoutModel) -> Result<serde_json::Value, LayoutError> {
    Ok(serde_json::to_value(model)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::default_layout;

    #[test]
    fn test_export_emits_wire_names() {
        let value = export_value(&default_layout()).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["pads"][0]["shape"], "RECTANGLE");
        assert_eq!(value["pads"][0]["layer"], "TOP_COPPER");
        assert!(value["pads"][0]["padAttributes"].is_array());
        assert_eq!(value["pads"][1]["padAttributes"][0]["radius"], 2.0);
        assert!(value["pads"][1]["padAttributes"][0].get("size").is_none());
        assert_eq!(value["traces"][2]["layer"], "BOTTOM_COPPER");
    }

    #[test]
    fn test_text_round_trip_is_exact() {
        let model = default_layout();
        let text = export_json(&model).unwrap();
        let back = import_json(&text).unwrap();
        assert_eq!(back, model);
    }
}
