use serde::{Deserialize, Serialize};

/// Drawing plane of a map entity. Layers are drawn from `Low` to `High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum Layer {
    #[default]
    Low,
    Intermediate,
    High,
}

impl Layer {
    /// Numeric id of the layer, also its index in [`Layer::all`]
    pub fn id(&self) -> usize {
        match self {
            Layer::Low => 0,
            Layer::Intermediate => 1,
            Layer::High => 2,
        }
    }

    pub fn from_id(id: usize) -> Option<Layer> {
        Self::all().get(id).copied()
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Layer::Low => "Low layer",
            Layer::Intermediate => "Intermediate layer",
            Layer::High => "High layer",
        }
    }

    /// Returns all layers, lowest first
    pub fn all() -> &'static [Layer] {
        &[Layer::Low, Layer::Intermediate, Layer::High]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_follow_drawing_order() {
        for (index, layer) in Layer::all().iter().enumerate() {
            assert_eq!(layer.id(), index);
        }
        assert!(Layer::Low < Layer::Intermediate);
        assert!(Layer::Intermediate < Layer::High);
    }

    #[test]
    fn test_from_id() {
        assert_eq!(Layer::from_id(0), Some(Layer::Low));
        assert_eq!(Layer::from_id(2), Some(Layer::High));
        assert_eq!(Layer::from_id(3), None);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Layer::Low.display_name(), "Low layer");
        assert_eq!(Layer::Intermediate.display_name(), "Intermediate layer");
        assert_eq!(Layer::High.display_name(), "High layer");
    }

    #[test]
    fn test_default_is_low() {
        assert_eq!(Layer::default(), Layer::Low);
    }

    #[test]
    fn test_serialization_roundtrip() {
        for layer in Layer::all() {
            let json = serde_json::to_string(layer).unwrap();
            let deserialized: Layer = serde_json::from_str(&json).unwrap();
            assert_eq!(*layer, deserialized);
        }
    }
}
