use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// One frame of a reference pose file.
///
/// `relative_angles` keeps the file's key order; the order of its values is
/// the order of the feature vector.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ReferenceRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_number: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
    pub relative_angles: Map<String, Value>,
}

impl ReferenceRecord {
    /// Builds a record keyed `R0..R{n-1}` in vector order.
    pub fn from_angles(frame_number: usize, timestamp: Option<f64>, angles: &[f32]) -> Self {
        let mut relative_angles = Map::new();
        for (i, &angle) in angles.iter().enumerate() {
            let value = Number::from_f64(angle as f64)
                .map(Value::Number)
                .unwrap_or(Value::Null);
            relative_angles.insert(format!("R{}", i), value);
        }
        Self {
            frame_number: Some(frame_number),
            timestamp,
            relative_angles,
        }
    }

    /// The angle values in key order, or the first key whose value is not a number.
    pub fn angles(&self) -> Result<Vec<f32>, String> {
        self.relative_angles
            .iter()
            .map(|(key, value)| {
                value
                    .as_f64()
                    .map(|v| v as f32)
                    .ok_or_else(|| format!("angle '{}' is not a number", key))
            })
            .collect()
    }
}
