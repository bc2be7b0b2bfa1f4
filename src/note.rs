//! Note model and snapshot encoding
//!
//! The snapshot is the JSON array written to the storage slot. Reading is
//! lenient per field: any array of objects loads, and a missing or
//! mistyped field falls back to its empty value instead of losing the whole
//! snapshot. Older snapshots predate the `pinned` flag entirely.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Display shape of a note on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    #[default]
    Square,
    Circle,
}

impl Shape {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "square" => Some(Shape::Square),
            "circle" => Some(Shape::Circle),
            _ => None,
        }
    }
}

/// A single note on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Caller-assigned id (uniqueness is not checked)
    #[serde(default, deserialize_with = "loose_id")]
    pub id: i64,
    #[serde(default, deserialize_with = "loose_string")]
    pub title: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub content: String,
    /// Free-form color token used by the UI
    #[serde(default, deserialize_with = "loose_string")]
    pub color: String,
    #[serde(default, deserialize_with = "loose_shape")]
    pub shape: Shape,
    /// Board position, interpreted by the UI only. Non-finite values are
    /// written as `null` and read back as `0`.
    #[serde(default, deserialize_with = "loose_number")]
    pub x: f64,
    #[serde(default, deserialize_with = "loose_number")]
    pub y: f64,
    /// Missing in snapshots written before pinning existed
    #[serde(default, deserialize_with = "loose_bool")]
    pub pinned: bool,
}

fn loose_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

fn loose_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .unwrap_or_else(|| n.as_f64().map_or(0, |f| f as i64)),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

fn loose_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn loose_shape<'de, D>(deserializer: D) -> Result<Shape, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value.as_str().and_then(Shape::from_str) {
        Some(shape) => Ok(shape),
        None => {
            log::warn!("Unknown note shape {}, using square", value);
            Ok(Shape::default())
        }
    }
}

fn loose_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}

impl Note {
    /// Create an unpinned yellow square at the origin
    pub fn new(id: i64, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
            color: "yellow".to_string(),
            shape: Shape::Square,
            x: 0.0,
            y: 0.0,
            pinned: false,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn pinned(mut self, pinned: bool) -> Self {
        self.pinned = pinned;
        self
    }
}

/// The notes a fresh board starts with
pub fn default_notes() -> Vec<Note> {
    vec![
        Note::new(1, "First Note", "This is my first note.")
            .with_color("blue")
            .with_shape(Shape::Square)
            .at(150.0, 100.0),
        Note::new(2, "Note", "Important tasks to do today.")
            .with_color("yellow")
            .with_shape(Shape::Circle)
            .at(300.0, 200.0),
    ]
}

/// Parse a persisted snapshot. Fails only when the text is not JSON or not
/// an array of objects; absent `pinned` fields come back as `false`.
pub fn decode_snapshot(json: &str) -> Result<Vec<Note>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Serialize the full list for the storage slot
pub fn encode_snapshot(notes: &[Note]) -> Result<String, serde_json::Error> {
    serde_json::to_string(notes)
}
