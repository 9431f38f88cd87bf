pub mod config;
pub mod editor;
pub mod error;
pub mod gesture;
pub mod markers;
pub mod math;
pub mod registry;
pub mod topology;

pub use config::EditorConfig;
pub use editor::{EditablePolygon, HandleEvent};
pub use error::{PolyEditError, Result};
pub use math::GeoCoord;
pub use topology::{VertexId, VertexStore};
