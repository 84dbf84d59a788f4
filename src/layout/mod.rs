//! Static lot geometry.
//!
//! Everything here is configuration: divider-line coordinates are supplied
//! out-of-band (builtin table or TOML file) and are contractually coupled
//! to the camera resolution. Nothing in this module looks at pixels.

mod line;
mod lot;

pub use line::{DividerLine, SpotGroup, SpotSpan};
pub use lot::{LayoutError, LotLayout};
