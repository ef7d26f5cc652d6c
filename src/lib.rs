//! ddsketch_core: relative-error mergeable quantile sketch
//!
//! A `Sketch` computes quantiles over a stream of non-negative reals with a
//! guaranteed relative error bound, in bounded memory, and merges with other
//! sketches built under the same configuration without losing accuracy.
//!
//! Three [`mapping::IndexMapping`] variants trade ingestion throughput for
//! bin density, and three [`store::Store`] variants trade a fixed memory
//! ceiling for precision at the extremes. [`presets`] wires up the common
//! combinations; [`sketch::Sketch`] is the driver for anything more
//! specific.
//!
//! ```
//! use ddsketch_core::presets;
//!
//! let mut sketch = presets::balanced(0.01).unwrap();
//! for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
//!     sketch.accept(v).unwrap();
//! }
//! let p50 = sketch.value_at_quantile(0.5).unwrap();
//! assert!((p50 - 3.0).abs() <= 3.0 * 0.01 + 1e-9);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod mapping;
pub mod presets;
pub mod sketch;
pub mod store;

pub use error::{Result, SketchError};
pub use mapping::{IndexMapping, Mapping};
pub use sketch::Sketch;
pub use store::{Store, StoreImpl};
