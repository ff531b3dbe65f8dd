//! # fif-ops
//!
//! Channel-parallel frequency-domain filtering for RGB images.
//!
//! Each color channel is taken through an unnormalized 2D cosine transform,
//! handed to a caller-supplied [`FrequencyModifier`], transformed back,
//! renormalized and clamped into the image. The three channels run
//! concurrently.
//!
//! # Modules
//!
//! - [`pipeline`] - [`filter`] entry points and [`FilterConfig`]
//! - [`worker`] - per-channel transform-and-modify step
//! - [`plan`] - 2D transform plans and [`PlanQuality`]
//! - [`dct`] - 1D DCT-II/DCT-III kernels on top of `rustfft`
//! - [`modifier`] - the [`FrequencyModifier`] strategy
//! - [`channels`] - split and combine of interleaved samples
//! - [`buffer`] - scratch buffer acquisition
//! - [`linearize`] - pixel grid to flat buffer and back
//! - [`parallel`] - bounded worker groups and pixel partitioning
//!
//! # Example
//!
//! ```rust
//! use fif_core::{Channel, RgbGrid};
//! use fif_ops::{delinearize, filter, to_image};
//!
//! let grid = RgbGrid::from_fn(8, 8, |x, y| [(x * 30) as u8, (y * 30) as u8, 90]).unwrap();
//! let mut image = to_image(&grid, 1).unwrap();
//!
//! // keep only the lowest quarter of frequencies in each direction
//! let low_pass = |_: Channel, freq: &mut [f64], _: &[f64]| {
//!     for (i, coeff) in freq.iter_mut().enumerate() {
//!         let (u, v) = (i % 8, i / 8);
//!         if u >= 2 || v >= 2 {
//!             *coeff = 0.0;
//!         }
//!     }
//! };
//! filter(&mut image, false, &low_pass).unwrap();
//!
//! let mut out = RgbGrid::new(8, 8).unwrap();
//! delinearize(image.data(), &mut out, 8, 8, 1).unwrap();
//! ```
//!
//! # Feature Flags
//!
//! - `serde` - `Serialize`/`Deserialize` for [`FilterConfig`] and [`PlanQuality`]
//! - `image` - forwards to `fif-core/image`

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod buffer;
pub mod channels;
pub mod dct;
pub mod linearize;
pub mod modifier;
pub mod parallel;
pub mod pipeline;
pub mod plan;
pub mod worker;

pub use error::{OpsError, OpsResult};
pub use linearize::{delinearize, linearize, linearize_image, to_image};
pub use modifier::{FrequencyModifier, IdentityModifier};
pub use parallel::{PixelPartition, WorkerGroup};
pub use pipeline::{filter, filter_with, FilterConfig};
pub use plan::{PlanQuality, TransformPlan};
