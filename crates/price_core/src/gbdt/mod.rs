//! Gradient-boosted tree regressor
//!
//! The trained price model is a tree ensemble serialized as JSON:
//!
//! ```json
//! {
//!   "version": 1,
//!   "scale": 1000000,
//!   "trees": [
//!     {
//!       "nodes": [
//!         {"id":0,"left":1,"right":2,"feature_idx":3,"threshold":12345,"leaf":null},
//!         {"id":1,"left":-1,"right":-1,"feature_idx":-1,"threshold":0,"leaf":5200000},
//!         {"id":2,"left":-1,"right":-1,"feature_idx":-1,"threshold":0,"leaf":6100000}
//!       ],
//!       "weight": 1000000
//!     }
//!   ],
//!   "bias": 0,
//!   "post_scale": 1000000,
//!   "n_features": 5004
//! }
//! ```
//!
//! The summed score divided by `post_scale` is `log1p(price)`.

pub mod model;
pub mod tree;

pub use model::{Model, ModelError, SCALE};
pub use tree::{Node, Tree};
