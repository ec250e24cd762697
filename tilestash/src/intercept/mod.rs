//! Request interception.
//!
//! Sits between a map renderer and the tile server. Tile requests are served
//! from the store when possible; everything else passes through to the
//! network untouched.
//!
//! ```ignore
//! use tilestash::intercept::{RequestPipeline, TileInterceptor, TileRequest};
//!
//! let interceptor = Arc::new(TileInterceptor::new(client.clone(), store));
//! let mut pipeline = RequestPipeline::new(client);
//! interceptor.install(&mut pipeline);
//!
//! let response = pipeline
//!     .dispatch(&TileRequest::get("https://a.tile.openstreetmap.org/5/10/12.png"))
//!     .await?;
//! ```

mod pattern;
mod pipeline;
mod policy;

pub use pattern::{parse_tile_url, tile_key_for};
pub use pipeline::{RequestHandler, RequestPipeline, ResponseSource, TileRequest, TileResponse};
pub use policy::TileInterceptor;
