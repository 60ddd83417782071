//! # pixform
//!
//! Image formatting as a tool and as a service: rotate, crop and resize one
//! image, then fan out thumbnails from the result.
//!
//! # Architecture: One Fixed Pipeline
//!
//! Every image goes through the same three steps in the same order, and then
//! each thumbnail is resized from the finished primary:
//!
//! ```text
//! source ──▶ rotate ──▶ crop ──▶ resize ──▶ primary
//!                                             ├──▶ resize ──▶ thumbnail 1
//!                                             └──▶ resize ──▶ thumbnail n
//! ```
//!
//! Each step decides for itself whether it would change the image. When it
//! would not, it hands back the very same [`pipeline::ImageHandle`] it got,
//! so a no-op run costs nothing and never re-samples pixels.
//!
//! Both front ends share the pipeline:
//!
//! - `pixform format` reads a file and writes the outputs next to `--dst`
//!   ([`format`]).
//! - `pixform serve` accepts multipart uploads on `POST /format` ([`server`]).
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`options`] | The options document and the per-step "does this run" rules |
//! | [`pipeline`] | Rotate → crop → resize, thumbnail fan-out, progress events |
//! | [`naming`] | Derived output names: `photo.jpg` + `-small` → `photo-small.jpg` |
//! | [`imaging`] | Backend trait, pure-Rust backend, geometry math, codecs |
//! | [`format`] | One-shot file formatting and parallel output saving |
//! | [`server`] | axum HTTP API around the pipeline |
//! | [`config`] | `pixform.toml` loading and validation |
//! | [`output`] | CLI output formatting for pipeline progress |
//!
//! # Design Decisions
//!
//! ## Backend Trait
//!
//! Pixel work sits behind [`imaging::ImageBackend`]. The pipeline only decides
//! *what* to do; the backend does it. Tests swap in a recording mock to check
//! which operations ran, with which parameters, without decoding anything.
//!
//! ## Thumbnails From the Finished Image
//!
//! Thumbnails are resized from the primary output, never from the source.
//! Whatever rotation and crop did is visible in every thumbnail, and the
//! whole run fails if any single output fails.
//!
//! ## Formats Follow File Names
//!
//! There is no format option. The extension of each output name picks the
//! encoder, so `--dst out.png` converts and `photo.jpg` stays a JPEG.

pub mod config;
pub mod format;
pub mod imaging;
pub mod naming;
pub mod options;
pub mod output;
pub mod pipeline;
pub mod server;
