//! Server-rendered pages
//!
//! Rendering uses [maud](https://maud.lambda.xyz/); every dynamic value is
//! escaped by the template macro.

pub mod index;

pub use index::{index, IndexView};
