//! Loading complete models from disk

pub mod model;
