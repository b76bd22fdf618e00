//! Entity-component store: a closed component schema, a registry with a
//! deferred create/destroy lifecycle, and tag-based group queries.

pub mod component;
pub mod entity;
pub mod registry;

pub use component::{Bundle, Component, Kind, KIND_COUNT};
pub use entity::{Entity, Id, Tag};
pub use registry::{Registry, SANE_ID_LIMIT};
