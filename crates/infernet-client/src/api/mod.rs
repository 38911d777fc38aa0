//! API endpoint modules.

mod nodes;
mod release;

pub use nodes::NodesApi;
pub use release::{parse_version, ReleaseApi};
