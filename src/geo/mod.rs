mod albers;
mod boundary;

pub use albers::AlbersUsa;
pub use boundary::{GeoRing, ProjectedRing, load_boundaries, project_rings};
