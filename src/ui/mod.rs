/// UI layer: panel layout and chart rendering. Everything here reads the
/// table and the cached series from [`crate::state::AppState`]; computation
/// lives in the data layer.
pub mod chart;
pub mod panels;
