pub mod grid;
pub mod presets;
pub mod sessions;
pub mod shared;
