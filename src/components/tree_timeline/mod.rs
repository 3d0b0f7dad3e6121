mod component;
mod config;
mod dataset;
mod error;
mod highlight;
mod layout;
mod loader;
mod render;
pub mod scale;
mod state;
mod timeline;
mod tooltip;
mod types;

pub use component::TreeTimelineCanvas;
pub use config::ChartConfig;
pub use loader::load;
