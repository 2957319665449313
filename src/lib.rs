mod app;
pub mod config;
pub mod coordinates;
pub mod error;
pub mod frame;
pub mod lin_reg;
#[cfg(not(target_arch = "wasm32"))]
pub mod logging;
pub mod pacer;
pub mod point_generator;
pub use app::LsrlApp;
