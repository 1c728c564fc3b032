mod utils;

pub mod config;
pub mod controller;
pub mod sensors;
pub mod serial;

pub use utils::cyber_controller_error;

/// Installs the ESP-IDF logger as the `log` backend. Call it once, first thing in `main`.
#[cfg(target_os = "espidf")]
pub fn init_logging() {
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
}
