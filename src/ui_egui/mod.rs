// egui host for the clinic time grid

pub mod app;
pub mod grid_view;
pub mod sample_data;
pub mod theme;

pub use app::SchedulerApp;
