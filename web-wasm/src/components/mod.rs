pub mod analyze_button;
pub mod camera_mode;
pub mod header;
pub mod image_strip;
pub mod mode_selection;
pub mod results_view;
pub mod toasts;
pub mod upload_mode;
