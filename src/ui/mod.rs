pub mod dialogs;
pub mod export;
pub mod input_file;
pub mod panels;
pub mod plot;
pub mod plot_config;
