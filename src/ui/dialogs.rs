use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Modal dialogs
// ---------------------------------------------------------------------------

/// The modal dialogs the widgets need from the windowing layer.
pub trait Dialogs {
    /// Ask for a single input file; `None` when the user cancels.
    fn open_file_dialog(&self, title: &str) -> Option<PathBuf>;

    /// Ask where to save a file, suggesting `file_name`.
    fn save_file_dialog(&self, title: &str, file_name: &str) -> Option<PathBuf>;

    /// Show a blocking error message.
    fn error_dialog(&self, title: &str, message: &str);
}

/// Native dialogs through `rfd`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeDialogs;

impl Dialogs for NativeDialogs {
    fn open_file_dialog(&self, title: &str) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title(title)
            .add_filter("Spreadsheets", crate::consts::SPREADSHEET_EXTENSIONS)
            .add_filter("All files", &["*"])
            .pick_file()
    }

    fn save_file_dialog(&self, title: &str, file_name: &str) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title(title)
            .set_file_name(file_name)
            .add_filter("PNG", &[crate::consts::IMAGE_EXTENSION])
            .save_file()
    }

    fn error_dialog(&self, title: &str, message: &str) {
        log::error!("{title}: {message}");
        rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Error)
            .set_title(title)
            .set_description(message)
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }
}
