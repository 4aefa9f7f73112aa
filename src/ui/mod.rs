//! UI components for Mdnotes

pub mod editor;
pub mod file_list;
pub mod new_file;
pub mod preview;
pub mod toasts;
