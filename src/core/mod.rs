//! Core state: documents, storage, notifications, theming and uploads

pub mod config;
pub mod document;
pub mod notifications;
pub mod registry;
pub mod session;
pub mod store;
pub mod theme;
pub mod upload;
