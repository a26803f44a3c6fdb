use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

pub const APP_QUALIFIER: &str = "com";
pub const APP_ORGANIZATION: &str = "excelbill";
pub const APP_NAME: &str = "excelbill";

/// Where the print document is rendered before the print dialog opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintSurfaceKind {
    /// A new browser window, closed once printing returns.
    Window,
    /// A hidden iframe in the current page, removed once printing returns.
    /// Desktop webviews refuse `window.open`, so this is their default.
    Frame,
}

impl Default for PrintSurfaceKind {
    fn default() -> Self {
        if cfg!(feature = "desktop") {
            PrintSurfaceKind::Frame
        } else {
            PrintSurfaceKind::Window
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileFilter {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub window_title: String,
    /// Rendering of empty or absent cells in the table, in search and in print.
    pub empty_cell_placeholder: String,
    pub document_title: String,
    pub print_surface: PrintSurfaceKind,
    pub file_filters: Vec<FileFilter>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_title: "ExcelBill".to_string(),
            empty_cell_placeholder: "-".to_string(),
            document_title: "Billing Printout".to_string(),
            print_surface: PrintSurfaceKind::default(),
            file_filters: vec![
                FileFilter {
                    name: "Excel",
                    extensions: &["xls", "xlsx", "xlsm", "xlsb", "ods"],
                },
                FileFilter {
                    name: "CSV",
                    extensions: &["csv"],
                },
            ],
        }
    }
}

#[cfg_attr(not(feature = "desktop"), allow(dead_code))]
pub fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
        .ok_or_else(|| anyhow!("unable to resolve data directory"))
}

#[cfg_attr(not(feature = "desktop"), allow(dead_code))]
pub fn ensure_webview_data_dir(base_data_dir: &Path) -> Result<PathBuf> {
    let webview_data_dir = base_data_dir.join("webview");
    std::fs::create_dir_all(&webview_data_dir).with_context(|| {
        format!(
            "failed to create webview dir: {}",
            webview_data_dir.display()
        )
    })?;
    Ok(webview_data_dir)
}

#[cfg(feature = "desktop")]
pub fn default_webview_data_dir() -> Result<PathBuf> {
    ensure_webview_data_dir(project_dirs()?.data_local_dir())
}
