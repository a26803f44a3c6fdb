use dioxus::document;
use tracing::{info, warn};

use crate::config::PrintSurfaceKind;
use crate::usecase::services::export_service::ExportError;

// Each script receives the rendered page over `dioxus.recv()` and returns
// whether a print surface could be opened. The surface is released on every
// path once `print()` returns.

const WINDOW_SCRIPT: &str = r#"
const html = await dioxus.recv();
const surface = window.open("", "_blank");
if (!surface) {
    return false;
}
try {
    surface.document.open();
    surface.document.write(html);
    surface.document.close();
    surface.focus();
    surface.print();
} finally {
    surface.close();
}
return true;
"#;

const FRAME_SCRIPT: &str = r#"
const html = await dioxus.recv();
const frame = document.createElement("iframe");
frame.setAttribute("aria-hidden", "true");
frame.style.position = "fixed";
frame.style.width = "0";
frame.style.height = "0";
frame.style.border = "0";
document.body.appendChild(frame);
const surface = frame.contentWindow;
if (!surface) {
    frame.remove();
    return false;
}
try {
    surface.document.open();
    surface.document.write(html);
    surface.document.close();
    surface.focus();
    surface.print();
} finally {
    frame.remove();
}
return true;
"#;

pub fn surface_script(kind: PrintSurfaceKind) -> &'static str {
    match kind {
        PrintSurfaceKind::Window => WINDOW_SCRIPT,
        PrintSurfaceKind::Frame => FRAME_SCRIPT,
    }
}

/// Sends `html` to the platform print dialog through the webview.
pub async fn print_html(html: String, kind: PrintSurfaceKind) -> Result<(), ExportError> {
    let mut eval = document::eval(surface_script(kind));
    eval.send(html)
        .map_err(|err| ExportError::Surface(err.to_string()))?;

    let opened = eval
        .join::<bool>()
        .await
        .map_err(|err| ExportError::Surface(err.to_string()))?;

    if opened {
        info!(surface = ?kind, "sent document to print");
        Ok(())
    } else {
        warn!(surface = ?kind, "print surface refused");
        Err(ExportError::SurfaceUnavailable)
    }
}
