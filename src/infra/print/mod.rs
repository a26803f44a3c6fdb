pub mod html;
pub mod webview;
