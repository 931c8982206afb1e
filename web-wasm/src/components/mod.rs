pub mod header;
pub mod image_uploader;
pub mod options_form;
pub mod processing_overlay;
pub mod result_preview;
pub mod toggle_switch;
pub mod tool_page;
