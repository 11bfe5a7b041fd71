//! MIME types by file extension, for records stored without one.

pub const OCTET_STREAM: &str = "application/octet-stream";
pub const PDF: &str = "application/pdf";
pub const MSWORD: &str = "application/msword";
pub const DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const PPT: &str = "application/vnd.ms-powerpoint";
pub const PPTX: &str = "application/vnd.openxmlformats-officedocument.presentationml.presentation";
pub const XLS: &str = "application/vnd.ms-excel";
pub const XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const CSV: &str = "text/csv";

/// Maps the text after the last `.` of `file_name` to a MIME type.
/// Unknown or missing extensions resolve to `application/octet-stream`.
pub fn resolve(file_name: &str) -> &'static str {
    let ext = file_name.rsplit('.').next().unwrap_or_default().to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "pdf" => PDF,
        "doc" => MSWORD,
        "docx" => DOCX,
        "ppt" => PPT,
        "pptx" => PPTX,
        "xls" => XLS,
        "xlsx" => XLSX,
        "csv" => CSV,
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        _ => OCTET_STREAM,
    }
}

pub fn is_image(mime_type: &str) -> bool {
    mime_type.starts_with("image/")
}
