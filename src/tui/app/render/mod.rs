mod header;
mod notice;
mod status;

pub use header::render_header;
pub use notice::{notice_lines, render_notice};
pub use status::{StatusInfo, render_status};
