// Export surface: JSON page dumps and PDF downloads built on the layout core.

pub mod filename;
pub mod handlers;
pub mod pdf;
