// PDF export: LaTeX source built from the preview projection, compiled by an
// external TeX engine. No layout logic lives here.

pub mod latex;
pub mod pdf;

pub use latex::render_resume;
pub use pdf::{pdf_filename, PdfRenderer};
