mod hayro;
mod traits;

pub use hayro::{HayroDocumentLoader, PdfDoc};
pub use traits::{DocumentLoader, PdfBackend, RenderQuality, RgbaFrame};
