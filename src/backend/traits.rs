use std::path::Path;
use std::sync::Arc;

use crate::error::BridgeResult;

/// Quality preset forwarded to the rasterizer. The bridge always asks for
/// `ForDisplay`; `ForPrint` exists for hosts that distinguish the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderQuality {
    #[default]
    ForDisplay,
    ForPrint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaFrame {
    pub width: u32,
    pub height: u32,
    pub pixels: Arc<[u8]>,
}

impl RgbaFrame {
    pub fn byte_len(&self) -> usize {
        self.pixels.len()
    }

    pub fn pixels_to_vec(&self) -> Vec<u8> {
        self.pixels.as_ref().to_vec()
    }
}

pub trait PdfBackend: Send {
    fn path(&self) -> &Path;
    fn page_count(&self) -> usize;
    /// Page size in PDF points.
    fn page_dimensions(&self, page: usize) -> BridgeResult<(f32, f32)>;
    fn render_page(
        &self,
        page: usize,
        x_scale: f32,
        y_scale: f32,
        quality: RenderQuality,
    ) -> BridgeResult<RgbaFrame>;
}

/// Opens one document per call; the bridge never keeps a document alive
/// between calls.
pub trait DocumentLoader: Send + Sync {
    fn open(&self, path: &Path) -> BridgeResult<Box<dyn PdfBackend>>;
}
