use std::path::{Path, PathBuf};
use std::sync::Arc;

use hayro::hayro_interpret::InterpreterSettings;
use hayro::hayro_interpret::util::PageExt;
use hayro::hayro_syntax::Pdf;
use hayro::vello_cpu::color::palette::css::WHITE;
use hayro::{RenderSettings, render};

use crate::error::{BridgeError, BridgeResult};

use super::traits::{DocumentLoader, PdfBackend, RenderQuality, RgbaFrame};

pub struct PdfDoc {
    path: PathBuf,
    pdf: Pdf,
}

impl PdfBackend for PdfDoc {
    fn path(&self) -> &Path {
        PdfDoc::path(self)
    }

    fn page_count(&self) -> usize {
        PdfDoc::page_count(self)
    }

    fn page_dimensions(&self, page: usize) -> BridgeResult<(f32, f32)> {
        PdfDoc::page_dimensions(self, page)
    }

    fn render_page(
        &self,
        page: usize,
        x_scale: f32,
        y_scale: f32,
        quality: RenderQuality,
    ) -> BridgeResult<RgbaFrame> {
        PdfDoc::render_page(self, page, x_scale, y_scale, quality)
    }
}

#[derive(Debug, Default)]
pub struct HayroDocumentLoader;

impl DocumentLoader for HayroDocumentLoader {
    fn open(&self, path: &Path) -> BridgeResult<Box<dyn PdfBackend>> {
        PdfDoc::open(path).map(|doc| Box::new(doc) as Box<dyn PdfBackend>)
    }
}

impl PdfDoc {
    pub fn open(path: impl AsRef<Path>) -> BridgeResult<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(BridgeError::pdf_open("pdf path must not be empty"));
        }
        if !path.exists() {
            return Err(BridgeError::io_with_context(
                std::io::Error::new(std::io::ErrorKind::NotFound, "missing file"),
                format!("pdf file not found: {}", path.display()),
            ));
        }
        if !path.is_file() {
            return Err(BridgeError::pdf_open("pdf path must be a regular file"));
        }

        let bytes = Arc::new(std::fs::read(path).map_err(|source| {
            BridgeError::io_with_context(source, format!("failed to read {}", path.display()))
        })?);
        if !bytes.as_slice().starts_with(b"%PDF-") {
            return Err(BridgeError::pdf_open("input is not a valid PDF header"));
        }

        let pdf = Pdf::new(bytes)
            .map_err(|_| BridgeError::pdf_open("failed to parse PDF with hayro"))?;

        Ok(Self {
            path: path.to_path_buf(),
            pdf,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn page_count(&self) -> usize {
        self.pdf.pages().len()
    }

    pub fn page_dimensions(&self, page: usize) -> BridgeResult<(f32, f32)> {
        let page_ref = self
            .pdf
            .pages()
            .get(page)
            .ok_or(BridgeError::invalid_argument("page index is out of range"))?;

        Ok(page_ref.render_dimensions())
    }

    pub fn render_page(
        &self,
        page: usize,
        x_scale: f32,
        y_scale: f32,
        _quality: RenderQuality,
    ) -> BridgeResult<RgbaFrame> {
        // hayro has a single rasterization path; both presets map to it.
        if !x_scale.is_finite() || x_scale <= 0.0 || !y_scale.is_finite() || y_scale <= 0.0 {
            return Err(BridgeError::invalid_argument(
                "render scale must be a positive finite value",
            ));
        }

        let page_ref = self
            .pdf
            .pages()
            .get(page)
            .ok_or(BridgeError::invalid_argument("page index is out of range"))?;

        let render_settings = RenderSettings {
            x_scale,
            y_scale,
            bg_color: WHITE,
            ..Default::default()
        };
        let interpreter_settings = InterpreterSettings::default();
        let pixmap = render(page_ref, &interpreter_settings, &render_settings);

        Ok(RgbaFrame {
            width: pixmap.width() as u32,
            height: pixmap.height() as u32,
            pixels: pixmap.data_as_u8_slice().to_vec().into(),
        })
    }
}
