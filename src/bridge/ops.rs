use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage, imageops};

use crate::backend::{DocumentLoader, RenderQuality, RgbaFrame};
use crate::cache::PageCache;
use crate::config::RenderConfig;
use crate::error::{BridgeError, BridgeResult};

use super::call::{CallOutcome, MethodCall};

pub const CLEAR_CACHE_ACK: &str = "clearCache";

/// The operations behind the call surface. Runs entirely on the worker
/// thread; every document is opened fresh and dropped before the call
/// returns.
pub(crate) struct BridgeOps {
    loader: Arc<dyn DocumentLoader>,
    cache: PageCache,
    render: RenderConfig,
}

impl BridgeOps {
    pub(crate) fn new(
        loader: Arc<dyn DocumentLoader>,
        cache: PageCache,
        render: RenderConfig,
    ) -> Self {
        Self {
            loader,
            cache,
            render,
        }
    }

    pub(crate) fn dispatch(&self, call: &MethodCall) -> CallOutcome {
        match call.method() {
            "getNumberOfPages" => CallOutcome::Success(self.nullable(call, |ops, call| {
                ops.page_count(Path::new(call.str_arg("filePath")?))
            })),
            "getPage" => CallOutcome::Success(self.nullable(call, |ops, call| {
                let path = ops.render_page(
                    Path::new(call.str_arg("filePath")?),
                    call.int_arg("pageNumber")?,
                )?;
                Ok(path.to_string_lossy().into_owned())
            })),
            "clearCache" => {
                if let Err(err) = self.cache.clear() {
                    log_call_failure(call.method(), &err);
                }
                CallOutcome::Success(Some(CLEAR_CACHE_ACK.to_string()))
            }
            other => {
                tracing::debug!(method = other, "method not implemented");
                CallOutcome::NotImplemented
            }
        }
    }

    /// Collapses any failure to a null result; the error only survives in
    /// the log.
    fn nullable(
        &self,
        call: &MethodCall,
        op: impl FnOnce(&Self, &MethodCall) -> BridgeResult<String>,
    ) -> Option<String> {
        match op(self, call) {
            Ok(value) => Some(value),
            Err(err) => {
                log_call_failure(call.method(), &err);
                None
            }
        }
    }

    /// Page count as a decimal string. Clearing the cache first is retained
    /// from the original call contract.
    fn page_count(&self, file_path: &Path) -> BridgeResult<String> {
        self.cache.clear()?;
        let doc = self.loader.open(file_path)?;
        Ok(doc.page_count().to_string())
    }

    /// Rasterizes one page at the configured width and writes it to a fresh
    /// cache file. `page_number` is 1-based and clamped to the document.
    fn render_page(&self, file_path: &Path, page_number: i64) -> BridgeResult<PathBuf> {
        let doc = self.loader.open(file_path)?;
        let page_count = doc.page_count();
        if page_count == 0 {
            return Err(BridgeError::invalid_argument("document has no pages"));
        }

        let page_index = (page_number.clamp(1, page_count as i64) - 1) as usize;
        let (page_w, page_h) = doc.page_dimensions(page_index)?;
        if !(page_w > 0.0) || !(page_h > 0.0) {
            return Err(BridgeError::invalid_argument(
                "page has a degenerate size",
            ));
        }

        // The density factor cancels out of the ratio; it is kept because
        // the call contract defines the aspect basis this way.
        let density = self.render.density_dpi as f64;
        let ratio = (density * page_w as f64) / (density * page_h as f64);
        let target_w = self.render.target_page_width;
        let target_h = ((target_w as f64 / ratio) as u32).max(1);

        let frame = doc.render_page(
            page_index,
            target_w as f32 / page_w,
            target_h as f32 / page_h,
            RenderQuality::ForDisplay,
        )?;
        let png = encode_opaque_png(&frame, target_w, target_h)?;

        let stem = PageCache::page_file_stem(file_path);
        self.cache.create_page_file(&stem, page_index, &png)
    }
}

/// Composes the rendered frame onto an opaque white canvas of exactly the
/// target dimensions and encodes it as PNG.
fn encode_opaque_png(frame: &RgbaFrame, width: u32, height: u32) -> BridgeResult<Vec<u8>> {
    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));

    let rendered = RgbaImage::from_raw(frame.width, frame.height, frame.pixels_to_vec())
        .ok_or_else(|| {
            BridgeError::invalid_argument("backend frame size does not match its dimensions")
        })?;
    imageops::replace(&mut canvas, &rendered, 0, 0);

    let mut png = Vec::new();
    DynamicImage::ImageRgba8(canvas).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}

fn log_call_failure(method: &str, err: &BridgeError) {
    tracing::error!(method, error = %error_chain(err), "bridge call failed");
}

fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::backend::RgbaFrame;
    use crate::error::{BridgeError, BridgeResult};

    use super::{encode_opaque_png, error_chain};

    #[test]
    fn encode_opaque_png_pads_to_exact_target_dimensions() {
        let frame = RgbaFrame {
            width: 2,
            height: 2,
            pixels: Arc::from(vec![0u8, 0, 0, 255].repeat(4)),
        };

        let png = encode_opaque_png(&frame, 4, 3).expect("encode should succeed");
        let decoded = image::load_from_memory(&png).expect("png should decode");
        assert_eq!(decoded.width(), 4);
        assert_eq!(decoded.height(), 3);

        // Pixels outside the rendered frame stay opaque white.
        let rgba = decoded.to_rgba8();
        assert_eq!(rgba.get_pixel(0, 0).0, [0, 0, 0, 255]);
        assert_eq!(rgba.get_pixel(3, 2).0, [255, 255, 255, 255]);
    }

    #[test]
    fn encode_opaque_png_rejects_malformed_frame() {
        let frame = RgbaFrame {
            width: 4,
            height: 4,
            pixels: Arc::from(vec![0u8; 7]),
        };

        let result: BridgeResult<Vec<u8>> = encode_opaque_png(&frame, 4, 4);
        assert!(matches!(result, Err(BridgeError::InvalidArgument(_))));
    }

    #[test]
    fn error_chain_includes_sources() {
        let err = BridgeError::pdf_render(2, BridgeError::invalid_argument("root cause"));
        let chain = error_chain(&err);
        assert!(chain.starts_with("PDF render failed for page 2"));
        assert!(chain.ends_with("invalid argument: root cause"));
    }
}
