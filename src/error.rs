pub type BridgeResult<T> = Result<T, BridgeError>;

#[derive(thiserror::Error, Debug)]
pub enum BridgeError {
    #[error("I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },
    #[error("failed to open PDF document: {0}")]
    PdfOpen(String),
    #[error("PDF render failed for page {page}")]
    PdfRender {
        page: usize,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("PNG encode failed")]
    PngEncode {
        #[source]
        source: image::ImageError,
    },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("bridge worker unavailable: {0}")]
    Worker(String),
}

impl From<std::io::Error> for BridgeError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source,
            context: "I/O operation failed".to_string(),
        }
    }
}

impl From<image::ImageError> for BridgeError {
    fn from(source: image::ImageError) -> Self {
        Self::PngEncode { source }
    }
}

impl BridgeError {
    pub fn io_with_context(source: std::io::Error, context: impl Into<String>) -> Self {
        Self::Io {
            source,
            context: context.into(),
        }
    }

    pub fn pdf_open(message: impl Into<String>) -> Self {
        Self::PdfOpen(message.into())
    }

    pub fn pdf_render(page: usize, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::PdfRender {
            page,
            source: Box::new(source),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn worker(message: impl Into<String>) -> Self {
        Self::Worker(message.into())
    }
}
