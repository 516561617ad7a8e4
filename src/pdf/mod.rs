mod document;

pub use document::PdfDocument;

#[cfg(test)]
pub(crate) use document::tests;
