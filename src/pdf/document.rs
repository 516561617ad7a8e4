use anyhow::{Context, Result};
use lopdf::{Document, ObjectId};
use std::path::Path;

pub struct PdfDocument {
    pub doc: Document,
}

impl PdfDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let doc = Document::load(path)
            .with_context(|| format!("Failed to open PDF: {}", path.display()))?;
        Ok(PdfDocument { doc })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let doc = Document::load_mem(bytes).context("Failed to parse PDF")?;
        Ok(PdfDocument { doc })
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Get 1-indexed page object IDs
    pub fn page_ids(&self) -> Vec<(u32, ObjectId)> {
        let mut pages: Vec<_> = self.doc.get_pages().into_iter().collect();
        pages.sort_by_key(|(num, _)| *num);
        pages
    }

    /// Copy the pages at the given zero-based indices into a new document.
    ///
    /// Indices must be strictly ascending: pages keep their source order.
    pub fn extract_indices(&self, indices: &[u32]) -> Result<Document> {
        let total = self.page_count();

        if indices.is_empty() {
            anyhow::bail!("No pages specified");
        }
        if let Some(&bad) = indices.iter().find(|&&i| i >= total) {
            anyhow::bail!("Page index {} is out of range (0-{})", bad, total.saturating_sub(1));
        }
        if indices.windows(2).any(|w| w[0] >= w[1]) {
            anyhow::bail!("Page indices must be strictly ascending");
        }

        let mut new_doc = self.doc.clone();

        // lopdf numbers pages from 1
        let pages_to_delete: Vec<u32> = self
            .page_ids()
            .iter()
            .map(|(num, _)| *num)
            .filter(|num| indices.binary_search(&(num - 1)).is_err())
            .collect();

        if !pages_to_delete.is_empty() {
            new_doc.delete_pages(&pages_to_delete);
            new_doc.prune_objects();
        }

        Ok(new_doc)
    }

    /// Serialize to an in-memory buffer
    pub fn to_bytes(doc: &mut Document) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        doc.save_to(&mut buf).context("Failed to serialize PDF")?;
        Ok(buf)
    }

    /// Save to a file
    pub fn save<P: AsRef<Path>>(doc: &mut Document, path: P) -> Result<()> {
        doc.save(&path)
            .with_context(|| format!("Failed to save PDF: {}", path.as_ref().display()))?;
        Ok(())
    }
}
