use crate::pdf::PdfDocument;
use crate::selection::SelectionRequest;
use anyhow::Result;
use std::path::Path;

pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    request: SelectionRequest,
    output: Q,
) -> Result<()> {
    let doc = PdfDocument::open(&input)?;
    let selection = request.select(doc.page_count())?;

    tracing::debug!(?request, indices = ?selection.indices, "selected pages");

    let mut new_doc = doc.extract_indices(&selection.indices)?;
    PdfDocument::save(&mut new_doc, &output)?;

    println!(
        "Kept {} of {} page(s) ({} first, {} last) in {}",
        selection.returned(),
        selection.page_count,
        selection.first_count,
        selection.last_count,
        output.as_ref().display()
    );

    Ok(())
}
