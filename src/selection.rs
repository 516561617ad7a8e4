use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionRequest {
    /// Keep the first `n` pages.
    TrimToFirst(u32),
    /// Keep the last `n` pages.
    LastN(u32),
    /// Keep the first `first` pages together with the last `last` pages.
    FirstAndLast { first: u32, last: u32 },
}

/// Zero-based page indices to copy, in output order, with the counts that
/// were actually applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub indices: Vec<u32>,
    pub page_count: u32,
    pub first_count: u32,
    pub last_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("{field} must be a positive integer")]
    ZeroCount { field: &'static str },

    #[error("{field} ({requested}) exceeds the document's page count ({total})")]
    OutOfRange {
        field: &'static str,
        requested: u32,
        total: u32,
    },

    #[error("No pages selected")]
    NoPagesSelected,
}

impl SelectionRequest {
    /// The fixed "last two pages" selection.
    pub fn last_two() -> Self {
        SelectionRequest::LastN(2)
    }

    pub fn select(&self, page_count: u32) -> Result<Selection, SelectionError> {
        match *self {
            SelectionRequest::TrimToFirst(n) => trim_to_first(page_count, n),
            SelectionRequest::LastN(n) => last_n(page_count, n),
            SelectionRequest::FirstAndLast { first, last } => {
                first_and_last(page_count, first, last)
            }
        }
    }
}

impl Selection {
    pub fn returned(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Pages of the source document that were left out.
    pub fn removed(&self) -> u32 {
        self.page_count - self.returned()
    }
}

fn check_count(field: &'static str, requested: u32, total: u32) -> Result<(), SelectionError> {
    if requested > total {
        return Err(SelectionError::OutOfRange {
            field,
            requested,
            total,
        });
    }
    Ok(())
}

pub fn trim_to_first(page_count: u32, n: u32) -> Result<Selection, SelectionError> {
    if n == 0 {
        return Err(SelectionError::ZeroCount { field: "pages" });
    }
    check_count("pages", n, page_count)?;

    Ok(Selection {
        indices: (0..n).collect(),
        page_count,
        first_count: n,
        last_count: 0,
    })
}

pub fn last_n(page_count: u32, n: u32) -> Result<Selection, SelectionError> {
    if n == 0 {
        return Err(SelectionError::ZeroCount { field: "pages" });
    }
    check_count("pages", n, page_count)?;

    Ok(Selection {
        indices: (page_count - n..page_count).collect(),
        page_count,
        first_count: 0,
        last_count: n,
    })
}

/// Union of the first `first` and last `last` pages.
///
/// Both counts are validated against `page_count` before any clamping. When
/// the two blocks would overlap, the last block is kept whole and the first
/// block shrinks to the pages in front of it.
pub fn first_and_last(page_count: u32, first: u32, last: u32) -> Result<Selection, SelectionError> {
    check_count("firstPages", first, page_count)?;
    check_count("lastPages", last, page_count)?;

    let last_count = last.min(page_count);
    let first_count = first.min(page_count - last_count);

    let mut indices: Vec<u32> = (0..first_count).collect();
    indices.extend((page_count - last_count..page_count).filter(|&i| i >= first_count));

    if indices.is_empty() {
        return Err(SelectionError::NoPagesSelected);
    }

    Ok(Selection {
        indices,
        page_count,
        first_count,
        last_count,
    })
}
