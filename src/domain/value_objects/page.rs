use thiserror::Error;

use super::Sort;

/// Rejections raised while building a page request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageRequestError {
    #[error("Page index must not be less than zero (got {0})")]
    NegativePageNumber(i64),

    #[error("Page size must not be less than one (got {0})")]
    PageSizeTooSmall(i64),

    #[error("Page parameter out of range: {0}")]
    OutOfRange(i64),
}

/// Zero-based, offset-indexed request for a slice of a collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    page_number: u32,
    page_size: u32,
    sort: Option<Sort>,
}

impl PageRequest {
    /// Build an unsorted page request
    ///
    /// # Errors
    /// Returns an error if `page_number` is negative or `page_size` is below one
    pub fn of(page_number: i64, page_size: i64) -> Result<Self, PageRequestError> {
        if page_number < 0 {
            return Err(PageRequestError::NegativePageNumber(page_number));
        }
        if page_size < 1 {
            return Err(PageRequestError::PageSizeTooSmall(page_size));
        }

        let page_number =
            u32::try_from(page_number).map_err(|_| PageRequestError::OutOfRange(page_number))?;
        let page_size =
            u32::try_from(page_size).map_err(|_| PageRequestError::OutOfRange(page_size))?;

        Ok(Self { page_number, page_size, sort: None })
    }

    /// Attach an ordering to this request
    #[must_use]
    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn sort(&self) -> Option<&Sort> {
        self.sort.as_ref()
    }

    /// Number of rows to skip before this page starts
    pub fn offset(&self) -> u64 {
        u64::from(self.page_number) * u64::from(self.page_size)
    }
}

/// One slice of a collection together with the total it was cut from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page_number: u32,
    pub page_size: u32,
    pub total_elements: u64,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        Self {
            content,
            page_number: request.page_number(),
            page_size: request.page_size(),
            total_elements,
        }
    }

    /// Number of pages needed to hold every element at this page size
    pub fn total_pages(&self) -> u32 {
        let size = u64::from(self.page_size.max(1));
        u32::try_from(self.total_elements.div_ceil(size)).unwrap_or(u32::MAX)
    }

    /// Whether no page follows this one
    pub fn is_last(&self) -> bool {
        u64::from(self.page_number) + 1 >= u64::from(self.total_pages())
    }

    /// Transform the content while keeping the page metadata
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page_number: self.page_number,
            page_size: self.page_size,
            total_elements: self.total_elements,
        }
    }
}
