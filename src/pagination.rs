//! Page requests and page results shared by the repository and services.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Direction of a [`Sort`].
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// Columns of the member/team view a page may be ordered by.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortProperty {
    Id,
    Username,
    Age,
    TeamName,
}

/// Requested ordering. Member id ascending is always appended as a
/// tie-break so offset paging stays deterministic.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sort {
    pub property: SortProperty,
    #[serde(default)]
    pub direction: Direction,
}

impl Sort {
    pub fn asc(property: SortProperty) -> Self {
        Self {
            property,
            direction: Direction::Asc,
        }
    }

    pub fn desc(property: SortProperty) -> Self {
        Self {
            property,
            direction: Direction::Desc,
        }
    }
}

/// A 0-based page request.
///
/// Values are kept as given; they are validated only when translated into an
/// offset and limit (see [`crate::repository::support::to_offset_limit`]).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub size: i64,
    #[serde(default)]
    pub sort: Option<Sort>,
}

impl PageRequest {
    pub fn of(page: i64, size: i64) -> Self {
        Self {
            page,
            size,
            sort: None,
        }
    }

    pub fn sorted(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Request for the page after this one, keeping size and sort.
    pub fn next(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            ..self.clone()
        }
    }
}

/// How a page's total element count is determined.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaginationStrategy {
    /// One statement returns the slice and a store-derived total
    /// (`COUNT(*) OVER ()` over the joined rows).
    ///
    /// Best effort only: the derived total counts joined rows, so a join
    /// that fans out over-counts. Not suitable for group-by or one-to-many
    /// joins.
    SingleQuery,
    /// Content statement plus an independent count statement. Always
    /// correct, always two round-trips.
    ExplicitCount,
    /// Content statement first; the count statement only runs when a full
    /// page came back.
    ///
    /// A short page proves it is the last one, so the total is `offset +
    /// rows`. This is only accurate when the short page is reached by
    /// walking forward from the start: jumping straight to an offset past
    /// the end yields zero rows and a reported total equal to the offset.
    #[default]
    CountSkip,
}

impl Display for PaginationStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PaginationStrategy::SingleQuery => write!(f, "single_query"),
            PaginationStrategy::ExplicitCount => write!(f, "explicit_count"),
            PaginationStrategy::CountSkip => write!(f, "count_skip"),
        }
    }
}

/// A slice of a result set plus the total element count of the whole set.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: i64,
    pub pageable: PageRequest,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, pageable: PageRequest, total_elements: i64) -> Self {
        Self {
            content,
            total_elements,
            pageable,
        }
    }

    pub fn empty(pageable: PageRequest) -> Self {
        Self::new(Vec::new(), pageable, 0)
    }

    pub fn number_of_elements(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn total_pages(&self) -> i64 {
        let size = self.pageable.size;
        if size <= 0 {
            return 1;
        }
        self.total_elements / size + i64::from(self.total_elements % size != 0)
    }

    pub fn is_first(&self) -> bool {
        self.pageable.page == 0
    }

    pub fn is_last(&self) -> bool {
        !self.has_next()
    }

    pub fn has_next(&self) -> bool {
        self.pageable.page.saturating_add(1) < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.pageable.page > 0
    }

    /// Converts the content while keeping the total and the request.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            pageable: self.pageable,
        }
    }
}
