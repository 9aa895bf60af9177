//! Reusable offset/limit pagination primitives.
//!
//! Repositories hand in closures that build and run their own content and
//! count statements; this module owns the page arithmetic, the decision of
//! whether a count statement is needed at all, and the page assembly.

use diesel::sqlite::SqliteConnection;
use log::debug;

use crate::pagination::{Page, PageRequest};
use crate::repository::errors::{RepositoryError, RepositoryResult};

/// Offset and limit of one page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    pub offset: i64,
    pub limit: i64,
}

/// When the total needs its own count statement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CountPolicy {
    /// Always run the count.
    Always,
    /// Skip the count when fewer rows than the page size came back; the
    /// total is then `offset + rows`.
    SkipOnShortPage,
}

/// Translates a page request into `offset = page * size`, `limit = size`.
///
/// Negative pages, non-positive sizes and overflowing offsets are rejected
/// before anything reaches the store.
pub fn to_offset_limit(request: &PageRequest) -> RepositoryResult<Window> {
    if request.page < 0 {
        return Err(RepositoryError::InvalidPageRequest(format!(
            "page index must not be negative, got {}",
            request.page
        )));
    }
    if request.size < 1 {
        return Err(RepositoryError::InvalidPageRequest(format!(
            "page size must be positive, got {}",
            request.size
        )));
    }
    let offset = request.page.checked_mul(request.size).ok_or_else(|| {
        RepositoryError::InvalidPageRequest(format!(
            "offset of page {} with size {} overflows",
            request.page, request.size
        ))
    })?;

    Ok(Window {
        offset,
        limit: request.size,
    })
}

/// Runs the caller's content statement for `window`.
pub fn run_content<T, C>(
    conn: &mut SqliteConnection,
    window: Window,
    content: C,
) -> RepositoryResult<Vec<T>>
where
    C: FnOnce(&mut SqliteConnection, Window) -> RepositoryResult<Vec<T>>,
{
    let rows = content(conn, window)?;
    debug!(
        "content statement returned {} rows (offset {}, limit {})",
        rows.len(),
        window.offset,
        window.limit
    );
    Ok(rows)
}

/// Runs the caller's count statement.
pub fn run_count<N>(conn: &mut SqliteConnection, count: N) -> RepositoryResult<i64>
where
    N: FnOnce(&mut SqliteConnection) -> RepositoryResult<i64>,
{
    let total = count(conn)?;
    debug!("count statement returned {total}");
    Ok(total)
}

/// Builds the page, asking `total` for the element count at most once and
/// only when `policy` requires it.
pub fn assemble<T, F>(
    content: Vec<T>,
    request: PageRequest,
    policy: CountPolicy,
    total: F,
) -> RepositoryResult<Page<T>>
where
    F: FnOnce() -> RepositoryResult<i64>,
{
    let window = to_offset_limit(&request)?;
    let fetched = content.len() as i64;

    let total_elements = match policy {
        CountPolicy::SkipOnShortPage if fetched < window.limit => {
            debug!(
                "short page ({fetched} < {}), skipping count statement",
                window.limit
            );
            window.offset + fetched
        }
        _ => total()?,
    };

    Ok(Page::new(content, request, total_elements))
}

/// Content statement followed by a count statement as `policy` allows.
pub fn apply_pagination<T, C, N>(
    conn: &mut SqliteConnection,
    request: &PageRequest,
    policy: CountPolicy,
    content: C,
    count: N,
) -> RepositoryResult<Page<T>>
where
    C: FnOnce(&mut SqliteConnection, Window) -> RepositoryResult<Vec<T>>,
    N: FnOnce(&mut SqliteConnection) -> RepositoryResult<i64>,
{
    let window = to_offset_limit(request)?;
    let rows = run_content(conn, window, content)?;
    assemble(rows, request.clone(), policy, || run_count(conn, count))
}

/// One statement returning each row together with the store-derived total
/// of the whole filtered result.
///
/// An empty slice carries no total. On the first page that means zero
/// matches; past the first page `count` derives the total with one more
/// statement.
pub fn fetch_results<T, C, N>(
    conn: &mut SqliteConnection,
    request: &PageRequest,
    content_with_total: C,
    count: N,
) -> RepositoryResult<Page<T>>
where
    C: FnOnce(&mut SqliteConnection, Window) -> RepositoryResult<Vec<(T, i64)>>,
    N: FnOnce(&mut SqliteConnection) -> RepositoryResult<i64>,
{
    let window = to_offset_limit(request)?;
    let rows = run_content(conn, window, content_with_total)?;

    let derived = rows.first().map(|(_, total)| *total);
    let content: Vec<T> = rows.into_iter().map(|(item, _)| item).collect();

    let total_elements = match derived {
        Some(total) => total,
        None if window.offset == 0 => 0,
        None => {
            debug!(
                "empty slice at offset {}, deriving total separately",
                window.offset
            );
            run_count(conn, count)?
        }
    };

    Ok(Page::new(content, request.clone(), total_elements))
}
