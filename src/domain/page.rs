//! Paging and sorting types
//!
//! Interface page numbers are 1-based; [`PageRequest`] and [`Page`] carry the
//! 0-based index the record store works with.

use super::errors::PatientError;
use super::patient::PatientResponse;
use super::result::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Parses a caller-supplied direction
    ///
    /// `desc` and `descending` (any case) select descending order. Every other
    /// value, including an empty one, is treated as ascending.
    pub fn parse_lenient(value: &str) -> Self {
        let value = value.trim();
        if value.eq_ignore_ascii_case("desc") || value.eq_ignore_ascii_case("descending") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    pub fn is_ascending(&self) -> bool {
        matches!(self, SortDirection::Asc)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Allow-listed sort fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Name,
    Email,
    Address,
    DateOfBirth,
    CreatedAt,
}

impl SortField {
    /// Parses a caller-supplied sort field
    ///
    /// # Errors
    ///
    /// Returns `PatientError::Validation` for any field outside the allow-list.
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim() {
            "name" => Ok(SortField::Name),
            "email" => Ok(SortField::Email),
            "address" => Ok(SortField::Address),
            "dateOfBirth" | "date_of_birth" => Ok(SortField::DateOfBirth),
            "createdAt" | "created_at" => Ok(SortField::CreatedAt),
            other => Err(PatientError::Validation(format!(
                "Unsupported sort field '{other}'. Allowed: name, email, address, dateOfBirth, createdAt"
            ))),
        }
    }

    /// Canonical field name as exposed to callers
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Email => "email",
            SortField::Address => "address",
            SortField::DateOfBirth => "dateOfBirth",
            SortField::CreatedAt => "createdAt",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field and direction pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}

/// 0-based page request handed to the record store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page_index: u32,
    pub size: u32,
    pub sort: Sort,
}

impl PageRequest {
    pub fn new(page_index: u32, size: u32, sort: Sort) -> Self {
        Self {
            page_index,
            size,
            sort,
        }
    }

    /// Number of rows to skip
    pub fn offset(&self) -> u64 {
        u64::from(self.page_index) * u64::from(self.size)
    }
}

/// One page of store results
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub content: Vec<T>,
    /// 0-based page index
    pub number: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Builds a page, deriving the total page count from the element total
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let size = u64::from(request.size.max(1));
        let total_pages = total_elements.div_ceil(size);
        Self {
            content,
            number: request.page_index,
            size: request.size,
            total_elements,
            total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
        }
    }
}

/// Caller-facing list query
///
/// # Examples
///
/// ```
/// use patient_service::domain::page::ListQuery;
///
/// let query = ListQuery::new(1, 10).sorted_by("desc", "name").search("smith");
/// assert!(!query.is_browse());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// 1-based page number
    pub page: u32,
    pub size: u32,
    pub sort_direction: String,
    pub sort_field: String,
    pub search: String,
}

impl ListQuery {
    /// Query for a page, sorted ascending by name, with no search term
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            sort_direction: "asc".to_string(),
            sort_field: "name".to_string(),
            search: String::new(),
        }
    }

    pub fn sorted_by(mut self, direction: impl Into<String>, field: impl Into<String>) -> Self {
        self.sort_direction = direction.into();
        self.sort_field = field.into();
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    /// Trimmed search term, `None` when blank
    pub fn search_term(&self) -> Option<&str> {
        let term = self.search.trim();
        (!term.is_empty()).then_some(term)
    }

    /// True when no search filter applies (the cacheable path)
    pub fn is_browse(&self) -> bool {
        self.search_term().is_none()
    }
}

/// Paged query result returned to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedPatients {
    pub patients: Vec<PatientResponse>,
    /// 1-based page number
    pub page: u32,
    pub total_pages: u32,
    pub size: u32,
    pub total_elements: u64,
}

impl<T> From<Page<T>> for PagedPatients
where
    T: Into<PatientResponse>,
{
    fn from(page: Page<T>) -> Self {
        Self {
            patients: page.content.into_iter().map(Into::into).collect(),
            page: page.number + 1,
            total_pages: page.total_pages,
            size: page.size,
            total_elements: page.total_elements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("desc", SortDirection::Desc ; "lowercase desc")]
    #[test_case("DESC", SortDirection::Desc ; "uppercase desc")]
    #[test_case(" Descending ", SortDirection::Desc ; "descending synonym")]
    #[test_case("asc", SortDirection::Asc ; "asc")]
    #[test_case("", SortDirection::Asc ; "empty")]
    #[test_case("down", SortDirection::Asc ; "unknown value")]
    fn test_parse_direction(input: &str, expected: SortDirection) {
        assert_eq!(SortDirection::parse_lenient(input), expected);
    }

    #[test_case("name", SortField::Name)]
    #[test_case("email", SortField::Email)]
    #[test_case("address", SortField::Address)]
    #[test_case("dateOfBirth", SortField::DateOfBirth)]
    #[test_case("date_of_birth", SortField::DateOfBirth)]
    #[test_case("created_at", SortField::CreatedAt)]
    fn test_parse_field(input: &str, expected: SortField) {
        assert_eq!(SortField::parse(input).unwrap(), expected);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = SortField::parse("password; DROP TABLE patients").unwrap_err();
        assert!(matches!(err, PatientError::Validation(_)));
    }

    #[test_case(0, 10, 0 ; "empty")]
    #[test_case(10, 10, 1 ; "exact")]
    #[test_case(11, 10, 2 ; "remainder")]
    fn test_total_pages(total: u64, size: u32, expected: u32) {
        let request = PageRequest::new(0, size, Sort::new(SortField::Name, SortDirection::Asc));
        let page: Page<()> = Page::new(Vec::new(), &request, total);
        assert_eq!(page.total_pages, expected);
    }

    #[test]
    fn test_offset() {
        let request = PageRequest::new(3, 25, Sort::new(SortField::Name, SortDirection::Asc));
        assert_eq!(request.offset(), 75);
    }

    #[test]
    fn test_blank_search_is_browse() {
        assert!(ListQuery::new(1, 10).search("   ").is_browse());
        assert_eq!(
            ListQuery::new(1, 10).search("  smith ").search_term(),
            Some("smith")
        );
    }
}
