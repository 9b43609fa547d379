use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortProperty {
    Id,
    Name,
    Price,
    Quantity,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub property: SortProperty,
    pub direction: SortDirection,
}

impl Sort {
    pub fn asc(property: SortProperty) -> Self {
        Self { property, direction: SortDirection::Asc }
    }

    pub fn desc(property: SortProperty) -> Self {
        Self { property, direction: SortDirection::Desc }
    }
}

impl FromStr for SortProperty {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "price" => Ok(Self::Price),
            "quantity" => Ok(Self::Quantity),
            other => Err(DomainError::InvalidSort(format!(
                "unsupported sort property `{other}` (expected id|name|price|quantity)"
            ))),
        }
    }
}

impl FromStr for SortDirection {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(DomainError::InvalidSort(format!(
                "unsupported sort direction `{other}` (expected asc|desc)"
            ))),
        }
    }
}

/// Parses `property[,direction]`, e.g. `price,desc`.
impl FromStr for Sort {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut parts = value.splitn(2, ',');
        let property = parts.next().unwrap_or_default().parse()?;
        let direction = match parts.next() {
            Some(direction) => direction.parse()?,
            None => SortDirection::default(),
        };
        Ok(Self { property, direction })
    }
}

/// Zero-based page coordinates plus an optional ordering.
///
/// Values are carried as given; stores decide whether a request is usable
/// through [`PageRequest::validate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: Option<Sort>,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size, sort: None }
    }

    pub fn sorted(page: u32, size: u32, sort: Sort) -> Self {
        Self { page, size, sort: Some(sort) }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.size == 0 {
            return Err(DomainError::InvalidPageRequest(
                "page size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        Self { content, page: request.page, size: request.size, total_elements }
    }

    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            return 0;
        }
        self.total_elements.div_ceil(u64::from(self.size))
    }

    pub fn number_of_elements(&self) -> usize {
        self.content.len()
    }

    pub fn is_first(&self) -> bool {
        self.page == 0
    }

    pub fn is_last(&self) -> bool {
        u64::from(self.page) + 1 >= self.total_pages()
    }
}

#[cfg(test)]
mod tests {
    use super::{Page, PageRequest, Sort, SortDirection, SortProperty};
    use crate::errors::DomainError;

    #[test]
    fn sort_parses_property_with_default_direction() {
        let sort: Sort = "Name".parse().expect("sort should parse");
        assert_eq!(sort, Sort::asc(SortProperty::Name));
    }

    #[test]
    fn sort_parses_explicit_direction() {
        let sort: Sort = "price,DESC".parse().expect("sort should parse");
        assert_eq!(sort.property, SortProperty::Price);
        assert_eq!(sort.direction, SortDirection::Desc);
    }

    #[test]
    fn sort_rejects_unknown_property() {
        let error = "colour,asc".parse::<Sort>().expect_err("unknown property should fail");
        assert!(matches!(error, DomainError::InvalidSort(ref message) if message.contains("colour")));
    }

    #[test]
    fn zero_page_size_is_invalid() {
        let error = PageRequest::new(0, 0).validate().expect_err("size 0 should be rejected");
        assert!(matches!(error, DomainError::InvalidPageRequest(_)));
        assert!(PageRequest::new(3, 1).validate().is_ok());
    }

    #[test]
    fn offset_does_not_overflow_u32() {
        let request = PageRequest::new(u32::MAX, u32::MAX);
        assert_eq!(request.offset(), u64::from(u32::MAX) * u64::from(u32::MAX));
    }

    #[test]
    fn page_metadata_reflects_totals() {
        let page = Page::new(vec![1, 2], &PageRequest::new(2, 2), 5);

        assert_eq!(page.total_pages(), 3);
        assert_eq!(page.number_of_elements(), 2);
        assert!(!page.is_first());
        assert!(page.is_last());
    }

    #[test]
    fn empty_page_is_both_first_and_last() {
        let page: Page<u8> = Page::new(Vec::new(), &PageRequest::new(0, 10), 0);

        assert_eq!(page.total_pages(), 0);
        assert!(page.is_first());
        assert!(page.is_last());
    }
}
