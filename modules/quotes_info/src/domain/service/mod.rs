use chrono::{DateTime, SubsecRound, Utc};

use crate::contract::model::PageRequest;
use crate::domain::error::DomainError;

mod quotes;
mod users;

pub use quotes::QuoteService;
pub use users::UserService;

/// Configuration shared by the domain services
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
    pub max_name_length: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
            max_name_length: 255,
        }
    }
}

impl ServiceConfig {
    /// Apply defaults and bounds to a page request.
    pub(crate) fn resolve_page(&self, req: PageRequest) -> Result<ResolvedPage, DomainError> {
        let page = req.page.unwrap_or(1);
        if page < 1 {
            return Err(DomainError::validation(
                "page",
                "must be greater than or equal to 1",
            ));
        }

        let per_page = req.per_page.unwrap_or(self.default_page_size);
        if per_page < 1 || per_page > self.max_page_size {
            return Err(DomainError::validation(
                "per_page",
                format!("must be between 1 and {}", self.max_page_size),
            ));
        }

        Ok(ResolvedPage { page, per_page })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ResolvedPage {
    pub page: u32,
    pub per_page: u32,
}

impl ResolvedPage {
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }
}

/// Current time at the precision every supported store keeps.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Blank filter values mean "no filter".
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn required_text(field: &'static str, value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::empty_field(field));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_page_applies_defaults() {
        let cfg = ServiceConfig::default();
        let page = cfg.resolve_page(PageRequest::default()).unwrap();
        assert_eq!(page, ResolvedPage { page: 1, per_page: 10 });
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn resolve_page_rejects_out_of_range() {
        let cfg = ServiceConfig::default();
        for (page, per_page) in [(0, 10), (1, 0), (1, 101)] {
            let err = cfg
                .resolve_page(PageRequest::new(page, per_page))
                .unwrap_err();
            assert!(matches!(err, DomainError::Validation { .. }), "{err:?}");
        }
        assert!(cfg.resolve_page(PageRequest::new(1, 100)).is_ok());
    }

    #[test]
    fn offset_skips_previous_pages() {
        let page = ResolvedPage { page: 3, per_page: 5 };
        assert_eq!(page.offset(), 10);
        assert_eq!(page.limit(), 5);
    }

    #[test]
    fn now_has_microsecond_precision() {
        assert_eq!(now().timestamp_subsec_nanos() % 1_000, 0);
    }

    #[test]
    fn text_helpers_trim_input() {
        assert_eq!(required_text("name", "  Ada ").unwrap(), "Ada");
        assert_eq!(
            required_text("name", "   ").unwrap_err(),
            DomainError::empty_field("name")
        );
        assert_eq!(non_blank(Some("  ".into())), None);
        assert_eq!(non_blank(Some(" life ".into())), Some("life".into()));
    }
}
