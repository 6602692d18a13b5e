use inv_core::responses::Page;

use crate::cli::GlobalFlags;

/// Compute effective limit with precedence: local arg -> global flag -> fallback.
#[must_use]
pub fn effective_limit(local: Option<u32>, global: Option<u32>, fallback: u32) -> u32 {
    local.or(global).unwrap_or(fallback)
}

/// Page request from `--page` / `--limit`, defaulting to `general.page_size`.
#[must_use]
pub fn page_request(flags: &GlobalFlags, default_size: u32) -> Page {
    Page::new(
        flags.page.unwrap_or(1),
        effective_limit(None, flags.limit, default_size),
    )
}

#[cfg(test)]
mod tests {
    use super::{effective_limit, page_request};
    use crate::cli::{GlobalFlags, OutputFormat};

    fn flags(limit: Option<u32>, page: Option<u32>) -> GlobalFlags {
        GlobalFlags {
            format: OutputFormat::Json,
            limit,
            page,
            quiet: false,
            verbose: false,
            user: None,
            project: None,
        }
    }

    #[test]
    fn local_takes_precedence() {
        assert_eq!(effective_limit(Some(5), Some(10), 20), 5);
    }

    #[test]
    fn global_used_when_local_missing() {
        assert_eq!(effective_limit(None, Some(10), 20), 10);
    }

    #[test]
    fn fallback_used_when_none_set() {
        assert_eq!(effective_limit(None, None, 20), 20);
    }

    #[test]
    fn page_defaults_to_first_page_of_configured_size() {
        let page = page_request(&flags(None, None), 15);
        assert_eq!((page.page, page.page_size), (1, 15));

        let page = page_request(&flags(Some(500), Some(3)), 15);
        assert_eq!(page.page, 3);
        assert_eq!(page.page_size, inv_core::responses::MAX_PAGE_SIZE);
    }
}
