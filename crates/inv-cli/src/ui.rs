use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::{GlobalFlags, OutputFormat};

/// Terminal capabilities resolved once from flags and environment.
#[derive(Clone, Copy, Debug, Default)]
pub struct UiPrefs {
    pub table_color: bool,
    pub progress: bool,
    pub term_width: Option<usize>,
}

static UI_PREFS: OnceLock<UiPrefs> = OnceLock::new();

pub fn init(flags: &GlobalFlags) {
    let _ = UI_PREFS.set(resolve(
        flags,
        std::io::stdout().is_terminal(),
        std::env::var_os("NO_COLOR").is_some(),
        std::env::var("COLUMNS").ok().as_deref(),
    ));
}

fn resolve(flags: &GlobalFlags, is_tty: bool, no_color: bool, columns: Option<&str>) -> UiPrefs {
    let interactive = is_tty && !flags.quiet;
    UiPrefs {
        table_color: interactive && !no_color && flags.format == OutputFormat::Table,
        progress: interactive && flags.format != OutputFormat::Json,
        term_width: columns
            .and_then(|value| value.trim().parse::<usize>().ok())
            .filter(|width| *width >= 40),
    }
}

/// Preferences set by [`init`], or everything off before it runs.
#[must_use]
pub fn prefs() -> UiPrefs {
    UI_PREFS.get().copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::resolve;
    use crate::cli::{GlobalFlags, OutputFormat};

    fn flags(format: OutputFormat, quiet: bool) -> GlobalFlags {
        GlobalFlags {
            format,
            limit: None,
            page: None,
            quiet,
            verbose: false,
            user: None,
            project: None,
        }
    }

    #[test]
    fn color_only_for_interactive_tables() {
        assert!(resolve(&flags(OutputFormat::Table, false), true, false, None).table_color);
        assert!(!resolve(&flags(OutputFormat::Table, false), true, true, None).table_color);
        assert!(!resolve(&flags(OutputFormat::Table, true), true, false, None).table_color);
        assert!(!resolve(&flags(OutputFormat::Json, false), true, false, None).table_color);
    }

    #[test]
    fn narrow_or_bogus_columns_are_ignored() {
        let f = flags(OutputFormat::Table, false);
        assert_eq!(resolve(&f, false, false, Some("120")).term_width, Some(120));
        assert_eq!(resolve(&f, false, false, Some("20")).term_width, None);
        assert_eq!(resolve(&f, false, false, Some("wide")).term_width, None);
        assert!(!resolve(&f, false, false, None).progress);
    }
}
