//! Terminal styling helpers for build logs.
//!
//! Styling goes through the `console` crate, which downgrades to plain text
//! when stdout is not a terminal (several Windows CI providers drop lines
//! containing raw escape sequences).

use console::Style;

/// Styles used for build-log output.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Style for stage banners (green bold).
    pub stage: Style,
    /// Style for fatal error prefixes (red bold).
    pub error: Style,
    /// Style for warnings (yellow).
    pub warning: Style,
    /// Style for echoed command lines (dim).
    pub command: Style,
}

impl Theme {
    /// Create the default theme.
    pub fn new() -> Self {
        Self {
            stage: Style::new().green().bold(),
            error: Style::new().red().bold(),
            warning: Style::new().yellow(),
            command: Style::new().dim(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new()
    }
}

/// Return the default [`Theme`].  Styles are cheap to construct.
pub fn theme() -> Theme {
    Theme::new()
}

/// Compose the separator line: `stage` centered in a run of `fill_char`,
/// one space on each side.  When fewer than 3 fill characters would fit,
/// the bare stage is returned instead of a squeezed banner.  An odd fill
/// puts the extra character on the right.
fn banner(stage: &str, fill_char: char, width: usize) -> String {
    let fill_width = width.saturating_sub(stage.chars().count() + 2);
    if fill_width < 3 {
        return stage.to_string();
    }
    let left = fill_char.to_string().repeat(fill_width / 2);
    let right = fill_char.to_string().repeat(fill_width - fill_width / 2);
    format!("{left} {stage} {right}")
}

/// Print a full-width separator banner for `stage` in bold green.
///
/// The stage name is centered in a line of `=` sized to the terminal
/// (80 columns when stdout is not a terminal).  Stages too long to leave
/// room for the fill print bare.
pub fn log_stage(stage: &str) {
    log_stage_with(stage, '=', None);
}

/// [`log_stage`] with an explicit fill character and optional width.
pub fn log_stage_with(stage: &str, fill_char: char, width: Option<usize>) {
    let width = width.unwrap_or_else(|| console::Term::stdout().size().1 as usize);
    println!("{}", theme().stage.apply_to(banner(stage, fill_char, width)));
}

/// Print `stage` with a bold green `==> ` prefix, no separator line.
///
/// Makes build stages easy to find in CI logs: search for the bright
/// green arrow.
pub fn log_build_stage(stage: &str) {
    println!("{} {}", theme().stage.apply_to("==>"), stage);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_styles_apply() {
        // Styles may or may not emit escape codes depending on tty detection;
        // either way the message text must survive.
        let styled = theme().stage.apply_to("Configure").to_string();
        assert!(styled.contains("Configure"));
    }

    #[test]
    fn banner_splits_even_fill_evenly() {
        let line = banner("Build", '=', 21);
        assert_eq!(line, "======= Build =======");
        assert_eq!(line.len(), 21);
    }

    #[test]
    fn banner_puts_odd_fill_surplus_on_the_right() {
        let line = banner("Build", '-', 20);
        assert_eq!(line, "------ Build -------");
        assert_eq!(line.len(), 20);
    }

    #[test]
    fn banner_prints_bare_stage_when_fill_cannot_fit() {
        let stage = "M".repeat(44);
        // 44 columns leaves no room for fill plus spaces.
        let line = banner(&stage, '=', 44);
        assert_eq!(line, stage);
        assert!(!line.contains('='));
        assert!(!line.contains(' '));

        // Two fill characters total is still below the minimum of three.
        assert_eq!(banner("Build", '=', 9), "Build");
        // Three is the smallest banner.
        assert_eq!(banner("Build", '=', 10), "= Build ==");
    }
}
