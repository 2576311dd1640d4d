//! Output verbosity levels.

use std::fmt;
use std::str::FromStr;

/// How much the CLI prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Everything, including per-attempt detail.
    Verbose,
    /// Status lines, spinners, and summaries.
    #[default]
    Normal,
    /// Errors and final results only.
    Quiet,
    /// Nothing at all; the exit code is the only signal.
    Silent,
}

impl OutputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Verbose => "verbose",
            OutputMode::Normal => "normal",
            OutputMode::Quiet => "quiet",
            OutputMode::Silent => "silent",
        }
    }

    /// Whether step status lines and headers should be printed.
    pub fn shows_status(&self) -> bool {
        matches!(self, OutputMode::Verbose | OutputMode::Normal)
    }

    /// Whether animated spinners should be shown.
    ///
    /// Quiet suppresses spinners so piped `--json` output stays clean.
    pub fn shows_spinners(&self) -> bool {
        matches!(self, OutputMode::Verbose | OutputMode::Normal)
    }

    /// Whether errors should still be printed.
    pub fn shows_errors(&self) -> bool {
        !matches!(self, OutputMode::Silent)
    }
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "verbose" => Ok(Self::Verbose),
            "normal" => Ok(Self::Normal),
            "quiet" => Ok(Self::Quiet),
            "silent" => Ok(Self::Silent),
            _ => Err(format!("unknown output mode: {}", s)),
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_mode_from_str() {
        assert_eq!("verbose".parse::<OutputMode>(), Ok(OutputMode::Verbose));
        assert_eq!("QUIET".parse::<OutputMode>(), Ok(OutputMode::Quiet));
        assert!("invalid".parse::<OutputMode>().is_err());
    }

    #[test]
    fn output_mode_default() {
        assert_eq!(OutputMode::default(), OutputMode::Normal);
    }

    #[test]
    fn normal_shows_status_and_spinners() {
        assert!(OutputMode::Normal.shows_status());
        assert!(OutputMode::Normal.shows_spinners());
        assert!(OutputMode::Normal.shows_errors());
    }

    #[test]
    fn quiet_suppresses_status_but_not_errors() {
        assert!(!OutputMode::Quiet.shows_status());
        assert!(!OutputMode::Quiet.shows_spinners());
        assert!(OutputMode::Quiet.shows_errors());
    }

    #[test]
    fn silent_suppresses_everything() {
        assert!(!OutputMode::Silent.shows_status());
        assert!(!OutputMode::Silent.shows_spinners());
        assert!(!OutputMode::Silent.shows_errors());
    }

    #[test]
    fn display_round_trips() {
        for mode in [
            OutputMode::Verbose,
            OutputMode::Normal,
            OutputMode::Quiet,
            OutputMode::Silent,
        ] {
            assert_eq!(mode.to_string().parse::<OutputMode>(), Ok(mode));
        }
    }
}
