//! Loads grader configuration overrides from TOML.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use maze_grader_core::GraderConfig;

/// Reads the configuration at `path`, falling back to defaults when absent.
pub(crate) fn load(path: Option<&Path>) -> Result<GraderConfig> {
    let Some(path) = path else {
        return Ok(GraderConfig::default());
    };

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read grader config at {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid grader config at {}", path.display()))
}

fn parse(contents: &str) -> Result<GraderConfig> {
    toml::from_str(contents).context("failed to parse grader config toml contents")
}

#[cfg(test)]
mod tests {
    use super::parse;
    use maze_grader_core::{DangerScaling, GraderConfig, InvalidCharacterPolicy};

    #[test]
    fn empty_file_yields_defaults() {
        let config = parse("").expect("empty config parses");
        assert_eq!(config, GraderConfig::default());
    }

    #[test]
    fn partial_sections_override_only_named_values() {
        let config = parse(
            r#"
            [limits]
            max_rows = 32

            [search]
            timeout_ms = 250

            [scoring.danger]
            kind = "square_root"
            factor = 20.0
            cap = 60.0

            [policies]
            invalid_characters = "replace_with_wall"
            "#,
        )
        .expect("config parses");

        assert_eq!(config.limits.max_rows, 32);
        assert_eq!(config.limits.max_cols, 64);
        assert_eq!(config.search.timeout_ms, 250);
        assert_eq!(config.search.iteration_multiplier, 20);
        assert_eq!(
            config.scoring.danger,
            DangerScaling::SquareRoot {
                factor: 20.0,
                cap: 60.0
            }
        );
        assert_eq!(
            config.policies.invalid_characters,
            InvalidCharacterPolicy::ReplaceWithWall
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse("[limits]\nmax_rowz = 3\n").is_err());
        assert!(parse("verbose = true\n").is_err());
    }
}
