// Multileave is an open source engine for online evaluation of ranking functions.
// Copyright (C) 2026 the Multileave authors
//
// This code is licensed under the GNU Affero General Public License.

use std::str::FromStr;

use crate::Result;

/// How multi-outcome comparison scores are summarized.
///
/// Only `binary` vs. non-binary is meaningful to the multileaving path; the
/// remaining modes exist for pairwise interleaving variants and are accepted
/// and validated here so configuration strings stay portable across methods.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
pub enum Aggregate {
    #[default]
    Expectation,
    LogLikelihoodRatio,
    LikelihoodRatio,
    LogRatio,
    Binary,
}

impl Aggregate {
    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregate::Expectation => "expectation",
            Aggregate::LogLikelihoodRatio => "log-likelihood-ratio",
            Aggregate::LikelihoodRatio => "likelihood-ratio",
            Aggregate::LogRatio => "log-ratio",
            Aggregate::Binary => "binary",
        }
    }
}

impl FromStr for Aggregate {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expectation" => Ok(Self::Expectation),
            "log-likelihood-ratio" => Ok(Self::LogLikelihoodRatio),
            "likelihood-ratio" => Ok(Self::LikelihoodRatio),
            "log-ratio" => Ok(Self::LogRatio),
            "binary" => Ok(Self::Binary),
            s => anyhow::bail!("Unknown aggregate mode: {s}"),
        }
    }
}

/// Construction-time options for a comparison method.
///
/// Parsed from lerot-style argument strings such as
/// `"--aggregate binary -c true"`. Unrecognized options are ignored so one
/// configuration string can be shared between comparison methods with
/// different surfaces; an invalid value for a recognized option is an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComparisonOptions {
    pub aggregate: Aggregate,
    pub det_interleave: bool,
    pub compare_td: bool,
    pub credits: bool,
}

impl ComparisonOptions {
    pub fn parse(arg_str: &str) -> Result<Self> {
        let mut opts = Self::default();
        let tokens = split_arg_str(arg_str);

        let mut i = 0;
        while i < tokens.len() {
            match tokens[i].as_str() {
                flag @ ("-a" | "--aggregate") => {
                    opts.aggregate = take_value(&tokens, &mut i, flag)?.parse()?;
                }
                flag @ ("-d" | "--det_interleave") => {
                    opts.det_interleave = parse_bool(take_value(&tokens, &mut i, flag)?)?;
                }
                flag @ ("-t" | "--compare_td") => {
                    opts.compare_td = parse_bool(take_value(&tokens, &mut i, flag)?)?;
                }
                flag @ ("-c" | "--credits") => {
                    opts.credits = parse_bool(take_value(&tokens, &mut i, flag)?)?;
                }
                _ => {}
            }
            i += 1;
        }

        Ok(opts)
    }
}

fn take_value<'a>(tokens: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str> {
    *i += 1;
    match tokens.get(*i) {
        Some(value) => Ok(value),
        None => anyhow::bail!("Option {flag} requires a value"),
    }
}

fn parse_bool(s: &str) -> Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        s => anyhow::bail!("Expected a boolean, got: {s}"),
    }
}

/// Splits an argument string into tokens, honoring double quotes.
///
/// A double-quoted region becomes exactly one token with its whitespace kept;
/// everything between quoted regions splits on whitespace. An unterminated
/// quote keeps the remainder of the string as the final token.
pub fn split_arg_str(arg_str: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut rest = arg_str;

    while let Some(open) = rest.find('"') {
        tokens.extend(rest[..open].split_whitespace().map(str::to_owned));
        let quoted = &rest[open + 1..];
        match quoted.find('"') {
            Some(close) => {
                tokens.push(quoted[..close].to_owned());
                rest = &quoted[close + 1..];
            }
            None => {
                tokens.push(quoted.to_owned());
                rest = "";
            }
        }
    }
    tokens.extend(rest.split_whitespace().map(str::to_owned));

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_plain() {
        assert_eq!(
            split_arg_str("--a 10 --b foo"),
            vec!["--a", "10", "--b", "foo"]
        );
        assert!(split_arg_str("").is_empty());
        assert!(split_arg_str("   ").is_empty());
    }

    #[test]
    fn split_quoted_value() {
        assert_eq!(
            split_arg_str("--a 10 --b foo --c \"--d bar --e 42\""),
            vec!["--a", "10", "--b", "foo", "--c", "--d bar --e 42"]
        );
    }

    #[test]
    fn split_quoted_flag() {
        assert_eq!(
            split_arg_str("\"--a\" 10 --b foo --c --d bar --e 42"),
            vec!["--a", "10", "--b", "foo", "--c", "--d", "bar", "--e", "42"]
        );
    }

    #[test]
    fn split_adjacent_quotes() {
        assert_eq!(
            split_arg_str("\"--a\"\" 10\"--b foo --c --d bar --e 42"),
            vec!["--a", " 10", "--b", "foo", "--c", "--d", "bar", "--e", "42"]
        );
    }

    #[test]
    fn defaults() {
        let opts = ComparisonOptions::parse("").unwrap();
        assert_eq!(opts.aggregate, Aggregate::Expectation);
        assert!(!opts.det_interleave);
        assert!(!opts.compare_td);
        assert!(!opts.credits);
    }

    #[test]
    fn recognized_options() {
        let opts = ComparisonOptions::parse("-a binary -d true -t 1 -c True").unwrap();
        assert_eq!(opts.aggregate, Aggregate::Binary);
        assert!(opts.det_interleave);
        assert!(opts.compare_td);
        assert!(opts.credits);

        let opts = ComparisonOptions::parse("--aggregate log-likelihood-ratio --credits false")
            .unwrap();
        assert_eq!(opts.aggregate, Aggregate::LogLikelihoodRatio);
        assert!(!opts.credits);
    }

    #[test]
    fn unrecognized_options_are_ignored() {
        let opts = ComparisonOptions::parse("--n_samples 100 -c true --verbose banana").unwrap();
        assert!(opts.credits);
        assert_eq!(opts.aggregate, Aggregate::Expectation);
    }

    #[test]
    fn invalid_aggregate_is_rejected() {
        assert!(ComparisonOptions::parse("--aggregate mean").is_err());
    }

    #[test]
    fn invalid_bool_is_rejected() {
        assert!(ComparisonOptions::parse("-c banana").is_err());
    }

    #[test]
    fn missing_value_is_rejected() {
        assert!(ComparisonOptions::parse("--aggregate").is_err());
    }
}
