//! Environment-driven sizing for property suites.

use std::env;

/// Environment variable overriding proptest case counts.
pub const PROGTEST_CASES_ENV_KEY: &str = "PROGTEST_CASES";

/// Returns the case count for a property suite.
///
/// `PROGTEST_CASES` overrides `default_cases` when it holds a positive
/// integer; anything else is logged and ignored.
///
/// # Examples
/// ```
/// use linkcom_test_support::property::proptest_cases;
///
/// assert!(proptest_cases(64) > 0);
/// ```
#[must_use]
pub fn proptest_cases(default_cases: u32) -> u32 {
    let Ok(raw) = env::var(PROGTEST_CASES_ENV_KEY) else {
        return default_cases;
    };
    parse_cases(&raw).unwrap_or_else(|reason| {
        tracing::warn!(
            env = PROGTEST_CASES_ENV_KEY,
            raw = %raw,
            reason,
            "invalid property-test case override; using default",
        );
        default_cases
    })
}

fn parse_cases(raw: &str) -> Result<u32, &'static str> {
    match raw.trim().parse::<u32>() {
        Ok(0) => Err("cases must be > 0"),
        Ok(cases) => Ok(cases),
        Err(_) => Err("not an unsigned integer"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", 1)]
    #[case(" 250 ", 250)]
    #[case("25000", 25_000)]
    fn parses_positive_counts(#[case] raw: &str, #[case] expected: u32) {
        assert_eq!(parse_cases(raw), Ok(expected));
    }

    #[rstest]
    #[case("0")]
    #[case("-1")]
    #[case("abc")]
    #[case("")]
    fn rejects_other_values(#[case] raw: &str) {
        assert!(parse_cases(raw).is_err());
    }
}
