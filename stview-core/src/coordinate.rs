/// Numeric text parsing for node coordinates
use nom::{
    character::complete::multispace0, combinator::all_consuming, number::complete::double,
    sequence::delimited, IResult,
};

fn coordinate(input: &str) -> IResult<&str, f64> {
    all_consuming(delimited(multispace0, double, multispace0))(input)
}

/// Parse a coordinate written as text.
///
/// Surrounding whitespace is accepted; anything else after the number, or a
/// value that is not finite (`nan`, `inf`), is rejected.
pub fn parse_coordinate(text: &str) -> Option<f64> {
    coordinate(text)
        .ok()
        .map(|(_, value)| value)
        .filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_numbers() {
        assert_eq!(parse_coordinate("0"), Some(0.0));
        assert_eq!(parse_coordinate("12.5"), Some(12.5));
        assert_eq!(parse_coordinate("-3"), Some(-3.0));
        assert_eq!(parse_coordinate("1e3"), Some(1000.0));
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        assert_eq!(parse_coordinate("  4.25\t"), Some(4.25));
    }

    #[test]
    fn test_rejects_malformed_text() {
        assert_eq!(parse_coordinate(""), None);
        assert_eq!(parse_coordinate("abc"), None);
        assert_eq!(parse_coordinate("12abc"), None);
        assert_eq!(parse_coordinate("1 2"), None);
    }

    #[test]
    fn test_rejects_non_finite() {
        assert_eq!(parse_coordinate("nan"), None);
        assert_eq!(parse_coordinate("inf"), None);
    }
}
