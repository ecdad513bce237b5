//! Source excerpts for lexical and syntax errors
//!
//! An excerpt shows the line holding the offending token, preceded by the
//! line before it when there is one, and an arrow pointing at the column:
//!
//! ```text
//! 0002: Syntax: Notice comment Rule+
//! 0003: Rule: uppercase ] Definition
//!  >>>------------------^
//! ```

use crate::notation::token::Token;

/// Width of the `0003: ` line prefix.
const GUTTER: usize = 6;

/// Render the source lines surrounding `token` with a column arrow
pub fn render_excerpt(source: &str, token: &Token) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let line = token.line();
    let mut excerpt = String::new();

    if line >= 2 {
        if let Some(previous) = lines.get(line - 2) {
            excerpt.push_str(&format!("{:04}: {}\n", line - 1, previous));
        }
    }
    // A token at the very end of the input sits on a line `lines()` does not yield.
    let current = lines.get(line.saturating_sub(1)).copied().unwrap_or("");
    excerpt.push_str(&format!("{line:04}: {current}\n"));

    let dashes = (GUTTER + token.position().saturating_sub(1)).saturating_sub(4);
    excerpt.push_str(" >>>");
    excerpt.push_str(&"-".repeat(dashes));
    excerpt.push('^');
    excerpt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::token::TokenType;

    #[test]
    fn arrow_points_at_the_column() {
        let source = "first line\nsecond ]\n";
        let token = Token::new(TokenType::Delimiter, "]", 2, 8);
        let excerpt = render_excerpt(source, &token);
        let lines: Vec<&str> = excerpt.lines().collect();

        assert_eq!(lines[0], "0001: first line");
        assert_eq!(lines[1], "0002: second ]");
        let caret = lines[2].find('^').unwrap();
        assert_eq!(&lines[1][caret..caret + 1], "]");
    }

    #[test]
    fn first_line_has_no_predecessor() {
        let token = Token::new(TokenType::Error, "$", 1, 1);
        let excerpt = render_excerpt("$oops", &token);
        assert!(excerpt.starts_with("0001: $oops\n"));
        assert!(excerpt.ends_with(" >>>--^"));
    }

    #[test]
    fn end_of_input_token_renders_an_empty_line() {
        let token = Token::new(TokenType::Eof, "", 3, 1);
        let excerpt = render_excerpt("a\nb\n", &token);
        assert!(excerpt.contains("0002: b\n0003: \n"));
    }
}
