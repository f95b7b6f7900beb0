// SPDX-License-Identifier: MIT

//! Tokenizer for condition strings
//!
//! Splits on whitespace and on the operator set. Quotes carry no meaning
//! here, so `hoge'='2` yields `hoge'`, `==` and `'2`.

use super::ast::Operator;

/// Longest first, so `<=` wins over `<`
const SEPARATORS: [&str; 12] = [
    "||", "&&", "<=", ">=", "<>", "!=", "==", "(", ")", "=", "<", ">",
];

/// A single token
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    LeftParen,
    RightParen,
    Operator(Operator),
    /// Anything between separators, classified later by the parser
    Value(String),
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::LeftParen => f.write_str("("),
            Token::RightParen => f.write_str(")"),
            Token::Operator(op) => write!(f, "{}", op),
            Token::Value(raw) => f.write_str(raw),
        }
    }
}

/// Rewrite operator aliases to their canonical form
pub fn normalize(raw: &str) -> &str {
    match raw {
        "=" => "==",
        "<>" => "!=",
        other => other,
    }
}

fn separator_token(raw: &str) -> Token {
    match raw {
        "(" => Token::LeftParen,
        ")" => Token::RightParen,
        other => Operator::from_text(normalize(other))
            .map(Token::Operator)
            .unwrap_or_else(|| Token::Value(other.to_string())),
    }
}

fn match_separator(rest: &str) -> Option<&'static str> {
    SEPARATORS.into_iter().find(|sep| rest.starts_with(sep))
}

/// Split a condition string into tokens
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut value_start: Option<usize> = None;
    let mut pos = 0;

    let flush = |tokens: &mut Vec<Token>, start: &mut Option<usize>, end: usize| {
        if let Some(begin) = start.take() {
            tokens.push(Token::Value(input[begin..end].to_string()));
        }
    };

    while let Some(c) = input[pos..].chars().next() {
        if let Some(sep) = match_separator(&input[pos..]) {
            flush(&mut tokens, &mut value_start, pos);
            tokens.push(separator_token(sep));
            pos += sep.len();
            continue;
        }

        if c.is_whitespace() {
            flush(&mut tokens, &mut value_start, pos);
        } else if value_start.is_none() {
            value_start = Some(pos);
        }
        pos += c.len_utf8();
    }
    flush(&mut tokens, &mut value_start, pos);

    log::debug!("tokenized '{}' into {} tokens", input, tokens.len());
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<String> {
        tokenize(input).iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_simple_comparison() {
        assert_eq!(
            tokenize("1 == 2"),
            vec![
                Token::Value("1".to_string()),
                Token::Operator(Operator::Eq),
                Token::Value("2".to_string()),
            ]
        );
    }

    #[test]
    fn test_no_whitespace_needed() {
        assert_eq!(texts("1==2"), vec!["1", "==", "2"]);
        assert_eq!(texts("%a>=%b"), vec!["%a", ">=", "%b"]);
        assert_eq!(
            texts("(1<2)&&(3>4)"),
            vec!["(", "1", "<", "2", ")", "&&", "(", "3", ">", "4", ")"]
        );
    }

    #[test]
    fn test_aliases_normalized() {
        assert_eq!(texts("1=2"), vec!["1", "==", "2"]);
        assert_eq!(texts("1<>2"), vec!["1", "!=", "2"]);
        assert_eq!(tokenize("1=2"), tokenize("1==2"));
        assert_eq!(tokenize("1<>2"), tokenize("1!=2"));
    }

    #[test]
    fn test_longest_match() {
        assert_eq!(texts("a<=b"), vec!["a", "<=", "b"]);
        assert_eq!(texts("a>=b"), vec!["a", ">=", "b"]);
        assert_eq!(texts("a<b"), vec!["a", "<", "b"]);
        assert_eq!(texts("a||b"), vec!["a", "||", "b"]);
    }

    #[test]
    fn test_quotes_are_ordinary_characters() {
        assert_eq!(texts("hoge'='2"), vec!["hoge'", "==", "'2"]);
        assert_eq!(texts("'a b'"), vec!["'a", "b'"]);
    }

    #[test]
    fn test_whitespace_runs_discarded() {
        assert_eq!(texts("  1 \t ==\n 2  "), vec!["1", "==", "2"]);
        assert!(tokenize("   ").is_empty());
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_lone_bang_is_a_value() {
        assert_eq!(texts("!a"), vec!["!a"]);
    }

    #[test]
    fn test_multibyte_values() {
        assert_eq!(texts("%名前=='あいう'"), vec!["%名前", "==", "'あいう'"]);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("="), "==");
        assert_eq!(normalize("<>"), "!=");
        assert_eq!(normalize(">="), ">=");
    }
}
