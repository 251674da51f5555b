//! Tokenizer for condition expressions

use super::ast::{BinaryOp, LogicalOp};
use crate::error::ConditionError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Str(String),
    Bool(bool),
    Ident(String),
    Op(BinaryOp),
    Logical(LogicalOp),
    Bang,
    LParen,
    RParen,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Str(s) => write!(f, "'{}'", s),
            Token::Bool(b) => write!(f, "{}", b),
            Token::Ident(name) => write!(f, "{}", name),
            Token::Op(op) => write!(f, "{}", op),
            Token::Logical(op) => write!(f, "{}", op),
            Token::Bang => write!(f, "!"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
        }
    }
}

/// Split an expression into tokens.
///
/// `-` is always lexed as `Op(Sub)`; the parser decides whether it is
/// unary from its position.
pub fn tokenize(input: &str) -> Result<Vec<Token>, ConditionError> {
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let (offset, c) = chars[i];
        let next = chars.get(i + 1).map(|&(_, c)| c);

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        // Two-character operators first
        let double = match (c, next) {
            ('&', Some('&')) => Some(Token::Logical(LogicalOp::And)),
            ('|', Some('|')) => Some(Token::Logical(LogicalOp::Or)),
            ('=', Some('=')) => Some(Token::Op(BinaryOp::Eq)),
            ('!', Some('=')) => Some(Token::Op(BinaryOp::NotEq)),
            ('<', Some('=')) => Some(Token::Op(BinaryOp::Lte)),
            ('>', Some('=')) => Some(Token::Op(BinaryOp::Gte)),
            _ => None,
        };
        if let Some(token) = double {
            tokens.push(token);
            i += 2;
            continue;
        }

        let single = match c {
            '<' => Some(Token::Op(BinaryOp::Lt)),
            '>' => Some(Token::Op(BinaryOp::Gt)),
            '+' => Some(Token::Op(BinaryOp::Add)),
            '-' => Some(Token::Op(BinaryOp::Sub)),
            '*' => Some(Token::Op(BinaryOp::Mul)),
            '/' => Some(Token::Op(BinaryOp::Div)),
            '%' => Some(Token::Op(BinaryOp::Mod)),
            '!' => Some(Token::Bang),
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            _ => None,
        };
        if let Some(token) = single {
            tokens.push(token);
            i += 1;
            continue;
        }

        if c == '\'' || c == '"' {
            let start = i + 1;
            let mut end = start;
            while end < chars.len() && chars[end].1 != c {
                end += 1;
            }
            if end >= chars.len() {
                return Err(ConditionError::UnterminatedString(offset));
            }
            let literal: String = chars[start..end].iter().map(|&(_, ch)| ch).collect();
            tokens.push(Token::Str(literal));
            i = end + 1;
            continue;
        }

        if c.is_ascii_digit() {
            let start = i;
            while i < chars.len() && chars[i].1.is_ascii_digit() {
                i += 1;
            }
            if i + 1 < chars.len() && chars[i].1 == '.' && chars[i + 1].1.is_ascii_digit() {
                i += 1;
                while i < chars.len() && chars[i].1.is_ascii_digit() {
                    i += 1;
                }
            }
            let text: String = chars[start..i].iter().map(|&(_, ch)| ch).collect();
            let value = text
                .parse::<f64>()
                .map_err(|_| ConditionError::UnexpectedToken(text.clone()))?;
            tokens.push(Token::Number(value));
            continue;
        }

        if c.is_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && is_ident_char(chars[i].1) {
                i += 1;
            }
            let word: String = chars[start..i].iter().map(|&(_, ch)| ch).collect();
            tokens.push(match word.as_str() {
                "true" => Token::Bool(true),
                "false" => Token::Bool(false),
                _ => Token::Ident(word),
            });
            continue;
        }

        return Err(ConditionError::UnexpectedChar { ch: c, offset });
    }

    Ok(tokens)
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_comparison() {
        assert_eq!(
            tokenize("age>=18").unwrap(),
            vec![
                Token::Ident("age".into()),
                Token::Op(BinaryOp::Gte),
                Token::Number(18.0)
            ]
        );
    }

    #[test]
    fn test_tokenize_logical_and_parens() {
        assert_eq!(
            tokenize("!(a && b) || c").unwrap(),
            vec![
                Token::Bang,
                Token::LParen,
                Token::Ident("a".into()),
                Token::Logical(LogicalOp::And),
                Token::Ident("b".into()),
                Token::RParen,
                Token::Logical(LogicalOp::Or),
                Token::Ident("c".into()),
            ]
        );
    }

    #[test]
    fn test_tokenize_strings_both_quotes() {
        assert_eq!(
            tokenize(r#"'gold' "silver""#).unwrap(),
            vec![Token::Str("gold".into()), Token::Str("silver".into())]
        );
    }

    #[test]
    fn test_tokenize_decimal_and_dotted_ident() {
        assert_eq!(
            tokenize("applicant.ratio < 0.75").unwrap(),
            vec![
                Token::Ident("applicant.ratio".into()),
                Token::Op(BinaryOp::Lt),
                Token::Number(0.75)
            ]
        );
    }

    #[test]
    fn test_tokenize_booleans() {
        assert_eq!(
            tokenize("vip == true").unwrap(),
            vec![
                Token::Ident("vip".into()),
                Token::Op(BinaryOp::Eq),
                Token::Bool(true)
            ]
        );
    }

    #[test]
    fn test_tokenize_errors() {
        assert_eq!(
            tokenize("a = 1"),
            Err(ConditionError::UnexpectedChar { ch: '=', offset: 2 })
        );
        assert_eq!(
            tokenize("a & b"),
            Err(ConditionError::UnexpectedChar { ch: '&', offset: 2 })
        );
        assert_eq!(
            tokenize("name == 'open"),
            Err(ConditionError::UnterminatedString(8))
        );
    }
}
