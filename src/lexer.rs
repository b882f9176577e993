//! Turns raw SQL text into a token stream.
//!
//! `--` runs to end-of-line as a comment. String literals are single-quoted
//! with `''` as an escaped quote. Keywords are matched case-insensitively;
//! identifiers keep their original case.

use crate::error::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Select,
    From,
    Where,
    Insert,
    Into,
    Values,
    Update,
    Set,
    Delete,
    Create,
    Table,
    Drop,
    And,
    Or,
    Order,
    By,
    Asc,
    Desc,
    Limit,
    Int,
    Text,

    Ident(String),
    Number(i64),
    StringLiteral(String),

    LeftParen,
    RightParen,
    Comma,
    Star,
    Semicolon,

    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,

    Eof,
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, Error> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&ch) = chars.peek() {
        match ch {
            ' ' | '\t' | '\n' | '\r' => {
                chars.next();
            }
            '-' if matches!(peek_second(&chars), Some('-')) => {
                while let Some(&c) = chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            '(' => {
                tokens.push(Token::LeftParen);
                chars.next();
            }
            ')' => {
                tokens.push(Token::RightParen);
                chars.next();
            }
            ',' => {
                tokens.push(Token::Comma);
                chars.next();
            }
            ';' => {
                tokens.push(Token::Semicolon);
                chars.next();
            }
            '*' => {
                tokens.push(Token::Star);
                chars.next();
            }
            '=' => {
                tokens.push(Token::Eq);
                chars.next();
            }
            '<' => {
                chars.next();
                match chars.peek() {
                    Some('=') => {
                        tokens.push(Token::LtEq);
                        chars.next();
                    }
                    Some('>') => {
                        tokens.push(Token::NotEq);
                        chars.next();
                    }
                    _ => tokens.push(Token::Lt),
                }
            }
            '>' => {
                chars.next();
                if let Some('=') = chars.peek() {
                    tokens.push(Token::GtEq);
                    chars.next();
                } else {
                    tokens.push(Token::Gt);
                }
            }
            '!' => {
                chars.next();
                if let Some('=') = chars.peek() {
                    tokens.push(Token::NotEq);
                    chars.next();
                } else {
                    return Err(Error::Lex("unexpected character '!'".to_string()));
                }
            }
            '\'' => {
                chars.next();
                tokens.push(Token::StringLiteral(read_string(&mut chars)?));
            }
            _ if ch.is_ascii_digit() => {
                tokens.push(Token::Number(read_number(&mut chars)?));
            }
            _ if ch.is_ascii_alphabetic() || ch == '_' => {
                let ident = read_identifier(&mut chars);
                tokens.push(match_keyword(ident));
            }
            other => {
                return Err(Error::Lex(format!("unexpected character '{other}'")));
            }
        }
    }

    tokens.push(Token::Eof);
    Ok(tokens)
}

fn peek_second(chars: &std::iter::Peekable<std::str::Chars>) -> Option<char> {
    chars.clone().nth(1)
}

fn read_identifier(chars: &mut std::iter::Peekable<std::str::Chars>) -> String {
    let mut ident = String::new();
    while let Some(&ch) = chars.peek() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            ident.push(ch);
            chars.next();
        } else {
            break;
        }
    }
    ident
}

fn read_number(chars: &mut std::iter::Peekable<std::str::Chars>) -> Result<i64, Error> {
    let mut digits = String::new();
    while let Some(&ch) = chars.peek() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            chars.next();
        } else {
            break;
        }
    }
    digits
        .parse()
        .map_err(|_| Error::Lex(format!("invalid number literal '{digits}'")))
}

fn read_string(chars: &mut std::iter::Peekable<std::str::Chars>) -> Result<String, Error> {
    let mut out = String::new();
    loop {
        match chars.next() {
            Some('\'') => {
                if let Some(&'\'') = chars.peek() {
                    out.push('\'');
                    chars.next();
                } else {
                    return Ok(out);
                }
            }
            Some(ch) => out.push(ch),
            None => return Err(Error::Lex("unterminated string literal".to_string())),
        }
    }
}

fn match_keyword(ident: String) -> Token {
    match ident.to_ascii_uppercase().as_str() {
        "SELECT" => Token::Select,
        "FROM" => Token::From,
        "WHERE" => Token::Where,
        "INSERT" => Token::Insert,
        "INTO" => Token::Into,
        "VALUES" => Token::Values,
        "UPDATE" => Token::Update,
        "SET" => Token::Set,
        "DELETE" => Token::Delete,
        "CREATE" => Token::Create,
        "TABLE" => Token::Table,
        "DROP" => Token::Drop,
        "AND" => Token::And,
        "OR" => Token::Or,
        "ORDER" => Token::Order,
        "BY" => Token::By,
        "ASC" => Token::Asc,
        "DESC" => Token::Desc,
        "LIMIT" => Token::Limit,
        "INT" => Token::Int,
        "TEXT" => Token::Text,
        _ => Token::Ident(ident),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_select_statement() {
        let tokens = tokenize("SELECT * FROM u WHERE id = 1;").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Select,
                Token::Star,
                Token::From,
                Token::Ident("u".into()),
                Token::Where,
                Token::Ident("id".into()),
                Token::Eq,
                Token::Number(1),
                Token::Semicolon,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn keywords_are_case_insensitive_identifiers_are_not() {
        let tokens = tokenize("select * from U").unwrap();
        assert_eq!(tokens[0], Token::Select);
        assert_eq!(tokens[3], Token::Ident("U".into()));
    }

    #[test]
    fn comment_runs_to_end_of_line() {
        let tokens = tokenize("SELECT * FROM u -- trailing comment\nWHERE id = 1").unwrap();
        assert!(tokens.contains(&Token::Where));
    }

    #[test]
    fn string_literal_unescapes_doubled_quote() {
        let tokens = tokenize("'it''s'").unwrap();
        assert_eq!(tokens[0], Token::StringLiteral("it's".to_string()));
    }

    #[test]
    fn unterminated_string_is_lex_error() {
        assert!(matches!(tokenize("'abc"), Err(Error::Lex(_))));
    }

    #[test]
    fn unknown_character_is_lex_error() {
        assert!(matches!(tokenize("SELECT @"), Err(Error::Lex(_))));
    }

    #[test]
    fn comparison_operators() {
        let tokens = tokenize("<> <= >= != < > =").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::NotEq,
                Token::LtEq,
                Token::GtEq,
                Token::NotEq,
                Token::Lt,
                Token::Gt,
                Token::Eq,
                Token::Eof,
            ]
        );
    }
}
