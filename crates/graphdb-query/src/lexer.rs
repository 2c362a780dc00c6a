//! A small hand-rolled tokeniser for the Cypher subset (§4.5).
//!
//! Keywords are recognised by the lexer, not located with a substring
//! search — the reference implementation's `strstr(query, "MATCH")` misfires
//! on a query like `WHERE a.id = 'CREATE'` (§9); tokenising avoids that.

use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Match,
    Where,
    Return,
    Create,
    Delete,
    And,

    Identifier(String),
    StringLiteral(String),
    Number(u32),

    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Colon,
    Comma,
    Dot,
    DotDot,
    Equals,
    Star,
    Lt,
    Gt,
    Dash,

    Eof,
}

pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
        }
    }

    pub fn tokenize(input: &str) -> Result<Vec<Token>, String> {
        let mut lexer = Lexer::new(input);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token()?;
            let is_eof = token == Token::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.chars.peek(), Some(c) if c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn next_token(&mut self) -> Result<Token, String> {
        self.skip_whitespace();
        let Some(&c) = self.chars.peek() else {
            return Ok(Token::Eof);
        };

        match c {
            '(' => {
                self.chars.next();
                Ok(Token::LParen)
            }
            ')' => {
                self.chars.next();
                Ok(Token::RParen)
            }
            '[' => {
                self.chars.next();
                Ok(Token::LBracket)
            }
            ']' => {
                self.chars.next();
                Ok(Token::RBracket)
            }
            '{' => {
                self.chars.next();
                Ok(Token::LBrace)
            }
            '}' => {
                self.chars.next();
                Ok(Token::RBrace)
            }
            ':' => {
                self.chars.next();
                Ok(Token::Colon)
            }
            ',' => {
                self.chars.next();
                Ok(Token::Comma)
            }
            '=' => {
                self.chars.next();
                Ok(Token::Equals)
            }
            '*' => {
                self.chars.next();
                Ok(Token::Star)
            }
            '<' => {
                self.chars.next();
                Ok(Token::Lt)
            }
            '>' => {
                self.chars.next();
                Ok(Token::Gt)
            }
            '-' => {
                self.chars.next();
                Ok(Token::Dash)
            }
            '.' => {
                self.chars.next();
                if self.chars.peek() == Some(&'.') {
                    self.chars.next();
                    Ok(Token::DotDot)
                } else {
                    Ok(Token::Dot)
                }
            }
            '\'' => self.read_string_literal(),
            c if c.is_ascii_digit() => self.read_number(),
            c if c.is_alphabetic() || c == '_' => self.read_identifier_or_keyword(),
            other => Err(format!("unexpected character '{other}'")),
        }
    }

    fn read_string_literal(&mut self) -> Result<Token, String> {
        self.chars.next(); // opening quote
        let mut value = String::new();
        loop {
            match self.chars.next() {
                Some('\'') => return Ok(Token::StringLiteral(value)),
                Some(c) => value.push(c),
                None => return Err("unterminated string literal".to_string()),
            }
        }
    }

    fn read_number(&mut self) -> Result<Token, String> {
        let mut digits = String::new();
        while matches!(self.chars.peek(), Some(c) if c.is_ascii_digit()) {
            digits.push(self.chars.next().unwrap());
        }
        digits
            .parse::<u32>()
            .map(Token::Number)
            .map_err(|e| format!("invalid number literal '{digits}': {e}"))
    }

    fn read_identifier_or_keyword(&mut self) -> Result<Token, String> {
        let mut ident = String::new();
        while matches!(self.chars.peek(), Some(c) if c.is_alphanumeric() || *c == '_') {
            ident.push(self.chars.next().unwrap());
        }
        Ok(match ident.as_str() {
            "MATCH" => Token::Match,
            "WHERE" => Token::Where,
            "RETURN" => Token::Return,
            "CREATE" => Token::Create,
            "DELETE" => Token::Delete,
            "AND" => Token::And,
            _ => Token::Identifier(ident),
        })
    }
}
