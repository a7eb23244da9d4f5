//! Trigger rules: a small, closed predicate language over a parsed commit.
//!
//! A trigger decides whether a commit causes a given version bump. Rules are
//! compiled once from text such as `type == 'feat' && scope != 'docs'` and
//! then evaluated against every commit. The language only knows three fields
//! (`type`, `scope`, `breaking`), literal operands and boolean connectives:
//!
//! ```text
//! expr    := and ( ("||" | "or") and )*
//! and     := compare ( ("&&" | "and") compare )*
//! compare := unary ( ("==" | "!=") unary )?
//! unary   := ("!" | "not") unary | primary
//! primary := "(" expr ")" | field | 'text' | "text" | true | false | none
//! field   := type | scope | breaking | is_breaking
//! ```
//!
//! Comparisons take a field on at least one side and operands of the same
//! kind; `none` stands for an absent scope. Every rule is type checked when
//! it is compiled, so evaluation never fails.

use crate::domain::ParsedCommit;
use crate::error::{Result, SemtagError};
use std::fmt;

pub const DEFAULT_MAJOR_TRIGGER: &str = "breaking";
pub const DEFAULT_MINOR_TRIGGER: &str = "type == 'feat'";
pub const DEFAULT_PATCH_TRIGGER: &str = "type == 'fix'";

/// Deepest allowed nesting of parentheses and negations
const MAX_NESTING: usize = 64;

/// Longest accepted expression, in tokens
const MAX_TOKENS: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Type,
    Scope,
    Breaking,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Literal {
    Text(String),
    Bool(bool),
    Absent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Expr {
    Field(Field),
    Literal(Literal),
    Eq(Box<Expr>, Box<Expr>),
    Ne(Box<Expr>, Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Text,
    Bool,
}

#[derive(Debug, PartialEq)]
enum Value<'a> {
    Text(Option<&'a str>),
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Text(String),
    EqEq,
    NotEq,
    Bang,
    AndAnd,
    OrOr,
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(name) => write!(f, "'{}'", name),
            Token::Text(text) => write!(f, "string '{}'", text),
            Token::EqEq => f.write_str("'=='"),
            Token::NotEq => f.write_str("'!='"),
            Token::Bang => f.write_str("'!'"),
            Token::AndAnd => f.write_str("'&&'"),
            Token::OrOr => f.write_str("'||'"),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
        }
    }
}

fn tokenize(source: &str) -> std::result::Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = source.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '=' => {
                chars.next();
                if chars.next_if_eq(&'=').is_none() {
                    return Err("expected '==', found a single '='".to_string());
                }
                tokens.push(Token::EqEq);
            }
            '!' => {
                chars.next();
                if chars.next_if_eq(&'=').is_some() {
                    tokens.push(Token::NotEq);
                } else {
                    tokens.push(Token::Bang);
                }
            }
            '&' => {
                chars.next();
                if chars.next_if_eq(&'&').is_none() {
                    return Err("expected '&&', found a single '&'".to_string());
                }
                tokens.push(Token::AndAnd);
            }
            '|' => {
                chars.next();
                if chars.next_if_eq(&'|').is_none() {
                    return Err("expected '||', found a single '|'".to_string());
                }
                tokens.push(Token::OrOr);
            }
            '\'' | '"' => {
                let quote = c;
                chars.next();
                let mut text = String::new();
                loop {
                    match chars.next() {
                        Some('\\') => match chars.next() {
                            Some(escaped) => text.push(escaped),
                            None => return Err("unterminated string literal".to_string()),
                        },
                        Some(ch) if ch == quote => break,
                        Some(ch) => text.push(ch),
                        None => return Err("unterminated string literal".to_string()),
                    }
                }
                tokens.push(Token::Text(text));
            }
            c if c.is_alphanumeric() || c == '_' => {
                let mut ident = String::new();
                while let Some(ch) = chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_') {
                    ident.push(ch);
                }
                tokens.push(Token::Ident(ident));
            }
            other => return Err(format!("unexpected character '{}'", other)),
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> std::result::Result<T, String>,
    ) -> std::result::Result<T, String> {
        if self.depth >= MAX_NESTING {
            return Err(format!(
                "expression nested too deeply (at most {} levels)",
                MAX_NESTING
            ));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat_keyword(&mut self, symbol: &Token, keyword: &str) -> bool {
        match self.peek() {
            Some(token) if token == symbol => {
                self.pos += 1;
                true
            }
            Some(Token::Ident(name)) if name == keyword => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    fn parse_or(&mut self) -> std::result::Result<Expr, String> {
        let mut left = self.parse_and()?;
        while self.eat_keyword(&Token::OrOr, "or") {
            let right = self.parse_and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> std::result::Result<Expr, String> {
        let mut left = self.parse_compare()?;
        while self.eat_keyword(&Token::AndAnd, "and") {
            let right = self.parse_compare()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_compare(&mut self) -> std::result::Result<Expr, String> {
        let left = self.parse_unary()?;
        match self.peek() {
            Some(Token::EqEq) => {
                self.pos += 1;
                let right = self.parse_unary()?;
                Ok(Expr::Eq(Box::new(left), Box::new(right)))
            }
            Some(Token::NotEq) => {
                self.pos += 1;
                let right = self.parse_unary()?;
                Ok(Expr::Ne(Box::new(left), Box::new(right)))
            }
            _ => Ok(left),
        }
    }

    fn parse_unary(&mut self) -> std::result::Result<Expr, String> {
        if self.eat_keyword(&Token::Bang, "not") {
            let inner = self.nested(Self::parse_unary)?;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> std::result::Result<Expr, String> {
        match self.advance() {
            Some(Token::LParen) => {
                let inner = self.nested(Self::parse_or)?;
                match self.advance() {
                    Some(Token::RParen) => Ok(inner),
                    Some(other) => Err(format!("expected ')', found {}", other)),
                    None => Err("expected ')', found end of expression".to_string()),
                }
            }
            Some(Token::Text(text)) => Ok(Expr::Literal(Literal::Text(text))),
            Some(Token::Ident(name)) => match name.as_str() {
                "type" => Ok(Expr::Field(Field::Type)),
                "scope" => Ok(Expr::Field(Field::Scope)),
                "breaking" | "is_breaking" => Ok(Expr::Field(Field::Breaking)),
                "true" => Ok(Expr::Literal(Literal::Bool(true))),
                "false" => Ok(Expr::Literal(Literal::Bool(false))),
                "none" => Ok(Expr::Literal(Literal::Absent)),
                other => Err(format!(
                    "unknown name '{}' (expected type, scope, breaking, true, false or none)",
                    other
                )),
            },
            Some(other) => Err(format!("unexpected {}", other)),
            None => Err("unexpected end of expression".to_string()),
        }
    }
}

fn is_operand(expr: &Expr) -> bool {
    matches!(expr, Expr::Field(_) | Expr::Literal(_))
}

fn kind_of(expr: &Expr) -> std::result::Result<Kind, String> {
    match expr {
        Expr::Field(Field::Type | Field::Scope) => Ok(Kind::Text),
        Expr::Field(Field::Breaking) => Ok(Kind::Bool),
        Expr::Literal(Literal::Text(_) | Literal::Absent) => Ok(Kind::Text),
        Expr::Literal(Literal::Bool(_)) => Ok(Kind::Bool),
        Expr::Eq(left, right) | Expr::Ne(left, right) => {
            if !is_operand(left) || !is_operand(right) {
                return Err("comparisons only accept fields and literals as operands".to_string());
            }
            if !matches!(**left, Expr::Field(_)) && !matches!(**right, Expr::Field(_)) {
                return Err("a comparison needs a field on at least one side".to_string());
            }
            if kind_of(left)? != kind_of(right)? {
                return Err("cannot compare a text value with a boolean value".to_string());
            }
            Ok(Kind::Bool)
        }
        Expr::And(left, right) | Expr::Or(left, right) => {
            if kind_of(left)? != Kind::Bool || kind_of(right)? != Kind::Bool {
                return Err("'&&' and '||' need boolean operands".to_string());
            }
            Ok(Kind::Bool)
        }
        Expr::Not(inner) => {
            if kind_of(inner)? != Kind::Bool {
                return Err("'!' needs a boolean operand".to_string());
            }
            Ok(Kind::Bool)
        }
    }
}

fn value_of<'a>(expr: &'a Expr, commit: &'a ParsedCommit) -> Value<'a> {
    match expr {
        Expr::Field(Field::Type) => Value::Text(Some(commit.r#type.as_str())),
        Expr::Field(Field::Scope) => Value::Text(commit.scope.as_deref()),
        Expr::Field(Field::Breaking) => Value::Bool(commit.is_breaking_change),
        Expr::Literal(Literal::Text(text)) => Value::Text(Some(text.as_str())),
        Expr::Literal(Literal::Absent) => Value::Text(None),
        Expr::Literal(Literal::Bool(b)) => Value::Bool(*b),
        Expr::Eq(left, right) => Value::Bool(value_of(left, commit) == value_of(right, commit)),
        Expr::Ne(left, right) => Value::Bool(value_of(left, commit) != value_of(right, commit)),
        Expr::And(left, right) => Value::Bool(truth(left, commit) && truth(right, commit)),
        Expr::Or(left, right) => Value::Bool(truth(left, commit) || truth(right, commit)),
        Expr::Not(inner) => Value::Bool(!truth(inner, commit)),
    }
}

fn truth(expr: &Expr, commit: &ParsedCommit) -> bool {
    // Only boolean expressions survive compilation, so text never reaches here.
    matches!(value_of(expr, commit), Value::Bool(true))
}

/// A compiled trigger predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerRule {
    source: String,
    expr: Expr,
}

impl TriggerRule {
    /// Compile a trigger from its textual form.
    ///
    /// # Errors
    /// Returns a configuration error on any lexical, syntax or type error.
    pub fn compile(source: &str) -> Result<Self> {
        let invalid =
            |detail: String| SemtagError::config(format!("Invalid trigger '{}': {}", source, detail));

        let tokens = tokenize(source).map_err(invalid)?;
        if tokens.is_empty() {
            return Err(invalid("expression is empty".to_string()));
        }
        if tokens.len() > MAX_TOKENS {
            return Err(invalid(format!(
                "expression is too long (at most {} tokens)",
                MAX_TOKENS
            )));
        }

        let mut parser = Parser::new(tokens);
        let expr = parser.parse_or().map_err(invalid)?;
        if let Some(extra) = parser.peek() {
            return Err(invalid(format!("unexpected {} after expression", extra)));
        }

        if kind_of(&expr).map_err(invalid)? != Kind::Bool {
            return Err(invalid("expression must be true or false, not text".to_string()));
        }

        Ok(TriggerRule {
            source: source.to_string(),
            expr,
        })
    }

    /// `breaking`
    pub fn default_major() -> Self {
        TriggerRule {
            source: DEFAULT_MAJOR_TRIGGER.to_string(),
            expr: Expr::Field(Field::Breaking),
        }
    }

    /// `type == 'feat'`
    pub fn default_minor() -> Self {
        Self::type_equals(DEFAULT_MINOR_TRIGGER, "feat")
    }

    /// `type == 'fix'`
    pub fn default_patch() -> Self {
        Self::type_equals(DEFAULT_PATCH_TRIGGER, "fix")
    }

    fn type_equals(source: &str, commit_type: &str) -> Self {
        TriggerRule {
            source: source.to_string(),
            expr: Expr::Eq(
                Box::new(Expr::Field(Field::Type)),
                Box::new(Expr::Literal(Literal::Text(commit_type.to_string()))),
            ),
        }
    }

    /// Evaluate the rule against a parsed commit
    pub fn evaluate(&self, commit: &ParsedCommit) -> bool {
        truth(&self.expr, commit)
    }

    /// The text the rule was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for TriggerRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
