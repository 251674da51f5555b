//! Condition expression parser
//!
//! Precedence climbing over the token stream. From loosest to tightest:
//! `||`, `&&`, comparisons, `+ -`, `* / %`, then prefix `!` and `-`.
//! All binary operators are left-associative.
//!
//! Both the parser's recursion and the height of the produced tree are
//! capped at [`MAX_DEPTH`], so evaluating or dropping a parsed expression
//! can never exhaust the stack.

use super::ast::{BinaryOp, Expression, Literal, LogicalOp, UnaryOp};
use super::lexer::{tokenize, Token};
use crate::error::ConditionError;

/// Deepest nesting a condition may have, counting parentheses, prefix
/// operators and chained binary operators
pub const MAX_DEPTH: usize = 256;

/// Parse a condition expression string into an AST
pub fn parse(input: &str) -> Result<Expression, ConditionError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };

    let (expr, _) = parser.expression(0)?;
    if let Some(token) = parser.peek() {
        return Err(ConditionError::UnexpectedToken(token.to_string()));
    }
    Ok(expr)
}

/// An expression together with the height of its tree
type Parsed = (Expression, usize);

#[derive(Clone, Copy)]
enum Infix {
    Logical(LogicalOp),
    Binary(BinaryOp),
}

impl Infix {
    fn precedence(self) -> u8 {
        match self {
            Infix::Logical(op) => op.precedence(),
            Infix::Binary(op) => op.precedence(),
        }
    }

    fn build(self, left: Expression, right: Expression) -> Expression {
        match self {
            Infix::Logical(op) => Expression::logical(left, op, right),
            Infix::Binary(op) => Expression::binary(left, op, right),
        }
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_infix(&self) -> Option<Infix> {
        match self.peek()? {
            Token::Logical(op) => Some(Infix::Logical(*op)),
            Token::Op(op) => Some(Infix::Binary(*op)),
            _ => None,
        }
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    // Errors abort the whole parse, so only the success paths call `leave`
    fn enter(&mut self) -> Result<(), ConditionError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ConditionError::TooDeep(MAX_DEPTH));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn expression(&mut self, min_precedence: u8) -> Result<Parsed, ConditionError> {
        self.enter()?;
        let (mut left, mut height) = self.unary()?;

        while let Some(infix) = self.peek_infix() {
            let precedence = infix.precedence();
            if precedence < min_precedence {
                break;
            }
            self.pos += 1;
            let (right, right_height) = self.expression(precedence + 1)?;
            height = grow(height.max(right_height))?;
            left = infix.build(left, right);
        }

        self.leave();
        Ok((left, height))
    }

    fn unary(&mut self) -> Result<Parsed, ConditionError> {
        let op = match self.peek() {
            Some(Token::Bang) => UnaryOp::Not,
            Some(Token::Op(BinaryOp::Sub)) => UnaryOp::Negate,
            _ => return self.primary(),
        };
        self.pos += 1;

        self.enter()?;
        let (operand, height) = self.unary()?;
        self.leave();
        Ok((Expression::unary(op, operand), grow(height)?))
    }

    fn primary(&mut self) -> Result<Parsed, ConditionError> {
        let leaf = match self.advance() {
            None => return Err(ConditionError::UnexpectedEnd),
            Some(Token::Number(n)) => Expression::Literal(Literal::Number(n)),
            Some(Token::Str(s)) => Expression::Literal(Literal::String(s)),
            Some(Token::Bool(b)) => Expression::Literal(Literal::Boolean(b)),
            Some(Token::Ident(name)) => Expression::Variable(name),
            Some(Token::LParen) => {
                let inner = self.expression(0)?;
                return match self.advance() {
                    Some(Token::RParen) => Ok(inner),
                    Some(other) => Err(ConditionError::UnexpectedToken(other.to_string())),
                    None => Err(ConditionError::UnexpectedEnd),
                };
            }
            Some(other) => return Err(ConditionError::UnexpectedToken(other.to_string())),
        };
        Ok((leaf, 1))
    }
}

/// Height of a node one level above a subtree of `height`
fn grow(height: usize) -> Result<usize, ConditionError> {
    let height = height + 1;
    if height > MAX_DEPTH {
        return Err(ConditionError::TooDeep(MAX_DEPTH));
    }
    Ok(height)
}
