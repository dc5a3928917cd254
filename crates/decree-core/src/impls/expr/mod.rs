//! ExprCompiler - the bundled guard language.
//!
//! Conditions such as `World.Resources.Money > 1000 and World.Powers.Military >= 90`
//! are parsed once, field paths are resolved against the World vocabulary, and
//! the resulting tree is evaluated on every turn.
//!
//! # Typing
//! - `and` / `or` / `not` take booleans and short-circuit
//! - arithmetic and ordering take numbers
//! - `==` / `!=` take two values of the same type
//! - the whole condition must produce a boolean

pub mod ast;
pub mod parser;

use std::sync::Arc;

use crate::domain::errors::{CompileError, EvaluationError};
use crate::domain::world::{FieldKind, World};
use crate::ports::{Guard, GuardCompiler};

use self::ast::{BinaryOp, Expr, UnaryOp};

/// Resolved expression tree.
#[derive(Debug, Clone, PartialEq)]
enum Node {
    Number(f64),
    Bool(bool),
    Field(FieldKind, String),
    Unary(UnaryOp, Box<Node>),
    Binary(BinaryOp, Box<Node>, Box<Node>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Value {
    Number(f64),
    Bool(bool),
}

impl Value {
    fn type_name(self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Bool(_) => "bool",
        }
    }

    fn number(self, op: &'static str) -> Result<f64, EvaluationError> {
        match self {
            Value::Number(n) => Ok(n),
            other => Err(EvaluationError::TypeMismatch {
                op,
                expected: "number",
                found: other.type_name(),
            }),
        }
    }

    fn boolean(self, op: &'static str) -> Result<bool, EvaluationError> {
        match self {
            Value::Bool(b) => Ok(b),
            other => Err(EvaluationError::TypeMismatch {
                op,
                expected: "bool",
                found: other.type_name(),
            }),
        }
    }
}

/// Maps `World.Resources.<name>` / `World.Powers.<name>` onto World fields.
fn resolve(expr: Expr, condition: &str) -> Result<Node, CompileError> {
    Ok(match expr {
        Expr::Number(n) => Node::Number(n),
        Expr::Bool(b) => Node::Bool(b),
        Expr::Path(segments) => match segments.as_slice() {
            [root, scope, name] if root == "World" && scope == "Resources" => {
                Node::Field(FieldKind::Resource, name.clone())
            }
            [root, scope, name] if root == "World" && scope == "Powers" => {
                Node::Field(FieldKind::Power, name.clone())
            }
            _ => {
                return Err(CompileError::UnknownField {
                    condition: condition.to_string(),
                    path: segments.join("."),
                });
            }
        },
        Expr::Unary { op, operand } => Node::Unary(op, Box::new(resolve(*operand, condition)?)),
        Expr::Binary { op, left, right } => Node::Binary(
            op,
            Box::new(resolve(*left, condition)?),
            Box::new(resolve(*right, condition)?),
        ),
    })
}

fn eval(node: &Node, world: &World) -> Result<Value, EvaluationError> {
    match node {
        Node::Number(n) => Ok(Value::Number(*n)),
        Node::Bool(b) => Ok(Value::Bool(*b)),
        Node::Field(kind, name) => Ok(Value::Number(world.get(*kind, name) as f64)),
        Node::Unary(op, operand) => {
            let value = eval(operand, world)?;
            match op {
                UnaryOp::Neg => Ok(Value::Number(-value.number(op.symbol())?)),
                UnaryOp::Not => Ok(Value::Bool(!value.boolean(op.symbol())?)),
            }
        }
        Node::Binary(op, left, right) => eval_binary(*op, left, right, world),
    }
}

fn eval_binary(
    op: BinaryOp,
    left: &Node,
    right: &Node,
    world: &World,
) -> Result<Value, EvaluationError> {
    let symbol = op.symbol();
    match op {
        BinaryOp::And => {
            if !eval(left, world)?.boolean(symbol)? {
                return Ok(Value::Bool(false));
            }
            Ok(Value::Bool(eval(right, world)?.boolean(symbol)?))
        }
        BinaryOp::Or => {
            if eval(left, world)?.boolean(symbol)? {
                return Ok(Value::Bool(true));
            }
            Ok(Value::Bool(eval(right, world)?.boolean(symbol)?))
        }
        BinaryOp::Eq | BinaryOp::Ne => {
            let equal = match (eval(left, world)?, eval(right, world)?) {
                (Value::Number(a), Value::Number(b)) => a == b,
                (Value::Bool(a), Value::Bool(b)) => a == b,
                (Value::Number(_), Value::Bool(_)) => {
                    return Err(EvaluationError::TypeMismatch {
                        op: symbol,
                        expected: "same-typed",
                        found: "number and bool",
                    });
                }
                (Value::Bool(_), Value::Number(_)) => {
                    return Err(EvaluationError::TypeMismatch {
                        op: symbol,
                        expected: "same-typed",
                        found: "bool and number",
                    });
                }
            };
            Ok(Value::Bool(if op == BinaryOp::Eq { equal } else { !equal }))
        }
        BinaryOp::Lt => numbers(symbol, left, right, world).map(|(a, b)| Value::Bool(a < b)),
        BinaryOp::Le => numbers(symbol, left, right, world).map(|(a, b)| Value::Bool(a <= b)),
        BinaryOp::Gt => numbers(symbol, left, right, world).map(|(a, b)| Value::Bool(a > b)),
        BinaryOp::Ge => numbers(symbol, left, right, world).map(|(a, b)| Value::Bool(a >= b)),
        BinaryOp::Add => numbers(symbol, left, right, world).map(|(a, b)| Value::Number(a + b)),
        BinaryOp::Sub => numbers(symbol, left, right, world).map(|(a, b)| Value::Number(a - b)),
        BinaryOp::Mul => numbers(symbol, left, right, world).map(|(a, b)| Value::Number(a * b)),
        BinaryOp::Div | BinaryOp::Rem => {
            let (a, b) = numbers(symbol, left, right, world)?;
            if b == 0.0 {
                return Err(EvaluationError::DivisionByZero);
            }
            Ok(Value::Number(if op == BinaryOp::Div { a / b } else { a % b }))
        }
    }
}

fn numbers(
    symbol: &'static str,
    left: &Node,
    right: &Node,
    world: &World,
) -> Result<(f64, f64), EvaluationError> {
    Ok((
        eval(left, world)?.number(symbol)?,
        eval(right, world)?.number(symbol)?,
    ))
}

/// A compiled condition.
#[derive(Debug, Clone)]
pub struct ExprGuard {
    condition: String,
    root: Node,
}

impl ExprGuard {
    pub fn condition(&self) -> &str {
        &self.condition
    }
}

impl Guard for ExprGuard {
    fn pass(&self, world: &World) -> Result<bool, EvaluationError> {
        match eval(&self.root, world)? {
            Value::Bool(b) => Ok(b),
            other => Err(EvaluationError::NotBoolean {
                condition: self.condition.clone(),
                found: other.type_name(),
            }),
        }
    }
}

/// Compiles conditions written in the expression language above.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExprCompiler;

impl ExprCompiler {
    pub fn new() -> Self {
        Self
    }

    pub fn compile_expr(&self, condition: &str) -> Result<ExprGuard, CompileError> {
        let expr = parser::parse(condition).map_err(|errors| CompileError::Syntax {
            condition: condition.to_string(),
            message: errors.join("; "),
        })?;
        let root = resolve(expr, condition)?;
        Ok(ExprGuard {
            condition: condition.to_string(),
            root,
        })
    }
}

impl GuardCompiler for ExprCompiler {
    fn compile(&self, condition: &str) -> Result<Arc<dyn Guard>, CompileError> {
        Ok(Arc::new(self.compile_expr(condition)?))
    }
}
