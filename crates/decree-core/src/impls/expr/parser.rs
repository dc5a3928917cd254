//! Guard expression parser (chumsky).
//!
//! Precedence, loosest to tightest: `or`, `and`, comparisons, `+ -`,
//! `* / %`, prefix `- ! not`, atoms.

use chumsky::prelude::*;

use super::ast::{BinaryOp, Expr, UnaryOp};

pub type ParseError<'src> = Rich<'src, char>;

/// Parse a whole condition. Errors are rendered to strings so they can outlive
/// the source text.
pub fn parse(source: &str) -> Result<Expr, Vec<String>> {
    expr()
        .then_ignore(end())
        .parse(source)
        .into_result()
        .map_err(|errors| errors.into_iter().map(|e| e.to_string()).collect())
}

fn ident<'src>() -> impl Parser<'src, &'src str, String, extra::Err<ParseError<'src>>> + Clone {
    text::ascii::ident().map(|s: &str| s.to_string())
}

/// Dot-separated path
fn path<'src>() -> impl Parser<'src, &'src str, Vec<String>, extra::Err<ParseError<'src>>> + Clone
{
    ident()
        .separated_by(just('.'))
        .at_least(1)
        .collect::<Vec<_>>()
}

/// Unsigned decimal number; sign is handled by prefix `-`.
fn number<'src>() -> impl Parser<'src, &'src str, f64, extra::Err<ParseError<'src>>> + Clone {
    text::int(10)
        .then(just('.').then(text::digits(10)).or_not())
        .to_slice()
        .map(|s: &str| s.parse().unwrap_or(0.0))
}

pub fn expr<'src>() -> impl Parser<'src, &'src str, Expr, extra::Err<ParseError<'src>>> + Clone {
    recursive(|expr| {
        let atom = choice((
            text::ascii::keyword("true").to(Expr::Bool(true)),
            text::ascii::keyword("false").to(Expr::Bool(false)),
            number().map(Expr::Number),
            expr.delimited_by(just('('), just(')')),
            path().map(Expr::Path),
        ))
        .padded();

        let unary = choice((
            just('-').to(UnaryOp::Neg),
            just('!').to(UnaryOp::Not),
            text::ascii::keyword("not").to(UnaryOp::Not),
        ))
        .padded()
        .repeated()
        .foldr(atom, Expr::unary);

        let product = unary.clone().foldl(
            choice((
                just('*').to(BinaryOp::Mul),
                just('/').to(BinaryOp::Div),
                just('%').to(BinaryOp::Rem),
            ))
            .padded()
            .then(unary)
            .repeated(),
            |left, (op, right)| Expr::binary(op, left, right),
        );

        let sum = product.clone().foldl(
            choice((just('+').to(BinaryOp::Add), just('-').to(BinaryOp::Sub)))
                .padded()
                .then(product)
                .repeated(),
            |left, (op, right)| Expr::binary(op, left, right),
        );

        let comparison = sum.clone().foldl(
            choice((
                just("==").to(BinaryOp::Eq),
                just("!=").to(BinaryOp::Ne),
                just("<=").to(BinaryOp::Le),
                just(">=").to(BinaryOp::Ge),
                just('≤').to(BinaryOp::Le),
                just('≥').to(BinaryOp::Ge),
                just('<').to(BinaryOp::Lt),
                just('>').to(BinaryOp::Gt),
            ))
            .padded()
            .then(sum)
            .repeated(),
            |left, (op, right)| Expr::binary(op, left, right),
        );

        let conjunction = comparison.clone().foldl(
            choice((
                just("&&").to(BinaryOp::And),
                text::ascii::keyword("and").to(BinaryOp::And),
            ))
            .padded()
            .then(comparison)
            .repeated(),
            |left, (op, right)| Expr::binary(op, left, right),
        );

        conjunction.clone().foldl(
            choice((
                just("||").to(BinaryOp::Or),
                text::ascii::keyword("or").to(BinaryOp::Or),
            ))
            .padded()
            .then(conjunction)
            .repeated(),
            |left, (op, right)| Expr::binary(op, left, right),
        )
    })
}
