//! Control-path-return check for function bodies
//!
//! The check is syntactic and only inspects the last statement of a block:
//!
//! - a block returns if a `return` appears directly in it
//! - otherwise, a trailing `if`/`else` returns if both branches do, and a
//!   trailing `while` returns if its branch does
//!
//! Earlier statements are never examined. A function body ending in an
//! `if`/`else` with a non-returning branch is rejected outright.

use crate::errors::{CompileResult, ErrorKind};
use crate::parser::ast::{Statement, StatementBlock, StatementKind};

/// Whether every control path through a function body returns.
///
/// Fails with a no-return error when the body ends in an `if`/`else` that
/// does not return on both branches.
pub fn has_return(body: &StatementBlock) -> CompileResult<bool> {
    if body.has_return {
        return Ok(true);
    }

    match body.last() {
        None => Ok(false),
        Some(last) => match &last.kind {
            StatementKind::IfElse { .. } => {
                if statement_returns(last) {
                    Ok(true)
                } else {
                    Err(ErrorKind::NoReturn.at(last.line))
                }
            }
            StatementKind::While { branch, .. } => Ok(statement_returns(branch)),
            _ => Ok(false),
        },
    }
}

/// Whether a nested block returns on every path
pub fn block_returns(block: &StatementBlock) -> bool {
    if block.has_return {
        return true;
    }
    match block.last() {
        Some(last) => match &last.kind {
            StatementKind::IfElse { .. } | StatementKind::ScopedBlock { .. } => {
                statement_returns(last)
            }
            StatementKind::While { branch, .. } => statement_returns(branch),
            _ => false,
        },
        None => false,
    }
}

/// Whether a single statement, used as a branch, returns
pub fn statement_returns(statement: &Statement) -> bool {
    match &statement.kind {
        StatementKind::Return { .. } => true,
        StatementKind::ScopedBlock { block } => block_returns(block),
        StatementKind::IfElse {
            then_branch,
            else_branch,
            ..
        } => if_else_returns(then_branch, else_branch.as_deref()),
        _ => false,
    }
}

/// Both branches must return; a missing `else` never does
pub fn if_else_returns(then_branch: &Statement, else_branch: Option<&Statement>) -> bool {
    statement_returns(then_branch) && else_branch.is_some_and(statement_returns)
}
