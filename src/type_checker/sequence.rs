//! Precedence resolution for flat operand/operator sequences.
//!
//! The parser leaves `a + b * c` as the flat list `[a, +, b, *, c]`. The
//! resolver consumes operators from the tightest tier down (left to right
//! within a tier) and groups their neighbours into subsequences kept in a
//! local arena, so the list above becomes `[a, +, [b, *, c]]`.
//!
//! Every finished sequence evaluates as a left fold:
//! `[e0, op1, e1, op2, e2]` means `(e0 op1 e1) op2 e2`.

use log::debug;

use crate::{
    ast::{
        expressions::{Expr, ExprKind, Precedence},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
};

/// A position of the flat list: either still holding its element or folded
/// into the arena group at the given index.
enum Slot {
    Live(Expr),
    Moved(usize),
}

/// A finished subsequence and the tier of its operators.
struct Group {
    precedence: Precedence,
    elements: Vec<Expr>,
}

impl Group {
    fn into_expr(self) -> Expr {
        Expr::sequence(self.elements)
    }
}

/// Checks that `elements` alternate operand, operator, operand, ...
pub fn validate_alternation(elements: &[Expr]) -> Result<(), Error> {
    for (index, element) in elements.iter().enumerate() {
        let expects_operand = index % 2 == 0;

        match (expects_operand, element.operator()) {
            (true, Some(operator)) => {
                return Err(Error::new(
                    ErrorImpl::MissingOperand {
                        operator: operator.symbol.clone(),
                    },
                    element.span.start.clone(),
                ))
            }
            (false, None) => {
                return Err(Error::new(
                    ErrorImpl::AdjacentOperands,
                    element.span.start.clone(),
                ))
            }
            _ => {}
        }
    }

    match elements.last().and_then(|last| last.operator().map(|op| (last, op))) {
        Some((last, operator)) => Err(Error::new(
            ErrorImpl::MissingOperand {
                operator: operator.symbol.clone(),
            },
            last.span.end.clone(),
        )),
        None => Ok(()),
    }
}

/// Regroups a validated flat sequence by precedence.
///
/// Sequences whose operators already appear in evaluation order (a single
/// operator, one tier, or tiers descending left to right) come back as they
/// are. New groups are typed with `ty`.
pub fn resolve_sequence(elements: Vec<Expr>, ty: Option<&Type>) -> Result<Expr, Error> {
    if elements.is_empty() {
        return Err(malformed("empty sequence"));
    }
    validate_alternation(&elements)?;

    let operators: Vec<(usize, Precedence)> = elements
        .iter()
        .enumerate()
        .filter_map(|(index, element)| element.operator().map(|op| (index, op.precedence)))
        .collect();

    let mut order = operators.clone();
    // Stable: ties keep ascending position
    order.sort_by(|a, b| b.1.cmp(&a.1));

    if operators.len() <= 1 || order == operators {
        let mut expr = Expr::sequence(elements);
        stamp_groups(&mut expr, ty);
        return Ok(expr);
    }

    let mut slots: Vec<Slot> = elements.into_iter().map(Slot::Live).collect();
    let mut arena: Vec<Option<Group>> = Vec::new();

    for (index, precedence) in order {
        let operator = take_live(&mut slots, index)?;
        let left = std::mem::replace(&mut slots[index - 1], Slot::Moved(usize::MAX));
        let right = std::mem::replace(&mut slots[index + 1], Slot::Moved(usize::MAX));

        let group = match (left, right) {
            (Slot::Live(lhs), Slot::Live(rhs)) => {
                arena.push(Some(Group {
                    precedence,
                    elements: vec![lhs, operator, rhs],
                }));
                arena.len() - 1
            }
            (Slot::Moved(group), Slot::Live(rhs)) => {
                append(&mut arena, group, precedence, operator, rhs)?;
                group
            }
            // A group to the right always binds tighter
            (Slot::Live(lhs), Slot::Moved(group)) => {
                let inner = take_group(&mut arena, group)?;
                arena[group] = Some(Group {
                    precedence,
                    elements: vec![lhs, operator, inner.into_expr()],
                });
                group
            }
            (Slot::Moved(left_group), Slot::Moved(right_group)) => {
                let inner = take_group(&mut arena, right_group)?;
                append(&mut arena, left_group, precedence, operator, inner.into_expr())?;

                for slot in slots.iter_mut() {
                    if let Slot::Moved(group) = slot {
                        if *group == right_group {
                            *group = left_group;
                        }
                    }
                }
                left_group
            }
        };

        slots[index - 1] = Slot::Moved(group);
        slots[index] = Slot::Moved(group);
        slots[index + 1] = Slot::Moved(group);
    }

    let mut live = arena.into_iter().flatten();
    let (Some(root), None) = (live.next(), live.next()) else {
        return Err(malformed("sequence did not resolve to a single group"));
    };

    let mut expr = root.into_expr();
    stamp_groups(&mut expr, ty);
    debug!("Regrouped sequence as {}", expr);

    Ok(expr)
}

/// Continues the group at `group` with `operator rhs`.
///
/// Same-tier chains are extended in place and stay left associative. A
/// tighter group is closed off and becomes the left operand instead.
fn append(
    arena: &mut [Option<Group>],
    group: usize,
    precedence: Precedence,
    operator: Expr,
    rhs: Expr,
) -> Result<(), Error> {
    let current = take_group(arena, group)?;

    let elements = if current.precedence == precedence {
        let mut elements = current.elements;
        elements.extend([operator, rhs]);
        elements
    } else {
        vec![current.into_expr(), operator, rhs]
    };

    arena[group] = Some(Group {
        precedence,
        elements,
    });
    Ok(())
}

/// Types every untyped sequence node of a resolved tree.
fn stamp_groups(expr: &mut Expr, ty: Option<&Type>) {
    if let ExprKind::Sequence(children) = &mut expr.kind {
        if expr.ty.is_none() {
            expr.ty = ty.cloned();
        }

        for child in children.iter_mut() {
            stamp_groups(child, ty);
        }
    }
}

fn take_live(slots: &mut [Slot], index: usize) -> Result<Expr, Error> {
    match std::mem::replace(&mut slots[index], Slot::Moved(usize::MAX)) {
        Slot::Live(expr) => Ok(expr),
        Slot::Moved(_) => Err(malformed("operator consumed twice")),
    }
}

fn take_group(arena: &mut [Option<Group>], group: usize) -> Result<Group, Error> {
    arena
        .get_mut(group)
        .and_then(|slot| slot.take())
        .ok_or_else(|| malformed("reference to a merged group"))
}

fn malformed(message: &str) -> Error {
    Error::new(
        ErrorImpl::MalformedSequence {
            message: String::from(message),
        },
        crate::Position::null(),
    )
}
