use crate::evaluator;
use crate::types::{Arity, MalInt, MalObject, PrimitiveFn};

fn grab_operands(name: &'static str, args: &[MalObject]) -> evaluator::Result<(MalInt, MalInt)> {
    Arity::exactly(2)
        .validate_for(args.len(), name)
        .map_err(evaluator::Error::BadArgCount)?;
    let operand = |position: usize| {
        args[position]
            .as_int()
            .map_err(|mismatch| evaluator::Error::BadArgument {
                function: name,
                position,
                mismatch,
            })
    };
    Ok((operand(0)?, operand(1)?))
}

// Overflow is an error rather than wrapping around.
macro_rules! arithmetic_primitive {
    ($SYMBOL:tt, $NAME:ident, $checked:ident) => {
        paste::item! {
            pub static $NAME: PrimitiveFn = PrimitiveFn {
                name: stringify!($SYMBOL),
                fn_ptr: [<$NAME:lower>],
                arity: Arity::exactly(2),
            };

            fn [<$NAME:lower>](args: &[MalObject]) -> evaluator::Result {
                let (x, y) = grab_operands(stringify!($SYMBOL), args)?;
                x.$checked(y)
                    .map(MalObject::Integer)
                    .ok_or(evaluator::Error::Overflow(stringify!($SYMBOL)))
            }
        }
    };
}

arithmetic_primitive!(+, ADD, checked_add);
arithmetic_primitive!(-, SUB, checked_sub);
arithmetic_primitive!(*, MUL, checked_mul);

pub static DIV: PrimitiveFn = PrimitiveFn {
    name: "/",
    fn_ptr: div,
    arity: Arity::exactly(2),
};

/// Truncates toward zero.
fn div(args: &[MalObject]) -> evaluator::Result {
    match grab_operands("/", args)? {
        (_, 0) => Err(evaluator::Error::DivideByZero),
        (x, y) => x
            .checked_div(y)
            .map(MalObject::Integer)
            .ok_or(evaluator::Error::Overflow("/")),
    }
}

pub(crate) static PRIMITIVES: [&PrimitiveFn; 4] = [&ADD, &SUB, &MUL, &DIV];
