use tracing::trace;

use super::{LuaState, Result, VmError};
use crate::number;
use crate::value::{Value, str_to_number};

/// Arithmetic and bitwise operators, in opcode order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Mod,
    Pow,
    Div,
    IDiv,
    BAnd,
    BOr,
    BXor,
    Shl,
    Shr,
    Unm,
    BNot,
}

impl ArithOp {
    pub fn is_unary(self) -> bool {
        matches!(self, ArithOp::Unm | ArithOp::BNot)
    }
}

/// A coerced numeric operand.
#[derive(Clone, Copy)]
enum Operand {
    Int(i64),
    Float(f64),
}

impl Operand {
    fn from_value(v: &Value) -> Result<Operand> {
        match v {
            Value::Integer(i) => Ok(Operand::Int(*i)),
            Value::Number(n) => Ok(Operand::Float(*n)),
            Value::Text(s) => match str_to_number(s) {
                Some(Value::Integer(i)) => Ok(Operand::Int(i)),
                Some(Value::Number(n)) => Ok(Operand::Float(n)),
                _ => Err(VmError::ArithType { type_name: v.type_name() }),
            },
            Value::Nil | Value::Bool(_) => Err(VmError::ArithType { type_name: v.type_name() }),
        }
    }

    fn float(self) -> f64 {
        match self {
            Operand::Int(i) => i as f64,
            Operand::Float(n) => n,
        }
    }

    fn integer(self) -> Result<i64> {
        match self {
            Operand::Int(i) => Ok(i),
            Operand::Float(n) => number::float_to_integer(n).ok_or(VmError::NoIntegerRepresentation),
        }
    }
}

fn int_or_float(a: Operand, b: Operand, iop: fn(i64, i64) -> i64, fop: fn(f64, f64) -> f64) -> Value {
    match (a, b) {
        (Operand::Int(x), Operand::Int(y)) => Value::Integer(iop(x, y)),
        _ => Value::Number(fop(a.float(), b.float())),
    }
}

fn bitwise(a: Operand, b: Operand, op: fn(i64, i64) -> i64) -> Result<Value> {
    Ok(Value::Integer(op(a.integer()?, b.integer()?)))
}

/// Applies `op` to `a` and `b`; unary operators ignore `b`. Integer
/// results are kept only when both operands are integers.
fn arith_values(op: ArithOp, a: &Value, b: &Value) -> Result<Value> {
    let a = Operand::from_value(a)?;
    let b = Operand::from_value(b)?;
    let int_zero = matches!((a, b), (Operand::Int(_), Operand::Int(0)));

    match op {
        ArithOp::Add => Ok(int_or_float(a, b, i64::wrapping_add, |x, y| x + y)),
        ArithOp::Sub => Ok(int_or_float(a, b, i64::wrapping_sub, |x, y| x - y)),
        ArithOp::Mul => Ok(int_or_float(a, b, i64::wrapping_mul, |x, y| x * y)),
        ArithOp::Mod => {
            if int_zero {
                return Err(VmError::DivisionByZero { op: "n%0" });
            }
            Ok(int_or_float(a, b, number::imod, number::fmod))
        }
        ArithOp::IDiv => {
            if int_zero {
                return Err(VmError::DivisionByZero { op: "n//0" });
            }
            Ok(int_or_float(a, b, number::ifloor_div, number::ffloor_div))
        }
        ArithOp::Div => Ok(Value::Number(a.float() / b.float())),
        ArithOp::Pow => Ok(Value::Number(a.float().powf(b.float()))),
        ArithOp::Unm => Ok(int_or_float(a, b, |x, _| x.wrapping_neg(), |x, _| -x)),
        ArithOp::BAnd => bitwise(a, b, |x, y| x & y),
        ArithOp::BOr => bitwise(a, b, |x, y| x | y),
        ArithOp::BXor => bitwise(a, b, |x, y| x ^ y),
        ArithOp::Shl => bitwise(a, b, number::shift_left),
        ArithOp::Shr => bitwise(a, b, number::shift_right),
        ArithOp::BNot => bitwise(a, b, |x, _| !x),
    }
}

impl LuaState<'_> {
    /// Pops the operands of `op` (one for unary operators, two otherwise,
    /// the second operand on top) and pushes the result. On failure the
    /// stack is left as it was.
    pub fn arith(&mut self, op: ArithOp) -> Result<()> {
        let arity = if op.is_unary() { 1 } else { 2 };
        if self.stack.top() < arity {
            return Err(VmError::StackUnderflow);
        }

        // operands stay on the stack if the operation faults
        let b = self.stack.get(-1)?;
        let a = if op.is_unary() { b } else { self.stack.get(-2)? };
        let result = arith_values(op, a, b)?;
        trace!(?op, %result, "arith");
        for _ in 0..arity {
            self.stack.pop()?;
        }
        self.stack.push(result)
    }
}

#[cfg(test)]
mod tests {
    use super::super::LUA_MINSTACK;
    use super::*;
    use crate::binchunk::Prototype;

    fn eval(op: ArithOp, a: Value, b: Value) -> Result<Value> {
        arith_values(op, &a, &b)
    }

    #[test]
    fn integer_arithmetic_wraps() {
        assert_eq!(eval(ArithOp::Add, Value::Integer(i64::MAX), Value::Integer(1)), Ok(Value::Integer(i64::MIN)));
        assert_eq!(eval(ArithOp::Mul, Value::Integer(6), Value::Integer(7)), Ok(Value::Integer(42)));
        assert_eq!(eval(ArithOp::Sub, Value::Integer(1), Value::Integer(3)), Ok(Value::Integer(-2)));
        assert_eq!(eval(ArithOp::Unm, Value::Integer(i64::MIN), Value::Integer(i64::MIN)), Ok(Value::Integer(i64::MIN)));
    }

    #[test]
    fn floor_division_and_modulo() {
        assert_eq!(eval(ArithOp::IDiv, Value::Integer(-7), Value::Integer(2)), Ok(Value::Integer(-4)));
        assert_eq!(eval(ArithOp::Mod, Value::Integer(-7), Value::Integer(2)), Ok(Value::Integer(1)));
        assert_eq!(eval(ArithOp::IDiv, Value::Number(-7.0), Value::Integer(2)), Ok(Value::Number(-4.0)));
        assert_eq!(eval(ArithOp::Mod, Value::Number(5.5), Value::Integer(2)), Ok(Value::Number(1.5)));
    }

    #[test]
    fn integer_division_by_zero_faults() {
        assert_eq!(
            eval(ArithOp::IDiv, Value::Integer(1), Value::Integer(0)),
            Err(VmError::DivisionByZero { op: "n//0" })
        );
        assert_eq!(
            eval(ArithOp::Mod, Value::Integer(1), Value::Integer(0)),
            Err(VmError::DivisionByZero { op: "n%0" })
        );
        assert_eq!(eval(ArithOp::IDiv, Value::Integer(1), Value::Number(0.0)), Ok(Value::Number(f64::INFINITY)));
        assert_eq!(eval(ArithOp::Div, Value::Integer(1), Value::Integer(0)), Ok(Value::Number(f64::INFINITY)));
    }

    #[test]
    fn div_and_pow_are_float_only() {
        assert_eq!(eval(ArithOp::Div, Value::Integer(7), Value::Integer(2)), Ok(Value::Number(3.5)));
        assert_eq!(eval(ArithOp::Div, Value::Integer(4), Value::Integer(2)), Ok(Value::Number(2.0)));
        assert_eq!(eval(ArithOp::Pow, Value::Integer(2), Value::Integer(10)), Ok(Value::Number(1024.0)));
    }

    #[test]
    fn mixed_operands_promote_to_float() {
        assert_eq!(eval(ArithOp::Add, Value::Integer(1), Value::Number(2.0)), Ok(Value::Number(3.0)));
        assert_eq!(eval(ArithOp::Unm, Value::Number(1.5), Value::Number(1.5)), Ok(Value::Number(-1.5)));
    }

    #[test]
    fn numeric_strings_are_coerced() {
        let ten = Value::Text("10".into());
        assert_eq!(eval(ArithOp::Add, ten, Value::Integer(1)), Ok(Value::Integer(11)));
        assert_eq!(eval(ArithOp::Mul, Value::Text("0.5".into()), Value::Integer(4)), Ok(Value::Number(2.0)));
        assert_eq!(
            eval(ArithOp::Add, Value::Text("ten".into()), Value::Integer(1)),
            Err(VmError::ArithType { type_name: "string" })
        );
    }

    #[test]
    fn bitwise_needs_integer_representation() {
        assert_eq!(eval(ArithOp::BAnd, Value::Number(3.0), Value::Integer(5)), Ok(Value::Integer(1)));
        assert_eq!(eval(ArithOp::BOr, Value::Integer(3), Value::Integer(4)), Ok(Value::Integer(7)));
        assert_eq!(eval(ArithOp::BXor, Value::Integer(6), Value::Integer(3)), Ok(Value::Integer(5)));
        assert_eq!(eval(ArithOp::Shl, Value::Integer(1), Value::Integer(8)), Ok(Value::Integer(256)));
        assert_eq!(eval(ArithOp::Shr, Value::Integer(-1), Value::Integer(63)), Ok(Value::Integer(1)));
        assert_eq!(eval(ArithOp::BNot, Value::Integer(0), Value::Integer(0)), Ok(Value::Integer(-1)));
        assert_eq!(
            eval(ArithOp::BAnd, Value::Number(1.5), Value::Integer(1)),
            Err(VmError::NoIntegerRepresentation)
        );
    }

    #[test]
    fn non_numbers_fault() {
        assert_eq!(
            eval(ArithOp::Add, Value::Nil, Value::Integer(1)),
            Err(VmError::ArithType { type_name: "nil" })
        );
        assert_eq!(
            eval(ArithOp::Sub, Value::Integer(1), Value::Bool(true)),
            Err(VmError::ArithType { type_name: "boolean" })
        );
    }

    #[test]
    fn arith_on_the_stack() {
        let proto = Prototype::default();
        let mut ls = LuaState::new(LUA_MINSTACK, &proto);
        ls.push_integer(1).unwrap();
        ls.push_string("2.0").unwrap();
        ls.arith(ArithOp::Add).unwrap();
        assert_eq!(ls.get_top(), 1);
        assert_eq!(ls.to_numberx(1), Some(3.0));
        assert!(!ls.is_integer(1));

        ls.arith(ArithOp::Unm).unwrap();
        assert_eq!(ls.to_numberx(-1), Some(-3.0));

        ls.push_integer(2).unwrap();
        ls.arith(ArithOp::Pow).unwrap();
        assert_eq!(ls.to_numberx(-1), Some(9.0));
        assert_eq!(ls.get_top(), 1);
    }

    #[test]
    fn arith_without_enough_operands_underflows() {
        let proto = Prototype::default();
        let mut ls = LuaState::new(LUA_MINSTACK, &proto);
        ls.push_integer(1).unwrap();
        assert_eq!(ls.arith(ArithOp::Add), Err(VmError::StackUnderflow));
        assert_eq!(ls.get_top(), 1);
        ls.arith(ArithOp::BNot).unwrap();
        assert_eq!(ls.to_integerx(1), Some(-2));
    }

    #[test]
    fn failed_arith_keeps_its_operands() {
        let proto = Prototype::default();
        let mut ls = LuaState::new(LUA_MINSTACK, &proto);
        ls.push_integer(1).unwrap();
        ls.push_boolean(true).unwrap();
        assert_eq!(ls.arith(ArithOp::Add), Err(VmError::ArithType { type_name: "boolean" }));
        assert_eq!(ls.get_top(), 2);
        assert_eq!(ls.to_integerx(1), Some(1));
        assert!(ls.is_boolean(2));

        ls.pop(1).unwrap();
        ls.push_number(0.5).unwrap();
        assert_eq!(ls.arith(ArithOp::BAnd), Err(VmError::NoIntegerRepresentation));
        assert_eq!(ls.arith(ArithOp::BNot), Err(VmError::NoIntegerRepresentation));
        assert_eq!(ls.get_top(), 2);
        assert_eq!(ls.to_numberx(2), Some(0.5));

        ls.push_integer(0).unwrap();
        assert_eq!(ls.arith(ArithOp::IDiv), Err(VmError::DivisionByZero { op: "n//0" }));
        assert_eq!(ls.get_top(), 3);
    }
}
