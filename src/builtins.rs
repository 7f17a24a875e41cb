//! Native functions registered into every root scope.
//!
//! Each builtin runs inside its own child scope and returns the value the
//! interpreter stores as that scope's `exit`. `set` and `declare` write
//! through to the caller's scope instead of their own.

use crate::error::BoiError;
use crate::scope::{CallContext, Function, NativeFn, Scope};
use crate::value::Var;
use num_bigint::{BigInt, BigUint};
use num_traits::Zero;
use rand::rngs::OsRng;
use rand::{Rng, RngCore};
use std::io;
use std::rc::Rc;

type Builtin = fn(&mut CallContext<'_>, &[Var]) -> Result<Var, BoiError>;

const LIBRARY: &[(&str, Builtin)] = &[
    ("say", say),
    ("set", set),
    ("icanhas", icanhas),
    ("declare", declare),
    ("cat", cat),
    ("nyan", cat),
    ("int", int),
    ("+", add),
    ("-", subtract),
    ("*", multiply),
    ("/", divide),
    ("dec", dec),
    ("<", less),
    ("IsEven", is_even),
];

pub fn register(scope: &mut Scope) {
    for (name, builtin) in LIBRARY {
        let native: NativeFn = Rc::new(*builtin);
        scope.define_function(name, Function::Native(native));
    }
}

fn say(context: &mut CallContext<'_>, args: &[Var]) -> Result<Var, BoiError> {
    for arg in args {
        context.output.write_all(arg.as_bytes()).map_err(BoiError::io)?;
    }
    context.output.write_all(b"\n").map_err(BoiError::io)?;
    Ok(Var::empty())
}

fn set(context: &mut CallContext<'_>, args: &[Var]) -> Result<Var, BoiError> {
    let [name, value] = args else {
        return Err(BoiError::arity(format!(
            "set requires 2 parameters, got {}",
            args.len()
        )));
    };
    let caller = context.caller()?;
    context.scopes.set(caller, &name.to_text(), value.clone());
    Ok(value.clone())
}

fn icanhas(context: &mut CallContext<'_>, args: &[Var]) -> Result<Var, BoiError> {
    let [name] = args else {
        return Err(BoiError::arity(format!(
            "icanhas requires 1 parameter, got {}",
            args.len()
        )));
    };
    let caller = context.caller()?;
    Ok(context
        .scopes
        .get(caller, &name.to_text())
        .cloned()
        .unwrap_or_default())
}

/// Binds a name to four fresh random bytes so scripts cannot assume an
/// initial value. Any value argument is ignored.
fn declare(context: &mut CallContext<'_>, args: &[Var]) -> Result<Var, BoiError> {
    let Some(name) = args.first() else {
        return Err(BoiError::arity("declare requires 1 parameter".to_string()));
    };

    let mut bytes = vec![0u8; 4];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|error| BoiError::io(io::Error::new(io::ErrorKind::Other, error)))?;
    let value = Var::new(bytes);

    // Always the caller's own frame, even if an outer scope has the name.
    let caller = context.caller()?;
    context.scopes.define(caller, &name.to_text(), value.clone());
    Ok(value)
}

fn cat(_context: &mut CallContext<'_>, args: &[Var]) -> Result<Var, BoiError> {
    Ok(Var::new(
        args.iter().flat_map(|arg| arg.as_bytes().iter().copied()).collect(),
    ))
}

/// Parses base-10 text arguments and sums them.
fn int(_context: &mut CallContext<'_>, args: &[Var]) -> Result<Var, BoiError> {
    let mut sum = BigUint::zero();
    for arg in args {
        let digits = arg.as_bytes();
        if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
            return Err(BoiError::invalid_number(&arg.to_text()));
        }
        let value = BigUint::parse_bytes(digits, 10)
            .ok_or_else(|| BoiError::invalid_number(&arg.to_text()))?;
        sum += value;
    }
    Ok(Var::from_uint(&sum))
}

fn decode(arg: &Var) -> BigInt {
    BigInt::from(arg.to_uint())
}

// The arithmetic folds all start from zero, so an empty `*` is 0, not 1.

fn add(_context: &mut CallContext<'_>, args: &[Var]) -> Result<Var, BoiError> {
    let sum = args.iter().fold(BigInt::zero(), |acc, arg| acc + decode(arg));
    Ok(Var::from_int(&sum))
}

fn subtract(_context: &mut CallContext<'_>, args: &[Var]) -> Result<Var, BoiError> {
    let difference = args.iter().fold(BigInt::zero(), |acc, arg| acc - decode(arg));
    Ok(Var::from_int(&difference))
}

fn multiply(_context: &mut CallContext<'_>, args: &[Var]) -> Result<Var, BoiError> {
    let product = args.iter().fold(BigInt::zero(), |acc, arg| acc * decode(arg));
    Ok(Var::from_int(&product))
}

fn divide(_context: &mut CallContext<'_>, args: &[Var]) -> Result<Var, BoiError> {
    let mut quotient = BigInt::zero();
    for arg in args {
        let divisor = decode(arg);
        if divisor.is_zero() {
            return Err(BoiError::division_by_zero());
        }
        quotient /= divisor;
    }
    Ok(Var::from_int(&quotient))
}

fn dec(_context: &mut CallContext<'_>, args: &[Var]) -> Result<Var, BoiError> {
    let value = args.first().map(Var::to_uint).unwrap_or_default();
    Ok(Var::from(value.to_str_radix(10).as_str()))
}

/// `true` iff the arguments are strictly increasing.
fn less(_context: &mut CallContext<'_>, args: &[Var]) -> Result<Var, BoiError> {
    if args.len() < 2 {
        return Err(BoiError::arity(format!(
            "< requires at least 2 parameters, got {}",
            args.len()
        )));
    }
    let values: Vec<BigUint> = args.iter().map(Var::to_uint).collect();
    let increasing = values.windows(2).all(|pair| pair[0] < pair[1]);
    Ok(Var::from_bool(increasing))
}

/// A deliberately unreliable parity check.
///
/// Draws a chance of lying, then independently flips a coin against it, and
/// answers with a single byte: the claimed confidence (0 to 100) that the
/// number is even.
fn is_even(_context: &mut CallContext<'_>, args: &[Var]) -> Result<Var, BoiError> {
    let [value] = args else {
        return Err(BoiError::arity(format!(
            "IsEven can only take one value, got {}",
            args.len()
        )));
    };

    let mut rng = rand::thread_rng();
    let lie_chance: u8 = rng.gen_range(0..100);

    let mut even = (value.to_uint() % 2u32).is_zero();
    if rng.gen_range(0..100) < lie_chance {
        even = !even;
    }

    let confidence = if even { 100 - lie_chance } else { lie_chance };
    Ok(Var::new(vec![confidence]))
}
