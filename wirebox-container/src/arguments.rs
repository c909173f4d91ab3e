//! Merging call-time arguments with declared parameters.

use tracing::trace;

use crate::error::Result;
use crate::parameter::Parameter;
use crate::registry::Lookup;
use crate::value::Value;

/// Builds the final argument list for one construction.
///
/// Explicit call arguments always win, position by position. Declared
/// parameters only fill the tail the caller left out:
///
/// - `call_args.len() >= params.len()`: `call_args` unchanged, extra
///   trailing arguments included;
/// - otherwise: `call_args` followed by `params[call_args.len()..]`, each
///   resolved in order.
///
/// With no call arguments this resolves every parameter; with neither, the
/// list is empty.
pub fn override_args(
    params: &[Parameter],
    call_args: &[Value],
    lookup: &dyn Lookup,
) -> Result<Vec<Value>> {
    if call_args.len() >= params.len() {
        return Ok(call_args.to_vec());
    }

    trace!(
        supplied = call_args.len(),
        declared = params.len(),
        "Filling arguments from parameters"
    );

    let mut args = Vec::with_capacity(params.len());
    args.extend_from_slice(call_args);
    for param in &params[call_args.len()..] {
        args.push(param.resolve(lookup)?);
    }
    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoker::Invoker;
    use crate::key::InvokerKey;

    struct EmptyLookup;

    impl Lookup for EmptyLookup {
        fn find(&self, _key: &InvokerKey) -> Option<Invoker> {
            None
        }
    }

    fn ints(values: &[Value]) -> Vec<Option<i32>> {
        values.iter().map(|v| v.downcast_ref::<i32>().copied()).collect()
    }

    fn params(values: &[i32]) -> Vec<Parameter> {
        values.iter().map(|&v| Parameter::Value(Value::new(v))).collect()
    }

    fn args(values: &[i32]) -> Vec<Value> {
        values.iter().map(|&v| Value::new(v)).collect()
    }

    #[test]
    fn nothing_gives_empty() {
        assert!(override_args(&[], &[], &EmptyLookup).unwrap().is_empty());
    }

    #[test]
    fn no_args_resolves_all_params() {
        let out = override_args(&params(&[1, 2]), &[], &EmptyLookup).unwrap();
        assert_eq!(ints(&out), vec![Some(1), Some(2)]);
    }

    #[test]
    fn enough_args_shadow_params() {
        let call = args(&[7, 8, 9]);
        let out = override_args(&params(&[1, 2]), &call, &EmptyLookup).unwrap();
        assert_eq!(ints(&out), vec![Some(7), Some(8), Some(9)]);
        assert!(out[0].ptr_eq(&call[0]));
    }

    #[test]
    fn equal_lengths_shadow_params() {
        let out = override_args(&params(&[1, 2]), &args(&[5, 6]), &EmptyLookup).unwrap();
        assert_eq!(ints(&out), vec![Some(5), Some(6)]);
    }

    #[test]
    fn fewer_args_take_param_tail() {
        let out = override_args(&params(&[1, 2, 3]), &args(&[9]), &EmptyLookup).unwrap();
        assert_eq!(ints(&out), vec![Some(9), Some(2), Some(3)]);
    }

    #[test]
    fn args_without_params_pass_through() {
        let out = override_args(&[], &args(&[4]), &EmptyLookup).unwrap();
        assert_eq!(ints(&out), vec![Some(4)]);
    }

    #[test]
    fn missing_lookup_fills_null() {
        let declared = vec![
            Parameter::Value(Value::new(1i32)),
            Parameter::Resolve("Ns.Missing".into()),
        ];
        let out = override_args(&declared, &[], &EmptyLookup).unwrap();
        assert_eq!(out.len(), 2);
        assert!(out[1].is_null());
    }
}
