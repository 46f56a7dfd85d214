//! Default conditions. Each is usable as a statement and wherever a
//! `%=boolean%` is expected; parse mark 1 means the check is negated.

use skript_foundation::Result;
use skript_parser::{RegistryBuilder, SyntaxCategory, SyntaxSpec};

use crate::expressions::is_literal_zero;

pub(crate) fn register(builder: &mut RegistryBuilder) -> Result<()> {
    builder.register(
        SyntaxSpec::new(SyntaxCategory::Condition)
            .name("is divisible")
            .pattern("%numbers% (is|are)[1: not|1:n't] divisible by %integer%")
            .produce_with(|node, _| {
                if is_literal_zero(&node, 1) {
                    return Err("cannot divide by zero".to_string());
                }
                Ok(node)
            }),
    )?;
    builder.register(
        SyntaxSpec::new(SyntaxCategory::Condition)
            .name("chance")
            .pattern("chance of %number%[1:\\%]"),
    )?;
    builder.register(
        SyntaxSpec::new(SyntaxCategory::Condition)
            .name("is prime")
            .pattern("%integers% (is|are)[1: not|1:n't] prime"),
    )?;
    Ok(())
}
