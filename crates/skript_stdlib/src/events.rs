//! Default events: trigger headers at the top level of a script.

use skript_foundation::Result;
use skript_parser::{ContextValueSpec, RegistryBuilder, SyntaxCategory, SyntaxSpec, ValueUsage};

pub(crate) fn register(builder: &mut RegistryBuilder) -> Result<()> {
    let script_load = builder.register(
        SyntaxSpec::new(SyntaxCategory::Event)
            .name("script load")
            .pattern("[on] script load[ing]"),
    )?;
    builder.register_context_value(script_load, ContextValueSpec::new("script", "string"))?;

    let periodical = builder.register(
        SyntaxSpec::new(SyntaxCategory::Event)
            .name("periodical")
            .pattern("every %*duration%")
            .produce_with(|node, _| {
                let zero = node
                    .argument(0)
                    .and_then(|arg| arg.as_literal())
                    .and_then(skript_foundation::Value::as_duration)
                    .is_some_and(|d| d.is_zero());
                if zero {
                    return Err("the interval must be longer than zero".to_string());
                }
                Ok(node)
            }),
    )?;
    builder.register_context_value(periodical, ContextValueSpec::new("interval", "duration"))?;

    let at_time = builder.register(
        SyntaxSpec::new(SyntaxCategory::Event)
            .name("at time")
            .pattern("at %*time%"),
    )?;
    builder.register_context_value(
        at_time,
        ContextValueSpec::new("time", "time").usage(ValueUsage::ExpressionOnly),
    )?;
    builder.register(
        SyntaxSpec::new(SyntaxCategory::Event)
            .name("when")
            .pattern("when %=boolean%"),
    )?;
    Ok(())
}
