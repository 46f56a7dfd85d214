//! Default expressions.

use skript_foundation::{Result, Value};
use skript_parser::{
    ParseContext, ProduceResult, RegistryBuilder, SyntaxCategory, SyntaxNode, SyntaxSpec,
    ValueState, context_value,
};

/// Pattern of `context-<name>` and its bare and time-shifted forms.
pub const CONTEXT_VALUE: &str =
    "[the] [(1:(past|previous)|2:(future|next))] [ctx:(context|event)-]<.+>";

/// Arithmetic patterns, in operator order.
pub const ARITHMETIC: [&str; 5] = [
    "%number%[ ]+[ ]%number%",
    "%number%[ ]-[ ]%number%",
    "%number%[ ]*[ ]%number%",
    "%number%[ ]/[ ]%number%",
    "%number%[ ]^[ ]%number%",
];

const DIVISION: usize = 3;

pub(crate) fn register(builder: &mut RegistryBuilder) -> Result<()> {
    builder.register(
        SyntaxSpec::new(SyntaxCategory::Expression)
            .name("arithmetic")
            .patterns(ARITHMETIC)
            .returns("number")
            .produce_with(|node, _| arithmetic(node)),
    )?;
    builder.register(
        SyntaxSpec::new(SyntaxCategory::Expression)
            .name("boolean operators")
            .patterns([
                "not %=boolean%",
                "%=boolean% (or|\\|\\|) %=boolean%",
                "%=boolean% (and|&&) %=boolean%",
            ])
            .returns("boolean"),
    )?;
    builder.register(
        SyntaxSpec::new(SyntaxCategory::Expression)
            .name("whether")
            .pattern("whether %~=boolean%")
            .returns("boolean"),
    )?;
    builder.register(
        SyntaxSpec::new(SyntaxCategory::Expression)
            .name("time constants")
            .patterns(["(0:noon|0:midday|1:midnight)", "%*integer% o'[ ]clock"])
            .returns("time")
            .produce_with(|node, _| time_constant(node)),
    )?;
    builder.register(
        SyntaxSpec::new(SyntaxCategory::Expression)
            .name("length")
            .pattern("[the] length of %string%")
            .returns("integer"),
    )?;
    builder.register(
        SyntaxSpec::new(SyntaxCategory::Expression)
            .name("random integer")
            .pattern("[a] random integer (from|between) %integer% (to|and) %integer%")
            .returns("integer"),
    )?;
    builder.register(
        SyntaxSpec::new(SyntaxCategory::Expression)
            .name("random number")
            .pattern("[a] random number (from|between) %number% (to|and) %number%")
            .returns("number"),
    )?;
    builder.register(
        SyntaxSpec::new(SyntaxCategory::Expression)
            .name("context value")
            .pattern(CONTEXT_VALUE)
            .priority(1)
            .returns("object")
            .produce_with(resolve_context_value),
    )?;
    Ok(())
}

/// Returns true when an argument is a literal number equal to zero.
pub(crate) fn is_literal_zero(node: &SyntaxNode, index: usize) -> bool {
    node.argument(index)
        .and_then(|arg| arg.as_literal())
        .and_then(Value::as_number)
        .is_some_and(|n| n == 0.0)
}

/// Integer literal of an argument.
pub(crate) fn literal_int(node: &SyntaxNode, index: usize) -> Option<i64> {
    node.argument(index)?.as_literal()?.as_int()
}

fn arithmetic(node: SyntaxNode) -> ProduceResult {
    if node.pattern_index == DIVISION && is_literal_zero(&node, 1) {
        return Err("cannot divide by zero".to_string());
    }
    Ok(node)
}

fn time_constant(node: SyntaxNode) -> ProduceResult {
    if node.pattern_index == 1 {
        if let Some(hour) = literal_int(&node, 0) {
            if !(0..=24).contains(&hour) {
                return Err(format!("the given hour ('{hour}') is not between 0 and 24"));
            }
        }
    }
    Ok(node)
}

/// Resolves the name against the enclosing triggers and narrows the return
/// type to the value's.
fn resolve_context_value(mut node: SyntaxNode, ctx: &mut ParseContext<'_>) -> ProduceResult {
    let Some(name) = node.matches.first() else {
        return Err(String::new());
    };
    let state = ValueState::from_mark(node.parse_mark)
        .ok_or_else(|| format!("invalid time state ({})", node.parse_mark))?;
    let value = context_value::resolve(ctx, name, state, !node.has_tag("ctx"))?;
    node.return_type = Some(value.return_type);
    Ok(node)
}
