//! Default effects.

use skript_foundation::Result;
use skript_parser::{
    Expr, ExprKind, ParseContext, ProduceResult, RegistryBuilder, SyntaxCategory, SyntaxNode,
    SyntaxSpec,
};

pub(crate) fn register(builder: &mut RegistryBuilder) -> Result<()> {
    builder.register(
        SyntaxSpec::new(SyntaxCategory::Effect)
            .name("print")
            .pattern("print %objects%"),
    )?;
    builder.register(
        SyntaxSpec::new(SyntaxCategory::Effect)
            .name("set")
            .pattern("set %~objects% to %objects%")
            .produce_with(set),
    )?;
    builder.register(
        SyntaxSpec::new(SyntaxCategory::Effect)
            .name("wait")
            .pattern("wait %duration%"),
    )?;
    builder.register(
        SyntaxSpec::new(SyntaxCategory::Effect)
            .name("return")
            .pattern("return [%-objects%]"),
    )?;
    Ok(())
}

/// Declares the local variables being assigned.
fn set(node: SyntaxNode, ctx: &mut ParseContext<'_>) -> ProduceResult {
    if let Some(target) = node.argument(0) {
        declare_locals(target, ctx);
    }
    Ok(node)
}

fn declare_locals(expr: &Expr, ctx: &mut ParseContext<'_>) {
    match &expr.kind {
        ExprKind::Variable { name, local: true } => ctx.declare(name),
        ExprKind::List { items, .. } => {
            for item in items {
                declare_locals(item, ctx);
            }
        }
        _ => {}
    }
}
