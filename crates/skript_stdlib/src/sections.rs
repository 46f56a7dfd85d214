//! Default sections: nested block headers.

use skript_foundation::Result;
use skript_parser::{RegistryBuilder, SyntaxCategory, SyntaxSpec};

pub(crate) fn register(builder: &mut RegistryBuilder) -> Result<()> {
    builder.register(
        SyntaxSpec::new(SyntaxCategory::Section)
            .name("if")
            .pattern("if %=boolean%"),
    )?;
    builder.register(
        SyntaxSpec::new(SyntaxCategory::Section)
            .name("while")
            .pattern("while %=boolean%"),
    )?;
    builder.register(
        SyntaxSpec::new(SyntaxCategory::Section)
            .name("loop")
            .pattern("loop %integers%"),
    )?;
    Ok(())
}
