use super::Outcome;
use crate::error::Result;
use chargefw::core::methods::MethodRegistry;
use chargefw::core::methods::params::ParameterCategory;
use std::io::Write;

pub fn run() -> Result<Outcome> {
    let registry = MethodRegistry::default();
    let stdout = std::io::stdout();
    write_method_table(&registry, &mut stdout.lock())?;
    Ok(Outcome::Success)
}

fn write_method_table(registry: &MethodRegistry, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "{:<10} {:<10} {:<10} {:<10}", "METHOD", "COMMON", "ATOM", "BOND")?;
    for method in registry.iter() {
        let requirements = method.required_parameters();
        let column = |category| {
            let names = requirements.names(category);
            if names.is_empty() {
                "-".to_string()
            } else {
                names.join(",")
            }
        };
        writeln!(
            out,
            "{:<10} {:<10} {:<10} {:<10}",
            method.name(),
            column(ParameterCategory::Common),
            column(ParameterCategory::Atom),
            column(ParameterCategory::Bond),
        )?;
    }
    Ok(())
}
