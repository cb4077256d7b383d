//! Factory for verdict providers based on configuration

use super::process::ExternalCommand;
use super::verdict::{CadicalVerdict, LastTokenVerdict, SilentStderrVerdict, VerdictProvider};
use crate::config::{SolverSpec, VerdictConvention};
use anyhow::Result;

/// Build the provider described by `spec`; `name` labels it in reports
pub fn build_provider(name: &str, spec: &SolverSpec) -> Result<Box<dyn VerdictProvider>> {
    let command = || -> Result<ExternalCommand> {
        let program = spec
            .program
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("{} solver has no program configured", name))?;
        Ok(ExternalCommand::new(program.clone())
            .with_args(spec.args.clone())
            .with_timeout(spec.timeout()))
    };

    Ok(match spec.convention {
        VerdictConvention::LastToken => Box::new(LastTokenVerdict::new(
            name,
            command()?,
            &spec.sat_keyword,
            &spec.unsat_keyword,
        )),
        VerdictConvention::SilentStderr => Box::new(SilentStderrVerdict::new(name, command()?)),
        VerdictConvention::Cadical => Box::new(CadicalVerdict::new(name)),
    })
}
