use crate::cli::CheckArgs;
use crate::error::Result;
use betaspec::core::io::exchange::ExchangeTable;
use betaspec::core::transition::{TransitionOptions, TransitionParameters};
use std::io::{self, Write};
use tracing::info;

pub fn run(args: CheckArgs) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    check(&args, &mut out)
}

fn check<W: Write>(args: &CheckArgs, out: &mut W) -> Result<()> {
    info!("Loading transition from {:?}", &args.transition);
    let options = TransitionOptions::load(&args.transition)?;
    let exchange = args
        .exchange_table
        .as_deref()
        .map(ExchangeTable::load)
        .transpose()?;

    let params = TransitionParameters::initialize(&options, exchange.as_ref())?;

    writeln!(out, "✓ {} passes the sanity check.", options.label())?;
    writeln!(out, "{:25}: {}", "Process", params.beta_type)?;
    writeln!(out, "{:25}: {}", "Type", params.decay_type)?;
    if params.mixing_ratio != 0.0 {
        writeln!(out, "{:25}: {}", "Mixing ratio", params.mixing_ratio)?;
    }
    writeln!(out, "{:25}: Z = {}, A = {}", "Mother", params.zi, params.a)?;
    writeln!(out, "{:25}: Z = {}", "Daughter", params.zf)?;
    writeln!(out, "{:25}: {:.6}", "W0 [m_ec2]", params.w0)?;
    writeln!(out, "{:25}: {:.4}", "Endpoint energy [keV]", params.endpoint_kev())?;
    writeln!(out, "{:25}: {:.6e}", "R [hbar/m_ec]", params.r)?;
    writeln!(out, "{:25}: {}", "Daughter beta2", params.daughter_beta2)?;
    writeln!(out, "{:25}: {} keV", "Atomic energy deficit", params.atomic_energy_deficit)?;
    if exchange.is_some() {
        writeln!(out, "{:25}: {:?}", "Exchange coefficients", params.exchange_coefficients)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use std::fs;
    use tempfile::tempdir;

    const OXYGEN_14: &str = r#"
        [transition]
        process = "B+"
        type = "fermi"
        q-value = 5144.364
        partial-halflife = 71.138

        [mother]
        z = 8
        a = 14

        [daughter]
        z = 7
        a = 14
        excitation-energy = 2312.798
        radius = 2.5428
    "#;

    #[test]
    fn valid_transition_prints_derived_parameters() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("o14.toml");
        fs::write(&path, OXYGEN_14).unwrap();
        let args = CheckArgs {
            transition: path,
            exchange_table: None,
        };

        let mut out = Vec::new();
        check(&args, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("14O -> 14N passes the sanity check."));
        assert!(text.contains("B+"));
        assert!(!text.contains("Exchange coefficients"));
    }

    #[test]
    fn inconsistent_transition_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, OXYGEN_14.replace("z = 7", "z = 9")).unwrap();
        let args = CheckArgs {
            transition: path,
            exchange_table: None,
        };

        let mut out = Vec::new();
        assert!(matches!(check(&args, &mut out), Err(CliError::Transition(_))));
    }
}
