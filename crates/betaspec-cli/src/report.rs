use crate::config::AppConfig;
use betaspec::core::transition::TransitionOptions;
use betaspec::engine::config::StepSpec;
use betaspec::engine::pipeline::Correction;
use betaspec::workflows::generate::GenerationResult;
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// `stem` with `extension` appended, keeping any dots already in the stem.
pub fn output_path(stem: &Path, extension: &str) -> PathBuf {
    let mut name = OsString::from(stem.as_os_str());
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

fn yes_no(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

/// Writes the human-readable summary of a generation run.
pub fn write_summary<W: Write>(
    out: &mut W,
    options: &TransitionOptions,
    app: &AppConfig,
    result: &GenerationResult,
) -> io::Result<()> {
    let params = &result.parameters;

    writeln!(out, "Spectrum input overview")?;
    writeln!(out, "{:=<30}", "")?;
    writeln!(
        out,
        "Transition from {} ({} keV) to {} ({} keV)",
        options.mother.label(),
        options.mother.excitation_energy,
        options.daughter.label(),
        options.daughter.excitation_energy
    )?;
    writeln!(
        out,
        "Q value: {} keV\tEffective endpoint energy: {:.4} keV",
        options.q_value,
        params.endpoint_kev()
    )?;
    writeln!(out, "Process: {}\tType: {}", params.beta_type, params.decay_type)?;
    if params.mixing_ratio != 0.0 {
        writeln!(out, "Mixing ratio: {}", params.mixing_ratio)?;
    }

    match &result.observables {
        Some(obs) => {
            if let Some(halflife) = options.partial_halflife {
                writeln!(out, "Partial halflife: {} s", halflife)?;
                writeln!(out, "Calculated log ft value: {:.6}", obs.log_ft)?;
            } else {
                writeln!(out, "Partial halflife: not given")?;
                writeln!(out, "Calculated log f value: {:.6}", obs.log_ft)?;
            }
            if let Some(external) = options.log_ft {
                writeln!(out, "External log ft: {:.3}", external)?;
            }
            if let Some(ratio) = obs.ft_ratio {
                writeln!(out, "Ratio of calculated/external ft value: {:.6}", ratio)?;
            }
            writeln!(out, "Mean energy: {:.4} keV", obs.mean_kinetic_energy_kev)?;
            if app.neutrino {
                match obs.mean_neutrino_energy {
                    Some(mean) => writeln!(
                        out,
                        "Mean antineutrino energy: {:.4} keV",
                        betaspec::core::constants::w_to_kev(mean)
                    )?,
                    None => writeln!(out, "Mean antineutrino energy: not available")?,
                }
            }
        }
        None => writeln!(out, "Observables: not available (fewer than two grid points)")?,
    }

    writeln!(out)?;
    writeln!(out, "Matrix element summary")?;
    writeln!(out, "{:-<30}", "")?;
    match &app.generator.matrix_elements {
        Some(elements) => {
            writeln!(out, "{:35}: {}", "b/Ac (weak magnetism)", elements.weak_magnetism)?;
            writeln!(out, "{:35}: {}", "d/Ac (induced tensor)", elements.induced_tensor)?;
            writeln!(out, "{:35}: {}", "AM121/AM101", elements.lambda)?;
        }
        None => writeln!(out, "not given")?,
    }

    writeln!(out)?;
    writeln!(out, "Spectral corrections")?;
    writeln!(out, "{:-<30}", "")?;
    for correction in Correction::CANONICAL_ORDER {
        let active = result.active_corrections.contains(&correction);
        writeln!(out, "{:25}: {}", correction.name(), yes_no(active))?;
    }
    let advanced = &app.generator.advanced;
    writeln!(out, "    NS shape: {}", advanced.ns_shape)?;
    writeln!(out, "    ES shape: {}", advanced.es_shape)?;
    writeln!(out, "{:25}: {}", "Isovector correction", yes_no(advanced.isovector))?;
    writeln!(out, "{:25}: {}", "Export neutrino", yes_no(app.neutrino))?;

    let end_kev = if app.window.end_kev > 0.0 {
        app.window.end_kev
    } else {
        params.endpoint_kev()
    };
    let step = match app.window.step {
        StepSpec::Size(size) => format!("step size {} keV", size),
        StepSpec::Count(n) => format!("{} steps", n),
    };
    writeln!(out)?;
    writeln!(
        out,
        "Spectrum calculated from {} keV to {:.4} keV with {}",
        app.window.begin_kev, end_kev, step
    )?;
    writeln!(out)?;

    if app.neutrino {
        writeln!(out, "{:10}\t{:10}\t{:10}\t{:10}", "W [m_ec2]", "E [keV]", "dN_e/dW", "dN_v/dW")?;
    } else {
        writeln!(out, "{:10}\t{:10}\t{:10}", "W [m_ec2]", "E [keV]", "dN_e/dW")?;
    }
    for point in &result.spectrum {
        if app.neutrino {
            writeln!(
                out,
                "{:<10.6}\t{:<10.6}\t{:<10.6e}\t{:<10.6e}",
                point.w,
                point.kinetic_kev(),
                point.electron,
                point.neutrino
            )?;
        } else {
            writeln!(
                out,
                "{:<10.6}\t{:<10.6}\t{:<10.6e}",
                point.w,
                point.kinetic_kev(),
                point.electron
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_paths_append_the_extension() {
        assert_eq!(output_path(Path::new("out/co60"), "raw"), PathBuf::from("out/co60.raw"));
        assert_eq!(
            output_path(Path::new("runs/60Co.gs"), "txt"),
            PathBuf::from("runs/60Co.gs.txt")
        );
    }
}
