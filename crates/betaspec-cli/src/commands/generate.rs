use crate::cli::GenerateArgs;
use crate::config::{AppConfig, build_config};
use crate::error::Result;
use crate::report;
use crate::utils::progress::CliProgressHandler;
use betaspec::core::io::exchange::ExchangeTable;
use betaspec::core::transition::TransitionOptions;
use betaspec::engine::progress::ProgressReporter;
use betaspec::engine::trace::{TableTraceWriter, TraceSink};
use betaspec::workflows;
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing::{info, warn};

pub fn run(args: GenerateArgs, quiet: bool) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app = build_config(&args)?;
    let handler = CliProgressHandler::new(quiet);
    execute(&app, &handler)
}

pub(crate) fn execute(app: &AppConfig, handler: &CliProgressHandler) -> Result<()> {
    info!("Loading transition from {:?}", &app.transition_path);
    let options = TransitionOptions::load(&app.transition_path)?;

    let exchange = match &app.exchange_table {
        Some(path) => {
            info!("Loading exchange coefficients from {:?}", path);
            Some(ExchangeTable::load(path)?)
        }
        None => None,
    };

    if let Some(parent) = app.output_stem.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let raw_path = report::output_path(&app.output_stem, "raw");
    let mut trace = TableTraceWriter::create(&raw_path)?;

    let reporter = ProgressReporter::with_callback(handler.get_callback());
    println!("Generating spectrum for {}...", options.label());

    let result = match workflows::generate::run(
        &options,
        &app.generator,
        &app.window,
        exchange.as_ref(),
        &mut trace,
        &reporter,
    ) {
        Ok(result) => result,
        Err(e) => {
            drop(trace);
            if let Err(remove_err) = std::fs::remove_file(&raw_path) {
                warn!("Could not remove incomplete trace {:?}: {}", raw_path, remove_err);
            }
            return Err(e.into());
        }
    };
    trace.flush()?;

    info!(
        points = result.spectrum.len(),
        "Workflow finished, writing summary."
    );
    if result.spectrum.is_empty() {
        warn!("The requested window does not overlap the spectrum; no points were generated.");
        println!("Warning: the requested window lies outside the spectrum.");
    }

    let txt_path = report::output_path(&app.output_stem, "txt");
    let mut summary = BufWriter::new(File::create(&txt_path)?);
    report::write_summary(&mut summary, &options, app, &result)?;
    summary.flush()?;

    if let Some(obs) = &result.observables {
        let label = if obs.halflife_given { "log ft" } else { "log f" };
        println!("✓ {} = {:.4}, mean energy {:.2} keV", label, obs.log_ft, obs.mean_kinetic_energy_kev);
    }
    println!(
        "✓ Spectrum ({} points) written to: {} and {}",
        result.spectrum.len(),
        raw_path.display(),
        txt_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{NeutrinoOutput, StepOverride};
    use crate::error::CliError;
    use betaspec::engine::error::EngineError;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    const COBALT_60: &str = r#"
        [transition]
        process = "beta-minus"
        type = "gamow-teller"
        q-value = 2823.07
        partial-halflife = 1.6634e8
        log-ft = 7.512

        [mother]
        z = 27
        a = 60
        spin-parity = 10

        [daughter]
        z = 28
        a = 60
        spin-parity = 8
        excitation-energy = 2505.753
        radius = 3.8118
    "#;

    const PHYSICAL_CONFIG: &str = r#"
        [couplings]
        g-a = 1.2754
        g-p = 0.0
        g-m = 4.706

        [matrix-elements]
        weak-magnetism = 5.0
        induced-tensor = 0.0
        lambda = 0.0
    "#;

    fn args_in(dir: &Path, config: Option<PathBuf>) -> GenerateArgs {
        let transition = dir.join("co60.toml");
        fs::write(&transition, COBALT_60).unwrap();
        GenerateArgs {
            transition,
            config,
            output: dir.join("out").join("co60"),
            begin: None,
            end: None,
            step: StepOverride {
                step_size: None,
                steps: Some(100),
            },
            neutrino: NeutrinoOutput::default(),
            exchange_table: None,
            set_values: vec![],
        }
    }

    #[test]
    fn generate_writes_trace_and_summary() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("config.toml");
        fs::write(&config, PHYSICAL_CONFIG).unwrap();
        let args = args_in(dir.path(), Some(config));

        let app = build_config(&args).unwrap();
        execute(&app, &CliProgressHandler::new(true)).unwrap();

        let raw = fs::read_to_string(dir.path().join("out/co60.raw")).unwrap();
        let rows: Vec<&str> = raw.lines().collect();
        assert_eq!(rows.len(), 101);
        assert_eq!(rows[0].split('\t').count(), 4);

        let summary = fs::read_to_string(dir.path().join("out/co60.txt")).unwrap();
        assert!(summary.contains("Transition from 60Co"));
        assert!(summary.contains("Calculated log ft value"));
        assert!(summary.contains("Ratio of calculated/external ft value"));
        assert!(summary.contains("dN_v/dW"));
    }

    #[test]
    fn generate_without_matrix_elements_fails_before_writing_points() {
        let dir = tempdir().unwrap();
        let args = args_in(dir.path(), None);
        let app = build_config(&args).unwrap();

        let result = execute(&app, &CliProgressHandler::new(true));
        assert!(matches!(result, Err(CliError::Engine(_))));
        assert!(!dir.path().join("out/co60.raw").exists());
        assert!(!dir.path().join("out/co60.txt").exists());
    }

    #[test]
    fn invalid_transition_leaves_no_output_behind() {
        let dir = tempdir().unwrap();
        let mut args = args_in(dir.path(), None);
        let transition = dir.path().join("co60-wrong-daughter.toml");
        fs::write(&transition, COBALT_60.replace("z = 28", "z = 29")).unwrap();
        args.transition = transition;
        args.set_values = vec!["corrections.shape-factor=false".to_string()];
        let app = build_config(&args).unwrap();

        let result = execute(&app, &CliProgressHandler::new(true));
        assert!(matches!(
            result,
            Err(CliError::Engine(EngineError::InvalidTransition(_)))
        ));
        assert!(!dir.path().join("out/co60.raw").exists());
        assert!(!dir.path().join("out/co60.txt").exists());
    }

    #[test]
    fn missing_transition_file_is_reported() {
        let dir = tempdir().unwrap();
        let mut args = args_in(dir.path(), None);
        args.transition = dir.path().join("missing.toml");
        args.set_values = vec!["corrections.shape-factor=false".to_string()];
        let app = build_config(&args).unwrap();

        let result = execute(&app, &CliProgressHandler::new(true));
        assert!(matches!(result, Err(CliError::Transition(_))));
    }
}
