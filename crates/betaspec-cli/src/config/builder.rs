use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::GenerateArgs;
use crate::error::{CliError, Result};
use betaspec::core::spectral::NuclearShape;
use betaspec::engine::config::{GeneratorConfigBuilder, SpectrumWindow, StepSpec};
use betaspec::engine::error::EngineError;
use std::path::PathBuf;
use std::str::FromStr;

/// Merges CLI flags, `--set` values, the config file and built-in defaults, in that order of
/// precedence.
pub fn build_config(args: &GenerateArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let spectrum_file = file_config.spectrum.take().unwrap_or_default();
    let begin = args
        .begin
        .or(spectrum_file.begin)
        .unwrap_or(defaults.begin_kev);
    let end = args.end.or(spectrum_file.end).unwrap_or(defaults.end_kev);

    let step = match (args.step.step_size, args.step.steps) {
        (Some(size), _) => StepSpec::Size(size),
        (None, Some(n)) => StepSpec::Count(n),
        (None, None) => match (spectrum_file.step_size, spectrum_file.steps) {
            (Some(_), Some(_)) => {
                return Err(CliError::Config(
                    "`spectrum` accepts either `step-size` or `steps`, not both".to_string(),
                ));
            }
            (Some(size), None) => StepSpec::Size(size),
            (None, Some(n)) => StepSpec::Count(n),
            (None, None) => StepSpec::Size(defaults.step_size_kev),
        },
    };

    let neutrino = match (args.neutrino.neutrino, args.neutrino.no_neutrino) {
        (true, false) => true,
        (false, true) => false,
        _ => spectrum_file.neutrino.unwrap_or(defaults.neutrino),
    };

    let corrections_file = file_config.corrections.take().unwrap_or_default();
    let advanced_file = file_config.advanced.take().unwrap_or_default();

    let mut builder = GeneratorConfigBuilder::new()
        .corrections(corrections_file.resolve())
        .isovector(corrections_file.isovector.unwrap_or(false))
        .ns_shape(advanced_file.ns_shape.unwrap_or(defaults.ns_shape))
        .es_shape(advanced_file.es_shape.unwrap_or(defaults.es_shape))
        .mod_gauss_fit(advanced_file.mod_gauss_fit.unwrap_or(defaults.mod_gauss_fit));
    if let Some(couplings) = &file_config.couplings {
        builder = builder.couplings(couplings.resolve()?);
    }
    if let Some(elements) = &file_config.matrix_elements {
        builder = builder.matrix_elements(elements.resolve()?);
    }
    if let Some(v_old) = advanced_file.v_old {
        builder = builder.v_old(v_old);
    }
    if let Some(v_new) = advanced_file.v_new {
        builder = builder.v_new(v_new);
    }
    let generator = builder.build().map_err(EngineError::from)?;

    let exchange_table = args
        .exchange_table
        .clone()
        .or(advanced_file.exchange_table);

    Ok(AppConfig {
        transition_path: args.transition.clone(),
        output_stem: args.output.clone(),
        exchange_table,
        window: SpectrumWindow::new(begin, end, step),
        neutrino,
        generator,
    })
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

fn parse_shape(key: &str, value: &str) -> Result<NuclearShape> {
    toml::Value::String(value.to_string())
        .try_into()
        .map_err(|_| CliError::Config(format!("Invalid shape for {}: {}", key, value)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let (section, field) = key.split_once('.').unwrap_or((key, ""));

        match (section, field) {
            ("spectrum", "begin") => {
                config.spectrum.get_or_insert_with(Default::default).begin =
                    Some(parse_value(key, value_str, "float")?);
            }
            ("spectrum", "end") => {
                config.spectrum.get_or_insert_with(Default::default).end =
                    Some(parse_value(key, value_str, "float")?);
            }
            ("spectrum", "step-size") => {
                let spectrum = config.spectrum.get_or_insert_with(Default::default);
                spectrum.step_size = Some(parse_value(key, value_str, "float")?);
                spectrum.steps = None;
            }
            ("spectrum", "steps") => {
                let spectrum = config.spectrum.get_or_insert_with(Default::default);
                spectrum.steps = Some(parse_value(key, value_str, "integer")?);
                spectrum.step_size = None;
            }
            ("spectrum", "neutrino") => {
                config.spectrum.get_or_insert_with(Default::default).neutrino =
                    Some(parse_value(key, value_str, "boolean")?);
            }
            ("corrections", toggle) => {
                let parsed = parse_value(key, value_str, "boolean")?;
                let corrections = config.corrections.get_or_insert_with(Default::default);
                match corrections.toggle_mut(toggle) {
                    Some(slot) => *slot = Some(parsed),
                    None => return Err(unsupported(key)),
                }
            }
            ("couplings", coupling) => {
                let parsed = Some(parse_value(key, value_str, "float")?);
                let couplings = config.couplings.get_or_insert_with(Default::default);
                match coupling {
                    "g-a" => couplings.g_a = parsed,
                    "g-p" => couplings.g_p = parsed,
                    "g-m" => couplings.g_m = parsed,
                    _ => return Err(unsupported(key)),
                }
            }
            ("matrix-elements", element) => {
                let parsed = Some(parse_value(key, value_str, "float")?);
                let elements = config.matrix_elements.get_or_insert_with(Default::default);
                match element {
                    "weak-magnetism" => elements.weak_magnetism = parsed,
                    "induced-tensor" => elements.induced_tensor = parsed,
                    "lambda" => elements.lambda = parsed,
                    _ => return Err(unsupported(key)),
                }
            }
            ("advanced", "ns-shape") => {
                config.advanced.get_or_insert_with(Default::default).ns_shape =
                    Some(parse_shape(key, value_str)?);
            }
            ("advanced", "es-shape") => {
                config.advanced.get_or_insert_with(Default::default).es_shape =
                    Some(parse_shape(key, value_str)?);
            }
            ("advanced", "mod-gauss-fit") => {
                config.advanced.get_or_insert_with(Default::default).mod_gauss_fit =
                    Some(parse_value(key, value_str, "float")?);
            }
            ("advanced", "exchange-table") => {
                config.advanced.get_or_insert_with(Default::default).exchange_table =
                    Some(PathBuf::from(value_str));
            }
            _ => return Err(unsupported(key)),
        }
    }
    Ok(config)
}

fn unsupported(key: &str) -> CliError {
    CliError::Config(format!("Unsupported configuration key for --set: '{}'", key))
}
