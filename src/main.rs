//! Gray encoder CLI - Validate, generate, and optimize encoder disks from JSON configuration.

use std::path::Path;
use std::time::Instant;

use serde::Serialize;

use gray_encoder::{
    compute::{assembly_info, validate_assembly},
    export_pattern_data, generate, optimize_with_progress,
    schema::{EncoderConfig, OptimizationArtifact, Preset, PrinterProfile},
    validate_parameters,
};

fn print_usage(program: &str) {
    eprintln!("Usage: {} <command> [config.json] [options]", program);
    eprintln!();
    eprintln!("Gray-code optical encoder disk generator.");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  validate [config.json]                 Check parameters for manufacturability");
    eprintln!("  generate [config.json] [--no-bumpers]  Print disk geometry");
    eprintln!("  patterns [config.json]                 Print Gray code track patterns");
    eprintln!("  optimize [config.json]                 Run the layout optimizer, print artifact");
    eprintln!("  apply <config.json> <artifact.json>    Print config with artifact merged");
    eprintln!("  example                                Print the default configuration");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --preset <default|high_resolution|compact>  Use preset disk parameters");
    eprintln!("  --printer <standard|fine_line>              Use a built-in printer profile");
    eprintln!();
    eprintln!("Set RUST_LOG=info to see optimizer progress.");
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "example" => print_json(&EncoderConfig::default()),
        "validate" => {
            let config = load_config(rest);
            let report = validate_parameters(&config.parameters);
            print_json(&report);
            if !report.valid {
                std::process::exit(2);
            }
        }
        "generate" => {
            let config = load_config(rest);
            let include_bumpers = !rest.iter().any(|a| a == "--no-bumpers");
            let geometry = generate(&config.parameters, include_bumpers).unwrap_or_else(|e| {
                eprintln!("Error generating geometry: {}", e);
                std::process::exit(1);
            });

            let report = validate_assembly(&geometry);
            for issue in &report.issues {
                eprintln!("Warning: {}", issue);
            }
            let info = assembly_info(&geometry, &config.parameters);
            eprintln!(
                "Disk: {} tracks, {} cutouts, {:.1}% open",
                info.num_tracks,
                info.num_cutouts,
                info.open_fraction * 100.0
            );
            print_json(&geometry);
        }
        "patterns" => {
            let config = load_config(rest);
            let export = export_pattern_data(&config.parameters).unwrap_or_else(|e| {
                eprintln!("Error exporting patterns: {}", e);
                std::process::exit(1);
            });
            print_json(&export);
        }
        "optimize" => {
            let config = load_config(rest);
            let start = Instant::now();
            let result = optimize_with_progress(
                config.evolution.clone(),
                config.parameters.clone(),
                |progress| {
                    eprintln!(
                        "  Generation {}/{}: best={:.4}, avg={:.4}, valid={}",
                        progress.generation + 1,
                        progress.total_generations,
                        progress.best_fitness,
                        progress.avg_fitness,
                        progress.valid_count
                    );
                },
            )
            .unwrap_or_else(|e| {
                eprintln!("Error running optimizer: {}", e);
                std::process::exit(1);
            });

            eprintln!(
                "Best fitness {:.4} from generation {} ({:.2}s)",
                result.best_report.total,
                result.best_generation + 1,
                start.elapsed().as_secs_f32()
            );
            print_json(&OptimizationArtifact::from_result(&result, config.version));
        }
        "apply" => {
            let (Some(config_path), Some(artifact_path)) = (rest.first(), rest.get(1)) else {
                print_usage(&args[0]);
                std::process::exit(1);
            };
            let config = read_config(Path::new(config_path));
            let artifact = OptimizationArtifact::load(artifact_path).unwrap_or_else(|e| {
                eprintln!("Error loading artifact: {}", e);
                std::process::exit(1);
            });
            let merged = config.apply_artifact(&artifact).unwrap_or_else(|e| {
                eprintln!("Error applying artifact: {}", e);
                std::process::exit(1);
            });
            print_json(&merged);
        }
        _ => {
            print_usage(&args[0]);
            std::process::exit(1);
        }
    }
}

/// Config from the first positional argument (or defaults), with
/// `--preset` and `--printer` overrides applied.
fn load_config(args: &[String]) -> EncoderConfig {
    let mut positional = Vec::new();
    let mut preset = None;
    let mut printer = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--preset" => preset = iter.next(),
            "--printer" => printer = iter.next(),
            "--no-bumpers" => {}
            _ => positional.push(arg),
        }
    }

    let mut config = match positional.first() {
        Some(path) => read_config(Path::new(path)),
        None => EncoderConfig::default(),
    };

    if let Some(name) = preset {
        let preset: Preset = serde_json::from_value(serde_json::Value::String(name.clone()))
            .unwrap_or_else(|_| {
                eprintln!("Unknown preset: {}", name);
                std::process::exit(1);
            });
        config.parameters = Preset::parameters(preset);
    }

    if let Some(name) = printer {
        config.parameters.printer = PrinterProfile::by_name(name).unwrap_or_else(|| {
            eprintln!("Unknown printer profile: {}", name);
            std::process::exit(1);
        });
    }

    config
}

fn read_config(path: &Path) -> EncoderConfig {
    EncoderConfig::load(path).unwrap_or_else(|e| {
        eprintln!("Error loading config {}: {}", path.display(), e);
        std::process::exit(1);
    })
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            std::process::exit(1);
        }
    }
}
