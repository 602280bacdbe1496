//! Command-line interface for banana_scan
//!
//! Analyzes one image file, prints the report and optionally writes the
//! annotated image. Set `RUST_LOG=banana_scan=debug` to follow the pipeline.

use std::{
    env,
    path::{Path, PathBuf},
    process,
};

use banana_scan::{
    detection::ReferenceShape, image_loader::load_image, AnnotatedAnalysisResult, Analyzer,
    Settings,
};
use opencv::imgcodecs;
use tracing_subscriber::EnvFilter;

#[derive(Default)]
struct Options {
    image_path: Option<PathBuf>,
    settings_path: Option<PathBuf>,
    reference_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    json: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let options = parse_args(&args);

    let image_path = match options.image_path {
        Some(path) => path,
        None => {
            print_help(&args[0]);
            process::exit(1);
        }
    };

    let settings = match &options.settings_path {
        Some(path) => Settings::from_json_file(path).unwrap_or_else(|e| exit_setup(e)),
        None => Settings::default(),
    };
    let analyzer = match &options.reference_path {
        Some(path) => ReferenceShape::from_json_file(path)
            .and_then(|reference| Analyzer::with_reference(settings, reference)),
        None => Analyzer::new(settings),
    }
    .unwrap_or_else(|e| exit_setup(e));

    let result = load_image(&image_path)
        .and_then(|image| analyzer.analyze_and_annotate_image(&image))
        .unwrap_or_else(|error| {
            eprintln!("Analysis failed: {}", error);
            eprintln!("Suggestion: {}", error.user_message());
            process::exit(1);
        });

    print_result(&result, options.json);

    if let Some(output_path) = options.output_path {
        save_annotated(&result, &output_path);
    }
}

fn parse_args(args: &[String]) -> Options {
    let mut options = Options::default();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--settings" => options.settings_path = Some(value_of(args, &mut i)),
            "--reference" => options.reference_path = Some(value_of(args, &mut i)),
            "--output" => options.output_path = Some(value_of(args, &mut i)),
            "--json" => options.json = true,
            "--help" | "-h" => {
                print_help(&args[0]);
                process::exit(0);
            }
            arg if !arg.starts_with("--") => {
                if options.image_path.is_some() {
                    eprintln!("Error: Multiple image paths provided");
                    process::exit(1);
                }
                options.image_path = Some(PathBuf::from(arg));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                eprintln!("Use --help for usage information");
                process::exit(1);
            }
        }
        i += 1;
    }
    options
}

fn value_of(args: &[String], i: &mut usize) -> PathBuf {
    let flag = &args[*i];
    *i += 1;
    match args.get(*i) {
        Some(value) => PathBuf::from(value),
        None => {
            eprintln!("Error: {} needs a path", flag);
            process::exit(1);
        }
    }
}

fn exit_setup(error: banana_scan::SetupError) -> ! {
    eprintln!("Setup failed: {}", error);
    eprintln!("Suggestion: {}", error.user_message());
    process::exit(2);
}

fn print_help(program_name: &str) {
    eprintln!("Usage: {} [OPTIONS] <image_path>", program_name);
    eprintln!();
    eprintln!("Find bananas in an image and measure curvature, length and ripeness.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --settings <json>   Load settings (missing fields use defaults)");
    eprintln!("  --reference <json>  Match against a custom reference banana");
    eprintln!("  --output <image>    Write the annotated image");
    eprintln!("  --json              Print the reports as JSON instead of text");
    eprintln!("  --help, -h          Show this help message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} bananas.jpg", program_name);
    eprintln!("  {} --json --output annotated.png bananas.jpg", program_name);
}

fn print_result(result: &AnnotatedAnalysisResult, json: bool) {
    if !json {
        print!("{}", result);
        return;
    }
    match serde_json::to_string_pretty(&result.reports()) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing result: {}", e);
            process::exit(1);
        }
    }
}

fn save_annotated(result: &AnnotatedAnalysisResult, output_path: &Path) {
    let Some(path) = output_path.to_str() else {
        eprintln!("Warning: Output path is not valid UTF-8: {}", output_path.display());
        return;
    };
    match imgcodecs::imwrite_def(path, &result.annotated_image) {
        Ok(true) => eprintln!("Saved annotated image to {}", output_path.display()),
        Ok(false) => eprintln!("Warning: No encoder for {}", output_path.display()),
        Err(e) => eprintln!("Warning: Failed to save annotated image: {}", e),
    }
}
