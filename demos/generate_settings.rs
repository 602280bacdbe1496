//! Write the default analyzer settings as JSON, ready for editing

use banana_scan::Settings;
use std::{env, path::Path, process};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <output_settings.json>", args[0]);
        process::exit(1);
    }

    let output_path = Path::new(&args[1]);
    if let Some(parent) = output_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Error creating directory: {}", e);
            process::exit(1);
        }
    }

    let settings = Settings::default();
    match settings.to_json_file(output_path) {
        Ok(()) => {
            eprintln!("Settings saved to {}", output_path.display());
            eprintln!();
            eprintln!("Settings summary:");
            eprintln!("  Match score: <= {}", settings.match_max_score);
            eprintln!("  Area: {:.0} - {:.0} px²", settings.min_area, settings.max_area);
            eprintln!("  Calibration: {} px/m", settings.pixels_per_meter);
            eprintln!("  Fit failure policy: {:?}", settings.fit_failure_policy);
        }
        Err(e) => {
            eprintln!("Error saving settings: {}", e);
            process::exit(1);
        }
    }
}
