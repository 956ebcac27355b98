use anyhow::{Context, Result};
use binpack_core::{
    validate_result, Algorithm, Optimization, Optimizer, PackRequest, PackResult,
};
use clap::{Parser, Subcommand};
use colored::*;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "binpack")]
#[command(about = "Sheet packing for CNC cut lists", long_about = None)]
struct Cli {
    /// Print packing decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack a cut list onto stock sheets
    Pack {
        /// Cut list file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for result (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Placement algorithm: guillotine or maxrects
        #[arg(short, long)]
        algorithm: Option<Algorithm>,

        /// Keep every panel in its listed orientation
        #[arg(long)]
        no_rotation: bool,

        /// Saw kerf added around every panel
        #[arg(short, long)]
        padding: Option<f64>,

        /// Sheets in stock; panels beyond them are reported as unpacked
        #[arg(long)]
        max_sheets: Option<u32>,
    },

    /// Check a packing result for overlaps and out-of-bounds panels
    Validate {
        /// Result file (JSON) written by `pack`
        #[arg(short, long)]
        input: PathBuf,

        /// Kerf to check against; defaults to the one stored in the result
        #[arg(short, long)]
        padding: Option<f64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Pack {
            input,
            output,
            algorithm,
            no_rotation,
            padding,
            max_sheets,
        } => {
            pack_command(input, output, algorithm, no_rotation, padding, max_sheets)?;
        }
        Commands::Validate { input, padding } => {
            validate_command(input, padding)?;
        }
    }

    Ok(())
}

/// Reads YAML or JSON depending on the file extension.
fn read_input<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let parsed = match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
        _ => serde_json::from_str(&content)?,
    };

    Ok(parsed)
}

fn pack_command(
    input: PathBuf,
    output: Option<PathBuf>,
    algorithm: Option<Algorithm>,
    no_rotation: bool,
    padding: Option<f64>,
    max_sheets: Option<u32>,
) -> Result<()> {
    println!("{}", "🔍 Loading cut list...".bright_blue());

    let mut request: PackRequest = read_input(&input)?;
    if let Some(algorithm) = algorithm {
        request.options.algorithm = algorithm;
    }
    if no_rotation {
        request.options.allow_rotation = false;
    }
    if let Some(padding) = padding {
        request.options.padding = padding;
    }
    if max_sheets.is_some() {
        request.max_sheets = max_sheets;
    }

    let panel_count: u32 = request.panels.iter().map(|p| p.quantity).sum();
    println!(
        "  {} panels to cut",
        panel_count.to_string().bright_white().bold()
    );
    println!(
        "  Sheet {} x {}, kerf {}",
        request.sheet_width, request.sheet_height, request.options.padding
    );
    println!();

    println!("{}", "🚀 Packing...".bright_blue());

    let optimizer = Optimizer::new(request)?;
    let result = optimizer.optimize();

    println!();
    println!("{}", "✅ Packing complete!".bright_green().bold());
    println!();

    print_summary(&result);

    let json = serde_json::to_string_pretty(&result)?;
    if let Some(output_path) = output {
        std::fs::write(&output_path, json)?;
        println!(
            "💾 Saved result to {}",
            output_path.display().to_string().bright_white()
        );
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn print_summary(result: &Optimization) {
    println!("{}", "📊 Results:".bright_yellow().bold());
    for (idx, bin) in result.result.bins.iter().enumerate() {
        println!(
            "    • Sheet {}: {} panels, {:.1}% used",
            (idx + 1).to_string().bright_white(),
            bin.rects.len(),
            bin.efficiency
        );
    }
    println!();
    println!(
        "  Total sheets: {}",
        result.summary.total_sheets.to_string().bright_white().bold()
    );
    println!("  Total waste: {:.1}%", result.summary.waste_percentage);

    if !result.result.unpacked.is_empty() {
        println!();
        println!(
            "  {}",
            "Panels larger than the sheet:".bright_red().bold()
        );
        for panel in &result.result.unpacked {
            println!(
                "    • {} ({} x {})",
                panel.id.as_deref().unwrap_or("?").bright_red(),
                panel.width,
                panel.height
            );
        }
    }

    println!();
}

/// Loads either the full output of `pack` or a bare layout. Only the former
/// carries the kerf it was packed with.
fn load_result(path: &Path) -> Result<(PackResult, Option<f64>)> {
    let value: serde_json::Value = read_input(path)?;

    if value.get("options").is_some() || value.get("summary").is_some() {
        let optimization: Optimization = serde_json::from_value(value)
            .with_context(|| format!("Invalid packing result in {}", path.display()))?;
        Ok((optimization.result, Some(optimization.options.padding)))
    } else {
        let result: PackResult = serde_json::from_value(value)
            .with_context(|| format!("Invalid layout in {}", path.display()))?;
        Ok((result, None))
    }
}

fn validate_command(input: PathBuf, padding: Option<f64>) -> Result<()> {
    println!("{}", "🔍 Loading result...".bright_blue());

    let (result, stored_padding) = load_result(&input)?;
    let padding = padding
        .or(stored_padding)
        .context("Result carries no kerf, pass --padding")?;

    let report = validate_result(&result, padding);
    println!();
    print!("{}", report.render());

    if report.valid {
        println!("{}", "✅ Layout is valid".bright_green().bold());
        Ok(())
    } else {
        anyhow::bail!("{} placement issue(s) found", report.issues.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write_temp(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("binpack-{}-{}", std::process::id(), name));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_result_reports_broken_optimization() {
        let path = write_temp(
            "no-summary.json",
            &json!({
                "sheet_width": 200,
                "sheet_height": 200,
                "options": { "algorithm": "maxrects", "allow_rotation": true, "padding": 3 },
                "bins": []
            })
            .to_string(),
        );

        let err = load_result(&path).unwrap_err();
        let message = format!("{:#}", err);
        std::fs::remove_file(&path).ok();

        assert!(message.contains("Invalid packing result"), "{}", message);
        assert!(message.contains("summary"), "{}", message);
    }

    #[test]
    fn test_load_result_accepts_bare_layout() {
        let path = write_temp(
            "bare.yaml",
            "bins:\n  - width: 200\n    height: 200\n    rects: []\n    free_rects: []\n    \
             used_area: 0\n    efficiency: 0\n",
        );

        let (result, padding) = load_result(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(result.bins.len(), 1);
        assert!(result.unpacked.is_empty());
        assert_eq!(padding, None);
    }

    #[test]
    fn test_load_result_keeps_packing_kerf() {
        let request: PackRequest = serde_json::from_value(json!({
            "sheet_width": 200,
            "sheet_height": 200,
            "padding": 4.5,
            "panels": [{ "id": "shelf", "width": 100, "height": 50 }]
        }))
        .unwrap();
        let optimization = Optimizer::new(request).unwrap().optimize();
        let path = write_temp("packed.json", &serde_json::to_string(&optimization).unwrap());

        let (result, padding) = load_result(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(result, optimization.result);
        assert_eq!(padding, Some(4.5));
    }
}
