// SPDX-License-Identifier: Apache-2.0

//! Runs every generator-vs-reference check and prints the reports.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rayon::ThreadPoolBuilder;

use hqgen::checks::{CheckOptions, run_all_checks};
use hqgen::generator::generate;
use hqgen::minimize::analyze_case_function;
use hqgen::pixel_expr::{PixelExprTable, Scale};
use hqgen::reference::{DirReferenceSource, ReferenceSource};

#[derive(Debug, Parser)]
#[command(name = "hqgen")]
#[command(about = "Generate hq upscaler weight tables and verify them against references")]
struct Args {
    /// Directory holding reference tables named hq2x.json, hq3x.json and
    /// hq4x.json. Checks whose reference is missing are skipped.
    #[arg(long)]
    reference_dir: Option<PathBuf>,

    /// Write the generated full tables to this directory.
    #[arg(long)]
    write_generated: Option<PathBuf>,

    /// Print which edges influence each quadrant weight of every reference.
    #[arg(long)]
    relevant_edges: bool,

    /// Print the minimized case patterns of the generated table for this
    /// scale instead of running the checks.
    #[arg(long, value_enum)]
    analyze: Option<Scale>,

    /// Number of rayon worker threads to use (defaults to rayon's global
    /// default).
    #[arg(long)]
    threads: Option<usize>,

    /// Exit with a failure status when any check reports mismatches.
    #[arg(long)]
    deny_mismatches: bool,
}

fn analyze(scale: Scale) -> anyhow::Result<()> {
    let quadrant = generate(scale)?;
    for sub_pixel in 0..quadrant.sub_pixel_count() {
        println!("Sub-pixel {} of the {} quadrant:", sub_pixel, scale);
        for summary in analyze_case_function(&quadrant.sub_pixel_column(sub_pixel))? {
            print!("{}", summary);
        }
        println!();
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if let Some(n) = args.threads {
        ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .context("configuring rayon thread pool")?;
    }
    log::info!("hqgen: rayon threads={}", rayon::current_num_threads());

    if let Some(scale) = args.analyze {
        return analyze(scale);
    }

    let no_references: BTreeMap<Scale, PixelExprTable> = BTreeMap::new();
    let dir_source = args.reference_dir.clone().map(DirReferenceSource::new);
    let source: &dyn ReferenceSource = match &dir_source {
        Some(dir) => dir,
        None => &no_references,
    };
    let options = CheckOptions {
        relevant_edges: args.relevant_edges,
        write_generated: args.write_generated.clone(),
    };
    let summary = run_all_checks(source, &options).context("running checks")?;
    print!("{}", summary);

    let mismatches = summary.total_mismatches();
    if args.deny_mismatches && mismatches > 0 {
        anyhow::bail!("{} mismatching case(s)", mismatches);
    }
    Ok(())
}
