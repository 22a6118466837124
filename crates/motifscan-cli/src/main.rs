use clap::{Args, Parser, Subcommand};
use motifscan_lib::constants::{
    DEFAULT_DELETION_FRACTION, DEFAULT_NUM_PLOTTED_CLUSTERS, DEFAULT_NUM_VARIANTS,
    DEFAULT_PERTURBATION_RATE, DEFAULT_PLOT_CELL_SIZE, DEFAULT_SEED, DEFAULT_SEQUENCE_LENGTH,
    DEFAULT_THRESHOLD, DEFAULT_WEIGHT_CONTENT, DEFAULT_WEIGHT_POSITION,
};
use motifscan_lib::{
    io, plot_report, ClusterReport, CodonSet, DistanceWeights, Pipeline, PipelineConfiguration,
    PlotOptions, SymbolSequence,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "motifscan")]
#[command(version = "0.1.0")]
#[command(about = "motifscan: codon-bounded motif extraction and clustering", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a synthetic base sequence and perturbed variants
    Generate {
        /// Output folder for <id>.txt sequence files
        #[arg(short, long, default_value = "SYNTHETIC_DATA")]
        output: PathBuf,

        #[command(flatten)]
        synthetic: SyntheticArgs,
    },

    /// Dissect sequences into motif collections
    Dissect {
        /// Input sequence folder or file (.txt or FASTA/FASTQ)
        #[arg(short, long, default_value = "SYNTHETIC_DATA")]
        input: PathBuf,

        /// Output folder for <id>_analysis.json files
        #[arg(short, long, default_value = "ANALYZED_DATA")]
        output: PathBuf,

        #[command(flatten)]
        codons: CodonArgs,

        /// Number of threads (0 = all available cores)
        #[arg(short = 't', long, default_value = "0")]
        threads: usize,
    },

    /// Cluster previously dissected motif collections
    Cluster {
        /// Folder of <id>_analysis.json files
        #[arg(short, long, default_value = "ANALYZED_DATA")]
        input: PathBuf,

        /// Output folder for clusters.txt and clusters.json
        #[arg(short, long, default_value = "CLUSTERED_DATA")]
        output: PathBuf,

        #[command(flatten)]
        clustering: ClusterArgs,
    },

    /// Draw the top clusters of a report as PNG and SVG images
    Plot {
        /// Cluster report written by `cluster` or `run`
        #[arg(short, long, default_value = "CLUSTERED_DATA/clusters.json")]
        input: PathBuf,

        /// Output folder for cluster_<rank>.png/.svg
        #[arg(short, long, default_value = "CLUSTER_PLOTS")]
        output: PathBuf,

        /// Number of top-ranked clusters to draw
        #[arg(short = 'n', long, default_value_t = DEFAULT_NUM_PLOTTED_CLUSTERS)]
        num_clusters: usize,

        /// Edge length of one symbol cell in pixels
        #[arg(long, default_value_t = DEFAULT_PLOT_CELL_SIZE)]
        cell_size: u32,
    },

    /// Run dissection and clustering in one go
    Run {
        /// Input sequence folder or file; generates synthetic data when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output folder for the cluster report
        #[arg(short, long, default_value = "CLUSTERED_DATA")]
        output: PathBuf,

        /// Also write per-sequence motif collections to this folder
        #[arg(long)]
        analysis: Option<PathBuf>,

        #[command(flatten)]
        synthetic: SyntheticArgs,

        #[command(flatten)]
        codons: CodonArgs,

        #[command(flatten)]
        clustering: ClusterArgs,

        /// Number of threads (0 = all available cores)
        #[arg(short = 't', long, default_value = "0")]
        threads: usize,
    },
}

#[derive(Args)]
struct SyntheticArgs {
    /// Length of the base sequence
    #[arg(short = 'l', long, default_value_t = DEFAULT_SEQUENCE_LENGTH)]
    length: usize,

    /// Number of perturbed variants
    #[arg(short = 'n', long, default_value_t = DEFAULT_NUM_VARIANTS)]
    variants: usize,

    /// Per-symbol perturbation probability
    #[arg(short = 'p', long, default_value_t = DEFAULT_PERTURBATION_RATE)]
    perturbation: f64,

    /// Fraction of perturbations that delete the symbol
    #[arg(long, default_value_t = DEFAULT_DELETION_FRACTION)]
    deletion_fraction: f64,

    /// RNG seed
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    seed: u64,
}

#[derive(Args)]
struct CodonArgs {
    /// Start codons (comma-separated)
    #[arg(long, value_delimiter = ',', default_value = "ATG,ATA")]
    start_codons: Vec<String>,

    /// Stop codons (comma-separated)
    #[arg(long, value_delimiter = ',', default_value = "TGA,TAG,TAA")]
    stop_codons: Vec<String>,
}

#[derive(Args)]
struct ClusterArgs {
    /// Inclusive distance threshold
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f64,

    /// Weight of content mismatches
    #[arg(long, default_value_t = DEFAULT_WEIGHT_CONTENT)]
    weight_content: f64,

    /// Weight of the start-position offset
    #[arg(long, default_value_t = DEFAULT_WEIGHT_POSITION)]
    weight_position: f64,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing: use RUST_LOG if set, otherwise default to info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { output, synthetic } => {
            generate_command(&output, synthetic)?;
        }
        Commands::Dissect { input, output, codons, threads } => {
            dissect_command(&input, &output, codons, threads)?;
        }
        Commands::Cluster { input, output, clustering } => {
            cluster_command(&input, &output, clustering)?;
        }
        Commands::Plot { input, output, num_clusters, cell_size } => {
            plot_command(&input, &output, num_clusters, cell_size)?;
        }
        Commands::Run { input, output, analysis, synthetic, codons, clustering, threads } => {
            let config = build_config(Some(synthetic), Some(codons), Some(clustering), threads)?;
            run_command(input.as_deref(), &output, analysis.as_deref(), config)?;
        }
    }

    Ok(())
}

/// Assemble a validated configuration, keeping defaults for omitted groups
fn build_config(
    synthetic: Option<SyntheticArgs>,
    codons: Option<CodonArgs>,
    clustering: Option<ClusterArgs>,
    threads: usize,
) -> anyhow::Result<PipelineConfiguration> {
    let mut config = PipelineConfiguration { num_threads: threads, ..PipelineConfiguration::default() };

    if let Some(s) = synthetic {
        config.sequence_length = s.length;
        config.num_variants = s.variants;
        config.perturbation_rate = s.perturbation;
        config.deletion_fraction = s.deletion_fraction;
        config.seed = s.seed;
    }
    if let Some(c) = codons {
        config.codons = CodonSet::new(c.start_codons.as_slice(), c.stop_codons.as_slice())?;
    }
    if let Some(c) = clustering {
        config.weights = DistanceWeights::new(c.weight_content, c.weight_position)?;
        config.threshold = c.threshold;
    }

    config.validate()?;
    Ok(config)
}

/// Write synthetic sequences to a folder
fn generate_command(output: &Path, synthetic: SyntheticArgs) -> anyhow::Result<()> {
    let config = build_config(Some(synthetic), None, None, 0)?;
    let pipeline = Pipeline::new(config)?;

    let sequences = pipeline.generate()?;
    io::write_sequence_folder(output, &sequences)?;

    info!("Saved {} sequences to {}", sequences.len(), output.display());
    Ok(())
}

/// Dissect a sequence folder into per-sequence motif collections
fn dissect_command(input: &Path, output: &Path, codons: CodonArgs, threads: usize) -> anyhow::Result<()> {
    let config = build_config(None, Some(codons), None, threads)?;
    let pipeline = Pipeline::new(config)?;

    info!("Loading sequences from {}...", input.display());
    let sequences = io::read_sequences(input)?;
    info!("  Loaded {} sequences", sequences.len());

    let collections = pipeline.dissect_all(&sequences)?;
    io::write_collection_folder(output, &collections)?;

    info!("Sequence analysis complete. Results saved in {}", output.display());
    Ok(())
}

/// Cluster the motif collections of a folder and write the report
fn cluster_command(input: &Path, output: &Path, clustering: ClusterArgs) -> anyhow::Result<()> {
    let config = build_config(None, None, Some(clustering), 0)?;
    let pipeline = Pipeline::new(config)?;

    info!("Loading motif collections from {}...", input.display());
    let collections = io::read_collection_folder(input)?;
    let total: usize = collections.iter().map(|c| c.len()).sum();
    info!("  Loaded {} motifs from {} collections", total, collections.len());

    let clustering = pipeline.cluster_collections(&collections)?;
    let report = ClusterReport::from_clustering(&clustering);
    report.write_folder(output)?;

    print_summary(&report);
    Ok(())
}

/// Plot the top clusters of a saved report
fn plot_command(input: &Path, output: &Path, num_clusters: usize, cell_size: u32) -> anyhow::Result<()> {
    info!("Loading cluster report from {}...", input.display());
    let report = ClusterReport::read_json(input)?;

    let options = PlotOptions {
        num_clusters,
        cell_size,
        ..PlotOptions::default()
    };
    let written = plot_report(&report, output, &options)?;

    println!("\nPlots saved in {} ({} files)", output.display(), written.len());
    Ok(())
}

/// Full pipeline from sequences (or fresh synthetic data) to the report
fn run_command(
    input: Option<&Path>,
    output: &Path,
    analysis: Option<&Path>,
    config: PipelineConfiguration,
) -> anyhow::Result<()> {
    let pipeline = Pipeline::new(config)?;

    let sequences: Vec<SymbolSequence> = match input {
        Some(path) => {
            info!("Loading sequences from {}...", path.display());
            io::read_sequences(path)?
        }
        None => {
            info!("No input given, generating synthetic sequences");
            pipeline.generate()?
        }
    };

    let result = pipeline.run(&sequences)?;
    if let Some(folder) = analysis {
        io::write_collection_folder(folder, &result.collections)?;
        info!("Saved motif collections to {}", folder.display());
    }
    result.report.write_folder(output)?;

    print_summary(&result.report);
    Ok(())
}

fn print_summary(report: &ClusterReport) {
    if report.is_empty() {
        warn!("No motifs were found, so no clusters were formed");
        println!("\nNo clusters");
        return;
    }

    let members: usize = report.clusters.iter().map(|c| c.num_entries).sum();
    println!("\nResults:");
    println!("  Clusters: {}", report.len());
    println!("  Motifs: {}", members);
    for summary in report.clusters.iter().take(5) {
        println!(
            "  #{}: {} entries (avg distance {:.2})",
            summary.rank, summary.num_entries, summary.avg_distance
        );
    }
    if report.len() > 5 {
        println!("  ... ({} more)", report.len() - 5);
    }
}
