use clap::Parser;
use part_merge::engine::inventory::NamingScheme;
use part_merge::engine::merge::tool_from_config;
use part_merge::engine::partition::StrategyKind;
use part_merge::engine::pipeline::{RunOptions, run};
use part_merge::engine::validate::counter_from_config;
use part_merge::logging;
use part_merge::shared::config::{Settings, load_settings};
use part_merge::shared::size::format_bytes;
use tracing::info;

/// Merges per-job output files from the current directory into a few
/// size-balanced parts, then checks that no entries were lost.
///
/// Files are merged in blocks of at most --max-files-to-merge inputs; the
/// blocks of each part are merged afterwards. Final files land in --out-dir.
#[derive(Parser, Debug)]
#[command(name = "part_merge", version)]
#[command(about = "Merge job outputs into size-balanced parts", long_about)]
struct Args {
    /// Regular expression selecting input files (whole-name match, no slashes)
    #[arg(short, long)]
    mask: Option<String>,

    /// Target size of one output part, GiB
    #[arg(short, long)]
    size: Option<f64>,

    /// Output directory; created if it does not exist
    #[arg(short, long)]
    out_dir: Option<String>,

    /// Directory searched for input files
    #[arg(short, long)]
    input_dir: Option<String>,

    /// Number of concurrent merge jobs
    #[arg(short, long)]
    num_threads: Option<usize>,

    /// Maximal number of files passed to one merge tool invocation
    #[arg(long)]
    max_files_to_merge: Option<usize>,

    /// Collection whose entries are counted to validate the merge
    #[arg(short, long)]
    tree_name: Option<String>,

    /// Keep intermediate block files and the work directory
    #[arg(short = 'd', long)]
    keep_tmp_files: bool,

    /// How files are grouped into parts
    #[arg(long, value_enum)]
    strategy: Option<StrategyKind>,

    /// How sequence indices are parsed from file names
    #[arg(long, value_enum)]
    naming: Option<NamingScheme>,

    /// Configuration file (TOML); overrides PART_MERGE_CONFIG
    #[arg(short, long)]
    config: Option<String>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

impl Args {
    fn merge_into(&self, settings: &mut Settings) {
        let m = &mut settings.merge;
        if let Some(mask) = &self.mask {
            m.mask = mask.clone();
        }
        if let Some(size) = self.size {
            m.target_size_gib = size;
        }
        if let Some(dir) = &self.out_dir {
            m.out_dir = dir.clone();
        }
        if let Some(dir) = &self.input_dir {
            m.input_dir = dir.clone();
        }
        if let Some(n) = self.num_threads {
            m.num_threads = n;
        }
        if let Some(n) = self.max_files_to_merge {
            m.max_files_to_merge = n;
        }
        if let Some(tree) = &self.tree_name {
            m.tree_name = tree.clone();
        }
        if self.keep_tmp_files {
            m.keep_tmp_files = true;
        }
        if let Some(strategy) = self.strategy {
            m.strategy = strategy;
        }
        if let Some(naming) = self.naming {
            m.naming = naming;
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    args.merge_into(&mut settings);

    if args.print_config {
        print!("{}", settings.to_toml()?);
        return Ok(());
    }

    settings.validate()?;
    let _log_guard = logging::init(&settings.logging)?;

    let options = RunOptions::from_config(&settings.merge);
    info!(
        target: "part_merge::main",
        input_dir = %options.input_dir.display(),
        out_dir = %options.out_dir.display(),
        target = %format_bytes(options.target_part_size),
        threads = options.num_threads,
        "Starting merge"
    );

    let tool = tool_from_config(&settings.tool);
    let counter = counter_from_config(&settings.counter);

    let report = match run(&options, tool, counter) {
        Ok(report) => report,
        Err(e) => {
            e.log_error();
            return Err(e.into());
        }
    };

    println!("Results of all jobs have been merged into the following files:");
    for output in &report.outputs {
        println!("  {}", output.display());
    }
    if let Some(dir) = &report.kept_work_dir {
        println!("Temporary files kept in {}", dir.display());
    }
    println!(
        "Total number of entries in these files: {}",
        report.total_entries
    );

    Ok(())
}
