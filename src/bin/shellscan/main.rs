//! Shellscan CLI - flags STL files made of more than one shell.
//!
//! Usage: shellscan [OPTIONS] [DIR]
//!        shellscan info <INPUT>
//!
//! Run `shellscan --help` for available options.

use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;

use shellscan::algo::{classify_with_options, Connectivity, FaceAdjacency, ShellOptions};
use shellscan::io;
use shellscan::mesh::TriangleMesh;
use shellscan::prompt::{ExitCountdown, StdinSignal};
use shellscan::scan::report::ReportStyle;
use shellscan::scan::{self, FileOutcome, ScanListener, ScanOptions, DEFAULT_QUARANTINE_DIR};

#[derive(Parser)]
#[command(name = "shellscan")]
#[command(
    author,
    version,
    about = "Count disconnected shells in binary STL files",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    scan: ScanArgs,

    /// Log scan progress to stderr (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Display shell and edge information for one mesh
    Info {
        /// Input mesh file
        input: PathBuf,

        /// Adjacency used to group faces into shells
        #[arg(short, long, value_enum, default_value = "edge")]
        connectivity: ConnectivityArg,
    },
}

#[derive(Args)]
struct ScanArgs {
    /// Directory to scan (not recursive)
    #[arg(default_value = ".")]
    dir: PathBuf,

    /// Keep directory order instead of sorting by file name
    #[arg(long)]
    no_sort: bool,

    /// Move files with more than one shell into this sub-folder
    #[arg(
        long,
        value_name = "NAME",
        num_args = 0..=1,
        default_missing_value = DEFAULT_QUARANTINE_DIR
    )]
    quarantine: Option<PathBuf>,

    /// Adjacency used to group faces into shells
    #[arg(short, long, value_enum, default_value = "edge")]
    connectivity: ConnectivityArg,

    /// Load and analyze files on all cores
    #[arg(long)]
    parallel: bool,

    /// Seconds to keep the window open after the report (0 disables)
    #[arg(long, value_name = "SECS", default_value = "10")]
    exit_delay: u64,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ConnectivityArg {
    /// Faces sharing an edge belong to the same shell
    Edge,
    /// Faces sharing a vertex belong to the same shell
    Vertex,
}

impl From<ConnectivityArg> for Connectivity {
    fn from(arg: ConnectivityArg) -> Self {
        match arg {
            ConnectivityArg::Edge => Connectivity::Edge,
            ConnectivityArg::Vertex => Connectivity::Vertex,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr so the report on stdout stays clean.
fn init_logging(verbose: bool) {
    let default_directive: Directive = if verbose {
        "shellscan=debug".parse().unwrap_or_else(|_| LevelFilter::DEBUG.into())
    } else {
        LevelFilter::WARN.into()
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_directive)
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Some(Commands::Info {
            input,
            connectivity,
        }) => cmd_info(&input, connectivity.into()),
        None => cmd_scan(cli.scan),
    }
}

fn cmd_scan(args: ScanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let color = !args.no_color && std::io::stdout().is_terminal();
    let style = ReportStyle::default().with_color(color);

    let mut options = ScanOptions::default()
        .with_sort(!args.no_sort)
        .with_connectivity(args.connectivity.into())
        .with_parallel(args.parallel);
    if let Some(folder) = args.quarantine {
        options = options.with_quarantine(folder);
    }

    println!();
    println!("{}", style.banner("SHELL SCAN"));
    println!();

    let line_style = style.clone();
    let listener = ScanListener::new(move |report| {
        let line = line_style.file_line(report);
        if matches!(report.outcome, FileOutcome::Failed(_)) {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    });

    let summary = scan::scan_directory(&args.dir, &options, &listener)?;

    for line in style.summary_lines(&summary, &options) {
        println!("{}", line);
    }
    println!();

    if args.exit_delay > 0 && std::io::stdin().is_terminal() && std::io::stdout().is_terminal() {
        let mut signal = StdinSignal::spawn();
        let countdown = ExitCountdown::new(args.exit_delay);
        countdown.run(&mut signal, |remaining| {
            print!("\r{}", style.countdown_line(remaining));
            let _ = std::io::stdout().flush();
        });
        println!();
    }

    Ok(())
}

fn cmd_info(input: &Path, connectivity: Connectivity) -> Result<(), Box<dyn std::error::Error>> {
    let mesh: TriangleMesh = io::load(input)?;

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!("Faces: {}", mesh.num_faces());

    if mesh.is_empty() {
        println!("Not a valid mesh (no faces)");
        return Ok(());
    }

    let degenerate = mesh.face_ids().filter(|&f| mesh.is_degenerate_face(f)).count();
    println!("Degenerate faces: {}", degenerate);
    println!("Surface area: {:.6}", mesh.surface_area());

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x,
            min.y,
            min.z,
            max.x,
            max.y,
            max.z
        );
        let diag = max - min;
        println!("Dimensions: {:.3} x {:.3} x {:.3}", diag.x, diag.y, diag.z);
    }

    let adjacency = FaceAdjacency::build(&mesh);
    println!("Edges: {}", adjacency.edge_count());
    println!("Boundary edges: {}", adjacency.boundary_edge_count());
    println!("Non-manifold edges: {}", adjacency.non_manifold_edge_count());
    if adjacency.is_watertight() {
        println!("Topology: Closed (no boundary)");
    } else {
        println!("Topology: Open");
    }

    let options = ShellOptions::default().with_connectivity(connectivity);
    let shells = classify_with_options(&mesh, &options);
    println!("Shells: {}", shells.count());
    for (id, size) in shells.shell_sizes().iter().enumerate() {
        println!("  Shell {}: {} faces", id, size);
    }

    Ok(())
}
