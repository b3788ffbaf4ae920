use clap::{Parser, Subcommand};
use mdsite::generate::{self, BuildOptions};
use mdsite::{config, output};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "mdsite")]
#[command(about = "Static site generator for a tree of markdown files")]
#[command(long_about = "\
Static site generator for a tree of markdown files

Every .md file becomes a page at a clean URL, every other file is copied
as-is, and all pages share one navigation bar and one stylesheet.

Content structure:

  content/
  ├── site.toml                # Site config (title, home, navigation)
  ├── README.md                # Home page          → index.html
  ├── 404.md                   # Not-found page     → 404.html
  ├── about.md                 # Page               → about/index.html
  ├── blog/
  │   ├── index.md             # Directory index    → blog/index.html
  │   └── first-post.md        # Page               → blog/first-post/index.html
  └── img/logo.png             # Copied verbatim    → img/logo.png

Page title (first available wins):
  metadata title → first # heading → site title

Run 'mdsite gen-config' to generate a documented site.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Config file [default: <source>/site.toml]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the site
    Build {
        /// Remove the output directory first
        #[arg(long)]
        clean: bool,
    },
    /// Validate config and content, and show where every page will go
    Check,
    /// Print a stock site.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let options = BuildOptions {
        config: cli.config,
        ..BuildOptions::new(cli.source, cli.output)
    };

    match cli.command {
        Command::Build { clean } => {
            let options = BuildOptions { clean, ..options };
            println!("==> Checking {}", options.source.display());
            let prepared = generate::prepare(&options)?;
            init_thread_pool(&prepared.config.processing);

            if options.clean {
                generate::clean_output(&prepared.ctx)?;
            }
            println!("==> Generating HTML \u{2192} {}", options.output.display());
            let summary = generate::generate(&prepared)?;
            output::print_build_output(&summary);
            println!("==> Build complete: {}", options.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", options.source.display());
            let prepared = generate::check(&options)?;
            output::print_check_output(&prepared);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
