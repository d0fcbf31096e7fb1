use clap::{Parser, Subcommand};
use static_press::engine::distribute::{Distributor, Mirror, sweep_orphans};
use static_press::engine::extract::{DirExtractor, PublishMode, publish};
use static_press::logging;
use static_press::shared::config::CONFIG;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "staticpress")]
#[command(about = "Fingerprint and distribute static assets to CDN mirrors", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one publish run: extract, fingerprint, distribute, index.
    Publish {
        /// Source directory to extract assets from
        #[arg(long)]
        source: PathBuf,

        /// Grouping folder recorded in fingerprinted paths (e.g. a module name)
        #[arg(long)]
        folder: String,

        /// Mirror docroots as host=path pairs, one per mirror
        #[arg(long = "mirror", required = true)]
        mirrors: Vec<String>,

        /// Publish under stable paths below this prefix instead of fingerprinting
        #[arg(long)]
        stable_prefix: Option<String>,
    },

    /// Delete unreferenced blobs from a mirror's docroot.
    Sweep {
        /// Mirror docroot as a host=path pair
        #[arg(long)]
        mirror: String,
    },
}

fn parse_mirror(spec: &str) -> anyhow::Result<Mirror> {
    let (host, docroot) = spec
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("mirror spec '{spec}' is not host=path"))?;
    Ok(Mirror::new(host, docroot))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init()?;
    let args = Args::parse();
    let index_name = &CONFIG.publish.index_name;

    match args.command {
        Command::Publish {
            source,
            folder,
            mirrors,
            stable_prefix,
        } => {
            let mirrors = mirrors
                .iter()
                .map(|s| parse_mirror(s))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let extractor = DirExtractor::new(source, &folder);
            let mode = match stable_prefix {
                Some(path_prefix) => PublishMode::Stable { path_prefix },
                None => PublishMode::Fingerprint,
            };

            let mut distributor = Distributor::open(mirrors, index_name).await?;
            let report = publish(&extractor, &mut distributor, &mode).await?;
            let index = distributor.close().await?;

            println!(
                "published {} entries ({} written, {} reused)",
                index.len(),
                report.written,
                report.reused
            );
        }

        Command::Sweep { mirror } => {
            let mirror = parse_mirror(&mirror)?;
            let all = mirror.load_all_index(index_name).await?;
            let report = sweep_orphans(&mirror, &all)?;
            println!(
                "swept {}: {} scanned, {} deleted, {} kept",
                mirror.host(),
                report.scanned,
                report.deleted,
                report.kept
            );
        }
    }

    Ok(())
}
