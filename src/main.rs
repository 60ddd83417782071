use clap::{Parser, Subcommand};
use pixform::imaging::{Dimensions, RustBackend, open_image};
use pixform::options::{Crop, Options, Resize};
use pixform::{config, format, output, server};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pixform")]
#[command(about = "Rotate, crop, resize and thumbnail images")]
#[command(long_about = "\
Rotate, crop, resize and thumbnail images

Every image goes through the same fixed pipeline, and each step is skipped
when its options would not change anything:

  source ──▶ rotate ──▶ crop ──▶ resize ──▶ primary output
                                               │
                                               ├──▶ resize ──▶ <name>-small.jpg
                                               └──▶ resize ──▶ <name><suffix>.<ext>

Use 'pixform format' for a single file or 'pixform serve' to expose the same
pipeline over HTTP (POST /format, multipart upload).

Run 'pixform gen-config' to generate a documented pixform.toml.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = config::CONFIG_FILE, global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the pipeline on one image file
    Format(FormatArgs),
    /// Serve the pipeline over HTTP
    Serve {
        /// Port to listen on (overrides server.port)
        #[arg(long)]
        port: Option<u16>,
        /// Directory for uploads and outputs (overrides server.root)
        #[arg(long)]
        root: Option<PathBuf>,
    },
    /// Print a stock pixform.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct FormatArgs {
    /// Source image
    #[arg(long)]
    src: PathBuf,
    /// Destination file; its extension picks the output format
    #[arg(long)]
    dst: PathBuf,
    /// Crop origin x
    #[arg(long, default_value_t = 0)]
    cropx: u32,
    /// Crop origin y
    #[arg(long, default_value_t = 0)]
    cropy: u32,
    /// Crop width
    #[arg(long, default_value_t = 0)]
    cropw: u32,
    /// Crop height
    #[arg(long, default_value_t = 0)]
    croph: u32,
    /// Counter-clockwise rotation in degrees
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    rotate: f64,
    /// Fill for areas exposed by rotation: black/b, white/w, else transparent
    #[arg(long, default_value = "black")]
    fill: String,
    /// Resize width (0 copies the height)
    #[arg(long, default_value_t = 0)]
    resizew: u32,
    /// Resize height (0 copies the width)
    #[arg(long, default_value_t = 0)]
    resizeh: u32,
    /// JSON options document; replaces all of the flags above
    #[arg(long)]
    options: Option<PathBuf>,
}

impl FormatArgs {
    /// Options from the flags, with thumbnails from the config.
    fn to_options(&self, config: &config::Config) -> Options {
        Options {
            crop: Crop {
                x: self.cropx,
                y: self.cropy,
                width: self.cropw,
                height: self.croph,
            },
            rotate: self.rotate,
            fill: self.fill.clone(),
            resize: Resize {
                width: self.resizew,
                height: self.resizeh,
            },
            thumbnails: config.thumbnails.clone(),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Format(args) => {
            let config = config::load_config(&cli.config)?;
            let options = match &args.options {
                Some(path) => format::load_options(path)?,
                None => args.to_options(&config),
            };
            run_format(&args.src, &args.dst, &options)?;
        }
        Command::Serve { port, root } => {
            let config = config::load_config(&cli.config)?;
            init_tracing();
            let port = port.unwrap_or(config.server.port);
            let root = root.unwrap_or(config.server.root);
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(port, &root, config.server.max_upload_bytes))?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn run_format(src: &Path, dst: &Path, options: &Options) -> Result<(), Box<dyn std::error::Error>> {
    let image = Arc::new(open_image(src)?);
    output::print_source_line(src, Dimensions::of(&image));

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_pipeline_event(&event) {
                println!("{}", line);
            }
        }
    });
    let result = format::format_image(&RustBackend::new(), image, dst, options, Some(tx));
    printer.join().map_err(|_| "output printer thread panicked")?;

    output::print_saved_summary(result?.len());
    Ok(())
}

/// Install the tracing subscriber used by `serve`. `RUST_LOG` overrides the
/// default filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pixform=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
