use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tutogen::{EncodingDef, GeneratorConfig, TutorialDef, WriteOptions, presets};

#[derive(Parser, Debug)]
#[command(name = "tutogen", version, about = "Render tutorial GIFs and PNGs")]
struct Cli {
    /// More logging (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the built-in tutorials and their artifacts.
    List,
    /// Generate every artifact of a tutorial.
    Render(RenderArgs),
    /// Print a built-in tutorial as JSON configuration.
    Dump(DumpArgs),
    /// Render a single frame of one artifact as a PNG.
    Frame(FrameArgs),
}

#[derive(Args, Debug)]
struct Source {
    /// Built-in tutorial name (see `tutogen list`).
    #[arg(long, conflicts_with = "config")]
    preset: Option<String>,

    /// Tutorial JSON configuration.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct AssetArgs {
    /// Sprite cache directory.
    #[arg(long)]
    cache: Option<PathBuf>,

    /// Never download sprites (env: TUTOGEN_OFFLINE).
    #[arg(long)]
    offline: bool,

    /// Remote sprite base URL (env: TUTOGEN_SPRITE_BASE_URL).
    #[arg(long)]
    sprite_base_url: Option<String>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    source: Source,

    /// Render every built-in tutorial, each into `<out>/<name>/`.
    #[arg(long, conflicts_with_all = ["preset", "config"])]
    all: bool,

    /// Output directory.
    #[arg(long)]
    out: Option<PathBuf>,

    #[command(flatten)]
    assets: AssetArgs,
}

#[derive(Args, Debug)]
struct DumpArgs {
    /// Built-in tutorial name.
    #[arg(long)]
    preset: String,

    /// Write to this file instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    source: Source,

    /// Artifact index (0-based, in declaration order).
    #[arg(long, default_value_t = 0)]
    artifact: usize,

    /// Frame index inside the artifact (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    assets: AssetArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::List => cmd_list(),
        Command::Render(args) => cmd_render(args),
        Command::Dump(args) => cmd_dump(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn preset(name: &str) -> anyhow::Result<TutorialDef> {
    presets::by_name(name).with_context(|| {
        format!(
            "unknown preset '{name}' (available: {})",
            presets::PRESET_NAMES.join(", ")
        )
    })
}

fn load(source: &Source) -> anyhow::Result<TutorialDef> {
    match (&source.preset, &source.config) {
        (Some(name), _) => preset(name),
        (None, Some(path)) => Ok(TutorialDef::from_path(path)?),
        (None, None) => anyhow::bail!("pass --preset NAME or --config FILE.json"),
    }
}

fn generator_config(assets: &AssetArgs, out: Option<&Path>) -> GeneratorConfig {
    let mut cfg = GeneratorConfig::from_env();
    if let Some(out) = out {
        cfg.out_dir = out.to_path_buf();
    }
    if let Some(cache) = &assets.cache {
        cfg.sprite_cache_dir = cache.clone();
    }
    if let Some(url) = &assets.sprite_base_url {
        cfg.sprite_base_url = url.clone();
    }
    if assets.offline {
        cfg.offline = true;
    }
    cfg
}

fn cmd_list() -> anyhow::Result<()> {
    for def in presets::all() {
        let files: Vec<_> = def.artifacts.iter().map(|a| a.file.as_str()).collect();
        println!("{:<16} {}", def.name, files.join(" "));
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = generator_config(&args.assets, args.out.as_deref());
    let jobs: Vec<(TutorialDef, GeneratorConfig)> = if args.all {
        presets::all()
            .into_iter()
            .map(|def| {
                let dir = cfg.out_dir.join(&def.name);
                (def, cfg.clone().with_out_dir(dir))
            })
            .collect()
    } else {
        vec![(load(&args.source)?, cfg)]
    };

    for (def, cfg) in jobs {
        let written = tutogen::generate(&def, &cfg)
            .with_context(|| format!("generate tutorial '{}'", def.name))?;
        for path in written {
            println!("{}", path.display());
        }
    }
    Ok(())
}

fn cmd_dump(args: DumpArgs) -> anyhow::Result<()> {
    let json = preset(&args.preset)?.to_json_pretty()?;
    match args.out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(&path, json + "\n")
                .with_context(|| format!("write '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let def = load(&args.source)?;
    let cfg = generator_config(&args.assets, None);
    let mut assets = cfg.scene_assets();
    let frame = tutogen::render_single_frame(&def, args.artifact, args.frame, &mut assets)?;

    let opts = WriteOptions {
        frame_ms: 100,
        encoding: EncodingDef::default(),
    };
    tutogen::write_artifact(std::slice::from_ref(&frame), &args.out, &opts)
        .with_context(|| format!("write png '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
