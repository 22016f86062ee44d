//! Command-line interface for the counter-based generators and the
//! Mersenne Twister jump-matrix cache.

#![forbid(unsafe_code)]

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use cbrng::{build, Algorithm, Backend, BlockFunction};
use cbrng_core::{reference, Aes128Key};
use clap::{Parser, Subcommand, ValueEnum};
use mt_jump::params::{
    MicroMtParams, Mt11213aParams, Mt11213bParams, Mt19937Params, Mt19937_64Params, MtParams,
    Tt800Params,
};
use mt_jump::{Direction, JumpCache, JumpConfig, MersenneTwister};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod vectors;

/// Counter-based RNG toolbox.
#[derive(Parser)]
#[command(
    name = "cbrng",
    version,
    about = "Known-answer checks, sampling and jump-matrix precomputation"
)]
struct Cli {
    /// Which block backend to use.
    #[arg(long, value_enum, default_value_t = BackendChoice::Auto, env = "CBRNG_BACKEND", global = true)]
    backend: BackendChoice,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum BackendChoice {
    /// Hardware when available, otherwise software. `kat` checks both.
    Auto,
    /// Portable implementation only.
    Software,
    /// AES-NI; fails on CPUs without it.
    Hardware,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum EngineName {
    Mt19937,
    #[value(name = "mt19937-64")]
    Mt19937_64,
    Mt11213a,
    Mt11213b,
    Tt800,
    MicroMt,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum DirectionArg {
    Forward,
    Reverse,
}

impl From<DirectionArg> for Direction {
    fn from(value: DirectionArg) -> Self {
        match value {
            DirectionArg::Forward => Direction::Forward,
            DirectionArg::Reverse => Direction::Reverse,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the known-answer vectors for AES, ARS and FIPS-197.
    Kat,
    /// Print generator output for a range of counters.
    Sample {
        /// Block function: aes, ars5, ars7 or ars10.
        #[arg(long, default_value = "aes")]
        algorithm: Algorithm,
        /// Key as 32 hex characters; random when omitted.
        #[arg(long, value_name = "HEX")]
        key_hex: Option<String>,
        /// RNG seed for the random key.
        #[arg(long)]
        seed: Option<u64>,
        /// First counter value.
        #[arg(long, default_value_t = 0)]
        start: u128,
        /// Number of blocks to print.
        #[arg(long, default_value_t = 4)]
        count: u64,
    },
    /// Compute and store a jump matrix, or report whether one is cached.
    Jump {
        /// Engine whose matrix to build.
        #[arg(long, value_enum)]
        engine: EngineName,
        /// Jump distance in steps.
        #[arg(long)]
        distance: u64,
        /// Jump direction.
        #[arg(long, value_enum, default_value_t = DirectionArg::Forward)]
        direction: DirectionArg,
        /// Cache directory.
        #[arg(long, value_name = "DIR", env = "MT_JUMP_CACHE_DIR")]
        cache_dir: Option<PathBuf>,
        /// Only report whether the matrix is already cached.
        #[arg(long, default_value_t = false)]
        check: bool,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Kat => cmd_kat(cli.backend),
        Commands::Sample {
            algorithm,
            key_hex,
            seed,
            start,
            count,
        } => cmd_sample(cli.backend, algorithm, key_hex.as_deref(), seed, start, count),
        Commands::Jump {
            engine,
            distance,
            direction,
            cache_dir,
            check,
        } => cmd_jump(engine, distance, direction.into(), cache_dir, check),
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn cmd_kat(choice: BackendChoice) -> Result<()> {
    let backends = match choice {
        BackendChoice::Auto if cbrng::hardware_available() => {
            vec![Backend::Software, Backend::Hardware]
        }
        BackendChoice::Auto | BackendChoice::Software => vec![Backend::Software],
        BackendChoice::Hardware => vec![Backend::Hardware],
    };

    let mut failures = 0usize;
    for backend in backends {
        for vector in vectors::ALL {
            let mut function = build(vector.algorithm, vector.key());
            function
                .set_hardware_mode(backend == Backend::Hardware)
                .with_context(|| format!("select {backend} backend"))?;
            let actual = function.generate_block(&vector.counter());
            let ok = actual == vector.expected();
            if !ok {
                failures += 1;
            }
            println!(
                "{:<4} {:<8} {:<22} {}",
                if ok { "ok" } else { "FAIL" },
                backend.to_string(),
                vector.name,
                hex::encode(actual)
            );
        }
    }
    for vector in vectors::ALL.iter().filter(|v| v.algorithm == Algorithm::Aes) {
        let round_keys = reference::expand_key(&Aes128Key(vector.key()));
        let actual = reference::encrypt_block(&vector.counter(), &round_keys);
        let ok = actual == vector.expected();
        if !ok {
            failures += 1;
        }
        println!(
            "{:<4} {:<8} {:<22} {}",
            if ok { "ok" } else { "FAIL" },
            "fips",
            vector.name,
            hex::encode(actual)
        );
    }
    if failures > 0 {
        bail!("{failures} known-answer vector(s) failed");
    }
    Ok(())
}

fn cmd_sample(
    choice: BackendChoice,
    algorithm: Algorithm,
    key_hex: Option<&str>,
    seed: Option<u64>,
    start: u128,
    count: u64,
) -> Result<()> {
    let key = match key_hex {
        Some(hex_str) => parse_key_hex(hex_str)?,
        None => {
            let mut key = [0u8; 16];
            seeded_rng(seed).fill_bytes(&mut key);
            key
        }
    };
    let mut function = build(algorithm, key);
    apply_backend(function.as_mut(), choice)?;
    info!(%algorithm, rounds = algorithm.rounds(), backend = %function.backend(), "sampling");

    println!(
        "# {algorithm} rounds={} key={} backend={}",
        algorithm.rounds(),
        hex::encode(key),
        function.backend()
    );
    for i in 0..u128::from(count) {
        let counter = start.wrapping_add(i);
        let out = function.generate_block(&counter.to_le_bytes());
        let words: Vec<String> = out
            .chunks_exact(4)
            .map(|c| format!("{:08x}", u32::from_le_bytes([c[0], c[1], c[2], c[3]])))
            .collect();
        println!("{counter:032x} {}", words.join(" "));
    }
    Ok(())
}

fn cmd_jump(
    engine: EngineName,
    distance: u64,
    direction: Direction,
    cache_dir: Option<PathBuf>,
    check: bool,
) -> Result<()> {
    let mut config = JumpConfig::from_env().context("read jump configuration")?;
    if let Some(dir) = cache_dir {
        config.cache_dir = dir;
    }
    let cache = JumpCache::from_config(&config);
    match engine {
        EngineName::Mt19937 => precompute::<Mt19937Params>(&cache, direction, distance, check),
        EngineName::Mt19937_64 => {
            precompute::<Mt19937_64Params>(&cache, direction, distance, check)
        }
        EngineName::Mt11213a => precompute::<Mt11213aParams>(&cache, direction, distance, check),
        EngineName::Mt11213b => precompute::<Mt11213bParams>(&cache, direction, distance, check),
        EngineName::Tt800 => precompute::<Tt800Params>(&cache, direction, distance, check),
        EngineName::MicroMt => precompute::<MicroMtParams>(&cache, direction, distance, check),
    }
}

fn precompute<C: MtParams>(
    cache: &JumpCache<mt_jump::FileStore>,
    direction: Direction,
    distance: u64,
    check: bool,
) -> Result<()> {
    let key = MersenneTwister::<C>::jump_key(direction, distance);
    let path = cache.store().path(&key);
    if check {
        let state = if cache.contains(&key) { "cached" } else { "missing" };
        println!("{state} {}", path.display());
        return Ok(());
    }
    cache
        .get_or_compute(&key, || MersenneTwister::<C>::jump_matrix(direction, distance))
        .with_context(|| format!("precompute {}", path.display()))?;
    println!("stored {}", path.display());
    Ok(())
}

fn apply_backend(function: &mut dyn BlockFunction, choice: BackendChoice) -> Result<()> {
    match choice {
        BackendChoice::Auto => {}
        BackendChoice::Software => {
            function.set_hardware_mode(false)?;
        }
        BackendChoice::Hardware => {
            function
                .set_hardware_mode(true)
                .context("hardware backend requested")?;
        }
    }
    Ok(())
}

fn parse_key_hex(hex_str: &str) -> Result<[u8; 16]> {
    let bytes = hex::decode(hex_str.trim()).context("decode key hex")?;
    if bytes.len() != 16 {
        bail!("key must be 16 bytes (32 hex characters)");
    }
    let mut key = [0u8; 16];
    key.copy_from_slice(&bytes);
    Ok(key)
}

fn seeded_rng(seed: Option<u64>) -> ChaCha20Rng {
    match seed {
        Some(value) => ChaCha20Rng::seed_from_u64(value),
        None => ChaCha20Rng::from_entropy(),
    }
}
