use clap::Parser;
use color_eyre::eyre::{bail, eyre};

use acd_rs::acd::AcDecomposition;
use acd_rs::params::AcdParams;
use acd_rs::record::LutNetwork;
use acd_rs::truth_table::{TruthTable, MAX_NUM_VARS};
use acd_rs::types::Profile;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Truth table in hex, most significant row first (e.g. `e8` for majority-of-3).
    #[arg(value_name = "HEX")]
    truth_table: String,

    /// LUT size.
    #[clap(short = 'k', long, value_name = "INT", default_value = "6")]
    lut_size: u32,

    /// Late-arriving inputs, as a bitmask.
    #[clap(long, value_name = "INT", default_value = "0")]
    delay_profile: u32,

    /// Retry without the delay profile if it makes the search fail.
    #[clap(long)]
    try_no_late_arrival: bool,

    /// Enable debug logging.
    #[clap(short, long)]
    verbose: bool,
}

/// Parses a hex truth table; the number of inputs follows from the number of digits
/// (at least two inputs, one digit).
fn parse_truth_table(hex: &str) -> color_eyre::Result<TruthTable> {
    let hex = hex.trim_start_matches("0x");
    let num_bits = hex.len() * 4;
    if !num_bits.is_power_of_two() {
        bail!("{} hex digits do not make a truth table", hex.len());
    }
    let num_vars = num_bits.trailing_zeros() as usize;
    if num_vars > MAX_NUM_VARS {
        bail!("{} inputs, at most {} are supported", num_vars, MAX_NUM_VARS);
    }

    let mut words = vec![0u64; TruthTable::words_for(num_vars)];
    for (i, c) in hex.chars().rev().enumerate() {
        let digit = c.to_digit(16).ok_or_else(|| eyre!("invalid hex digit '{}'", c))? as u64;
        words[i / 16] |= digit << (4 * (i % 16));
    }
    Ok(TruthTable::from_words(num_vars, &words))
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        if args.verbose {
            simplelog::LevelFilter::Debug
        } else {
            simplelog::LevelFilter::Info
        },
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    println!("args = {:?}", args);

    let tt = parse_truth_table(&args.truth_table)?;
    println!("f = {} ({} inputs)", tt, tt.num_vars());

    let params = AcdParams {
        lut_size: args.lut_size,
        try_no_late_arrival: args.try_no_late_arrival,
        ..AcdParams::default()
    };
    let engine = AcDecomposition::new(params)?;

    let time_total = std::time::Instant::now();
    let choice = engine.run(tt.words(), tt.num_vars(), Profile::new(args.delay_profile))?;
    println!("free set = {}, multiplicity = {}", choice.profile(), choice.multiplicity());
    let decomposition = choice.compute_decomposition(engine.params())?;
    println!("decomposed in {:?}", time_total.elapsed());

    let n = tt.num_vars();
    for (i, lut) in decomposition.luts().iter().enumerate() {
        let support: Vec<String> = lut
            .support
            .iter()
            .map(|&s| if s < n { format!("x{}", s) } else { format!("n{}", s - n) })
            .collect();
        println!("n{} = LUT{}({}) with tt {}", i, lut.fanin(), support.join(", "), lut.tt);
    }
    println!("stats = {:?}", decomposition.stats());

    let bytes = decomposition.to_abc_bytes();
    let hex: Vec<String> = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    println!("record = {}", hex.join(" "));

    let network = LutNetwork::from_abc_bytes(&bytes, n)?;
    if network.simulate() != tt {
        bail!("decomposition does not match the function");
    }
    println!("record verified");

    Ok(())
}
