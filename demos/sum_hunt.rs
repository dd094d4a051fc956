use clap::Parser;

use bitsat::solver::Solver;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Target sum.
    #[arg(value_name = "INT", default_value = "100")]
    target: u64,

    /// Bit width of each addend.
    #[clap(long, value_name = "INT", default_value = "8")]
    width: usize,

    /// Maximum number of solutions to enumerate.
    #[clap(long, value_name = "INT", default_value = "10")]
    limit: usize,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();

    let args = Cli::parse();
    println!("args = {:?}", args);

    let s = Solver::new();
    println!("solver = {:?}", s);

    // Find ordered pairs x < y with x + y == target, x != 0.
    let x = s.new_bv(args.width);
    let y = s.new_bv(args.width);
    let sum = s.bv_add(&x, &y)?;

    s.add_clause(&[s.bv_eq_const(&sum, args.target)?])?;
    s.add_clause(&[s.bv_lt(&x, &y)?])?;
    s.add_clause(&[s.bv_neq_const(&x, 0)?])?;
    println!("solver = {:?}", s);

    println!("Enumerating up to {} pairs with x + y = {}:", args.limit, args.target);
    let mut found = 0;
    while found < args.limit && s.solve() {
        let vx = s.bv_value(&x)?;
        let vy = s.bv_value(&y)?;
        println!("- {} + {} = {}", vx, vy, args.target);
        found += 1;
        // Block this value of x and ask again.
        s.add_clause(&[s.bv_neq_const(&x, vx)?])?;
    }
    if found == 0 {
        println!("No solutions.");
    }

    let time_total = time_total.elapsed();
    println!("Done in {:.3} s", time_total.as_secs_f64());

    Ok(())
}
