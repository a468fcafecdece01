// Unilog - main.rs
//
// Demo application. Handles:
// 1. Configuration loading (platform config.toml + defaults)
// 2. Facade construction (fatal configuration errors abort here)
// 3. Example command registration
// 4. Interface dispatch (CLI subcommands and/or the viewer window)

use unilog::{CommandSpec, LoggerConfig, ParamSpec, UnifiedLogger};

fn main() {
    let config = match LoggerConfig::load("unilog") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let mut log = match UnifiedLogger::new(config) {
        Ok(log) => log,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let divide = CommandSpec::new("divide", "Divide x by y", |args| {
        let x = args.get_int("x").unwrap_or(0);
        let y = args.get_int("y").unwrap_or(0);
        if y == 0 {
            return Err("division by zero".into());
        }
        Ok(format!("The result is: {}", x / y))
    })
    .param(ParamSpec::int("x"))
    .param(ParamSpec::int("y"));

    let count = CommandSpec::new("count", "Count to n with a progress bar", |args| {
        let n = args.get_int("n").unwrap_or(5).clamp(0, 10_000) as usize;
        let mut total = 0usize;
        for i in unilog::cli::progress::wrap(0..n, "Counting") {
            total += i;
            std::thread::sleep(std::time::Duration::from_millis(25));
        }
        Ok(format!("Counted to {n} (sum {total})"))
    })
    .param(ParamSpec::int("n").optional());

    for spec in [divide, count] {
        if let Err(e) = log.add_command(spec) {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }

    match log.run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
