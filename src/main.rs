//! Intcode VM - CLI Entry Point
//!
//! Commands:
//! - `intcode-vm run <program>` - Run a program until it halts
//! - `intcode-vm arcade <program>` - Play the breakout game
//! - `intcode-vm disasm <program>` - Disassemble a program

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "intcode-vm")]
#[command(version = "0.1.0")]
#[command(about = "A self-modifying Intcode interpreter with an arcade controller")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a program until it halts
    Run {
        /// Path to the program listing
        program: String,
        /// Input values, supplied in order to successive input instructions
        #[arg(short, long, allow_negative_numbers = true)]
        input: Vec<i64>,
        /// Print each instruction before it executes
        #[arg(short, long)]
        trace: bool,
        /// Print the final VM state as JSON
        #[arg(long)]
        dump_state: bool,
    },
    /// Play the breakout game
    Arcade {
        /// Path to the game program listing
        program: String,
        /// Insert quarters (write 2 to address 0) to play for free
        #[arg(short, long)]
        free_play: bool,
        /// Watch the game in the interactive viewer
        #[arg(long)]
        tui: bool,
        /// Do not draw frames, only print the result
        #[arg(short, long)]
        quiet: bool,
    },
    /// Disassemble a program listing
    Disasm {
        /// Path to the program listing
        program: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Run { program, input, trace, dump_state }) => {
            run_program(&program, input, trace, dump_state);
        }
        Some(Commands::Arcade { program, free_play, tui, quiet }) => {
            run_arcade(&program, free_play, tui, quiet);
        }
        Some(Commands::Disasm { program }) => {
            disassemble_file(&program);
        }
        None => {
            println!("Intcode VM v0.1.0");
            println!("A self-modifying Intcode interpreter");
            println!();
            println!("Use --help for available commands");
            println!();
            demo();
        }
    }
}

/// Log to stderr so program output on stdout stays clean.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_or_exit(path: &str) -> Vec<i64> {
    match intcode::load_program(path) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("❌ Failed to load {}: {}", path, e);
            std::process::exit(1);
        }
    }
}

fn run_program(path: &str, inputs: Vec<i64>, trace: bool, dump_state: bool) {
    use intcode::{Opcode, Vm};
    use intcode::asm::disasm::disassemble_instruction;

    let program = load_or_exit(path);
    let mut inputs = inputs.into_iter();
    let mut vm = Vm::new(&program, inputs.next());

    while vm.is_running() {
        let pc = vm.pc();
        if trace {
            if let Ok(addr) = usize::try_from(pc) {
                let (text, _) = disassemble_instruction(vm.memory(), addr);
                eprintln!("{:05}: {:<24} rb={}", pc, text, vm.relative_base());
            }
        }

        match vm.step() {
            Ok(instr) => match instr.opcode {
                // The register is never consumed, so refill it with the
                // next queued value (or leave the last one in place).
                Opcode::Input => {
                    if let Some(next) = inputs.next() {
                        vm.set_input(next);
                    }
                }
                Opcode::Output => {
                    if let Some(value) = vm.last_output() {
                        println!("{}", value);
                    }
                }
                _ => {}
            },
            Err(e) => {
                eprintln!("❌ VM error at PC={}: {}", pc, e);
                std::process::exit(1);
            }
        }
    }

    if dump_state {
        match serde_json::to_string_pretty(&vm) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("❌ Failed to serialize state: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn run_arcade(path: &str, free_play: bool, tui: bool, quiet: bool) {
    use intcode::arcade::{Arcade, NullRenderer, TextRenderer};

    let program = load_or_exit(path);

    if tui {
        #[cfg(feature = "tui")]
        {
            if let Err(e) = intcode::run_viewer(program, free_play) {
                eprintln!("❌ Viewer error: {}", e);
                std::process::exit(1);
            }
            return;
        }
        #[cfg(not(feature = "tui"))]
        {
            eprintln!("❌ Built without the `tui` feature");
            std::process::exit(1);
        }
    }

    let mut arcade = Arcade::new(&program);
    if free_play {
        if let Err(e) = arcade.insert_quarters() {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }

    let result = if quiet {
        arcade.play(&mut NullRenderer)
    } else {
        let stdout = std::io::stdout();
        arcade.play(&mut TextRenderer::new(stdout.lock()).clear_between_frames(true))
    };

    match result {
        Ok(score) => {
            println!("Score: {}", score);
            println!("Blocks remaining: {}", arcade.screen().block_count());
        }
        Err(e) => {
            eprintln!("❌ Arcade error: {}", e);
            std::process::exit(1);
        }
    }
}

fn disassemble_file(path: &str) {
    let program = load_or_exit(path);
    println!("{}", intcode::disassemble(&program));
}

fn demo() {
    use intcode::{disassemble, Outcome, Vm};

    let program = [104, 1, 104, 2, 104, 3, 99];

    println!("━━━ Demo ━━━");
    println!();
    print!("{}", disassemble(&program));
    println!();

    let mut vm = Vm::new(&program, None);
    loop {
        match vm.run_until_output() {
            Ok(Outcome::Output(value)) => println!("  output: {}", value),
            Ok(Outcome::Halted) => {
                println!("  halted after {} instructions", vm.steps());
                break;
            }
            Err(e) => {
                eprintln!("❌ VM error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
